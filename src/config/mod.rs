//! Command line arguments and `.toml` argument files for the course programs.

use std::{
    env, fmt, fs::read_to_string, path::{Path, PathBuf}, process::ExitCode, result::Result, str::FromStr,
};
use toml::{from_str, Value};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    registry::LookupSpan,
};
use crate::{
    error::{ConfigError, CorcoefError},
    matrix::DEFAULT_ZERO_THRESHOLD,
    report::report_failure,
};


/// How results are written to standard output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidValue { key: String::from("output"), expected: "\"text\" or \"json\"" }),
        }
    }
}

/// Fixed properties of one of the programs
#[derive(Debug, Clone, Copy)]
pub struct Program {
    /// Name of the table read from an argument file
    pub name: &'static str,
    /// Description of the input file in the usage text
    pub input_description: &'static str,
    /// Permutation budget when none is given, `None` if the program runs no test
    pub default_max_permutations: Option<u64>,
}

/// Settings for a single run of a program
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub max_permutations: u64,
    /// Seed for the random number generator, a fresh seed is drawn when `None`
    pub seed: Option<u64>,
    pub output: OutputFormat,
    pub log_level: Level,
    /// p-values below this are reported as `0`
    pub zero_threshold: f64,
}

impl RunConfig {
    fn new(program: &Program, input: PathBuf) -> Self {
        RunConfig {
            input,
            max_permutations: program.default_max_permutations.unwrap_or(0),
            seed: None,
            output: OutputFormat::Text,
            log_level: Level::WARN,
            zero_threshold: DEFAULT_ZERO_THRESHOLD,
        }
    }
}

/// What the program was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// No arguments were given, print usage
    Usage,
    Run(RunConfig),
}

/// Usage text for the program
pub fn usage(program: &Program, executable: &str) -> String {
    match program.default_max_permutations {
        Some(_) => format!(
            "Use as:  {0} <{1}> [<Max permutations>]\n\
             \x20  or:  {0} <Arguments.toml>\n\
             Example: {0} Table.txt 1000000\n",
            executable, program.input_description,
        ),
        None => format!(
            "Use as:  {0} <{1}>\n\
             \x20  or:  {0} <Arguments.toml>\n\
             Example: {0} Table.txt\n",
            executable, program.input_description,
        ),
    }
}

fn parse_permutation_count(text: &str) -> Result<u64, ConfigError> {
    match text.trim().parse::<u64>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(ConfigError::InvalidPermutationCount(String::from(text))),
    }
}

/// Reads the command line, `args[0]` is the executable, either `<input> [<max permutations>]`
/// or a single `.toml` argument file
pub fn parse_args(args: &[String], program: &Program) -> Result<Invocation, ConfigError> {
    let first = match args.get(1) {
        Some(first) => first,
        None => return Ok(Invocation::Usage),
    };

    if args.len() == 2 && first.ends_with(".toml") {
        return Ok(Invocation::Run(read_config_file(first, program)?));
    }

    let mut config = RunConfig::new(program, PathBuf::from(first));
    if program.default_max_permutations.is_some() {
        if let Some(count) = args.get(2) {
            config.max_permutations = parse_permutation_count(count)?;
        }
    }

    Ok(Invocation::Run(config))
}

/// Reads an argument file, a relative `input` is resolved against the directory of the file
pub fn read_config_file<P: AsRef<Path>>(path: P, program: &Program) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let content = read_to_string(path)
        .map_err(|source| ConfigError::CannotRead { path: path.to_path_buf(), source })?;

    let mut config = parse_config(&content, program)?;
    if config.input.is_relative() {
        if let Some(parent) = path.parent() {
            config.input = parent.join(&config.input);
        }
    }

    Ok(config)
}

fn parse_u64(value: &Value, field_name: &str) -> Result<u64, ConfigError> {
    value
        .as_integer()
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| ConfigError::InvalidValue { key: String::from(field_name), expected: "unsigned integer" })
}

fn parse_f64(value: &Value, field_name: &str) -> Result<f64, ConfigError> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|v| v as f64))
        .ok_or_else(|| ConfigError::InvalidValue { key: String::from(field_name), expected: "float" })
}

fn parse_string(value: &Value, field_name: &str) -> Result<String, ConfigError> {
    value
        .as_str()
        .ok_or_else(|| ConfigError::InvalidValue { key: String::from(field_name), expected: "string" })
        .map(String::from)
}

fn parse_value_with_default<T>(
    table: &Value,
    key: &str,
    parser: impl Fn(&Value, &str) -> Result<T, ConfigError>,
    default: T,
) -> Result<T, ConfigError> {
    table
        .get(key)
        .map_or(Ok(default), |value| parser(value, key))
}

/// Parses the program's table of an argument file
///
/// ```toml
/// [corcoef_test]
/// input = "Table.txt"
/// max_permutations = 1000000
/// seed = 21
/// output = "json"
/// log_level = "info"
/// ```
pub fn parse_config(content: &str, program: &Program) -> Result<RunConfig, ConfigError> {
    let config: Value = from_str(content)?;
    let table = config
        .get(program.name)
        .ok_or_else(|| ConfigError::MissingTable(String::from(program.name)))?;

    let input = match table.get("input") {
        Some(value) => PathBuf::from(parse_string(value, "input")?),
        None => return Err(ConfigError::MissingKey(String::from("input"))),
    };

    let mut run_config = RunConfig::new(program, input);

    if program.default_max_permutations.is_some() {
        run_config.max_permutations = parse_value_with_default(
            table, "max_permutations", parse_u64, run_config.max_permutations,
        )?;
        if run_config.max_permutations == 0 {
            return Err(ConfigError::InvalidValue { key: String::from("max_permutations"), expected: "positive integer" });
        }
    }

    run_config.seed = match table.get("seed") {
        Some(value) => Some(parse_u64(value, "seed")?),
        None => None,
    };

    let output = parse_value_with_default(table, "output", parse_string, String::from("text"))?;
    run_config.output = output.parse()?;

    let log_level = parse_value_with_default(table, "log_level", parse_string, String::from("warn"))?;
    run_config.log_level = log_level
        .parse::<Level>()
        .map_err(|_| ConfigError::InvalidValue { key: String::from("log_level"), expected: "log level" })?;

    run_config.zero_threshold = parse_value_with_default(
        table, "zero_threshold", parse_f64, run_config.zero_threshold,
    )?;

    Ok(run_config)
}

// one line per event, `WARNING: <message>` and so on, without timestamps or colors
struct DiagnosticFormat;

impl<S, N> FormatEvent<S, N> for DiagnosticFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let level = *event.metadata().level();
        if level == Level::WARN {
            write!(writer, "WARNING: ")?;
        } else {
            write!(writer, "{}: ", level)?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the stderr log subscriber at the given level, warnings are always shown
/// even when a quieter level is configured
pub fn init_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level.max(Level::WARN))
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .event_format(DiagnosticFormat)
        .try_init();
}

/// Entry point shared by the programs: reads the command line, prints usage when there
/// are no arguments, installs logging and maps any failure to its exit code
pub fn run_program<F>(program: &Program, run: F) -> ExitCode
where
    F: FnOnce(&RunConfig) -> Result<(), CorcoefError>,
{
    let args: Vec<String> = env::args().collect();
    let executable = args.first().map_or(program.name, |arg| arg.as_str());

    let config = match parse_args(&args, program) {
        Ok(Invocation::Usage) => {
            print!("{}", usage(program, executable));
            return ExitCode::SUCCESS;
        },
        Ok(Invocation::Run(config)) => config,
        Err(e) => return report_failure(&e.into()),
    };
    init_tracing(config.log_level);

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_failure(&e),
    }
}

use std::process::ExitCode;
use corcoef::{
    config::{run_program, OutputFormat, Program, RunConfig},
    error::CorcoefError,
    report::{paired_table_json, render_paired_table},
    table::read_paired_table,
};


const PROGRAM: Program = Program {
    name: "read_table",
    input_description: "Tab-delimited text file",
    default_max_permutations: None,
};

fn run(config: &RunConfig) -> Result<(), CorcoefError> {
    let table = read_paired_table(&config.input)?;

    if let Some(trailing) = &table.trailing {
        tracing::warn!("there is text after the last end-of-line: \"{}\"", trailing);
    }

    match config.output {
        OutputFormat::Text => print!("{}", render_paired_table(&table)),
        OutputFormat::Json => println!("{}", paired_table_json(&table)?),
    }

    Ok(())
}

fn main() -> ExitCode {
    run_program(&PROGRAM, run)
}

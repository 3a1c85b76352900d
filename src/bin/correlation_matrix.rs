use std::process::ExitCode;
use corcoef::{
    config::{run_program, OutputFormat, Program, RunConfig},
    error::CorcoefError,
    matrix::correlation_matrix,
    permutation::seeded_rng,
    report::{matrix_json, render_matrix},
    table::read_labeled_table,
};


const PROGRAM: Program = Program {
    name: "correlation_matrix",
    input_description: "InputFile",
    default_max_permutations: Some(1_000_000),
};

fn run(config: &RunConfig) -> Result<(), CorcoefError> {
    let table = read_labeled_table(&config.input)?;
    if config.output == OutputFormat::Text {
        println!("Number of rows: {}", table.rows());
        println!("Number of columns: {}", table.columns());
    }

    let mut rng = seeded_rng(config.seed);
    let matrix = correlation_matrix(&table, config.max_permutations, config.zero_threshold, &mut rng)?;

    match config.output {
        OutputFormat::Text => print!("{}", render_matrix(&matrix)),
        OutputFormat::Json => println!("{}", matrix_json(&matrix)?),
    }

    Ok(())
}

fn main() -> ExitCode {
    run_program(&PROGRAM, run)
}

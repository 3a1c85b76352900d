//! Text and json renderings of tables, permutation test results and correlation matrices.

use std::{fmt::Write, process::ExitCode};
use serde_json::json;
use crate::{
    error::CorcoefError,
    matrix::CorrelationMatrix,
    permutation::{PermutationMode, PermutationTestResult},
    table::PairedTable,
};


fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Formats a number with the given count of significant digits the way `printf("%g")`
/// does, switching to scientific notation for very large or small magnitudes and
/// dropping trailing zeros
pub fn format_significant(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return String::from("nan");
    }
    if value.is_infinite() {
        return String::from(if value > 0. { "inf" } else { "-inf" });
    }
    if value == 0. {
        return String::from(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        String::from(trim_fraction(&format!("{:.*}", decimals, value)))
    }
}

/// Formats a number with 6 significant digits, the default for printing doubles in the
/// course programs
pub fn format_general(value: f64) -> String {
    format_significant(value, 6)
}

/// Row count followed by the table as `X\tY` lines
pub fn render_paired_table(table: &PairedTable) -> String {
    let mut output = format!("Number of rows in the file: {}\n", table.rows());
    output.push_str("Data read from the file:\nX\tY\n");
    for (x, y) in table.x.iter().zip(table.y.iter()) {
        let _ = writeln!(output, "{}\t{}", format_general(*x), format_general(*y));
    }

    output
}

/// Coefficient and p-value with the number of permutations behind it
pub fn render_permutation_test(rows: usize, result: &PermutationTestResult) -> String {
    let mut output = format!("Number of data points: {}\n", rows);
    let _ = writeln!(output, "r = {}", format_general(result.coefficient));
    let _ = writeln!(output, "p-value: {}", format_general(result.p_value()));

    match result.mode {
        PermutationMode::Sampled => {
            let _ = writeln!(output, "(evaluated from a sample of {} random permutations)", result.total);
        },
        PermutationMode::Exact => {
            let _ = writeln!(output, "(evaluated from all possible {} permutations)", result.total);
        },
    }

    output
}

/// Labeled matrix, every cell followed by a tab: `*` on the diagonal, `0` for zero
/// cells, coefficients above the diagonal to 3 decimals and p-values below it to 4
pub fn render_matrix(matrix: &CorrelationMatrix) -> String {
    let mut output = String::from("\t");
    for label in matrix.labels.iter() {
        let _ = write!(output, "{}\t", label);
    }
    output.push('\n');

    for (row, label) in matrix.labels.iter().enumerate() {
        let _ = write!(output, "{}\t", label);
        for column in 0..matrix.size() {
            let value = matrix.cells[[row, column]];
            let _ = if row == column {
                write!(output, "{:>4}\t", "*")
            } else if value == 0. {
                write!(output, "{:>4}\t", 0)
            } else if column < row {
                write!(output, "{:.4}\t", value)
            } else {
                write!(output, "{:.3}\t", value)
            };
        }
        output.push('\n');
    }

    output
}

/// Paired table as pretty json
pub fn paired_table_json(table: &PairedTable) -> Result<String, CorcoefError> {
    Ok(serde_json::to_string_pretty(&json!({
        "rows": table.rows(),
        "x": table.x,
        "y": table.y,
    }))?)
}

/// Permutation test result as pretty json, including the p-value
pub fn permutation_test_json(rows: usize, result: &PermutationTestResult) -> Result<String, CorcoefError> {
    Ok(serde_json::to_string_pretty(&json!({
        "rows": rows,
        "coefficient": result.coefficient,
        "p_value": result.p_value(),
        "extreme": result.extreme,
        "total": result.total,
        "mode": result.mode,
    }))?)
}

/// Correlation matrix as pretty json with one entry per pair
pub fn matrix_json(matrix: &CorrelationMatrix) -> Result<String, CorcoefError> {
    let pairs: Vec<serde_json::Value> = matrix.pairs
        .iter()
        .map(|pair| json!({
            "first": matrix.labels[pair.first],
            "second": matrix.labels[pair.second],
            "coefficient": pair.result.coefficient,
            "p_value": matrix.p_value(pair.first, pair.second),
            "extreme": pair.result.extreme,
            "total": pair.result.total,
            "mode": pair.result.mode,
        }))
        .collect();

    Ok(serde_json::to_string_pretty(&json!({
        "labels": matrix.labels,
        "pairs": pairs,
    }))?)
}

/// Reports a failed run and returns the exit code, an input file that cannot be opened
/// is reported on standard output as `Cannot open file "<path>"`, anything else as an
/// error on standard error
pub fn report_failure(error: &CorcoefError) -> ExitCode {
    match error.unopenable_path() {
        Some(path) => println!("Cannot open file \"{}\"", path.display()),
        None => eprintln!("Error: {}", error),
    }

    ExitCode::from(1)
}

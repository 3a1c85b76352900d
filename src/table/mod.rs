//! Readers for the two table layouts: tab-delimited `X\tY` pairs and
//! whitespace-delimited matrices with a header row and a label column.

use std::{fs::read, path::Path, result::Result};
use csv::{ReaderBuilder, Trim};
use ndarray::{Array2, ArrayView1};
use crate::error::TableError;


/// Two matched columns of observations read from a tab-delimited file
#[derive(Debug, Clone, PartialEq)]
pub struct PairedTable {
    /// First column
    pub x: Vec<f64>,
    /// Second column
    pub y: Vec<f64>,
    /// Text found after the last end-of-line, which is not counted as a row
    pub trailing: Option<String>,
}

impl PairedTable {
    /// Number of rows (one per end-of-line in the file)
    pub fn rows(&self) -> usize {
        self.x.len()
    }
}

/// A numeric matrix with named rows and columns, rows are the series to correlate
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledTable {
    /// Label of each column of values (corner label excluded)
    pub column_labels: Vec<String>,
    /// Label of each data row
    pub row_labels: Vec<String>,
    /// Values with one row per data row and one column per column label
    pub values: Array2<f64>,
}

impl LabeledTable {
    /// Number of data rows
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of value columns
    pub fn columns(&self) -> usize {
        self.values.ncols()
    }

    /// View of the values of a single data row
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }
}

fn open(path: &Path) -> Result<String, TableError> {
    let bytes = read(path).map_err(|source| TableError::CannotOpen { path: path.to_path_buf(), source })?;

    decode(bytes)
}

fn decode(bytes: Vec<u8>) -> Result<String, TableError> {
    String::from_utf8(bytes).map_err(|e| {
        let valid = e.utf8_error().valid_up_to();
        let line = e.as_bytes()[..valid].iter().filter(|&&byte| byte == b'\n').count() + 1;

        TableError::InvalidEncoding { line }
    })
}

fn parse_number(text: &str, line: usize, column: usize) -> Result<f64, TableError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(TableError::InvalidNumber { line, column, text: String::from(text) }),
    }
}

/// Reads a tab-delimited file of `X\tY` pairs, see [`parse_paired_table`]
pub fn read_paired_table<P: AsRef<Path>>(path: P) -> Result<PairedTable, TableError> {
    let path = path.as_ref();
    let table = parse_paired_table(&open(path)?)?;
    tracing::info!(path = %path.display(), rows = table.rows(), "paired table loaded");

    Ok(table)
}

/// Parses tab-delimited `X\tY` pairs, every end-of-line terminates exactly one row
/// and anything after the last end-of-line is returned as `trailing` rather than parsed
pub fn parse_paired_table(content: &str) -> Result<PairedTable, TableError> {
    let (body, rest) = match content.rfind('\n') {
        Some(last) => content.split_at(last + 1),
        None => ("", content),
    };
    let rows = body.bytes().filter(|&byte| byte == b'\n').count();

    let trailing = if rest.trim().is_empty() {
        None
    } else {
        Some(String::from(rest.trim_end_matches('\r')))
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(body.as_bytes());

    let mut x = Vec::with_capacity(rows);
    let mut y = Vec::with_capacity(rows);

    // the csv reader skips blank lines, so line numbers are checked against the rows seen so far
    for record in reader.records() {
        let record = record?;
        let expected_line = x.len() + 1;
        let line = record.position().map_or(expected_line, |position| position.line() as usize);

        if line != expected_line {
            return Err(TableError::RaggedRow { line: expected_line, expected: 2, found: 0 });
        }
        if record.len() != 2 {
            return Err(TableError::RaggedRow { line, expected: 2, found: record.len() });
        }

        x.push(parse_number(&record[0], line, 1)?);
        y.push(parse_number(&record[1], line, 2)?);
    }

    if x.len() != rows {
        return Err(TableError::RaggedRow { line: x.len() + 1, expected: 2, found: 0 });
    }

    Ok(PairedTable { x, y, trailing })
}

/// Reads a whitespace-delimited labeled matrix, see [`parse_labeled_table`]
pub fn read_labeled_table<P: AsRef<Path>>(path: P) -> Result<LabeledTable, TableError> {
    let path = path.as_ref();
    let table = parse_labeled_table(&open(path)?)?;
    tracing::info!(
        path = %path.display(),
        rows = table.rows(),
        columns = table.columns(),
        "labeled table loaded"
    );

    Ok(table)
}

/// Parses a labeled matrix, the first non-blank line is the header of column labels and
/// every following line is a row label followed by one value per column
///
/// The header may begin with a corner label above the row labels, in which case it has as many
/// tokens as a data row and the corner label is dropped, otherwise it has one token fewer
pub fn parse_labeled_table(content: &str) -> Result<LabeledTable, TableError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let header: Vec<&str> = match lines.next() {
        Some((_, line)) => line.split_whitespace().collect(),
        None => return Err(TableError::Empty),
    };

    let mut row_labels: Vec<String> = Vec::new();
    let mut data: Vec<f64> = Vec::new();
    let mut width: Option<usize> = None;

    for (line_number, line) in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let expected = *width.get_or_insert(tokens.len());
        if tokens.len() != expected || tokens.len() < 2 {
            return Err(TableError::RaggedRow { line: line_number, expected: expected.max(2), found: tokens.len() });
        }

        row_labels.push(String::from(tokens[0]));
        for (index, token) in tokens.iter().enumerate().skip(1) {
            data.push(parse_number(token, line_number, index + 1)?);
        }
    }

    let values_per_row = match width {
        Some(width) => width - 1,
        None => return Err(TableError::TooFewRows { rows: 0, minimum: 2 }),
    };

    let column_labels: Vec<String> = if header.len() == values_per_row + 1 {
        header[1..].iter().map(|label| String::from(*label)).collect()
    } else if header.len() == values_per_row {
        header.iter().map(|label| String::from(*label)).collect()
    } else {
        return Err(TableError::HeaderMismatch { labels: header.len(), values: values_per_row });
    };

    if row_labels.len() < 2 {
        return Err(TableError::TooFewRows { rows: row_labels.len(), minimum: 2 });
    }

    let values = Array2::from_shape_vec((row_labels.len(), values_per_row), data)
        .map_err(|_| TableError::HeaderMismatch { labels: column_labels.len(), values: values_per_row })?;

    Ok(LabeledTable { column_labels, row_labels, values })
}

#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn test_paired_rows_follow_newlines() {
        let table = parse_paired_table("1\t2\n2\t4\n3\t6\n").unwrap();

        assert_eq!(table.rows(), 3);
        assert_eq!(table.x, vec![1., 2., 3.]);
        assert_eq!(table.y, vec![2., 4., 6.]);
        assert_eq!(table.trailing, None);
    }

    #[test]
    fn test_paired_trailing_text_is_not_a_row() {
        let table = parse_paired_table("1\t2\n2\t4\n3\t6").unwrap();

        assert_eq!(table.rows(), 2);
        assert_eq!(table.trailing.as_deref(), Some("3\t6"));
    }

    #[test]
    fn test_paired_crlf_and_padding() {
        let table = parse_paired_table(" 1.5 \t -2\r\n3\t4e1\r\n").unwrap();

        assert_eq!(table.x, vec![1.5, 3.]);
        assert_eq!(table.y, vec![-2., 40.]);
    }

    #[test]
    fn test_paired_invalid_number_names_cell() {
        match parse_paired_table("1\t2\n2\tfour\n") {
            Err(TableError::InvalidNumber { line, column, text }) => {
                assert_eq!((line, column, text.as_str()), (2, 2, "four"));
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_paired_ragged_and_blank_rows() {
        assert!(matches!(
            parse_paired_table("1\t2\n2\t4\t6\n"),
            Err(TableError::RaggedRow { line: 2, expected: 2, found: 3 })
        ));
        assert!(matches!(
            parse_paired_table("1\t2\n\n3\t4\n"),
            Err(TableError::RaggedRow { line: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_names_line() {
        assert_eq!(decode(b"1\t2\n".to_vec()).unwrap(), "1\t2\n");
        assert!(matches!(
            decode(b"1\t2\n2\t4\n3\t6\n#\xe9\n".to_vec()),
            Err(TableError::InvalidEncoding { line: 4 })
        ));
    }

    #[test]
    fn test_labeled_with_corner_label() {
        let table = parse_labeled_table("id a b c\nr1 1 2 3\nr2 2 4 7\n").unwrap();

        assert_eq!(table.column_labels, vec!["a", "b", "c"]);
        assert_eq!(table.row_labels, vec!["r1", "r2"]);
        assert_eq!(table.row(1).to_vec(), vec![2., 4., 7.]);
    }

    #[test]
    fn test_labeled_without_corner_label() {
        let table = parse_labeled_table("\ta\tb\tc\nr1\t1\t2\t3\nr2\t2\t4\t7\nr3\t0\t1\t0").unwrap();

        assert_eq!(table.column_labels, vec!["a", "b", "c"]);
        assert_eq!(table.rows(), 3);
        assert_eq!(table.columns(), 3);
    }

    #[test]
    fn test_labeled_errors() {
        assert!(matches!(parse_labeled_table(""), Err(TableError::Empty)));
        assert!(matches!(
            parse_labeled_table("a b\nr1 1 2\n"),
            Err(TableError::TooFewRows { rows: 1, minimum: 2 })
        ));
        assert!(matches!(
            parse_labeled_table("a b c d e\nr1 1 2\nr2 3 4\n"),
            Err(TableError::HeaderMismatch { labels: 5, values: 2 })
        ));
        assert!(matches!(
            parse_labeled_table("a b\nr1 1 2\nr2 3\n"),
            Err(TableError::RaggedRow { line: 3, expected: 3, found: 2 })
        ));
        assert!(matches!(
            parse_labeled_table("a b\nr1 1 2\nr2 3 x\n"),
            Err(TableError::InvalidNumber { line: 3, column: 3, .. })
        ));
    }
}

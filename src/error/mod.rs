//! Error sets for reading tables, computing coefficients and running permutation tests.

use std::path::PathBuf;
use thiserror::Error;


/// Errors that can occur while reading a delimited table
#[derive(Error, Debug)]
pub enum TableError {
    /// File cannot be opened or read
    #[error("Cannot open file \"{}\"", .path.display())]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File was read but is not valid UTF-8 text
    #[error("Line {line}: text is not valid UTF-8")]
    InvalidEncoding { line: usize },
    /// File contains no rows at all
    #[error("Table is empty")]
    Empty,
    /// Row does not have the expected number of fields
    #[error("Line {line}: expected {expected} fields but found {found}")]
    RaggedRow { line: usize, expected: usize, found: usize },
    /// Cell is not a finite number
    #[error("Line {line}, column {column}: cannot parse \"{text}\" as a number")]
    InvalidNumber { line: usize, column: usize, text: String },
    /// Header has a number of labels that fits neither layout
    #[error("Header has {labels} labels but data rows have {values} values")]
    HeaderMismatch { labels: usize, values: usize },
    /// Table has fewer data rows than a correlation needs
    #[error("Table has {rows} data rows, at least {minimum} are required")]
    TooFewRows { rows: usize, minimum: usize },
    /// Malformed record reported by the csv reader
    #[error("Cannot read record: {0}")]
    Record(#[from] csv::Error),
}

/// Errors that can occur when calculating a correlation coefficient
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Series do not have the same number of observations
    #[error("Series are not the same length ({x_len} and {y_len})")]
    SeriesAreNotSameLength { x_len: usize, y_len: usize },
    /// Correlation needs at least two paired observations
    #[error("Correlation requires at least 2 observations, found {0}")]
    TooFewObservations(usize),
    /// Series has zero variance so the coefficient is undefined
    #[error("Series {series} has zero variance, correlation is undefined")]
    ZeroVariance { series: String },
    /// Series contains a NaN or infinite value
    #[error("Series {series} contains a non-finite value")]
    NonFinite { series: String },
    /// Deviations of the series from its mean are too large to represent
    #[error("Series {series} has values too far apart to correlate")]
    Overflow { series: String },
    /// Coefficient came out as NaN or infinite
    #[error("Correlation coefficient is undefined")]
    UndefinedCoefficient,
}

/// Errors specific to the permutation significance test
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PermutationError {
    /// Permutation budget must be positive
    #[error("Maximum number of permutations must be greater than 0")]
    ZeroBudget,
}

/// Errors from reading command line arguments or an argument file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Argument file cannot be read
    #[error("Cannot read argument file \"{}\": {source}", .path.display())]
    CannotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Argument file is not valid TOML
    #[error("Cannot parse argument file: {0}")]
    Toml(#[from] toml::de::Error),
    /// Table for this program is missing from the argument file
    #[error("Argument file has no [{0}] table")]
    MissingTable(String),
    /// Required key is missing
    #[error("Missing required key '{0}'")]
    MissingKey(String),
    /// Key exists but holds the wrong kind of value
    #[error("Cannot parse {key} as {expected}")]
    InvalidValue { key: String, expected: &'static str },
    /// Positional permutation count is not a positive integer
    #[error("Cannot parse \"{0}\" as a maximum number of permutations")]
    InvalidPermutationCount(String),
}

/// A set of errors that may occur when using the library
#[derive(Error, Debug)]
pub enum CorcoefError {
    /// Errors related to table parsing
    #[error(transparent)]
    TableRelatedError(#[from] TableError),
    /// Errors related to coefficient calculation
    #[error(transparent)]
    CorrelationRelatedError(#[from] CorrelationError),
    /// Errors related to the permutation test
    #[error(transparent)]
    PermutationRelatedError(#[from] PermutationError),
    /// Errors related to configuration
    #[error(transparent)]
    ConfigRelatedError(#[from] ConfigError),
    /// Errors while rendering json output
    #[error("Cannot render output: {0}")]
    OutputRelatedError(#[from] serde_json::Error),
}

impl CorcoefError {
    /// Returns the path of the input file if this error means it could not be opened
    pub fn unopenable_path(&self) -> Option<&PathBuf> {
        match self {
            CorcoefError::TableRelatedError(TableError::CannotOpen { path, .. }) => Some(path),
            _ => None,
        }
    }
}

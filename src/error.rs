use rust_decimal::Decimal;
use thiserror::Error;

/// Any kind of error in the pipeline CSV parsing -> row parsing -> chart feed output.
///
/// Row numbers are 1-based and count data rows, not the header.
#[derive(Debug, Error)]
pub enum Error {
    #[error("row {row}: month '{value}' is not a valid YYYY-MM period")]
    InvalidMonth { row: usize, value: String },
    #[error("row {row}: field '{field}' is not a number: '{value}'")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("row {row}: field '{field}' must not be negative, got {value}")]
    NegativeAmount {
        row: usize,
        field: &'static str,
        value: Decimal,
    },
    #[error("row {row}: month '{value}' cannot be indexed from base year {base_year}")]
    PeriodOutOfRange {
        row: usize,
        value: String,
        base_year: i32,
    },
    #[error("amount overflow in '{field}' at period {period} ({label})")]
    Overflow {
        period: i32,
        label: String,
        field: &'static str,
    },
    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
    #[error("error during CSV processing: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

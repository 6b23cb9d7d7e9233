//! Load debts from CSV
//!
//! Expected columns: `name,balance,apr,minimum_payment`, with `apr` as a
//! decimal fraction (0.199 for 19.9%).

use csv::{Reader, Trim};
use std::path::Path;
use thiserror::Error;

use super::data::Debt;
use crate::error::EngineError;

/// Errors raised while reading a debt file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open debt file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: {source}")]
    InvalidRow {
        /// 1-based data row number (header excluded)
        row: usize,
        #[source]
        source: EngineError,
    },

    #[error("Debt file contains no rows")]
    Empty,
}

/// Load all debts from a CSV file
pub fn load_debts<P: AsRef<Path>>(path: P) -> Result<Vec<Debt>, LoadError> {
    let file = std::fs::File::open(path)?;
    load_debts_from_reader(file)
}

/// Load debts from any reader (e.g., string buffer, request body)
pub fn load_debts_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Debt>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    read_rows(&mut csv_reader)
}

fn read_rows<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Vec<Debt>, LoadError> {
    let mut debts = Vec::new();

    for (i, result) in reader.deserialize().enumerate() {
        let debt: Debt = result?;
        debt.validate()
            .map_err(|source| LoadError::InvalidRow { row: i + 1, source })?;
        debts.push(debt);
    }

    if debts.is_empty() {
        return Err(LoadError::Empty);
    }
    Ok(debts)
}

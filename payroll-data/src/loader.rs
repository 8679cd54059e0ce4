use std::io::Read;

use payroll_core::{
    BracketTableError, NewTaxBracket, PayrollRepository, RepositoryError, TaxBracket,
    validate_tiling,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid bracket table: {0}")]
    InvalidTable(#[from] BracketTableError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the tax brackets CSV file.
///
/// Columns:
/// - `name`: label shown to users (e.g. `15% Bracket`)
/// - `min_income`: first annual income unit in the bracket
/// - `max_income`: last annual income unit (empty for the top bracket)
/// - `rate`: marginal rate as a decimal (e.g. 0.15 for 15%)
/// - `base_tax`: tax owed at the bracket's entry point
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub name: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

impl From<TaxBracketRecord> for NewTaxBracket {
    fn from(record: TaxBracketRecord) -> Self {
        NewTaxBracket {
            name: record.name.trim().to_string(),
            min_income: record.min_income,
            max_income: record.max_income,
            rate: record.rate,
            base_tax: record.base_tax,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables kept in CSV files.
///
/// A load is an administrative reseed: the file must describe a complete
/// table, and it replaces whatever table the store holds.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse tax bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Orders `records` by `min_income` and checks they tile `[0, inf)`.
    pub fn to_table(
        records: &[TaxBracketRecord]
    ) -> Result<Vec<NewTaxBracket>, TaxBracketLoaderError> {
        let mut table: Vec<NewTaxBracket> = records.iter().cloned().map(Into::into).collect();
        table.sort_by_key(|b| b.min_income);

        validate_tiling(&table)?;
        Ok(table)
    }

    /// Validates `records` and swaps them in as the new bracket table.
    ///
    /// Nothing is written when validation fails. Employees keep their rows;
    /// references to brackets that no longer exist are cleared by the store.
    pub async fn load<R: PayrollRepository + ?Sized>(
        repo: &R,
        records: &[TaxBracketRecord],
    ) -> Result<Vec<TaxBracket>, TaxBracketLoaderError> {
        let table = Self::to_table(records)?;

        let stored = repo.replace_tax_brackets(&table).await?;
        info!(count = stored.len(), "tax bracket table loaded");

        Ok(stored)
    }
}

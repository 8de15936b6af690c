//! CSV ingestion for the report datasets.
//!
//! One loader per dataset, all sharing the same reader configuration:
//! headers on, whitespace trimmed, parse failures reported with the line
//! number of the offending row. The records themselves (see `records`)
//! absorb the upstream schema inconsistencies, so the loaders stay thin.

use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::records::{
    InventorySnapshot, OrderLine, ReturnEvent, Review, SettlementTxn, TrafficDay,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (row_num, result) in csv_reader.deserialize().enumerate() {
        // +2: one for the header row, one for 1-based numbering.
        let record: T = result.map_err(|source| LoadError::Parse {
            line: row_num + 2,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    read_records(file)
}

pub fn load_inventory<R: Read>(reader: R) -> Result<Vec<InventorySnapshot>, LoadError> {
    read_records(reader)
}

pub fn load_inventory_file(path: impl AsRef<Path>) -> Result<Vec<InventorySnapshot>, LoadError> {
    read_file(path.as_ref())
}

pub fn load_orders<R: Read>(reader: R) -> Result<Vec<OrderLine>, LoadError> {
    read_records(reader)
}

pub fn load_orders_file(path: impl AsRef<Path>) -> Result<Vec<OrderLine>, LoadError> {
    read_file(path.as_ref())
}

pub fn load_settlements<R: Read>(reader: R) -> Result<Vec<SettlementTxn>, LoadError> {
    read_records(reader)
}

pub fn load_settlements_file(path: impl AsRef<Path>) -> Result<Vec<SettlementTxn>, LoadError> {
    read_file(path.as_ref())
}

pub fn load_traffic<R: Read>(reader: R) -> Result<Vec<TrafficDay>, LoadError> {
    read_records(reader)
}

pub fn load_traffic_file(path: impl AsRef<Path>) -> Result<Vec<TrafficDay>, LoadError> {
    read_file(path.as_ref())
}

pub fn load_returns<R: Read>(reader: R) -> Result<Vec<ReturnEvent>, LoadError> {
    read_records(reader)
}

pub fn load_returns_file(path: impl AsRef<Path>) -> Result<Vec<ReturnEvent>, LoadError> {
    read_file(path.as_ref())
}

pub fn load_reviews<R: Read>(reader: R) -> Result<Vec<Review>, LoadError> {
    read_records(reader)
}

pub fn load_reviews_file(path: impl AsRef<Path>) -> Result<Vec<Review>, LoadError> {
    read_file(path.as_ref())
}

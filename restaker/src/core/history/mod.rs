pub mod csv;
pub mod summary;

use std::path::PathBuf;
use std::str::FromStr;

use alloy::primitives::{B256, U256};
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

pub use csv::CsvHistory;
pub use summary::HistorySummary;

use crate::types::constant::HISTORY_COLUMNS;
use crate::types::units::{format_token, parse_token};
use crate::types::{RunResult, RunStatus};

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History file {path} is not accessible: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History file has an unexpected header: {0}")]
    UnexpectedHeader(String),

    #[error("Malformed history row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("History lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Append-only store of pass outcomes.
#[cfg_attr(test, mockall::automock)]
pub trait HistorySink: Send + Sync {
    /// Appends exactly one row. Never touches rows written before.
    fn append(&self, result: &RunResult) -> Result<(), HistoryError>;
}

/// One line of the history file, in [`HISTORY_COLUMNS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub timestamp: DateTime<Utc>,
    pub status: RunStatus,
    pub amount: U256,
    pub gas_cost: U256,
    pub tx_hash_1: Option<B256>,
    pub tx_hash_2: Option<B256>,
}

impl HistoryRow {
    pub fn header() -> String {
        HISTORY_COLUMNS.join(",")
    }

    /// Serialises the row as a single newline-terminated line.
    pub fn to_line(&self) -> String {
        let hash = |h: &Option<B256>| h.map(|h| h.to_string()).unwrap_or_default();
        format!(
            "{},{},{},{},{},{}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.status,
            format_token(self.amount),
            format_token(self.gas_cost),
            hash(&self.tx_hash_1),
            hash(&self.tx_hash_2),
        )
    }

    pub fn parse(line_no: usize, line: &str) -> Result<Self, HistoryError> {
        let malformed = |reason: String| HistoryError::MalformedRow { line: line_no, reason };
        let cells: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if cells.len() != HISTORY_COLUMNS.len() {
            return Err(malformed(format!("expected {} columns, got {}", HISTORY_COLUMNS.len(), cells.len())));
        }
        let hash = |cell: &str| -> Result<Option<B256>, HistoryError> {
            if cell.is_empty() {
                return Ok(None);
            }
            B256::from_str(cell).map(Some).map_err(|e| malformed(format!("bad tx hash {cell}: {e}")))
        };

        Ok(Self {
            timestamp: DateTime::parse_from_rfc3339(cells[0])
                .map_err(|e| malformed(format!("bad timestamp {}: {e}", cells[0])))?
                .with_timezone(&Utc),
            status: RunStatus::from_str(cells[1]).map_err(|e| malformed(format!("bad status {}: {e}", cells[1])))?,
            amount: parse_token(cells[2]).map_err(|e| malformed(format!("bad amount {}: {e}", cells[2])))?,
            gas_cost: parse_token(cells[3]).map_err(|e| malformed(format!("bad gas cost {}: {e}", cells[3])))?,
            tx_hash_1: hash(cells[4])?,
            tx_hash_2: hash(cells[5])?,
        })
    }
}

impl From<&RunResult> for HistoryRow {
    fn from(result: &RunResult) -> Self {
        let [tx_hash_1, tx_hash_2] = result.hashes_by_ordinal();
        Self {
            timestamp: result.timestamp,
            status: result.status,
            amount: result.amount,
            gas_cost: result.gas_cost,
            tx_hash_1,
            tx_hash_2,
        }
    }
}

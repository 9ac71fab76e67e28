//! Storage layer: the contract spreadsheet acting as system of record.
//!
//! Holds the fixed column layout, the row-number mapping, and the
//! [`RecordStore`] implementations.

use serde_json::Value;
use thiserror::Error;

pub mod layout;
pub mod memory;
pub mod sheets;

pub use layout::{header_row, sheet_row, Column, HEADER_ROWS};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("row {row} is outside the data range")]
    OutOfRange { row: usize },
}

/// One data row as read from the sheet, header excluded.
///
/// Trailing empty cells may be missing; [`SheetRow::cell`] treats them as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    cells: Vec<String>,
}

impl SheetRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    pub fn cell(&self, column: Column) -> &str {
        self.cells
            .get(column.index() - 1)
            .map(|s| s.trim())
            .unwrap_or("")
    }
}

#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every data row in sheet order. Position `i` is sheet row `sheet_row(i)`.
    async fn read_all_rows(&self) -> Result<Vec<SheetRow>, StoreError>;

    /// Writes the column headers when the sheet is completely empty.
    /// Returns `true` if the header was written.
    async fn ensure_header(&self) -> Result<bool, StoreError>;

    /// Appends one row; values are stored as given, never interpreted as formulas.
    async fn append_row(&self, values: Vec<Value>) -> Result<(), StoreError>;

    /// Overwrites a single cell. `row` is the 1-indexed sheet row.
    async fn update_cell(&self, row: usize, column: Column, value: &str) -> Result<(), StoreError>;
}

/// Renders a cell value as the text the ledger works with.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

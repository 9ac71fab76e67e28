//! In-memory record store used by tests and dry runs.
//!
//! Holds the whole sheet, header included, and reads it the way
//! [`crate::sheets::SheetsStore`] does: the first `HEADER_ROWS` rows are
//! never returned as data.

use crate::layout::{header_row, Column, HEADER_ROWS};
use crate::{cell_text, RecordStore, SheetRow, StoreError};
use serde_json::Value;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    sheet: Mutex<Vec<Vec<String>>>,
}

impl MemoryStore {
    /// A brand-new sheet with no header and no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sheet that already carries the header followed by `rows`.
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        let mut sheet = vec![header_row()];
        sheet.extend(rows);
        Self {
            sheet: Mutex::new(sheet),
        }
    }

    /// Snapshot of the data rows, header excluded.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().iter().skip(HEADER_ROWS).cloned().collect()
    }

    /// Snapshot of every sheet row, header included.
    pub fn sheet(&self) -> Vec<Vec<String>> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<String>>> {
        self.sheet.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn read_all_rows(&self) -> Result<Vec<SheetRow>, StoreError> {
        Ok(self
            .lock()
            .iter()
            .skip(HEADER_ROWS)
            .cloned()
            .map(SheetRow::new)
            .collect())
    }

    async fn ensure_header(&self) -> Result<bool, StoreError> {
        let mut sheet = self.lock();
        if sheet.iter().flatten().any(|c| !c.is_empty()) {
            return Ok(false);
        }
        sheet.clear();
        sheet.push(header_row());
        Ok(true)
    }

    async fn append_row(&self, values: Vec<Value>) -> Result<(), StoreError> {
        self.lock().push(values.iter().map(cell_text).collect());
        Ok(())
    }

    async fn update_cell(&self, row: usize, column: Column, value: &str) -> Result<(), StoreError> {
        if row <= HEADER_ROWS {
            return Err(StoreError::OutOfRange { row });
        }
        let mut sheet = self.lock();
        let cells = sheet
            .get_mut(row - 1)
            .ok_or(StoreError::OutOfRange { row })?;
        let col = column.index() - 1;
        if cells.len() <= col {
            cells.resize(col + 1, String::new());
        }
        cells[col] = value.to_string();
        Ok(())
    }
}

//! Google Sheets v4 client for the contract sheet.

use crate::layout::{a1_cell, full_range, header_range, header_row, Column, HEADER_ROWS};
use crate::{cell_text, RecordStore, SheetRow, StoreError};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

#[derive(Clone)]
pub struct SheetsConfig {
    pub api_base: String,
    pub access_token: String,
    pub spreadsheet_id: String,
    /// Worksheet title; the first worksheet is used when unset.
    pub worksheet: Option<String>,
}

#[derive(Clone)]
pub struct SheetsStore {
    client: Client,
    cfg: Arc<SheetsConfig>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct ValuesBody {
    values: Vec<Vec<Value>>,
}

/// Cells are written verbatim so filename text is never evaluated as a formula.
const VALUE_INPUT: (&str, &str) = ("valueInputOption", "RAW");

impl SheetsStore {
    pub fn new(cfg: SheetsConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(SheetsConfig {
                api_base: cfg.api_base.trim_end_matches('/').to_string(),
                ..cfg
            }),
        }
    }

    fn range(&self, a1: &str) -> String {
        match &self.cfg.worksheet {
            Some(name) => format!("'{}'!{}", name.replace('\'', "''"), a1),
            None => a1.to_string(),
        }
    }

    fn values_url(&self, segment: &str) -> Result<Url, StoreError> {
        let base = format!(
            "{}/v4/spreadsheets/{}/values",
            self.cfg.api_base, self.cfg.spreadsheet_id
        );
        let mut url = Url::parse(&base).map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::RequestFailed(format!("cannot build url from {base}")))?
            .push(segment);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl RecordStore for SheetsStore {
    async fn read_all_rows(&self) -> Result<Vec<SheetRow>, StoreError> {
        let url = self.values_url(&self.range(&full_range()))?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.cfg.access_token)
            .query(&[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "UNFORMATTED_VALUE"),
                ("dateTimeRenderOption", "FORMATTED_STRING"),
            ])
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        let range: ValueRange = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        let rows: Vec<SheetRow> = range
            .values
            .into_iter()
            .skip(HEADER_ROWS)
            .map(|cells| SheetRow::new(cells.iter().map(cell_text).collect()))
            .collect();
        debug!(rows = rows.len(), "read sheet rows");
        Ok(rows)
    }

    async fn ensure_header(&self) -> Result<bool, StoreError> {
        let range = self.range(&header_range());
        let resp = self
            .client
            .get(self.values_url(&range)?)
            .bearer_auth(&self.cfg.access_token)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        let existing: ValueRange = check_status(resp)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        if existing.values.iter().flatten().any(|v| !cell_text(v).is_empty()) {
            return Ok(false);
        }

        let body = ValuesBody {
            values: vec![header_row().into_iter().map(Value::String).collect()],
        };
        let resp = self
            .client
            .put(self.values_url(&range)?)
            .bearer_auth(&self.cfg.access_token)
            .query(&[VALUE_INPUT])
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        check_status(resp).await?;
        info!("wrote header row to empty sheet");
        Ok(true)
    }

    async fn append_row(&self, values: Vec<Value>) -> Result<(), StoreError> {
        let url = self.values_url(&format!("{}:append", self.range(&full_range())))?;
        let body = ValuesBody {
            values: vec![values],
        };
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.cfg.access_token)
            .query(&[VALUE_INPUT, ("insertDataOption", "INSERT_ROWS")])
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }

    async fn update_cell(&self, row: usize, column: Column, value: &str) -> Result<(), StoreError> {
        if row <= HEADER_ROWS {
            return Err(StoreError::OutOfRange { row });
        }
        let url = self.values_url(&self.range(&a1_cell(row, column)))?;
        let body = ValuesBody {
            values: vec![vec![Value::String(value.to_string())]],
        };
        let resp = self
            .client
            .put(url)
            .bearer_auth(&self.cfg.access_token)
            .query(&[VALUE_INPUT])
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, StoreError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Server {
        status: status.as_u16(),
        body,
    })
}

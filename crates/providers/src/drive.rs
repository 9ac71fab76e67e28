//! Google Drive v3 client: folder listing, link sharing and spreadsheet lookup.

use crate::{DriveFile, FileStorage, ProviderError};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
const PDF_MIME: &str = "application/pdf";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const PAGE_SIZE: &str = "1000";

#[derive(Clone)]
pub struct DriveConfig {
    pub api_base: String,
    pub access_token: String,
}

#[derive(Clone)]
pub struct DriveClient {
    client: Client,
    cfg: Arc<DriveConfig>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

impl DriveClient {
    pub fn new(cfg: DriveConfig) -> Self {
        Self {
            client: Client::new(),
            cfg: Arc::new(DriveConfig {
                api_base: cfg.api_base.trim_end_matches('/').to_string(),
                access_token: cfg.access_token,
            }),
        }
    }

    /// Looks up a spreadsheet by its title. Returns the first match.
    pub async fn find_spreadsheet(&self, name: &str) -> Result<Option<DriveFile>, ProviderError> {
        let query = format!(
            "name = {} and mimeType = '{}' and trashed = false",
            quote_literal(name),
            SPREADSHEET_MIME
        );
        let files = self.list_files(&query).await?;
        Ok(files.into_iter().next())
    }

    async fn list_files(&self, query: &str) -> Result<Vec<DriveFile>, ProviderError> {
        let url = format!("{}/drive/v3/files", self.cfg.api_base);
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut params = vec![
                ("q", query.to_string()),
                ("fields", "nextPageToken, files(id, name)".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.cfg.access_token)
                .query(&params)
                .send()
                .await
                .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
            let page: FileListResponse = check_status(resp)
                .await?
                .json()
                .await
                .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
            debug!(count = page.files.len(), "listed drive page");
            files.extend(page.files);
            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }
        Ok(files)
    }
}

#[async_trait::async_trait]
impl FileStorage for DriveClient {
    async fn list_pdf_files(&self, folder_id: &str) -> Result<Vec<DriveFile>, ProviderError> {
        let query = format!(
            "{} in parents and mimeType = '{}'",
            quote_literal(folder_id),
            PDF_MIME
        );
        self.list_files(&query).await
    }

    async fn grant_public_read(&self, file_id: &str) -> Result<(), ProviderError> {
        #[derive(serde::Serialize)]
        struct PermissionRequest<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
            role: &'a str,
        }

        let resp = self
            .client
            .post(format!(
                "{}/drive/v3/files/{}/permissions",
                self.cfg.api_base, file_id
            ))
            .bearer_auth(&self.cfg.access_token)
            .query(&[("fields", "id")])
            .json(&PermissionRequest {
                kind: "anyone",
                role: "reader",
            })
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
        check_status(resp).await?;
        Ok(())
    }
}

async fn check_status(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::Server {
        status: status.as_u16(),
        body,
    })
}

/// Quotes a value for use inside a Drive search query.
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

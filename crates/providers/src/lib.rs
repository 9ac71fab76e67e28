//! Collaborator abstractions for the file store and mail transport.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod drive;
pub mod mailer;
pub mod memory;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("invalid mail address: {0}")]
    InvalidAddress(String),
    #[error("mail delivery failed: {0}")]
    Mail(String),
}

/// A file listed from the watched folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[async_trait::async_trait]
pub trait FileStorage: Send + Sync {
    /// Lists every PDF directly inside `folder_id`.
    async fn list_pdf_files(&self, folder_id: &str) -> Result<Vec<DriveFile>, ProviderError>;

    /// Makes the file readable by anyone holding the link.
    async fn grant_public_read(&self, file_id: &str) -> Result<(), ProviderError>;
}

#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), ProviderError>;
}

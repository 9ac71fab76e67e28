//! In-memory collaborators for tests and dry runs.

use crate::{DriveFile, FileStorage, Notifier, OutgoingEmail, ProviderError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryDrive {
    files: Mutex<Vec<DriveFile>>,
    shared: Mutex<Vec<String>>,
}

impl MemoryDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, id: &str, name: &str) -> Self {
        self.add_file(id, name);
        self
    }

    pub fn add_file(&self, id: &str, name: &str) {
        lock(&self.files).push(DriveFile {
            id: id.to_string(),
            name: name.to_string(),
        });
    }

    /// Ids that were granted public read access, in call order.
    pub fn shared(&self) -> Vec<String> {
        lock(&self.shared).clone()
    }
}

#[async_trait::async_trait]
impl FileStorage for MemoryDrive {
    async fn list_pdf_files(&self, _folder_id: &str) -> Result<Vec<DriveFile>, ProviderError> {
        Ok(lock(&self.files).clone())
    }

    async fn grant_public_read(&self, file_id: &str) -> Result<(), ProviderError> {
        if !lock(&self.files).iter().any(|f| f.id == file_id) {
            return Err(ProviderError::Server {
                status: 404,
                body: format!("file not found: {file_id}"),
            });
        }
        lock(&self.shared).push(file_id.to_string());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail until reset.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        lock(&self.sent).clone()
    }
}

#[async_trait::async_trait]
impl Notifier for MemoryMailer {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<(), ProviderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Mail("relay unavailable".into()));
        }
        lock(&self.sent).push(email.clone());
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

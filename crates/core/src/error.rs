use providers::ProviderError;
use storage::StoreError;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input does not follow the contract filename grammar or a cell is malformed.
    #[error("format error in {input:?}: {reason}")]
    Format { input: String, reason: String },

    #[error("unrecognised date {input:?}")]
    DateFormat { input: String },

    #[error("file storage request failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("record store request failed: {0}")]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn format(input: &str, reason: impl Into<String>) -> Self {
        LedgerError::Format {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn date(input: &str) -> Self {
        LedgerError::DateFormat {
            input: input.to_string(),
        }
    }
}

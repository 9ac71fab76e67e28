use crate::error::LedgerError;
use crate::reminder::{DigestEnvelope, DEFAULT_SUBJECT};
use serde::{Deserialize, Serialize};

pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";
const ENV_PREFIX: &str = "LEDGER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub drive: DriveSettings,
    pub sheet: SheetSettings,
    /// Only `remind` needs mail settings.
    #[serde(default)]
    pub mail: MailSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveSettings {
    /// Folder watched for contract PDFs.
    pub folder_id: String,
    #[serde(default = "default_drive_api")]
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSettings {
    /// Spreadsheet title, resolved through Drive when no id is given.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default)]
    pub worksheet: Option<String>,
    #[serde(default = "default_sheets_api")]
    pub api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub app_password: String,
    /// Defaults to `username`.
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            app_password: String::new(),
            from: None,
            to: Vec::new(),
            subject: default_subject(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_drive_api() -> String {
    providers::drive::DEFAULT_API_BASE.to_string()
}

fn default_sheets_api() -> String {
    storage::sheets::DEFAULT_API_BASE.to_string()
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

impl AppConfig {
    /// OAuth token for the Google APIs, from config or `GOOGLE_ACCESS_TOKEN`.
    pub fn access_token(&self) -> Result<String, LedgerError> {
        self.auth
            .access_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                LedgerError::Config(format!(
                    "no access token: set auth.access_token or {ACCESS_TOKEN_ENV}"
                ))
            })
    }

    pub fn envelope(&self) -> DigestEnvelope {
        DigestEnvelope {
            from: self
                .mail
                .from
                .clone()
                .unwrap_or_else(|| self.mail.username.clone()),
            to: self.mail.to.clone(),
            subject: self.mail.subject.clone(),
        }
    }
}

/// Loads `path` (or `config/default` when absent) and overlays `LEDGER__*`
/// environment variables, e.g. `LEDGER__MAIL__APP_PASSWORD`.
/// `LEDGER__MAIL__TO` takes a comma-separated recipient list.
pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    load_with_env(path, None)
}

/// Like [`load`], reading variables from `env` instead of the process
/// environment when given.
fn load_with_env(
    path: Option<&str>,
    env: Option<config::Map<String, String>>,
) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    settings = settings.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("mail.to")
            .source(env),
    );
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

//! Wires configuration to the concrete Google and SMTP clients.

use crate::config::AppConfig;
use crate::error::LedgerError;
use crate::reminder::{self, ReminderReport};
use crate::sync::{self, SyncReport};
use anyhow::Context;
use chrono::NaiveDate;
use providers::drive::{DriveClient, DriveConfig};
use providers::mailer::{SmtpConfig, SmtpMailer};
use storage::sheets::{SheetsConfig, SheetsStore};
use tracing::info;

pub fn build_drive(config: &AppConfig) -> anyhow::Result<DriveClient> {
    Ok(DriveClient::new(DriveConfig {
        api_base: config.drive.api_base.clone(),
        access_token: config.access_token()?,
    }))
}

/// Opens the contract sheet, looking the spreadsheet up by title when no id is configured.
pub async fn build_store(config: &AppConfig, drive: &DriveClient) -> anyhow::Result<SheetsStore> {
    let spreadsheet_id = match (&config.sheet.spreadsheet_id, &config.sheet.name) {
        (Some(id), _) => id.clone(),
        (None, Some(name)) => {
            let found = drive
                .find_spreadsheet(name)
                .await
                .with_context(|| format!("look up spreadsheet {name:?}"))?
                .ok_or_else(|| LedgerError::Config(format!("spreadsheet {name:?} not found")))?;
            info!(name = %name, id = %found.id, "resolved spreadsheet");
            found.id
        }
        (None, None) => {
            return Err(LedgerError::Config(
                "set sheet.spreadsheet_id or sheet.name".into(),
            )
            .into())
        }
    };
    Ok(SheetsStore::new(SheetsConfig {
        api_base: config.sheet.api_base.clone(),
        access_token: config.access_token()?,
        spreadsheet_id,
        worksheet: config.sheet.worksheet.clone(),
    }))
}

pub fn build_mailer(config: &AppConfig) -> anyhow::Result<SmtpMailer> {
    if config.mail.username.is_empty() {
        return Err(LedgerError::Config("mail.username is empty".into()).into());
    }
    if config.mail.app_password.is_empty() {
        return Err(LedgerError::Config("mail.app_password is empty".into()).into());
    }
    let mailer = SmtpMailer::new(SmtpConfig {
        host: config.mail.smtp_host.clone(),
        port: config.mail.smtp_port,
        username: config.mail.username.clone(),
        password: config.mail.app_password.clone(),
    })
    .context("smtp setup")?;
    Ok(mailer)
}

pub async fn run_sync(config: &AppConfig) -> anyhow::Result<SyncReport> {
    if config.drive.folder_id.is_empty() {
        return Err(LedgerError::Config("drive.folder_id is empty".into()).into());
    }
    let drive = build_drive(config)?;
    let store = build_store(config, &drive).await?;
    let report = sync::sync_folder(&config.drive.folder_id, &drive, &store)
        .await
        .context("folder sync")?;
    Ok(report)
}

pub async fn run_reminders(config: &AppConfig, today: NaiveDate) -> anyhow::Result<ReminderReport> {
    let drive = build_drive(config)?;
    let store = build_store(config, &drive).await?;
    let mailer = build_mailer(config)?;
    let report = reminder::scan_reminders(&store, &mailer, &config.envelope(), today)
        .await
        .context("reminder scan")?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthSettings, DriveSettings, MailSettings, SheetSettings};

    fn config(mail: MailSettings) -> AppConfig {
        AppConfig {
            drive: DriveSettings {
                folder_id: "folder".into(),
                api_base: providers::drive::DEFAULT_API_BASE.into(),
            },
            sheet: SheetSettings {
                name: None,
                spreadsheet_id: Some("sheet".into()),
                worksheet: None,
                api_base: storage::sheets::DEFAULT_API_BASE.into(),
            },
            mail,
            auth: AuthSettings::default(),
        }
    }

    #[test]
    fn mailer_needs_credentials() {
        let err = build_mailer(&config(MailSettings::default())).unwrap_err();
        assert!(err.to_string().contains("mail.username"));

        let no_password = MailSettings {
            username: "billing@example.com".into(),
            ..MailSettings::default()
        };
        let err = build_mailer(&config(no_password)).unwrap_err();
        assert!(err.to_string().contains("mail.app_password"));
    }
}

//! Folder sync: records every not-yet-seen contract PDF in the sheet.

use crate::error::LedgerResult;
use crate::filename::parse_contract_filename;
use crate::links::{extract_file_id, viewer_url};
use crate::models::ContractRecord;
use providers::FileStorage;
use serde::Serialize;
use std::collections::HashSet;
use storage::{Column, RecordStore, SheetRow};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file_id: String,
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub listed: usize,
    pub already_recorded: usize,
    pub added: Vec<ContractRecord>,
    pub failures: Vec<FileFailure>,
}

impl SyncReport {
    pub fn appended(&self) -> usize {
        self.added.len()
    }
}

/// File ids referenced by existing rows. Rows without a usable link are ignored.
pub fn known_file_ids(rows: &[SheetRow]) -> HashSet<String> {
    let mut ids = HashSet::new();
    for row in rows {
        let url = row.cell(Column::FileUrl);
        if url.is_empty() {
            continue;
        }
        match extract_file_id(url) {
            Some(id) => {
                ids.insert(id.to_string());
            }
            None => warn!(url, "row link carries no file id, ignoring"),
        }
    }
    ids
}

/// Appends a row for each PDF in `folder_id` that the store does not reference yet.
///
/// Names that fail to parse are reported in [`SyncReport::failures`] and do not
/// stop the batch. Collaborator failures abort the run; rows appended before
/// the failure stay in place.
pub async fn sync_folder(
    folder_id: &str,
    files: &dyn FileStorage,
    store: &dyn RecordStore,
) -> LedgerResult<SyncReport> {
    let listing = files.list_pdf_files(folder_id).await?;
    store.ensure_header().await?;
    let mut known = known_file_ids(&store.read_all_rows().await?);
    info!(files = listing.len(), known = known.len(), "syncing folder");

    let mut report = SyncReport {
        listed: listing.len(),
        ..SyncReport::default()
    };

    for file in listing {
        if known.contains(&file.id) {
            report.already_recorded += 1;
            continue;
        }

        let parsed = match parse_contract_filename(&file.name) {
            Ok(record) => record,
            Err(e) => {
                warn!(file_id = %file.id, file_name = %file.name, error = %e, "skipping unparsable file");
                report.failures.push(FileFailure {
                    file_id: file.id,
                    file_name: file.name,
                    error: e.to_string(),
                });
                continue;
            }
        };

        files.grant_public_read(&file.id).await?;
        let record = parsed.with_file_url(viewer_url(&file.id));
        store.append_row(record.to_row()).await?;
        debug!(file_id = %file.id, title = %record.title, "recorded contract");

        known.insert(file.id);
        report.added.push(record);
    }

    info!(
        appended = report.appended(),
        failed = report.failures.len(),
        "folder sync complete"
    );
    Ok(report)
}

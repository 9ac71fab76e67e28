//! Overdue scan and reminder digest.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{format_date, is_flag_set, parse_amount, parse_sheet_date, FLAG_YES};
use chrono::NaiveDate;
use providers::{Notifier, OutgoingEmail};
use serde::Serialize;
use storage::{sheet_row, Column, RecordStore, SheetRow};
use tracing::{info, warn};

pub const DEFAULT_SUBJECT: &str = "催帳提醒通知";

/// Sender, recipients and subject of the digest mail.
#[derive(Debug, Clone)]
pub struct DigestEnvelope {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverdueContract {
    /// 1-indexed sheet row.
    pub row: usize,
    pub title: String,
    pub due_date: NaiveDate,
    pub amount_due: u64,
    pub amount_received: u64,
    pub previously_reminded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReminderOutcome {
    NothingToSend,
    Sent {
        messages: Vec<String>,
        marked_rows: Vec<usize>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReminderReport {
    pub outcome: ReminderOutcome,
    pub failures: Vec<RowFailure>,
}

/// Strictly past due and not fully paid.
pub fn qualifies(due_date: NaiveDate, amount_due: u64, amount_received: u64, today: NaiveDate) -> bool {
    today > due_date && amount_received < amount_due
}

/// Splits rows into qualifying contracts and rows that could not be read.
/// Rows without a due date are skipped silently.
pub fn find_overdue(rows: &[SheetRow], today: NaiveDate) -> (Vec<OverdueContract>, Vec<RowFailure>) {
    let mut overdue = Vec::new();
    let mut failures = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let due_cell = row.cell(Column::DueDate);
        if due_cell.is_empty() {
            continue;
        }
        match read_row(i, row, due_cell) {
            Ok(contract) => {
                if qualifies(contract.due_date, contract.amount_due, contract.amount_received, today) {
                    overdue.push(contract);
                }
            }
            Err(e) => {
                warn!(row = sheet_row(i), error = %e, "skipping unreadable row");
                failures.push(RowFailure {
                    row: sheet_row(i),
                    title: row.cell(Column::Title).to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
    (overdue, failures)
}

fn read_row(index: usize, row: &SheetRow, due_cell: &str) -> LedgerResult<OverdueContract> {
    Ok(OverdueContract {
        row: sheet_row(index),
        title: row.cell(Column::Title).to_string(),
        due_date: parse_sheet_date(due_cell)?,
        amount_due: parse_amount(row.cell(Column::AmountDue))?,
        amount_received: parse_amount(row.cell(Column::AmountReceived))?,
        previously_reminded: is_flag_set(row.cell(Column::ReminderSent)),
    })
}

pub fn compose_message(contract: &OverdueContract) -> String {
    let mut message = format!(
        "【催帳提醒】\n合約：「{}」已於 {} 到期未全額收款\n應收：{} 元，已收：{} 元",
        contract.title,
        format_date(contract.due_date),
        contract.amount_due,
        contract.amount_received
    );
    if contract.previously_reminded {
        message.push_str("\n（先前已催帳）");
    }
    message
}

pub fn compose_digest(messages: &[String]) -> String {
    messages.join("\n\n")
}

/// Scans the store, mails one digest for every qualifying contract and then
/// flags those rows as reminded.
///
/// Rows are only flagged once the mail went out. If sending fails the error is
/// returned and the store is left untouched, so the next scan picks the same
/// contracts up again.
pub async fn scan_reminders(
    store: &dyn RecordStore,
    notifier: &dyn Notifier,
    envelope: &DigestEnvelope,
    today: NaiveDate,
) -> LedgerResult<ReminderReport> {
    let rows = store.read_all_rows().await?;
    let (overdue, failures) = find_overdue(&rows, today);
    info!(rows = rows.len(), overdue = overdue.len(), unreadable = failures.len(), "reminder scan");

    if overdue.is_empty() {
        return Ok(ReminderReport {
            outcome: ReminderOutcome::NothingToSend,
            failures,
        });
    }

    if envelope.to.is_empty() {
        return Err(LedgerError::Config("no reminder recipients configured".into()));
    }

    let messages: Vec<String> = overdue.iter().map(compose_message).collect();
    let email = OutgoingEmail {
        from: envelope.from.clone(),
        to: envelope.to.clone(),
        subject: envelope.subject.clone(),
        body: compose_digest(&messages),
    };
    notifier.send_email(&email).await?;

    let sent_on = format_date(today);
    let mut marked_rows = Vec::with_capacity(overdue.len());
    for contract in &overdue {
        store.update_cell(contract.row, Column::ReminderSent, FLAG_YES).await?;
        store
            .update_cell(contract.row, Column::ReminderSentDate, &sent_on)
            .await?;
        marked_rows.push(contract.row);
    }
    info!(sent = messages.len(), "reminder digest delivered");

    Ok(ReminderReport {
        outcome: ReminderOutcome::Sent {
            messages,
            marked_rows,
        },
        failures,
    })
}

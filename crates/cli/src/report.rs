//! Operator-facing rendering of sync and reminder results.

use ledger_core::models::{format_date, ContractRecord};
use ledger_core::reminder::{ReminderOutcome, ReminderReport};
use ledger_core::sync::SyncReport;
use serde_json::{json, Value};

pub fn sync_lines(report: &SyncReport) -> Vec<String> {
    let mut lines = vec![format!(
        "wrote {} new contract(s) ({} listed, {} already recorded)",
        report.appended(),
        report.listed,
        report.already_recorded
    )];
    for record in &report.added {
        lines.push(format!("  + {} (due {})", record.title, format_date(record.due_date)));
    }
    for failure in &report.failures {
        lines.push(format!("  ! {} -> {}", failure.file_name, failure.error));
    }
    lines
}

pub fn sync_json(report: &SyncReport) -> Value {
    json!({
        "status": "ok",
        "appended": report.appended(),
        "listed": report.listed,
        "already_recorded": report.already_recorded,
        "added": report.added,
        "failures": report.failures,
    })
}

pub fn reminder_lines(report: &ReminderReport) -> Vec<String> {
    let mut lines = Vec::new();
    match &report.outcome {
        ReminderOutcome::NothingToSend => lines.push("nothing due, no reminder sent".to_string()),
        ReminderOutcome::Sent { messages, .. } => {
            let noun = if messages.len() == 1 { "entry" } else { "entries" };
            lines.push(format!("sent reminder with {} {noun}", messages.len()));
            for message in messages {
                lines.push(String::new());
                lines.push(message.clone());
            }
        }
    }
    for failure in &report.failures {
        lines.push(format!("  ! row {} ({}): {}", failure.row, failure.title, failure.error));
    }
    lines
}

pub fn reminder_json(report: &ReminderReport) -> Value {
    let mut value = json!(report.outcome);
    if let Some(obj) = value.as_object_mut() {
        obj.insert("failures".into(), json!(report.failures));
    }
    value
}

pub fn record_lines(record: &ContractRecord) -> Vec<String> {
    vec![
        format!("title:      {}", record.title),
        format!("partner:    {}", record.partner),
        format!("contact:    {}", record.contact),
        format!("budget:     {}", record.budget_amount),
        format!("fee:        {}%", record.fee_percent),
        format!("amount due: {}", record.amount_due),
        format!("signed:     {}", format_date(record.sign_date)),
        format!("due:        {}", format_date(record.due_date)),
    ]
}

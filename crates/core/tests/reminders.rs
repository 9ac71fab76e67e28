use chrono::NaiveDate;
use ledger_core::error::LedgerError;
use ledger_core::reminder::{scan_reminders, DigestEnvelope, ReminderOutcome, DEFAULT_SUBJECT};
use providers::memory::MemoryMailer;
use storage::memory::MemoryStore;
use storage::Column;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn envelope() -> DigestEnvelope {
    DigestEnvelope {
        from: "billing@example.com".into(),
        to: vec!["boss@example.com".into()],
        subject: DEFAULT_SUBJECT.into(),
    }
}

fn contract(title: &str, due: &str, amount_due: u64, received: u64) -> Vec<String> {
    vec![
        title.to_string(),
        "Foo".into(),
        "Bar".into(),
        "2023-01-01".into(),
        "10%".into(),
        (amount_due * 10).to_string(),
        amount_due.to_string(),
        received.to_string(),
        due.to_string(),
        format!("https://drive.google.com/file/d/{title}/view?usp=sharing"),
    ]
}

fn cell(store: &MemoryStore, index: usize, column: Column) -> String {
    store.rows()[index]
        .get(column.index() - 1)
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
async fn overdue_underpaid_contract_is_reminded() {
    let store = MemoryStore::with_rows(vec![contract("Acme", "2024-01-01", 100, 50)]);
    let mailer = MemoryMailer::new();

    let report = scan_reminders(&store, &mailer, &envelope(), date(2024, 1, 2))
        .await
        .unwrap();

    match report.outcome {
        ReminderOutcome::Sent { messages, marked_rows } => {
            assert_eq!(messages.len(), 1);
            assert_eq!(marked_rows, vec![2]);
        }
        other => panic!("expected a digest, got {other:?}"),
    }
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "催帳提醒通知");
    assert_eq!(sent[0].to, vec!["boss@example.com".to_string()]);
    assert_eq!(cell(&store, 0, Column::ReminderSent), "是");
    assert_eq!(cell(&store, 0, Column::ReminderSentDate), "2024-01-02");
}

#[tokio::test]
async fn contract_due_today_is_not_yet_overdue() {
    let store = MemoryStore::with_rows(vec![contract("Acme", "2024-01-01", 100, 50)]);
    let mailer = MemoryMailer::new();

    let report = scan_reminders(&store, &mailer, &envelope(), date(2024, 1, 1))
        .await
        .unwrap();

    assert!(matches!(report.outcome, ReminderOutcome::NothingToSend));
    assert!(mailer.sent().is_empty());
    assert_eq!(cell(&store, 0, Column::ReminderSent), "");
}

#[tokio::test]
async fn fully_paid_contract_never_qualifies() {
    let store = MemoryStore::with_rows(vec![contract("Acme", "2024-01-01", 100, 100)]);
    let mailer = MemoryMailer::new();

    let report = scan_reminders(&store, &mailer, &envelope(), date(2030, 1, 1))
        .await
        .unwrap();

    assert!(matches!(report.outcome, ReminderOutcome::NothingToSend));
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn two_overdue_contracts_share_one_digest() {
    let store = MemoryStore::with_rows(vec![
        contract("Acme", "2024-01-01", 100, 0),
        contract("Paid", "2024-01-01", 100, 100),
        contract("Beta", "2023/12/15", 400, 399),
    ]);
    let mailer = MemoryMailer::new();

    let report = scan_reminders(&store, &mailer, &envelope(), date(2024, 2, 1))
        .await
        .unwrap();

    let ReminderOutcome::Sent { messages, marked_rows } = report.outcome else {
        panic!("expected a digest");
    };
    assert_eq!(marked_rows, vec![2, 4]);
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    for message in &messages {
        assert!(sent[0].body.contains(message.as_str()));
    }
    assert!(sent[0].body.contains("「Acme」"));
    assert!(sent[0].body.contains("「Beta」"));
    assert!(!sent[0].body.contains("「Paid」"));
    assert_eq!(cell(&store, 0, Column::ReminderSent), "是");
    assert_eq!(cell(&store, 1, Column::ReminderSent), "");
    assert_eq!(cell(&store, 2, Column::ReminderSent), "是");
    assert_eq!(cell(&store, 2, Column::ReminderSentDate), "2024-02-01");
}

#[tokio::test]
async fn failed_delivery_leaves_rows_unmarked() {
    let store = MemoryStore::with_rows(vec![contract("Acme", "2024-01-01", 100, 0)]);
    let mailer = MemoryMailer::new();
    mailer.set_failing(true);

    let err = scan_reminders(&store, &mailer, &envelope(), date(2024, 1, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Provider(_)));
    assert_eq!(cell(&store, 0, Column::ReminderSent), "");
    assert_eq!(cell(&store, 0, Column::ReminderSentDate), "");

    mailer.set_failing(false);
    let retry = scan_reminders(&store, &mailer, &envelope(), date(2024, 1, 3))
        .await
        .unwrap();
    assert!(matches!(retry.outcome, ReminderOutcome::Sent { .. }));
    assert_eq!(cell(&store, 0, Column::ReminderSentDate), "2024-01-03");
}

#[tokio::test]
async fn bad_due_date_is_isolated_to_its_row() {
    let store = MemoryStore::with_rows(vec![
        contract("Broken", "31.12.2023", 100, 0),
        contract("Acme", "2024-01-01", 100, 0),
        contract("NoDue", "", 100, 0),
    ]);
    let mailer = MemoryMailer::new();

    let report = scan_reminders(&store, &mailer, &envelope(), date(2024, 1, 2))
        .await
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);
    assert_eq!(report.failures[0].title, "Broken");
    let ReminderOutcome::Sent { marked_rows, .. } = report.outcome else {
        panic!("expected a digest");
    };
    assert_eq!(marked_rows, vec![3]);
}

#[tokio::test]
async fn reminded_contract_is_reminded_again_while_unpaid() {
    let mut row = contract("Acme", "2024-01-01", 100, 0);
    row.push("是".into());
    row.push("2024-01-02".into());
    let store = MemoryStore::with_rows(vec![row]);
    let mailer = MemoryMailer::new();

    scan_reminders(&store, &mailer, &envelope(), date(2024, 1, 9))
        .await
        .unwrap();

    assert_eq!(mailer.sent().len(), 1);
    assert_eq!(cell(&store, 0, Column::ReminderSent), "是");
    assert_eq!(cell(&store, 0, Column::ReminderSentDate), "2024-01-09");
}

#[tokio::test]
async fn overdue_without_recipients_is_a_config_error() {
    let store = MemoryStore::with_rows(vec![contract("Acme", "2024-01-01", 100, 0)]);
    let mailer = MemoryMailer::new();
    let mut envelope = envelope();
    envelope.to.clear();

    let err = scan_reminders(&store, &mailer, &envelope, date(2024, 1, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Config(_)));
    assert!(mailer.sent().is_empty());
}

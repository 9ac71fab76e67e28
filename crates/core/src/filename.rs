//! Contract filename grammar.
//!
//! `<title>__<partner>&<contact>_<amount>(<percent>%)_<startYYYYMMDD>-<endYYYYMMDD>.pdf`
//!
//! This is the only place untrusted names become structured records, so every
//! rejection carries the offending input.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{amount_due, ContractRecord};
use chrono::NaiveDate;
use regex_lite::Regex;
use std::sync::OnceLock;

const PDF_SUFFIX: &str = ".pdf";
const TITLE_DELIMITER: &str = "__";

/// Digits are ASCII only; full-width forms such as `１０００` are rejected.
fn budget_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\((\d+)%\)$").expect("budget pattern compiles"))
}

pub fn parse_contract_filename(file_name: &str) -> LedgerResult<ContractRecord> {
    let stem = file_name.strip_suffix(PDF_SUFFIX).unwrap_or(file_name);

    let (title, raw_info) = stem
        .split_once(TITLE_DELIMITER)
        .ok_or_else(|| LedgerError::format(file_name, "missing `__` between title and details"))?;

    let fields: Vec<&str> = raw_info.split('_').collect();
    let [target, budget, date_range] = fields.as_slice() else {
        return Err(LedgerError::format(
            file_name,
            format!("expected 3 `_`-separated detail fields, found {}", fields.len()),
        ));
    };

    let (partner, contact) = split_exactly(target, '&')
        .ok_or_else(|| LedgerError::format(file_name, "expected `<partner>&<contact>`"))?;

    let (budget_amount, fee_percent) = parse_budget(budget)
        .ok_or_else(|| LedgerError::format(file_name, "amount format error"))?;

    let (start, end) = split_exactly(date_range, '-')
        .ok_or_else(|| LedgerError::format(file_name, "expected `<start>-<end>` date range"))?;
    let sign_date = parse_compact_date(start)?;
    let due_date = parse_compact_date(end)?;

    Ok(ContractRecord {
        title: title.to_string(),
        partner: partner.to_string(),
        contact: contact.to_string(),
        fee_percent,
        budget_amount,
        amount_due: amount_due(budget_amount, fee_percent),
        amount_received: 0,
        sign_date,
        due_date,
        file_url: String::new(),
        reminder_sent: false,
        reminder_sent_date: None,
    })
}

fn split_exactly(s: &str, sep: char) -> Option<(&str, &str)> {
    let (left, right) = s.split_once(sep)?;
    if right.contains(sep) {
        return None;
    }
    Some((left, right))
}

fn parse_budget(token: &str) -> Option<(u64, u32)> {
    let caps = budget_pattern().captures(token)?;
    let amount = caps.get(1)?.as_str().parse().ok()?;
    let percent = caps.get(2)?.as_str().parse().ok()?;
    Some((amount, percent))
}

/// `YYYYMMDD`, exactly eight digits.
fn parse_compact_date(token: &str) -> LedgerResult<NaiveDate> {
    if token.len() != 8 || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::date(token));
    }
    NaiveDate::parse_from_str(token, "%Y%m%d").map_err(|_| LedgerError::date(token))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_format_error(name: &str) {
        match parse_contract_filename(name) {
            Err(LedgerError::Format { input, .. }) => assert_eq!(input, name),
            other => panic!("{name}: expected format error, got {other:?}"),
        }
    }

    fn assert_date_error(name: &str, token: &str) {
        match parse_contract_filename(name) {
            Err(LedgerError::DateFormat { input }) => assert_eq!(input, token),
            other => panic!("{name}: expected date error, got {other:?}"),
        }
    }

    #[test]
    fn parses_reference_filename() {
        let record =
            parse_contract_filename("Acme Deal__Foo&Bar_100000(10%)_20240101-20241231.pdf")
                .unwrap();
        assert_eq!(record.title, "Acme Deal");
        assert_eq!(record.partner, "Foo");
        assert_eq!(record.contact, "Bar");
        assert_eq!(record.budget_amount, 100_000);
        assert_eq!(record.fee_percent, 10);
        assert_eq!(record.amount_due, 10_000);
        assert_eq!(record.amount_received, 0);
        assert_eq!(record.sign_date, date(2024, 1, 1));
        assert_eq!(record.due_date, date(2024, 12, 31));
        assert!(record.file_url.is_empty());
        assert!(!record.reminder_sent);
        assert_eq!(record.reminder_sent_date, None);
    }

    #[test]
    fn keeps_unicode_names() {
        let record =
            parse_contract_filename("年度採購案__台北市政府&王小明_250000(8%)_20230315-20240314.pdf")
                .unwrap();
        assert_eq!(record.title, "年度採購案");
        assert_eq!(record.partner, "台北市政府");
        assert_eq!(record.contact, "王小明");
        assert_eq!(record.amount_due, 20_000);
    }

    #[test]
    fn title_splits_on_first_double_underscore_only() {
        // The detail part then carries an extra field and is rejected.
        assert_format_error("A__B__Foo&Bar_100(10%)_20240101-20240102.pdf");
    }

    #[test]
    fn title_may_contain_single_underscores_and_dashes() {
        let record =
            parse_contract_filename("Q1-plan_v2__Foo&Bar_100(10%)_20240101-20240102.pdf").unwrap();
        assert_eq!(record.title, "Q1-plan_v2");
    }

    #[test]
    fn suffix_is_optional() {
        let record = parse_contract_filename("Deal__Foo&Bar_300(5%)_20240101-20240601").unwrap();
        assert_eq!(record.amount_due, 15);
    }

    #[test]
    fn rounds_amount_due() {
        let record = parse_contract_filename("R__A&B_15(10%)_20240101-20240102.pdf").unwrap();
        assert_eq!(record.amount_due, 2);
        let record = parse_contract_filename("R__A&B_1999(3%)_20240101-20240102.pdf").unwrap();
        assert_eq!(record.amount_due, 60);
    }

    #[test]
    fn numeric_fields_round_trip() {
        for (amount, percent, start, end) in [
            (1u64, 1u32, "20200229", "20200301"),
            (100_000, 10, "20240101", "20241231"),
            (987_654_321, 15, "19991231", "20000101"),
        ] {
            let name = format!("T__P&C_{amount}({percent}%)_{start}-{end}.pdf");
            let record = parse_contract_filename(&name).unwrap();
            assert_eq!(record.budget_amount, amount);
            assert_eq!(record.fee_percent, percent);
            assert_eq!(record.amount_due, amount_due(amount, percent));
            assert_eq!(record.sign_date.format("%Y%m%d").to_string(), start);
            assert_eq!(record.due_date.format("%Y%m%d").to_string(), end);
        }
    }

    #[test]
    fn rejects_missing_title_delimiter() {
        assert_format_error("Acme Deal_Foo&Bar_100000(10%)_20240101-20241231.pdf");
    }

    #[test]
    fn rejects_wrong_detail_field_count() {
        assert_format_error("Acme__Foo&Bar_100000(10%).pdf");
        assert_format_error("Acme__Foo&Bar_100000(10%)_20240101-20241231_extra.pdf");
        assert_format_error("Acme__.pdf");
    }

    #[test]
    fn rejects_bad_target_info() {
        assert_format_error("Acme__FooBar_100000(10%)_20240101-20241231.pdf");
        assert_format_error("Acme__Foo&Bar&Baz_100000(10%)_20240101-20241231.pdf");
    }

    #[test]
    fn rejects_malformed_budget() {
        for budget in ["100000", "100000(10)", "100000(10%", "abc(10%)", "100000(x%)", "(10%)", "1e5(10%)", "100000(10%)x"] {
            assert_format_error(&format!("Acme__Foo&Bar_{budget}_20240101-20241231.pdf"));
        }
    }

    #[test]
    fn rejects_full_width_digits() {
        assert_format_error("Acme__Foo&Bar_１０００(10%)_20240101-20241231.pdf");
        assert_format_error("Acme__Foo&Bar_1000(１０%)_20240101-20241231.pdf");
    }

    #[test]
    fn rejects_budget_overflow() {
        assert_format_error("Acme__Foo&Bar_99999999999999999999999(10%)_20240101-20241231.pdf");
    }

    #[test]
    fn rejects_date_range_without_single_dash() {
        assert_format_error("Acme__Foo&Bar_100(10%)_20240101.pdf");
        assert_format_error("Acme__Foo&Bar_100(10%)_2024-01-01-2024-12-31.pdf");
    }

    #[test]
    fn rejects_bad_date_tokens() {
        assert_date_error("Acme__Foo&Bar_100(10%)_2024011-20241231.pdf", "2024011");
        assert_date_error("Acme__Foo&Bar_100(10%)_20240101-2024123X.pdf", "2024123X");
        assert_date_error("Acme__Foo&Bar_100(10%)_20240230-20241231.pdf", "20240230");
        assert_date_error("Acme__Foo&Bar_100(10%)_20240101-202412310.pdf", "202412310");
    }

    #[test]
    fn due_before_sign_passes_through() {
        let record = parse_contract_filename("Late__A&B_100(10%)_20241231-20240101.pdf").unwrap();
        assert!(record.due_date < record.sign_date);
    }
}

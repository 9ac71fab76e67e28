use crate::error::{LedgerError, LedgerResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Localized "yes" written into the reminder flag column.
pub const FLAG_YES: &str = "是";

const DATE_FORMAT: &str = "%Y-%m-%d";
const SHEET_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// One contract, one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub title: String,
    pub partner: String,
    pub contact: String,
    /// Fee in whole percent points; the fee rate is `fee_percent / 100`.
    pub fee_percent: u32,
    pub budget_amount: u64,
    pub amount_due: u64,
    pub amount_received: u64,
    pub sign_date: NaiveDate,
    pub due_date: NaiveDate,
    pub file_url: String,
    pub reminder_sent: bool,
    pub reminder_sent_date: Option<NaiveDate>,
}

impl ContractRecord {
    pub fn with_file_url(mut self, url: String) -> Self {
        self.file_url = url;
        self
    }

    /// Cell values in sheet column order. Amounts are numbers, everything
    /// else is text taken literally by the store.
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            json!(self.title),
            json!(self.partner),
            json!(self.contact),
            json!(format_date(self.sign_date)),
            json!(format!("{}%", self.fee_percent)),
            json!(self.budget_amount),
            json!(self.amount_due),
            json!(self.amount_received),
            json!(format_date(self.due_date)),
            json!(self.file_url),
            json!(if self.reminder_sent { FLAG_YES } else { "" }),
            json!(self.reminder_sent_date.map(format_date).unwrap_or_default()),
        ]
    }
}

/// `round(budget × percent / 100)`, ties to even.
pub fn amount_due(budget: u64, percent: u32) -> u64 {
    let scaled = u128::from(budget) * u128::from(percent);
    let (quotient, remainder) = (scaled / 100, scaled % 100);
    let rounded = if remainder > 50 || (remainder == 50 && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a date cell written either as `YYYY-MM-DD` or `YYYY/MM/DD`.
pub fn parse_sheet_date(raw: &str) -> LedgerResult<NaiveDate> {
    let raw = raw.trim();
    SHEET_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| LedgerError::date(raw))
}

/// Parses an amount cell. Blank cells count as zero.
pub fn parse_amount(raw: &str) -> LedgerResult<u64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return Ok(0);
    }
    if let Ok(v) = cleaned.parse::<u64>() {
        return Ok(v);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
        _ => Err(LedgerError::format(raw, "amount is not a whole non-negative number")),
    }
}

pub fn is_flag_set(raw: &str) -> bool {
    matches!(raw.trim(), FLAG_YES | "TRUE" | "true" | "yes" | "Y")
}

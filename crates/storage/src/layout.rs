/// Number of header rows above the first data row.
pub const HEADER_ROWS: usize = 1;

/// Fixed column layout of the contract sheet, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Title = 1,
    Partner = 2,
    Contact = 3,
    SignDate = 4,
    FeePercent = 5,
    BudgetAmount = 6,
    AmountDue = 7,
    AmountReceived = 8,
    DueDate = 9,
    FileUrl = 10,
    ReminderSent = 11,
    ReminderSentDate = 12,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Title,
        Column::Partner,
        Column::Contact,
        Column::SignDate,
        Column::FeePercent,
        Column::BudgetAmount,
        Column::AmountDue,
        Column::AmountReceived,
        Column::DueDate,
        Column::FileUrl,
        Column::ReminderSent,
        Column::ReminderSentDate,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Column letter in A1 notation.
    pub fn letter(self) -> char {
        (b'A' + (self.index() - 1) as u8) as char
    }

    /// Header text as it appears in the sheet.
    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "合約名稱",
            Column::Partner => "對象",
            Column::Contact => "合作人",
            Column::SignDate => "簽約日期",
            Column::FeePercent => "回饋金%",
            Column::BudgetAmount => "經費金額",
            Column::AmountDue => "應收回饋金",
            Column::AmountReceived => "已收金額",
            Column::DueDate => "到期日",
            Column::FileUrl => "PDF連結",
            Column::ReminderSent => "已催帳",
            Column::ReminderSentDate => "催帳日期",
        }
    }
}

/// Header cells in column order.
pub fn header_row() -> Vec<String> {
    Column::ALL.iter().map(|c| c.header().to_string()).collect()
}

/// A1 range covering the header row, e.g. `A1:L1`.
pub fn header_range() -> String {
    format!(
        "{}1:{}{}",
        Column::Title.letter(),
        Column::ReminderSentDate.letter(),
        HEADER_ROWS
    )
}

/// Maps a 0-based data row index to its 1-indexed sheet row.
pub fn sheet_row(data_index: usize) -> usize {
    data_index + HEADER_ROWS + 1
}

/// Inverse of [`sheet_row`]; `None` for header rows.
pub fn data_index(sheet_row: usize) -> Option<usize> {
    sheet_row.checked_sub(HEADER_ROWS + 1)
}

/// A1 reference of a single cell, e.g. `K5`.
pub fn a1_cell(row: usize, column: Column) -> String {
    format!("{}{}", column.letter(), row)
}

/// A1 range spanning every column of the layout, e.g. `A:L`.
pub fn full_range() -> String {
    format!("{}:{}", Column::Title.letter(), Column::ReminderSentDate.letter())
}

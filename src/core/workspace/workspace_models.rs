// Plain data types shared by the core layer and the service adapters.
// None of these know about HTTP or JSON wire shapes; the infra layer maps
// Google's responses onto them.

use std::fmt;

/// A folder in the file-storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

/// A file in the file-storage service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    /// Link users open in the browser.
    pub url: String,
}

/// Access level handed out when sharing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Writer,
}

impl Role {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Role::Writer => "writer",
        }
    }
}

/// One user permission to add to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGrant {
    pub email: String,
    pub role: Role,
    /// Whether the provider should email the recipient about the share.
    pub notify: bool,
}

impl PermissionGrant {
    /// Writer access without a notification email.
    pub fn silent_writer(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role: Role::Writer,
            notify: false,
        }
    }
}

/// An unsent email composed for later review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftMessage {
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub html_body: String,
}

/// A rectangular block of cells on one sheet. Rows and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub row: u32,
    pub column: u32,
    pub num_rows: u32,
    pub num_columns: u32,
}

impl CellRange {
    pub fn new(
        sheet: impl Into<String>,
        row: u32,
        column: u32,
        num_rows: u32,
        num_columns: u32,
    ) -> Self {
        Self {
            sheet: sheet.into(),
            row,
            column,
            num_rows,
            num_columns,
        }
    }

    pub fn single_cell(sheet: impl Into<String>, row: u32, column: u32) -> Self {
        Self::new(sheet, row, column, 1, 1)
    }

    pub fn last_row(&self) -> u32 {
        self.row + self.num_rows.saturating_sub(1)
    }

    pub fn last_column(&self) -> u32 {
        self.column + self.num_columns.saturating_sub(1)
    }

    /// Renders the range in A1 notation, e.g. `'Share'!A3:E7`.
    pub fn to_a1(&self) -> String {
        format!(
            "{}!{}{}:{}{}",
            quote_sheet_name(&self.sheet),
            column_letters(self.column),
            self.row,
            column_letters(self.last_column()),
            self.last_row()
        )
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// An open-ended column reference, e.g. `'Share'!A3:A`.
pub fn open_column_a1(sheet: &str, column: u32, start_row: u32) -> String {
    let letters = column_letters(column);
    format!(
        "{}!{}{}:{}",
        quote_sheet_name(sheet),
        letters,
        start_row,
        letters
    )
}

/// Converts a 1-based column index into its letter form (1 -> A, 27 -> AA).
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        column = (column - 1) / 26;
    }
    letters.iter().rev().collect()
}

fn quote_sheet_name(sheet: &str) -> String {
    format!("'{}'", sheet.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(4), "D");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(703), "AAA");
    }

    #[test]
    fn test_range_to_a1() {
        let range = CellRange::new("Share", 3, 1, 5, 5);
        assert_eq!(range.to_a1(), "'Share'!A3:E7");

        let cell = CellRange::single_cell("Share", 4, 4);
        assert_eq!(cell.to_a1(), "'Share'!D4:D4");
    }

    #[test]
    fn test_sheet_names_are_quoted() {
        let range = CellRange::new("Tom's List", 2, 1, 1, 9);
        assert_eq!(range.to_a1(), "'Tom''s List'!A2:I2");
        assert_eq!(open_column_a1("Create", 1, 2), "'Create'!A2:A");
    }
}

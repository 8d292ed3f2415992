use super::record_models::{records_from_table, Record};
use crate::core::workspace::workspace_models::column_letters;
use crate::core::workspace::{CellRange, SpreadsheetService, UserDialog, WorkspaceError};

/// Reads a header row and the data rows beneath it into [`Record`]s.
///
/// The number of rows read is the number of filled cells in column A from the
/// header row down, so a blank cell in column A shortens the read.
pub struct RecordLoader<'a, S: ?Sized, U: ?Sized> {
    sheets: &'a S,
    dialog: &'a U,
}

impl<'a, S, U> RecordLoader<'a, S, U>
where
    S: SpreadsheetService + ?Sized,
    U: UserDialog + ?Sized,
{
    pub fn new(sheets: &'a S, dialog: &'a U) -> Self {
        Self { sheets, dialog }
    }

    /// Loads every record on `sheet`. An empty vector means there were no data
    /// rows; the operator has already been told.
    pub async fn load(
        &self,
        sheet: &str,
        header_row: u32,
        column_count: u32,
    ) -> Result<Vec<Record>, WorkspaceError> {
        let first_column = self.sheets.read_column(sheet, 1, header_row).await?;
        let filled = first_column
            .iter()
            .filter(|value| !value.trim().is_empty())
            .count() as u32;
        tracing::debug!(sheet, filled, "Counted filled cells in column A");

        if filled <= 1 {
            self.dialog
                .alert(&format!(
                    "No rows are listed from column A to {} in {}.",
                    column_letters(column_count),
                    sheet
                ))
                .await;
            return Ok(Vec::new());
        }

        let range = CellRange::new(sheet, header_row, 1, filled, column_count);
        let mut table = self.sheets.read_range(&range).await?;
        if table.is_empty() {
            return Ok(Vec::new());
        }
        let header = table.remove(0);
        let records = records_from_table(&header, &table);

        tracing::info!(sheet, count = records.len(), "Loaded records");
        if let Ok(json) = serde_json::to_string(&records) {
            tracing::debug!("records: {}", json);
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryWorkspace, ScriptedDialog};

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_loads_rows_below_header() {
        let workspace = InMemoryWorkspace::new();
        workspace.set_rows(
            "Share",
            2,
            vec![
                row(&["File ID", "Student Email", "Instructor Email"]),
                row(&["F1", "s1@x.com", "i1@x.com"]),
                row(&["F2", "s2@x.com"]),
            ],
        );
        let dialog = ScriptedDialog::new();

        let records = RecordLoader::new(&workspace, &dialog)
            .load("Share", 2, 9)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("File ID"), Some("F1"));
        assert_eq!(records[1].get("Instructor Email"), Some(""));
        assert!(dialog.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_header_only_sheet_reports_no_rows() {
        let workspace = InMemoryWorkspace::new();
        workspace.set_rows("Share", 2, vec![row(&["File ID", "Student Email"])]);
        let dialog = ScriptedDialog::new();

        let records = RecordLoader::new(&workspace, &dialog)
            .load("Share", 2, 9)
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(
            dialog.alerts(),
            vec!["No rows are listed from column A to I in Share.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rows_above_header_are_ignored() {
        let workspace = InMemoryWorkspace::new();
        workspace.set_rows(
            "Share",
            1,
            vec![
                row(&["Sharing targets"]),
                row(&["File ID", "Sheet Name"]),
                row(&["F9", "Alice"]),
            ],
        );
        let dialog = ScriptedDialog::new();

        let records = RecordLoader::new(&workspace, &dialog)
            .load("Share", 2, 2)
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("Sheet Name"), Some("Alice"));
    }
}

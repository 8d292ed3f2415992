// Builds the file report shown on the share sheet: one row per file in a
// folder with its name, link, id, current editors and the student id encoded
// in the file name (`【<student id>_...`).

use regex::Regex;
use std::sync::OnceLock;

use crate::core::config::ShareSheetLayout;
use crate::core::workspace::{CellRange, DriveService, SpreadsheetService, WorkspaceError};

/// Student id used when a file name carries none.
pub const UNKNOWN_STUDENT_ID: &str = "Unknown";

fn student_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"【(.*?)_").unwrap_or_else(|e| panic!("student id pattern: {e}"))
    })
}

/// Text between `【` and the next `_`, or [`UNKNOWN_STUDENT_ID`].
pub fn parse_student_id(file_name: &str) -> String {
    student_id_pattern()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_STUDENT_ID.to_string())
}

/// One report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub url: String,
    pub id: String,
    pub editors: Vec<String>,
    pub student_id: String,
}

impl FileReport {
    pub fn editor_list(&self) -> String {
        self.editors.join(", ")
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.url.clone(),
            self.id.clone(),
            self.editor_list(),
            self.student_id.clone(),
        ]
    }
}

pub struct FileInspector<'a, D: ?Sized, S: ?Sized> {
    drive: &'a D,
    sheets: &'a S,
}

impl<'a, D, S> FileInspector<'a, D, S>
where
    D: DriveService + ?Sized,
    S: SpreadsheetService + ?Sized,
{
    pub fn new(drive: &'a D, sheets: &'a S) -> Self {
        Self { drive, sheets }
    }

    /// Collects a report row for every file directly inside the folder.
    pub async fn inspect(&self, folder_id: &str) -> Result<Vec<FileReport>, WorkspaceError> {
        let files = self.drive.list_files(folder_id).await?;
        tracing::info!(folder_id, count = files.len(), "Inspecting files");

        let mut reports = Vec::with_capacity(files.len());
        for file in files {
            let editors = self.drive.list_editors(&file.id).await?;
            reports.push(FileReport {
                student_id: parse_student_id(&file.name),
                name: file.name,
                url: file.url,
                id: file.id,
                editors,
            });
        }
        Ok(reports)
    }

    /// Clears the previous report and writes `reports` in its place.
    pub async fn write_report(
        &self,
        sheet: &str,
        layout: &ShareSheetLayout,
        reports: &[FileReport],
    ) -> Result<(), WorkspaceError> {
        let previous = self
            .sheets
            .read_column(sheet, 1, layout.report_start_row)
            .await?
            .iter()
            .filter(|v| !v.trim().is_empty())
            .count() as u32;

        if previous > 0 {
            let stale = CellRange::new(
                sheet,
                layout.report_start_row,
                1,
                previous,
                layout.report_width,
            );
            tracing::debug!("Clearing previous report {}", stale);
            self.sheets.clear_range(&stale).await?;
        }

        if reports.is_empty() {
            return Ok(());
        }

        let rows: Vec<Vec<String>> = reports
            .iter()
            .map(|r| {
                let mut row = r.to_row();
                row.truncate(layout.report_width as usize);
                row
            })
            .collect();
        let target = CellRange::new(
            sheet,
            layout.report_start_row,
            1,
            rows.len() as u32,
            layout.report_width,
        );
        self.sheets.write_range(&target, &rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::{InMemoryWorkspace, WorkspaceCall};

    #[test]
    fn test_parse_student_id() {
        assert_eq!(parse_student_id("【S1234_Application Sheet"), "S1234");
        assert_eq!(parse_student_id("2025【AB-9_x_y"), "AB-9");
        assert_eq!(parse_student_id("【_empty"), "");
    }

    #[test]
    fn test_parse_student_id_without_marker() {
        assert_eq!(parse_student_id("Application Sheet"), UNKNOWN_STUDENT_ID);
        assert_eq!(parse_student_id("【S1234 no underscore"), UNKNOWN_STUDENT_ID);
        assert_eq!(parse_student_id("[S1234_ascii bracket"), UNKNOWN_STUDENT_ID);
    }

    #[tokio::test]
    async fn test_inspect_collects_metadata() {
        let workspace = InMemoryWorkspace::new();
        workspace.add_folder("folder", "Apps");
        workspace.add_file_with_editors(
            "folder",
            "F1",
            "【S1_Sheet",
            &["b@x.com", "a@x.com"],
        );
        workspace.add_file("folder", "F2", "Plain");
        workspace.add_file("elsewhere", "F3", "【S3_Other");

        let reports = FileInspector::new(&workspace, &workspace)
            .inspect("folder")
            .await
            .unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].id, "F1");
        assert_eq!(reports[0].editor_list(), "a@x.com, b@x.com");
        assert_eq!(reports[0].student_id, "S1");
        assert_eq!(
            reports[1].to_row(),
            vec![
                "Plain".to_string(),
                "https://docs.google.com/spreadsheets/d/F2/edit".to_string(),
                "F2".to_string(),
                String::new(),
                UNKNOWN_STUDENT_ID.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_write_report_overwrites_previous_rows() {
        let workspace = InMemoryWorkspace::new();
        let stale: Vec<Vec<String>> = (0..3)
            .map(|i| vec![format!("old{}", i), "u".into(), "id".into(), "e".into(), "s".into()])
            .collect();
        workspace.set_rows("Share", 3, stale);

        let report = FileReport {
            name: "new".into(),
            url: "https://x".into(),
            id: "N1".into(),
            editors: vec!["a@x.com".into()],
            student_id: "S9".into(),
        };
        FileInspector::new(&workspace, &workspace)
            .write_report("Share", &ShareSheetLayout::default(), &[report])
            .await
            .unwrap();

        assert!(workspace
            .calls()
            .contains(&WorkspaceCall::ClearRange("'Share'!A3:E5".to_string())));
        assert_eq!(workspace.cell("Share", 3, 1).as_deref(), Some("new"));
        assert_eq!(workspace.cell("Share", 3, 4).as_deref(), Some("a@x.com"));
        assert_eq!(workspace.cell("Share", 3, 5).as_deref(), Some("S9"));
        assert_eq!(workspace.cell("Share", 4, 1), None);
        assert_eq!(workspace.cell("Share", 5, 5), None);
    }

    #[tokio::test]
    async fn test_empty_report_only_clears() {
        let workspace = InMemoryWorkspace::new();
        workspace.add_sheet("Share");

        FileInspector::new(&workspace, &workspace)
            .write_report("Share", &ShareSheetLayout::default(), &[])
            .await
            .unwrap();

        assert!(!workspace
            .calls()
            .iter()
            .any(|c| matches!(c, WorkspaceCall::WriteRange { .. } | WorkspaceCall::ClearRange(_))));
    }
}

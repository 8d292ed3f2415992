// Grants and revokes editor access on the application files.
//
// Sharing works record by record: a failure on one record is logged and shown
// to the operator, then the next record is processed. Resetting works file by
// file over a whole folder and stops on the first failure.

use crate::core::config::{RecordKeys, ShareSheetLayout};
use crate::core::records::Record;
use crate::core::workspace::{
    DriveService, PermissionGrant, SpreadsheetService, UserDialog, WorkspaceError,
};

/// Outcome of a share pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareSummary {
    pub shared: usize,
    /// Sheet names of the records that failed.
    pub failed: Vec<String>,
}

impl ShareSummary {
    pub fn total(&self) -> usize {
        self.shared + self.failed.len()
    }
}

/// Outcome of a reset pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetSummary {
    pub files: usize,
    pub editors_removed: usize,
}

/// Where the editor list of each shared record is written back.
pub struct WriteBackTarget<'a> {
    pub sheet: &'a str,
    pub layout: &'a ShareSheetLayout,
}

pub struct PermissionManager<'a, D: ?Sized, S: ?Sized, U: ?Sized> {
    drive: &'a D,
    sheets: &'a S,
    dialog: &'a U,
    keys: &'a RecordKeys,
}

impl<'a, D, S, U> PermissionManager<'a, D, S, U>
where
    D: DriveService + ?Sized,
    S: SpreadsheetService + ?Sized,
    U: UserDialog + ?Sized,
{
    pub fn new(drive: &'a D, sheets: &'a S, dialog: &'a U, keys: &'a RecordKeys) -> Self {
        Self {
            drive,
            sheets,
            dialog,
            keys,
        }
    }

    /// Gives the student and the instructor of every record silent writer
    /// access to the record's file, then writes the file's editor list back
    /// onto the record's row.
    pub async fn share(&self, records: &[Record], target: &WriteBackTarget<'_>) -> ShareSummary {
        let mut summary = ShareSummary::default();

        for (index, record) in records.iter().enumerate() {
            let row = target.layout.first_data_row() + index as u32;
            match self.share_record(record, row, target).await {
                Ok(editors) => {
                    tracing::info!(row, editors = editors.as_str(), "Shared file");
                    summary.shared += 1;
                }
                Err(e) => {
                    let sheet_name = record.get_or_blank(&self.keys.sheet_name).to_string();
                    tracing::error!("Error processing file, {}: {}", sheet_name, e);
                    self.dialog
                        .alert(&format!(
                            "Error processing file, {}. Contact the owner of the script.",
                            sheet_name
                        ))
                        .await;
                    summary.failed.push(sheet_name);
                }
            }
        }

        summary
    }

    async fn share_record(
        &self,
        record: &Record,
        row: u32,
        target: &WriteBackTarget<'_>,
    ) -> Result<String, WorkspaceError> {
        let file_id = record.require(&self.keys.file_id)?;
        let recipients = [
            record.get_or_blank(&self.keys.student_email),
            record.get_or_blank(&self.keys.instructor_email),
        ];

        for email in recipients {
            tracing::debug!(file_id, email, "Granting writer access");
            self.drive
                .grant_permission(file_id, &PermissionGrant::silent_writer(email))
                .await?;
        }

        let editors = self.drive.list_editors(file_id).await?.join(", ");
        self.sheets
            .write_cell(target.sheet, row, target.layout.editors_column, &editors)
            .await?;
        Ok(editors)
    }

    /// Removes every editor from every file directly inside the folder.
    pub async fn reset_folder(&self, folder_id: &str) -> Result<ResetSummary, WorkspaceError> {
        let files = self.drive.list_files(folder_id).await?;
        let mut summary = ResetSummary::default();

        for file in &files {
            let editors = self.drive.remove_all_editors(&file.id).await?;
            tracing::info!(
                file = file.name.as_str(),
                removed = editors.len(),
                "Reset sharing"
            );
            summary.editors_removed += editors.len();
            summary.files += 1;
        }

        Ok(summary)
    }
}

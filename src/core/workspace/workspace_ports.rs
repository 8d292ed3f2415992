// Traits describing the minimal operations the actions need from the outside
// world. The core layer only talks to these; `infra/google` implements them
// over HTTPS and the in-memory workspace implements them for tests.

use async_trait::async_trait;
use thiserror::Error;

use super::workspace_models::{CellRange, DraftMessage, DriveFile, Folder, PermissionGrant};

/// Errors raised by any of the remote collaborators.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{service} API error ({status}): {body}")]
    Api {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("Record field '{0}' is missing or blank")]
    MissingField(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Reads and writes cells in the hosting spreadsheet.
#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    async fn sheet_exists(&self, sheet: &str) -> Result<bool, WorkspaceError>;

    /// Values of one column from `start_row` down to the last filled row.
    /// Blank cells inside that span come back as empty strings.
    async fn read_column(
        &self,
        sheet: &str,
        column: u32,
        start_row: u32,
    ) -> Result<Vec<String>, WorkspaceError>;

    /// Values inside `range`. Rows may be shorter than the range width when
    /// their trailing cells are blank.
    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, WorkspaceError>;

    async fn write_range(
        &self,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), WorkspaceError>;

    async fn clear_range(&self, range: &CellRange) -> Result<(), WorkspaceError>;

    async fn write_cell(
        &self,
        sheet: &str,
        row: u32,
        column: u32,
        value: &str,
    ) -> Result<(), WorkspaceError> {
        let range = CellRange::single_cell(sheet, row, column);
        self.write_range(&range, &[vec![value.to_string()]]).await
    }
}

/// Hierarchical file storage with per-file sharing.
#[async_trait]
pub trait DriveService: Send + Sync {
    /// `None` when the id does not name an existing folder.
    async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>, WorkspaceError>;

    /// `None` when the id does not name an existing file.
    async fn get_file(&self, file_id: &str) -> Result<Option<DriveFile>, WorkspaceError>;

    /// Files directly inside a folder, in provider order.
    async fn list_files(&self, folder_id: &str) -> Result<Vec<DriveFile>, WorkspaceError>;

    async fn copy_file(
        &self,
        file_id: &str,
        name: &str,
        folder_id: &str,
    ) -> Result<DriveFile, WorkspaceError>;

    async fn grant_permission(
        &self,
        file_id: &str,
        grant: &PermissionGrant,
    ) -> Result<(), WorkspaceError>;

    /// Email addresses holding write access (owners excluded).
    async fn list_editors(&self, file_id: &str) -> Result<Vec<String>, WorkspaceError>;

    async fn remove_editor(&self, file_id: &str, email: &str) -> Result<(), WorkspaceError>;

    /// Removes every editor from a file and returns the addresses removed.
    /// Adapters that can delete by permission id should override this to
    /// avoid a lookup per editor.
    async fn remove_all_editors(&self, file_id: &str) -> Result<Vec<String>, WorkspaceError> {
        let editors = self.list_editors(file_id).await?;
        for email in &editors {
            self.remove_editor(file_id, email).await?;
        }
        Ok(editors)
    }
}

/// Mail drafts.
#[async_trait]
pub trait MailService: Send + Sync {
    /// Stores the message as an unsent draft and returns the draft id.
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, WorkspaceError>;
}

/// Prompts and notices shown to the operator running an action.
#[async_trait]
pub trait UserDialog: Send + Sync {
    /// Free-text prompt with OK/Cancel semantics. Cancel yields
    /// [`crate::core::validation::CANCEL_SENTINEL`].
    async fn prompt(&self, message: &str) -> String;

    /// Blocking notice.
    async fn alert(&self, message: &str);

    /// Yes/no question; `false` means the operator declined.
    async fn confirm(&self, message: &str) -> bool;
}

// In-memory implementation of the spreadsheet, drive and mail ports.
//
// Behaves like the real services where the actions can observe a difference:
// - column and range reads stop at the last filled row and trim trailing
//   blank cells, as the Sheets API does
// - permissions are a set per file, so granting twice keeps one entry
// - file listing follows creation order
//
// Every call is appended to a log so tests can assert exact call sequences.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::core::workspace::{
    CellRange, DraftMessage, DriveFile, DriveService, Folder, MailService, PermissionGrant,
    Role, SpreadsheetService, WorkspaceError,
};

/// One recorded call against the workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceCall {
    ReadColumn { sheet: String, column: u32, start_row: u32 },
    ReadRange(String),
    WriteRange { range: String, rows: Vec<Vec<String>> },
    ClearRange(String),
    GetFolder(String),
    GetFile(String),
    ListFiles(String),
    CopyFile { file_id: String, name: String, folder_id: String },
    GrantPermission { file_id: String, email: String, role: Role, notify: bool },
    ListEditors(String),
    RemoveEditor { file_id: String, email: String },
    CreateDraft { to: String },
}

#[derive(Debug, Clone)]
struct StoredFile {
    file: DriveFile,
    folder_id: String,
    editors: BTreeSet<String>,
    created: u64,
}

type SheetCells = BTreeMap<(u32, u32), String>;

#[derive(Default)]
pub struct InMemoryWorkspace {
    sheets: DashMap<String, SheetCells>,
    folders: DashMap<String, Folder>,
    files: DashMap<String, StoredFile>,
    drafts: Mutex<Vec<DraftMessage>>,
    calls: Mutex<Vec<WorkspaceCall>>,
    rejected_names: Mutex<HashSet<String>>,
    next_id: AtomicU64,
}

impl InMemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: WorkspaceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_sequence(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    // ------------------------------------------------------------------
    // Test setup and inspection
    // ------------------------------------------------------------------

    pub fn add_sheet(&self, name: &str) {
        self.sheets.entry(name.to_string()).or_default();
    }

    /// Writes `rows` starting at column A of `start_row`.
    pub fn set_rows(&self, sheet: &str, start_row: u32, rows: Vec<Vec<String>>) {
        let mut cells = self.sheets.entry(sheet.to_string()).or_default();
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                let key = (start_row + r as u32, 1 + c as u32);
                if value.is_empty() {
                    cells.remove(&key);
                } else {
                    cells.insert(key, value);
                }
            }
        }
    }

    pub fn cell(&self, sheet: &str, row: u32, column: u32) -> Option<String> {
        self.sheets
            .get(sheet)
            .and_then(|cells| cells.get(&(row, column)).cloned())
    }

    pub fn add_folder(&self, id: &str, name: &str) {
        self.folders.insert(
            id.to_string(),
            Folder {
                id: id.to_string(),
                name: name.to_string(),
            },
        );
    }

    pub fn add_file(&self, folder_id: &str, id: &str, name: &str) -> DriveFile {
        self.add_file_with_editors(folder_id, id, name, &[])
    }

    pub fn add_file_with_editors(
        &self,
        folder_id: &str,
        id: &str,
        name: &str,
        editors: &[&str],
    ) -> DriveFile {
        let file = DriveFile {
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://docs.google.com/spreadsheets/d/{}/edit", id),
        };
        self.files.insert(
            id.to_string(),
            StoredFile {
                file: file.clone(),
                folder_id: folder_id.to_string(),
                editors: editors.iter().map(|e| e.to_string()).collect(),
                created: self.next_sequence(),
            },
        );
        file
    }

    /// Makes any copy named `name` fail.
    pub fn reject_copies_named(&self, name: &str) {
        self.rejected_names.lock().unwrap().insert(name.to_string());
    }

    pub fn editors(&self, file_id: &str) -> Vec<String> {
        self.files
            .get(file_id)
            .map(|f| f.editors.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Files in `folder_id`, oldest first.
    pub fn files_in(&self, folder_id: &str) -> Vec<DriveFile> {
        let mut stored: Vec<StoredFile> = self
            .files
            .iter()
            .filter(|entry| entry.folder_id == folder_id)
            .map(|entry| entry.value().clone())
            .collect();
        stored.sort_by_key(|f| f.created);
        stored.into_iter().map(|f| f.file).collect()
    }

    pub fn drafts(&self) -> Vec<DraftMessage> {
        self.drafts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<WorkspaceCall> {
        self.calls.lock().unwrap().clone()
    }
}

fn trim_trailing_blanks(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(|v| v.is_empty()) {
        row.pop();
    }
    row
}

#[async_trait]
impl SpreadsheetService for InMemoryWorkspace {
    async fn sheet_exists(&self, sheet: &str) -> Result<bool, WorkspaceError> {
        Ok(self.sheets.contains_key(sheet))
    }

    async fn read_column(
        &self,
        sheet: &str,
        column: u32,
        start_row: u32,
    ) -> Result<Vec<String>, WorkspaceError> {
        self.record(WorkspaceCall::ReadColumn {
            sheet: sheet.to_string(),
            column,
            start_row,
        });
        let cells = self
            .sheets
            .get(sheet)
            .ok_or_else(|| WorkspaceError::Rejected(format!("Unknown sheet {}", sheet)))?;

        let last_row = cells
            .keys()
            .filter(|(row, col)| *col == column && *row >= start_row)
            .map(|(row, _)| *row)
            .max();

        Ok(match last_row {
            Some(last) => (start_row..=last)
                .map(|row| cells.get(&(row, column)).cloned().unwrap_or_default())
                .collect(),
            None => Vec::new(),
        })
    }

    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, WorkspaceError> {
        self.record(WorkspaceCall::ReadRange(range.to_a1()));
        let cells = self
            .sheets
            .get(&range.sheet)
            .ok_or_else(|| WorkspaceError::Rejected(format!("Unknown sheet {}", range.sheet)))?;

        let mut rows: Vec<Vec<String>> = (range.row..=range.last_row())
            .map(|row| {
                let values = (range.column..=range.last_column())
                    .map(|col| cells.get(&(row, col)).cloned().unwrap_or_default())
                    .collect();
                trim_trailing_blanks(values)
            })
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn write_range(
        &self,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), WorkspaceError> {
        self.record(WorkspaceCall::WriteRange {
            range: range.to_a1(),
            rows: rows.to_vec(),
        });
        if rows.len() as u32 > range.num_rows
            || rows.iter().any(|r| r.len() as u32 > range.num_columns)
        {
            return Err(WorkspaceError::Rejected(format!(
                "Data does not fit {}",
                range
            )));
        }
        let mut cells = self
            .sheets
            .get_mut(&range.sheet)
            .ok_or_else(|| WorkspaceError::Rejected(format!("Unknown sheet {}", range.sheet)))?;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let key = (range.row + r as u32, range.column + c as u32);
                if value.is_empty() {
                    cells.remove(&key);
                } else {
                    cells.insert(key, value.clone());
                }
            }
        }
        Ok(())
    }

    async fn clear_range(&self, range: &CellRange) -> Result<(), WorkspaceError> {
        self.record(WorkspaceCall::ClearRange(range.to_a1()));
        let mut cells = self
            .sheets
            .get_mut(&range.sheet)
            .ok_or_else(|| WorkspaceError::Rejected(format!("Unknown sheet {}", range.sheet)))?;
        cells.retain(|(row, col), _| {
            !(range.row..=range.last_row()).contains(row)
                || !(range.column..=range.last_column()).contains(col)
        });
        Ok(())
    }
}

#[async_trait]
impl DriveService for InMemoryWorkspace {
    async fn get_folder(&self, folder_id: &str) -> Result<Option<Folder>, WorkspaceError> {
        self.record(WorkspaceCall::GetFolder(folder_id.to_string()));
        Ok(self.folders.get(folder_id).map(|f| f.value().clone()))
    }

    async fn get_file(&self, file_id: &str) -> Result<Option<DriveFile>, WorkspaceError> {
        self.record(WorkspaceCall::GetFile(file_id.to_string()));
        Ok(self.files.get(file_id).map(|f| f.file.clone()))
    }

    async fn list_files(&self, folder_id: &str) -> Result<Vec<DriveFile>, WorkspaceError> {
        self.record(WorkspaceCall::ListFiles(folder_id.to_string()));
        Ok(self.files_in(folder_id))
    }

    async fn copy_file(
        &self,
        file_id: &str,
        name: &str,
        folder_id: &str,
    ) -> Result<DriveFile, WorkspaceError> {
        self.record(WorkspaceCall::CopyFile {
            file_id: file_id.to_string(),
            name: name.to_string(),
            folder_id: folder_id.to_string(),
        });
        if self.rejected_names.lock().unwrap().contains(name) {
            return Err(WorkspaceError::Rejected(format!("Copy named {} failed", name)));
        }
        if !self.files.contains_key(file_id) {
            return Err(WorkspaceError::Rejected(format!("File {} not found", file_id)));
        }
        if !self.folders.contains_key(folder_id) {
            return Err(WorkspaceError::Rejected(format!(
                "Folder {} not found",
                folder_id
            )));
        }
        let id = format!("copy-{}", self.next_sequence());
        Ok(self.add_file(folder_id, &id, name))
    }

    async fn grant_permission(
        &self,
        file_id: &str,
        grant: &PermissionGrant,
    ) -> Result<(), WorkspaceError> {
        self.record(WorkspaceCall::GrantPermission {
            file_id: file_id.to_string(),
            email: grant.email.clone(),
            role: grant.role,
            notify: grant.notify,
        });
        if !grant.email.contains('@') {
            return Err(WorkspaceError::Rejected(format!(
                "Invalid email address: {}",
                grant.email
            )));
        }
        let mut file = self
            .files
            .get_mut(file_id)
            .ok_or_else(|| WorkspaceError::Rejected(format!("File {} not found", file_id)))?;
        if grant.role == Role::Writer {
            file.editors.insert(grant.email.clone());
        }
        Ok(())
    }

    async fn list_editors(&self, file_id: &str) -> Result<Vec<String>, WorkspaceError> {
        self.record(WorkspaceCall::ListEditors(file_id.to_string()));
        self.files
            .get(file_id)
            .map(|f| f.editors.iter().cloned().collect())
            .ok_or_else(|| WorkspaceError::Rejected(format!("File {} not found", file_id)))
    }

    async fn remove_editor(&self, file_id: &str, email: &str) -> Result<(), WorkspaceError> {
        self.record(WorkspaceCall::RemoveEditor {
            file_id: file_id.to_string(),
            email: email.to_string(),
        });
        let mut file = self
            .files
            .get_mut(file_id)
            .ok_or_else(|| WorkspaceError::Rejected(format!("File {} not found", file_id)))?;
        file.editors.remove(email);
        Ok(())
    }
}

#[async_trait]
impl MailService for InMemoryWorkspace {
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, WorkspaceError> {
        self.record(WorkspaceCall::CreateDraft {
            to: message.to.clone(),
        });
        let mut drafts = self.drafts.lock().unwrap();
        drafts.push(message.clone());
        Ok(format!("draft-{}", drafts.len()))
    }
}

// The menu actions. Each one gathers its inputs through the dialog, checks
// them, does one pass over rows or files, and finishes with a notice.
//
// Bad input ends the action with `ActionOutcome::Aborted` after a notice and
// before any write. Remote failures surface as `Err` except while sharing,
// where each record is isolated.

use super::menu_catalog::MenuAction;
use crate::core::config::AppConfig;
use crate::core::drafts::DraftComposer;
use crate::core::duplication::FileDuplicator;
use crate::core::identifiers::extract_id_or_alert;
use crate::core::inspection::FileInspector;
use crate::core::permissions::{PermissionManager, WriteBackTarget};
use crate::core::records::{Record, RecordLoader};
use crate::core::validation::{exists, is_non_empty_input};
use crate::core::workspace::{
    DriveFile, DriveService, Folder, MailService, SpreadsheetService, UserDialog, WorkspaceError,
};

/// How an action ended when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    /// Stopped on bad input or a declined confirmation.
    Aborted,
}

pub struct SheetActions<'a, S: ?Sized, D: ?Sized, M: ?Sized, U: ?Sized> {
    config: &'a AppConfig,
    sheets: &'a S,
    drive: &'a D,
    mail: &'a M,
    dialog: &'a U,
}

impl<'a, S, D, M, U> SheetActions<'a, S, D, M, U>
where
    S: SpreadsheetService + ?Sized,
    D: DriveService + ?Sized,
    M: MailService + ?Sized,
    U: UserDialog + ?Sized,
{
    pub fn new(
        config: &'a AppConfig,
        sheets: &'a S,
        drive: &'a D,
        mail: &'a M,
        dialog: &'a U,
    ) -> Self {
        Self {
            config,
            sheets,
            drive,
            mail,
            dialog,
        }
    }

    pub async fn run(&self, action: MenuAction) -> Result<ActionOutcome, WorkspaceError> {
        tracing::info!(action = action.command_name(), "Running action");
        let outcome = match action {
            MenuAction::CopyAndNameFiles => self.copy_and_name_files().await,
            MenuAction::OutputFileInfo => self.output_file_info().await,
            MenuAction::ShareFilesWithoutNotification => {
                self.share_files_without_notification().await
            }
            MenuAction::ResetAllSharingStatus => self.reset_all_sharing_status().await,
            MenuAction::CreateDrafts => self.create_drafts().await,
        };
        match &outcome {
            Ok(result) => {
                tracing::info!(action = action.command_name(), ?result, "Action finished")
            }
            Err(e) => tracing::error!(action = action.command_name(), "Action failed: {}", e),
        }
        outcome
    }

    /// Copies a sample file once per name listed on the create sheet.
    pub async fn copy_and_name_files(&self) -> Result<ActionOutcome, WorkspaceError> {
        let Some(folder) = self
            .prompt_for_folder(
                "Input the URL of the folder to store newly created files",
                "Folder",
            )
            .await?
        else {
            return Ok(ActionOutcome::Aborted);
        };

        let create_sheet = self.config.create_sheet_name.as_str();
        if !self.require_sheet(create_sheet, "Create Sheet").await? {
            return Ok(ActionOutcome::Aborted);
        }
        let names: Vec<String> = self.sheets.read_column(create_sheet, 1, 2).await?;
        if names.is_empty() {
            self.dialog
                .alert(&format!(
                    "Application file names are not listed in {}.",
                    create_sheet
                ))
                .await;
            return Ok(ActionOutcome::Aborted);
        }

        let Some(sample) = self
            .prompt_for_file("Input the URL of the sample sheet", "Sample Sheet")
            .await?
        else {
            return Ok(ActionOutcome::Aborted);
        };

        FileDuplicator::new(self.drive)
            .duplicate(&sample, &folder, &names)
            .await?;

        self.dialog
            .alert(
                "All of the application sheet files were successfully created \
                 and stored in the designated folder.",
            )
            .await;
        Ok(ActionOutcome::Completed)
    }

    /// Writes name, link, id, editors and student id of every file in a folder
    /// onto the share sheet, replacing the previous report.
    pub async fn output_file_info(&self) -> Result<ActionOutcome, WorkspaceError> {
        let share_sheet = self.config.share_sheet_name.as_str();
        if !self.require_sheet(share_sheet, "Share Sheet").await? {
            return Ok(ActionOutcome::Aborted);
        }

        let Some(folder) = self
            .prompt_for_folder("Input the URL of the folder to store target files", "Folder")
            .await?
        else {
            return Ok(ActionOutcome::Aborted);
        };

        let inspector = FileInspector::new(self.drive, self.sheets);
        let reports = inspector.inspect(&folder.id).await?;
        inspector
            .write_report(share_sheet, &self.config.share_layout, &reports)
            .await?;

        self.dialog
            .alert(&format!(
                "Information of all of the target application sheets were \
                 successfully displayed in {}.",
                share_sheet
            ))
            .await;
        Ok(ActionOutcome::Completed)
    }

    /// Gives each record's student and instructor writer access to the
    /// record's file without notification emails.
    pub async fn share_files_without_notification(&self) -> Result<ActionOutcome, WorkspaceError> {
        let Some(records) = self.load_share_records().await? else {
            return Ok(ActionOutcome::Aborted);
        };

        if !self
            .confirm_destructive(&format!(
                "Grant editor access on {} file(s) without sending notification emails?",
                records.len()
            ))
            .await
        {
            return Ok(ActionOutcome::Aborted);
        }

        let target = WriteBackTarget {
            sheet: &self.config.share_sheet_name,
            layout: &self.config.share_layout,
        };
        let summary = PermissionManager::new(
            self.drive,
            self.sheets,
            self.dialog,
            &self.config.record_keys,
        )
        .share(&records, &target)
        .await;

        let mut notice = format!(
            "Shared {} of {} files without notification.",
            summary.shared,
            summary.total()
        );
        if !summary.failed.is_empty() {
            notice.push_str(&format!(" Failed: {}.", summary.failed.join(", ")));
        }
        self.dialog.alert(&notice).await;
        Ok(ActionOutcome::Completed)
    }

    /// Removes every editor from every file in the folder the operator names.
    pub async fn reset_all_sharing_status(&self) -> Result<ActionOutcome, WorkspaceError> {
        let Some(folder) = self
            .prompt_for_folder(
                "Input the URL of the folder to reset sharing status",
                "Reset Folder",
            )
            .await?
        else {
            return Ok(ActionOutcome::Aborted);
        };

        if !self
            .confirm_destructive(&format!(
                "Remove every editor from all files in folder '{}'?",
                folder.name
            ))
            .await
        {
            return Ok(ActionOutcome::Aborted);
        }

        let summary = PermissionManager::new(
            self.drive,
            self.sheets,
            self.dialog,
            &self.config.record_keys,
        )
        .reset_folder(&folder.id)
        .await?;

        self.dialog
            .alert(&format!(
                "Reset sharing of all {} target files succeeded ({} editors removed).",
                summary.files, summary.editors_removed
            ))
            .await;
        Ok(ActionOutcome::Completed)
    }

    /// Creates one email draft per share record.
    pub async fn create_drafts(&self) -> Result<ActionOutcome, WorkspaceError> {
        let Some(records) = self.load_share_records().await? else {
            return Ok(ActionOutcome::Aborted);
        };

        DraftComposer::new(self.mail, &self.config.draft, &self.config.record_keys)
            .create_drafts(&records)
            .await?;

        self.dialog
            .alert("Drafts were successfully created in Gmail.")
            .await;
        Ok(ActionOutcome::Completed)
    }

    // ------------------------------------------------------------------
    // Shared steps
    // ------------------------------------------------------------------

    /// Prompts for a URL and pulls the id out of it. `None` means the operator
    /// has already been told why the action stops.
    async fn prompt_for_id(&self, message: &str) -> Option<String> {
        let url = self.dialog.prompt(message).await;
        if !is_non_empty_input(self.dialog, &url).await {
            return None;
        }
        extract_id_or_alert(self.dialog, &url).await
    }

    async fn prompt_for_folder(
        &self,
        message: &str,
        kind_label: &str,
    ) -> Result<Option<Folder>, WorkspaceError> {
        let Some(folder_id) = self.prompt_for_id(message).await else {
            return Ok(None);
        };
        let folder = self.drive.get_folder(&folder_id).await?;
        if !exists(self.dialog, folder.as_ref(), kind_label).await {
            return Ok(None);
        }
        Ok(folder)
    }

    async fn prompt_for_file(
        &self,
        message: &str,
        kind_label: &str,
    ) -> Result<Option<DriveFile>, WorkspaceError> {
        let Some(file_id) = self.prompt_for_id(message).await else {
            return Ok(None);
        };
        let file = self.drive.get_file(&file_id).await?;
        if !exists(self.dialog, file.as_ref(), kind_label).await {
            return Ok(None);
        }
        Ok(file)
    }

    async fn require_sheet(&self, sheet: &str, kind_label: &str) -> Result<bool, WorkspaceError> {
        let found = self.sheets.sheet_exists(sheet).await?;
        Ok(exists(self.dialog, found.then_some(&sheet), kind_label).await)
    }

    async fn load_share_records(&self) -> Result<Option<Vec<Record>>, WorkspaceError> {
        let share_sheet = self.config.share_sheet_name.as_str();
        if !self.require_sheet(share_sheet, "Share Sheet").await? {
            return Ok(None);
        }
        let layout = &self.config.share_layout;
        let records = RecordLoader::new(self.sheets, self.dialog)
            .load(share_sheet, layout.header_row, layout.column_count)
            .await?;
        Ok((!records.is_empty()).then_some(records))
    }

    async fn confirm_destructive(&self, question: &str) -> bool {
        if !self.config.confirm_destructive {
            return true;
        }
        if self.dialog.confirm(question).await {
            return true;
        }
        tracing::warn!("Operator declined: {}", question);
        self.dialog.alert("Cancelled. Nothing was changed.").await;
        false
    }
}

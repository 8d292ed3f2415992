// The interactive custom menu. Lists every action, runs the one the operator
// picks, and comes back until the prompt is cancelled.

use crate::core::actions::menu_catalog::select;
use crate::core::actions::{register_menu, ActionOutcome, MenuAction, SheetActions, MENU_TITLE};
use crate::core::validation::input_is_present;
use crate::core::workspace::{
    DriveService, MailService, SpreadsheetService, UserDialog, WorkspaceError,
};

pub fn render_menu() -> String {
    let mut text = format!("{}\n", MENU_TITLE);
    for entry in register_menu() {
        text.push_str(&format!("  {}. {}\n", entry.key, entry.label()));
    }
    text.push_str("Select an action by number or name");
    text
}

/// Runs one action and turns a failure into a notice so no run ends silently.
pub async fn run_action<S, D, M, U>(
    actions: &SheetActions<'_, S, D, M, U>,
    dialog: &U,
    action: MenuAction,
) -> Result<ActionOutcome, WorkspaceError>
where
    S: SpreadsheetService + ?Sized,
    D: DriveService + ?Sized,
    M: MailService + ?Sized,
    U: UserDialog + ?Sized,
{
    let result = actions.run(action).await;
    if let Err(e) = &result {
        dialog
            .alert(&format!("{} failed: {}", action.label(), e))
            .await;
    }
    result
}

/// Shows the menu until the operator cancels. Returns how many actions ran.
pub async fn run_menu<S, D, M, U>(actions: &SheetActions<'_, S, D, M, U>, dialog: &U) -> usize
where
    S: SpreadsheetService + ?Sized,
    D: DriveService + ?Sized,
    M: MailService + ?Sized,
    U: UserDialog + ?Sized,
{
    let entries = register_menu();
    let mut ran = 0;

    loop {
        let choice = dialog.prompt(&render_menu()).await;
        if !input_is_present(&choice) {
            break;
        }
        match select(&entries, &choice) {
            Some(action) => {
                // Failures are already reported; the menu stays open.
                let _ = run_action(actions, dialog, action).await;
                ran += 1;
            }
            None => {
                dialog
                    .alert(&format!("'{}' is not on the menu.", choice.trim()))
                    .await
            }
        }
    }

    ran
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::infra::memory::{InMemoryWorkspace, ScriptedDialog};

    fn config() -> AppConfig {
        AppConfig {
            spreadsheet_id: "host".to_string(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_render_menu_lists_entries() {
        let text = render_menu();
        assert!(text.starts_with("Custom Menu\n"));
        assert!(text.contains("  1. Copy and Name Files\n"));
        assert!(text.contains("  5. Create Email Drafts\n"));
    }

    #[tokio::test]
    async fn test_menu_runs_selected_actions_until_cancelled() {
        let workspace = InMemoryWorkspace::new();
        workspace.set_rows("Share", 2, vec![vec!["File ID".to_string()]]);
        let dialog = ScriptedDialog::new().with_inputs(["5", "bogus"]);
        let config = config();
        let actions = SheetActions::new(&config, &workspace, &workspace, &workspace, &dialog);

        let ran = run_menu(&actions, &dialog).await;

        assert_eq!(ran, 1);
        assert_eq!(
            dialog.alerts(),
            vec![
                "No rows are listed from column A to I in Share.".to_string(),
                "'bogus' is not on the menu.".to_string(),
            ]
        );
        assert_eq!(dialog.prompts().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_action_is_reported() {
        let workspace = InMemoryWorkspace::new();
        workspace.set_rows(
            "Share",
            2,
            vec![
                vec!["File ID".to_string(), "Student Email".to_string()],
                vec!["F1".to_string(), String::new()],
            ],
        );
        let dialog = ScriptedDialog::new();
        let config = config();
        let actions = SheetActions::new(&config, &workspace, &workspace, &workspace, &dialog);

        let result = run_action(&actions, &dialog, MenuAction::CreateDrafts).await;

        assert!(result.is_err());
        assert_eq!(
            dialog.last_alert().as_deref(),
            Some("Create Email Drafts failed: Record field 'Student Email' is missing or blank")
        );
    }
}

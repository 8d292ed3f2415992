// The custom menu: every action the operator can run, in display order.

/// Title shown above the menu entries.
pub const MENU_TITLE: &str = "Custom Menu";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    CopyAndNameFiles,
    OutputFileInfo,
    ShareFilesWithoutNotification,
    ResetAllSharingStatus,
    CreateDrafts,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::CopyAndNameFiles,
        MenuAction::OutputFileInfo,
        MenuAction::ShareFilesWithoutNotification,
        MenuAction::ResetAllSharingStatus,
        MenuAction::CreateDrafts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::CopyAndNameFiles => "Copy and Name Files",
            MenuAction::OutputFileInfo => "Output File Information",
            MenuAction::ShareFilesWithoutNotification => "Share Files Without Notification",
            MenuAction::ResetAllSharingStatus => "Reset All Sharing Status",
            MenuAction::CreateDrafts => "Create Email Drafts",
        }
    }

    /// Name of the matching subcommand.
    pub fn command_name(&self) -> &'static str {
        match self {
            MenuAction::CopyAndNameFiles => "copy-and-name-files",
            MenuAction::OutputFileInfo => "output-file-info",
            MenuAction::ShareFilesWithoutNotification => "share-files",
            MenuAction::ResetAllSharingStatus => "reset-sharing",
            MenuAction::CreateDrafts => "create-drafts",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// 1-based position used for selection.
    pub key: usize,
    pub action: MenuAction,
}

impl MenuEntry {
    pub fn label(&self) -> &'static str {
        self.action.label()
    }
}

/// Builds the menu entries.
pub fn register_menu() -> Vec<MenuEntry> {
    MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| MenuEntry {
            key: i + 1,
            action: *action,
        })
        .collect()
}

/// Resolves an operator's menu choice, by number or by command name.
pub fn select(entries: &[MenuEntry], choice: &str) -> Option<MenuAction> {
    let choice = choice.trim();
    if let Ok(key) = choice.parse::<usize>() {
        return entries.iter().find(|e| e.key == key).map(|e| e.action);
    }
    entries
        .iter()
        .find(|e| e.action.command_name().eq_ignore_ascii_case(choice))
        .map(|e| e.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_lists_every_action_in_order() {
        let menu = register_menu();
        let labels: Vec<&str> = menu.iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Copy and Name Files",
                "Output File Information",
                "Share Files Without Notification",
                "Reset All Sharing Status",
                "Create Email Drafts",
            ]
        );
        assert_eq!(menu[0].key, 1);
        assert_eq!(menu[4].key, 5);
    }

    #[test]
    fn test_select_by_number_or_name() {
        let menu = register_menu();
        assert_eq!(select(&menu, "3"), Some(MenuAction::ShareFilesWithoutNotification));
        assert_eq!(select(&menu, " create-drafts "), Some(MenuAction::CreateDrafts));
        assert_eq!(select(&menu, "0"), None);
        assert_eq!(select(&menu, "6"), None);
        assert_eq!(select(&menu, "quit"), None);
    }
}

use clap::{Parser, Subcommand};

use crate::core::actions::MenuAction;

/// Copy application sheets, share them with students and instructors, and
/// draft the emails that point them there.
#[derive(Debug, Parser)]
#[command(name = "sheetshare", version, about)]
pub struct Cli {
    /// Do not ask before granting or removing editor access.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the custom menu and run actions from it.
    Menu,
    /// Copy a sample file once per name on the create sheet.
    CopyAndNameFiles,
    /// Write information about every file in a folder to the share sheet.
    OutputFileInfo,
    /// Share files with students and instructors without notification emails.
    ShareFiles,
    /// Remove every editor from all files in a folder.
    ResetSharing,
    /// Create one email draft per share record.
    CreateDrafts,
    /// Check the service account credentials by requesting an access token.
    Authorize,
}

impl Command {
    /// The menu action a subcommand runs directly, if any.
    pub fn action(&self) -> Option<MenuAction> {
        match self {
            Command::CopyAndNameFiles => Some(MenuAction::CopyAndNameFiles),
            Command::OutputFileInfo => Some(MenuAction::OutputFileInfo),
            Command::ShareFiles => Some(MenuAction::ShareFilesWithoutNotification),
            Command::ResetSharing => Some(MenuAction::ResetAllSharingStatus),
            Command::CreateDrafts => Some(MenuAction::CreateDrafts),
            Command::Menu | Command::Authorize => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_action_has_a_subcommand() {
        for action in MenuAction::ALL {
            let cli = Cli::try_parse_from(["sheetshare", action.command_name()]).unwrap();
            assert_eq!(cli.command.action(), Some(action));
        }
    }

    #[test]
    fn test_yes_flag_is_global() {
        let cli = Cli::try_parse_from(["sheetshare", "reset-sharing", "--yes"]).unwrap();
        assert!(cli.yes);
        assert_eq!(cli.command, Command::ResetSharing);

        let cli = Cli::try_parse_from(["sheetshare", "menu"]).unwrap();
        assert!(!cli.yes);
        assert_eq!(cli.command.action(), None);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["sheetshare", "share-everything"]).is_err());
        assert!(Cli::try_parse_from(["sheetshare"]).is_err());
    }
}

pub mod workspace_models;
pub mod workspace_ports;

pub use workspace_models::{CellRange, DraftMessage, DriveFile, Folder, PermissionGrant, Role};
pub use workspace_ports::{
    DriveService, MailService, SpreadsheetService, UserDialog, WorkspaceError,
};

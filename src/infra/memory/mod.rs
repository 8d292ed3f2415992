// In-memory stand-ins for the Google services and the terminal, used by the
// test suites to drive actions end to end without network access.

pub mod in_memory_workspace;
pub mod scripted_dialog;

pub use in_memory_workspace::{InMemoryWorkspace, WorkspaceCall};
pub use scripted_dialog::ScriptedDialog;

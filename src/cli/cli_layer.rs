// CLI layer - argument parsing, the terminal dialog and the interactive menu.

#[path = "args.rs"]
pub mod args;

#[path = "terminal_dialog.rs"]
pub mod terminal_dialog;

#[path = "menu.rs"]
pub mod menu;

pub use args::{Cli, Command};
pub use terminal_dialog::TerminalDialog;

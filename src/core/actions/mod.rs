pub mod menu_actions;
pub mod menu_catalog;

pub use menu_actions::{ActionOutcome, SheetActions};
pub use menu_catalog::{register_menu, MenuAction, MENU_TITLE};

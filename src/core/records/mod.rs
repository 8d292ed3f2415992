pub mod record_loader;
pub mod record_models;

pub use record_loader::RecordLoader;
pub use record_models::{records_from_table, Record};

// The core module contains all business logic.
// Nothing in here knows about HTTP, Google wire formats or the terminal; the
// remote services are reached through the traits in `workspace`.

#[path = "workspace/mod.rs"]
pub mod workspace;

#[path = "config/mod.rs"]
pub mod config;

#[path = "identifiers/id_extractor.rs"]
pub mod identifiers;

#[path = "validation/input_validator.rs"]
pub mod validation;

#[path = "records/mod.rs"]
pub mod records;

#[path = "duplication/file_duplicator.rs"]
pub mod duplication;

#[path = "inspection/file_inspector.rs"]
pub mod inspection;

#[path = "permissions/permission_manager.rs"]
pub mod permissions;

#[path = "drafts/draft_composer.rs"]
pub mod drafts;

#[path = "actions/mod.rs"]
pub mod actions;

// Everything an action needs to know about the spreadsheet layout, resolved
// once at start-up and passed into each action explicitly.
//
// Resolution order (later wins):
// 1. Built-in defaults
// 2. JSON file named by `SHEETSHARE_CONFIG_FILE`
// 3. Individual environment variables

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Where things live on the share sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShareSheetLayout {
    /// Row holding the record headers; data starts on the row below.
    pub header_row: u32,
    /// Number of columns read per record, starting at column A.
    pub column_count: u32,
    /// Column that receives the editor list after sharing.
    pub editors_column: u32,
    /// First row of the file report written by `output-file-info`.
    pub report_start_row: u32,
    /// Columns in the file report (name, URL, id, editors, student id).
    pub report_width: u32,
}

impl ShareSheetLayout {
    pub fn first_data_row(&self) -> u32 {
        self.header_row + 1
    }
}

impl Default for ShareSheetLayout {
    fn default() -> Self {
        Self {
            header_row: 2,
            column_count: 9,
            editors_column: 4,
            report_start_row: 3,
            report_width: 5,
        }
    }
}

/// Header names the actions look up in each record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RecordKeys {
    pub file_id: String,
    pub file_link: String,
    pub sheet_name: String,
    pub student_email: String,
    pub instructor_email: String,
    pub student_name: String,
    pub instructor_name: String,
}

impl Default for RecordKeys {
    fn default() -> Self {
        Self {
            file_id: "File ID".to_string(),
            file_link: "File Link".to_string(),
            sheet_name: "Sheet Name".to_string(),
            student_email: "Student Email".to_string(),
            instructor_email: "Instructor Email".to_string(),
            student_name: "Student Name(ENG)".to_string(),
            instructor_name: "Instructor Name(ENG)".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DraftTemplate {
    pub subject: String,
    pub signature: String,
}

impl Default for DraftTemplate {
    fn default() -> Self {
        Self {
            subject: "Please Access the Application Sheet".to_string(),
            signature: "Division Name".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Id of the spreadsheet hosting the create and share sheets.
    pub spreadsheet_id: String,
    pub create_sheet_name: String,
    pub share_sheet_name: String,
    pub share_layout: ShareSheetLayout,
    pub record_keys: RecordKeys,
    pub draft: DraftTemplate,
    /// Ask before sharing or removing editors.
    pub confirm_destructive: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            create_sheet_name: "Create".to_string(),
            share_sheet_name: "Share".to_string(),
            share_layout: ShareSheetLayout::default(),
            record_keys: RecordKeys::default(),
            draft: DraftTemplate::default(),
            confirm_destructive: true,
        }
    }
}

impl AppConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds the config from the optional JSON file and environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("SHEETSHARE_CONFIG_FILE") {
            Ok(path) => {
                tracing::info!("Loading config from {}", path);
                Self::from_json_file(&path)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `SHEETSHARE_*` overrides using `lookup` to read each variable.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup("SHEETSHARE_SPREADSHEET_ID") {
            self.spreadsheet_id = id;
        }
        if let Some(name) = lookup("SHEETSHARE_CREATE_SHEET") {
            self.create_sheet_name = name;
        }
        if let Some(name) = lookup("SHEETSHARE_SHARE_SHEET") {
            self.share_sheet_name = name;
        }
        if let Some(subject) = lookup("SHEETSHARE_DRAFT_SUBJECT") {
            self.draft.subject = subject;
        }
        if let Some(signature) = lookup("SHEETSHARE_DRAFT_SIGNATURE") {
            self.draft.signature = signature;
        }
        if let Some(value) = lookup("SHEETSHARE_CONFIRM_DESTRUCTIVE") {
            self.confirm_destructive =
                value
                    .parse::<bool>()
                    .map_err(|_| ConfigError::InvalidValue {
                        name: "SHEETSHARE_CONFIRM_DESTRUCTIVE",
                        value,
                    })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ConfigError::Missing("SHEETSHARE_SPREADSHEET_ID"));
        }
        let layout = &self.share_layout;
        if layout.header_row == 0 || layout.report_start_row == 0 {
            return Err(ConfigError::InvalidValue {
                name: "share_layout",
                value: "rows are 1-based".to_string(),
            });
        }
        if layout.editors_column == 0 || layout.editors_column > layout.column_count {
            return Err(ConfigError::InvalidValue {
                name: "share_layout.editors_column",
                value: layout.editors_column.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_sheet_layout() {
        let config = AppConfig::default();
        assert_eq!(config.share_layout.first_data_row(), 3);
        assert_eq!(config.share_layout.column_count, 9);
        assert_eq!(config.record_keys.student_email, "Student Email");
        assert!(config.confirm_destructive);
    }

    #[test]
    fn test_missing_spreadsheet_id_is_rejected() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("SHEETSHARE_SPREADSHEET_ID"))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SHEETSHARE_SPREADSHEET_ID", "sheet-123"),
            ("SHEETSHARE_SHARE_SHEET", "Sharing"),
            ("SHEETSHARE_CONFIRM_DESTRUCTIVE", "false"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.spreadsheet_id, "sheet-123");
        assert_eq!(config.share_sheet_name, "Sharing");
        assert_eq!(config.create_sheet_name, "Create");
        assert!(!config.confirm_destructive);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_bool_override() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|name| {
            (name == "SHEETSHARE_CONFIRM_DESTRUCTIVE").then(|| "sometimes".to_string())
        });
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_partial_json_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "spreadsheet_id": "abc",
                "share_layout": {{ "editors_column": 5 }},
                "draft": {{ "signature": "Admissions Office" }}
            }}"#
        )
        .unwrap();

        let config = AppConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.spreadsheet_id, "abc");
        assert_eq!(config.share_layout.editors_column, 5);
        assert_eq!(config.share_layout.header_row, 2);
        assert_eq!(config.draft.signature, "Admissions Office");
        assert_eq!(config.draft.subject, "Please Access the Application Sheet");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_editors_column_outside_record_width() {
        let mut config = AppConfig {
            spreadsheet_id: "abc".to_string(),
            ..AppConfig::default()
        };
        config.share_layout.editors_column = 12;
        assert!(config.validate().is_err());
    }
}

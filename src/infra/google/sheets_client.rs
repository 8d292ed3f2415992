use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ensure_success, ServiceAccountAuth};
use crate::core::workspace::workspace_models::open_column_a1;
use crate::core::workspace::{CellRange, SpreadsheetService, WorkspaceError};

const SERVICE: &str = "Sheets";

/// Sheets API v4 client bound to one spreadsheet.
pub struct GoogleSheetsClient {
    client: Client,
    auth: ServiceAccountAuth,
    base_url: String,
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Formatted cell values arrive as strings, but stay lenient about numbers
/// and booleans in case the render option changes.
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn rows_to_strings(values: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect()
}

impl GoogleSheetsClient {
    pub fn new(auth: ServiceAccountAuth, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    /// `values/{range}` endpoint. The range goes in as one encoded path
    /// segment, since sheet names may hold `/`, `#` or `?`.
    fn values_url(&self, a1: &str, suffix: &str) -> Result<Url, WorkspaceError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| WorkspaceError::Http(format!("Invalid base URL: {}", e)))?;
        let base_url = &self.base_url;
        url.path_segments_mut()
            .map_err(|_| WorkspaceError::Http(format!("Base URL {} has no path", base_url)))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{}{}", a1, suffix));
        Ok(url)
    }

    async fn get_values(&self, a1: &str) -> Result<Vec<Vec<String>>, WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        tracing::debug!(range = a1, "Reading values");

        let response = self
            .client
            .get(self.values_url(a1, "")?)
            .bearer_auth(token)
            .query(&[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "FORMATTED_VALUE"),
            ])
            .send()
            .await?;
        let range: ValueRange = ensure_success(SERVICE, response).await?.json().await?;
        Ok(rows_to_strings(range.values))
    }
}

#[async_trait]
impl SpreadsheetService for GoogleSheetsClient {
    async fn sheet_exists(&self, sheet: &str) -> Result<bool, WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, self.spreadsheet_id))
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .await?;
        let meta: SpreadsheetMeta = ensure_success(SERVICE, response).await?.json().await?;
        Ok(meta.sheets.iter().any(|s| s.properties.title == sheet))
    }

    async fn read_column(
        &self,
        sheet: &str,
        column: u32,
        start_row: u32,
    ) -> Result<Vec<String>, WorkspaceError> {
        let rows = self
            .get_values(&open_column_a1(sheet, column, start_row))
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().next().unwrap_or_default())
            .collect())
    }

    async fn read_range(&self, range: &CellRange) -> Result<Vec<Vec<String>>, WorkspaceError> {
        self.get_values(&range.to_a1()).await
    }

    async fn write_range(
        &self,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let a1 = range.to_a1();
        tracing::debug!(range = a1.as_str(), rows = rows.len(), "Writing values");

        let response = self
            .client
            .put(self.values_url(&a1, "")?)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({
                "range": a1,
                "majorDimension": "ROWS",
                "values": rows,
            }))
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;
        Ok(())
    }

    async fn clear_range(&self, range: &CellRange) -> Result<(), WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let a1 = range.to_a1();
        tracing::debug!(range = a1.as_str(), "Clearing values");

        let response = self
            .client
            .post(self.values_url(&a1, ":clear")?)
            .bearer_auth(token)
            .json(&json!({}))
            .send()
            .await?;
        ensure_success(SERVICE, response).await?;
        Ok(())
    }
}

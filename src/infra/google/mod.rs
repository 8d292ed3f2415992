// =============================================================================
// GOOGLE WORKSPACE ADAPTERS
// =============================================================================
//
// Implementations of the core workspace traits over the Google REST APIs:
// - `sheets_client.rs` -> Sheets API v4 (cell reads and writes)
// - `drive_client.rs`  -> Drive API v3 (folders, copies, permissions)
// - `gmail_client.rs`  -> Gmail API v1 (drafts)
//
// All three share one `ServiceAccountAuth`, so a single token covers every
// scope the actions need.

pub mod drive_client;
pub mod gmail_client;
pub mod service_account_auth;
pub mod sheets_client;

pub use drive_client::GoogleDriveClient;
pub use gmail_client::GmailClient;
pub use service_account_auth::ServiceAccountAuth;
pub use sheets_client::GoogleSheetsClient;

use reqwest::Response;

use crate::core::workspace::WorkspaceError;

impl From<reqwest::Error> for WorkspaceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WorkspaceError::Decode(err.to_string())
        } else {
            WorkspaceError::Http(err.to_string())
        }
    }
}

/// Turns a non-success response into `WorkspaceError::Api` with its body.
pub(crate) async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, WorkspaceError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(WorkspaceError::Api {
        service,
        status,
        body,
    })
}

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ensure_success, ServiceAccountAuth};
use crate::core::workspace::{DraftMessage, MailService, WorkspaceError};

const SERVICE: &str = "Gmail";

/// Gmail API v1 client acting on the authenticated user's mailbox.
pub struct GmailClient {
    client: Client,
    auth: ServiceAccountAuth,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DraftResponse {
    id: String,
}

/// Header values come from sheet cells; a line break there would start a new
/// header, so CR and LF collapse to spaces.
fn single_line(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    let value = single_line(value);
    if value.is_ascii() {
        value
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value))
    }
}

/// Wraps base64 output at 76 characters per line.
fn wrap_base64(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(76)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\r\n")
}

/// Renders the draft as an HTML MIME message.
pub fn build_mime(message: &DraftMessage, date: DateTime<Utc>) -> String {
    let mut headers = vec![
        format!("To: {}", single_line(&message.to)),
        format!("Subject: {}", encode_header(&message.subject)),
        format!("Date: {}", date.to_rfc2822()),
        "MIME-Version: 1.0".to_string(),
        "Content-Type: text/html; charset=UTF-8".to_string(),
        "Content-Transfer-Encoding: base64".to_string(),
    ];
    if let Some(cc) = &message.cc {
        headers.insert(1, format!("Cc: {}", single_line(cc)));
    }

    format!(
        "{}\r\n\r\n{}",
        headers.join("\r\n"),
        wrap_base64(&STANDARD.encode(&message.html_body))
    )
}

impl GmailClient {
    pub fn new(auth: ServiceAccountAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: "https://gmail.googleapis.com/gmail/v1/users/me".to_string(),
        }
    }
}

#[async_trait]
impl MailService for GmailClient {
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, WorkspaceError> {
        let token = self.auth.get_access_token().await?;
        let raw = URL_SAFE.encode(build_mime(message, Utc::now()));
        tracing::debug!(to = message.to.as_str(), "Creating draft");

        let response = self
            .client
            .post(format!("{}/drafts", self.base_url))
            .bearer_auth(token)
            .json(&json!({ "message": { "raw": raw } }))
            .send()
            .await?;
        let draft: DraftResponse = ensure_success(SERVICE, response).await?.json().await?;
        Ok(draft.id)
    }
}

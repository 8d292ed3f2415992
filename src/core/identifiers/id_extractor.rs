// Pulls storage-service ids out of URLs pasted by the operator.
// Drive/Sheets ids are long runs of ASCII word characters and hyphens, so the
// first run of 25 or more of them is taken as the id. No lookup happens here;
// callers check that the id resolves.

use regex::Regex;
use std::sync::OnceLock;

use crate::core::workspace::UserDialog;

/// Shortest run of id characters accepted as a resource id.
pub const MIN_ID_LENGTH: usize = 25;

pub const INVALID_URL_NOTICE: &str = "Invalid URL. Please check the URL and try again.";

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!("[-_A-Za-z0-9]{{{},}}", MIN_ID_LENGTH))
            .unwrap_or_else(|e| panic!("id pattern failed to compile: {e}"))
    })
}

/// Returns the first maximal run of at least [`MIN_ID_LENGTH`] id characters.
pub fn extract_id(url: &str) -> Option<&str> {
    id_pattern().find(url).map(|m| m.as_str())
}

/// Like [`extract_id`], but tells the operator when the URL holds no id.
pub async fn extract_id_or_alert<U: UserDialog + ?Sized>(dialog: &U, url: &str) -> Option<String> {
    match extract_id(url) {
        Some(id) => Some(id.to_string()),
        None => {
            tracing::warn!(url, "No resource id found in URL");
            dialog.alert(INVALID_URL_NOTICE).await;
            None
        }
    }
}

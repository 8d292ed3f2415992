// Gate checks run before an action touches anything remote. Each check shows
// its own notice on failure and hands back `false`; the caller returns early.

use crate::core::workspace::UserDialog;

/// What a prompt yields when the operator presses Cancel.
pub const CANCEL_SENTINEL: &str = "cancel";

pub const EMPTY_INPUT_NOTICE: &str = "Input was cancelled or empty.";

/// Pure form of the input check.
pub fn input_is_present(value: &str) -> bool {
    !(value.is_empty() || value == CANCEL_SENTINEL)
}

pub async fn is_non_empty_input<U: UserDialog + ?Sized>(dialog: &U, value: &str) -> bool {
    if !input_is_present(value) {
        tracing::warn!("Prompt was cancelled or left empty");
        dialog.alert(EMPTY_INPUT_NOTICE).await;
        return false;
    }
    true
}

/// Checks that a looked-up resource was found. `kind_label` names it in the
/// notice, e.g. "Folder" gives "The designated folder does not exist.".
pub async fn exists<T, U: UserDialog + ?Sized>(
    dialog: &U,
    resource: Option<&T>,
    kind_label: &str,
) -> bool {
    if resource.is_none() {
        tracing::warn!(kind = kind_label, "Designated resource not found");
        dialog.alert(&missing_notice(kind_label)).await;
        return false;
    }
    true
}

pub fn missing_notice(kind_label: &str) -> String {
    format!(
        "The designated {} does not exist.",
        kind_label.to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::ScriptedDialog;

    #[test]
    fn test_input_is_present() {
        assert!(!input_is_present(""));
        assert!(!input_is_present(CANCEL_SENTINEL));
        assert!(input_is_present("Cancel"));
        assert!(input_is_present(" "));
        assert!(input_is_present("https://drive.google.com/drive/folders/abc"));
    }

    #[tokio::test]
    async fn test_rejected_input_shows_notice() {
        let dialog = ScriptedDialog::new();
        assert!(!is_non_empty_input(&dialog, "").await);
        assert!(!is_non_empty_input(&dialog, "cancel").await);
        assert!(is_non_empty_input(&dialog, "folder").await);
        assert_eq!(
            dialog.alerts(),
            vec![EMPTY_INPUT_NOTICE.to_string(), EMPTY_INPUT_NOTICE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_exists_names_the_resource_kind() {
        let dialog = ScriptedDialog::new();
        let missing: Option<&String> = None;
        assert!(!exists(&dialog, missing, "Sample Sheet").await);

        let found = "file".to_string();
        assert!(exists(&dialog, Some(&found), "Folder").await);

        assert_eq!(
            dialog.alerts(),
            vec!["The designated sample sheet does not exist.".to_string()]
        );
    }
}

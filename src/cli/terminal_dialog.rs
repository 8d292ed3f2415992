// Terminal rendition of the spreadsheet's modal prompts and notices.
// Typing `cancel` or closing stdin answers a prompt with the cancel sentinel.

use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;

use crate::core::validation::CANCEL_SENTINEL;
use crate::core::workspace::UserDialog;

pub struct TerminalDialog<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl TerminalDialog<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> TerminalDialog<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    async fn write(&self, text: &str) {
        let mut output = self.output.lock().await;
        if let Err(e) = output.write_all(text.as_bytes()).await {
            tracing::warn!("Failed to write to terminal: {}", e);
        }
        let _ = output.flush().await;
    }

    /// One line of input without its line ending; `None` on EOF.
    async fn read_line(&self) -> Option<String> {
        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("Failed to read from terminal: {}", e);
                None
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

#[async_trait]
impl<R, W> UserDialog for TerminalDialog<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn prompt(&self, message: &str) -> String {
        self.write(&format!("{}\n(type '{}' to cancel) > ", message, CANCEL_SENTINEL))
            .await;
        match self.read_line().await {
            Some(line) => line.trim().to_string(),
            None => CANCEL_SENTINEL.to_string(),
        }
    }

    async fn alert(&self, message: &str) {
        self.write(&format!("» {}\n", message)).await;
    }

    async fn confirm(&self, message: &str) -> bool {
        self.write(&format!("{} [y/N] > ", message)).await;
        matches!(
            self.read_line().await.map(|l| l.trim().to_ascii_lowercase()).as_deref(),
            Some("y") | Some("yes")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialog(input: &'static str) -> TerminalDialog<&'static [u8], Vec<u8>> {
        TerminalDialog::new(input.as_bytes(), Vec::new())
    }

    #[tokio::test]
    async fn test_prompt_reads_a_trimmed_line() {
        let dialog = dialog("  https://drive.google.com/x  \r\nnext\n");
        assert_eq!(dialog.prompt("Folder URL").await, "https://drive.google.com/x");
        assert_eq!(dialog.prompt("Again").await, "next");

        let output = String::from_utf8(dialog.into_output()).unwrap();
        assert!(output.starts_with("Folder URL\n(type 'cancel' to cancel) > "));
    }

    #[tokio::test]
    async fn test_eof_and_blank_lines() {
        let dialog = dialog("\n");
        assert_eq!(dialog.prompt("First").await, "");
        assert_eq!(dialog.prompt("Second").await, CANCEL_SENTINEL);
    }

    #[tokio::test]
    async fn test_confirm_accepts_only_yes() {
        let dialog = dialog("Y\nyes\nno\n\n");
        assert!(dialog.confirm("Go?").await);
        assert!(dialog.confirm("Go?").await);
        assert!(!dialog.confirm("Go?").await);
        assert!(!dialog.confirm("Go?").await);
        assert!(!dialog.confirm("Go?").await);
    }

    #[tokio::test]
    async fn test_alert_is_printed() {
        let dialog = dialog("");
        dialog.alert("Drafts were successfully created in Gmail.").await;
        let output = String::from_utf8(dialog.into_output()).unwrap();
        assert_eq!(output, "» Drafts were successfully created in Gmail.\n");
    }
}

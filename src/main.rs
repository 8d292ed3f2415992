// This is the entry point of the sheet sharing tool.
//
// **Architecture Overview:**
// - `core/` = Business logic (no HTTP, no terminal)
// - `infra/` = Implementations of core traits (Google REST APIs)
// - `cli/` = Terminal adapters (arguments, prompts, the custom menu)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize the Google clients (dependency injection)
// 3. Run the requested action, or the interactive menu

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "cli/cli_layer.rs"]
mod cli;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use anyhow::Context;
use clap::Parser;

use crate::cli::menu::{run_action, run_menu};
use crate::cli::{Cli, Command, TerminalDialog};
use crate::core::actions::SheetActions;
use crate::core::config::AppConfig;
use crate::infra::google::{
    GmailClient, GoogleDriveClient, GoogleSheetsClient, ServiceAccountAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with prompts on stdout.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let auth = ServiceAccountAuth::from_env()
        .await
        .context("Failed to load Google service account credentials")?;

    if cli.command == Command::Authorize {
        auth.get_access_token()
            .await
            .context("Authorization failed")?;
        println!(
            "✅ Authorized {} for Sheets, Drive and Gmail.",
            auth.service_account_email()
        );
        return Ok(());
    }

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if cli.yes {
        config.confirm_destructive = false;
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // One authenticator (and so one cached token) shared by every client.

    let sheets = GoogleSheetsClient::new(auth.clone(), config.spreadsheet_id.clone());
    let drive = GoogleDriveClient::new(auth.clone());
    let mail = GmailClient::new(auth);
    let dialog = TerminalDialog::stdio();
    let actions = SheetActions::new(&config, &sheets, &drive, &mail, &dialog);

    match cli.command.action() {
        Some(action) => {
            run_action(&actions, &dialog, action).await?;
        }
        None => {
            let ran = run_menu(&actions, &dialog).await;
            tracing::info!(ran, "Menu closed");
        }
    }

    Ok(())
}

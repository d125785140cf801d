//! Bolso CLI - Sarcastic expense tracking assistant
//!
//! Usage:
//!   bolso chat                       Interactive chat session
//!   bolso send "Gastei 45 no mercado"  One-shot turn
//!   bolso send --image nota.jpg      Send a receipt photo
//!   bolso expenses                   List recorded expenses
//!   bolso dashboard                  Ledger summary

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let store = commands::open_store(cli.ledger.as_ref());

    match cli.command {
        Commands::Chat => {
            let gateway = commands::open_gateway()?;
            commands::cmd_chat(gateway, store, cli.mute).await
        }
        Commands::Send { text, image, audio } => {
            let gateway = commands::open_gateway()?;
            commands::cmd_send(
                gateway,
                store,
                &text,
                image.as_deref(),
                audio.as_deref(),
                cli.mute,
            )
            .await
        }
        Commands::Expenses { action } => match action {
            None | Some(ExpensesAction::List) => commands::cmd_expenses_list(&store),
            Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&store, &id),
            Some(ExpensesAction::Clear { yes }) => commands::cmd_expenses_clear(&store, yes),
        },
        Commands::Dashboard => commands::cmd_dashboard(&store),
        Commands::Status => commands::cmd_status(&store).await,
    }
}

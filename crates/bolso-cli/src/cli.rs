//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Bolso - Sarcastic expense tracking assistant
#[derive(Parser)]
#[command(name = "bolso")]
#[command(about = "Chat-based expense tracker with a sharp tongue", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Ledger file path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip spoken replies (no TTS requests)
    #[arg(short, long, global = true)]
    pub mute: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Send a single turn and print the reply
    Send {
        /// Message text (may be empty when sending media)
        #[arg(default_value = "")]
        text: String,

        /// Attach a receipt photo (JPEG file)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Attach a voice note (WebM file)
        #[arg(short, long)]
        audio: Option<PathBuf>,
    },

    /// Manage recorded expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Show ledger summary
    Dashboard,

    /// Show gateway and ledger status
    Status,
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List recorded expenses
    List,

    /// Delete an expense by id
    Delete {
        /// Expense id (as shown by `expenses list`)
        id: String,
    },

    /// Delete all recorded expenses
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

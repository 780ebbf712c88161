//! CLI command definitions for the `paychat` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod pay;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Chat with an AI assistant and start mobile-money payments.
#[derive(Parser)]
#[command(name = "paychat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Path to a paychat.toml config file.
    #[arg(long, global = true, env = "PAYCHAT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat,

    /// Initiate a payment and print the checkout link.
    Pay(PayArgs),

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args, Debug, Default)]
pub struct PayArgs {
    /// Amount to charge, a positive whole number. Prompted for when omitted.
    #[arg(long)]
    pub amount: Option<String>,

    /// Where the payer lands after checkout. Defaults to the configured URL.
    #[arg(long)]
    pub redirect_url: Option<String>,

    /// Payer name.
    #[arg(long)]
    pub name: Option<String>,

    /// Payer email.
    #[arg(long)]
    pub email: Option<String>,

    /// Your identifier for the payer.
    #[arg(long)]
    pub user_id: Option<String>,

    /// Your identifier for this transaction.
    #[arg(long)]
    pub external_id: Option<String>,

    /// Description shown on the checkout page.
    #[arg(long)]
    pub message: Option<String>,
}

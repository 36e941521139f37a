//! Command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Admin panel for contacts, quote requests and newsletter campaigns.
#[derive(Debug, Parser)]
#[command(name = "crmdesk", version, about)]
pub struct Cli {
    /// Settings file (defaults to the user config directory).
    #[arg(long, global = true, env = "CRMDESK_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// JSON snapshot with `contacts` and `quotes` arrays.
    #[arg(long, global = true, env = "CRMDESK_DATA")]
    pub data: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List contacts, optionally filtered by name, email or company.
    Contacts {
        /// Search text.
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List quote requests, optionally filtered by client, service or id.
    Quotes {
        /// Search text.
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List recipient groups.
    Audiences,

    /// Send a newsletter campaign.
    Send {
        /// Subject line.
        #[arg(long, default_value = "")]
        subject: String,

        /// Message body.
        #[arg(long, default_value = "")]
        content: String,

        /// Audience id (see `audiences`).
        #[arg(long)]
        audience: Option<String>,
    },
}

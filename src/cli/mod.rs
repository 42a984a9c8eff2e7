//! CLI module - Command-line interface for the email engine
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Email Engine - template admin portal backend
/// Personalized bulk email to your user base
#[derive(Parser)]
#[command(name = "email-engine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Create the bootstrap admin and demo users if missing
    Seed,

    /// Delete all admins, users, templates and delivery records
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// List users
    #[command(alias = "u")]
    Users,

    /// List templates
    #[command(alias = "t")]
    Templates,

    /// Show recent bulk sends
    #[command(alias = "h")]
    History {
        /// Number of entries to show
        #[arg(default_value = "10")]
        limit: u64,
    },

    /// Print an Argon2id hash for a password
    HashPassword {
        password: String,
    },
}

pub use commands::*;

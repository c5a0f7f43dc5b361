//! appwatch - app update notifier
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Watches store applications for new versions and announces them to a chat
//! webhook.
//!
//! # Overview
//!
//! Two checks are available, both over HTTP and from the command line:
//!
//! - **ad-hoc**: look up one application and post its current version to a
//!   webhook supplied with the request.
//! - **persistent**: walk the configured applications, compare against the
//!   stored version record, post one message per change and write the
//!   record back.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.appwatch/
//! ├── config.toml    # Service configuration
//! └── versions.json  # Version record (local store)
//! ```

pub mod cmd;
pub mod server;

pub use appwatch_core::USER_AGENT;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Version reported by the binary and the health endpoint.
pub const VERSION: &str = env!("APPWATCH_VERSION");

#[derive(Debug, Parser)]
#[command(name = "appwatch")]
#[command(author, version = VERSION, about = "appwatch - app update notifier")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, short, global = true, env = "APPWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Detect updates without posting notifications or saving versions
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides config)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Check one application and post it to a webhook
    Notify {
        /// Application identifier
        app_id: String,
        /// Webhook to post to (defaults to the configured webhook)
        #[arg(long)]
        webhook: Option<String>,
    },
    /// Run one pass over the tracked applications
    Check,
    /// Run passes on the configured interval until interrupted
    Watch {
        /// Seconds between passes (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

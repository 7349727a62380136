//! # faqdesk CLI (`faqd`)
//!
//! ## Usage
//!
//! ```bash
//! faqd --config ./config/faqd.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `faqd init` | Create the SQLite schema and seed sample FAQs |
//! | `faqd serve` | Start the HTTP server |
//! | `faqd ask "<query>"` | Resolve a query (records it as pending if unmatched) |
//! | `faqd faqs` | List stored FAQs |
//! | `faqd pending list` | List pending queries, newest first |
//! | `faqd pending email <id> <address>` | Attach a contact email to a pending query |
//! | `faqd pending answer <id> "<answer>"` | Answer a pending query, creating an FAQ |
//! | `faqd pending delete <id>` | Delete a pending query |
//!
//! Log verbosity follows `RUST_LOG` (default `faqdesk=info`). Logs go to
//! stderr; command output goes to stdout.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use faqdesk::{ask, config, migrate, pending, server};

/// faqdesk — answer FAQs by keyword matching and queue the rest for a human.
#[derive(Parser)]
#[command(name = "faqd", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/faqd.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema and seed sample FAQs.
    ///
    /// Idempotent: tables are created only if missing and seeding only
    /// happens while the FAQ table is empty.
    Init,

    /// Start the HTTP server.
    ///
    /// Requires an admin password (`[admin].password` or
    /// `FAQDESK_ADMIN_PASSWORD`).
    Serve,

    /// Resolve a query against the stored FAQs.
    Ask {
        /// The question text.
        query: String,

        /// Contact email to attach if the query ends up pending.
        #[arg(long)]
        email: Option<String>,
    },

    /// List stored FAQs.
    Faqs,

    /// Triage pending (unanswered) queries.
    Pending {
        #[command(subcommand)]
        action: PendingAction,
    },
}

#[derive(Subcommand)]
enum PendingAction {
    /// List pending queries, most recent first.
    List,
    /// Attach a contact email to a pending query.
    Email {
        /// Pending query id.
        id: i64,
        /// Contact email address.
        email: String,
    },
    /// Answer a pending query. Creates an FAQ and marks the query answered.
    Answer {
        /// Pending query id.
        id: i64,
        /// Answer text.
        answer: String,
    },
    /// Delete a pending query regardless of its status.
    Delete {
        /// Pending query id.
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("faqdesk=info,faqdesk_core=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let seeded = migrate::init_database(&cfg).await?;
            println!("Database initialized successfully.");
            if seeded > 0 {
                println!("Seeded {} sample FAQs.", seeded);
            }
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ask { query, email } => {
            ask::run_ask(&cfg, &query, email).await?;
        }
        Commands::Faqs => {
            ask::run_list_faqs(&cfg).await?;
        }
        Commands::Pending { action } => match action {
            PendingAction::List => pending::run_pending_list(&cfg).await?,
            PendingAction::Email { id, email } => {
                pending::run_pending_email(&cfg, id, &email).await?
            }
            PendingAction::Answer { id, answer } => {
                pending::run_pending_answer(&cfg, id, &answer).await?
            }
            PendingAction::Delete { id } => pending::run_pending_delete(&cfg, id).await?,
        },
    }

    Ok(())
}

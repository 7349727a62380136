//! # faqdesk
//!
//! A small FAQ-answering service. Clients send a free-text question; the
//! service matches it against stored question/answer pairs and, when
//! nothing matches, records it as a pending query for a human to answer.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────┐   ┌──────────┐
//! │ HTTP/CLI │──▶│ Resolver (core)      │──▶│  SQLite  │
//! │          │   │ exact → contains →   │   │ faqs +   │
//! │          │   │ tags → overlap       │   │ pending  │
//! └──────────┘   └──────────────────────┘   └──────────┘
//! ```
//!
//! Matching, keyword extraction, and the store trait live in
//! [`faqdesk_core`]. This crate supplies the SQLite store, configuration,
//! the HTTP server, and the `faqd` CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! faqd init                         # create and seed the database
//! faqd ask "how do I export data"   # resolve a query locally
//! faqd serve                        # start the HTTP server
//! faqd pending list                 # triage unanswered queries
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Schema creation and sample-data seeding |
//! | [`sqlite_store`] | SQLite implementation of [`FaqStore`](faqdesk_core::FaqStore) |
//! | [`auth`] | Constant-time admin secret check |
//! | [`server`] | HTTP API (Axum) |
//! | [`ask`] | `faqd ask` / `faqd faqs` |
//! | [`pending`] | `faqd pending` triage commands |

pub mod ask;
pub mod auth;
pub mod config;
pub mod db;
pub mod migrate;
pub mod pending;
pub mod server;
pub mod sqlite_store;

pub use faqdesk_core::{resolver, store};

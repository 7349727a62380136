//! `faqd pending`: triage pending queries from the command line.
//!
//! The CLI operates on the database file directly, so it runs the admin
//! actions as a [`LocalOperator`] rather than asking for the shared secret.

use anyhow::Result;

use faqdesk_core::resolver::{self, CredentialCheck};

use crate::config::Config;
use crate::migrate::open_store;

/// Credential check for callers that already hold database access.
pub struct LocalOperator;

impl CredentialCheck for LocalOperator {
    fn verify(&self, _provided: &str) -> bool {
        true
    }
}

const LOCAL: Option<&str> = Some("local");

pub async fn run_pending_list(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let pending = resolver::list_pending(&store, &LocalOperator, LOCAL).await;
    store.pool().close().await;
    let pending = pending?;

    if pending.is_empty() {
        println!("No pending queries.");
        return Ok(());
    }

    for p in &pending {
        println!(
            "#{:<5} {:<9} {}  {}",
            p.id,
            p.status,
            p.submitted_at,
            p.user_email.as_deref().unwrap_or("-")
        );
        println!("       {}", p.user_message);
    }
    println!();
    println!("{} pending queries", pending.len());
    Ok(())
}

pub async fn run_pending_email(config: &Config, id: i64, email: &str) -> Result<()> {
    let store = open_store(config).await?;
    let result = resolver::attach_email(&store, Some(id), email).await;
    store.pool().close().await;
    result?;

    println!("email attached to pending query #{}", id);
    Ok(())
}

pub async fn run_pending_answer(config: &Config, id: i64, answer: &str) -> Result<()> {
    let store = open_store(config).await?;
    let faq = resolver::answer_pending(&store, &LocalOperator, LOCAL, Some(id), answer).await;
    store.pool().close().await;
    let faq = faq?;

    println!("pending query #{} answered; created faq #{}", id, faq.id);
    Ok(())
}

pub async fn run_pending_delete(config: &Config, id: i64) -> Result<()> {
    let store = open_store(config).await?;
    let result = resolver::delete_pending(&store, &LocalOperator, LOCAL, Some(id)).await;
    store.pool().close().await;
    result?;

    println!("pending query #{} deleted", id);
    Ok(())
}

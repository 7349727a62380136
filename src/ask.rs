//! `faqd ask` and `faqd faqs`: resolve a query and list FAQs from the CLI.
//!
//! `ask` runs the same resolver as `POST /chat`, so an unmatched query is
//! recorded as pending exactly as it would be over HTTP.

use anyhow::Result;

use faqdesk_core::models::FaqResponse;
use faqdesk_core::resolver::{resolve_query, ChatRequest};
use faqdesk_core::store::FaqStore;

use crate::config::Config;
use crate::migrate::open_store;

pub async fn run_ask(config: &Config, query: &str, email: Option<String>) -> Result<()> {
    let store = open_store(config).await?;
    let request = ChatRequest {
        query: query.to_string(),
        user_email: email,
    };
    let reply = resolve_query(&store, &request).await;
    store.pool().close().await;
    let reply = reply?;

    println!("{}", reply.reply);
    if let Some(id) = reply.pending_id {
        println!();
        println!("recorded as pending query #{}", id);
        if reply.need_email == Some(true) {
            println!("attach an email with `faqd pending email {} <address>` to be notified", id);
        }
    }
    Ok(())
}

pub async fn run_list_faqs(config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let faqs = store.list_all_faqs().await;
    store.pool().close().await;
    let faqs = faqs?;

    if faqs.is_empty() {
        println!("No FAQs.");
        return Ok(());
    }

    for faq in faqs.iter().map(FaqResponse::from) {
        println!("#{} [{}] {}", faq.id, faq.created_at, faq.question);
        println!("    {}", faq.answer);
        if let Some(tags) = &faq.tags {
            println!("    tags: {}", tags);
        }
    }
    Ok(())
}

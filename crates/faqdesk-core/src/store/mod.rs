//! Storage abstraction for faqdesk.
//!
//! The [`FaqStore`] trait defines every storage operation the matcher,
//! the pending-query recorder, and the admin actions need, so that any
//! backend (SQLite, in-memory) can be injected.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Faq, PendingQuery};

/// Abstract storage backend for FAQ records and pending queries.
///
/// "Store order" below means ascending `id`, i.e. insertion order. The
/// matcher's first-hit and tie-break rules depend on it.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_faq_exact`](FaqStore::find_faq_exact) | Case-insensitive question equality |
/// | [`find_faq_containing`](FaqStore::find_faq_containing) | Case-insensitive question containment |
/// | [`find_faq_by_tag_substring`](FaqStore::find_faq_by_tag_substring) | Case-insensitive tag containment |
/// | [`list_all_faqs`](FaqStore::list_all_faqs) | Every FAQ in store order |
/// | [`insert_faq`](FaqStore::insert_faq) | Create an FAQ |
/// | [`count_faqs`](FaqStore::count_faqs) | Number of FAQs |
/// | [`list_pending`](FaqStore::list_pending) | Pending queries, newest first |
/// | [`get_pending`](FaqStore::get_pending) | One pending query by id |
/// | [`insert_pending`](FaqStore::insert_pending) | Record an open pending query |
/// | [`set_pending_email`](FaqStore::set_pending_email) | Attach a contact email |
/// | [`mark_pending_answered`](FaqStore::mark_pending_answered) | Set status to answered |
/// | [`answer_pending`](FaqStore::answer_pending) | Create FAQ + mark answered, atomically |
/// | [`delete_pending`](FaqStore::delete_pending) | Remove a pending query |
#[async_trait]
pub trait FaqStore: Send + Sync {
    /// First FAQ (store order) whose question equals `question`, ignoring case.
    async fn find_faq_exact(&self, question: &str) -> Result<Option<Faq>>;

    /// First FAQ (store order) whose question contains `substring`, ignoring case.
    async fn find_faq_containing(&self, substring: &str) -> Result<Option<Faq>>;

    /// First FAQ (store order) whose tags contain `keyword`, ignoring case.
    async fn find_faq_by_tag_substring(&self, keyword: &str) -> Result<Option<Faq>>;

    /// All FAQs in store order.
    async fn list_all_faqs(&self) -> Result<Vec<Faq>>;

    /// Create an FAQ. `created_at` and `id` are assigned by the store.
    async fn insert_faq(&self, question: &str, answer: &str, tags: Option<&str>) -> Result<Faq>;

    async fn count_faqs(&self) -> Result<i64>;

    /// All pending queries ordered by `submitted_at` descending, then `id` descending.
    async fn list_pending(&self) -> Result<Vec<PendingQuery>>;

    async fn get_pending(&self, id: i64) -> Result<Option<PendingQuery>>;

    /// Record a new pending query with status `open`, in one write together
    /// with the contact email when one is known.
    async fn insert_pending(&self, message: &str, email: Option<&str>) -> Result<PendingQuery>;

    /// Returns `false` if `id` is unknown.
    async fn set_pending_email(&self, id: i64, email: &str) -> Result<bool>;

    /// Returns `false` if `id` is unknown.
    async fn mark_pending_answered(&self, id: i64) -> Result<bool>;

    /// Create an FAQ from the pending query's message and mark it answered,
    /// as one atomic unit. Returns `None` (and changes nothing) if `id` is
    /// unknown.
    async fn answer_pending(&self, id: i64, answer: &str) -> Result<Option<Faq>>;

    /// Returns `false` if `id` is unknown.
    async fn delete_pending(&self, id: i64) -> Result<bool>;
}

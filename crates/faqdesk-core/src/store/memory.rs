//! In-memory [`FaqStore`] implementation for tests and embedding.
//!
//! Records live in `Vec`s behind a single `std::sync::RwLock`, so every
//! mutation (including [`answer_pending`](FaqStore::answer_pending)) is
//! applied under one write guard. Store order is insertion order.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{Faq, PendingQuery, PendingStatus};

use super::FaqStore;

#[derive(Default)]
struct Tables {
    faqs: Vec<Faq>,
    pending: Vec<PendingQuery>,
    next_faq_id: i64,
    next_pending_id: i64,
}

impl Tables {
    fn push_faq(&mut self, question: &str, answer: &str, tags: Option<&str>) -> Faq {
        self.next_faq_id += 1;
        let faq = Faq {
            id: self.next_faq_id,
            question: question.to_string(),
            answer: answer.to_string(),
            tags: tags.map(str::to_string),
            created_at: now(),
        };
        self.faqs.push(faq.clone());
        faq
    }

    fn pending_mut(&mut self, id: i64) -> Option<&mut PendingQuery> {
        self.pending.iter_mut().find(|p| p.id == id)
    }
}

/// In-memory store for tests and single-process use.
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// Build a store pre-populated with `(question, answer, tags)` rows.
    pub fn with_faqs<'a>(rows: impl IntoIterator<Item = (&'a str, &'a str, Option<&'a str>)>) -> Self {
        let mut tables = Tables::default();
        for (q, a, t) in rows {
            tables.push_faq(q, a, t);
        }
        Self {
            tables: RwLock::new(tables),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| anyhow!("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[async_trait]
impl FaqStore for InMemoryStore {
    async fn find_faq_exact(&self, question: &str) -> Result<Option<Faq>> {
        let needle = question.to_lowercase();
        let tables = self.read()?;
        Ok(tables
            .faqs
            .iter()
            .find(|f| f.question.to_lowercase() == needle)
            .cloned())
    }

    async fn find_faq_containing(&self, substring: &str) -> Result<Option<Faq>> {
        let needle = substring.to_lowercase();
        let tables = self.read()?;
        Ok(tables
            .faqs
            .iter()
            .find(|f| f.question.to_lowercase().contains(&needle))
            .cloned())
    }

    async fn find_faq_by_tag_substring(&self, keyword: &str) -> Result<Option<Faq>> {
        let needle = keyword.to_lowercase();
        let tables = self.read()?;
        Ok(tables
            .faqs
            .iter()
            .find(|f| {
                f.tags
                    .as_deref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
            })
            .cloned())
    }

    async fn list_all_faqs(&self) -> Result<Vec<Faq>> {
        Ok(self.read()?.faqs.clone())
    }

    async fn insert_faq(&self, question: &str, answer: &str, tags: Option<&str>) -> Result<Faq> {
        Ok(self.write()?.push_faq(question, answer, tags))
    }

    async fn count_faqs(&self) -> Result<i64> {
        Ok(self.read()?.faqs.len() as i64)
    }

    async fn list_pending(&self) -> Result<Vec<PendingQuery>> {
        let mut pending = self.read()?.pending.clone();
        pending.sort_by(|a, b| {
            b.submitted_at
                .cmp(&a.submitted_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(pending)
    }

    async fn get_pending(&self, id: i64) -> Result<Option<PendingQuery>> {
        Ok(self.read()?.pending.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_pending(&self, message: &str, email: Option<&str>) -> Result<PendingQuery> {
        let mut tables = self.write()?;
        tables.next_pending_id += 1;
        let pending = PendingQuery {
            id: tables.next_pending_id,
            user_email: email.map(str::to_string),
            user_message: message.to_string(),
            status: PendingStatus::Open,
            submitted_at: now(),
        };
        tables.pending.push(pending.clone());
        Ok(pending)
    }

    async fn set_pending_email(&self, id: i64, email: &str) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(match tables.pending_mut(id) {
            Some(p) => {
                p.user_email = Some(email.to_string());
                true
            }
            None => false,
        })
    }

    async fn mark_pending_answered(&self, id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        Ok(match tables.pending_mut(id) {
            Some(p) => {
                p.status = PendingStatus::Answered;
                true
            }
            None => false,
        })
    }

    async fn answer_pending(&self, id: i64, answer: &str) -> Result<Option<Faq>> {
        let mut tables = self.write()?;
        let question = match tables.pending.iter().find(|p| p.id == id) {
            Some(p) => p.user_message.clone(),
            None => return Ok(None),
        };
        let faq = tables.push_faq(&question, answer, None);
        if let Some(p) = tables.pending_mut(id) {
            p.status = PendingStatus::Answered;
        }
        Ok(Some(faq))
    }

    async fn delete_pending(&self, id: i64) -> Result<bool> {
        let mut tables = self.write()?;
        let before = tables.pending.len();
        tables.pending.retain(|p| p.id != id);
        Ok(tables.pending.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> InMemoryStore {
        InMemoryStore::with_faqs([
            (
                "How do I reset my password?",
                "Go to Settings.",
                Some("account,password"),
            ),
            ("How to export data?", "Open Reports.", Some("export,csv")),
        ])
    }

    #[tokio::test]
    async fn test_lookups_ignore_case() {
        let store = seeded();
        let exact = store.find_faq_exact("how to EXPORT data?").await.unwrap();
        assert_eq!(exact.unwrap().id, 2);

        let contains = store.find_faq_containing("RESET MY").await.unwrap();
        assert_eq!(contains.unwrap().id, 1);

        let tagged = store.find_faq_by_tag_substring("CSV").await.unwrap();
        assert_eq!(tagged.unwrap().id, 2);

        assert!(store.find_faq_exact("export").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_faq_without_tags_never_tag_matches() {
        let store = InMemoryStore::new();
        store.insert_faq("Untagged?", "Yes.", None).await.unwrap();
        assert!(store
            .find_faq_by_tag_substring("untagged")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_pending_lifecycle() {
        let store = InMemoryStore::new();
        let p = store.insert_pending("where is my invoice", None).await.unwrap();
        assert_eq!(p.status, PendingStatus::Open);
        assert!(p.user_email.is_none());

        assert!(store.set_pending_email(p.id, "a@b.io").await.unwrap());
        assert!(!store.set_pending_email(99, "a@b.io").await.unwrap());

        let fetched = store.get_pending(p.id).await.unwrap().unwrap();
        assert_eq!(fetched.user_email.as_deref(), Some("a@b.io"));

        assert!(store.delete_pending(p.id).await.unwrap());
        assert!(!store.delete_pending(p.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_pending_newest_first() {
        let store = InMemoryStore::new();
        let first = store.insert_pending("one", None).await.unwrap();
        let second = store.insert_pending("two", None).await.unwrap();
        let ids: Vec<i64> = store
            .list_pending()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_answer_pending_is_all_or_nothing() {
        let store = seeded();
        let p = store.insert_pending("can I pay by invoice", None).await.unwrap();

        assert!(store.answer_pending(404, "nope").await.unwrap().is_none());
        assert_eq!(store.count_faqs().await.unwrap(), 2);

        let faq = store.answer_pending(p.id, "Yes.").await.unwrap().unwrap();
        assert_eq!(faq.question, "can I pay by invoice");
        assert_eq!(faq.tags, None);
        assert_eq!(store.count_faqs().await.unwrap(), 3);
        let p = store.get_pending(p.id).await.unwrap().unwrap();
        assert_eq!(p.status, PendingStatus::Answered);
    }
}

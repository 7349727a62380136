//! Four-stage FAQ matcher.
//!
//! Stages run in order and the first hit wins:
//!
//! 1. **Exact**: a stored question equals the query, ignoring case.
//! 2. **Containment**: a stored question contains the query, ignoring case.
//! 3. **Tag**: for each query keyword in order, the first FAQ whose tags
//!    contain it; the first keyword with a hit wins.
//! 4. **Overlap**: the FAQ whose question keywords share the most distinct
//!    keywords with the query. Only a strictly higher count replaces the
//!    current best, so ties keep the earliest FAQ. A best count of zero is
//!    not a match.
//!
//! String matches (1–3) always outrank keyword overlap, even when another
//! FAQ would score higher in stage 4.

use anyhow::Result;
use tracing::debug;

use crate::keywords::{extract_keywords, overlap_count};
use crate::models::Faq;
use crate::store::FaqStore;

/// Which stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Exact,
    Containment,
    Tag,
    /// Carries the winning overlap count (always ≥ 1).
    Overlap(usize),
}

#[derive(Debug, Clone)]
pub struct Match {
    pub faq: Faq,
    pub stage: MatchStage,
}

/// Pick the FAQ with the strictly highest keyword overlap.
///
/// Returns `None` when no FAQ shares at least one keyword with the query.
pub fn best_overlap<'a>(query_keywords: &[String], faqs: &'a [Faq]) -> Option<(&'a Faq, usize)> {
    let mut best: Option<(&Faq, usize)> = None;
    for faq in faqs {
        let score = overlap_count(query_keywords, &extract_keywords(&faq.question));
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((faq, score));
        }
    }
    best
}

/// Run the four stages against `store` for an already-trimmed, non-empty query.
pub async fn find_match(store: &dyn FaqStore, query: &str) -> Result<Option<Match>> {
    if let Some(faq) = store.find_faq_exact(query).await? {
        return Ok(Some(hit(faq, MatchStage::Exact)));
    }

    if let Some(faq) = store.find_faq_containing(query).await? {
        return Ok(Some(hit(faq, MatchStage::Containment)));
    }

    let keywords = extract_keywords(query);
    if keywords.is_empty() {
        debug!(query, "no keywords; skipping tag and overlap stages");
        return Ok(None);
    }

    for keyword in &keywords {
        if let Some(faq) = store.find_faq_by_tag_substring(keyword).await? {
            return Ok(Some(hit(faq, MatchStage::Tag)));
        }
    }

    let faqs = store.list_all_faqs().await?;
    Ok(best_overlap(&keywords, &faqs).map(|(faq, score)| hit(faq.clone(), MatchStage::Overlap(score))))
}

fn hit(faq: Faq, stage: MatchStage) -> Match {
    debug!(faq_id = faq.id, ?stage, "faq matched");
    Match { faq, stage }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn faq(id: i64, question: &str) -> Faq {
        Faq {
            id,
            question: question.to_string(),
            answer: format!("answer {}", id),
            tags: None,
            created_at: 0,
        }
    }

    fn seeded() -> InMemoryStore {
        InMemoryStore::with_faqs([
            (
                "How do I reset my password?",
                "Go to Settings → Account → Click 'Reset Password' and follow the steps.",
                Some("account,password"),
            ),
            (
                "How to export data?",
                "Open Reports → Export → choose CSV and click Export.",
                Some("export,csv"),
            ),
        ])
    }

    #[tokio::test]
    async fn test_exact_match_beats_overlap() {
        let store = InMemoryStore::with_faqs([
            ("billing invoice refund policy", "A", None),
            ("Refund", "B", None),
        ]);
        let m = find_match(&store, "refund").await.unwrap().unwrap();
        assert_eq!(m.faq.answer, "B");
        assert_eq!(m.stage, MatchStage::Exact);
    }

    #[tokio::test]
    async fn test_containment_beats_overlap() {
        // "setup of a port" shares both keywords with the query; "Export setup"
        // shares only one but contains "port setup" as a substring.
        let store = InMemoryStore::with_faqs([
            ("setup of a port", "overlap", None),
            ("Export setup", "contains", None),
        ]);
        let m = find_match(&store, "port setup").await.unwrap().unwrap();
        assert_eq!(m.stage, MatchStage::Containment);
        assert_eq!(m.faq.answer, "contains");
    }

    #[tokio::test]
    async fn test_containment_first_hit_in_store_order() {
        let store = InMemoryStore::with_faqs([
            ("Where is the export button?", "first", None),
            ("Export formats for data", "second", None),
        ]);
        let m = find_match(&store, "EXPORT").await.unwrap().unwrap();
        assert_eq!(m.faq.answer, "first");
    }

    #[tokio::test]
    async fn test_reset_password_scenario() {
        let store = seeded();
        let m = find_match(&store, "reset my password").await.unwrap().unwrap();
        assert_eq!(m.faq.id, 1);
        assert!(m.faq.answer.starts_with("Go to Settings"));
    }

    #[tokio::test]
    async fn test_tag_stage() {
        let store = seeded();
        let m = find_match(&store, "password help please").await.unwrap().unwrap();
        assert_eq!(m.stage, MatchStage::Tag);
        assert_eq!(m.faq.id, 1);

        let m = find_match(&store, "csv files").await.unwrap().unwrap();
        assert_eq!(m.stage, MatchStage::Tag);
        assert_eq!(m.faq.id, 2);
    }

    #[tokio::test]
    async fn test_tag_stage_first_keyword_wins() {
        let store = InMemoryStore::with_faqs([
            ("Q1", "billing", Some("billing")),
            ("Q2", "shipping", Some("shipping")),
        ]);
        let m = find_match(&store, "shipping billing").await.unwrap().unwrap();
        assert_eq!(m.faq.answer, "shipping");
    }

    #[tokio::test]
    async fn test_overlap_stage() {
        let store = InMemoryStore::with_faqs([
            ("Change shipping address", "A", None),
            ("Update billing address and payment card", "B", None),
        ]);
        let m = find_match(&store, "update payment card").await.unwrap().unwrap();
        assert_eq!(m.faq.answer, "B");
        assert_eq!(m.stage, MatchStage::Overlap(3));
    }

    #[tokio::test]
    async fn test_no_match_for_gibberish() {
        let store = seeded();
        assert!(find_match(&store, "asdkfjasldkf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stop_words_only_query_has_no_keyword_stages() {
        let store = InMemoryStore::with_faqs([("Anything else", "A", Some("the,and"))]);
        assert!(find_match(&store, "what can you do").await.unwrap().is_none());
    }

    #[test]
    fn test_overlap_tie_keeps_earliest() {
        let faqs = vec![
            faq(1, "invoice download"),
            faq(2, "invoice download link"),
        ];
        let q = extract_keywords("download invoice please");
        let (best, score) = best_overlap(&q, &faqs).unwrap();
        assert_eq!(best.id, 1);
        assert_eq!(score, 2);
    }

    #[test]
    fn test_overlap_floor() {
        let faqs = vec![faq(1, "invoice download"), faq(2, "shipping times")];
        let q = extract_keywords("password reset");
        assert!(best_overlap(&q, &faqs).is_none());
        assert!(best_overlap(&[], &faqs).is_none());
    }

    #[test]
    fn test_overlap_counts_distinct_keywords() {
        let faqs = vec![faq(1, "export export export"), faq(2, "export csv")];
        let q = extract_keywords("export csv export");
        let (best, score) = best_overlap(&q, &faqs).unwrap();
        assert_eq!(best.id, 2);
        assert_eq!(score, 2);
    }
}

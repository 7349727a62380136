//! SQLite-backed [`FaqStore`] implementation.
//!
//! Case-insensitive lookups compare a needle lowercased in Rust against the
//! `question_lc` / `tags_lc` columns, which are lowercased in Rust when the
//! row is written. SQLite's `lower()` folds ASCII only and is never used.
//! Store order is ascending `id`.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use faqdesk_core::models::{Faq, PendingQuery, PendingStatus};
use faqdesk_core::store::FaqStore;

const FAQ_COLUMNS: &str = "id, question, answer, tags, created_at";
const PENDING_COLUMNS: &str = "id, user_email, user_message, status, submitted_at";

/// SQLite implementation of the [`FaqStore`] trait.
///
/// Wraps a [`SqlitePool`] and translates every method into one or more
/// statements against the `faqs` and `pending_queries` tables.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn first_faq_where(&self, predicate: &str, needle: &str) -> Result<Option<Faq>> {
        let sql = format!(
            "SELECT {} FROM faqs WHERE {} ORDER BY id ASC LIMIT 1",
            FAQ_COLUMNS, predicate
        );
        let row = sqlx::query(&sql)
            .bind(needle.to_lowercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(faq_from_row))
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn faq_from_row(row: &SqliteRow) -> Faq {
    Faq {
        id: row.get("id"),
        question: row.get("question"),
        answer: row.get("answer"),
        tags: row.get("tags"),
        created_at: row.get("created_at"),
    }
}

fn pending_from_row(row: &SqliteRow) -> Result<PendingQuery> {
    let status: String = row.get("status");
    Ok(PendingQuery {
        id: row.get("id"),
        user_email: row.get("user_email"),
        user_message: row.get("user_message"),
        status: status.parse()?,
        submitted_at: row.get("submitted_at"),
    })
}

#[async_trait]
impl FaqStore for SqliteStore {
    async fn find_faq_exact(&self, question: &str) -> Result<Option<Faq>> {
        self.first_faq_where("question_lc = ?", question).await
    }

    async fn find_faq_containing(&self, substring: &str) -> Result<Option<Faq>> {
        self.first_faq_where("instr(question_lc, ?) > 0", substring)
            .await
    }

    async fn find_faq_by_tag_substring(&self, keyword: &str) -> Result<Option<Faq>> {
        self.first_faq_where("tags_lc IS NOT NULL AND instr(tags_lc, ?) > 0", keyword)
            .await
    }

    async fn list_all_faqs(&self) -> Result<Vec<Faq>> {
        let rows = sqlx::query(&format!("SELECT {} FROM faqs ORDER BY id ASC", FAQ_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(faq_from_row).collect())
    }

    async fn insert_faq(&self, question: &str, answer: &str, tags: Option<&str>) -> Result<Faq> {
        if question.trim().is_empty() || answer.trim().is_empty() {
            anyhow::bail!("faq question and answer must not be empty");
        }
        let created_at = now();
        let id = sqlx::query(
            "INSERT INTO faqs (question, answer, tags, question_lc, tags_lc, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(question)
        .bind(answer)
        .bind(tags)
        .bind(question.to_lowercase())
        .bind(tags.map(str::to_lowercase))
        .bind(created_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Faq {
            id,
            question: question.to_string(),
            answer: answer.to_string(),
            tags: tags.map(str::to_string),
            created_at,
        })
    }

    async fn count_faqs(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM faqs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_pending(&self) -> Result<Vec<PendingQuery>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM pending_queries ORDER BY submitted_at DESC, id DESC",
            PENDING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(pending_from_row).collect()
    }

    async fn get_pending(&self, id: i64) -> Result<Option<PendingQuery>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM pending_queries WHERE id = ?",
            PENDING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(pending_from_row).transpose()
    }

    async fn insert_pending(&self, message: &str, email: Option<&str>) -> Result<PendingQuery> {
        let submitted_at = now();
        let id = sqlx::query(
            "INSERT INTO pending_queries (user_email, user_message, status, submitted_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(message)
        .bind(PendingStatus::Open.as_str())
        .bind(submitted_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(PendingQuery {
            id,
            user_email: email.map(str::to_string),
            user_message: message.to_string(),
            status: PendingStatus::Open,
            submitted_at,
        })
    }

    async fn set_pending_email(&self, id: i64, email: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE pending_queries SET user_email = ? WHERE id = ?")
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_pending_answered(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE pending_queries SET status = ? WHERE id = ?")
            .bind(PendingStatus::Answered.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn answer_pending(&self, id: i64, answer: &str) -> Result<Option<Faq>> {
        let mut tx = self.pool.begin().await?;

        let question: Option<String> =
            sqlx::query_scalar("SELECT user_message FROM pending_queries WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let question = match question {
            Some(q) => q,
            None => {
                tx.rollback().await?;
                return Ok(None);
            }
        };

        let created_at = now();
        let faq_id = sqlx::query(
            "INSERT INTO faqs (question, answer, tags, question_lc, tags_lc, created_at) VALUES (?, ?, NULL, ?, NULL, ?)",
        )
        .bind(&question)
        .bind(answer)
        .bind(question.to_lowercase())
        .bind(created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        sqlx::query("UPDATE pending_queries SET status = ? WHERE id = ?")
            .bind(PendingStatus::Answered.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(Faq {
            id: faq_id,
            question,
            answer: answer.to_string(),
            tags: None,
            created_at,
        }))
    }

    async fn delete_pending(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM pending_queries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

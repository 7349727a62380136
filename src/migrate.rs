//! Database schema migrations and sample-data seeding.
//!
//! Both steps are idempotent: tables are created with `IF NOT EXISTS` and
//! the sample FAQs are inserted only while the FAQ table is empty.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

use faqdesk_core::store::FaqStore;

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// `(question, answer, tags)` rows inserted into an empty database.
pub const SAMPLE_FAQS: &[(&str, &str, &str)] = &[
    (
        "How do I reset my password?",
        "Go to Settings → Account → Click 'Reset Password' and follow the steps.",
        "account,password",
    ),
    (
        "How to export data?",
        "Open Reports → Export → choose CSV and click Export.",
        "export,csv",
    ),
];

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS faqs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            question TEXT NOT NULL CHECK (length(question) > 0),
            answer TEXT NOT NULL CHECK (length(answer) > 0),
            tags TEXT,
            question_lc TEXT NOT NULL,
            tags_lc TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pending_queries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_email TEXT,
            user_message TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'open'
                CHECK (status IN ('open', 'answered', 'ignored')),
            submitted_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_pending_submitted_at ON pending_queries(submitted_at DESC)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert [`SAMPLE_FAQS`] if the store holds no FAQs. Returns the number
/// of rows inserted.
pub async fn seed_faqs(store: &dyn FaqStore) -> Result<usize> {
    if store.count_faqs().await? > 0 {
        return Ok(0);
    }
    for &(question, answer, tags) in SAMPLE_FAQS {
        store.insert_faq(question, answer, Some(tags)).await?;
    }
    info!(count = SAMPLE_FAQS.len(), "seeded sample faqs");
    Ok(SAMPLE_FAQS.len())
}

/// Create the schema and, when `[seed].enabled`, the sample FAQs.
///
/// Returns the number of seeded rows.
pub async fn init_database(config: &Config) -> Result<usize> {
    let pool = db::connect(config).await?;
    run_migrations(&pool).await?;

    let seeded = if config.seed.enabled {
        let store = SqliteStore::new(pool.clone());
        seed_faqs(&store).await?
    } else {
        0
    };

    pool.close().await;
    Ok(seeded)
}

/// Connect, make sure the schema exists, and wrap the pool in a store.
pub async fn open_store(config: &Config) -> Result<SqliteStore> {
    let pool = db::connect(config).await?;
    run_migrations(&pool).await?;
    Ok(SqliteStore::new(pool))
}

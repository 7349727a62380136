//! Core data models: FAQ records and pending queries.
//!
//! Both record types are owned by the store. The resolver only ever holds
//! transient copies fetched for a single request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stored question/answer pair usable for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Comma-separated tags, e.g. `"account,password"`.
    pub tags: Option<String>,
    /// Unix seconds.
    pub created_at: i64,
}

/// Lifecycle state of a [`PendingQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingStatus {
    Open,
    Answered,
    Ignored,
}

impl PendingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingStatus::Open => "open",
            PendingStatus::Answered => "answered",
            PendingStatus::Ignored => "ignored",
        }
    }
}

impl fmt::Display for PendingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PendingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(PendingStatus::Open),
            "answered" => Ok(PendingStatus::Answered),
            "ignored" => Ok(PendingStatus::Ignored),
            other => anyhow::bail!("unknown pending status: '{}'", other),
        }
    }
}

/// An unmatched user query awaiting a human answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
    pub id: i64,
    pub user_email: Option<String>,
    pub user_message: String,
    pub status: PendingStatus,
    /// Unix seconds.
    pub submitted_at: i64,
}

/// Render unix seconds as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

/// FAQ shape returned over HTTP and printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct FaqResponse {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub tags: Option<String>,
    pub created_at: String,
}

impl From<&Faq> for FaqResponse {
    fn from(faq: &Faq) -> Self {
        Self {
            id: faq.id,
            question: faq.question.clone(),
            answer: faq.answer.clone(),
            tags: faq.tags.clone(),
            created_at: format_ts_iso(faq.created_at),
        }
    }
}

/// Pending-query summary returned by the admin list action.
#[derive(Debug, Clone, Serialize)]
pub struct PendingSummary {
    pub id: i64,
    pub user_email: Option<String>,
    pub user_message: String,
    pub status: PendingStatus,
    pub submitted_at: String,
}

impl From<&PendingQuery> for PendingSummary {
    fn from(p: &PendingQuery) -> Self {
        Self {
            id: p.id,
            user_email: p.user_email.clone(),
            user_message: p.user_message.clone(),
            status: p.status,
            submitted_at: format_ts_iso(p.submitted_at),
        }
    }
}

//! Query resolution, email capture, and admin actions.
//!
//! This is the service layer shared by the HTTP server and the CLI. It
//! owns the request/response contract (empty-query short-circuit, fallback
//! recording, `need_email` signalling) and maps store outcomes onto
//! [`ResolveError`] variants. All state lives in the injected
//! [`FaqStore`]; nothing here is cached between calls.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::ValidateEmail;

use crate::error::{ResolveError, Result};
use crate::matcher::find_match;
use crate::models::{FaqResponse, PendingSummary};
use crate::store::FaqStore;

/// Reply for an empty or whitespace-only query.
pub const EMPTY_QUERY_REPLY: &str = "Please send a question.";

/// Reply when nothing matched and the caller still owes us an email.
pub const NOT_FOUND_REPLY: &str =
    "Sorry, I don't know the answer to that yet. Leave your email and we'll get back to you.";

/// Reply when nothing matched but an email came with the query.
pub const NOT_FOUND_WITH_EMAIL_REPLY: &str =
    "Sorry, I don't know the answer to that yet. We'll email you once someone has answered.";

/// Inbound chat query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub query: String,
    /// Optional contact address, attached if the query ends up pending.
    #[serde(default)]
    pub user_email: Option<String>,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_email: None,
        }
    }
}

/// Outcome of [`resolve_query`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub found: bool,
    pub pending_id: Option<i64>,
    /// `None` when an answer was found.
    pub need_email: Option<bool>,
}

/// Verifies admin credentials. Implemented by the application, which owns
/// the configured secret.
pub trait CredentialCheck: Send + Sync {
    fn verify(&self, provided: &str) -> bool;
}

/// Resolve a chat query: match it, or record it as pending.
///
/// A query that trims to empty returns [`EMPTY_QUERY_REPLY`] without
/// touching the store.
pub async fn resolve_query(store: &dyn FaqStore, request: &ChatRequest) -> Result<ChatReply> {
    let query = request.query.trim();
    if query.is_empty() {
        return Ok(ChatReply {
            reply: EMPTY_QUERY_REPLY.to_string(),
            found: false,
            pending_id: None,
            need_email: Some(false),
        });
    }

    let email = match request.user_email.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(e) => Some(validate_email(e)?),
    };

    if let Some(m) = find_match(store, query).await? {
        return Ok(ChatReply {
            reply: m.faq.answer,
            found: true,
            pending_id: None,
            need_email: None,
        });
    }

    let pending = store.insert_pending(query, email).await?;
    info!(pending_id = pending.id, "recorded unanswered query");
    let need_email = email.is_none();

    Ok(ChatReply {
        reply: if need_email {
            NOT_FOUND_REPLY
        } else {
            NOT_FOUND_WITH_EMAIL_REPLY
        }
        .to_string(),
        found: false,
        pending_id: Some(pending.id),
        need_email: Some(need_email),
    })
}

/// Attach a contact email to a pending query.
pub async fn attach_email(store: &dyn FaqStore, pending_id: Option<i64>, email: &str) -> Result<()> {
    let pending_id = pending_id.ok_or_else(|| ResolveError::validation("pending_id is required"))?;
    let email = validate_email(email.trim())?;
    if !store.set_pending_email(pending_id, email).await? {
        return Err(ResolveError::not_found(format!(
            "pending query {} not found",
            pending_id
        )));
    }
    info!(pending_id, "email attached to pending query");
    Ok(())
}

/// Check an email address for basic well-formedness.
///
/// Syntax follows [`ValidateEmail`]; on top of that the domain must be
/// dotted and end in a label of at least two ASCII alphanumerics.
pub fn validate_email(email: &str) -> Result<&str> {
    let invalid = || ResolveError::validation("invalid email address");

    if !(5..=254).contains(&email.len()) || !email.validate_email() {
        return Err(invalid());
    }
    let (_, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
    match domain.rsplit_once('.') {
        Some((_, tld)) if tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(email)
        }
        _ => Err(invalid()),
    }
}

fn authorize(gate: &dyn CredentialCheck, credential: Option<&str>) -> Result<()> {
    match credential {
        Some(c) if gate.verify(c) => Ok(()),
        _ => {
            warn!("rejected admin action: invalid credential");
            Err(ResolveError::Forbidden)
        }
    }
}

/// All pending queries, most recent first.
pub async fn list_pending(
    store: &dyn FaqStore,
    gate: &dyn CredentialCheck,
    credential: Option<&str>,
) -> Result<Vec<PendingSummary>> {
    authorize(gate, credential)?;
    let pending = store.list_pending().await?;
    Ok(pending.iter().map(PendingSummary::from).collect())
}

/// Turn a pending query into an FAQ and mark it answered, atomically.
pub async fn answer_pending(
    store: &dyn FaqStore,
    gate: &dyn CredentialCheck,
    credential: Option<&str>,
    pending_id: Option<i64>,
    answer: &str,
) -> Result<FaqResponse> {
    authorize(gate, credential)?;
    let pending_id = pending_id.ok_or_else(|| ResolveError::validation("pending_id is required"))?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(ResolveError::validation("answer must not be empty"));
    }

    let faq = store
        .answer_pending(pending_id, answer)
        .await?
        .ok_or_else(|| ResolveError::not_found(format!("pending query {} not found", pending_id)))?;
    info!(pending_id, faq_id = faq.id, "pending query answered");
    Ok(FaqResponse::from(&faq))
}

/// Remove a pending query regardless of its status.
pub async fn delete_pending(
    store: &dyn FaqStore,
    gate: &dyn CredentialCheck,
    credential: Option<&str>,
    pending_id: Option<i64>,
) -> Result<()> {
    authorize(gate, credential)?;
    let pending_id = pending_id.ok_or_else(|| ResolveError::validation("pending_id is required"))?;
    if !store.delete_pending(pending_id).await? {
        return Err(ResolveError::not_found(format!(
            "pending query {} not found",
            pending_id
        )));
    }
    info!(pending_id, "pending query deleted");
    Ok(())
}

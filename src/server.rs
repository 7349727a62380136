//! HTTP server.
//!
//! Exposes the chat resolver, email capture, and the admin triage actions
//! as a small JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/chat` | Resolve a query, or record it as pending |
//! | `POST` | `/chat/email` | Attach a contact email to a pending query |
//! | `POST` | `/admin/pending/list` | List pending queries (newest first) |
//! | `POST` | `/admin/pending/answer` | Answer a pending query, creating an FAQ |
//! | `POST` | `/admin/pending/delete` | Delete a pending query |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Admin routes take the shared secret in the JSON body as `password`.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "pending query 7 not found" } }
//! ```
//!
//! Error codes: `bad_request` (400), `forbidden` (403), `not_found` (404),
//! `internal` (500).

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use faqdesk_core::models::{FaqResponse, PendingSummary};
use faqdesk_core::resolver::{self, ChatReply, ChatRequest, CredentialCheck};
use faqdesk_core::store::FaqStore;
use faqdesk_core::ResolveError;

use crate::auth::AdminSecret;
use crate::config::{Config, ADMIN_PASSWORD_ENV};
use crate::db;
use crate::migrate;
use crate::sqlite_store::SqliteStore;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn FaqStore>,
    admin: Arc<dyn CredentialCheck>,
}

impl AppState {
    pub fn new(store: Arc<dyn FaqStore>, admin: Arc<dyn CredentialCheck>) -> Self {
        Self { store, admin }
    }
}

/// Starts the HTTP server.
///
/// Connects to the configured database, applies migrations (and seeding
/// when enabled), and serves until Ctrl-C.
///
/// # Errors
///
/// Fails if no admin password is configured, or if the database or the
/// bind address cannot be opened.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let password = config.admin_password().ok_or_else(|| {
        anyhow::anyhow!(
            "no admin password configured; set [admin].password or {}",
            ADMIN_PASSWORD_ENV
        )
    })?;
    let admin = AdminSecret::new(password)?;

    let pool = db::connect(config).await?;
    migrate::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);
    if config.seed.enabled {
        migrate::seed_faqs(&store).await?;
    }

    let app = router(AppState::new(Arc::new(store), Arc::new(admin)));

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "faqdesk server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

/// Build the router over an arbitrary store and credential check.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/chat", post(handle_chat))
        .route("/chat/email", post(handle_attach_email))
        .route("/admin/pending/list", post(handle_list_pending))
        .route("/admin/pending/answer", post(handle_answer_pending))
        .route("/admin/pending/delete", post(handle_delete_pending))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: &'static str,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Validation(message) => bad_request(message),
            ResolveError::NotFound(message) => AppError {
                status: StatusCode::NOT_FOUND,
                code: "not_found",
                message,
            },
            ResolveError::Forbidden => AppError {
                status: StatusCode::FORBIDDEN,
                code: "forbidden",
                message: "invalid admin credential".to_string(),
            },
            ResolveError::Store(e) => {
                error!(error = %e, "store operation failed");
                AppError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: "internal",
                    message: "internal error".to_string(),
                }
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /chat ============

async fn handle_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = body?;
    let reply = resolver::resolve_query(state.store.as_ref(), &request).await?;
    Ok(Json(reply))
}

// ============ POST /chat/email ============

#[derive(Deserialize)]
struct AttachEmailRequest {
    #[serde(default)]
    pending_id: Option<i64>,
    #[serde(default)]
    email: String,
}

#[derive(Serialize)]
struct AttachEmailResponse {
    ok: bool,
    pending_id: Option<i64>,
}

async fn handle_attach_email(
    State(state): State<AppState>,
    body: Result<Json<AttachEmailRequest>, JsonRejection>,
) -> Result<Json<AttachEmailResponse>, AppError> {
    let Json(request) = body?;
    resolver::attach_email(state.store.as_ref(), request.pending_id, &request.email).await?;
    Ok(Json(AttachEmailResponse {
        ok: true,
        pending_id: request.pending_id,
    }))
}

// ============ POST /admin/pending/* ============

#[derive(Deserialize)]
struct AdminListRequest {
    #[serde(default)]
    password: Option<String>,
}

#[derive(Serialize)]
struct AdminListResponse {
    pending: Vec<PendingSummary>,
}

async fn handle_list_pending(
    State(state): State<AppState>,
    body: Result<Json<AdminListRequest>, JsonRejection>,
) -> Result<Json<AdminListResponse>, AppError> {
    let Json(request) = body?;
    let pending = resolver::list_pending(
        state.store.as_ref(),
        state.admin.as_ref(),
        request.password.as_deref(),
    )
    .await?;
    Ok(Json(AdminListResponse { pending }))
}

#[derive(Deserialize)]
struct AdminAnswerRequest {
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    pending_id: Option<i64>,
    #[serde(default)]
    answer: String,
}

#[derive(Serialize)]
struct AdminAnswerResponse {
    ok: bool,
    faq: FaqResponse,
}

async fn handle_answer_pending(
    State(state): State<AppState>,
    body: Result<Json<AdminAnswerRequest>, JsonRejection>,
) -> Result<Json<AdminAnswerResponse>, AppError> {
    let Json(request) = body?;
    let faq = resolver::answer_pending(
        state.store.as_ref(),
        state.admin.as_ref(),
        request.password.as_deref(),
        request.pending_id,
        &request.answer,
    )
    .await?;
    Ok(Json(AdminAnswerResponse { ok: true, faq }))
}

#[derive(Deserialize)]
struct AdminDeleteRequest {
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    pending_id: Option<i64>,
}

#[derive(Serialize)]
struct AdminDeleteResponse {
    ok: bool,
}

async fn handle_delete_pending(
    State(state): State<AppState>,
    body: Result<Json<AdminDeleteRequest>, JsonRejection>,
) -> Result<Json<AdminDeleteResponse>, AppError> {
    let Json(request) = body?;
    resolver::delete_pending(
        state.store.as_ref(),
        state.admin.as_ref(),
        request.password.as_deref(),
        request.pending_id,
    )
    .await?;
    Ok(Json(AdminDeleteResponse { ok: true }))
}

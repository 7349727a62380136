//! # faqdesk Core
//!
//! Shared logic for faqdesk: data models, keyword extraction, the
//! four-stage matcher, the store abstraction, and the resolver that ties
//! chat queries, pending-query recording, and admin actions together.
//!
//! This crate contains no tokio, sqlx, or filesystem I/O. Storage is
//! reached exclusively through the [`store::FaqStore`] trait.

pub mod error;
pub mod keywords;
pub mod matcher;
pub mod models;
pub mod resolver;
pub mod store;

pub use error::ResolveError;
pub use models::{Faq, PendingQuery, PendingStatus};
pub use store::FaqStore;

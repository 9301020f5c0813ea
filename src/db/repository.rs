//! Repository trait for schedule and share-link storage.
//!
//! The surrounding system stores each user's schedule as one JSON blob with
//! last-write-wins semantics; this trait is the seam that keeps storage
//! swappable without touching the occurrence engine or the HTTP layer.

use async_trait::async_trait;

use crate::api::UserId;
use crate::models::{ScheduleDocument, SharedLink};

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error type for repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Backend failure (I/O, serialization, connectivity).
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// Storage operations for schedule documents and share links.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`; handlers hold them behind
/// `Arc<dyn ScheduleRepository>`.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Whether the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch a user's document, `None` when the account has none stored.
    async fn fetch_document(&self, user_id: UserId) -> RepositoryResult<Option<ScheduleDocument>>;

    /// Replace a user's document wholesale. Last write wins.
    async fn store_document(
        &self,
        user_id: UserId,
        document: &ScheduleDocument,
    ) -> RepositoryResult<()>;

    /// Remove a user's document (the "clear schedule" operation).
    async fn clear_document(&self, user_id: UserId) -> RepositoryResult<()>;

    /// Persist a freshly minted share link.
    async fn store_share_link(&self, link: &SharedLink) -> RepositoryResult<()>;

    /// Look up a share link by token.
    async fn fetch_share_link(&self, token: &str) -> RepositoryResult<Option<SharedLink>>;

    /// Increment a link's visit counter, unless the link is disabled or
    /// already at its cap. Returns the updated link.
    async fn record_share_visit(&self, token: &str) -> RepositoryResult<SharedLink>;
}

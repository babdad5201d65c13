//! Port abstraction for article persistence.
use async_trait::async_trait;

use crate::domain::{Article, ArticleDraft, ArticleFilter, ArticleId, ImagePath};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
    }
}

/// Column values written on insert and update.
///
/// `image` is stored verbatim, so `None` clears the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub draft: ArticleDraft,
    pub image: Option<ImagePath>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Articles matching `filter`, newest first (ties by id, newest first).
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticlePersistenceError>;

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Insert a new row; timestamps are assigned by the store.
    async fn insert(&self, record: &ArticleRecord) -> Result<Article, ArticlePersistenceError>;

    /// Overwrite every editable column and bump `updated_at`.
    ///
    /// Returns `None` when no row has `id`.
    async fn update(
        &self,
        id: ArticleId,
        record: &ArticleRecord,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Delete a row, returning what was removed.
    async fn delete(&self, id: ArticleId) -> Result<Option<Article>, ArticlePersistenceError>;
}

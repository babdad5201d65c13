//! Driving port for reading articles.
use async_trait::async_trait;

use crate::domain::{Article, ArticleFilter, ArticleId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleQuery: Send + Sync {
    /// Articles matching `filter`, newest first.
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, Error>;

    /// One article, or a `not_found` error.
    async fn get(&self, id: ArticleId) -> Result<Article, Error>;
}

//! Article content service.
//!
//! Implements the article driving ports on top of the repository and image
//! store. Files and rows are not written atomically, so every mutation that
//! touches both follows one rule: write the new file, commit the row, then
//! delete whatever file the row no longer references. A failed commit deletes
//! the new file instead and leaves the old one in place.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    ArticleCommand, ArticlePersistenceError, ArticleQuery, ArticleRecord, ArticleRepository,
    ImageStore, ImageStoreError,
};
use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, CoverChange, Error, ImagePath, UploadedImage,
};

/// Article service implementing [`ArticleQuery`] and [`ArticleCommand`].
#[derive(Clone)]
pub struct ArticleService<R, S> {
    articles: Arc<R>,
    images: Arc<S>,
}

impl<R, S> ArticleService<R, S> {
    pub fn new(articles: Arc<R>, images: Arc<S>) -> Self {
        Self { articles, images }
    }
}

impl<R, S> ArticleService<R, S>
where
    R: ArticleRepository,
    S: ImageStore,
{
    fn map_persistence_error(error: ArticlePersistenceError) -> Error {
        match error {
            ArticlePersistenceError::Connection { message } => {
                Error::service_unavailable(format!("article repository unavailable: {message}"))
            }
            ArticlePersistenceError::Query { message } => {
                Error::internal(format!("article repository error: {message}"))
            }
        }
    }

    fn map_store_error(field: &str, error: ImageStoreError) -> Error {
        match error {
            ImageStoreError::Io { message } => {
                Error::internal(format!("failed to store image: {message}"))
            }
            ImageStoreError::Rejected { message } => Error::invalid_request(message)
                .with_details(json!({ "field": field, "code": "invalid_upload" })),
        }
    }

    fn not_found(id: ArticleId) -> Error {
        Error::not_found(format!("article {id} not found")).with_details(json!({ "id": id.get() }))
    }

    async fn save_image(&self, image: &UploadedImage) -> Result<ImagePath, Error> {
        self.images
            .save(image)
            .await
            .map_err(|error| Self::map_store_error(&image.field, error))
    }

    /// Best-effort delete; failures only leave an orphaned file behind.
    async fn discard(&self, path: &ImagePath) {
        if let Err(error) = self.images.remove(path).await {
            warn!(path = %path, error = %error, "failed to delete image file");
        }
    }

    async fn existing(&self, id: ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Self::not_found(id))
    }
}

#[async_trait]
impl<R, S> ArticleQuery for ArticleService<R, S>
where
    R: ArticleRepository,
    S: ImageStore,
{
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, Error> {
        self.articles
            .list(filter)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn get(&self, id: ArticleId) -> Result<Article, Error> {
        self.existing(id).await
    }
}

#[async_trait]
impl<R, S> ArticleCommand for ArticleService<R, S>
where
    R: ArticleRepository,
    S: ImageStore,
{
    async fn create(
        &self,
        draft: ArticleDraft,
        cover: Option<UploadedImage>,
    ) -> Result<Article, Error> {
        let image = match cover {
            Some(upload) => Some(self.save_image(&upload).await?),
            None => None,
        };
        let record = ArticleRecord { draft, image };

        let inserted = self.articles.insert(&record).await;
        if inserted.is_err()
            && let Some(path) = &record.image
        {
            self.discard(path).await;
        }
        inserted.map_err(Self::map_persistence_error)
    }

    async fn update(
        &self,
        id: ArticleId,
        draft: ArticleDraft,
        cover: CoverChange,
    ) -> Result<Article, Error> {
        let existing = self.existing(id).await?;

        let (image, uploaded) = match cover {
            CoverChange::Keep => (existing.image.clone(), None),
            CoverChange::Remove => (None, None),
            CoverChange::Replace(upload) => {
                let path = self.save_image(&upload).await?;
                (Some(path.clone()), Some(path))
            }
        };
        let record = ArticleRecord { draft, image };

        let updated = match self.articles.update(id, &record).await {
            Ok(Some(article)) => article,
            Ok(None) => {
                if let Some(path) = &uploaded {
                    self.discard(path).await;
                }
                return Err(Self::not_found(id));
            }
            Err(error) => {
                if let Some(path) = &uploaded {
                    self.discard(path).await;
                }
                return Err(Self::map_persistence_error(error));
            }
        };

        if let Some(old) = existing
            .image
            .as_ref()
            .filter(|old| updated.image.as_ref() != Some(*old))
        {
            self.discard(old).await;
        }
        Ok(updated)
    }

    async fn delete(&self, id: ArticleId) -> Result<(), Error> {
        let removed = self
            .articles
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Self::not_found(id))?;
        if let Some(path) = &removed.image {
            self.discard(path).await;
        }
        Ok(())
    }

    async fn store_editor_image(&self, image: UploadedImage) -> Result<ImagePath, Error> {
        self.save_image(&image).await
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;

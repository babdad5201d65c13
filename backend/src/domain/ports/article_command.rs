//! Driving port for article mutations and image uploads.
use async_trait::async_trait;

use crate::domain::{
    Article, ArticleDraft, ArticleId, CoverChange, Error, ImagePath, UploadedImage,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleCommand: Send + Sync {
    /// Store the optional cover, then insert the record.
    async fn create(
        &self,
        draft: ArticleDraft,
        cover: Option<UploadedImage>,
    ) -> Result<Article, Error>;

    /// Overwrite the editable fields and apply `cover`.
    async fn update(
        &self,
        id: ArticleId,
        draft: ArticleDraft,
        cover: CoverChange,
    ) -> Result<Article, Error>;

    /// Delete the record and its cover file.
    async fn delete(&self, id: ArticleId) -> Result<(), Error>;

    /// Store an inline image for the rich-text editor.
    async fn store_editor_image(&self, image: UploadedImage) -> Result<ImagePath, Error>;
}

//! Port for storing uploaded cover and editor images.
use async_trait::async_trait;

use crate::domain::{ImagePath, UploadedImage};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image storage adapters.
    pub enum ImageStoreError {
        /// Filesystem read or write failed.
        Io { message: String } => "image store io failed: {message}",
        /// The upload cannot be stored as given.
        Rejected { message: String } => "image rejected: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write `image` under a fresh, unique name and return its stored path.
    async fn save(&self, image: &UploadedImage) -> Result<ImagePath, ImageStoreError>;

    /// Delete a stored file. Missing files are not an error.
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError>;
}

//! `ImageStore` writing into a local uploads directory.
//!
//! Files are named `<field>-<unix millis>-<random below 1e9><.ext>`, so two
//! uploads never collide in practice. `create_new` turns the remaining chance
//! into a retry instead of an overwrite.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use rand::Rng;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImagePath, UploadedImage};

const MAX_EXTENSION_LEN: usize = 10;
const NAME_ATTEMPTS: usize = 3;
const RANDOM_SUFFIX_BOUND: u32 = 1_000_000_000;

/// Stores uploads under a directory served at `/public/uploads`.
#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_clock(root, Arc::new(DefaultClock))
    }

    pub fn with_clock(root: impl Into<PathBuf>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            root: root.into(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the uploads directory if it does not exist yet.
    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    fn next_name(&self, image: &UploadedImage) -> String {
        let millis = self.clock.utc().timestamp_millis();
        let suffix = rand::thread_rng().gen_range(0..RANDOM_SUFFIX_BOUND);
        stored_file_name(&image.field, millis, suffix, image.original_name.as_deref())
    }

    async fn write_new(&self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        let target = self.root.join(file_name);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;
        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;
        if let Err(error) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&target).await {
                warn!(path = %target.display(), error = %cleanup, "failed to remove partial upload");
            }
            return Err(error);
        }
        Ok(())
    }
}

/// Build a stored file name from its parts.
///
/// The field name keeps only ASCII alphanumerics, `_` and `-`. The extension
/// comes from `original_name`, lower-cased, and is dropped unless it is 1 to
/// 10 ASCII alphanumerics.
///
/// # Examples
/// ```
/// use anjoman::outbound::uploads::stored_file_name;
///
/// assert_eq!(
///     stored_file_name("image", 1_700_000_000_000, 42, Some("Cover.PNG")),
///     "image-1700000000000-42.png"
/// );
/// assert_eq!(stored_file_name("file", 5, 7, Some("noext")), "file-5-7");
/// ```
pub fn stored_file_name(field: &str, millis: i64, suffix: u32, original_name: Option<&str>) -> String {
    let prefix: String = field
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let prefix = if prefix.is_empty() { "upload" } else { prefix.as_str() };
    let extension = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();
    format!("{prefix}-{millis}-{suffix}{extension}")
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, image: &UploadedImage) -> Result<ImagePath, ImageStoreError> {
        if image.bytes.is_empty() {
            return Err(ImageStoreError::rejected("uploaded file is empty"));
        }

        let mut last_error = None;
        for _ in 0..NAME_ATTEMPTS {
            let file_name = self.next_name(image);
            match self.write_new(&file_name, &image.bytes).await {
                Ok(()) => {
                    debug!(file = %file_name, bytes = image.bytes.len(), "stored upload");
                    return ImagePath::from_file_name(&file_name)
                        .map_err(|err| ImageStoreError::io(err.to_string()));
                }
                Err(error) if error.kind() == io::ErrorKind::AlreadyExists => {
                    last_error = Some(error);
                }
                Err(error) => return Err(ImageStoreError::io(error.to_string())),
            }
        }
        Err(ImageStoreError::io(last_error.map_or_else(
            || "could not allocate a file name".to_owned(),
            |error| error.to_string(),
        )))
    }

    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        let target = self.root.join(path.file_name());
        match fs::remove_file(&target).await {
            Ok(()) => {
                debug!(path = %path, "removed upload");
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ImageStoreError::io(error.to_string())),
        }
    }
}

//! Article and news records.
//!
//! An [`Article`] is either long-form content or a news item, told apart by
//! [`ArticleKind`]. Cover images live on disk under the uploads directory and
//! are referenced by an [`ImagePath`] relative to the site root.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Prefix shared by every stored cover path.
pub const UPLOAD_PATH_PREFIX: &str = "public/uploads/";

/// Database identifier of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(i32);

impl ArticleId {
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Path text was not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("article id must be a positive integer, got {0:?}")]
pub struct ArticleIdParseError(pub String);

impl FromStr for ArticleId {
    type Err = ArticleIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i32>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(ArticleIdParseError(s.to_owned())),
        }
    }
}

/// Content category.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleKind {
    #[default]
    Article,
    News,
}

impl ArticleKind {
    /// Stored and serialised tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "ARTICLE",
            Self::News => "NEWS",
        }
    }
}

impl fmt::Display for ArticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag was neither `ARTICLE` nor `NEWS`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("type must be ARTICLE or NEWS, got {0:?}")]
pub struct ArticleKindParseError(pub String);

impl FromStr for ArticleKind {
    type Err = ArticleKindParseError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ARTICLE") {
            Ok(Self::Article)
        } else if s.eq_ignore_ascii_case("NEWS") {
            Ok(Self::News)
        } else {
            Err(ArticleKindParseError(s.to_owned()))
        }
    }
}

/// Reasons a stored image path is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImagePathError {
    #[error("image path must start with {UPLOAD_PATH_PREFIX}")]
    OutsideUploads,
    #[error("image path must name a single file")]
    InvalidFileName,
}

/// Relative path of a stored cover image, e.g. `public/uploads/image-1-2.png`.
///
/// ## Invariants
/// - Starts with [`UPLOAD_PATH_PREFIX`].
/// - The remainder is one non-empty path component: no separators, no `..`.
///
/// # Examples
/// ```
/// use anjoman::domain::ImagePath;
///
/// let path = ImagePath::from_file_name("image-1-2.png").unwrap();
/// assert_eq!(path.as_str(), "public/uploads/image-1-2.png");
/// assert_eq!(path.public_url(), "/public/uploads/image-1-2.png");
/// assert!(ImagePath::new("public/uploads/../secret").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePath(String);

impl ImagePath {
    pub fn new(path: impl Into<String>) -> Result<Self, ImagePathError> {
        let path = path.into();
        let file_name = path
            .strip_prefix(UPLOAD_PATH_PREFIX)
            .ok_or(ImagePathError::OutsideUploads)?;
        validate_file_name(file_name)?;
        Ok(Self(path))
    }

    pub fn from_file_name(file_name: &str) -> Result<Self, ImagePathError> {
        validate_file_name(file_name)?;
        Ok(Self(format!("{UPLOAD_PATH_PREFIX}{file_name}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name inside the uploads directory.
    pub fn file_name(&self) -> &str {
        self.0.strip_prefix(UPLOAD_PATH_PREFIX).unwrap_or(&self.0)
    }

    /// Absolute URL path the browser fetches.
    pub fn public_url(&self) -> String {
        format!("/{}", self.0)
    }
}

fn validate_file_name(file_name: &str) -> Result<(), ImagePathError> {
    let invalid = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\', '\0']);
    if invalid {
        Err(ImagePathError::InvalidFileName)
    } else {
        Ok(())
    }
}

impl TryFrom<String> for ImagePath {
    type Error = ImagePathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImagePath> for String {
    fn from(value: ImagePath) -> Self {
        value.0
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted article or news item.
///
/// Serialises with camelCase keys and the category under `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[schema(value_type = i32, example = 7)]
    pub id: ArticleId,
    pub title: String,
    pub summary: String,
    /// Rich-text HTML body.
    pub content: String,
    #[schema(value_type = Option<String>, example = "public/uploads/image-1700000000000-42.png")]
    pub image: Option<ImagePath>,
    #[serde(rename = "type")]
    pub kind: ArticleKind,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Longest title the `articles.title` column accepts, in characters.
pub const TITLE_MAX_CHARS: usize = 500;

/// Text fields of an [`ArticleDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Summary,
    Content,
}

impl DraftField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Summary => "summary",
            Self::Content => "content",
        }
    }
}

/// Validation failures for [`ArticleDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArticleValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },
    #[error("{} must not contain NUL characters", .field.as_str())]
    NulCharacter { field: DraftField },
}

/// Editable fields of an article, validated.
///
/// # Examples
/// ```
/// use anjoman::domain::{ArticleDraft, ArticleKind};
///
/// let draft = ArticleDraft::try_new("Title", "", "<p>body</p>")
///     .unwrap()
///     .with_kind(ArticleKind::News)
///     .with_featured(true);
/// assert_eq!(draft.kind(), ArticleKind::News);
/// assert!(ArticleDraft::try_new("  ", "", "").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    title: String,
    summary: String,
    content: String,
    kind: ArticleKind,
    featured: bool,
}

impl ArticleDraft {
    /// Fields are stored trimmed. The title must be non-blank and at most
    /// [`TITLE_MAX_CHARS`] characters; summary and content may be empty. No
    /// field may contain `\0`.
    pub fn try_new(
        title: impl Into<String>,
        summary: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ArticleValidationError> {
        let title = clean(DraftField::Title, title.into())?;
        let summary = clean(DraftField::Summary, summary.into())?;
        let content = clean(DraftField::Content, content.into())?;
        if title.is_empty() {
            return Err(ArticleValidationError::EmptyTitle);
        }
        let actual = title.chars().count();
        if actual > TITLE_MAX_CHARS {
            return Err(ArticleValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual,
            });
        }
        Ok(Self {
            title,
            summary,
            content,
            kind: ArticleKind::default(),
            featured: false,
        })
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ArticleKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_featured(mut self, featured: bool) -> Self {
        self.featured = featured;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> ArticleKind {
        self.kind
    }

    pub fn featured(&self) -> bool {
        self.featured
    }
}

fn clean(field: DraftField, value: String) -> Result<String, ArticleValidationError> {
    if value.contains('\0') {
        return Err(ArticleValidationError::NulCharacter { field });
    }
    let trimmed = value.trim();
    Ok(if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_owned()
    })
}

/// Listing criteria. `None` means "do not filter".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub kind: Option<ArticleKind>,
    pub featured: Option<bool>,
    pub limit: Option<NonZeroU32>,
}

impl ArticleFilter {
    pub fn of_kind(kind: ArticleKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Whether `article` passes the kind and featured criteria.
    pub fn matches(&self, article: &Article) -> bool {
        self.kind.is_none_or(|kind| article.kind == kind)
            && self.featured.is_none_or(|featured| article.featured == featured)
    }
}

/// File received from a multipart upload, not yet stored.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Form field the file arrived under, used as the stored name prefix.
    pub field: String,
    pub original_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedImage")
            .field("field", &self.field)
            .field("original_name", &self.original_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// What an update does to the cover image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CoverChange {
    /// Leave the stored image as is.
    #[default]
    Keep,
    /// Store this file and drop the previous one.
    Replace(UploadedImage),
    /// Clear the image and delete the previous file.
    Remove,
}

//! Domain primitives, services and ports.
//!
//! Types here are transport-agnostic. Inbound adapters translate HTTP into
//! these types; outbound adapters implement the traits in [`ports`].
//!
//! Public surface:
//! - [`Article`], [`ArticleDraft`], [`ArticleFilter`], [`CoverChange`]: content
//!   records and the inputs that create, edit and select them.
//! - [`ArticleService`]: article use-cases over a repository and image store.
//! - [`AdminLoginService`], [`AdminSeeder`]: authentication and first-run
//!   account creation.
//! - [`Error`], [`ErrorCode`]: the shared error payload.

pub mod admin;
pub mod admin_service;
pub mod article;
pub mod article_service;
pub mod auth;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::admin::{AdminAccount, AdminId};
pub use self::admin_service::{AdminLoginService, AdminSeeder, INVALID_CREDENTIALS, SeedOutcome};
pub use self::article::{
    Article, ArticleDraft, ArticleFilter, ArticleId, ArticleIdParseError, ArticleKind,
    ArticleKindParseError, ArticleValidationError, CoverChange, DraftField, ImagePath,
    ImagePathError, TITLE_MAX_CHARS, UPLOAD_PATH_PREFIX, UploadedImage,
};
pub use self::article_service::ArticleService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;

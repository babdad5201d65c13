//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`ImageStore`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports ([`ArticleQuery`],
//! [`ArticleCommand`], [`LoginService`]) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_repository;
mod article_command;
mod article_query;
mod article_repository;
mod image_store;
mod login_service;
mod password_hasher;

#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminPersistenceError, AdminRepository};
#[cfg(test)]
pub use article_command::MockArticleCommand;
pub use article_command::ArticleCommand;
#[cfg(test)]
pub use article_query::MockArticleQuery;
pub use article_query::ArticleQuery;
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticlePersistenceError, ArticleRecord, ArticleRepository};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};

//! PostgreSQL persistence adapters.
//!
//! Repositories are thin translators between Diesel rows (`models.rs`,
//! `schema.rs`, both private) and domain types, running on `diesel-async`
//! connections from a `bb8` pool. Database errors are mapped to the port
//! error enums and never leak SQL text.
//!
//! ```ignore
//! use anjoman::outbound::persistence::{DbPool, DieselArticleRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/anjoman")).await?;
//! let articles = DieselArticleRepository::new(pool);
//! ```

mod diesel_admin_repository;
mod diesel_article_repository;
mod diesel_basic_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_article_repository::DieselArticleRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

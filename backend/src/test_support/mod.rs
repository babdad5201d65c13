//! In-memory adapters for tests that exercise the HTTP surface without a
//! database. Enabled for unit tests and through the `test-support` feature.

mod in_memory;

pub use in_memory::{InMemoryAdminRepository, InMemoryArticleRepository};

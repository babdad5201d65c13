//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories over Diesel and `diesel-async`.
//! - **uploads**: image files in the local uploads directory.
//! - **security**: Argon2id password hashing.
//!
//! Adapters translate between infrastructure and domain types and hold no
//! business rules.

pub mod persistence;
pub mod security;
pub mod uploads;

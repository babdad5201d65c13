//! Port for one-way password hashing.
//!
//! Implementations are CPU bound; async callers run them on the blocking pool.

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing or checking passwords.
    pub enum PasswordHashError {
        /// Hashing failed, e.g. invalid cost parameters.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash is not a parseable PHC string.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` into a self-describing PHC string.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored PHC string.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}

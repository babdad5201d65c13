//! Driving port for admin authentication.
//!
//! Inbound adapters call it to check credentials without knowing how admins
//! are stored or how passwords are hashed.

use async_trait::async_trait;

use crate::domain::{AdminId, Error, LoginCredentials};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the admin id for valid credentials.
    ///
    /// Unknown usernames and wrong passwords both yield the same
    /// `unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error>;
}

//! Admin authentication and first-run seeding.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AdminPersistenceError, AdminRepository, LoginService, PasswordHashError, PasswordHasher,
};
use crate::domain::{AdminId, Error, LoginCredentials};

/// Message shown for every failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_persistence_error(error: AdminPersistenceError) -> Error {
    match error {
        AdminPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("admin repository unavailable: {message}"))
        }
        AdminPersistenceError::Query { message } => {
            Error::internal(format!("admin repository error: {message}"))
        }
    }
}

/// Argon2id hash of a random secret, at the default production cost.
///
/// Unknown usernames are verified against it so a rejected login costs the
/// same whether or not the account exists.
pub(crate) const UNKNOWN_ADMIN_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$2po+w1pcg6A+CDzIb8XNBw$QPQaCU/DlUHyaY1h8b/Qz8tXdq//M4fdt8cf2FVpLiU";

/// Run a hasher call on the blocking pool.
async fn run_hasher<H, T, F>(hasher: &Arc<H>, op: F) -> Result<Result<T, PasswordHashError>, Error>
where
    H: PasswordHasher + 'static,
    T: Send + 'static,
    F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || op(hasher.as_ref()))
        .await
        .map_err(|error| Error::internal(format!("password hashing task failed: {error}")))
}

/// [`LoginService`] backed by stored Argon2 hashes.
#[derive(Clone)]
pub struct AdminLoginService<R, H> {
    admins: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AdminLoginService<R, H> {
    pub fn new(admins: Arc<R>, hasher: Arc<H>) -> Self {
        Self { admins, hasher }
    }
}

#[async_trait]
impl<R, H> LoginService for AdminLoginService<R, H>
where
    R: AdminRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AdminId, Error> {
        let Some(account) = self
            .admins
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?
        else {
            let password = Zeroizing::new(credentials.password().to_owned());
            let _ = run_hasher(&self.hasher, move |hasher| {
                hasher.verify(&password, UNKNOWN_ADMIN_HASH)
            })
            .await?;
            debug!("login rejected: unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = account.password_hash.clone();
        let verified =
            run_hasher(&self.hasher, move |hasher| hasher.verify(&password, &stored)).await?;

        match verified {
            Ok(true) => Ok(account.id),
            Ok(false) => {
                debug!(admin_id = %account.id, "login rejected: wrong password");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            Err(error) => {
                warn!(admin_id = %account.id, error = %error, "stored password hash unusable");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}

/// Result of [`AdminSeeder::ensure_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    AlreadyPresent,
}

/// Creates the configured admin account on first start.
#[derive(Clone)]
pub struct AdminSeeder<R, H> {
    admins: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AdminSeeder<R, H>
where
    R: AdminRepository,
    H: PasswordHasher + 'static,
{
    pub fn new(admins: Arc<R>, hasher: Arc<H>) -> Self {
        Self { admins, hasher }
    }

    /// Insert `username` with a hash of `password` unless it already exists.
    ///
    /// An existing account keeps its password; the configured one only
    /// matters on first run.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<SeedOutcome, Error> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .map_err(|error| Error::invalid_request(format!("default admin: {error}")))?;

        if self
            .admins
            .find_by_username(credentials.username())
            .await
            .map_err(map_persistence_error)?
            .is_some()
        {
            debug!(username = credentials.username(), "default admin already present");
            return Ok(SeedOutcome::AlreadyPresent);
        }

        let password = Zeroizing::new(credentials.password().to_owned());
        let hash = run_hasher(&self.hasher, move |hasher| hasher.hash(&password))
            .await?
            .map_err(|error| Error::internal(error.to_string()))?;

        let inserted = self
            .admins
            .insert_if_absent(credentials.username(), &hash)
            .await
            .map_err(map_persistence_error)?;
        if inserted {
            info!(username = credentials.username(), "default admin created");
            Ok(SeedOutcome::Created)
        } else {
            Ok(SeedOutcome::AlreadyPresent)
        }
    }
}

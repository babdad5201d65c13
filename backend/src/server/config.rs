//! HTTP server configuration object.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use anjoman::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) static_dir: PathBuf,
    pub(crate) upload_dir: PathBuf,
}

impl ServerConfig {
    /// Construct a server configuration around an open database pool.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        db_pool: DbPool,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool,
            static_dir: PathBuf::from("."),
            upload_dir: PathBuf::from("public/uploads"),
        }
    }

    /// Directories for the front-end assets and uploaded images.
    #[must_use]
    pub fn with_directories(mut self, static_dir: PathBuf, upload_dir: PathBuf) -> Self {
        self.static_dir = static_dir;
        self.upload_dir = upload_dir;
        self
    }
}

//! Application settings loaded via OrthoConfig.
//!
//! Values come from `ANJOMAN_*` environment variables, CLI flags or a config
//! file. The deployment variables the site has always used (`PORT`,
//! `DATABASE_URL`, `ADMIN_DEFAULT_USERNAME`, `ADMIN_DEFAULT_PASSWORD`) are
//! honoured as fallbacks when the prefixed form is absent.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_STATIC_DIR: &str = ".";
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

const PORT_ENV: &str = "PORT";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const ADMIN_USERNAME_ENV: &str = "ADMIN_DEFAULT_USERNAME";
const ADMIN_PASSWORD_ENV: &str = "ADMIN_DEFAULT_PASSWORD";

/// Raw configuration as loaded; see [`AppSettings::resolve`].
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ANJOMAN")]
pub struct AppSettings {
    /// Listen port.
    pub port: Option<u16>,
    /// Listen address.
    pub bind_host: Option<String>,
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Directory holding `index.html` and the front-end assets.
    pub static_dir: Option<PathBuf>,
    /// Directory uploaded images are written to.
    pub upload_dir: Option<PathBuf>,
    /// Admin account created on first start.
    pub admin_username: Option<String>,
    /// Password for the seeded admin; ignored once the account exists.
    pub admin_password: Option<String>,
}

/// Problems found while resolving settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("database URL missing: set ANJOMAN_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("invalid port '{value}'")]
    InvalidPort { value: String },
    #[error("invalid bind host '{value}'")]
    InvalidBindHost { value: String },
}

/// Settings with fallbacks and defaults applied.
#[derive(Clone)]
pub struct RuntimeSettings {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub static_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub admin_username: String,
    pub admin_password: Zeroizing<String>,
}

impl std::fmt::Debug for RuntimeSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeSettings")
            .field("bind_addr", &self.bind_addr)
            .field("static_dir", &self.static_dir)
            .field("upload_dir", &self.upload_dir)
            .field("admin_username", &self.admin_username)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AppSettings {
    /// Apply the unprefixed fallbacks from `env`, then the defaults.
    pub fn resolve<E: Env>(self, env: &E) -> Result<RuntimeSettings, SettingsError> {
        let port = match self.port {
            Some(port) => port,
            None => match non_empty(env.string(PORT_ENV)) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| SettingsError::InvalidPort { value: raw })?,
                None => DEFAULT_PORT,
            },
        };
        let host = self
            .bind_host
            .unwrap_or_else(|| DEFAULT_BIND_HOST.to_owned());
        let ip: IpAddr = host
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidBindHost { value: host.clone() })?;

        let database_url = non_empty(self.database_url)
            .or_else(|| non_empty(env.string(DATABASE_URL_ENV)))
            .ok_or(SettingsError::MissingDatabaseUrl)?;
        let admin_username = non_empty(self.admin_username)
            .or_else(|| non_empty(env.string(ADMIN_USERNAME_ENV)))
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_owned());
        let admin_password = non_empty(self.admin_password)
            .or_else(|| non_empty(env.string(ADMIN_PASSWORD_ENV)))
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_owned());

        Ok(RuntimeSettings {
            bind_addr: SocketAddr::new(ip, port),
            database_url,
            static_dir: self
                .static_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            upload_dir: self
                .upload_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            admin_username,
            admin_password: Zeroizing::new(admin_password),
        })
    }
}

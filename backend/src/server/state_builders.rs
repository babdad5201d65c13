//! Builders wiring the Diesel adapters into the HTTP state.

use std::sync::Arc;

use anjoman::domain::{AdminLoginService, ArticleService};
use anjoman::inbound::http::state::{HttpState, HttpStatePorts};
use anjoman::inbound::http::static_files::StaticFiles;
use anjoman::inbound::http::templates::PageRenderer;
use anjoman::outbound::persistence::{DieselAdminRepository, DieselArticleRepository};
use anjoman::outbound::security::Argon2PasswordHasher;
use anjoman::outbound::uploads::LocalImageStore;

use super::ServerConfig;

/// Assemble the shared HTTP state from the configured pool and directories.
///
/// # Errors
/// Fails when the page templates do not compile.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let pages = PageRenderer::new()
        .map_err(|err| std::io::Error::other(format!("template compilation failed: {err}")))?;

    let articles = Arc::new(ArticleService::new(
        Arc::new(DieselArticleRepository::new(config.db_pool.clone())),
        Arc::new(LocalImageStore::new(config.upload_dir.clone())),
    ));
    let login = Arc::new(AdminLoginService::new(
        Arc::new(DieselAdminRepository::new(config.db_pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
    ));

    Ok(HttpState::new(
        HttpStatePorts {
            login,
            articles: articles.clone(),
            article_commands: articles,
        },
        Arc::new(pages),
        StaticFiles::new(config.static_dir.clone(), config.upload_dir.clone()),
    ))
}

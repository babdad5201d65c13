//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

/// Cookie-session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag off so plain-HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::domain::ports::{MockArticleCommand, MockArticleQuery, MockLoginService};

/// Handler state backed by mocks, serving files from `.`.
#[cfg(test)]
pub(crate) fn mock_state(
    login: MockLoginService,
    articles: MockArticleQuery,
    article_commands: MockArticleCommand,
) -> super::state::HttpState {
    use super::state::{HttpState, HttpStatePorts};
    use super::static_files::StaticFiles;
    use super::templates::PageRenderer;

    let pages = PageRenderer::new().expect("built-in templates compile");
    HttpState::new(
        HttpStatePorts {
            login: Arc::new(login),
            articles: Arc::new(articles),
            article_commands: Arc::new(article_commands),
        },
        Arc::new(pages),
        StaticFiles::new(".", "public/uploads"),
    )
}

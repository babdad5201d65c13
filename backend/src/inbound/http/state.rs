//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ArticleCommand, ArticleQuery, LoginService};

use super::static_files::StaticFiles;
use super::templates::PageRenderer;

/// Parameter object bundling the port implementations handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub articles: Arc<dyn ArticleQuery>,
    pub article_commands: Arc<dyn ArticleCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub articles: Arc<dyn ArticleQuery>,
    pub article_commands: Arc<dyn ArticleCommand>,
    pub pages: Arc<PageRenderer>,
    pub files: StaticFiles,
}

impl HttpState {
    /// Construct state from the ports bundle, the page renderer and the
    /// served directories.
    pub fn new(ports: HttpStatePorts, pages: Arc<PageRenderer>, files: StaticFiles) -> Self {
        let HttpStatePorts {
            login,
            articles,
            article_commands,
        } = ports;
        Self {
            login,
            articles,
            article_commands,
            pages,
            files,
        }
    }
}

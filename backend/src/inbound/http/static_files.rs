//! Static front-end and uploaded files.
//!
//! `GET /` serves `index.html` from the front-end directory, uploaded covers
//! are served from the uploads directory, and any other unmatched GET falls
//! through to the front-end directory. Paths are resolved with a traversal
//! guard and dot-files are never served.

use std::path::{Component, Path, PathBuf};

use actix_web::http::{Method, header};
use actix_web::{HttpRequest, HttpResponse, web};
use mime_guess::mime;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use super::state::HttpState;

/// Directories files are served from.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    static_dir: PathBuf,
    upload_dir: PathBuf,
}

impl StaticFiles {
    pub fn new(static_dir: impl Into<PathBuf>, upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
            upload_dir: upload_dir.into(),
        }
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}

/// Content type for a served file, guessed from its extension.
///
/// Textual types are labelled UTF-8.
pub fn content_type_for(path: &Path) -> String {
    let guessed = mime_guess::from_path(path).first_or_octet_stream();
    let textual = guessed.type_() == mime::TEXT
        || guessed.subtype() == mime::JAVASCRIPT
        || guessed.subtype() == mime::JSON;
    if textual && guessed.get_param(mime::CHARSET).is_none() {
        format!("{guessed}; charset=utf-8")
    } else {
        guessed.to_string()
    }
}

/// Join a request path onto `root`, rejecting anything that is not a plain
/// relative path of visible segments.
pub fn resolve_under(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    let mut segments = 0_usize;
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let text = segment.to_str()?;
                if text.starts_with('.') || text.contains('\\') {
                    return None;
                }
                resolved.push(segment);
                segments += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (segments > 0).then_some(resolved)
}

/// An opened file confirmed to live under the served root.
struct ServedFile {
    path: PathBuf,
    file: tokio::fs::File,
    len: u64,
}

async fn open_file(root: &Path, path: &Path) -> Option<ServedFile> {
    let root = tokio::fs::canonicalize(root).await.ok()?;
    let canonical = tokio::fs::canonicalize(path).await.ok()?;
    if !canonical.starts_with(&root) {
        warn!(path = %path.display(), "blocked path outside the served directory");
        return None;
    }
    let file = match tokio::fs::File::open(&canonical).await {
        Ok(file) => file,
        Err(error) => {
            warn!(path = %canonical.display(), %error, "failed to open static file");
            return None;
        }
    };
    let metadata = file.metadata().await.ok()?;
    metadata.is_file().then(|| ServedFile {
        path: canonical,
        file,
        len: metadata.len(),
    })
}

fn file_response(served: ServedFile) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&served.path)))
        .no_chunking(served.len)
        .streaming(ReaderStream::new(served.file))
}

fn not_found(state: &HttpState) -> HttpResponse {
    match state.pages.not_found() {
        Ok(html) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(_) => HttpResponse::NotFound().finish(),
    }
}

async fn serve(state: &HttpState, root: &Path, request_path: &str) -> HttpResponse {
    let Some(path) = resolve_under(root, request_path) else {
        debug!(path = request_path, "rejected static path");
        return not_found(state);
    };
    match open_file(root, &path).await {
        Some(served) => file_response(served),
        None => not_found(state),
    }
}

/// `GET /`
pub async fn index(state: web::Data<HttpState>) -> HttpResponse {
    let root = state.files.static_dir().to_path_buf();
    serve(&state, &root, "index.html").await
}

/// `GET /public/uploads/{file}`
pub async fn upload(state: web::Data<HttpState>, file: web::Path<String>) -> HttpResponse {
    let root = state.files.upload_dir().to_path_buf();
    serve(&state, &root, &file).await
}

/// Fallback for unmatched routes: front-end assets or the not-found page.
pub async fn fallback(state: web::Data<HttpState>, req: HttpRequest) -> HttpResponse {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return not_found(&state);
    }
    let root = state.files.static_dir().to_path_buf();
    serve(&state, &root, req.path()).await
}

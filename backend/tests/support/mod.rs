//! Shared harness for end-to-end tests over the full route table.
//!
//! A [`Site`] wires the real domain services to in-memory repositories, a
//! temporary uploads directory and a temporary front-end directory. Requests
//! go through the same middleware stack as production: tracing, cookie
//! sessions and the admin guard.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test;
use actix_web::web;
use tempfile::TempDir;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

use anjoman::domain::{AdminLoginService, AdminSeeder, ArticleService};
use anjoman::inbound::http::health::HealthState;
use anjoman::inbound::http::state::{HttpState, HttpStatePorts};
use anjoman::inbound::http::static_files::StaticFiles;
use anjoman::inbound::http::templates::PageRenderer;
use anjoman::outbound::security::Argon2PasswordHasher;
use anjoman::outbound::uploads::LocalImageStore;
use anjoman::test_support::{InMemoryAdminRepository, InMemoryArticleRepository};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const BOUNDARY: &str = "----anjoman-test-boundary";

pub struct Site {
    pub articles: Arc<InMemoryArticleRepository>,
    pub state: web::Data<HttpState>,
    pub health: web::Data<HealthState>,
    uploads: TempDir,
    front_end: TempDir,
}

impl Site {
    /// Fresh site with the default admin seeded and an `index.html` in place.
    pub async fn start() -> Self {
        let uploads = TempDir::new().expect("uploads dir");
        let front_end = TempDir::new().expect("static dir");
        std::fs::write(front_end.path().join("index.html"), "<h1>anjoman home</h1>")
            .expect("write index");
        std::fs::create_dir(front_end.path().join("css")).expect("css dir");
        std::fs::write(front_end.path().join("css/site.css"), "body { direction: rtl; }")
            .expect("write css");

        let articles = Arc::new(InMemoryArticleRepository::new());
        let admins = Arc::new(InMemoryAdminRepository::new());
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1, 1).expect("argon2 params"));

        AdminSeeder::new(admins.clone(), hasher.clone())
            .ensure_admin(ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("seed admin");

        let service = Arc::new(ArticleService::new(
            articles.clone(),
            Arc::new(LocalImageStore::new(uploads.path())),
        ));
        let state = HttpState::new(
            HttpStatePorts {
                login: Arc::new(AdminLoginService::new(admins, hasher)),
                articles: service.clone(),
                article_commands: service,
            },
            Arc::new(PageRenderer::new().expect("templates compile")),
            StaticFiles::new(front_end.path(), uploads.path()),
        );

        let health = web::Data::new(HealthState::new());
        health.mark_ready();

        Self {
            articles,
            state: web::Data::new(state),
            health,
            uploads,
            front_end,
        }
    }

    pub fn upload_dir(&self) -> &Path {
        self.uploads.path()
    }

    pub fn static_dir(&self) -> &Path {
        self.front_end.path()
    }

    /// On-disk location of a stored `public/uploads/<file>` path.
    pub fn stored_file(&self, image: &str) -> PathBuf {
        let file = image
            .strip_prefix("public/uploads/")
            .expect("image path under public/uploads");
        self.uploads.path().join(file)
    }

    /// Names of every file currently in the uploads directory.
    pub fn uploaded_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.uploads.path())
            .expect("read uploads")
            .map(|entry| {
                entry
                    .expect("dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Initialise the full application for `$site`, as `main` wires it.
macro_rules! site_app {
    ($site:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($site.health.clone())
                .app_data($site.state.clone())
                .wrap(anjoman::inbound::http::test_utils::test_session_middleware())
                .wrap(anjoman::Trace)
                .configure(anjoman::inbound::http::configure)
                .default_service(
                    actix_web::web::route().to(anjoman::inbound::http::static_files::fallback),
                ),
        )
        .await
    };
}

pub fn location<B>(res: &ServiceResponse<B>) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

pub fn form_post(uri: &str, body: impl Into<String>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body.into())
}

pub fn login_request(password: &str) -> test::TestRequest {
    form_post(
        "/admin/login",
        format!("username={ADMIN_USERNAME}&password={password}"),
    )
}

/// `multipart/form-data` body with text fields and an optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((field, file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(
    method: actix_web::http::Method,
    uri: &str,
    body: Vec<u8>,
) -> test::TestRequest {
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

pub async fn body_text<B>(res: ServiceResponse<B>) -> String
where
    B: actix_web::body::MessageBody,
{
    String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8 body")
}

/// Messages of every event emitted on the current thread while installed.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn install() -> (Self, DefaultGuard) {
        let log = Self::default();
        let guard = tracing::subscriber::set_default(Registry::default().with(log.clone()));
        (log, guard)
    }

    pub fn count(&self, message: &str) -> usize {
        self.0
            .lock()
            .expect("event log lock")
            .iter()
            .filter(|logged| logged.as_str() == message)
            .count()
    }
}

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for EventLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0.lock().expect("event log lock").push(message);
        }
    }
}

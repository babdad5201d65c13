//! HTTP inbound adapter: JSON API, admin panel, public pages and files.

pub mod admin;
pub mod article_form;
pub mod articles;
pub mod error;
pub mod health;
pub mod pages;
pub mod session;
pub mod session_config;
pub mod state;
pub mod static_files;
pub mod templates;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub(crate) mod validation;

pub use error::ApiResult;

use actix_web::web;

use crate::doc::openapi_json;
use crate::middleware::RequireAdmin;

/// Register every route.
///
/// Expects [`state::HttpState`] and [`health::HealthState`] in app data and a
/// session middleware around the app. Unmatched requests should fall through
/// to [`static_files::fallback`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use anjoman::inbound::http::{configure, static_files};
///
/// let _app = App::new()
///     .configure(configure)
///     .default_service(web::route().to(static_files::fallback));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(article_form::MAX_BODY_BYTES))
        .route("/health/ready", web::get().to(health::ready))
        .route("/health/live", web::get().to(health::live))
        .route("/api-docs/openapi.json", web::get().to(openapi_json))
        .service(
            web::scope("/api/articles")
                .wrap(RequireAdmin::mutating_methods())
                .route("", web::get().to(articles::list_articles))
                .route("", web::post().to(articles::create_article))
                .route("/{id}", web::get().to(articles::get_article))
                .route("/{id}", web::put().to(articles::update_article))
                .route("/{id}", web::delete().to(articles::delete_article)),
        )
        .service(
            web::resource("/admin/login")
                .route(web::get().to(admin::login_form))
                .route(web::post().to(admin::login)),
        )
        .route("/admin/logout", web::get().to(admin::logout))
        .service(
            web::scope("/admin")
                .wrap(RequireAdmin::all_methods())
                .route("", web::get().to(admin::dashboard))
                .route("/articles/new", web::get().to(admin::new_article))
                .route("/articles", web::post().to(admin::create_article))
                .route(
                    "/articles/editor-upload",
                    web::post().to(admin::editor_upload),
                )
                .route("/articles/{id}/edit", web::get().to(admin::edit_article))
                .route("/articles/{id}", web::post().to(admin::update_article))
                .route(
                    "/articles/{id}/delete",
                    web::post().to(admin::delete_article),
                ),
        )
        .route("/", web::get().to(static_files::index))
        .route("/articles", web::get().to(pages::articles))
        .route("/news", web::get().to(pages::news))
        .route("/articles/{id}", web::get().to(pages::detail))
        .route("/news/{id}", web::get().to(pages::detail))
        .route("/public/uploads/{file}", web::get().to(static_files::upload));
}

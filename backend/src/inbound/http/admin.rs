//! Admin panel pages.
//!
//! Everything except the login and logout routes sits behind
//! [`crate::middleware::RequireAdmin`]. Successful form posts answer
//! `303 See Other` to the dashboard; rejected input re-renders the form.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::{
    ArticleFilter, ArticleId, Error, ErrorCode, INVALID_CREDENTIALS, LoginCredentials,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::article_form::{
    COVER_FIELD, EDITOR_FIELD, FormFields, read_submission,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::ArticleFormView;
use crate::middleware::{AuthenticatedAdmin, LOGIN_PATH};

/// Dashboard path; the landing page after login and every admin form post.
pub const DASHBOARD_PATH: &str = "/admin";

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Login form fields. Missing fields count as blank.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Response of the editor image upload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditorUploadResponse {
    /// URL the editor embeds.
    #[schema(example = "/public/uploads/file-1700000000000-42.png")]
    pub location: String,
    #[schema(example = "file-1700000000000-42.png")]
    pub filename: String,
}

/// `GET /admin/login`
pub async fn login_form(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if session.admin_id()?.is_some() {
        return Ok(see_other(DASHBOARD_PATH));
    }
    Ok(html(StatusCode::OK, state.pages.login(None)?))
}

/// `POST /admin/login`
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let rejected = || -> ApiResult<HttpResponse> {
        Ok(html(
            StatusCode::UNAUTHORIZED,
            state.pages.login(Some(INVALID_CREDENTIALS))?,
        ))
    };

    let Ok(credentials) = LoginCredentials::try_from_parts(&form.username, &form.password) else {
        return rejected();
    };
    match state.login.authenticate(&credentials).await {
        Ok(admin_id) => {
            session.persist_admin(admin_id)?;
            info!(admin_id = %admin_id, "admin logged in");
            Ok(see_other(DASHBOARD_PATH))
        }
        Err(error) if error.code() == ErrorCode::Unauthorized => {
            warn!(username = credentials.username(), "rejected admin login");
            rejected()
        }
        Err(error) => Err(error),
    }
}

/// `GET /admin/logout`
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    see_other(LOGIN_PATH)
}

/// `GET /admin`
pub async fn dashboard(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let articles = state.articles.list(&ArticleFilter::default()).await?;
    Ok(html(StatusCode::OK, state.pages.dashboard(&articles)?))
}

/// `GET /admin/articles/new`
pub async fn new_article(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(html(
        StatusCode::OK,
        state.pages.article_form(&ArticleFormView::blank())?,
    ))
}

fn rerender(
    state: &HttpState,
    form: ArticleFormView,
    fields: Option<&FormFields>,
    error: &Error,
) -> ApiResult<HttpResponse> {
    let status = super::error::status_for(error.code());
    let view = match fields {
        Some(fields) => form.with_submitted(|name| fields.get(name).map(str::to_owned)),
        None => form,
    }
    .with_error(error.message());
    Ok(html(status, state.pages.article_form(&view)?))
}

fn is_form_error(error: &Error) -> bool {
    matches!(
        error.code(),
        ErrorCode::InvalidRequest | ErrorCode::PayloadTooLarge
    )
}

/// `POST /admin/articles`
pub async fn create_article(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let submission = match read_submission(&req, body, COVER_FIELD).await {
        Ok(submission) => submission,
        Err(error) if is_form_error(&error) => {
            return rerender(&state, ArticleFormView::blank(), None, &error);
        }
        Err(error) => return Err(error),
    };
    let fields = submission.fields.clone();
    let (draft, cover) = match submission.into_create() {
        Ok(parts) => parts,
        Err(error) => {
            return rerender(&state, ArticleFormView::blank(), Some(&fields), &error);
        }
    };
    match state.article_commands.create(draft, cover).await {
        Ok(article) => {
            info!(
                article_id = %article.id,
                kind = %article.kind,
                admin_id = %admin.id(),
                "article created"
            );
            Ok(see_other(DASHBOARD_PATH))
        }
        Err(error) if is_form_error(&error) => {
            rerender(&state, ArticleFormView::blank(), Some(&fields), &error)
        }
        Err(error) => Err(error),
    }
}

fn parse_id(raw: &str) -> Option<ArticleId> {
    raw.parse().ok()
}

/// `GET /admin/articles/{id}/edit`
pub async fn edit_article(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Some(id) = parse_id(&id) else {
        return Ok(see_other(DASHBOARD_PATH));
    };
    match state.articles.get(id).await {
        Ok(article) => Ok(html(
            StatusCode::OK,
            state.pages.article_form(&ArticleFormView::editing(&article))?,
        )),
        Err(error) if error.code() == ErrorCode::NotFound => Ok(see_other(DASHBOARD_PATH)),
        Err(error) => Err(error),
    }
}

/// `POST /admin/articles/{id}`
pub async fn update_article(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let Some(id) = parse_id(&id) else {
        return Ok(see_other(DASHBOARD_PATH));
    };
    let existing = match state.articles.get(id).await {
        Ok(article) => article,
        Err(error) if error.code() == ErrorCode::NotFound => return Ok(see_other(DASHBOARD_PATH)),
        Err(error) => return Err(error),
    };
    let form = ArticleFormView::editing(&existing);

    let submission = match read_submission(&req, body, COVER_FIELD).await {
        Ok(submission) => submission,
        Err(error) if is_form_error(&error) => return rerender(&state, form, None, &error),
        Err(error) => return Err(error),
    };
    let fields = submission.fields.clone();
    let (draft, cover) = match submission.into_update() {
        Ok(parts) => parts,
        Err(error) => return rerender(&state, form, Some(&fields), &error),
    };
    match state.article_commands.update(id, draft, cover).await {
        Ok(_) => {
            info!(article_id = %id, admin_id = %admin.id(), "article updated");
            Ok(see_other(DASHBOARD_PATH))
        }
        Err(error) if error.code() == ErrorCode::NotFound => Ok(see_other(DASHBOARD_PATH)),
        Err(error) if is_form_error(&error) => rerender(&state, form, Some(&fields), &error),
        Err(error) => Err(error),
    }
}

/// `POST /admin/articles/{id}/delete`
///
/// Unknown ids are ignored; the dashboard is shown either way.
pub async fn delete_article(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Some(id) = parse_id(&id) else {
        return Ok(see_other(DASHBOARD_PATH));
    };
    match state.article_commands.delete(id).await {
        Ok(()) => info!(article_id = %id, admin_id = %admin.id(), "article deleted"),
        Err(error) if error.code() == ErrorCode::NotFound => {}
        Err(error) => return Err(error),
    }
    Ok(see_other(DASHBOARD_PATH))
}

/// `POST /admin/articles/editor-upload`
///
/// Stores an inline image for the rich-text editor from the multipart field
/// `file` and answers with its public URL.
#[utoipa::path(
    post,
    path = "/admin/articles/editor-upload",
    request_body(content_type = "multipart/form-data", description = "Image under the `file` field"),
    responses(
        (status = 200, description = "Stored", body = EditorUploadResponse),
        (status = 303, description = "No admin session; redirect to login"),
        (status = 400, description = "No file part", body = crate::domain::Error),
        (status = 413, description = "File too large", body = crate::domain::Error)
    ),
    tags = ["admin"],
    operation_id = "uploadEditorImage"
)]
pub async fn editor_upload(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<EditorUploadResponse>> {
    let submission = read_submission(&req, body, EDITOR_FIELD).await?;
    let Some(upload) = submission.upload else {
        return Err(Error::invalid_request("No file uploaded")
            .with_details(json!({ "field": EDITOR_FIELD, "code": "missing_field" })));
    };
    let path = state.article_commands.store_editor_image(upload).await?;
    info!(admin_id = %admin.id(), file = path.file_name(), "editor image stored");
    Ok(web::Json(EditorUploadResponse {
        location: path.public_url(),
        filename: path.file_name().to_owned(),
    }))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;

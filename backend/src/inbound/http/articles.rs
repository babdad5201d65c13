//! Article JSON API.
//!
//! ```text
//! GET    /api/articles?type=NEWS&featured=1&limit=3
//! GET    /api/articles/{id}
//! POST   /api/articles        (admin session)
//! PUT    /api/articles/{id}   (admin session)
//! DELETE /api/articles/{id}   (admin session)
//! ```
//!
//! Mutating bodies may be `multipart/form-data` with an optional `image`
//! part, `application/x-www-form-urlencoded` or `application/json`.

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Article, ArticleFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::article_form::{COVER_FIELD, read_submission};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ID, KIND, LIMIT, parse_article_id, parse_featured_filter, parse_limit,
    parse_optional_kind,
};
use crate::middleware::AuthenticatedAdmin;

/// Query string accepted by `GET /api/articles`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListArticlesQuery {
    /// `ARTICLE` or `NEWS`; omit for both.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `1`/`true` for featured only; any other value lists everything.
    pub featured: Option<String>,
    /// Maximum number of records, newest first.
    pub limit: Option<String>,
}

impl ListArticlesQuery {
    fn to_filter(&self) -> ApiResult<ArticleFilter> {
        Ok(ArticleFilter {
            kind: parse_optional_kind(KIND, self.kind.as_deref())?,
            featured: parse_featured_filter(self.featured.as_deref()),
            limit: parse_limit(LIMIT, self.limit.as_deref())?,
        })
    }
}

/// Body returned by `DELETE /api/articles/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Article fields accepted by the mutating endpoints.
///
/// Documented for clients; the handlers parse every supported content type
/// into the same fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRequest {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(rename = "type")]
    #[schema(example = "NEWS")]
    pub kind: Option<String>,
    #[schema(example = "1")]
    pub featured: Option<String>,
    /// Update only: `1` clears the cover image.
    pub delete_cover: Option<String>,
    /// Multipart only: cover image file.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<String>,
}

/// List articles newest first.
#[utoipa::path(
    get,
    path = "/api/articles",
    params(ListArticlesQuery),
    responses(
        (status = 200, description = "Articles, newest first", body = [Article]),
        (status = 400, description = "Invalid query", body = crate::domain::Error),
        (status = 503, description = "Database unavailable", body = crate::domain::Error)
    ),
    tags = ["articles"],
    operation_id = "listArticles"
)]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<ListArticlesQuery>,
) -> ApiResult<web::Json<Vec<Article>>> {
    let filter = query.to_filter()?;
    let articles = state.articles.list(&filter).await?;
    Ok(web::Json(articles))
}

/// Fetch one article.
#[utoipa::path(
    get,
    path = "/api/articles/{id}",
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = Article),
        (status = 400, description = "Invalid id", body = crate::domain::Error),
        (status = 404, description = "Unknown id", body = crate::domain::Error)
    ),
    tags = ["articles"],
    operation_id = "getArticle"
)]
pub async fn get_article(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<web::Json<Article>> {
    let id = parse_article_id(ID, &id)?;
    let article = state.articles.get(id).await?;
    Ok(web::Json(article))
}

/// Create an article, optionally with a cover image.
#[utoipa::path(
    post,
    path = "/api/articles",
    request_body(content = ArticleRequest, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = Article),
        (status = 303, description = "No admin session; redirect to login"),
        (status = 400, description = "Invalid fields", body = crate::domain::Error),
        (status = 413, description = "Upload too large", body = crate::domain::Error)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
pub async fn create_article(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let submission = read_submission(&req, body, COVER_FIELD).await?;
    let (draft, cover) = submission.into_create()?;
    let article = state.article_commands.create(draft, cover).await?;
    info!(
        article_id = %article.id,
        kind = %article.kind,
        admin_id = %admin.id(),
        "article created"
    );
    Ok(HttpResponse::Created().json(article))
}

/// Replace an article's fields and optionally its cover.
#[utoipa::path(
    put,
    path = "/api/articles/{id}",
    params(("id" = i32, Path, description = "Article id")),
    request_body(content = ArticleRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated", body = Article),
        (status = 303, description = "No admin session; redirect to login"),
        (status = 400, description = "Invalid fields", body = crate::domain::Error),
        (status = 404, description = "Unknown id", body = crate::domain::Error),
        (status = 413, description = "Upload too large", body = crate::domain::Error)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
pub async fn update_article(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<Article>> {
    let id = parse_article_id(ID, &id)?;
    let submission = read_submission(&req, body, COVER_FIELD).await?;
    let (draft, cover) = submission.into_update()?;
    let article = state.article_commands.update(id, draft, cover).await?;
    info!(article_id = %id, admin_id = %admin.id(), "article updated");
    Ok(web::Json(article))
}

/// Delete an article and its cover file.
#[utoipa::path(
    delete,
    path = "/api/articles/{id}",
    params(("id" = i32, Path, description = "Article id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteResponse),
        (status = 303, description = "No admin session; redirect to login"),
        (status = 404, description = "Unknown id", body = crate::domain::Error)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
pub async fn delete_article(
    state: web::Data<HttpState>,
    admin: AuthenticatedAdmin,
    id: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let id = parse_article_id(ID, &id)?;
    state.article_commands.delete(id).await?;
    info!(article_id = %id, admin_id = %admin.id(), "article deleted");
    Ok(web::Json(DeleteResponse { success: true }))
}

#[cfg(test)]
#[path = "articles_tests.rs"]
mod tests;

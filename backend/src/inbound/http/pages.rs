//! Public HTML pages.
//!
//! `/articles` and `/news` list one category each, newest first. The detail
//! routes under either prefix show any record, labelled by its own category.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

use crate::domain::{ArticleFilter, ArticleId, ArticleKind, ErrorCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin::html;
use crate::inbound::http::state::HttpState;

async fn listing(state: &HttpState, kind: ArticleKind) -> ApiResult<HttpResponse> {
    let articles = state.articles.list(&ArticleFilter::of_kind(kind)).await?;
    Ok(html(StatusCode::OK, state.pages.article_list(kind, &articles)?))
}

fn not_found(state: &HttpState) -> ApiResult<HttpResponse> {
    Ok(html(StatusCode::NOT_FOUND, state.pages.not_found()?))
}

/// `GET /articles`
pub async fn articles(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    listing(&state, ArticleKind::Article).await
}

/// `GET /news`
pub async fn news(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    listing(&state, ArticleKind::News).await
}

/// `GET /articles/{id}` and `GET /news/{id}`
pub async fn detail(
    state: web::Data<HttpState>,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let Ok(id) = id.parse::<ArticleId>() else {
        return not_found(&state);
    };
    match state.articles.get(id).await {
        Ok(article) => Ok(html(StatusCode::OK, state.pages.article_detail(&article)?)),
        Err(error) if error.code() == ErrorCode::NotFound => not_found(&state),
        Err(error) => Err(error),
    }
}

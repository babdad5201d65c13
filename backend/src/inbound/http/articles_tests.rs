//! Tests for the article JSON API handlers.

use actix_web::dev::Service as _;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpMessage, test, web};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::ports::{MockArticleCommand, MockArticleQuery, MockLoginService};
use crate::domain::{
    AdminId, ArticleId, ArticleKind, CoverChange, Error, ImagePath,
};
use crate::inbound::http::test_utils::mock_state;

fn article(id: i32, kind: ArticleKind) -> Article {
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, 8, 0, 0)
        .single()
        .expect("fixture timestamp");
    Article {
        id: ArticleId::new(id),
        title: "A".to_owned(),
        summary: "B".to_owned(),
        content: "C".to_owned(),
        image: None,
        kind,
        featured: true,
        created_at: at,
        updated_at: at,
    }
}

macro_rules! api_app {
    ($query:expr, $command:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(mock_state(
                    MockLoginService::new(),
                    $query,
                    $command,
                )))
                .wrap_fn(|req, srv| {
                    req.extensions_mut()
                        .insert(AuthenticatedAdmin(AdminId::new(1)));
                    srv.call(req)
                })
                .route("/api/articles", web::get().to(list_articles))
                .route("/api/articles", web::post().to(create_article))
                .route("/api/articles/{id}", web::get().to(get_article))
                .route("/api/articles/{id}", web::put().to(update_article))
                .route("/api/articles/{id}", web::delete().to(delete_article)),
        )
        .await
    };
}

#[actix_web::test]
async fn list_passes_the_parsed_filter() {
    let mut query = MockArticleQuery::new();
    query
        .expect_list()
        .withf(|filter| {
            filter.kind == Some(ArticleKind::News)
                && filter.featured == Some(true)
                && filter.limit.map(|n| n.get()) == Some(3)
        })
        .times(1)
        .return_once(|_| Ok(vec![article(2, ArticleKind::News)]));
    let app = api_app!(query, MockArticleCommand::new());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/articles?type=news&featured=1&limit=3")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body[0]["type"], "NEWS");
    assert_eq!(body[0]["image"], Value::Null);
}

#[rstest]
#[case("/api/articles?featured=")]
#[case("/api/articles?featured=0")]
#[case("/api/articles?featured=false")]
#[actix_web::test]
async fn unset_featured_values_do_not_filter(#[case] uri: &str) {
    let mut query = MockArticleQuery::new();
    query
        .expect_list()
        .with(eq(ArticleFilter::default()))
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let app = api_app!(query, MockArticleCommand::new());

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri(uri).to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("/api/articles?limit=0", "limit")]
#[case("/api/articles?limit=many", "limit")]
#[case("/api/articles?type=BLOG", "type")]
#[actix_web::test]
async fn bad_list_params_are_rejected(#[case] uri: &str, #[case] field: &str) {
    let app = api_app!(MockArticleQuery::new(), MockArticleCommand::new());
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn unknown_id_is_not_found() {
    let mut query = MockArticleQuery::new();
    query
        .expect_get()
        .with(eq(ArticleId::new(9)))
        .return_once(|_| Err(Error::not_found("article 9 not found")));
    let app = api_app!(query, MockArticleCommand::new());

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/articles/9").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn non_numeric_id_is_bad_request() {
    let app = api_app!(MockArticleQuery::new(), MockArticleCommand::new());
    let res = test::call_service(&app, test::TestRequest::get().uri("/api/articles/abc").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_from_json_returns_201() {
    let mut command = MockArticleCommand::new();
    command
        .expect_create()
        .withf(|draft, cover| {
            draft.title() == "A" && draft.kind() == ArticleKind::News && draft.featured() && cover.is_none()
        })
        .times(1)
        .return_once(|_, _| Ok(article(11, ArticleKind::News)));
    let app = api_app!(MockArticleQuery::new(), command);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/articles")
            .set_json(serde_json::json!({
                "title": "A", "summary": "B", "content": "C", "type": "NEWS", "featured": true
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["id"], 11);
}

#[actix_web::test]
async fn create_rejects_a_blank_title_without_calling_the_service() {
    let app = api_app!(MockArticleQuery::new(), MockArticleCommand::new());
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/articles")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("title=&summary=B&content=C")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], "missing_field");
}

#[actix_web::test]
async fn update_with_delete_cover_requests_removal() {
    let mut command = MockArticleCommand::new();
    command
        .expect_update()
        .withf(|id, _, cover| *id == ArticleId::new(4) && *cover == CoverChange::Remove)
        .times(1)
        .return_once(|_, _, _| Ok(article(4, ArticleKind::Article)));
    let app = api_app!(MockArticleQuery::new(), command);

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/articles/4")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("title=A&summary=B&content=C&deleteCover=1")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn delete_reports_success() {
    let mut command = MockArticleCommand::new();
    command
        .expect_delete()
        .with(eq(ArticleId::new(5)))
        .times(1)
        .return_once(|_| Ok(()));
    let app = api_app!(MockArticleQuery::new(), command);

    let res = test::call_service(&app, test::TestRequest::delete().uri("/api/articles/5").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, serde_json::json!({ "success": true }));
}

#[actix_web::test]
async fn service_outage_maps_to_503() {
    let mut query = MockArticleQuery::new();
    query
        .expect_list()
        .return_once(|_| Err(Error::service_unavailable("database unavailable")));
    let app = api_app!(query, MockArticleCommand::new());

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/articles").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "service_unavailable");
}

#[::core::prelude::v1::test]
fn stored_image_serialises_as_relative_path() {
    let mut stored = article(1, ArticleKind::Article);
    stored.image = Some(ImagePath::from_file_name("image-1-2.png").expect("path"));
    let value = serde_json::to_value(&stored).expect("serialise");
    assert_eq!(value["image"], "public/uploads/image-1-2.png");
}

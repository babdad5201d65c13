//! Tests for the admin panel handlers.

use actix_web::dev::Service as _;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpMessage, test, web};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::ports::{MockArticleCommand, MockArticleQuery, MockLoginService};
use crate::domain::{AdminId, Article, ArticleKind, CoverChange, ImagePath};
use crate::inbound::http::test_utils::{mock_state, test_session_middleware};

const BOUNDARY: &str = "----admin-test";

fn article(id: i32) -> Article {
    let at = Utc
        .with_ymd_and_hms(2024, 2, 2, 10, 0, 0)
        .single()
        .expect("fixture timestamp");
    Article {
        id: ArticleId::new(id),
        title: "عنوان قدیمی".to_owned(),
        summary: "S".to_owned(),
        content: "C".to_owned(),
        image: None,
        kind: ArticleKind::Article,
        featured: false,
        created_at: at,
        updated_at: at,
    }
}

macro_rules! admin_app {
    ($login:expr, $query:expr, $command:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(mock_state($login, $query, $command)))
                .wrap_fn(|req, srv| {
                    req.extensions_mut()
                        .insert(AuthenticatedAdmin(AdminId::new(1)));
                    srv.call(req)
                })
                .wrap(test_session_middleware())
                .route("/admin/login", web::get().to(login_form))
                .route("/admin/login", web::post().to(login))
                .route("/admin/logout", web::get().to(logout))
                .route("/admin", web::get().to(dashboard))
                .route("/admin/articles/new", web::get().to(new_article))
                .route("/admin/articles", web::post().to(create_article))
                .route("/admin/articles/editor-upload", web::post().to(editor_upload))
                .route("/admin/articles/{id}/edit", web::get().to(edit_article))
                .route("/admin/articles/{id}", web::post().to(update_article))
                .route("/admin/articles/{id}/delete", web::post().to(delete_article)),
        )
        .await
    };
}

fn location(res: &actix_web::dev::ServiceResponse) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn form_post(uri: &str, body: &'static str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload(body)
}

#[actix_web::test]
async fn successful_login_sets_a_session_and_redirects() {
    let mut login = MockLoginService::new();
    login
        .expect_authenticate()
        .withf(|credentials| credentials.username() == "admin" && credentials.password() == "admin123")
        .times(1)
        .return_once(|_| Ok(AdminId::new(1)));
    let app = admin_app!(login, MockArticleQuery::new(), MockArticleCommand::new());

    let res = test::call_service(
        &app,
        form_post("/admin/login", "username=admin&password=admin123").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(DASHBOARD_PATH));
    assert!(res.response().cookies().any(|cookie| cookie.name() == "session"));
}

#[rstest]
#[case("username=admin&password=wrong", true)]
#[case("username=&password=", false)]
#[case("username=admin", false)]
#[actix_web::test]
async fn failed_login_rerenders_with_generic_message(
    #[case] body: &'static str,
    #[case] reaches_service: bool,
) {
    let mut login = MockLoginService::new();
    login
        .expect_authenticate()
        .times(usize::from(reaches_service))
        .returning(|_| Err(Error::unauthorized(INVALID_CREDENTIALS)));
    let app = admin_app!(login, MockArticleQuery::new(), MockArticleCommand::new());

    let res = test::call_service(&app, form_post("/admin/login", body).to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(!res.response().cookies().any(|cookie| cookie.name() == "session"));
    let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8");
    assert!(html.contains(INVALID_CREDENTIALS));
}

#[actix_web::test]
async fn logout_redirects_to_login() {
    let app = admin_app!(
        MockLoginService::new(),
        MockArticleQuery::new(),
        MockArticleCommand::new()
    );
    let res = test::call_service(&app, test::TestRequest::get().uri("/admin/logout").to_request())
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(LOGIN_PATH));
}

#[actix_web::test]
async fn dashboard_lists_every_article() {
    let mut query = MockArticleQuery::new();
    query
        .expect_list()
        .with(eq(ArticleFilter::default()))
        .return_once(|_| Ok(vec![article(1)]));
    let app = admin_app!(MockLoginService::new(), query, MockArticleCommand::new());

    let res = test::call_service(&app, test::TestRequest::get().uri("/admin").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8");
    assert!(html.contains("عنوان قدیمی"));
}

#[actix_web::test]
async fn create_redirects_to_the_dashboard() {
    let mut command = MockArticleCommand::new();
    command
        .expect_create()
        .withf(|draft, cover| {
            draft.title() == "A"
                && draft.kind() == ArticleKind::News
                && draft.featured()
                && cover.is_none()
        })
        .times(1)
        .return_once(|_, _| Ok(article(3)));
    let app = admin_app!(MockLoginService::new(), MockArticleQuery::new(), command);

    let res = test::call_service(
        &app,
        form_post(
            "/admin/articles",
            "title=A&summary=B&content=C&type=NEWS&featured=1",
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(DASHBOARD_PATH));
}

#[actix_web::test]
async fn invalid_create_rerenders_the_form_with_input() {
    let app = admin_app!(
        MockLoginService::new(),
        MockArticleQuery::new(),
        MockArticleCommand::new()
    );
    let res = test::call_service(
        &app,
        form_post("/admin/articles", "title=&summary=kept-summary&content=C").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf-8");
    assert!(html.contains("kept-summary"));
    assert!(html.contains("missing required field: title"));
}

#[rstest]
#[case("/admin/articles/77/edit")]
#[case("/admin/articles/abc/edit")]
#[actix_web::test]
async fn editing_an_unknown_article_returns_to_dashboard(#[case] uri: &str) {
    let mut query = MockArticleQuery::new();
    query
        .expect_get()
        .returning(|id| Err(Error::not_found(format!("article {id} not found"))));
    let app = admin_app!(MockLoginService::new(), query, MockArticleCommand::new());

    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(DASHBOARD_PATH));
}

#[actix_web::test]
async fn update_passes_cover_removal() {
    let mut query = MockArticleQuery::new();
    query
        .expect_get()
        .with(eq(ArticleId::new(2)))
        .return_once(|_| Ok(article(2)));
    let mut command = MockArticleCommand::new();
    command
        .expect_update()
        .withf(|id, draft, cover| {
            *id == ArticleId::new(2) && draft.title() == "جدید" && *cover == CoverChange::Remove
        })
        .times(1)
        .return_once(|_, _, _| Ok(article(2)));
    let app = admin_app!(MockLoginService::new(), query, command);

    let res = test::call_service(
        &app,
        form_post(
            "/admin/articles/2",
            "title=%D8%AC%D8%AF%DB%8C%D8%AF&summary=&content=&deleteCover=1",
        )
        .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[actix_web::test]
async fn deleting_a_missing_article_still_redirects() {
    let mut command = MockArticleCommand::new();
    command
        .expect_delete()
        .with(eq(ArticleId::new(8)))
        .return_once(|_| Err(Error::not_found("article 8 not found")));
    let app = admin_app!(MockLoginService::new(), MockArticleQuery::new(), command);

    let res = test::call_service(
        &app,
        test::TestRequest::post().uri("/admin/articles/8/delete").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some(DASHBOARD_PATH));
}

fn multipart(field: &str, file_name: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

#[actix_web::test]
async fn editor_upload_returns_the_public_location() {
    let mut command = MockArticleCommand::new();
    command
        .expect_store_editor_image()
        .withf(|image| image.field == "file" && image.bytes == b"png")
        .times(1)
        .return_once(|_| Ok(ImagePath::from_file_name("file-1-2.png").expect("path")));
    let app = admin_app!(MockLoginService::new(), MockArticleQuery::new(), command);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/articles/editor-upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart("file", "x.png", b"png"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["location"], "/public/uploads/file-1-2.png");
    assert_eq!(body["filename"], "file-1-2.png");
}

#[actix_web::test]
async fn editor_upload_without_a_file_is_bad_request() {
    let app = admin_app!(
        MockLoginService::new(),
        MockArticleQuery::new(),
        MockArticleCommand::new()
    );
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/admin/articles/editor-upload")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart("image", "x.png", b"png"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "file");
}

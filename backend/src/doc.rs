//! OpenAPI documentation for the JSON endpoints.
//!
//! Registers the article API, the editor upload endpoint and the health
//! probes, plus the session cookie security scheme guarding mutations. The
//! document is served at `/api-docs/openapi.json`.

use actix_web::HttpResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Article, ArticleKind, Error, ErrorCode};
use crate::inbound::http::admin::EditorUploadResponse;
use crate::inbound::http::articles::{ArticleRequest, DeleteResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /admin/login.",
            ))),
        );
    }
}

/// OpenAPI document for the JSON API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Anjoman API",
        description = "Public article and news feed, session-gated content management and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::admin::editor_upload,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Article,
        ArticleKind,
        ArticleRequest,
        DeleteResponse,
        EditorUploadResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "articles", description = "Articles and news items"),
        (name = "admin", description = "Admin-only helpers"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json`
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Article", &["id", "title", "summary", "content", "image", "type", "featured", "createdAt", "updatedAt"])]
    #[case("Error", &["code", "message", "traceId", "details"])]
    #[case("DeleteResponse", &["success"])]
    #[case("EditorUploadResponse", &["location", "filename"])]
    fn schemas_expose_wire_field_names(#[case] name: &str, #[case] fields: &[&str]) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).expect("schema registered");
        for field in fields {
            assert_object_schema_has_field(schema, field);
        }
    }

    #[rstest]
    #[case("/api/articles")]
    #[case("/api/articles/{id}")]
    #[case("/admin/articles/editor-upload")]
    #[case("/health/ready")]
    fn documents_paths(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path));
    }
}

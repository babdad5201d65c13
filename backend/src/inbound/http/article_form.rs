//! Article request bodies.
//!
//! Create and update endpoints accept `multipart/form-data` (with an optional
//! image part), `application/x-www-form-urlencoded` or `application/json`.
//! All three are flattened into [`FormFields`] so one set of rules validates
//! them.

use std::collections::HashMap;
use std::convert::Infallible;

use actix_web::http::header;
use actix_web::web::Bytes;
use actix_web::HttpRequest;
use futures_util::stream;
use multer::{Constraints, Multipart, SizeLimit};
use serde_json::Value;
use tracing::warn;

use crate::domain::{
    ArticleDraft, ArticleValidationError, CoverChange, DraftField, Error, UploadedImage,
};

use super::validation::{
    CONTENT, DELETE_COVER, FEATURED, FieldName, KIND, SUMMARY, TITLE, invalid_value_error,
    missing_field_error, parse_flag, parse_kind,
};

/// Largest accepted file part.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;
/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Multipart field carrying a cover image.
pub const COVER_FIELD: &str = "image";
/// Multipart field carrying an inline editor image.
pub const EDITOR_FIELD: &str = "file";

/// Flat text fields of a submitted form. The first occurrence of a name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn insert_first(&mut self, name: String, value: String) {
        self.0.entry(name).or_insert(value);
    }

    fn required(&self, field: FieldName) -> Result<&str, Error> {
        self.get(field.as_str())
            .ok_or_else(|| missing_field_error(field))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::default();
        for (name, value) in iter {
            fields.insert_first(name.into(), value.into());
        }
        fields
    }
}

fn draft_field_name(field: DraftField) -> FieldName {
    match field {
        DraftField::Title => TITLE,
        DraftField::Summary => SUMMARY,
        DraftField::Content => CONTENT,
    }
}

/// A parsed create or update request.
#[derive(Debug, Clone, Default)]
pub struct ArticleSubmission {
    pub fields: FormFields,
    pub upload: Option<UploadedImage>,
}

impl ArticleSubmission {
    /// Validated editable fields.
    pub fn draft(&self) -> Result<ArticleDraft, Error> {
        let title = self.fields.required(TITLE)?;
        let summary = self.fields.required(SUMMARY)?;
        let content = self.fields.required(CONTENT)?;
        let kind = parse_kind(KIND, self.fields.get(KIND.as_str()))?;
        let featured = parse_flag(FEATURED, self.fields.get(FEATURED.as_str()))?;

        ArticleDraft::try_new(title, summary, content)
            .map(|draft| draft.with_kind(kind).with_featured(featured))
            .map_err(|error| match error {
                ArticleValidationError::EmptyTitle => missing_field_error(TITLE),
                ArticleValidationError::TitleTooLong { max, .. } => {
                    invalid_value_error(TITLE, title, &format!("at most {max} characters"))
                }
                ArticleValidationError::NulCharacter { field } => {
                    let name = draft_field_name(field);
                    let value = self.fields.get(name.as_str()).unwrap_or_default();
                    invalid_value_error(name, value, "free of NUL characters")
                }
            })
    }

    /// Draft plus the cover change for an update.
    ///
    /// `deleteCover` wins over a new upload, which is then discarded unsaved.
    pub fn into_update(self) -> Result<(ArticleDraft, CoverChange), Error> {
        let draft = self.draft()?;
        let delete_cover = parse_flag(DELETE_COVER, self.fields.get(DELETE_COVER.as_str()))?;
        let change = match (delete_cover, self.upload) {
            (true, _) => CoverChange::Remove,
            (false, Some(upload)) => CoverChange::Replace(upload),
            (false, None) => CoverChange::Keep,
        };
        Ok((draft, change))
    }

    /// Draft plus the optional cover for a create.
    pub fn into_create(self) -> Result<(ArticleDraft, Option<UploadedImage>), Error> {
        let draft = self.draft()?;
        Ok((draft, self.upload))
    }
}

fn map_multer_error(error: multer::Error) -> Error {
    match error {
        multer::Error::FieldSizeExceeded { field_name, .. } => {
            Error::payload_too_large(format!(
                "file exceeds the {} MiB limit",
                MAX_FILE_BYTES / (1024 * 1024)
            ))
            .with_details(serde_json::json!({ "field": field_name }))
        }
        multer::Error::StreamSizeExceeded { .. } => Error::payload_too_large(format!(
            "request body exceeds the {} MiB limit",
            MAX_BODY_BYTES / (1024 * 1024)
        )),
        other => Error::invalid_request(format!("malformed multipart body: {other}")),
    }
}

async fn parse_multipart(
    body: Bytes,
    boundary: String,
    file_field: &str,
) -> Result<ArticleSubmission, Error> {
    let limits = SizeLimit::new()
        .whole_stream(MAX_BODY_BYTES as u64)
        .for_field(COVER_FIELD, MAX_FILE_BYTES as u64)
        .for_field(EDITOR_FIELD, MAX_FILE_BYTES as u64);
    let chunks = stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart =
        Multipart::with_constraints(chunks, boundary, Constraints::new().size_limit(limits));

    let mut submission = ArticleSubmission::default();
    while let Some(field) = multipart.next_field().await.map_err(map_multer_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        let Some(original_name) = field.file_name().map(str::to_owned) else {
            let text = field.text().await.map_err(map_multer_error)?;
            submission.fields.insert_first(name, text);
            continue;
        };

        let bytes = field.bytes().await.map_err(map_multer_error)?;
        if bytes.is_empty() {
            continue;
        }
        if name != file_field {
            warn!(field = %name, "ignoring file part under unexpected field");
            continue;
        }
        if submission.upload.is_some() {
            warn!(field = %name, "ignoring additional file part");
            continue;
        }
        submission.upload = Some(UploadedImage {
            field: name,
            original_name: Some(original_name).filter(|n| !n.is_empty()),
            bytes: bytes.to_vec(),
        });
    }
    Ok(submission)
}

fn json_scalar(name: &str, value: Value) -> Result<Option<String>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Bool(flag) => Ok(Some(if flag { "1" } else { "0" }.to_owned())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::invalid_request(format!(
            "{name} must be a string, number or boolean"
        ))
        .with_details(serde_json::json!({ "field": name, "code": "invalid_value" }))),
    }
}

fn parse_json(body: &[u8]) -> Result<ArticleSubmission, Error> {
    let object: serde_json::Map<String, Value> = serde_json::from_slice(body)
        .map_err(|err| Error::invalid_request(format!("malformed JSON body: {err}")))?;
    let mut fields = FormFields::default();
    for (name, value) in object {
        if let Some(text) = json_scalar(&name, value)? {
            fields.insert_first(name, text);
        }
    }
    Ok(ArticleSubmission {
        fields,
        upload: None,
    })
}

fn parse_urlencoded(body: &[u8]) -> ArticleSubmission {
    ArticleSubmission {
        fields: url::form_urlencoded::parse(body).into_owned().collect(),
        upload: None,
    }
}

/// Parse an article body according to its `Content-Type`.
///
/// `file_field` names the multipart part accepted as the upload; file parts
/// under other names are ignored.
pub async fn read_submission(
    req: &HttpRequest,
    body: Bytes,
    file_field: &str,
) -> Result<ArticleSubmission, Error> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "multipart/form-data" => {
            let boundary = multer::parse_boundary(content_type)
                .map_err(|err| Error::invalid_request(format!("invalid multipart boundary: {err}")))?;
            parse_multipart(body, boundary, file_field).await
        }
        "application/x-www-form-urlencoded" => Ok(parse_urlencoded(&body)),
        "application/json" => parse_json(&body),
        _ if body.is_empty() => Ok(ArticleSubmission::default()),
        other => Err(Error::invalid_request(format!("unsupported content type: {other}"))),
    }
}

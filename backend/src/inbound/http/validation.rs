//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose details name the
//! offending field and a machine-readable code, e.g.
//! `{"field": "limit", "value": "0", "code": "invalid_value"}`.

use std::num::NonZeroU32;

use serde_json::json;

use crate::domain::{ArticleId, ArticleKind, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Name of a request field as clients send it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const TITLE: FieldName = FieldName::new("title");
pub(crate) const SUMMARY: FieldName = FieldName::new("summary");
pub(crate) const CONTENT: FieldName = FieldName::new("content");
pub(crate) const KIND: FieldName = FieldName::new("type");
pub(crate) const FEATURED: FieldName = FieldName::new("featured");
pub(crate) const DELETE_COVER: FieldName = FieldName::new("deleteCover");
pub(crate) const LIMIT: FieldName = FieldName::new("limit");
pub(crate) const ID: FieldName = FieldName::new("id");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, expected: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be {expected}")).with_details(json!({
        "field": field,
        "value": value,
        "code": ErrorCode::InvalidValue.as_str(),
    }))
}

/// Checkbox-style flag: `1`, `true`, `on` are set; absent, empty, `0` and
/// `false` are not.
pub(crate) fn parse_flag(field: FieldName, value: Option<&str>) -> Result<bool, Error> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "" | "0" | "false" | "off" => Ok(false),
        _ => Err(invalid_value_error(field, raw, "one of 1, 0, true, false")),
    }
}

/// Featured filter for list queries: `1`, `true` or `on` selects featured
/// records; any other value, or none, leaves the listing unfiltered.
pub(crate) fn parse_featured_filter(value: Option<&str>) -> Option<bool> {
    let raw = value?.trim().to_ascii_lowercase();
    matches!(raw.as_str(), "1" | "true" | "on").then_some(true)
}

/// Article category; absent or empty defaults to `ARTICLE`.
pub(crate) fn parse_kind(field: FieldName, value: Option<&str>) -> Result<ArticleKind, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(ArticleKind::default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| invalid_value_error(field, raw, "ARTICLE or NEWS")),
    }
}

/// Optional category filter for list queries.
pub(crate) fn parse_optional_kind(
    field: FieldName,
    value: Option<&str>,
) -> Result<Option<ArticleKind>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(_) => parse_kind(field, value).map(Some),
    }
}

/// Optional positive result cap.
pub(crate) fn parse_limit(field: FieldName, value: Option<&str>) -> Result<Option<NonZeroU32>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<NonZeroU32>()
            .map(Some)
            .map_err(|_| invalid_value_error(field, raw, "a positive integer")),
    }
}

pub(crate) fn parse_article_id(field: FieldName, value: &str) -> Result<ArticleId, Error> {
    value
        .parse()
        .map_err(|_| invalid_value_error(field, value, "a positive integer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, Ok(false))]
    #[case(Some(""), Ok(false))]
    #[case(Some("0"), Ok(false))]
    #[case(Some("1"), Ok(true))]
    #[case(Some("on"), Ok(true))]
    #[case(Some("TRUE"), Ok(true))]
    #[case(Some("yes please"), Err(()))]
    fn flags(#[case] raw: Option<&str>, #[case] expected: Result<bool, ()>) {
        assert_eq!(parse_flag(FEATURED, raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case(None, ArticleKind::Article)]
    #[case(Some(""), ArticleKind::Article)]
    #[case(Some("NEWS"), ArticleKind::News)]
    #[case(Some("article"), ArticleKind::Article)]
    fn kinds_default_to_article(#[case] raw: Option<&str>, #[case] expected: ArticleKind) {
        assert_eq!(parse_kind(KIND, raw).expect("valid kind"), expected);
    }

    #[rstest]
    fn unknown_kind_names_the_field() {
        let error = parse_kind(KIND, Some("BLOG")).expect_err("unknown kind");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "type");
        assert_eq!(details["value"], "BLOG");
        assert_eq!(details["code"], "invalid_value");
    }

    #[rstest]
    #[case(None, Ok(None))]
    #[case(Some("3"), Ok(NonZeroU32::new(3)))]
    #[case(Some("0"), Err(()))]
    #[case(Some("-1"), Err(()))]
    #[case(Some("ten"), Err(()))]
    fn limits(#[case] raw: Option<&str>, #[case] expected: Result<Option<NonZeroU32>, ()>) {
        assert_eq!(parse_limit(LIMIT, raw).map_err(|_| ()), expected);
    }

    #[rstest]
    fn optional_filters_treat_empty_as_absent() {
        assert_eq!(parse_featured_filter(Some("")), None);
        assert_eq!(parse_featured_filter(Some("0")), None);
        assert_eq!(parse_featured_filter(Some("maybe")), None);
        assert_eq!(parse_featured_filter(Some(" TRUE ")), Some(true));
        assert_eq!(parse_optional_kind(KIND, Some(" ")).expect("blank"), None);
    }

    #[rstest]
    fn missing_field_details() {
        let error = missing_field_error(TITLE);
        assert_eq!(error.message(), "missing required field: title");
        assert_eq!(error.details().expect("details")["code"], "missing_field");
    }
}

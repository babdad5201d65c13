//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{admins, articles};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admins)]
pub(crate) struct NewAdminRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image: Option<String>,
    pub kind: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub kind: &'a str,
    pub featured: bool,
}

/// Full overwrite of the editable columns; a `None` image writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArticleUpdate<'a> {
    pub title: &'a str,
    pub summary: &'a str,
    pub content: &'a str,
    pub image: Option<&'a str>,
    pub kind: &'a str,
    pub featured: bool,
    pub updated_at: DateTime<Utc>,
}

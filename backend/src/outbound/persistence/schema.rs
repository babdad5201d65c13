//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Admin accounts allowed into the panel.
    admins (id) {
        id -> Int4,
        /// Unique login name.
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Articles and news items.
    articles (id) {
        id -> Int4,
        title -> Varchar,
        summary -> Text,
        /// Rich-text HTML.
        content -> Text,
        /// `public/uploads/<file>` or NULL.
        image -> Nullable<Varchar>,
        /// `ARTICLE` or `NEWS`.
        kind -> Varchar,
        featured -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(admins, articles);

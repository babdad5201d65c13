//! PostgreSQL-backed `ArticleRepository` using Diesel.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{ArticlePersistenceError, ArticleRecord, ArticleRepository};
use crate::domain::{Article, ArticleFilter, ArticleId, ArticleKind, ImagePath};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ArticleRow, ArticleUpdate, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticlePersistenceError {
    map_basic_pool_error(error, ArticlePersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ArticlePersistenceError {
    map_basic_diesel_error(
        error,
        ArticlePersistenceError::query,
        ArticlePersistenceError::connection,
    )
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticlePersistenceError> {
    let ArticleRow {
        id,
        title,
        summary,
        content,
        image,
        kind,
        featured,
        created_at,
        updated_at,
    } = row;

    let kind = kind
        .parse::<ArticleKind>()
        .map_err(|err| ArticlePersistenceError::query(err.to_string()))?;
    // A bad stored path only loses the cover; the record stays readable.
    let image = image.and_then(|raw| match ImagePath::new(raw.as_str()) {
        Ok(path) => Some(path),
        Err(error) => {
            warn!(article_id = id, path = %raw, error = %error, "ignoring invalid stored image path");
            None
        }
    });

    Ok(Article {
        id: ArticleId::new(id),
        title,
        summary,
        content,
        image,
        kind,
        featured,
        created_at,
        updated_at,
    })
}

fn rows_to_articles(rows: Vec<ArticleRow>) -> Result<Vec<Article>, ArticlePersistenceError> {
    rows.into_iter().map(row_to_article).collect()
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = articles::table
            .select(ArticleRow::as_select())
            .order((articles::created_at.desc(), articles::id.desc()))
            .into_boxed();
        if let Some(kind) = filter.kind {
            query = query.filter(articles::kind.eq(kind.as_str()));
        }
        if let Some(featured) = filter.featured {
            query = query.filter(articles::featured.eq(featured));
        }
        if let Some(limit) = filter.limit {
            query = query.limit(i64::from(limit.get()));
        }

        let rows: Vec<ArticleRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_articles(rows)
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = articles::table
            .find(id.get())
            .select(ArticleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_article).transpose()
    }

    async fn insert(&self, record: &ArticleRecord) -> Result<Article, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewArticleRow {
            title: record.draft.title(),
            summary: record.draft.summary(),
            content: record.draft.content(),
            image: record.image.as_ref().map(ImagePath::as_str),
            kind: record.draft.kind().as_str(),
            featured: record.draft.featured(),
        };
        let row = diesel::insert_into(articles::table)
            .values(&new_row)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_article(row)
    }

    async fn update(
        &self,
        id: ArticleId,
        record: &ArticleRecord,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ArticleUpdate {
            title: record.draft.title(),
            summary: record.draft.summary(),
            content: record.draft.content(),
            image: record.image.as_ref().map(ImagePath::as_str),
            kind: record.draft.kind().as_str(),
            featured: record.draft.featured(),
            updated_at: Utc::now(),
        };
        let row = diesel::update(articles::table.find(id.get()))
            .set(&changes)
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_article).transpose()
    }

    async fn delete(&self, id: ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::delete(articles::table.find(id.get()))
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_article).transpose()
    }
}

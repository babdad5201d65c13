//! Mutex-backed repository doubles.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::ports::{
    AdminPersistenceError, AdminRepository, ArticlePersistenceError, ArticleRecord,
    ArticleRepository,
};
use crate::domain::{AdminAccount, AdminId, Article, ArticleFilter, ArticleId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct ArticleTable {
    rows: Vec<Article>,
    next_id: i32,
    last_created: Option<DateTime<Utc>>,
}

/// Article store keeping rows in insertion order.
///
/// Creation timestamps strictly increase, so listings are ordered the same
/// way as in PostgreSQL even when inserts land within one clock tick.
#[derive(Default)]
pub struct InMemoryArticleRepository {
    table: Mutex<ArticleTable>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored row, newest first.
    pub fn all(&self) -> Vec<Article> {
        let mut rows = lock(&self.table).rows.clone();
        sort_newest_first(&mut rows);
        rows
    }

    pub fn len(&self) -> usize {
        lock(&self.table).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sort_newest_first(rows: &mut [Article]) {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

fn apply(record: &ArticleRecord, article: &mut Article) {
    article.title = record.draft.title().to_owned();
    article.summary = record.draft.summary().to_owned();
    article.content = record.draft.content().to_owned();
    article.image = record.image.clone();
    article.kind = record.draft.kind();
    article.featured = record.draft.featured();
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticlePersistenceError> {
        let mut rows: Vec<Article> = lock(&self.table)
            .rows
            .iter()
            .filter(|article| filter.matches(article))
            .cloned()
            .collect();
        sort_newest_first(&mut rows);
        if let Some(limit) = filter.limit {
            rows.truncate(usize::try_from(limit.get()).unwrap_or(usize::MAX));
        }
        Ok(rows)
    }

    async fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        Ok(lock(&self.table).rows.iter().find(|a| a.id == id).cloned())
    }

    async fn insert(&self, record: &ArticleRecord) -> Result<Article, ArticlePersistenceError> {
        let mut table = lock(&self.table);
        table.next_id += 1;
        let mut created_at = Utc::now();
        if let Some(last) = table.last_created {
            if created_at <= last {
                created_at = last + TimeDelta::microseconds(1);
            }
        }
        table.last_created = Some(created_at);

        let mut article = Article {
            id: ArticleId::new(table.next_id),
            title: String::new(),
            summary: String::new(),
            content: String::new(),
            image: None,
            kind: record.draft.kind(),
            featured: false,
            created_at,
            updated_at: created_at,
        };
        apply(record, &mut article);
        table.rows.push(article.clone());
        Ok(article)
    }

    async fn update(
        &self,
        id: ArticleId,
        record: &ArticleRecord,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut table = lock(&self.table);
        let Some(article) = table.rows.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        apply(record, article);
        article.updated_at = Utc::now().max(article.created_at);
        Ok(Some(article.clone()))
    }

    async fn delete(&self, id: ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut table = lock(&self.table);
        let position = table.rows.iter().position(|a| a.id == id);
        Ok(position.map(|index| table.rows.remove(index)))
    }
}

/// Admin store with unique usernames.
#[derive(Default)]
pub struct InMemoryAdminRepository {
    accounts: Mutex<Vec<AdminAccount>>,
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, AdminPersistenceError> {
        Ok(lock(&self.accounts)
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, AdminPersistenceError> {
        let mut accounts = lock(&self.accounts);
        if accounts.iter().any(|account| account.username == username) {
            return Ok(false);
        }
        let next = i32::try_from(accounts.len())
            .map_err(|err| AdminPersistenceError::query(err.to_string()))?
            + 1;
        accounts.push(AdminAccount {
            id: AdminId::new(next),
            username: username.to_owned(),
            password_hash: password_hash.to_owned(),
        });
        Ok(true)
    }
}

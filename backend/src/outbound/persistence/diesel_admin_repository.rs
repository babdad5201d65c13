//! PostgreSQL-backed `AdminRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AdminPersistenceError, AdminRepository};
use crate::domain::{AdminAccount, AdminId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AdminRow, NewAdminRow};
use super::pool::{DbPool, PoolError};
use super::schema::admins;

#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AdminPersistenceError {
    map_basic_pool_error(error, AdminPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AdminPersistenceError {
    map_basic_diesel_error(
        error,
        AdminPersistenceError::query,
        AdminPersistenceError::connection,
    )
}

impl From<AdminRow> for AdminAccount {
    fn from(row: AdminRow) -> Self {
        Self {
            id: AdminId::new(row.id),
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminAccount>, AdminPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = admins::table
            .filter(admins::username.eq(username))
            .select(AdminRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(AdminAccount::from))
    }

    async fn insert_if_absent(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, AdminPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(admins::table)
            .values(&NewAdminRow {
                username,
                password_hash,
            })
            .on_conflict(admins::username)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }
}

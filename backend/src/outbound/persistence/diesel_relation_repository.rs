//! PostgreSQL-backed `RelationRepository`.
//!
//! `favorites`, `shopping_carts` and `subscriptions` share one shape, so each
//! query is written once and expanded per table by [`with_relation_table!`].
//! The unique pair constraints and the `subscriptions_not_self` check are
//! what ultimately arbitrate concurrent toggles.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RelationRepository, RelationRepositoryError};
use crate::domain::{Paged, RelationKind, UserId};

use super::diesel_basic_error_mapping::{DieselFailure, classify_diesel_error};
use super::pool::{DbPool, PoolError};

/// Evaluate `$body` with `$table`, `$owner` and `$target` bound to the table
/// and pair columns backing `$kind`.
macro_rules! with_relation_table {
    ($kind:expr, |$table:ident, $owner:ident, $target:ident| $body:expr) => {
        match $kind {
            RelationKind::Favorite => {
                use super::schema::favorites::{recipe_id as $target, table as $table, user_id as $owner};
                $body
            }
            RelationKind::ShoppingCart => {
                use super::schema::shopping_carts::{
                    recipe_id as $target, table as $table, user_id as $owner,
                };
                $body
            }
            RelationKind::Subscription => {
                use super::schema::subscriptions::{
                    author_id as $target, table as $table, user_id as $owner,
                };
                $body
            }
        }
    };
}

/// Diesel implementation of [`RelationRepository`].
#[derive(Clone)]
pub struct DieselRelationRepository {
    pool: DbPool,
}

impl DieselRelationRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RelationRepositoryError {
    RelationRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> RelationRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => RelationRepositoryError::connection(message),
        DieselFailure::Query(message) => RelationRepositoryError::query(message),
        DieselFailure::UniqueViolation => RelationRepositoryError::duplicate(),
        DieselFailure::CheckViolation => RelationRepositoryError::self_reference(),
        DieselFailure::ForeignKeyViolation(constraint) => {
            RelationRepositoryError::missing_reference(constraint)
        }
    }
}

#[async_trait]
impl RelationRepository for DieselRelationRepository {
    async fn exists(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<bool, RelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        with_relation_table!(kind, |table, owner_col, target_col| {
            diesel::select(diesel::dsl::exists(
                table
                    .filter(owner_col.eq(owner.get()))
                    .filter(target_col.eq(target)),
            ))
            .get_result::<bool>(&mut conn)
            .await
        })
        .map_err(map_diesel_error)
    }

    async fn create(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<(), RelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        with_relation_table!(kind, |table, owner_col, target_col| {
            diesel::insert_into(table)
                .values((owner_col.eq(owner.get()), target_col.eq(target)))
                .execute(&mut conn)
                .await
        })
        .map(|_| ())
        .map_err(map_diesel_error)
    }

    async fn delete(
        &self,
        kind: RelationKind,
        owner: UserId,
        target: i64,
    ) -> Result<bool, RelationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = with_relation_table!(kind, |table, owner_col, target_col| {
            diesel::delete(
                table
                    .filter(owner_col.eq(owner.get()))
                    .filter(target_col.eq(target)),
            )
            .execute(&mut conn)
            .await
        })
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn linked_targets(
        &self,
        kind: RelationKind,
        owner: UserId,
        targets: &[i64],
    ) -> Result<Vec<i64>, RelationRepositoryError> {
        if targets.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        with_relation_table!(kind, |table, owner_col, target_col| {
            table
                .filter(owner_col.eq(owner.get()))
                .filter(target_col.eq_any(targets.to_vec()))
                .select(target_col)
                .load::<i64>(&mut conn)
                .await
        })
        .map_err(map_diesel_error)
    }

    async fn list_targets(
        &self,
        kind: RelationKind,
        owner: UserId,
        offset: u64,
        limit: u64,
    ) -> Result<Paged<i64>, RelationRepositoryError> {
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (total, items) = with_relation_table!(kind, |table, owner_col, target_col| {
            let total = table
                .filter(owner_col.eq(owner.get()))
                .count()
                .get_result::<i64>(&mut conn)
                .await;
            match total {
                Ok(total) => table
                    .filter(owner_col.eq(owner.get()))
                    .select(target_col)
                    .order_by(target_col.asc())
                    .offset(offset)
                    .limit(limit)
                    .load::<i64>(&mut conn)
                    .await
                    .map(|items| (total, items)),
                Err(err) => Err(err),
            }
        })
        .map_err(map_diesel_error)?;
        Ok(Paged {
            total: u64::try_from(total).unwrap_or_default(),
            items,
        })
    }
}

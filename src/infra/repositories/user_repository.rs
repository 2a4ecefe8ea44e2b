//! User repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every call is a single round trip to the store; dropping the returned
/// future abandons the query. Failures are surfaced, never retried.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a validated record; the store assigns id and timestamps
    async fn insert(&self, user: NewUser) -> AppResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Replace name and date of birth if the row still carries
    /// `expected_updated_at`. `NotFound` if the row is gone, `Conflict`
    /// if another write landed first.
    async fn update(
        &self,
        id: i64,
        user: NewUser,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<User>;

    /// Hard delete by ID. `NotFound` if no row matched.
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// One page of users ordered by ID
    async fn list_page(&self, limit: u64, offset: u64) -> AppResult<Vec<User>>;

    /// All users ordered by ID
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// Total number of users
    async fn count(&self) -> AppResult<u64>;
}

/// SeaORM-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(user.name),
            dob: Set(user.date_of_birth),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn update(
        &self,
        id: i64,
        user: NewUser,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<User> {
        // Compare-and-set on updated_at: a single statement, no row lock held
        let updated = UserEntity::update_many()
            .col_expr(user::Column::Name, Expr::value(user.name))
            .col_expr(user::Column::Dob, Expr::value(user.date_of_birth))
            .col_expr(user::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::UpdatedAt.eq(expected_updated_at))
            .exec_with_returning(&self.db)
            .await?;

        if let Some(model) = updated.into_iter().next() {
            return Ok(User::from(model));
        }

        match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(_) => {
                tracing::warn!(user_id = id, "Concurrent update detected");
                Err(AppError::Conflict)
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn list_page(&self, limit: u64, offset: u64) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

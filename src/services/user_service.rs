//! User service - Handles user-related business logic.
//!
//! Validation runs before every write; a request that fails validation
//! never reaches the repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;

use crate::domain::{CreateUser, UpdateUser, User, UserValidator};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;
use crate::types::{Paginated, PaginationParams};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate and persist a new user
    async fn create_user(&self, request: CreateUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// Lenient update: blank or omitted fields keep their stored value
    async fn update_user(&self, id: i64, request: UpdateUser) -> AppResult<User>;

    /// Permanently delete user
    async fn delete_user(&self, id: i64) -> AppResult<()>;

    /// One page of users plus the total count
    async fn list_users(&self, params: PaginationParams) -> AppResult<Paginated<User>>;

    /// Every user, unpaginated
    async fn list_all_users(&self) -> AppResult<Vec<User>>;

    /// Current date according to the service clock
    fn today(&self) -> NaiveDate;
}

/// Concrete implementation of UserService over a repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    validator: UserValidator,
    clock: Arc<dyn Clock>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(
        repo: Arc<dyn UserRepository>,
        validator: UserValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            validator,
            clock,
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, request: CreateUser) -> AppResult<User> {
        let draft = request.validate(&self.validator, self.today())?;
        let user = self.repo.insert(draft).await?;

        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        if id <= 0 {
            return Err(AppError::NotFound);
        }

        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound)
    }

    async fn update_user(&self, id: i64, request: UpdateUser) -> AppResult<User> {
        let existing = self.get_user(id).await?;
        let merged = existing.apply_update(&request, &self.validator, self.today())?;

        if merged.name == existing.name && merged.date_of_birth == existing.date_of_birth {
            tracing::debug!(user_id = id, "Update left user unchanged");
            return Ok(existing);
        }

        let user = self.repo.update(id, merged, existing.updated_at).await?;

        tracing::info!(user_id = user.id, "User updated");
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        if id <= 0 {
            return Err(AppError::NotFound);
        }

        self.repo.delete(id).await?;

        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn list_users(&self, params: PaginationParams) -> AppResult<Paginated<User>> {
        let (users, total) = tokio::try_join!(
            self.repo.list_page(params.limit, params.offset()),
            self.repo.count(),
        )?;

        Ok(Paginated::new(users, params, total))
    }

    async fn list_all_users(&self) -> AppResult<Vec<User>> {
        self.repo.list_all().await
    }

    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }
}

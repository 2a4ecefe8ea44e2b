//! User service tests against a mocked repository.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::{mock, predicate::eq};

use common::{date, fixture_clock, stored_user, user_manager, InMemoryUsers};
use user_api::domain::{CreateUser, NewUser, UpdateUser, User};
use user_api::errors::{AppError, AppResult};
use user_api::infra::UserRepository;
use user_api::services::UserService;
use user_api::types::PaginationQuery;

mock! {
    pub Repo {}

    #[async_trait]
    impl UserRepository for Repo {
        async fn insert(&self, user: NewUser) -> AppResult<User>;
        async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
        async fn update(
            &self,
            id: i64,
            user: NewUser,
            expected_updated_at: DateTime<Utc>,
        ) -> AppResult<User>;
        async fn delete(&self, id: i64) -> AppResult<()>;
        async fn list_page(&self, limit: u64, offset: u64) -> AppResult<Vec<User>>;
        async fn list_all(&self) -> AppResult<Vec<User>>;
        async fn count(&self) -> AppResult<u64>;
    }
}

fn service_on(repo: MockRepo, y: i32, m: u32, d: u32) -> impl UserService {
    user_manager(Arc::new(repo), fixture_clock(y, m, d))
}

fn service(repo: MockRepo) -> impl UserService {
    service_on(repo, 2024, 5, 10)
}

#[tokio::test]
async fn test_create_user_success() {
    let mut repo = MockRepo::new();
    repo.expect_insert()
        .times(1)
        .returning(|draft| Ok(stored_user(1, &draft.name, draft.date_of_birth)));

    let user = service(repo)
        .create_user(CreateUser {
            name: "Alice".to_string(),
            dob: "1990-05-10".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Alice");
    assert_eq!(user.to_response(date(2024, 5, 10)).age, 34);
}

#[tokio::test]
async fn test_create_user_rejects_age_over_limit() {
    let mut repo = MockRepo::new();
    repo.expect_insert().never();

    let result = service(repo)
        .create_user(CreateUser {
            name: "Methuselah".to_string(),
            dob: "1873-05-09".to_string(),
        })
        .await;

    match result {
        Err(AppError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.errors()[0].field, "dob");
            assert_eq!(errors.errors()[0].reason, "age cannot exceed 150 years");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_user_accepts_age_exactly_at_limit() {
    let mut repo = MockRepo::new();
    repo.expect_insert()
        .times(1)
        .returning(|draft| Ok(stored_user(7, &draft.name, draft.date_of_birth)));

    let user = service(repo)
        .create_user(CreateUser {
            name: "Old Timer".to_string(),
            dob: "1874-05-10".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.age(date(2024, 5, 10)), 150);
}

#[tokio::test]
async fn test_get_user_success() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_id()
        .with(eq(5))
        .returning(|id| Ok(Some(stored_user(id, "Bob", date(2000, 1, 1)))));

    let user = service(repo).get_user(5).await.unwrap();

    assert_eq!(user.id, 5);
    assert_eq!(user.name, "Bob");
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_id().with(eq(5)).returning(|_| Ok(None));

    let result = service(repo).get_user(5).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_update_replaces_name_only() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "Alice", date(1990, 5, 10)))));
    repo.expect_update()
        .with(
            eq(2),
            eq(NewUser {
                name: "Alice Smith".to_string(),
                date_of_birth: date(1990, 5, 10),
            }),
            eq(stored_user(2, "Alice", date(1990, 5, 10)).updated_at),
        )
        .times(1)
        .returning(|id, draft, _| Ok(stored_user(id, &draft.name, draft.date_of_birth)));

    let user = service(repo)
        .update_user(
            2,
            UpdateUser {
                name: Some("Alice Smith".to_string()),
                dob: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(user.name, "Alice Smith");
    assert_eq!(user.date_of_birth, date(1990, 5, 10));
}

#[tokio::test]
async fn test_failed_update_never_writes() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "Alice", date(1990, 5, 10)))));
    repo.expect_update().never();

    let result = service(repo)
        .update_user(
            2,
            UpdateUser {
                name: Some("A".to_string()),
                dob: Some("2030-01-01".to_string()),
            },
        )
        .await;

    match result {
        Err(AppError::Validation(errors)) => {
            assert!(errors.has_field("name"));
            assert!(errors.has_field("dob"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_fails_when_row_vanishes() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(stored_user(id, "Alice", date(1990, 5, 10)))));
    repo.expect_update().returning(|_, _, _| Err(AppError::NotFound));

    let result = service(repo)
        .update_user(
            2,
            UpdateUser {
                name: Some("Alicia".to_string()),
                dob: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_stale_write_is_rejected_as_conflict() {
    let repo = Arc::new(InMemoryUsers::default());
    let svc = user_manager(repo.clone(), fixture_clock(2024, 5, 10));

    let created = svc
        .create_user(CreateUser {
            name: "Alice".to_string(),
            dob: "1990-05-10".to_string(),
        })
        .await
        .unwrap();

    // Another writer gets in after `created` was read
    svc.update_user(
        created.id,
        UpdateUser {
            name: None,
            dob: Some("1991-01-01".to_string()),
        },
    )
    .await
    .unwrap();

    let stale = repo
        .update(
            created.id,
            NewUser {
                name: "Alicia".to_string(),
                date_of_birth: created.date_of_birth,
            },
            created.updated_at,
        )
        .await;
    assert!(matches!(stale, Err(AppError::Conflict)));

    // Both earlier writes survive
    let current = svc.get_user(created.id).await.unwrap();
    assert_eq!(current.name, "Alice");
    assert_eq!(current.date_of_birth, date(1991, 1, 1));
}

#[tokio::test]
async fn test_delete_user_success() {
    let mut repo = MockRepo::new();
    repo.expect_delete().with(eq(4)).times(1).returning(|_| Ok(()));

    assert!(service(repo).delete_user(4).await.is_ok());
}

#[tokio::test]
async fn test_delete_user_not_found() {
    let mut repo = MockRepo::new();
    repo.expect_delete().with(eq(4)).returning(|_| Err(AppError::NotFound));

    let result = service(repo).delete_user(4).await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_list_users_clamps_limit() {
    let mut repo = MockRepo::new();
    repo.expect_list_page()
        .with(eq(100), eq(200))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    repo.expect_count().returning(|| Ok(150));

    let page = service(repo)
        .list_users(PaginationQuery::new(3, 500).normalize())
        .await
        .unwrap();

    assert_eq!(page.page, 3);
    assert_eq!(page.limit, 100);
    assert_eq!(page.total, 150);
    assert_eq!(page.total_pages, 2);
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn test_list_users_empty_store() {
    let mut repo = MockRepo::new();
    repo.expect_list_page().returning(|_, _| Ok(Vec::new()));
    repo.expect_count().returning(|| Ok(0));

    let page = service(repo)
        .list_users(PaginationQuery::new(0, 0).normalize())
        .await
        .unwrap();

    assert_eq!((page.page, page.limit), (1, 10));
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn test_store_error_is_surfaced_unretried() {
    let mut repo = MockRepo::new();
    repo.expect_find_by_id()
        .times(1)
        .returning(|_| Err(AppError::Database(sea_orm::DbErr::Custom("connection reset".into()))));

    let result = service(repo).get_user(1).await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_today_follows_injected_clock() {
    let svc = service_on(MockRepo::new(), 2024, 2, 29);
    assert_eq!(svc.today(), date(2024, 2, 29));
}

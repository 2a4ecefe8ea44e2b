//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use user_api::domain::{NewUser, User, UserValidator};
use user_api::errors::{AppError, AppResult};
use user_api::infra::UserRepository;
use user_api::services::UserManager;

/// Clock frozen at noon UTC on a given date.
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub fn on(y: i32, m: u32, d: u32) -> Self {
        Self {
            utc_now: Utc
                .with_ymd_and_hms(y, m, d, 12, 0, 0)
                .single()
                .expect("valid fixture timestamp"),
        }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixture_clock(y: i32, m: u32, d: u32) -> Arc<dyn Clock> {
    Arc::new(FixtureClock::on(y, m, d))
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn stored_user(id: i64, name: &str, dob: NaiveDate) -> User {
    let ts = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    User {
        id,
        name: name.to_string(),
        date_of_birth: dob,
        created_at: ts,
        updated_at: ts,
    }
}

/// Repository backed by a map, with ids assigned from 1.
#[derive(Default)]
pub struct InMemoryUsers {
    inner: Mutex<Store>,
}

#[derive(Default)]
struct Store {
    last_id: i64,
    rows: BTreeMap<i64, User>,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().rows.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut store = self.inner.lock().unwrap();
        store.last_id += 1;
        let now = Utc::now();
        let row = User {
            id: store.last_id,
            name: user.name,
            date_of_birth: user.date_of_birth,
            created_at: now,
            updated_at: now,
        };
        store.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.inner.lock().unwrap().rows.get(&id).cloned())
    }

    async fn update(
        &self,
        id: i64,
        user: NewUser,
        expected_updated_at: DateTime<Utc>,
    ) -> AppResult<User> {
        let mut store = self.inner.lock().unwrap();
        let row = store.rows.get_mut(&id).ok_or(AppError::NotFound)?;
        if row.updated_at != expected_updated_at {
            return Err(AppError::Conflict);
        }
        row.name = user.name;
        row.date_of_birth = user.date_of_birth;
        // Strictly increasing so back-to-back writes never share a stamp
        row.updated_at = Utc::now().max(row.updated_at + Duration::microseconds(1));
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn list_page(&self, limit: u64, offset: u64) -> AppResult<Vec<User>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .rows
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<User>> {
        Ok(self.inner.lock().unwrap().rows.values().cloned().collect())
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.inner.lock().unwrap().rows.len() as u64)
    }
}

/// Service over `repo` with the default validator and a frozen clock.
pub fn user_manager(repo: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> UserManager {
    UserManager::new(repo, UserValidator::default(), clock)
}

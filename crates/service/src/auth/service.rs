use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use super::domain::{LoginInput, RegisterInput, UserRecord, UserView};
use super::errors::AuthError;
use super::repository::UserStore;
use super::validation::validate_registration;
use crate::errors::ServiceError;

/// Auth business service independent of web framework.
///
/// Every call is one load → check → (save) cycle against the store with no
/// locking in between.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self { Self { store } }

    /// Register a new user.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, repository::mock::InMemoryUserStore, domain::RegisterInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(InMemoryUserStore::default()));
    /// let input = RegisterInput { full_name: " Ana Lopez ".into(), email: "Ana@Test.com".into(), password: "secret1".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.full_name, "Ana Lopez");
    /// assert_eq!(user.email, "ana@test.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserView, AuthError> {
        validate_registration(&input)?;

        let mut users = self.store.load().await?;
        if users.iter().any(|u| u.has_email(&input.email)) {
            debug!("email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let now = Utc::now();
        let id = next_id(&users, now)
            .ok_or_else(|| ServiceError::Malformed("no user id left above the stored maximum".into()))?;
        let record = UserRecord::new(
            id,
            input.full_name.trim().to_string(),
            input.email.to_lowercase(),
            input.password,
            now,
        );
        let view = record.view();
        users.push(record);
        self.store.save(&users).await?;

        info!(user_id = view.id, email = %view.email, "user_registered");
        Ok(view)
    }

    /// Check credentials and return the matching user.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, repository::mock::InMemoryUserStore};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(InMemoryUserStore::default()));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { full_name: "Ana Lopez".into(), email: "ana@test.com".into(), password: "secret1".into() }));
    /// let user = tokio_test::block_on(svc.login(LoginInput { email: "ANA@test.com".into(), password: "secret1".into() })).unwrap();
    /// assert_eq!(user.full_name, "Ana Lopez");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<UserView, AuthError> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let users = self.store.load().await?;
        let Some(user) = users
            .iter()
            .find(|u| u.has_email(&input.email))
            .filter(|u| u.password == input.password)
        else {
            warn!("login_rejected");
            return Err(AuthError::InvalidCredentials);
        };

        info!(user_id = user.id, "login_succeeded");
        Ok(user.view())
    }
}

/// Millisecond timestamp, bumped past the highest existing id so sequential
/// registrations in the same millisecond stay distinct.
///
/// `None` when a stored id already sits at `i64::MAX`.
fn next_id(users: &[UserRecord], now: DateTime<Utc>) -> Option<i64> {
    let ts = now.timestamp_millis();
    match users.iter().map(|u| u.id).max() {
        Some(max) => max.checked_add(1).map(|bumped| ts.max(bumped)),
        None => Some(ts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::InMemoryUserStore;
    use crate::auth::validation::ValidationError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn svc() -> (AuthService, Arc<InMemoryUserStore>) {
        let store = Arc::new(InMemoryUserStore::default());
        (AuthService::new(store.clone()), store)
    }

    fn reg(name: &str, email: &str, password: &str) -> RegisterInput {
        RegisterInput { full_name: name.into(), email: email.into(), password: password.into() }
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    /// Store whose every call fails, counting how often it was reached.
    #[derive(Default)]
    struct BrokenStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn load(&self) -> Result<Vec<UserRecord>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::StorageUnavailable("disk gone".into()))
        }

        async fn save(&self, _records: &[UserRecord]) -> Result<(), ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ServiceError::StorageUnavailable("disk gone".into()))
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let (svc, store) = svc();
        let created = svc.register(reg("Ana Lopez", "Ana@Test.com", "secret1")).await.unwrap();
        assert_eq!(created.full_name, "Ana Lopez");
        assert_eq!(created.email, "ana@test.com");

        let user = svc.login(login("ana@test.com", "secret1")).await.unwrap();
        assert_eq!(user, created);

        let stored = store.load().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].password, "secret1");
    }

    #[tokio::test]
    async fn register_normalizes_name_and_email_but_not_password() {
        let (svc, store) = svc();
        svc.register(reg("   María José  ", "MJ@Example.MX", " pass word ")).await.unwrap();

        let rec = &store.load().await.unwrap()[0];
        assert_eq!(rec.full_name, "María José");
        assert_eq!(rec.email, "mj@example.mx");
        assert_eq!(rec.password, " pass word ");
    }

    #[tokio::test]
    async fn duplicate_email_differing_in_case_is_rejected() {
        let (svc, store) = svc();
        svc.register(reg("Alice", "A@x.com", "secret1")).await.unwrap();
        let err = svc.register(reg("Other", "a@X.com", "secret2")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validation_runs_before_the_store() {
        let store = Arc::new(BrokenStore::default());
        let svc = AuthService::new(store.clone());

        let err = svc.register(reg("Al", "bad", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(ValidationError::InvalidName)));
        let err = svc.register(reg("Alice", "bad", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(ValidationError::InvalidEmail)));
        let err = svc.register(reg("Alice", "a@b.co", "x")).await.unwrap_err();
        assert_eq!(err.to_string(), "La contraseña debe tener al menos 6 caracteres.");

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let (svc, _) = svc();
        svc.register(reg("Ana Lopez", "ana@test.com", "secret1")).await.unwrap();

        let unknown = svc.login(login("nobody@test.com", "secret1")).await.unwrap_err();
        let wrong = svc.login(login("ana@test.com", "Secret1")).await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert_eq!(unknown.code(), wrong.code());
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let store = Arc::new(BrokenStore::default());
        let svc = AuthService::new(store.clone());

        for (email, password) in [("", "secret1"), ("ana@test.com", ""), ("", "")] {
            let err = svc.login(login(email, password)).await.unwrap_err();
            assert!(matches!(err, AuthError::MissingCredentials));
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() {
        let svc = AuthService::new(Arc::new(BrokenStore::default()));

        let err = svc.register(reg("Ana Lopez", "ana@test.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(ServiceError::StorageUnavailable(_))));
        let err = svc.login(login("ana@test.com", "secret1")).await.unwrap_err();
        assert_eq!(err.kind(), "internal_error");
    }

    #[tokio::test]
    async fn ids_increase_across_sequential_registrations() {
        let (svc, _) = svc();
        let mut last = i64::MIN;
        for i in 0..20 {
            let user = svc.register(reg("User Name", &format!("u{i}@test.com"), "secret1")).await.unwrap();
            assert!(user.id > last);
            last = user.id;
        }
    }

    #[tokio::test]
    async fn existing_records_keep_their_order() {
        let now = Utc::now();
        let seed: Vec<UserRecord> = (0..3)
            .map(|i| UserRecord::new(i, format!("User {i}"), format!("u{i}@test.com"), "secret1".into(), now))
            .collect();
        let store = Arc::new(InMemoryUserStore::with_records(seed.clone()));
        let svc = AuthService::new(store.clone());

        svc.register(reg("Newest", "new@test.com", "secret1")).await.unwrap();
        let stored = store.load().await.unwrap();
        assert_eq!(&stored[..3], &seed[..]);
        assert_eq!(stored[3].email, "new@test.com");
    }

    fn stored(id: i64, email: &str) -> UserRecord {
        UserRecord::new(id, "Ana Lopez".into(), email.into(), "secret1".into(), Utc::now())
    }

    #[test]
    fn next_id_uses_clock_or_bumps_past_max() {
        let now = Utc::now();
        assert_eq!(next_id(&[], now), Some(now.timestamp_millis()));

        let ahead = stored(now.timestamp_millis() + 10, "a@b.co");
        assert_eq!(next_id(std::slice::from_ref(&ahead), now), Some(ahead.id + 1));

        let behind = stored(5, "a@b.co");
        assert_eq!(next_id(std::slice::from_ref(&behind), now), Some(now.timestamp_millis()));
    }

    #[test]
    fn next_id_is_none_at_the_top_of_the_range() {
        let top = stored(i64::MAX, "a@b.co");
        assert_eq!(next_id(std::slice::from_ref(&top), Utc::now()), None);
    }

    #[tokio::test]
    async fn register_fails_cleanly_when_ids_are_exhausted() {
        let store = Arc::new(InMemoryUserStore::with_records(vec![stored(i64::MAX, "ana@test.com")]));
        let svc = AuthService::new(store.clone());

        let err = svc.register(reg("Bob Smith", "bob@test.com", "secret1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Storage(ServiceError::Malformed(_))));
        assert_eq!(store.load().await.unwrap().len(), 1);

        // existing users can still sign in
        let user = svc.login(login("ana@test.com", "secret1")).await.unwrap();
        assert_eq!(user.id, i64::MAX);
    }

    #[tokio::test]
    async fn offsetless_created_at_does_not_block_the_store() {
        let mut legacy = stored(1, "ana@test.com");
        legacy.created_at = "2024-05-29T16:26:40".into();
        let store = Arc::new(InMemoryUserStore::with_records(vec![legacy]));
        let svc = AuthService::new(store.clone());

        assert_eq!(svc.login(login("ana@test.com", "secret1")).await.unwrap().id, 1);
        svc.register(reg("Bob Smith", "bob@test.com", "secret1")).await.unwrap();
        assert_eq!(store.load().await.unwrap()[0].created_at, "2024-05-29T16:26:40");
    }
}

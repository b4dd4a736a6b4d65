//! Session store.
//!
//! Owns the single current identity and brokers every call to the identity
//! service. State is published through a `tokio::sync::watch` channel so
//! observers can render the loading flag while a call is in flight.
//!
//! # States
//!
//! ```text
//! Unknown --check_status--> Guest | Authenticated
//! Guest --login / register--> Authenticated
//! Authenticated --logout--> Guest
//! ```
//!
//! Remote failures never escape as errors: login and registration turn them
//! into a [`SessionError`] whose message is also stored on the snapshot, and
//! the startup check and logout fall back to `Guest`. Nothing is retried.
//!
//! Calls are expected to arrive one at a time. If they overlap, whichever
//! finishes last decides the state and the loading flag.

mod error;

use tokio::sync::watch;
use uuid::Uuid;

use kabadiwala_core::{Credentials, Email, SessionStatus};

pub use error::SessionError;

use crate::error::{capture_remote_failure, clear_sentry_user, set_sentry_user};
use crate::identity::{IdentityError, IdentityProvider};
use crate::models::session::{CurrentUser, SessionSnapshot, SessionState};

/// Email of the built-in administrator.
pub const ADMIN_EMAIL: &str = "admin@gmail.com";

/// Password of the built-in administrator.
pub const ADMIN_PASSWORD: &str = "admin123";

/// Display name of the built-in administrator.
pub const ADMIN_NAME: &str = "Admin User";

/// The session store.
pub struct SessionStore<P> {
    provider: P,
    state: watch::Sender<SessionSnapshot>,
}

impl<P: IdentityProvider> SessionStore<P> {
    /// Create a store in the `Unknown` state with the loading flag set.
    ///
    /// Call [`check_status`](Self::check_status) once before use, or use
    /// [`initialize`](Self::initialize).
    pub fn new(provider: P) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self { provider, state }
    }

    /// Create a store and run the startup session check.
    pub async fn initialize(provider: P) -> Self {
        let store = Self::new(provider);
        store.check_status().await;
        store
    }

    /// The identity provider this store talks to.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Watch the session snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.borrow().state.user().cloned()
    }

    /// Current status without the identity payload.
    pub fn status(&self) -> SessionStatus {
        self.state.borrow().state.status()
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.status() == SessionStatus::Authenticated
    }

    /// Whether a call to the identity service is in flight.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Message from the last failed login or registration.
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Restore an existing session from the identity service.
    ///
    /// Any failure, including an unreachable service, means "no session".
    pub async fn check_status(&self) -> SessionStatus {
        let state = match self.fetch_current_user().await {
            Ok(user) => {
                tracing::info!(email = %user.email, "Existing session restored");
                set_sentry_user(&user);
                SessionState::Authenticated(user)
            }
            Err(e) => {
                tracing::debug!(error = %e, "No existing session");
                SessionState::Guest
            }
        };

        let status = state.status();
        self.state.send_modify(|snapshot| {
            snapshot.state = state;
            snapshot.loading = false;
        });
        status
    }

    /// Sign in.
    ///
    /// The built-in administrator credentials sign in locally without
    /// contacting the identity service. Anything else goes through the
    /// service. On failure the current state is left as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCredentials` for any failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<CurrentUser, SessionError> {
        self.begin_call();

        let result = if credentials.matches(ADMIN_EMAIL, ADMIN_PASSWORD) {
            administrator()
        } else {
            self.authenticate(credentials).await
        };

        match result {
            Ok(user) => {
                tracing::info!(email = %user.email, "User logged in");
                Ok(self.sign_in(user))
            }
            Err(e) => {
                report_failure("Login failed", &e);
                Err(self.fail_call(SessionError::InvalidCredentials))
            }
        }
    }

    /// Sign out.
    ///
    /// The remote session is deleted best-effort; the local session is always
    /// cleared.
    pub async fn logout(&self) {
        if let Err(e) = self.provider.delete_session().await {
            tracing::warn!(error = %e, "Remote logout failed");
        }

        clear_sentry_user();
        self.state.send_modify(|snapshot| snapshot.state = SessionState::Guest);
        tracing::info!("User logged out");
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RegistrationFailed` if account creation or the
    /// follow-up login fails. The current state is left as it was.
    pub async fn register(
        &self,
        name: &str,
        credentials: &Credentials,
    ) -> Result<CurrentUser, SessionError> {
        self.begin_call();

        let account_id = Uuid::new_v4().simple().to_string();
        let result = match self
            .provider
            .create_account(&account_id, credentials.email(), credentials.password(), name)
            .await
        {
            Ok(_) => self.authenticate(credentials).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                tracing::info!(email = %user.email, account_id = %account_id, "User registered");
                Ok(self.sign_in(user))
            }
            Err(e) => {
                report_failure("Registration failed", &e);
                Err(self.fail_call(SessionError::RegistrationFailed))
            }
        }
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<CurrentUser, IdentityError> {
        self.provider
            .create_session(credentials.email(), credentials.password())
            .await?;
        self.fetch_current_user().await
    }

    async fn fetch_current_user(&self) -> Result<CurrentUser, IdentityError> {
        let account = self.provider.current_account().await?;
        CurrentUser::try_from(account)
    }

    fn begin_call(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
        });
    }

    fn sign_in(&self, user: CurrentUser) -> CurrentUser {
        set_sentry_user(&user);
        self.state.send_modify(|snapshot| {
            snapshot.state = SessionState::Authenticated(user.clone());
            snapshot.loading = false;
        });
        user
    }

    fn fail_call(&self, error: SessionError) -> SessionError {
        self.state.send_modify(|snapshot| {
            snapshot.loading = false;
            snapshot.error = Some(error.to_string());
        });
        error
    }
}

impl<P> std::fmt::Debug for SessionStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

/// The built-in administrator identity.
fn administrator() -> Result<CurrentUser, IdentityError> {
    Ok(CurrentUser {
        account_id: None,
        name: ADMIN_NAME.to_string(),
        email: Email::parse(ADMIN_EMAIL)?,
        phone: None,
    })
}

/// Client errors (bad credentials, duplicate email) are only logged; anything
/// else is reported.
fn report_failure(context: &str, error: &IdentityError) {
    if matches!(error, IdentityError::Api { status: 400..=499, .. }) {
        tracing::warn!(error = %error, "{context}");
    } else {
        capture_remote_failure(context, error);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use secrecy::SecretString;

    use super::*;
    use crate::identity::{Account, InMemoryIdentityProvider};

    /// Counts calls and can be told to fail every request.
    #[derive(Default)]
    struct ScriptedProvider {
        inner: InMemoryIdentityProvider,
        calls: AtomicUsize,
        offline: bool,
    }

    impl ScriptedProvider {
        fn with_seller() -> Self {
            Self {
                inner: InMemoryIdentityProvider::new().with_account(
                    "acc-ravi",
                    "Ravi Kumar",
                    "ravi@kabadiwala.com",
                    "scrap-dealer",
                ),
                ..Self::default()
            }
        }

        fn offline() -> Self {
            Self {
                offline: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn check(&self) -> Result<(), IdentityError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(IdentityError::Parse("connection refused".to_string()));
            }
            Ok(())
        }
    }

    impl IdentityProvider for ScriptedProvider {
        fn create_session(
            &self,
            email: &str,
            password: &SecretString,
        ) -> impl Future<Output = Result<(), IdentityError>> + Send {
            let checked = self.check();
            async move {
                checked?;
                self.inner.create_session(email, password).await
            }
        }

        fn current_account(&self) -> impl Future<Output = Result<Account, IdentityError>> + Send {
            let checked = self.check();
            async move {
                checked?;
                self.inner.current_account().await
            }
        }

        fn delete_session(&self) -> impl Future<Output = Result<(), IdentityError>> + Send {
            let checked = self.check();
            async move {
                checked?;
                self.inner.delete_session().await
            }
        }

        fn create_account(
            &self,
            account_id: &str,
            email: &str,
            password: &SecretString,
            name: &str,
        ) -> impl Future<Output = Result<Account, IdentityError>> + Send {
            let checked = self.check();
            async move {
                checked?;
                self.inner
                    .create_account(account_id, email, password, name)
                    .await
            }
        }
    }

    #[tokio::test]
    async fn test_starts_unknown_and_loading() {
        let store = SessionStore::new(ScriptedProvider::default());
        assert_eq!(store.status(), SessionStatus::Unknown);
        assert!(store.is_loading());
    }

    #[tokio::test]
    async fn test_startup_check_without_session_is_guest() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;
        assert_eq!(store.status(), SessionStatus::Guest);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_startup_check_failure_is_silent_guest() {
        let store = SessionStore::initialize(ScriptedProvider::offline()).await;
        assert_eq!(store.status(), SessionStatus::Guest);
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_startup_check_restores_session() {
        let provider = ScriptedProvider::with_seller();
        provider
            .inner
            .create_session(
                "ravi@kabadiwala.com",
                &SecretString::from("scrap-dealer".to_string()),
            )
            .await
            .unwrap();

        let store = SessionStore::initialize(provider).await;
        assert_eq!(store.current_user().unwrap().name, "Ravi Kumar");
    }

    #[tokio::test]
    async fn test_admin_login_skips_identity_service() {
        let store = SessionStore::new(ScriptedProvider::offline());

        let user = store
            .login(&Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
            .await
            .unwrap();

        assert_eq!(user.name, "Admin User");
        assert_eq!(user.email.as_str(), "admin@gmail.com");
        assert!(user.account_id.is_none());
        assert!(store.is_authenticated());
        assert_eq!(store.provider().calls(), 0);
    }

    #[tokio::test]
    async fn test_admin_bypass_is_exact_match() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;

        let result = store
            .login(&Credentials::new("admin@gmail.com", "Admin123"))
            .await;

        assert_eq!(result, Err(SessionError::InvalidCredentials));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_remote_login() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;

        let user = store
            .login(&Credentials::new("ravi@kabadiwala.com", "scrap-dealer"))
            .await
            .unwrap();

        assert_eq!(user.account_id.unwrap().as_str(), "acc-ravi");
        assert!(store.is_authenticated());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_rejected_login_sets_message() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;

        let err = store
            .login(&Credentials::new("ravi@kabadiwala.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(store.error().as_deref(), Some("Invalid email or password"));
        assert_eq!(store.status(), SessionStatus::Guest);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;
        store
            .login(&Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
            .await
            .unwrap();

        store
            .login(&Credentials::new("ravi@kabadiwala.com", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(store.current_user().unwrap().name, "Admin User");
    }

    #[tokio::test]
    async fn test_next_attempt_clears_error() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;
        store
            .login(&Credentials::new("ravi@kabadiwala.com", "wrong"))
            .await
            .unwrap_err();

        store
            .login(&Credentials::new("ravi@kabadiwala.com", "scrap-dealer"))
            .await
            .unwrap();
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_remote_fails() {
        let store = SessionStore::new(ScriptedProvider::offline());
        store
            .login(&Credentials::new(ADMIN_EMAIL, ADMIN_PASSWORD))
            .await
            .unwrap();

        store.logout().await;

        assert_eq!(store.status(), SessionStatus::Guest);
        assert!(store.current_user().is_none());
        assert_eq!(store.provider().calls(), 1);
    }

    #[tokio::test]
    async fn test_logout_deletes_remote_session() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;
        store
            .login(&Credentials::new("ravi@kabadiwala.com", "scrap-dealer"))
            .await
            .unwrap();

        store.logout().await;

        assert!(store.provider().inner.current_email().is_none());
        assert_eq!(store.status(), SessionStatus::Guest);
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let store = SessionStore::initialize(ScriptedProvider::default()).await;

        let user = store
            .register("Meena", &Credentials::new("meena@kabadiwala.com", "recycle-all"))
            .await
            .unwrap();

        assert_eq!(user.name, "Meena");
        assert_eq!(user.account_id.unwrap().as_str().len(), 32);
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_failure_leaves_session_unset() {
        let store = SessionStore::initialize(ScriptedProvider::with_seller()).await;

        let err = store
            .register("Ravi", &Credentials::new("ravi@kabadiwala.com", "another-pass"))
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::RegistrationFailed);
        assert_eq!(
            store.error().as_deref(),
            Some("Registration failed. Please try again.")
        );
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_observers_see_loading_flag() {
        let store = Arc::new(SessionStore::initialize(ScriptedProvider::with_seller()).await);
        let mut rx = store.subscribe();
        assert!(!rx.borrow_and_update().loading);

        let task = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .login(&Credentials::new("ravi@kabadiwala.com", "scrap-dealer"))
                    .await
            })
        };

        rx.changed().await.unwrap();
        let first = rx.borrow_and_update().clone();
        assert!(first.loading || first.state.user().is_some());

        task.await.unwrap().unwrap();
        let last = store.snapshot();
        assert!(!last.loading);
        assert!(last.state.user().is_some());
    }
}

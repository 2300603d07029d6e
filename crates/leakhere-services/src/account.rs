//! Register, login and logout, with the session persisted through a `SessionStore`.

use std::sync::Arc;

use leakhere_core::models::{Credentials, Session};
use leakhere_core::ports::{AuthApi, Notice, Notifier, SessionStore};
use leakhere_core::validation::{validate_credentials, validate_registration};

use crate::error::ServiceError;

const REGISTER_FAILED: &str = "Registration failed. Please try again.";
const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

pub struct AccountService {
    auth: Arc<dyn AuthApi>,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl AccountService {
    pub fn new(
        auth: Arc<dyn AuthApi>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            auth,
            store,
            notifier,
        }
    }

    /// Session saved by a previous run. A corrupt record is discarded.
    pub fn restore(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "Failed to clear session");
                }
                None
            }
        }
    }

    #[tracing::instrument(skip(self, password, confirmation))]
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Session, ServiceError> {
        if let Err(e) = validate_registration(username, password, confirmation) {
            self.notifier.notify(Notice::error(e.to_string()));
            return Err(e.into());
        }

        let credentials = Credentials::new(username.trim(), password);
        let session = match self.auth.register(&credentials).await {
            Ok(session) => session,
            Err(e) => return Err(self.fail(ServiceError::api(e, REGISTER_FAILED))),
        };

        self.store.save(&session)?;
        tracing::info!(user_id = %session.user_id, "Account created");
        self.notifier.notify(Notice::success("Account created successfully!"));
        Ok(session)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ServiceError> {
        if let Err(e) = validate_credentials(username, password) {
            self.notifier.notify(Notice::error(e.to_string()));
            return Err(e.into());
        }

        let credentials = Credentials::new(username.trim(), password);
        let session = match self.auth.login(&credentials).await {
            Ok(session) => session,
            Err(e) => return Err(self.fail(ServiceError::api(e, LOGIN_FAILED))),
        };

        self.store.save(&session)?;
        tracing::info!(user_id = %session.user_id, "Logged in");
        self.notifier
            .notify(Notice::success(format!("Welcome back, {}!", session.username)));
        Ok(session)
    }

    pub fn logout(&self) -> Result<(), ServiceError> {
        self.store.clear()?;
        self.notifier.notify(Notice::info("You have been logged out."));
        Ok(())
    }

    fn fail(&self, err: ServiceError) -> ServiceError {
        tracing::warn!(error = ?err, "Authentication failed");
        self.notifier.notify(Notice::error(err.to_string()));
        err
    }
}

//! Authentication for CloudStore.
//!
//! Registration, login, session resume and logout, layered over the store.
//! Credentials are compared as plain text; this is demo-grade by design and
//! must not be mistaken for real authentication.

use tracing::{info, warn};

use crate::db::{Role, Session, User};
use crate::store::Store;
use crate::{CloudStoreError, Result};

/// Authentication service over an injected store.
pub struct AuthService<'a> {
    store: &'a Store,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService over the given store.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a new account and log it in.
    ///
    /// New accounts get the `user` role and the default storage limit.
    /// Fails with `DuplicateKey` if the email is already taken.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<(User, Session)> {
        let user = self.store.create_user(&User::new(email, password, name)).await?;
        let session = self.store.create_session(&user.id).await?;

        info!(user_id = %user.id, email = %user.email, "User registered");
        Ok((user, session))
    }

    /// Log in with email and password.
    ///
    /// An unknown email and a wrong password both fail with
    /// `InvalidCredentials`; the caller cannot tell which.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, Session)> {
        let user = match self.store.get_user_by_email(email).await? {
            Some(user) if user.password == password => user,
            _ => {
                warn!(email = %email, "Login failed");
                return Err(CloudStoreError::InvalidCredentials);
            }
        };

        let session = self.store.create_session(&user.id).await?;
        info!(user_id = %user.id, "User logged in");
        Ok((user, session))
    }

    /// Resolve the currently logged-in user, if any.
    ///
    /// Returns None when there is no current session, when it has expired,
    /// or when the session's user no longer exists.
    pub async fn resume(&self) -> Result<Option<User>> {
        let Some(session) = self.store.current_session().await? else {
            return Ok(None);
        };

        self.store.get_user_by_id(&session.user_id).await
    }

    /// Log out: delete the current session and clear the pointer. A no-op
    /// when nobody is logged in.
    pub async fn logout(&self) -> Result<()> {
        if let Some(session) = self.store.current_session().await? {
            self.store.delete_session(&session.id).await?;
            info!(user_id = %session.user_id, "User logged out");
        }
        Ok(())
    }

    /// Change a user's role.
    pub async fn change_user_role(&self, user_id: &str, role: Role) -> Result<User> {
        let mut user = self
            .store
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| CloudStoreError::NotFound("user".to_string()))?;

        user.role = role;
        let updated = self.store.update_user(&user).await?;

        info!(user_id = %user_id, role = %role, "User role changed");
        Ok(updated)
    }
}

use aw_core::{Result, TokenStore};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// The credential attached to authenticated requests.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Value of the `Authorization` header: the raw token, or empty.
    pub fn authorization(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }
}

/// Owns the current [`Session`] and keeps it in step with a [`TokenStore`].
pub struct SessionManager {
    session: Session,
    store: Arc<dyn TokenStore>,
}

impl SessionManager {
    /// Starts unauthenticated, whatever the store holds.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            session: Session::anonymous(),
            store,
        }
    }

    /// Picks up a token persisted by an earlier run.
    pub async fn restore(store: Arc<dyn TokenStore>) -> Result<Self> {
        let session = match store.load().await? {
            Some(token) => {
                debug!("Restored session token from store");
                Session::new(token)
            }
            None => Session::anonymous(),
        };
        Ok(Self { session, store })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Persists `token` and makes it the current session.
    pub async fn establish(&mut self, token: String) -> Result<()> {
        self.store.save(&token).await?;
        self.session = Session::new(token);
        Ok(())
    }

    /// Drops the session. Returns whether a token existed beforehand.
    pub async fn end(&mut self) -> Result<bool> {
        let held = std::mem::take(&mut self.session).is_authenticated();
        let stored = self.store.clear().await?.is_some();
        Ok(held || stored)
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.session)
            .field("store", &"<dyn TokenStore>")
            .finish()
    }
}

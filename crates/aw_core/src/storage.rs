use async_trait::async_trait;
use crate::Result;

/// Persistence for the session token.
///
/// Plays the part browser local storage plays for a web client: one key,
/// surviving restarts of the process.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the stored token, if any.
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token and return what was there.
    async fn clear(&self) -> Result<Option<String>>;
}

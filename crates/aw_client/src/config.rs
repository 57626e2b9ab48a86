use aw_core::{Error, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9000";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root the `api/...` endpoints are resolved against.
    pub base_url: Url,
    /// File the session token is persisted in.
    pub token_path: PathBuf,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "base url must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(Self {
            base_url: normalize_base_url(url),
            token_path: default_token_path(),
        })
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: normalize_base_url(
                Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            ),
            token_path: default_token_path(),
        }
    }
}

/// `$XDG_DATA_HOME/aw/token` (or the platform equivalent), else `.aw_token`.
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("aw").join("token"))
        .unwrap_or_else(|| PathBuf::from(".aw_token"))
}

/// `Url::join` drops the last path segment unless it ends with a slash.
pub(crate) fn normalize_base_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

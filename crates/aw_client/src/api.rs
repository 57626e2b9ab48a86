use crate::config::{normalize_base_url, ClientConfig};
use crate::session::Session;
use aw_core::{
    ArticleChanges, ArticleId, ArticleResponse, ArticlesResponse, Credentials, Error,
    LoginResponse, MessageResponse, NewArticle, Result,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;
use url::Url;

const LOGIN_PATH: &str = "api/login";
const ARTICLES_PATH: &str = "api/articles";

/// HTTP calls against the articles backend.
///
/// Stateless: authenticated calls take the [`Session`] whose token goes into
/// the `Authorization` header. Cloning is cheap, the underlying connection
/// pool is shared.
#[derive(Clone)]
pub struct ArticlesApi {
    client: Client,
    base_url: Url,
}

impl fmt::Debug for ArticlesApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArticlesApi")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ArticlesApi {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Client::new(),
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let url = self.endpoint(LOGIN_PATH)?;
        debug!("POST {}", url);
        send(self.client.post(url).json(credentials)).await
    }

    pub async fn list(&self, session: &Session) -> Result<ArticlesResponse> {
        let url = self.endpoint(ARTICLES_PATH)?;
        debug!("GET {}", url);
        send(authorized(self.client.get(url), session)).await
    }

    pub async fn create(&self, session: &Session, article: &NewArticle) -> Result<ArticleResponse> {
        let url = self.endpoint(ARTICLES_PATH)?;
        debug!("POST {}", url);
        send(authorized(self.client.post(url), session).json(article)).await
    }

    pub async fn update(
        &self,
        session: &Session,
        id: ArticleId,
        changes: &ArticleChanges,
    ) -> Result<ArticleResponse> {
        let url = self.article_endpoint(id)?;
        debug!("PUT {}", url);
        send(authorized(self.client.put(url), session).json(changes)).await
    }

    pub async fn delete(&self, session: &Session, id: ArticleId) -> Result<MessageResponse> {
        let url = self.article_endpoint(id)?;
        debug!("DELETE {}", url);
        send(authorized(self.client.delete(url), session)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn article_endpoint(&self, id: ArticleId) -> Result<Url> {
        self.endpoint(&format!("{}/{}", ARTICLES_PATH, id))
    }
}

/// The raw token goes in the header, with no scheme prefix. Without a token
/// the header is still sent, empty, and the server decides.
fn authorized(request: RequestBuilder, session: &Session) -> RequestBuilder {
    request.header(AUTHORIZATION, session.authorization())
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&body)
        .map(|m| m.message)
        .unwrap_or(body);
    Err(Error::from_status(status.as_u16(), message))
}

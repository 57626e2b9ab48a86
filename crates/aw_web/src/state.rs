use crate::error::ApiError;
use aw_core::{Article, ArticleChanges, ArticleId, Credentials, NewArticle, TOPICS};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// When set, the only account accepted at login. Otherwise any username
    /// and password meeting the length rules gets a token.
    pub credentials: Option<Credentials>,
    pub min_username_len: usize,
    pub min_password_len: usize,
    /// Articles present when the server starts.
    pub seed: Vec<NewArticle>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            min_username_len: 3,
            min_password_len: 8,
            seed: default_seed(),
        }
    }
}

impl ServerConfig {
    pub fn empty() -> Self {
        Self {
            seed: Vec::new(),
            ..Self::default()
        }
    }
}

fn default_seed() -> Vec<NewArticle> {
    vec![
        NewArticle::new(
            "Closures",
            "A closure is a function bundled with the scope it was declared in.",
            "JavaScript",
        ),
        NewArticle::new(
            "Effects",
            "Effects synchronize a component with something outside of it.",
            "React",
        ),
        NewArticle::new(
            "Streams",
            "Streams process data piece by piece instead of all at once.",
            "Node",
        ),
    ]
}

#[derive(Debug, Default)]
struct ArticleTable {
    articles: Vec<Article>,
    next_id: u64,
}

impl ArticleTable {
    fn insert(&mut self, article: NewArticle) -> Article {
        self.next_id += 1;
        let article = Article::new(self.next_id, article.title, article.text, article.topic);
        self.articles.push(article.clone());
        article
    }
}

pub struct ServerState {
    config: ServerConfig,
    sessions: RwLock<HashMap<String, String>>,
    articles: RwLock<ArticleTable>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        let mut table = ArticleTable::default();
        for article in config.seed.iter().cloned() {
            table.insert(article);
        }
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
            articles: RwLock::new(table),
        }
    }

    /// Checks the credentials and issues a fresh token.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        let username = credentials.username.trim();
        let password = credentials.password.trim();
        if username.chars().count() < self.config.min_username_len
            || password.chars().count() < self.config.min_password_len
        {
            return Err(ApiError::unprocessable(format!(
                "username must be at least {} and password at least {} characters",
                self.config.min_username_len, self.config.min_password_len
            )));
        }
        if let Some(expected) = &self.config.credentials {
            if expected.username != username || expected.password != password {
                return Err(ApiError::unauthorized("Invalid credentials"));
            }
        }

        let token = uuid::Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(token.clone(), username.to_string());
        debug!("Issued token for {}", username);
        Ok(token)
    }

    /// Username the token was issued to.
    pub async fn user_for(&self, token: &str) -> Option<String> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn list(&self) -> Vec<Article> {
        self.articles.read().await.articles.clone()
    }

    pub async fn create(&self, article: NewArticle) -> Result<Article, ApiError> {
        let article = NewArticle::new(article.title.trim(), article.text.trim(), article.topic.trim());
        validate(&article)?;
        Ok(self.articles.write().await.insert(article))
    }

    pub async fn update(&self, id: ArticleId, changes: &ArticleChanges) -> Result<Article, ApiError> {
        let mut table = self.articles.write().await;
        let entry = table
            .articles
            .iter_mut()
            .find(|a| a.article_id == id)
            .ok_or_else(|| ApiError::not_found(format!("Article {} not found", id)))?;

        let mut updated = entry.clone();
        changes.apply_to(&mut updated);
        updated.title = updated.title.trim().to_string();
        updated.text = updated.text.trim().to_string();
        updated.topic = updated.topic.trim().to_string();
        validate(&NewArticle::from(&updated))?;

        *entry = updated.clone();
        Ok(updated)
    }

    pub async fn delete(&self, id: ArticleId) -> Result<(), ApiError> {
        let mut table = self.articles.write().await;
        let before = table.articles.len();
        table.articles.retain(|a| a.article_id != id);
        if table.articles.len() == before {
            return Err(ApiError::not_found(format!("Article {} not found", id)));
        }
        Ok(())
    }
}

fn validate(article: &NewArticle) -> Result<(), ApiError> {
    if article.title.is_empty() || article.text.is_empty() || article.topic.is_empty() {
        return Err(ApiError::unprocessable("title, text and topic are required"));
    }
    if !TOPICS.contains(&article.topic.as_str()) {
        return Err(ApiError::unprocessable(format!(
            "topic must be one of {}",
            TOPICS.join(", ")
        )));
    }
    Ok(())
}

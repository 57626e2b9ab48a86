use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Topics offered by the article form.
pub const TOPICS: [&str; 3] = ["JavaScript", "React", "Node"];

/// Server-assigned article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArticleId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(ArticleId)
            .map_err(|_| format!("Invalid article id: {}", s))
    }
}

impl From<u64> for ArticleId {
    fn from(id: u64) -> Self {
        ArticleId(id)
    }
}

/// An article as the server returns it.
///
/// Fields the client does not model are kept in `extra` and written back
/// unchanged when the article is serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: ArticleId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub topic: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    pub fn new(
        article_id: impl Into<ArticleId>,
        title: impl Into<String>,
        text: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            article_id: article_id.into(),
            title: title.into(),
            text: text.into(),
            topic: topic.into(),
            extra: Map::new(),
        }
    }
}

/// Body of a create request: an article without its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub text: String,
    pub topic: String,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, text: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            topic: topic.into(),
        }
    }
}

impl From<&Article> for NewArticle {
    fn from(article: &Article) -> Self {
        Self::new(article.title.clone(), article.text.clone(), article.topic.clone())
    }
}

/// Partial update. Only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl ArticleChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.text.is_none() && self.topic.is_none()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Applies the set fields onto `article`.
    pub fn apply_to(&self, article: &mut Article) {
        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(text) = &self.text {
            article.text = text.clone();
        }
        if let Some(topic) = &self.topic {
            article.topic = topic.clone();
        }
    }
}

impl From<NewArticle> for ArticleChanges {
    fn from(article: NewArticle) -> Self {
        Self {
            title: Some(article.title),
            text: Some(article.text),
            topic: Some(article.topic),
        }
    }
}

use aw_core::{Article, ArticleId};

/// Local copy of the server's article list, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleCollection {
    articles: Vec<Article>,
}

impl ArticleCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn as_slice(&self) -> &[Article] {
        &self.articles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.articles.iter().find(|a| a.article_id == id)
    }

    pub fn contains(&self, id: ArticleId) -> bool {
        self.get(id).is_some()
    }

    /// Drops everything held and takes the server's list as is.
    pub fn replace_all(&mut self, articles: Vec<Article>) {
        self.articles = articles;
    }

    pub fn append(&mut self, article: Article) {
        self.articles.push(article);
    }

    /// Puts `article` in place of every entry whose id is `id`.
    /// Returns false when no entry matched.
    pub fn replace(&mut self, id: ArticleId, article: Article) -> bool {
        let mut replaced = false;
        for entry in self.articles.iter_mut().filter(|a| a.article_id == id) {
            *entry = article.clone();
            replaced = true;
        }
        replaced
    }

    /// Removes every entry whose id is `id`. Returns false when none did.
    pub fn remove(&mut self, id: ArticleId) -> bool {
        let before = self.articles.len();
        self.articles.retain(|a| a.article_id != id);
        self.articles.len() != before
    }
}

impl<'a> IntoIterator for &'a ArticleCollection {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}

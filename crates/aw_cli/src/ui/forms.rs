use aw_core::{Article, ArticleChanges, ArticleId, Credentials, NewArticle, TOPICS};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub field: LoginField,
}

impl LoginForm {
    /// Username of at least 3 and password of at least 8 characters, ignoring
    /// surrounding whitespace.
    pub fn is_submittable(&self) -> bool {
        self.username.trim().chars().count() >= MIN_USERNAME_LEN
            && self.password.trim().chars().count() >= MIN_PASSWORD_LEN
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.trim(), self.password.trim())
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }

    pub fn push(&mut self, c: char) {
        self.current_mut().push(c);
    }

    pub fn pop(&mut self) {
        self.current_mut().pop();
    }

    fn current_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArticleField {
    #[default]
    Title,
    Text,
    Topic,
}

/// What submitting the article form asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Create(NewArticle),
    Update(ArticleId, ArticleChanges),
}

/// The create/edit form. Mirrors the article under edit: when the selection
/// changes the fields are loaded from it, or reset when it goes away.
#[derive(Debug, Default)]
pub struct ArticleForm {
    pub title: String,
    pub text: String,
    pub topic: Option<usize>,
    pub field: ArticleField,
    loaded: Option<ArticleId>,
}

impl ArticleForm {
    pub fn editing(&self) -> Option<ArticleId> {
        self.loaded
    }

    pub fn topic_name(&self) -> Option<&'static str> {
        self.topic.and_then(|i| TOPICS.get(i).copied())
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.text.trim().is_empty() && self.topic.is_some()
    }

    pub fn sync(&mut self, editing: Option<&Article>) {
        let id = editing.map(|a| a.article_id);
        if id == self.loaded {
            return;
        }
        match editing {
            Some(article) => {
                self.title = article.title.clone();
                self.text = article.text.clone();
                self.topic = TOPICS.iter().position(|t| *t == article.topic);
            }
            None => self.clear_fields(),
        }
        self.loaded = id;
        self.field = ArticleField::Title;
    }

    /// Builds the request for the current values. A create clears the
    /// fields right away; an edit keeps them until the selection clears, so
    /// a rejected update leaves the user's changes in place.
    /// Returns None while the form is incomplete.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.is_submittable() {
            return None;
        }
        let article = NewArticle::new(
            self.title.trim(),
            self.text.trim(),
            self.topic_name().unwrap_or_default(),
        );
        Some(match self.loaded {
            Some(id) => Submission::Update(id, ArticleChanges::from(article)),
            None => {
                self.clear_fields();
                Submission::Create(article)
            }
        })
    }

    pub fn clear_fields(&mut self) {
        self.title.clear();
        self.text.clear();
        self.topic = None;
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            ArticleField::Title => ArticleField::Text,
            ArticleField::Text => ArticleField::Topic,
            ArticleField::Topic => ArticleField::Title,
        };
    }

    pub fn cycle_topic(&mut self, forward: bool) {
        let len = TOPICS.len();
        self.topic = Some(match (self.topic, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        });
    }

    pub fn push(&mut self, c: char) {
        match self.field {
            ArticleField::Title => self.title.push(c),
            ArticleField::Text => self.text.push(c),
            ArticleField::Topic => {}
        }
    }

    pub fn pop(&mut self) {
        match self.field {
            ArticleField::Title => {
                self.title.pop();
            }
            ArticleField::Text => {
                self.text.pop();
            }
            ArticleField::Topic => self.topic = None,
        }
    }
}

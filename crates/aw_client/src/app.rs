use crate::api::ArticlesApi;
use crate::backends::FileTokenStore;
use crate::config::ClientConfig;
use crate::session::{Session, SessionManager};
use crate::state::{AppState, RequestId, Route};
use aw_core::{
    ArticleChanges, ArticleId, ArticleResponse, ArticlesResponse, Credentials, Error,
    LoginResponse, MessageResponse, NewArticle, Result,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message shown after logging out of an existing session.
pub const GOODBYE: &str = "Goodbye!";

/// One network operation the view can trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Login(Credentials),
    FetchAll,
    Create(NewArticle),
    Update(ArticleId, ArticleChanges),
    Delete(ArticleId),
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Login(_) => "login",
            Request::FetchAll => "fetch articles",
            Request::Create(_) => "create article",
            Request::Update(..) => "update article",
            Request::Delete(_) => "delete article",
        }
    }
}

/// Successful server answer to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    LoggedIn(LoginResponse),
    Fetched(ArticlesResponse),
    Created(ArticleResponse),
    Updated(ArticleId, ArticleResponse),
    Deleted(ArticleId, MessageResponse),
}

/// Result of running a [`PendingCall`], to be handed back to [`App::complete`].
#[derive(Debug)]
pub struct Completion {
    pub id: RequestId,
    pub operation: &'static str,
    pub result: Result<Outcome>,
}

/// A prepared request, detached from the [`App`] so it can be awaited
/// elsewhere (for example on a spawned task).
#[derive(Debug)]
pub struct PendingCall {
    id: RequestId,
    api: ArticlesApi,
    session: Session,
    request: Request,
}

impl PendingCall {
    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Issues the single HTTP call for this request.
    pub async fn execute(self) -> Completion {
        let PendingCall {
            id,
            api,
            session,
            request,
        } = self;
        let operation = request.name();
        debug!("{} {} started", operation, id);

        let result = match request {
            Request::Login(credentials) => api.login(&credentials).await.map(Outcome::LoggedIn),
            Request::FetchAll => api.list(&session).await.map(Outcome::Fetched),
            Request::Create(article) => api.create(&session, &article).await.map(Outcome::Created),
            Request::Update(article_id, changes) => api
                .update(&session, article_id, &changes)
                .await
                .map(|response| Outcome::Updated(article_id, response)),
            Request::Delete(article_id) => api
                .delete(&session, article_id)
                .await
                .map(|response| Outcome::Deleted(article_id, response)),
        };

        Completion {
            id,
            operation,
            result,
        }
    }
}

/// Session, article store and view state, driven one request at a time or
/// through [`App::prepare`] / [`App::complete`] when requests overlap.
#[derive(Debug)]
pub struct App {
    api: ArticlesApi,
    session: SessionManager,
    state: AppState,
}

impl App {
    pub fn new(api: ArticlesApi, session: SessionManager) -> Self {
        let mut state = AppState::new();
        if session.is_authenticated() {
            state.navigate(Route::Articles);
        }
        Self {
            api,
            session,
            state,
        }
    }

    /// Builds the app from configuration, restoring a persisted session.
    pub async fn open(config: &ClientConfig) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new(config.token_path.clone()));
        let session = SessionManager::restore(store).await?;
        Ok(Self::new(ArticlesApi::from_config(config), session))
    }

    pub fn api(&self) -> &ArticlesApi {
        &self.api
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Switches screens. The articles screen needs a session; without one
    /// this lands on the login screen instead.
    pub fn navigate(&mut self, route: Route) -> Route {
        let route = match route {
            Route::Articles if !self.is_authenticated() => Route::Login,
            route => route,
        };
        self.state.navigate(route);
        route
    }

    pub fn select_for_edit(&mut self, id: Option<ArticleId>) {
        self.state.select_for_edit(id);
    }

    /// Clears the message, marks the request busy and snapshots the session.
    pub fn prepare(&mut self, request: Request) -> PendingCall {
        let id = self.state.begin_request();
        PendingCall {
            id,
            api: self.api.clone(),
            session: self.session.session().clone(),
            request,
        }
    }

    /// Applies a finished request. On failure the message is cleared and the
    /// error handed back; the article list is left as it was.
    pub async fn complete(&mut self, completion: Completion) -> Result<()> {
        let Completion {
            id,
            operation,
            result,
        } = completion;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => return Err(self.fail(id, operation, e)),
        };

        match outcome {
            Outcome::LoggedIn(response) => {
                if let Err(e) = self.session.establish(response.token).await {
                    return Err(self.fail(id, operation, e));
                }
                if self.state.finish_request(id) {
                    self.state.set_message(response.message);
                }
                self.state.navigate(Route::Articles);
                info!("🔑 Logged in");
            }
            Outcome::Fetched(response) => {
                if self.state.finish_request(id) {
                    let count = response.articles.len();
                    self.state.articles_mut().replace_all(response.articles);
                    self.state.set_message(response.message);
                    info!("📰 Fetched {} articles", count);
                } else {
                    debug!("Ignoring stale article list from {}", id);
                }
            }
            Outcome::Created(response) => {
                let fresh = self.state.finish_request(id);
                let article_id = response.article.article_id;
                info!("🆕 Created article {}", article_id);
                // A newer fetch may already have listed it.
                if !fresh && self.state.articles().contains(article_id) {
                    debug!("Article {} already listed, skipping stale append", article_id);
                } else {
                    self.state.articles_mut().append(response.article);
                }
                if fresh {
                    self.state.set_message(response.message);
                }
            }
            Outcome::Updated(article_id, response) => {
                let fresh = self.state.finish_request(id);
                if !self.state.articles_mut().replace(article_id, response.article) {
                    debug!("Updated article {} is not in the local list", article_id);
                }
                self.state.select_for_edit(None);
                if fresh {
                    self.state.set_message(response.message);
                }
                info!("📝 Updated article {}", article_id);
            }
            Outcome::Deleted(article_id, response) => {
                let fresh = self.state.finish_request(id);
                self.state.articles_mut().remove(article_id);
                if fresh {
                    self.state.set_message(response.message);
                }
                info!("🗑️ Deleted article {}", article_id);
            }
        }
        Ok(())
    }

    fn fail(&mut self, id: RequestId, operation: &str, error: Error) -> Error {
        if self.state.finish_request(id) {
            self.state.clear_message();
        }
        warn!("⚠️ {} failed: {}", operation, error);
        error
    }

    /// Prepares, executes and completes `request` in one go.
    pub async fn run(&mut self, request: Request) -> Result<()> {
        let call = self.prepare(request);
        let completion = call.execute().await;
        self.complete(completion).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.run(Request::Login(Credentials::new(username, password)))
            .await
    }

    pub async fn fetch_all(&mut self) -> Result<()> {
        self.run(Request::FetchAll).await
    }

    pub async fn create(&mut self, article: NewArticle) -> Result<()> {
        self.run(Request::Create(article)).await
    }

    pub async fn update(&mut self, id: ArticleId, changes: ArticleChanges) -> Result<()> {
        self.run(Request::Update(id, changes)).await
    }

    pub async fn delete(&mut self, id: ArticleId) -> Result<()> {
        self.run(Request::Delete(id)).await
    }

    /// Forgets the session and returns to the login screen. The farewell
    /// message is only shown when there was a session to end.
    pub async fn logout(&mut self) -> Result<()> {
        let ended = self.session.end().await;
        self.state.navigate(Route::Login);
        match ended {
            Ok(true) => {
                self.state.set_message(GOODBYE);
                info!("👋 Logged out");
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                warn!("⚠️ logout failed to clear the stored token: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::MemoryTokenStore;
    use aw_core::{Article, TokenStore};
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn app_for(server: &MockServer, store: Arc<MemoryTokenStore>) -> App {
        let api = ArticlesApi::new(Url::parse(&server.uri()).unwrap());
        let session = SessionManager::restore(store).await.unwrap();
        App::new(api, session)
    }

    fn article_json(id: u64, title: &str) -> serde_json::Value {
        json!({ "article_id": id, "title": title, "text": "text", "topic": "React" })
    }

    async fn mount_list(server: &MockServer, articles: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "articles": articles, "message": "listed" })),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_login_success_stores_token_and_navigates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "token": "abc", "message": "welcome" })),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_for(&server, store.clone()).await;
        assert_eq!(app.state().route(), Route::Login);

        app.login("admin", "1234").await.unwrap();
        assert_eq!(app.state().message(), "welcome");
        assert_eq!(app.state().route(), Route::Articles);
        assert!(!app.state().is_busy());
        assert_eq!(store.load().await.unwrap().as_deref(), Some("abc"));
        assert_eq!(app.session().token(), Some("abc"));
    }

    #[tokio::test]
    async fn test_login_failure_leaves_session_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_for(&server, store.clone()).await;
        app.state.set_message("stale");

        let err = app.login("admin", "wrong").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(app.state().message(), "");
        assert_eq!(app.state().route(), Route::Login);
        assert!(!app.state().is_busy());
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_says_goodbye_only_with_a_token() {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryTokenStore::with_token("abc"));
        let mut app = app_for(&server, store.clone()).await;
        assert_eq!(app.state().route(), Route::Articles);

        app.logout().await.unwrap();
        assert_eq!(app.state().message(), GOODBYE);
        assert_eq!(app.state().route(), Route::Login);
        assert_eq!(store.load().await.unwrap(), None);

        app.state.set_message("untouched");
        app.logout().await.unwrap();
        assert_eq!(app.state().message(), "untouched");
        assert_eq!(app.state().route(), Route::Login);
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_collection_in_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(header("authorization", "abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [article_json(2, "b"), article_json(1, "a")],
                "message": "listed"
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.state
            .articles_mut()
            .replace_all(vec![Article::new(9, "old", "old", "Node")]);

        app.fetch_all().await.unwrap();
        let ids: Vec<u64> = app.state().articles().iter().map(|a| a.article_id.0).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(app.state().message(), "listed");
    }

    #[tokio::test]
    async fn test_fetch_all_empty_list() {
        let server = MockServer::start().await;
        mount_list(&server, json!([])).await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.fetch_all().await.unwrap();
        assert!(app.state().articles().is_empty());
        assert_eq!(app.state().message(), "listed");
    }

    #[tokio::test]
    async fn test_create_appends_server_article() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(1, "a")])).await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "article": article_json(5, "fresh"),
                "message": "created"
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.fetch_all().await.unwrap();
        app.create(NewArticle::new("fresh", "text", "React")).await.unwrap();

        let articles = app.state().articles();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles.as_slice().last().unwrap().article_id, ArticleId(5));
        assert_eq!(app.state().message(), "created");
    }

    #[tokio::test]
    async fn test_update_replaces_matching_article_and_clears_selection() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(1, "a"), article_json(2, "b")])).await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "article": article_json(2, "B"),
                "message": "updated"
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.fetch_all().await.unwrap();
        app.select_for_edit(Some(ArticleId(2)));
        app.update(ArticleId(2), ArticleChanges::default().with_title("B"))
            .await
            .unwrap();

        let titles: Vec<&str> = app.state().articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "B"]);
        assert_eq!(app.state().editing(), None);
        assert_eq!(app.state().message(), "updated");
    }

    #[tokio::test]
    async fn test_delete_removes_only_after_confirmation() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(1, "a"), article_json(2, "b")])).await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "deleted" })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles/2"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "not found" })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.fetch_all().await.unwrap();

        app.delete(ArticleId(1)).await.unwrap();
        assert_eq!(app.state().articles().len(), 1);
        assert!(!app.state().articles().contains(ArticleId(1)));
        assert_eq!(app.state().message(), "deleted");

        assert!(app.delete(ArticleId(2)).await.is_err());
        assert_eq!(app.state().articles().len(), 1);
        assert_eq!(app.state().message(), "");
        assert!(!app.state().is_busy());
    }

    #[tokio::test]
    async fn test_stale_fetch_does_not_clobber_newer_state() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(1, "stale")])).await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "article": article_json(7, "new"),
                "message": "created"
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        let fetch = app.prepare(Request::FetchAll);
        let create = app.prepare(Request::Create(NewArticle::new("new", "text", "React")));
        assert!(app.state().is_busy());

        let created = create.execute().await;
        app.complete(created).await.unwrap();
        assert!(app.state().is_busy());

        let fetched = fetch.execute().await;
        app.complete(fetched).await.unwrap();
        assert!(!app.state().is_busy());
        assert_eq!(app.state().message(), "created");
        let ids: Vec<u64> = app.state().articles().iter().map(|a| a.article_id.0).collect();
        assert_eq!(ids, vec![7]);
    }

    #[tokio::test]
    async fn test_stale_create_skips_article_already_fetched() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(7, "new")])).await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "article": article_json(7, "new"),
                "message": "created"
            })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        let create = app.prepare(Request::Create(NewArticle::new("new", "text", "React")));
        let fetch = app.prepare(Request::FetchAll);

        let fetched = fetch.execute().await;
        app.complete(fetched).await.unwrap();
        let created = create.execute().await;
        app.complete(created).await.unwrap();

        let ids: Vec<u64> = app.state().articles().iter().map(|a| a.article_id.0).collect();
        assert_eq!(ids, vec![7]);
        assert_eq!(app.state().message(), "listed");
        assert!(!app.state().is_busy());
    }

    #[tokio::test]
    async fn test_create_failure_leaves_collection_unchanged() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(1, "a")])).await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "title is required" })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.fetch_all().await.unwrap();

        let err = app.create(NewArticle::new("", "text", "React")).await.unwrap_err();
        assert_eq!(err.server_message(), Some("title is required"));
        let ids: Vec<u64> = app.state().articles().iter().map(|a| a.article_id.0).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(app.state().message(), "");
        assert!(!app.state().is_busy());
    }

    #[tokio::test]
    async fn test_update_failure_keeps_article_and_selection() {
        let server = MockServer::start().await;
        mount_list(&server, json!([article_json(1, "a"), article_json(2, "b")])).await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/2"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "message": "unknown topic" })))
            .mount(&server)
            .await;

        let mut app = app_for(&server, Arc::new(MemoryTokenStore::with_token("abc"))).await;
        app.fetch_all().await.unwrap();
        app.select_for_edit(Some(ArticleId(2)));

        let err = app
            .update(ArticleId(2), ArticleChanges::default().with_topic("Rust"))
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("unknown topic"));
        let titles: Vec<&str> = app.state().articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(app.state().editing(), Some(ArticleId(2)));
        assert_eq!(app.state().message(), "");
        assert!(!app.state().is_busy());
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl TokenStore for BrokenStore {
        async fn load(&self) -> Result<Option<String>> {
            Ok(Some("abc".to_string()))
        }

        async fn save(&self, _token: &str) -> Result<()> {
            Ok(())
        }

        async fn clear(&self) -> Result<Option<String>> {
            Err(Error::Storage("read-only token file".to_string()))
        }
    }

    #[tokio::test]
    async fn test_logout_reports_storage_failure() {
        let server = MockServer::start().await;
        let api = ArticlesApi::new(Url::parse(&server.uri()).unwrap());
        let session = SessionManager::restore(Arc::new(BrokenStore)).await.unwrap();
        let mut app = App::new(api, session);
        app.state.set_message("welcome");

        let err = app.logout().await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert_eq!(app.state().route(), Route::Login);
        assert_eq!(app.state().message(), "welcome");
        assert!(!app.is_authenticated());
    }

    #[test]
    fn test_navigate_requires_session() {
        let api = ArticlesApi::new(Url::parse("http://localhost:9000").unwrap());
        let mut app = App::new(api, SessionManager::new(Arc::new(MemoryTokenStore::new())));
        assert_eq!(app.navigate(Route::Articles), Route::Login);
        assert_eq!(app.state().route(), Route::Login);
    }
}

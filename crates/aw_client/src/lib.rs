//! Client side of the articles application: session handling, the local
//! article collection and the view state both are kept in.

pub mod api;
pub mod app;
pub mod backends;
pub mod collection;
pub mod config;
pub mod session;
pub mod state;

pub use api::ArticlesApi;
pub use app::{App, Completion, Outcome, PendingCall, Request};
pub use backends::{FileTokenStore, MemoryTokenStore};
pub use collection::ArticleCollection;
pub use config::ClientConfig;
pub use session::{Session, SessionManager};
pub use state::{AppState, RequestId, Route};

pub mod prelude {
    pub use super::{App, ArticlesApi, ClientConfig, Route, Session};
    pub use aw_core::{Article, ArticleChanges, ArticleId, Error, NewArticle, Result};
}

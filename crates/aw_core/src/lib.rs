pub mod error;
pub mod storage;
pub mod types;
pub mod wire;

pub use error::Error;
pub use storage::TokenStore;
pub use types::{Article, ArticleChanges, ArticleId, NewArticle, TOPICS};
pub use wire::{ArticleResponse, ArticlesResponse, Credentials, LoginResponse, MessageResponse};

pub type Result<T> = std::result::Result<T, Error>;

pub mod prelude {
    pub use crate::types::{Article, ArticleChanges, ArticleId, NewArticle};
    pub use crate::{Error, Result, TokenStore};
}

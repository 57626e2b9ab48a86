use crate::collection::ArticleCollection;
use aw_core::{Article, ArticleId};
use std::collections::BTreeSet;
use std::fmt;

/// Screen the view layer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Login,
    Articles,
}

/// Sequence number handed out when a request is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the view renders: the article list, the status message, the
/// busy indicator, the article under edit and the current screen.
///
/// Requests are tracked by id. The busy flag holds while any request is in
/// flight, and a completion that is older than one already applied is
/// reported stale so callers leave newer state alone.
#[derive(Debug, Default)]
pub struct AppState {
    route: Route,
    message: String,
    articles: ArticleCollection,
    editing: Option<ArticleId>,
    in_flight: BTreeSet<RequestId>,
    next_request: u64,
    newest_applied: Option<RequestId>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn navigate(&mut self, route: Route) {
        self.route = route;
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn clear_message(&mut self) {
        self.message.clear();
    }

    pub fn articles(&self) -> &ArticleCollection {
        &self.articles
    }

    pub(crate) fn articles_mut(&mut self) -> &mut ArticleCollection {
        &mut self.articles
    }

    pub fn editing(&self) -> Option<ArticleId> {
        self.editing
    }

    /// The article under edit, if it is still in the list.
    pub fn editing_article(&self) -> Option<&Article> {
        self.editing.and_then(|id| self.articles.get(id))
    }

    pub fn select_for_edit(&mut self, id: Option<ArticleId>) {
        self.editing = id;
    }

    pub fn is_busy(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Clears the message and marks a new request as outstanding.
    pub fn begin_request(&mut self) -> RequestId {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.message.clear();
        self.in_flight.insert(id);
        id
    }

    /// Marks `id` as done. Returns true when no later request has been
    /// finished yet, i.e. the completion may overwrite shared state.
    pub fn finish_request(&mut self, id: RequestId) -> bool {
        self.in_flight.remove(&id);
        let fresh = self.newest_applied.map_or(true, |newest| id > newest);
        if fresh {
            self.newest_applied = Some(id);
        }
        fresh
    }
}

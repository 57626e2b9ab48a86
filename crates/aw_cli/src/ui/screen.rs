use super::forms::{ArticleForm, LoginForm, Submission};
use aw_client::{AppState, Request, Route};
use aw_core::ArticleId;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Navigate(Route),
    Logout,
    Send(Request),
    Edit(Option<ArticleId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Form,
    List,
}

/// Input state of the terminal screens. Holds nothing the server owns.
#[derive(Debug, Default)]
pub struct Screen {
    pub login: LoginForm,
    pub form: ArticleForm,
    pub focus: Focus,
    pub selected: usize,
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings the form and the list cursor in line with the app state.
    pub fn sync(&mut self, state: &AppState) {
        self.form.sync(state.editing_article());
        let len = state.articles().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return Some(Action::Quit),
            KeyCode::Char('o') if ctrl => return Some(Action::Logout),
            KeyCode::F(1) => return Some(Action::Navigate(Route::Login)),
            KeyCode::F(2) => return Some(Action::Navigate(Route::Articles)),
            _ => {}
        }

        match state.route() {
            Route::Login => self.handle_login_key(key),
            Route::Articles => match self.focus {
                Focus::Form => self.handle_form_key(key, state),
                Focus::List => self.handle_list_key(key, state),
            },
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.next_field();
                None
            }
            KeyCode::Enter if self.login.is_submittable() => {
                Some(Action::Send(Request::Login(self.login.credentials())))
            }
            KeyCode::Backspace => {
                self.login.pop();
                None
            }
            KeyCode::Char(c) => {
                self.login.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Action> {
        use super::forms::ArticleField;

        match key.code {
            KeyCode::Tab => {
                if self.form.field == ArticleField::Topic {
                    self.form.field = ArticleField::Title;
                    self.focus = Focus::List;
                } else {
                    self.form.next_field();
                }
                None
            }
            KeyCode::F(5) => Some(Action::Send(Request::FetchAll)),
            KeyCode::Esc if state.editing().is_some() => Some(Action::Edit(None)),
            KeyCode::Enter => self.form.submit().map(|submission| match submission {
                Submission::Create(article) => Action::Send(Request::Create(article)),
                Submission::Update(id, changes) => Action::Send(Request::Update(id, changes)),
            }),
            KeyCode::Left if self.form.field == ArticleField::Topic => {
                self.form.cycle_topic(false);
                None
            }
            KeyCode::Right if self.form.field == ArticleField::Topic => {
                self.form.cycle_topic(true);
                None
            }
            KeyCode::Backspace => {
                self.form.pop();
                None
            }
            KeyCode::Char(c) => {
                self.form.push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Action> {
        let articles = state.articles().as_slice();
        let current = articles.get(self.selected).map(|a| a.article_id);
        // Row actions are off while an article is being edited.
        let locked = state.editing().is_some();

        match key.code {
            KeyCode::Tab => {
                self.focus = Focus::Form;
                None
            }
            KeyCode::F(5) | KeyCode::Char('r') => Some(Action::Send(Request::FetchAll)),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < articles.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Esc if locked => Some(Action::Edit(None)),
            KeyCode::Char('e') if !locked => current.map(|id| {
                self.focus = Focus::Form;
                Action::Edit(Some(id))
            }),
            KeyCode::Char('d') if !locked => current.map(|id| Action::Send(Request::Delete(id))),
            _ => None,
        }
    }
}

use super::forms::{ArticleField, LoginField};
use super::screen::{Focus, Screen};
use aw_client::{AppState, Route};
use aw_core::TOPICS;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw<B: Backend>(f: &mut Frame<B>, state: &AppState, screen: &Screen, tick: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    draw_nav(f, chunks[0], state);
    draw_status(f, chunks[1], state, tick);
    match state.route() {
        Route::Login => draw_login(f, chunks[2], state, screen),
        Route::Articles => draw_articles(f, chunks[2], state, screen),
    }
    draw_help(f, chunks[3], state, screen);
}

/// The busy overlay: the screen dims while requests are out, input stays live.
fn body_style(state: &AppState) -> Style {
    if state.is_busy() {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

fn draw_nav<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState) {
    let titles = ["Login", "Articles"]
        .iter()
        .map(|t| Spans::from(Span::raw(*t)))
        .collect();
    let selected = match state.route() {
        Route::Login => 0,
        Route::Articles => 1,
    };
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Advanced Web Applications"),
        )
        .select(selected)
        .style(body_style(state))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_status<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState, tick: usize) {
    let mut spans = Vec::new();
    if state.is_busy() {
        spans.push(Span::styled(
            format!("{} Please wait... ", SPINNER[tick % SPINNER.len()]),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::styled(
        state.message().to_string(),
        Style::default().fg(Color::Green),
    ));
    f.render_widget(Paragraph::new(Spans::from(spans)), area);
}

fn field_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn input<'a>(title: &'a str, value: String, active: bool) -> Paragraph<'a> {
    Paragraph::new(value).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(field_style(active)),
    )
}

fn draw_login<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let form = &screen.login;
    let on_username = form.field == LoginField::Username;
    f.render_widget(
        input("Username", form.username.clone(), on_username).style(body_style(state)),
        chunks[0],
    );
    f.render_widget(
        input("Password", "*".repeat(form.password.chars().count()), !on_username)
            .style(body_style(state)),
        chunks[1],
    );

    let submit = if form.is_submittable() {
        Span::styled("[ Submit credentials ]", Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[ Submit credentials ]", Style::default().fg(Color::DarkGray))
    };
    f.render_widget(Paragraph::new(Spans::from(submit)), chunks[2]);

    let (chunk, text) = if on_username {
        (chunks[0], &form.username)
    } else {
        (chunks[1], &form.password)
    };
    f.set_cursor(chunk.x + 1 + text.chars().count() as u16, chunk.y + 1);
}

fn draw_articles<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState, screen: &Screen) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(area);

    draw_article_form(f, chunks[0], state, screen);
    draw_article_list(f, chunks[1], state, screen);
}

fn draw_article_form<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState, screen: &Screen) {
    let form = &screen.form;
    let title = match form.editing() {
        Some(id) => format!("Edit article {}", id),
        None => "Create article".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(field_style(screen.focus == Focus::Form));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(inner);

    let active = |field| screen.focus == Focus::Form && form.field == field;
    f.render_widget(
        input("Title", form.title.clone(), active(ArticleField::Title)).style(body_style(state)),
        chunks[0],
    );
    f.render_widget(
        input("Text", form.text.clone(), active(ArticleField::Text))
            .wrap(Wrap { trim: false })
            .style(body_style(state)),
        chunks[1],
    );

    let topics: Vec<Span> = TOPICS
        .iter()
        .enumerate()
        .map(|(i, topic)| {
            if form.topic == Some(i) {
                Span::styled(format!(" ({}) ", topic), Style::default().add_modifier(Modifier::BOLD))
            } else {
                Span::raw(format!("  {}  ", topic))
            }
        })
        .collect();
    f.render_widget(
        Paragraph::new(Spans::from(topics))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Topic (←/→)")
                    .border_style(field_style(active(ArticleField::Topic))),
            )
            .style(body_style(state)),
        chunks[2],
    );

    let mut buttons = vec![if form.is_submittable() {
        Span::styled("[ Submit ]", Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[ Submit ]", Style::default().fg(Color::DarkGray))
    }];
    if form.editing().is_some() {
        buttons.push(Span::raw("  [ Esc: Cancel edit ]"));
    }
    f.render_widget(Paragraph::new(Spans::from(buttons)), chunks[3]);
}

fn draw_article_list<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState, screen: &Screen) {
    let locked = state.editing().is_some();
    let items: Vec<ListItem> = state
        .articles()
        .iter()
        .map(|article| {
            let header = Spans::from(vec![
                Span::styled(article.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  [{}]", article.topic)),
            ]);
            let body = Spans::from(Span::raw(article.text.clone()));
            ListItem::new(vec![header, body])
        })
        .collect();

    let title = if items.is_empty() {
        "Articles (no articles yet)".to_string()
    } else {
        format!("Articles ({})", items.len())
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(field_style(screen.focus == Focus::List)),
        )
        .style(if locked {
            body_style(state).fg(Color::DarkGray)
        } else {
            body_style(state)
        })
        .highlight_symbol("> ")
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if !state.articles().is_empty() {
        list_state.select(Some(screen.selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_help<B: Backend>(f: &mut Frame<B>, area: Rect, state: &AppState, screen: &Screen) {
    let help = match (state.route(), screen.focus) {
        (Route::Login, _) => "Tab: next field  Enter: log in  F2: articles  Ctrl+C: quit",
        (Route::Articles, Focus::Form) => {
            "Tab: next field  Enter: submit  F5: refresh  F1: login  Ctrl+O: logout  Ctrl+C: quit"
        }
        (Route::Articles, Focus::List) => {
            "↑/↓: select  e: edit  d: delete  r: refresh  Tab: form  Ctrl+O: logout  Ctrl+C: quit"
        }
    };
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
        area,
    );
}

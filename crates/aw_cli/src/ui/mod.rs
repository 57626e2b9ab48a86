//! Terminal front-end: login screen, article form and article list.

mod forms;
mod screen;
mod view;

use anyhow::Result;
use aw_client::{App, Completion, Request, Route};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use screen::{Action, Screen};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error};
use tui::backend::CrosstermBackend;
use tui::Terminal;

type Term = Terminal<CrosstermBackend<Stdout>>;

enum UiEvent {
    Key(KeyEvent),
    Redraw,
}

/// Puts the terminal back however the loop ends.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
            error!("Failed to leave alternate screen: {}", e);
        }
    }
}

pub async fn run(app: App) -> Result<()> {
    enable_raw_mode()?;
    let guard = TerminalGuard;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let result = event_loop(&mut terminal, app).await;
    terminal.show_cursor()?;
    drop(guard);
    result
}

fn spawn_input_reader(tx: mpsc::UnboundedSender<UiEvent>) {
    std::thread::spawn(move || loop {
        let forwarded = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => tx.send(UiEvent::Key(key)),
            Ok(Event::Resize(..)) => tx.send(UiEvent::Redraw),
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to read terminal event: {}", e);
                break;
            }
        };
        if forwarded.is_err() {
            break;
        }
    });
}

async fn event_loop(terminal: &mut Term, mut app: App) -> Result<()> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();
    spawn_input_reader(input_tx);

    let mut screen = Screen::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(120));
    let mut tick = 0usize;

    if app.state().route() == Route::Articles {
        send(&mut app, Request::FetchAll, &done_tx);
    }

    loop {
        screen.sync(app.state());
        terminal.draw(|f| view::draw(f, app.state(), &screen, tick))?;

        tokio::select! {
            event = input_rx.recv() => match event {
                Some(UiEvent::Key(key)) => {
                    if let Some(action) = screen.handle_key(key, app.state()) {
                        if !dispatch(&mut app, action, &done_tx).await {
                            break;
                        }
                    }
                }
                Some(UiEvent::Redraw) => {}
                None => break,
            },
            Some(completion) = done_rx.recv() => {
                let before = app.state().route();
                // Failures are logged by the app and shown as a cleared message.
                let _ = app.complete(completion).await;
                if before == Route::Login && app.state().route() == Route::Articles {
                    send(&mut app, Request::FetchAll, &done_tx);
                }
            }
            _ = ticker.tick() => {
                if app.state().is_busy() {
                    tick = tick.wrapping_add(1);
                }
            }
        }
    }

    Ok(())
}

/// Handles one action. Returns false when the interface should close.
async fn dispatch(app: &mut App, action: Action, done_tx: &mpsc::UnboundedSender<Completion>) -> bool {
    match action {
        Action::Quit => return false,
        Action::Navigate(route) => {
            if app.navigate(route) == Route::Articles {
                send(app, Request::FetchAll, done_tx);
            }
        }
        Action::Logout => {
            if let Err(e) = app.logout().await {
                error!("Logout could not clear the saved session: {}", e);
            }
        }
        Action::Edit(id) => app.select_for_edit(id),
        Action::Send(request) => send(app, request, done_tx),
    }
    true
}

/// Starts `request` on its own task; the completion comes back through
/// `done_tx` and is applied by the event loop.
fn send(app: &mut App, request: Request, done_tx: &mpsc::UnboundedSender<Completion>) {
    let call = app.prepare(request);
    debug!("Dispatching {} {}", call.request().name(), call.id());
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let completion = call.execute().await;
        let _ = done_tx.send(completion);
    });
}

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomo_ipc::Phase;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

mod alerts;
mod app;
mod config;
mod ipc;
mod persistence;
mod session;
mod timer;
mod ui;

use alerts::{Chime, Notifier};
use app::{App, AppMode};
use persistence::Store;
use session::SessionEvent;
use timer::TimerSession;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    info!("starting pomo");

    let config = config::load_config()?;
    let store = Store::open()?;
    let settings = store.load_settings();
    let stats = store.load_stats();
    let goals = store.load_goals();

    let session = TimerSession::new(settings);
    session.update_stats(stats).await;

    tokio::spawn(ipc::server::serve(session.clone()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(config, session.snapshot().await, goals);
    let res = run_app(&mut terminal, app, &session, &store).await;

    session.shutdown().await;
    info!("shutting down");

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Logs go to a file in the data dir; the terminal belongs to the TUI.
/// `POMO_LOG` takes the usual filter directives.
fn init_logging() -> Result<()> {
    let proj_dirs = directories::ProjectDirs::from("com", "pomo", "pomo")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let dir = proj_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("pomo.log"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("POMO_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    session: &TimerSession,
    store: &Store,
) -> Result<()> {
    let notifier = Notifier::new(&app.config.alerts);
    let chime = Chime::new(&app.config.alerts);
    let mut events = session.subscribe();
    let mut input = spawn_input_thread();
    let mut redraw = tokio::time::interval(std::time::Duration::from_millis(250));

    loop {
        terminal.draw(|f| ui::draw(f, &app))?;

        tokio::select! {
            Some(event) = input.recv() => {
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        handle_key(key.code, &mut app, session).await;
                    }
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    handle_session_event(event, &mut app, session, store, &notifier, &chime)
                        .await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "event stream lagged, resyncing from snapshot");
                    app.snapshot = session.snapshot().await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = redraw.tick() => {}
        }

        if app.goals_dirty {
            if let Err(err) = store.save_goals(&app.goals) {
                warn!(error = %err, "failed to persist goals");
            }
            app.goals_dirty = false;
        }
        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Crossterm reads block, so they live on their own thread and feed the
/// async loop through a channel. The thread exits once the receiver drops.
fn spawn_input_thread() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        match event::poll(std::time::Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
    rx
}

async fn handle_key(code: KeyCode, app: &mut App, session: &TimerSession) {
    match app.mode {
        AppMode::Normal => match code {
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char(' ') => {
                if app.snapshot.phase == Phase::Running {
                    session.pause().await;
                } else {
                    session.start().await;
                }
            }
            KeyCode::Char('s') => session.skip().await,
            KeyCode::Char('r') => session.reset().await,
            KeyCode::Char('R') => session.reset_cycle().await,
            KeyCode::Char('c') => session.clear_stats().await,
            KeyCode::Char('a') => {
                app.mode = AppMode::AddingGoal;
                app.input_buffer.clear();
            }
            KeyCode::Char('d') => app.delete_selected_goal(),
            KeyCode::Char('x') => app.toggle_selected_goal(),
            KeyCode::Char('?') => app.mode = AppMode::ShowHelp,
            KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
            KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
            _ => {}
        },
        AppMode::AddingGoal => match code {
            KeyCode::Esc => {
                app.mode = AppMode::Normal;
                app.input_buffer.clear();
            }
            KeyCode::Enter => app.handle_char('\n'),
            KeyCode::Backspace => app.handle_backspace(),
            KeyCode::Char(c) => app.handle_char(c),
            _ => {}
        },
        AppMode::ShowHelp => match code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => app.mode = AppMode::Normal,
            _ => {}
        },
    }
}

/// Persistence and alert failures are logged, never fatal; the session
/// machine has already moved on by the time we see the event.
async fn handle_session_event(
    event: SessionEvent,
    app: &mut App,
    session: &TimerSession,
    store: &Store,
    notifier: &Notifier,
    chime: &Chime,
) {
    match &event {
        SessionEvent::SessionCompleted { previous, next, .. } => {
            notifier.session_completed(*previous, *next);
            chime.ring();
            app.trigger_flash();
            save_stats(store, &session.stats().await);
        }
        SessionEvent::SessionSkipped { previous, next, .. } => {
            notifier.session_skipped(*previous, *next);
            app.trigger_flash();
            save_stats(store, &session.stats().await);
        }
        SessionEvent::CycleReset { .. } => {
            notifier.cycle_reset();
            save_stats(store, &session.stats().await);
        }
        SessionEvent::StatsCleared(stats) => {
            notifier.stats_cleared();
            save_stats(store, stats);
        }
        SessionEvent::SettingsUpdated(settings) => {
            if let Err(err) = store.save_settings(settings) {
                warn!(error = %err, "failed to persist settings");
            }
        }
        _ => {}
    }
    app.snapshot = session.snapshot().await;
}

fn save_stats(store: &Store, stats: &pomo_ipc::StatsSnapshot) {
    if let Err(err) = store.save_stats(stats) {
        warn!(error = %err, "failed to persist stats");
    }
}

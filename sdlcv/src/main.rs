//! sdlcv: SDLC verification workflow TUI.
//!
//! Entry point for the `sdlcv` binary. Wires together the terminal lifecycle
//! (`tui`), unified event bus (`event`), the view layer (`ui`), the theme
//! system (`theme`), the backend dispatcher (`backend`), and the WAL-mode
//! SQLite session store (`sdlcv-core`).
//!
//! # Startup sequence (order matters)
//!
//! 1. Load config from XDG config, read-only, safe before terminal init.
//! 2. `install_panic_hook()`, installed first so it is the innermost hook.
//!    Restores the terminal before the panic message prints.
//! 3. `register_sigterm()` returns an `Arc<AtomicBool>` polled in the event loop.
//! 4. Create `.sdlcv/`, point tracing at `.sdlcv/sdlcv.log` (the TUI owns
//!    stderr, so logs must go to a file), open the session DB, and load any
//!    persisted session before the first frame.
//! 5. `init_tui()` enters the alternate screen and enables raw mode.
//! 6. Create the event and backend channels and spawn both background tasks.
//!
//! # Safety
//!
//! `restore_tui()` is called after the event loop exits (normal quit, SIGTERM,
//! or channel close). The event loop itself only exits via `break`, so draw
//! errors propagate out of the loop and still reach `restore_tui()`. The
//! panic hook covers unexpected panics.

mod app;
mod backend;
mod chat;
mod event;
mod review;
mod session;
mod theme;
mod tui;
mod ui;
mod workflow;

use std::sync::atomic::Ordering;
use std::sync::Mutex;

use tracing::warn;

use crate::app::SessionEffect;
use crate::ui::keybindings::{handle_key, KeyAction};

/// Configuration loaded from `~/.config/sdlcv/config.toml`.
struct Config {
    theme: String,
    backend_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            backend_url: "http://localhost:8000".to_owned(),
        }
    }
}

/// Returns the path to the sdlcv config file.
///
/// Prefers `$XDG_CONFIG_HOME/sdlcv/config.toml`; falls back to
/// `~/.config/sdlcv/config.toml` when the env var is absent.
fn config_path() -> std::path::PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| std::path::PathBuf::from(h).join(".config"))
        })
        .unwrap_or_else(|| std::path::PathBuf::from(".config"));
    base.join("sdlcv").join("config.toml")
}

/// Loads the config file, falling back to defaults for anything missing.
///
/// Never panics: config errors are soft failures printed to stderr before the
/// terminal is taken over.
fn load_config() -> Config {
    let path = config_path();
    let raw = match std::fs::read_to_string(&path) {
        Ok(s) => s,
        Err(_) => return Config::default(),
    };
    let table: toml::Table = match toml::from_str(&raw) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("sdlcv: config parse error in {:?}: {}", path, e);
            return Config::default();
        }
    };
    let defaults = Config::default();
    Config {
        theme: table
            .get("theme")
            .and_then(|v| v.as_str())
            .unwrap_or(&defaults.theme)
            .to_owned(),
        backend_url: table
            .get("backend_url")
            .and_then(|v| v.as_str())
            .unwrap_or(&defaults.backend_url)
            .to_owned(),
    }
}

/// Points tracing at `.sdlcv/sdlcv.log`.
///
/// The TUI owns stderr, so logs must not go there. A failure to open the log
/// file disables logging rather than aborting startup.
fn init_logging() {
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(".sdlcv/sdlcv.log")
    {
        Ok(f) => f,
        Err(_) => return,
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 0: load config, read-only, safe before terminal init.
    let config = load_config();
    let theme = theme::Theme::from_name(&config.theme);

    // Step 1: panic hook installed first; innermost hook restores the terminal.
    tui::install_panic_hook();

    // Step 2: SIGTERM flag, polled in the 50ms heartbeat arm below.
    let term_flag = tui::register_sigterm();

    // Step 3: working directory, logging, and the session store, all before
    // the first frame so there is no loading state to manage.
    std::fs::create_dir_all(".sdlcv")?;
    init_logging();
    let conn = sdlcv_core::db::open_db(".sdlcv/session.db")
        .await
        .map_err(std::io::Error::other)?;
    let restored = sdlcv_core::db::load_session(&conn)
        .await
        .map_err(std::io::Error::other)?;

    // Step 4: enter alternate screen and raw mode.
    let mut terminal = tui::init_tui()?;

    // Step 5: event channel plus the backend dispatcher.
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let (backend_tx, backend_rx) = tokio::sync::mpsc::unbounded_channel();
    let client = backend::client::BackendClient::new(config.backend_url);
    backend::task::spawn_backend_task(client, backend_rx, handler.tx.clone());

    let mut state = app::AppState::new(backend_tx, restored);

    // Event loop. Exits only via `break`, never via `?`, which guarantees
    // `restore_tui()` is always reached after the loop.
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: guarantees SIGTERM is checked at least every 50ms,
            // even when no crossterm/tick/render events arrive. Without this
            // arm, a quiescent terminal blocks forever in rx.recv() and the
            // SIGTERM flag is never polled.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(event::AppEvent::Render) => {
                        // Exactly one draw() call per Render event, never elsewhere.
                        terminal.draw(|frame| ui::render(frame, &mut state, &theme))?;
                    }
                    Some(event::AppEvent::Key(key)) => {
                        match handle_key(key, &mut state) {
                            KeyAction::Quit => break 'event_loop,
                            KeyAction::SignOut => {
                                let conn = conn.clone();
                                tokio::spawn(async move {
                                    if let Err(err) = sdlcv_core::db::clear_session(&conn).await {
                                        warn!(%err, "failed to clear persisted session");
                                    }
                                });
                            }
                            KeyAction::Continue => {}
                        }
                    }
                    Some(event::AppEvent::Backend(result)) => {
                        if let Some(SessionEffect::Persist(session)) = state.apply_backend(*result) {
                            let conn = conn.clone();
                            tokio::spawn(async move {
                                if let Err(err) = sdlcv_core::db::save_session(&conn, session).await {
                                    warn!(%err, "failed to persist session");
                                }
                            });
                        }
                    }
                    Some(event::AppEvent::Resize(_, _)) => {
                        // Handled automatically by ratatui on the next Render:
                        // frame.area() returns the new terminal size.
                    }
                    Some(event::AppEvent::Tick) => {}
                    None => break 'event_loop,
                }
                // Check SIGTERM after every event too, not just on the heartbeat,
                // so quit latency is at most one event cycle rather than 50ms.
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }

    // Restore the terminal at the single exit point of the loop. Covers
    // normal quit, SIGTERM, and channel close; the panic hook handles the
    // panic path separately.
    tui::restore_tui()?;
    Ok(())
}

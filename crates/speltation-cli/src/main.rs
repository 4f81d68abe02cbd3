//! `speltation`: terminal client for the news-publishing service.
//!
//! # Usage
//!
//! ```
//! speltation --base-url http://localhost:8080
//! speltation --config ~/.config/speltation/config.toml --log-file /tmp/speltation.log
//! ```

mod app;
mod form;
mod ui;

use std::{
  fs::OpenOptions,
  io::{self, Write},
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use speltation_core::{
  remote::NewsRemote,
  session::Session,
  slot::{MemorySlot, SessionSlot},
};
use speltation_http::{HttpRemote, RemoteConfig};
use speltation_store_sqlite::SqliteSlot;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "speltation", version, about = "Terminal client for the Speltation news service")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Serve all three endpoints from `<URL>/auth`, `<URL>/news`, `<URL>/users`.
  #[arg(long, env = "SPELTATION_URL")]
  base_url: Option<String>,

  #[arg(long, env = "SPELTATION_AUTH_URL")]
  auth_url: Option<String>,

  #[arg(long, env = "SPELTATION_NEWS_URL")]
  news_url: Option<String>,

  #[arg(long, env = "SPELTATION_USERS_URL")]
  users_url: Option<String>,

  /// Request timeout in seconds.
  #[arg(long)]
  timeout: Option<u64>,

  /// SQLite file holding the signed-in user between runs.
  #[arg(long, env = "SPELTATION_STATE", value_name = "FILE")]
  state: Option<PathBuf>,

  /// Keep the session in memory only; nothing is written to disk.
  #[arg(long)]
  ephemeral: bool,

  /// Write logs here. Without it nothing is logged.
  #[arg(long, env = "SPELTATION_LOG", value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct ConfigFile {
  base_url:     Option<String>,
  auth_url:     Option<String>,
  news_url:     Option<String>,
  users_url:    Option<String>,
  timeout_secs: Option<u64>,
  state_path:   Option<PathBuf>,
  log_file:     Option<PathBuf>,
}

/// Fully resolved settings: flags over config file over defaults.
#[derive(Debug)]
struct Settings {
  remote:   RemoteConfig,
  state:    Option<PathBuf>,
  log_file: Option<PathBuf>,
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).context("parsing config file")
}

fn default_state_path() -> Option<PathBuf> {
  std::env::var_os("HOME")
    .map(|home| PathBuf::from(home).join(".local/share/speltation/state.db"))
}

fn resolve(args: Args, file: ConfigFile) -> Settings {
  let base = args
    .base_url
    .or(file.base_url)
    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
  let mut remote = RemoteConfig::under(&base);
  if let Some(url) = args.auth_url.or(file.auth_url) {
    remote.auth_url = url;
  }
  if let Some(url) = args.news_url.or(file.news_url) {
    remote.news_url = url;
  }
  if let Some(url) = args.users_url.or(file.users_url) {
    remote.users_url = url;
  }
  if let Some(secs) = args.timeout.or(file.timeout_secs) {
    remote.timeout = Duration::from_secs(secs);
  }

  let state = if args.ephemeral {
    None
  } else {
    args.state.or(file.state_path).or_else(default_state_path)
  };

  Settings {
    remote,
    state,
    log_file: args.log_file.or(file.log_file),
  }
}

// ─── Logging ──────────────────────────────────────────────────────────────────

/// The terminal belongs to the TUI, so logs only go to a file.
fn init_logging(path: Option<&Path>) -> Result<()> {
  let Some(path) = path else {
    return Ok(());
  };
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg = match &args.config {
    Some(path) => load_config_file(path)?,
    None => ConfigFile::default(),
  };
  let settings = resolve(args, file_cfg);
  init_logging(settings.log_file.as_deref())?;
  tracing::info!(?settings, "starting");

  let remote = HttpRemote::new(settings.remote).context("building HTTP client")?;

  match &settings.state {
    Some(path) => {
      let slot = SqliteSlot::open(path)
        .await
        .with_context(|| format!("opening state file {}", path.display()))?;
      run(Session::new(remote, slot)).await
    }
    None => run(Session::new(remote, MemorySlot::default())).await,
  }
}

async fn run<R, S>(session: Session<R, S>) -> Result<()>
where
  R: NewsRemote,
  S: SessionSlot,
{
  let mut app = App::new(session);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Restore the session and load both lists; failures become notices.
  app.start().await;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<R, S>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<R, S>,
) -> Result<()>
where
  R: NewsRemote,
  S: SessionSlot,
{
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    if app.take_bell() {
      let backend = terminal.backend_mut();
      backend.write_all(b"\x07").ok();
      backend.flush().ok();
    }

    // Poll for an event, yielding control to tokio while waiting. The short
    // timeout also lets expired notices disappear.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(100))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind != KeyEventKind::Release => {
        if !app.handle_key(key).await {
          break;
        }
      }
      // Resize and everything else: redraw on the next iteration.
      _ => {}
    }
  }

  Ok(())
}

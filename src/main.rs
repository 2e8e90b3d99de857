//! memescroll — a terminal meme viewer with multi-source fallback.
//!
//! ## Architecture overview
//!
//! ```text
//!                  refresh     ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//!   input.rs ────► app.rs ───► │  poll.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//!                              │ (thread) │  (channel) │ (state)  │          │ (render) │
//!                              └──────────┘            └──────────┘          └──────────┘
//!                                   │
//!                                   ▼
//!                  fetcher.rs ─► transport.rs ─► source/ (normalize)
//! ```
//!
//! * **`source/`** — source descriptors, the `MemeResult` type, and one
//!   normalizer per response shape.
//! * **`fetcher`** — the fallback chain: try each source, return the first
//!   meme or the placeholder.
//! * **`transport`** — the HTTP seam (`reqwest` in production).
//! * **`observer`** — fetch diagnostics, forwarded to `tracing`.
//! * **`poll`** — background thread that runs fetches on request.
//! * **`app`** / **`ui`** / **`input`** — state, rendering, keybindings.
//! * **`main`** — wires everything together: parse args, load config, set up
//!   logging and the terminal, and run the event loop.

mod app;
mod cli;
mod config;
mod error;
mod fetcher;
mod input;
mod observer;
mod poll;
mod source;
mod transport;
mod ui;

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use config::Config;
use fetcher::MemeFetcher;
use transport::ReqwestTransport;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logs go to stderr in `--once` mode.  While the TUI owns the screen they
/// go to `--log-file`, or nowhere.
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("memescroll=info"));

    if cli.once {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    // -- configure data sources ----------------------------------------------
    let config = cli.resolve_config()?;

    let mut fetcher = MemeFetcher::new(ReqwestTransport::new()?);

    if cli.once {
        let meme = fetcher.fetch(&config.sources, config.timeout());
        println!("{}", serde_json::to_string_pretty(&meme)?);
        return Ok(());
    }

    info!(sources = config.sources.len(), "starting TUI");
    run_tui(fetcher, &config)
}

fn run_tui(fetcher: MemeFetcher<ReqwestTransport>, config: &Config) -> Result<()> {
    install_panic_hook();

    // -- start background fetching -------------------------------------------
    let poller = poll::spawn(
        fetcher,
        config.sources.clone(),
        config.timeout(),
        config.refresh_interval(),
    );

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new();

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the poller.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    //   4. Forward refresh requests to the poller.
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = poller.results.try_recv() {
            app.handle_poll_msg(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.take_refresh_request() && !poller.request_refresh() {
            app.status = "Fetch thread stopped".into();
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}

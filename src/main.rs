//! user-admin-tui binary entry point.
//!
//! Parses the CLI, initializes the terminal in raw mode, runs the TUI event
//! loop, and restores the terminal state on exit.

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use user_admin_tui::app::{self, Config};
use user_admin_tui::error::Result;

/// Terminal client for a user-management REST API.
#[derive(Parser, Debug)]
#[command(name = "user-admin-tui", version, about)]
struct Cli {
    /// Base URL of the users collection endpoint.
    #[arg(
        long,
        env = "USER_ADMIN_API_URL",
        default_value = "http://localhost:8080/api/users"
    )]
    api_url: String,

    /// Theme configuration file.
    #[arg(long, default_value = "theme.conf")]
    theme: String,

    /// Keybinding configuration file.
    #[arg(long, default_value = "keybinds.conf")]
    keybinds: String,

    /// Append tracing logs to this file; the terminal itself belongs to the TUI.
    #[arg(long, env = "USER_ADMIN_LOG")]
    log_file: Option<std::path::PathBuf>,
}

fn init_logging(path: &std::path::Path) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let cfg = Config {
        api_url: cli.api_url.clone(),
        theme_path: cli.theme.clone(),
        keybinds_path: cli.keybinds.clone(),
    };

    let mut terminal = init_terminal().map_err(|e| format!("init terminal: {}", e))?;

    let res = app::run(&mut terminal, &cfg);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}

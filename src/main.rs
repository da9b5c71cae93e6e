//! Terminal lifecycle, event loop, and cleanup for the palette host.

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use cmdk_palette::app::App;
use cmdk_palette::backend::CatalogueClient;
use cmdk_palette::events::{key_to_action, TICK_RATE};
use cmdk_palette::offload::BackgroundRanker;
use cmdk_palette::{Catalogue, CatalogueFile, Command, Group, PaletteConfig};

#[derive(Parser, Debug)]
#[command(version, about = "Keyboard-driven command palette")]
struct Args {
    /// Catalogue JSON file (commands, groups, recentCommandIds, config).
    #[arg(long, conflicts_with = "url")]
    catalogue: Option<PathBuf>,
    /// Base URL serving the catalogue at GET /palette.
    #[arg(long, env = "CMDK_PALETTE_URL")]
    url: Option<String>,
    /// Write logs here instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let (catalogue, recents, config) = load_catalogue(&args)?;
    info!(commands = catalogue.len(), groups = catalogue.groups().len(), "catalogue loaded");

    let runtime = tokio::runtime::Runtime::new().context("starting ranking runtime")?;
    let mut app = App::new(catalogue, recents, config)
        .with_background_ranker(BackgroundRanker::new(runtime.handle().clone()));

    // Set up the terminal in raw / alternate-screen mode.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, DisableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.show_cursor()?;

    let result = run_loop(&mut terminal, &mut app);

    // Always restore the terminal, even on error.
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result
}

fn init_logging(log_file: Option<&std::path::Path>) -> Result<()> {
    // RUST_LOG replaces the default filter; the TUI owns stdout.
    let (writer, default_level) = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), "cmdk_palette=info")
        }
        None => (BoxMakeWriter::new(io::stderr), "cmdk_palette=warn"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_ansi(log_file.is_none())
        .with_writer(writer)
        .init();
    Ok(())
}

fn load_catalogue(args: &Args) -> Result<(Arc<Catalogue>, Vec<String>, PaletteConfig)> {
    if let Some(path) = &args.catalogue {
        let file = CatalogueFile::read(path)
            .with_context(|| format!("loading catalogue from {}", path.display()))?;
        return Ok(file.into_parts());
    }
    if let Some(url) = &args.url {
        let file = CatalogueClient::new(url.as_str())?
            .fetch()
            .with_context(|| format!("fetching catalogue from {url}"))?;
        return Ok(file.into_parts());
    }
    Ok(demo_catalogue().into_parts())
}

fn demo_catalogue() -> CatalogueFile {
    CatalogueFile {
        config: PaletteConfig::default(),
        groups: vec![
            Group::new("file", "File"),
            Group::new("view", "View"),
            Group::new("help", "Help"),
        ],
        commands: vec![
            Command::new("file.new", "New File")
                .with_group("file")
                .with_shortcut(&["Ctrl", "N"])
                .with_keywords(&["create"]),
            Command::new("file.open", "Open File...")
                .with_group("file")
                .with_shortcut(&["Ctrl", "O"])
                .with_description("Browse the workspace"),
            Command::new("file.save", "Save")
                .with_group("file")
                .with_shortcut(&["Ctrl", "S"]),
            Command::new("file.print", "Print")
                .with_group("file")
                .with_description("No printer configured")
                .disabled(),
            Command::new("view.theme", "Toggle Theme")
                .with_group("view")
                .with_keywords(&["dark", "light", "appearance"]),
            Command::new("view.sidebar", "Toggle Sidebar")
                .with_group("view")
                .with_shortcut(&["Ctrl", "B"]),
            Command::new("view.zoom-in", "Zoom In")
                .with_group("view")
                .with_shortcut(&["Ctrl", "+"]),
            Command::new("help.docs", "Open Documentation")
                .with_group("help")
                .with_keywords(&["manual", "guide"]),
            Command::new("help.about", "About").with_group("help"),
            Command::new("window.reload", "Reload Window").with_keywords(&["refresh", "restart"]),
        ],
        recent_command_ids: Vec::new(),
    }
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick = app.tick.wrapping_add(1);
        app.poll_results();

        if app.should_quit {
            return Ok(());
        }

        let tick = app.tick;
        terminal.draw(|frame| cmdk_palette::ui::render(frame, app, tick))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if let Some(action) = key_to_action(&key, app.palette.is_open()) {
                    app.dispatch(action);
                    if app.should_quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

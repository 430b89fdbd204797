mod animation;
mod app;
mod config;
mod content;
mod context;
mod error;
mod event;
mod gesture;
mod media;
mod projection;
mod ui;

use std::io;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::app::App;
use crate::config::{CliArgs, Command, Config};
use crate::content::{Catalog, ProjectSource};
use crate::error::FolioError;
use crate::event::{is_hover_motion, Event, EventHandler};
use crate::media::MediaResolver;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        print!("{}", config::default_config_toml());
        return Ok(());
    }

    install_panic_hook();

    let config = config::load(&cli)?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = init_logging(&cli, &config);

    info!("folio starting");

    let catalog = Catalog::load(&config.general.content_path)
        .await
        .wrap_err_with(|| {
            format!(
                "Failed to load projects from {}",
                config.general.content_path.display()
            )
        })?;
    let catalog = Arc::new(catalog);
    info!(projects = catalog.len(), "catalog loaded");

    let source = match config.remote_endpoints()? {
        Some(endpoints) => {
            info!(base = %endpoints.base_url(), "project pages served remotely");
            ProjectSource::remote(endpoints, config.remote_timeout())?
        }
        None => ProjectSource::local(catalog.clone()),
    };

    match cli.command.clone() {
        Some(command) => run_command(command, &config, &catalog, &source).await,
        None => run_tui(&cli, &config, catalog, source).await,
    }
}

// ── Subcommands ───────────────────────────────────────────────────────

async fn run_command(
    command: Command,
    config: &Config,
    catalog: &Catalog,
    source: &ProjectSource,
) -> Result<()> {
    match command {
        Command::Project { slug } => {
            let project = source.fetch_project(&slug).await?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        Command::Media { slug, width } => {
            let urls = config.media_urls();
            let width = width.unwrap_or(config.media.detail_width);
            let items = source.fetch_media(&slug).await?;
            for item in items.iter().filter(|item| !item.is_missing()) {
                println!("{}", urls.url(item, width));
            }
        }
        Command::Catalog => {
            if catalog.is_empty() {
                return Err(FolioError::InvalidContent("catalog is empty".into()).into());
            }
            for project in catalog.iter() {
                println!("{:<24} {:<32} {}", project.slug, project.title, project.year);
            }
        }
    }
    Ok(())
}

// ── Terminal UI ───────────────────────────────────────────────────────

async fn run_tui(
    cli: &CliArgs,
    config: &Config,
    catalog: Arc<Catalog>,
    source: ProjectSource,
) -> Result<()> {
    let mouse = !cli.no_mouse;

    enable_raw_mode()
        .map_err(|e| FolioError::Terminal(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut event_handler = EventHandler::new(config.tick_rate_ms());
    let mut app = App::new(config, catalog, source, Some(event_handler.sender()))?;

    let size = terminal.size()?;
    app.resize(size.width, size.height);

    // ── Main event loop ───────────────────────────────────────────────
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|f| ui::draw(f, &mut app))?;
        }

        let Some(event) = event_handler.next().await else {
            break;
        };
        let idle_tick = matches!(event, Event::Tick(_));
        let hover_motion = matches!(&event, Event::Mouse(mouse, _) if is_hover_motion(mouse));
        let busy_before = is_busy(&app);
        let hover_before = app.hover;

        app.handle_event(event);

        // idle ticks and plain pointer motion skip the redraw unless they
        // changed something on screen
        dirty = if idle_tick {
            busy_before || is_busy(&app)
        } else if hover_motion {
            app.hover != hover_before
        } else {
            true
        };

        if app.should_quit {
            break;
        }
    }

    event_handler.stop();

    disable_raw_mode()?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("folio exiting");
    Ok(())
}

fn is_busy(app: &App) -> bool {
    app.is_animating() || app.animation.has_active_animation() || app.toast_message.is_some()
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    color_eyre::install().ok();
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(panic_info);
    }));
}

/// Initialize tracing.
///
/// Subcommands log to stderr. The TUI owns the terminal, so it only logs
/// when `--log` asks for the log file.
fn init_logging(cli: &CliArgs, config: &Config) -> Option<WorkerGuard> {
    use tracing_subscriber::EnvFilter;

    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level))
    };

    if cli.command.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .init();
        return None;
    }

    if !cli.log {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("off"))
            .with_writer(io::sink)
            .init();
        return None;
    }

    let log_dir = Config::log_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Cannot create log directory {}: {}", log_dir.display(), e);
        return None;
    }
    let appender = tracing_appender::rolling::never(&log_dir, "folio.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

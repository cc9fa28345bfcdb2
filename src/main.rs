// ABOUTME: Main entry point for template-wizard with TUI and CLI support
//
// Binary: template-wizard
// Usage: template-wizard [--config PATH] [COMMAND]
// - No command: launches the interactive wizard
// - replay: drive the wizard from a JSON script
// - classify: show the step sequence for a file
// - config: show or initialise the config file

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*, Terminal};
use std::{
    io::{self, IsTerminal},
    path::PathBuf,
    time::{Duration, Instant},
};

use template_wizard::app::{App, EventHandler};
use template_wizard::cli;
use template_wizard::config::AppConfig;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = setup_logging() {
        eprintln!("Logging disabled: {e:#}");
    }
    setup_panic_handler();

    let args = cli::Cli::parse();
    let config_path = match args.config {
        Some(path) => path,
        None => AppConfig::config_path()?,
    };

    let result = match args.command {
        Some(cli::Commands::Replay(replay_args)) => {
            let config = AppConfig::load_from(&config_path)?;
            cli::replay::execute(&replay_args, &config, args.format).await
        }
        Some(cli::Commands::Classify(classify_args)) => {
            cli::classify::execute(&classify_args, args.format)
        }
        Some(cli::Commands::Config(config_args)) => {
            cli::config::execute(&config_args, &config_path, args.format)
        }

        // TUI mode (explicit or default)
        Some(cli::Commands::Tui) | None => {
            let config = AppConfig::load_from(&config_path)?;
            let mut app = App::new(&config)?;
            app.init()?;

            // Drop keypresses buffered before the wizard appeared
            while event::poll(Duration::from_millis(10)).unwrap_or(false) {
                let _ = event::read();
            }

            run_tui(&mut app).await
        }
    };

    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn run_tui(app: &mut App) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Try running directly in a terminal instead of redirecting output."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    if let Some(notice) = &app.state.notice {
        println!("{notice}");
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) =
                        EventHandler::handle_key_event(key_event, &mut app.state)
                    {
                        app.handle_app_event(app_event)?;
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.poll_submissions()?;
            last_tick = Instant::now();
        }

        // Let spawned submissions make progress between frames
        tokio::task::yield_now().await;

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_logging() -> Result<()> {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = AppConfig::base_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| PathBuf::from(".template-wizard/logs"));
    std::fs::create_dir_all(&log_dir)?;

    let log_file = log_dir.join(format!(
        "template-wizard-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));
    let file = OpenOptions::new().create(true).append(true).open(&log_file)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "template_wizard=info".into()),
        )
        .init();
    Ok(())
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting
        cleanup_terminal();

        tracing::error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}

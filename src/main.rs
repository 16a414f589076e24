use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod app;
mod config;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use config::{Config, Theme};
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "folio", version)]
#[command(about = "Terminal portfolio with an AI assistant grounded on the owner's profile")]
struct Cli {
    /// Gemini model to use
    #[arg(short, long)]
    model: Option<String>,
    /// Seconds to wait for a reply before giving up
    #[arg(long)]
    timeout: Option<u64>,
    /// Go straight to the portfolio
    #[arg(long)]
    skip_boot: bool,
    /// Start in the light theme
    #[arg(long)]
    light: bool,
    /// Read settings from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if self.skip_boot {
            config.skip_boot = true;
        }
        if self.light {
            config.theme = Theme::Light;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load the .env file
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_path = logging::init().ok();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    info!(model = %config.model, log = ?log_path, "starting folio");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &config).await;
    tui::restore()?;

    if let Err(err) = &result {
        warn!(error = %err, "folio exited with an error");
    }
    result
}

async fn run(terminal: &mut Tui, config: &Config) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(300));
    let mut app = App::new(config, events.sender());

    if !config.skip_boot {
        app.start_boot();
    }

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(&mut app, event),
            None => break,
        }
    }

    Ok(())
}

//! WikiLayer CLI - Command-line interface
//!
//! Runs a session against the synthetic dummy simulator and prints the
//! nearby-page view as the flight drifts. Real simulator bindings plug in
//! behind the same connector trait.

use std::path::PathBuf;

use clap::Parser;
use tokio::time;
use tracing::{error, info};

use wikilayer::app::{AppConfig, AppError, WikiLayerApp};
use wikilayer::page::PageView;
use wikilayer::simulator::{DummyConnector, SimulatorConnector};

#[derive(Parser, Debug)]
#[command(
    name = "wikilayer",
    version,
    about = "Nearby Wikipedia articles for your flight, streamed as you fly"
)]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, default_value = "wikilayer.ini")]
    config: PathBuf,

    /// Wikipedia language code (overrides the config file).
    #[arg(long)]
    language: Option<String>,

    /// Display radius in meters (overrides the config file).
    #[arg(long)]
    display_radius: Option<u32>,

    /// Seconds between position requests (overrides the config file).
    #[arg(long)]
    interval: Option<u64>,

    /// Stop after this many position ticks instead of running until ctrl-c.
    #[arg(long)]
    ticks: Option<u64>,
}

impl Cli {
    /// Overlays command-line flags onto the loaded configuration.
    fn apply_to(&self, mut config: AppConfig) -> AppConfig {
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(radius) = self.display_radius {
            config.display_radius_m = radius;
        }
        if let Some(secs) = self.interval {
            config.refresh_interval_secs = secs;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    wikilayer::log::init();

    let config = cli.apply_to(AppConfig::load(&cli.config)?);
    config.validate()?;
    info!(
        "Language {}, display radius {} m, position interval {} s",
        config.language, config.display_radius_m, config.refresh_interval_secs
    );

    let app = WikiLayerApp::start(&config)?;

    let mut connector = DummyConnector::new(app.events());
    connector
        .connect()
        .map_err(|e| AppError::Connector(e.to_string()))?;

    // Print every published view until the session ends.
    let mut views = app.views();
    tokio::spawn(async move {
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            print_view(&view);
        }
    });

    let mut interval = time::interval(config.refresh_interval());
    let mut sent: u64 = 0;
    loop {
        if cli.ticks.is_some_and(|limit| sent >= limit) {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = connector.request_current_position() {
                    error!("Position request failed: {}", e);
                    break;
                }
                sent += 1;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    let _ = connector.disconnect();
    app.shutdown().await;
    Ok(())
}

fn print_view(pages: &[PageView]) {
    if pages.is_empty() {
        println!("-- no pages in range --");
        return;
    }
    println!("-- {} pages in range --", pages.len());
    for page in pages {
        println!("{:>8.1} m  {}  <{}>", page.distance_m, page.title, page.url);
        if let Some(summary) = &page.summary {
            if let Some(line) = summary.lines().next() {
                println!("            {}", line);
            }
        }
    }
}

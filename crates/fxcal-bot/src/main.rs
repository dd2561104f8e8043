//! fxcal - Economic Calendar Divergence Notifier - Entry Point
//!
//! Runs the pipeline once and exits; schedule it externally (cron, systemd timer).

use anyhow::Result;
use clap::Parser;
use fxcal_scrape::DriverKind;
use tracing::info;

/// Economic calendar divergence notifier
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, env = "FXCAL_CONFIG")]
    config: Option<String>,

    /// Calendar driver override (webdriver or snapshot)
    #[arg(long)]
    driver: Option<DriverKind>,

    /// Read the calendar from a saved HTML file instead of the network
    #[arg(long, value_name = "PATH")]
    calendar_html: Option<String>,

    /// Build and print the report without posting it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    fxcal_telemetry::init_logging()?;

    info!("Starting fxcal v{}", env!("CARGO_PKG_VERSION"));

    let mut config = fxcal_bot::AppConfig::load(args.config.as_deref())?;
    if let Some(kind) = args.driver {
        config.calendar.driver = kind;
    }
    info!(
        driver = ?config.calendar.driver,
        calendar_url = %config.calendar.url,
        quotes = config.quotes.len(),
        "Configuration loaded"
    );

    let app = fxcal_bot::Application::new(config, args.dry_run)?;

    let mut driver = match &args.calendar_html {
        Some(path) => fxcal_bot::Application::snapshot_driver(path)?,
        None => app.open_driver().await?,
    };

    app.run(driver.as_mut()).await?;

    Ok(())
}

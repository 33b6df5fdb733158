use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use tracing::info;

use uatu_pricewatch::config::{AppConfig, Cli, OutputMode};
use uatu_pricewatch::plugins::NotifierPlugin;
use uatu_pricewatch::plugins::notifiers::{ConsoleNotifier, LogNotifier};
use uatu_pricewatch::plugins::trackers::PriceTracker;
use uatu_pricewatch::scheduler::PriceScheduler;
use uatu_pricewatch::scraper::WebScraper;
use uatu_pricewatch::shutdown;
use uatu_pricewatch::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the default directive
    logging::init();

    let config = AppConfig::from_cli(cli)?;
    info!("Starting Uatu Pricewatch...");

    let scraper = Arc::new(WebScraper::new(config.scraper.clone())?);

    if let Some(path) = &config.save_page {
        scraper
            .save_page(&config.scheduler.url, path, config.scheduler.on_error)
            .await?;
    }

    let notifier: Box<dyn NotifierPlugin> = match config.output {
        OutputMode::Auto => Box::new(ConsoleNotifier::stdout(std::io::stdout().is_terminal())),
        OutputMode::Console => Box::new(ConsoleNotifier::stdout(true)),
        OutputMode::Log => Box::new(LogNotifier::new()),
    };

    let (trigger, shutdown) = shutdown::channel();
    tokio::spawn(shutdown::listen_for_shutdown(trigger));

    let mut scheduler = PriceScheduler::new(
        scraper,
        Box::new(PriceTracker::new()),
        notifier,
        config.scheduler,
    );
    scheduler.run(shutdown).await?;

    info!("Shutting down...");
    Ok(())
}

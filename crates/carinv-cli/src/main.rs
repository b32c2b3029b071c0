mod crawl;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use carinv_core::Platform;

#[derive(Debug, Parser)]
#[command(name = "carinv")]
#[command(about = "Normalize dealer inventory listings into one deterministic report")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Normalize one or more dealer listing dumps and write the inventory report
    Crawl(crawl::CrawlArgs),
    /// List supported dealer platforms
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = carinv_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl(args) => crawl::run_crawl(&config, args).await?,
        Commands::List => print_platforms(),
    }

    Ok(())
}

fn print_platforms() {
    println!("{:<16} {:>11}  DESCRIPTION", "PLATFORM", "ACCESSORIES");
    for platform in Platform::ALL {
        println!(
            "{:<16} {:>11}  {}",
            platform.as_str(),
            platform.accessory_names().len(),
            platform.description()
        );
    }
}

#[cfg(test)]
mod tests;

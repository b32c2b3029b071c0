//! `carinv crawl`: build the dealer task list, run it through one collector,
//! and write the finalized report.
//!
//! Two modes: a dealers file (`--config`, or `CARINV_DEALERS_PATH` when no
//! mode is given) or a single dealer described on the command line.

mod runner;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use carinv_core::{AppConfig, DealerConfig, DealersFile, Platform, RunSettings};
use carinv_pipeline::{
    capture_time, Collector, DrivetrainAliases, JsonFileSource, ListingNormalizer,
    ListingSource, PackageClassifier,
};

pub(crate) use runner::{run_batch, DealerTask};

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Platform of a single dealer, e.g. `dealeron` (see `carinv list`)
    #[arg(requires = "source", conflicts_with = "config")]
    pub platform: Option<Platform>,

    /// Raw listing dump for the single dealer
    #[arg(long, requires = "platform")]
    pub source: Option<PathBuf>,

    /// Inventory URL of the single dealer (defaults to the dump path)
    #[arg(long, requires = "platform")]
    pub url: Option<String>,

    /// Display name of the single dealer
    #[arg(long, requires = "platform")]
    pub name: Option<String>,

    /// Dealers YAML file (defaults to `CARINV_DEALERS_PATH`)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Report path; overrides the dealers file and `CARINV_OUTPUT_PATH`
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Everything a crawl needs once arguments and files are resolved.
#[derive(Debug)]
pub(crate) struct CrawlPlan {
    pub dealers: Vec<DealerConfig>,
    pub aliases: DrivetrainAliases,
    pub output: PathBuf,
}

/// Resolves arguments, the dealers file and environment settings into a plan.
///
/// # Errors
///
/// Returns an error if the dealers file cannot be loaded or is invalid.
pub(crate) fn build_plan(config: &AppConfig, args: CrawlArgs) -> anyhow::Result<CrawlPlan> {
    let (dealers, settings, aliases) = match (args.platform, args.source) {
        (Some(platform), Some(source)) => {
            let url = args
                .url
                .unwrap_or_else(|| source.display().to_string());
            let dealer = DealerConfig {
                name: args.name,
                platform,
                url,
                source,
                accessory_names: Vec::new(),
            };
            (vec![dealer], RunSettings::default(), None)
        }
        (Some(_), None) | (None, Some(_)) => {
            anyhow::bail!("a single-dealer crawl needs both PLATFORM and --source")
        }
        (None, None) => {
            let path = args.config.as_deref().unwrap_or(&config.dealers_path);
            let file = load_dealers_file(path)?;
            let aliases = file.drivetrain_aliases()?;
            (file.dealers, file.settings, aliases)
        }
    };

    let output = args
        .output
        .or(settings.output)
        .unwrap_or_else(|| config.output_path.clone());

    Ok(CrawlPlan {
        dealers,
        aliases: aliases.map_or_else(DrivetrainAliases::default, DrivetrainAliases::from_table),
        output,
    })
}

fn load_dealers_file(path: &Path) -> anyhow::Result<DealersFile> {
    carinv_core::load_dealers(path)
        .with_context(|| format!("failed to load dealers file {}", path.display()))
}

/// Builds one extraction task per dealer.
pub(crate) fn dealer_tasks(plan: &CrawlPlan) -> Vec<DealerTask> {
    plan.dealers
        .iter()
        .map(|dealer| {
            let source: Arc<dyn ListingSource> = Arc::new(JsonFileSource::new(
                dealer.label(),
                dealer.platform,
                dealer.source.clone(),
            ));
            let classifier = PackageClassifier::for_platform(dealer.platform)
                .with_accessory_names(&dealer.accessory_names);
            let normalizer = ListingNormalizer::new(classifier, plan.aliases.clone())
                .with_dealer(dealer.name.as_deref(), Some(&dealer.url));
            DealerTask { source, normalizer }
        })
        .collect()
}

/// Runs `carinv crawl`.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the collector protocol is
/// violated, or the report cannot be written. Individual dealer failures are
/// logged and do not fail the run.
pub(crate) async fn run_crawl(config: &AppConfig, args: CrawlArgs) -> anyhow::Result<()> {
    let plan = build_plan(config, args)?;
    let tasks = dealer_tasks(&plan);
    let collector = Arc::new(Collector::new());

    let report = run_batch(
        &collector,
        tasks,
        config.max_concurrent_tasks,
        capture_time(),
    )
    .await?;

    let Some(report) = report else {
        println!("no records collected; nothing written");
        return Ok(());
    };

    let json = report.to_json()?;
    let digest = report.digest()?;
    if let Some(parent) = plan.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&plan.output, json)
        .await
        .with_context(|| format!("failed to write {}", plan.output.display()))?;

    tracing::info!(
        path = %plan.output.display(),
        records = report.len(),
        digest = %digest,
        "inventory report written"
    );
    println!(
        "wrote {} records to {} (sha256 {digest})",
        report.len(),
        plan.output.display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "crawl_test.rs"]
mod tests;

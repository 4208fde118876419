use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardmatch_core::domain::contract::RecommendRequest;
use cardmatch_core::domain::export::{parse_export, RecommendationExport};

mod report;

#[derive(Debug, Parser)]
#[command(name = "cardmatch")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one recommendation from a request file.
    Recommend {
        /// JSON file with `profile`, `spending` and optional `ownedCards`.
        #[arg(long)]
        request: PathBuf,

        /// Card catalog file. Overrides CATALOG_PATH and CATALOG_URL.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Synergy pairing table file. Overrides PAIRINGS_PATH.
        #[arg(long)]
        pairings: Option<PathBuf>,

        /// Write the result as an export file.
        #[arg(long)]
        export: Option<PathBuf>,

        /// Print JSON instead of the text summary.
        #[arg(long)]
        json: bool,
    },

    /// Re-import an export file and print it.
    Inspect {
        path: PathBuf,

        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = cardmatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = match args.command {
        Command::Recommend {
            request,
            catalog,
            pairings,
            export,
            json,
        } => {
            if let Some(path) = catalog {
                settings.catalog_url = None;
                settings.catalog_path = Some(path);
            }
            if let Some(path) = pairings {
                settings.pairings_path = Some(path);
            }
            run_recommend(&settings, &request, export.as_deref(), json).await
        }
        Command::Inspect { path, json } => run_inspect(&path, json),
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "cardmatch run failed");
    }
    result
}

async fn run_recommend(
    settings: &cardmatch_core::config::Settings,
    request_path: &Path,
    export_path: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let request = read_request(request_path)?;
    let catalog = cardmatch_core::catalog::source::load_catalog_from_settings(settings).await?;

    let recommendation = cardmatch_core::engine::recommend_cards(&catalog, &request);
    let export = RecommendationExport::new(recommendation, catalog.len());

    if let Some(path) = export_path {
        std::fs::write(path, export.to_json_pretty()?)
            .with_context(|| format!("write export {} failed", path.display()))?;
        tracing::info!(path = %path.display(), "wrote recommendation export");
    }

    print_export(&export, json)
}

fn run_inspect(path: &Path, json: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read export {} failed", path.display()))?;
    let export = parse_export(&text)?;
    print_export(&export, json)
}

fn print_export(export: &RecommendationExport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", export.to_json_pretty()?);
    } else {
        print!("{}", report::render(export));
    }
    Ok(())
}

fn read_request(path: &Path) -> anyhow::Result<RecommendRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read request {} failed", path.display()))?;
    let body: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("request {} is not valid JSON", path.display()))?;
    let request = RecommendRequest::from_json(body)
        .with_context(|| format!("request {} failed validation", path.display()))?;
    Ok(request)
}

fn init_sentry(settings: &cardmatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

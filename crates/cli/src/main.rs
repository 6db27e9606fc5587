use clap::{Parser, Subcommand};
use costwatch_core::api::http::HttpDashboardApi;
use costwatch_core::controller::{ActionOutcome, DashboardController, LoadOutcome, TriggerOutcome};
use costwatch_core::domain::recommendation::RecommendationRef;
use costwatch_core::domain::reply::Reply;
use costwatch_core::view::{shared, TerminalView};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod report;

#[derive(Debug, Parser)]
#[command(name = "costwatch", about = "AWS cost dashboard in the terminal")]
struct Args {
    /// Backend base URL. Overrides COSTWATCH_BACKEND_URL.
    #[arg(long, global = true)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the latest scan once and print it.
    Status,
    /// Trigger a new scan, then print the refreshed dashboard.
    Scan,
    /// Keep the dashboard refreshed until interrupted.
    Watch,
    /// List the recommendations of the latest report.
    Recommendations,
    /// Execute one recommendation of the latest report.
    ///
    /// The row is only executed while it still names the given resource and
    /// action, as printed by `recommendations`.
    Execute {
        #[arg(long)]
        index: usize,
        #[arg(long)]
        resource_id: String,
        #[arg(long)]
        action: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = costwatch_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(url) = args.backend_url {
        settings.backend_url = Some(url);
    }

    let api = Arc::new(HttpDashboardApi::from_settings(&settings)?);
    let controller =
        DashboardController::from_settings(api, shared(TerminalView::stdout()), &settings);

    match args.command {
        Command::Status => match controller.load_dashboard().await {
            LoadOutcome::Rendered | LoadOutcome::Superseded => Ok(()),
            LoadOutcome::Unavailable => anyhow::bail!("no scan data available"),
            LoadOutcome::Failed => anyhow::bail!("failed to load dashboard data"),
        },
        Command::Scan => match controller.trigger_manual_scan().await {
            TriggerOutcome::Completed { .. } => Ok(()),
            TriggerOutcome::Failed(reason) => anyhow::bail!("scan failed: {reason}"),
            TriggerOutcome::Errored(detail) => anyhow::bail!("scan request failed: {detail}"),
            TriggerOutcome::Busy => Ok(()),
        },
        Command::Watch => {
            let interval = settings.require_positive_refresh()?;
            tracing::info!(?interval, backend = settings.backend_url(), "watching dashboard");
            controller.run(shutdown_signal()).await;
            Ok(())
        }
        Command::Recommendations => match controller.latest_recommendations().await? {
            Reply::Ready(summary) => {
                print!("{}", report::recommendations_text(&summary));
                Ok(())
            }
            Reply::Unavailable(reason) => anyhow::bail!("no recommendations: {reason}"),
        },
        Command::Execute {
            index,
            resource_id,
            action,
        } => {
            let picked = RecommendationRef {
                index,
                resource_id,
                action,
            };
            match controller.execute_latest(&picked).await {
                ActionOutcome::Executed(_) => Ok(()),
                ActionOutcome::Failed(reason) => anyhow::bail!("action failed: {reason}"),
                ActionOutcome::Errored(detail) => {
                    anyhow::bail!("execute-action request failed: {detail}")
                }
            }
        }
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &costwatch_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finbrowse_core::client::HttpAnalysisClient;
use finbrowse_core::config::Settings;
use finbrowse_core::controller::{AnalysisController, ResultsSurface, Status, SubmitOutcome};
use finbrowse_core::domain::AnalysisForm;
use finbrowse_core::render::html::Page;
use finbrowse_core::render::ResultsView;

mod table;

#[derive(Debug, Parser)]
#[command(name = "finbrowse_cli")]
struct Args {
    /// Stock symbol to analyze (e.g. AAPL, TCS).
    symbol: String,

    /// Market hint passed to the backend (e.g. NSE, BSE, NASDAQ).
    #[arg(long, default_value = "")]
    market: String,

    /// Custom page URL for the backend to analyze instead of its default source.
    #[arg(long, default_value = "")]
    url: String,

    /// Backend base address. Overrides ANALYSIS_API_BASE_URL.
    #[arg(long)]
    api_base_url: Option<String>,

    /// Request timeout in seconds. Overrides ANALYSIS_TIMEOUT_SECS.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Also write the results as a standalone HTML report.
    #[arg(long)]
    html_out: Option<PathBuf>,

    /// Print the request body without sending it.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let form = AnalysisForm::new(args.symbol.as_str(), args.market.as_str(), args.url.as_str());

    if args.dry_run {
        let req = form.to_request()?;
        tracing::info!(dry_run = true, url = %settings.analyze_url(), "request not sent");
        println!("{}", serde_json::to_string_pretty(&req)?);
        return Ok(());
    }

    let client = HttpAnalysisClient::from_settings(&settings)?;
    let controller = AnalysisController::new(client);
    let surface = TerminalSurface::default();

    let outcome = controller.submit(&form, &surface).await;
    let (status, results) = surface.into_parts();

    if let (Some(path), Some(view)) = (args.html_out.as_ref(), results.as_ref()) {
        let html = Page {
            status: status.as_ref(),
            results: Some(view),
            ..Page::default()
        }
        .render();
        std::fs::write(path, html)
            .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote HTML report");
    }

    match outcome {
        SubmitOutcome::Rendered => Ok(()),
        SubmitOutcome::Rejected(err) | SubmitOutcome::Failed(err) => {
            let err = anyhow::Error::new(err).context(format!("analysis of {:?} failed", args.symbol));
            sentry_anyhow::capture_anyhow(&err);
            Err(err)
        }
        SubmitOutcome::Superseded => anyhow::bail!("analysis superseded"),
    }
}

fn resolve_settings(args: &Args) -> anyhow::Result<Settings> {
    apply_overrides(Settings::from_env_unvalidated(), args)
}

/// Flags win over the environment; validation runs once on the merged result.
fn apply_overrides(mut settings: Settings, args: &Args) -> anyhow::Result<Settings> {
    if let Some(base) = &args.api_base_url {
        settings.api_base_url = base.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings = settings.with_timeout(Duration::from_secs(secs));
    }
    settings.validate()?;
    Ok(settings)
}

/// Prints status lines to stderr and tables to stdout, keeping the last of each.
#[derive(Debug, Default)]
struct TerminalSurface {
    status: Mutex<Option<Status>>,
    results: Mutex<Option<ResultsView>>,
}

impl TerminalSurface {
    fn into_parts(self) -> (Option<Status>, Option<ResultsView>) {
        (
            self.status
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            self.results
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl ResultsSurface for TerminalSurface {
    fn set_status(&self, status: Status) {
        eprintln!("[{}] {}", status.kind.as_str(), status.message);
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    fn show_results(&self, view: ResultsView) {
        print!("{}", table::render_results(&view));
        *self.results.lock().unwrap_or_else(PoisonError::into_inner) = Some(view);
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

use axum::{extract::State, response::Html, routing::get, Form, Router};
use std::sync::{Mutex, PoisonError};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finbrowse_core::client::HttpAnalysisClient;
use finbrowse_core::controller::{AnalysisController, ResultsSurface, Status};
use finbrowse_core::domain::AnalysisForm;
use finbrowse_core::render::html::Page;
use finbrowse_core::render::ResultsView;

const ANALYZE_ROUTE: &str = "/analyze";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = finbrowse_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let client = match HttpAnalysisClient::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            return Err(e);
        }
    };

    let app = router(AppState { client });

    let port = settings.port.unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, backend = settings.base_url(), "web listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(ANALYZE_ROUTE, get(index).post(analyze))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Clone)]
struct AppState {
    client: HttpAnalysisClient,
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index() -> Html<String> {
    Html(
        Page {
            form_action: Some(ANALYZE_ROUTE),
            ..Page::default()
        }
        .render(),
    )
}

async fn analyze(State(state): State<AppState>, Form(form): Form<AnalysisForm>) -> Html<String> {
    // One controller per page request: each browser round trip is its own submission.
    let controller = AnalysisController::new(state.client.clone());
    let surface = PageSurface::default();
    controller.submit(&form, &surface).await;

    Html(surface.into_page(&form))
}

/// Collects what a submission shows so it can be rendered into a single response page.
#[derive(Debug, Default)]
struct PageSurface {
    status: Mutex<Option<Status>>,
    results: Mutex<Option<ResultsView>>,
}

impl PageSurface {
    fn into_page(self, form: &AnalysisForm) -> String {
        let status = self
            .status
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let results = self
            .results
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        Page {
            form_action: Some(ANALYZE_ROUTE),
            form: Some(form),
            status: status.as_ref(),
            results: results.as_ref(),
        }
        .render()
    }
}

impl ResultsSurface for PageSurface {
    fn set_status(&self, status: Status) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = Some(status);
    }

    fn show_results(&self, view: ResultsView) {
        *self.results.lock().unwrap_or_else(PoisonError::into_inner) = Some(view);
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &finbrowse_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::Json;
    use finbrowse_core::config::Settings;
    use finbrowse_core::domain::AnalysisResponse;
    use serde_json::{json, Value};
    use std::sync::Arc;

    type Received = Arc<Mutex<Vec<Value>>>;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_web(backend_base: &str) -> String {
        let client = HttpAnalysisClient::from_settings(&Settings::new(backend_base)).unwrap();
        spawn(router(AppState { client })).await
    }

    async fn recording_backend() -> (String, Received) {
        let received = Received::default();
        let backend = Router::new()
            .route(
                "/api/analyze",
                post(|State(received): State<Received>, Json(body): Json<Value>| async move {
                    received.lock().unwrap().push(body);
                    Json(json!({
                        "years": [{"label": "FY2024", "revenue": 2_500_000.0}],
                        "anomalies": [{"year": 2024, "color": "red", "condition": "C", "interpretation": "I"}],
                        "narrative": "Collections are slowing."
                    }))
                }),
            )
            .with_state(received.clone());
        (spawn(backend).await, received)
    }

    async fn post_form(web: &str, fields: &[(&str, &str)]) -> String {
        let res = reqwest::Client::new()
            .post(format!("{web}{ANALYZE_ROUTE}"))
            .form(fields)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), reqwest::StatusCode::OK);
        res.text().await.unwrap()
    }

    #[tokio::test]
    async fn healthz_answers_ok() {
        let web = spawn_web("http://127.0.0.1:9").await;
        let body = reqwest::get(format!("{web}/healthz")).await.unwrap().text().await.unwrap();
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn index_serves_form_with_hidden_results() {
        let web = spawn_web("http://127.0.0.1:9").await;
        let body = reqwest::get(format!("{web}/")).await.unwrap().text().await.unwrap();
        assert!(body.contains("action=\"/analyze\""));
        assert!(body.contains("style=\"display: none;\""));
    }

    #[tokio::test]
    async fn form_post_forwards_trimmed_request_and_renders_results() {
        let (backend, received) = recording_backend().await;
        let web = spawn_web(&backend).await;

        let page = post_form(&web, &[("symbol", " AAPL "), ("market", ""), ("url", "")]).await;

        assert_eq!(
            received.lock().unwrap().as_slice(),
            &[json!({"symbol": "AAPL", "market": null, "url": null})]
        );
        assert!(page.contains("class=\"status-message success\">Analysis complete!"));
        assert!(page.contains("<td>FY2024</td><td>2.50M</td>"));
        assert!(page.contains("<span class=\"flag-dot red\"></span>RED"));
        assert!(page.contains("Collections are slowing."));
        assert!(page.contains("id=\"symbolInput\" name=\"symbol\""));
    }

    #[tokio::test]
    async fn blank_symbol_is_rejected_without_calling_backend() {
        let (backend, received) = recording_backend().await;
        let web = spawn_web(&backend).await;

        let page = post_form(&web, &[("symbol", "   ")]).await;

        assert!(received.lock().unwrap().is_empty());
        assert!(page.contains("class=\"status-message error\">Please enter a stock symbol"));
        assert!(page.contains("style=\"display: none;\""));
    }

    #[tokio::test]
    async fn backend_failure_status_is_reported_on_page() {
        let backend = spawn(Router::new().route(
            "/api/analyze",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        let web = spawn_web(&backend).await;

        let page = post_form(&web, &[("symbol", "AAPL")]).await;

        assert!(page.contains(&format!(
            "Error: HTTP 500. Make sure backend is running at {backend}"
        )));
        assert!(page.contains("style=\"display: none;\""));
    }

    #[test]
    fn latest_status_wins() {
        let surface = PageSurface::default();
        surface.set_status(Status::loading("Running analysis... This may take a minute"));
        surface.set_status(Status::error("Error: HTTP 500. Make sure backend is running at http://localhost:8000"));

        let page = surface.into_page(&AnalysisForm::new("AAPL", "", ""));
        assert!(page.contains("status-message error"));
        assert!(page.contains("HTTP 500"));
        assert!(!page.contains("Running analysis"));
        assert!(page.contains("style=\"display: none;\""));
    }

    #[test]
    fn shown_results_are_revealed() {
        let surface = PageSurface::default();
        finbrowse_core::controller::render(&surface, &AnalysisResponse::default());
        surface.set_status(Status::success("Analysis complete!"));

        let page = surface.into_page(&AnalysisForm::new("AAPL", "", ""));
        assert!(page.contains("style=\"display: block;\""));
        assert!(page.contains("colspan=\"8\""));
        assert!(page.contains("colspan=\"4\""));
        assert!(page.contains("No narrative available."));
        assert!(page.contains("scrollIntoView"));
    }
}

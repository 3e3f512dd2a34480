use crate::client::{AnalysisBackend, AnalysisError};
use crate::domain::{AnalysisForm, AnalysisResponse};
use crate::render::ResultsView;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;
use uuid::Uuid;

pub const LOADING_MESSAGE: &str = "Running analysis... This may take a minute";
pub const SUCCESS_MESSAGE: &str = "Analysis complete!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Loading,
    Success,
    Error,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Info => "info",
            StatusKind::Loading => "loading",
            StatusKind::Success => "success",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

impl Status {
    pub fn new(message: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Info)
    }

    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Loading)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, StatusKind::Error)
    }
}

/// Where status updates and rendered results go.
pub trait ResultsSurface: Send + Sync {
    /// Overwrites whatever status was shown before.
    fn set_status(&self, status: Status);

    /// Replaces both table bodies and the narrative, reveals the results region and
    /// scrolls it into view.
    fn show_results(&self, view: ResultsView);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rendered,
    /// Input failed validation; nothing was sent.
    Rejected(AnalysisError),
    Failed(AnalysisError),
    /// A newer submission started while this one was in flight; its result was dropped.
    Superseded,
}

/// Builds the view-model for `res` and hands it to `surface`.
pub fn render<S: ResultsSurface + ?Sized>(surface: &S, res: &AnalysisResponse) {
    surface.show_results(ResultsView::from_response(res));
}

pub fn failure_message(err: &AnalysisError, base_url: &str) -> String {
    match err {
        AnalysisError::Validation(msg) => msg.clone(),
        _ => format!("Error: {err}. Make sure backend is running at {base_url}"),
    }
}

/// Runs one request/render cycle per submission.
///
/// Every submission that passes validation takes a ticket. Only the holder of the newest
/// ticket may touch the surface once its request completes, so a slow stale response can
/// never overwrite a newer one.
#[derive(Debug)]
pub struct AnalysisController<B> {
    backend: B,
    latest_ticket: AtomicU64,
    in_flight: AtomicUsize,
}

impl<B: AnalysisBackend> AnalysisController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            latest_ticket: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// The backend this controller submits to. Useful to embedders that keep one
    /// controller alive across many submissions.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// True while at least one request is waiting on the backend. Only meaningful for a
    /// long-lived controller (e.g. an interactive front end disabling its trigger); the
    /// bundled web server and CLI make one controller per submission.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub async fn submit<S: ResultsSurface + ?Sized>(
        &self,
        form: &AnalysisForm,
        surface: &S,
    ) -> SubmitOutcome {
        let req = match form.to_request() {
            Ok(req) => req,
            Err(err) => {
                tracing::info!(error = %err, "submission rejected");
                surface.set_status(Status::error(failure_message(&err, self.backend.base_url())));
                return SubmitOutcome::Rejected(err);
            }
        };

        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let submission_id = Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(
            %submission_id,
            ticket,
            symbol = %req.symbol,
            market = req.market.as_deref().unwrap_or("-"),
            "analysis submitted"
        );
        surface.set_status(Status::loading(LOADING_MESSAGE));

        let result = {
            let _in_flight = InFlight::enter(&self.in_flight);
            self.backend.analyze(&req).await
        };

        if self.latest_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(%submission_id, ticket, "discarding superseded analysis result");
            return SubmitOutcome::Superseded;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(res) => {
                render(surface, &res);
                surface.set_status(Status::success(SUCCESS_MESSAGE));
                tracing::info!(%submission_id, elapsed_ms, "analysis rendered");
                SubmitOutcome::Rendered
            }
            Err(err) => {
                tracing::error!(
                    %submission_id,
                    elapsed_ms,
                    kind = err.kind(),
                    error = %err,
                    "analysis failed"
                );
                surface.set_status(Status::error(failure_message(&err, self.backend.base_url())));
                SubmitOutcome::Failed(err)
            }
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

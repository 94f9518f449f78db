use anyhow::{Context as _, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use callnote_core::{CallSummaryEvent, FailureKind, PhoneMatch, ProcessOutcome};
use callnote_store::FailureLog;
use callnote_sync::{CallSummaryProcessor, CaregiverApi};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

pub type SharedApi = Arc<dyn CaregiverApi + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    api: SharedApi,
    failure_log: FailureLog,
    phone_match: PhoneMatch,
}

impl AppState {
    pub fn new(api: SharedApi, failure_log: FailureLog, phone_match: PhoneMatch) -> Self {
        Self {
            api,
            failure_log,
            phone_match,
        }
    }

    fn process(&self, event: &CallSummaryEvent) -> ProcessOutcome {
        CallSummaryProcessor::new(self.api.as_ref(), &self.failure_log)
            .with_phone_match(self.phone_match)
            .process(event)
    }
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct DetailBody {
    detail: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(receive_webhook))
        .route("/logs/validation-failures", get(validation_failures))
        .with_state(state)
}

/// Serves until Ctrl-C. The state outlives the runtime so the blocking HTTP
/// client inside it is never dropped on an executor thread.
pub fn run(state: AppState, bind: &str) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .with_context(|| "build tokio runtime")?;

    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .with_context(|| format!("bind {bind}"))?;
        let addr = listener
            .local_addr()
            .with_context(|| "read listener address")?;
        info!(%addr, "listening for webhooks");

        axum::serve(listener, router(state.clone()))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .with_context(|| "webhook server failed")
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}

pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::InvalidSummary => StatusCode::BAD_REQUEST,
        FailureKind::CaregiverNotFound => StatusCode::NOT_FOUND,
        FailureKind::UpdateFailed | FailureKind::VerificationFailed => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn detail_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(DetailBody {
            detail: detail.into(),
        }),
    )
        .into_response()
}

fn outcome_response(outcome: ProcessOutcome) -> Response {
    match outcome {
        ProcessOutcome::Success => {
            (StatusCode::OK, Json(StatusBody { status: "ok" })).into_response()
        }
        ProcessOutcome::Failure { kind, detail } => detail_response(status_for(kind), detail),
    }
}

async fn receive_webhook(
    State(state): State<AppState>,
    Json(event): Json<CallSummaryEvent>,
) -> Response {
    info!(
        call_id = %event.call_id,
        from = %event.from_number,
        to = %event.to_number,
        timestamp = %event.timestamp,
        "received webhook"
    );

    let worker = state.clone();
    match tokio::task::spawn_blocking(move || worker.process(&event)).await {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => {
            error!(error = %err, "call summary worker failed");
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

async fn validation_failures(State(state): State<AppState>) -> Response {
    let failure_log = state.failure_log.clone();
    match tokio::task::spawn_blocking(move || failure_log.read_or_default()).await {
        Ok(Ok(text)) => (StatusCode::OK, text).into_response(),
        Ok(Err(err)) => {
            error!(error = %err, "failed to read failure log");
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read failure log")
        }
        Err(err) => {
            error!(error = %err, "failure log reader failed");
            detail_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

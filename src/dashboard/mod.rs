use std::net::SocketAddr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::error::JobError;
use crate::form::{CreateJobForm, ValidationErrors};
use crate::jobs::{Filter, Job, JobFilters, JobFiltersUpdate, JobPriority, JobStatus, JobStore};

#[derive(Clone)]
pub struct DashboardState {
    pub store: JobStore,
}

#[derive(Serialize)]
struct JobListResponse {
    jobs: Vec<Job>,
    total: usize,
    filters: JobFilters,
    busy: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    busy: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ValidationErrors>,
}

/// One-off filters for a listing; absent fields fall back to the store's.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    #[serde(default)]
    status: Option<Filter<JobStatus>>,
    #[serde(default)]
    priority: Option<Filter<JobPriority>>,
}

/// Failures rendered as `{ "error": ... }` with a matching status code.
#[derive(Debug)]
enum ApiError {
    Job(JobError),
    Validation(ValidationErrors),
    Rejected(StatusCode, String),
}

impl From<JobError> for ApiError {
    fn from(e: JobError) -> Self {
        ApiError::Job(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Rejected(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Rejected(e.status(), e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Job(e) => {
                let status = match e {
                    JobError::NotFound(_) => StatusCode::NOT_FOUND,
                    JobError::AlreadyRunning(_) | JobError::AlreadyCompleted(_) => {
                        StatusCode::CONFLICT
                    }
                    JobError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    JobError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    ErrorResponse {
                        error: e.to_string(),
                        fields: None,
                    },
                )
            }
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: fields.to_string(),
                    fields: Some(fields),
                },
            ),
            ApiError::Rejected(status, message) => (
                status,
                ErrorResponse {
                    error: message,
                    fields: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Routes for the simulated job API, without middleware.
pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/jobs", get(list_jobs_handler).post(create_job_handler))
        .route("/jobs/{id}", get(get_job_handler))
        .route("/run-job/{id}", post(run_job_handler))
        .route("/filters", get(get_filters_handler).patch(update_filters_handler))
        .with_state(state)
}

pub async fn run_dashboard(
    addr: SocketAddr,
    state: DashboardState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(addr = %local_addr, "Starting dashboard server");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Dashboard server stopped");
    Ok(())
}

async fn health_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        busy: state.store.is_busy(),
    })
}

async fn list_jobs_handler(
    State(state): State<DashboardState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<JobListResponse>, ApiError> {
    let Query(query) = query?;

    state.store.refresh().await?;

    let mut filters = state.store.filters();
    filters.merge(JobFiltersUpdate {
        status: query.status,
        priority: query.priority,
    });

    Ok(Json(JobListResponse {
        jobs: state.store.list_with(&filters),
        total: state.store.len(),
        filters,
        busy: state.store.is_busy(),
    }))
}

async fn create_job_handler(
    State(state): State<DashboardState>,
    form: Result<Json<CreateJobForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    let Json(form) = form?;
    let request = form.validate().map_err(|errors| {
        tracing::debug!(?errors, "Job form rejected");
        ApiError::Validation(errors)
    })?;

    let job = state.store.create(request).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn get_job_handler(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    state
        .store
        .get(&id)
        .map(Json)
        .ok_or_else(|| JobError::NotFound(id).into())
}

async fn run_job_handler(
    State(state): State<DashboardState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let job = state.store.run(&id).await?;
    Ok(Json(job))
}

async fn get_filters_handler(State(state): State<DashboardState>) -> Json<JobFilters> {
    Json(state.store.filters())
}

async fn update_filters_handler(
    State(state): State<DashboardState>,
    update: Result<Json<JobFiltersUpdate>, JsonRejection>,
) -> Result<Json<JobFilters>, ApiError> {
    let Json(update) = update?;
    Ok(Json(state.store.set_filters(update)))
}

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::queue::{Job, JobId, JobStatus, JobType, Queue};

#[derive(Clone)]
pub struct AppState {
    pub queue: Arc<Queue>,
}

#[derive(Deserialize)]
struct EnqueueRequest {
    #[serde(rename = "type")]
    job_type: JobType,
    #[serde(default)]
    priority: i32,
}

#[derive(Serialize)]
struct JobResponse {
    id: JobId,
    status: JobStatus,
    #[serde(rename = "type")]
    job_type: JobType,
    priority: i32,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            job_type: job.job_type,
            priority: job.priority,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
struct StatsResponse {
    pending: usize,
    in_progress: usize,
}

/// Build the HTTP surface over a shared queue.
pub fn router(queue: Arc<Queue>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/jobs/enqueue", post(enqueue_handler))
        .route("/jobs/dequeue", post(dequeue_handler))
        .route("/jobs/{id}", get(get_job_handler))
        .route("/jobs/{id}/conclude", post(conclude_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .layer(cors)
        .with_state(AppState { queue })
}

async fn enqueue_handler(
    State(state): State<AppState>,
    payload: Result<Json<EnqueueRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid job".to_string(),
            }),
        )
            .into_response();
    };

    let job = state.queue.enqueue(request.job_type, request.priority).await;
    (StatusCode::OK, Json(JobResponse::from(job))).into_response()
}

async fn dequeue_handler(State(state): State<AppState>) -> Response {
    match state.queue.dequeue().await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn get_job_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let job = match JobId::parse(&id) {
        Ok(id) => state.queue.get_job(id).await,
        Err(_) => None,
    };

    match job {
        Some(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Job not found".to_string(),
            }),
        )
            .into_response(),
    }
}

async fn conclude_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Ok(id) = JobId::parse(&id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Invalid job id".to_string(),
            }),
        )
            .into_response();
    };

    match state.queue.conclude(id).await {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(job))).into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.queue.stats().await;
    Json(StatsResponse {
        pending: stats.pending,
        in_progress: stats.in_progress,
    })
}

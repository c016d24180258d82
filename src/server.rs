//! HTTP server for the task API.
//!
//! Axum-based router and handlers. Handlers stay thin: parse the request,
//! call the service with today's date as the reference day, map the result
//! to JSON. All date-of-record decisions live in the service.

use axum::{
    Router,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::db;
use crate::error::{ApiError, ErrorCode};
use crate::nextdate::{self, DATE_FORMAT};
use crate::service::TaskService;
use crate::types::{CreatedResponse, TaskListResponse, TaskPayload};

/// Server state shared across handlers.
#[derive(Clone)]
pub struct SchedulerServer {
    service: Arc<TaskService>,
}

impl SchedulerServer {
    pub fn new(service: Arc<TaskService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TaskService {
        &self.service
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.code {
            ErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        };
        if !self.is_client_error() {
            error!("request failed: {}", self.message);
        }
        (status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Health check response.
#[derive(serde::Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `id` query parameter, kept as text so missing and malformed values get
/// distinct errors.
#[derive(Deserialize)]
struct IdQuery {
    id: Option<String>,
}

fn parse_id(query: &IdQuery) -> Result<i64, ApiError> {
    let raw = query
        .id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(ApiError::missing_id)?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_id(raw)),
    }
}

async fn create_task(
    State(state): State<SchedulerServer>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(payload) = payload.map_err(ApiError::invalid_body)?;
    let id = state.service().create(&payload, db::today())?;
    Ok(Json(CreatedResponse { id }))
}

async fn get_task(
    State(state): State<SchedulerServer>,
    Query(query): Query<IdQuery>,
) -> Result<Response, ApiError> {
    let id = parse_id(&query)?;
    let task = state.service().get(id)?;
    Ok(Json(task).into_response())
}

async fn update_task(
    State(state): State<SchedulerServer>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(ApiError::invalid_body)?;
    let task = state.service().update(&payload, db::today())?;
    Ok(Json(task).into_response())
}

async fn delete_task(
    State(state): State<SchedulerServer>,
    Query(query): Query<IdQuery>,
) -> Result<Response, ApiError> {
    let id = parse_id(&query)?;
    state.service().delete(id)?;
    Ok(Json(json!({})).into_response())
}

async fn list_tasks(
    State(state): State<SchedulerServer>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state.service().list_upcoming(db::today())?;
    Ok(Json(TaskListResponse { tasks }))
}

async fn complete_task(
    State(state): State<SchedulerServer>,
    Query(query): Query<IdQuery>,
) -> Result<Response, ApiError> {
    let id = parse_id(&query)?;
    state.service().complete(id, db::today())?;
    Ok(Json(json!({})).into_response())
}

#[derive(Deserialize)]
struct NextDateQuery {
    now: Option<String>,
    date: Option<String>,
    repeat: Option<String>,
}

/// Direct calculator endpoint. Plain-text responses, all parameters required.
async fn api_next_date(Query(query): Query<NextDateQuery>) -> Response {
    let now = query.now.filter(|s| !s.is_empty());
    let date = query.date.filter(|s| !s.is_empty());
    let repeat = query.repeat.filter(|s| !s.is_empty());
    let (Some(now), Some(date), Some(repeat)) = (now, date, repeat) else {
        return (
            StatusCode::BAD_REQUEST,
            "now, date and repeat parameters are required",
        )
            .into_response();
    };

    let Ok(now) = NaiveDate::parse_from_str(&now, DATE_FORMAT) else {
        return (
            StatusCode::BAD_REQUEST,
            "invalid now parameter, expected YYYYMMDD",
        )
            .into_response();
    };

    match nextdate::next_date(now, &date, &repeat) {
        Ok(next) => next.into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

/// Build the router with all routes.
pub fn build_router(service: Arc<TaskService>) -> Router {
    let state = SchedulerServer::new(service);

    // Permissive CORS so the API is usable from a locally served front end
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/task",
            get(get_task)
                .post(create_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/api/tasks", get(list_tasks))
        .route("/api/task/done", post(complete_task))
        .route("/api/nextdate", get(api_next_date))
        .route("/api/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the specified port.
///
/// Returns a oneshot sender that can be used to signal shutdown,
/// and the actual address the server is bound to.
pub async fn start_server(
    service: Arc<TaskService>,
    port: u16,
) -> anyhow::Result<(oneshot::Sender<()>, SocketAddr)> {
    let app = build_router(service);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("Scheduler listening on http://{}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Scheduler shutting down");
            })
            .await
        {
            error!("Server error: {}", e);
        }
    });

    Ok((shutdown_tx, bound_addr))
}

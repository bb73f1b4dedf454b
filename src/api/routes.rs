//! REST API handlers
//!
//! Status mapping:
//!
//! | Outcome              | Status |
//! |----------------------|--------|
//! | search results       | 200    |
//! | registration created | 201    |
//! | `InvalidInput`       | 400    |
//! | `ValidationError`    | 400    |
//! | `QueryFailed`        | 500    |
//! | `RegistrationFailed` | 500    |

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, SearchError};
use crate::matcher::{AvailabilityMatcher, SearchFilters};
use crate::models::{NewSubjectOffering, NewTutorProfile};
use crate::registration::{RegistrationCoordinator, RegistrationRequest};
use crate::schedule::RawScheduleSlot;
use crate::storage::SharedClassRepository;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub matcher: AvailabilityMatcher,
    pub coordinator: RegistrationCoordinator,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(repo: SharedClassRepository) -> Self {
        Self {
            matcher: AvailabilityMatcher::new(repo.clone()),
            coordinator: RegistrationCoordinator::new(repo),
            start_time: Instant::now(),
        }
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Simple error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Flat registration body
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub whatsapp: String,
    #[serde(default)]
    pub bio: String,
    pub subject: String,
    pub cost: f64,
    #[serde(default)]
    pub schedule: Vec<RawScheduleSlot>,
}

impl From<CreateClassRequest> for RegistrationRequest {
    fn from(body: CreateClassRequest) -> Self {
        Self {
            profile: NewTutorProfile {
                name: body.name,
                avatar: body.avatar,
                whatsapp: body.whatsapp,
                bio: body.bio,
            },
            offering: NewSubjectOffering {
                subject: body.subject,
                cost: body.cost,
            },
            schedule: body.schedule,
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/classes", get(list_classes).post(create_class))
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Availability search
async fn list_classes(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
) -> Response {
    let matcher = state.matcher.clone();
    let result = tokio::task::spawn_blocking(move || matcher.find_available(&filters)).await;

    match result {
        Ok(Ok(listings)) => (StatusCode::OK, Json(listings)).into_response(),
        Ok(Err(e @ SearchError::InvalidInput { .. })) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Ok(Err(SearchError::QueryFailed)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Availability search failed",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Search task panicked");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Availability search failed")
        }
    }
}

/// Tutor registration
async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<CreateClassRequest>, JsonRejection>,
) -> Response {
    // Malformed or mistyped bodies share the {"error": ...} shape of other 400s
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected class registration body");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let coordinator = state.coordinator.clone();
    let request = RegistrationRequest::from(body);
    let result = tokio::task::spawn_blocking(move || coordinator.register(&request)).await;

    match result {
        Ok(Ok(())) => StatusCode::CREATED.into_response(),
        Ok(Err(e @ RegistrationError::Validation { .. })) => {
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Ok(Err(RegistrationError::RegistrationFailed)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unexpected error while registering the class",
        ),
        Err(e) => {
            tracing::error!(error = %e, "Registration task panicked");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected error while registering the class",
            )
        }
    }
}

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use snowmint::{MonotonicClock, SnowmintGenerator};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Shared state: one generator for the whole process, plus the deployment
/// metadata reported by `/health`.
#[derive(Clone)]
pub struct AppState {
    generator: SnowmintGenerator<MonotonicClock>,
    config: Arc<ServerConfig>,
}

impl AppState {
    /// Builds the process-wide generator from a validated config.
    ///
    /// The machine ID was range-checked during config validation, so
    /// generator construction cannot fail here.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let clock = MonotonicClock::with_epoch(config.epoch);
        let generator = SnowmintGenerator::new(config.machine_id, clock)?;
        Ok(Self {
            generator,
            config: Arc::new(config),
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    machine_id: u64,
    pod_name: String,
    node_name: Option<String>,
    pod_uid: Option<String>,
    language: &'static str,
}

#[derive(Serialize)]
struct IdResponse {
    id: u64,
}

/// Builds the service router with its CORS and trace layers.
///
/// The deployment fronts this service with browser-facing tooling, hence the
/// permissive CORS policy.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate-id", get(generate_id))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health and deployment metadata. The machine ID is read back from the
/// generator itself, so the report reflects what actually gets stamped into
/// IDs rather than echoing the config.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "OK",
        machine_id: state.generator.machine_id(),
        pod_name: config.pod_name.clone(),
        node_name: config.node_name.clone(),
        pod_uid: config.pod_uid.clone(),
        language: "Rust",
    })
}

/// Issues one ID per request.
///
/// `next_id` absorbs sequence exhaustion and clock regression internally, so
/// the only reachable error is timestamp-field overflow decades from now.
async fn generate_id(State(state): State<AppState>) -> Result<Json<IdResponse>, (StatusCode, String)> {
    match state.generator.next_id() {
        Ok(id) => Ok(Json(IdResponse { id: id.to_raw() })),
        Err(e) => {
            tracing::error!("ID generation failed: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

//! HTTP API for the airdrop service

use super::error::{AirdropError, AirdropResult};
use super::history::EligibilitySnapshot;
use super::service::{AirdropRequest, AirdropResponse, AirdropService};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "rUSD Airdrop Server";

/// Build the application router
pub fn router(service: Arc<AirdropService>) -> Router {
    let config = service.config();
    let cors_enabled = config.cors_enabled;
    let metrics_enabled = config.metrics_enabled;

    let mut app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/airdrop", post(airdrop_handler))
        .route("/history/:wallet_address", get(history_handler));

    if metrics_enabled {
        app = app.route("/metrics", get(metrics_handler));
    }

    let mut app = app.with_state(service).layer(TraceLayer::new_for_http());

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        app = app.layer(cors);
        info!("CORS enabled");
    }

    app
}

/// Airdrop handler
pub async fn airdrop_handler(
    State(service): State<Arc<AirdropService>>,
    Json(request): Json<AirdropRequest>,
) -> AirdropResult<Json<AirdropResponse>> {
    info!("Airdrop request: wallet={}, amount={:?}", request.wallet_address, request.amount);

    // Run detached so a client disconnect cannot cancel a mint halfway
    let dispatch = tokio::spawn(async move { service.dispatch(request).await });

    match dispatch.await {
        Ok(Ok(response)) => Ok(Json(response)),
        Ok(Err(e)) => {
            error!("Airdrop error: {}", e);
            Err(e)
        }
        Err(join_error) => {
            error!("Airdrop task aborted: {}", join_error);
            Err(AirdropError::Internal(join_error.to_string()))
        }
    }
}

/// History handler
pub async fn history_handler(
    State(service): State<Arc<AirdropService>>,
    Path(wallet_address): Path<String>,
) -> Json<EligibilitySnapshot> {
    Json(service.history(&wallet_address))
}

/// Health check handler
pub async fn health_handler(State(service): State<Arc<AirdropService>>) -> impl IntoResponse {
    let config = service.config();
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "airdrop_amount": json_number(config.airdrop_amount),
        "cooldown_hours": json_number(config.cooldown_hours)
    }))
}

/// Whole values render as JSON integers (`50`, not `50.0`)
fn json_number(value: f64) -> serde_json::Value {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serde_json::Value::from(value as i64)
    } else {
        serde_json::Value::from(value)
    }
}

/// Prometheus metrics handler
pub async fn metrics_handler(
    State(service): State<Arc<AirdropService>>,
) -> Result<String, StatusCode> {
    match service.metrics().gather() {
        Ok(metrics_text) => Ok(metrics_text),
        Err(err) => {
            error!("Failed to gather metrics: {}", err);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

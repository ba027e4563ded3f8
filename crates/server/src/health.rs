use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use samalook_store::CatalogDocument;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    document: CatalogDocument,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub checked_at: String,
}

pub fn router(document: CatalogDocument) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { document })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state.document).await;
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "samalook-server runtime initialized".to_string(),
        },
        catalog,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

async fn catalog_check(document: &CatalogDocument) -> HealthCheck {
    match document.read().await {
        Ok(Some(catalog)) => HealthCheck {
            status: "ready",
            detail: format!("catalog document readable ({} products)", catalog.product_count()),
        },
        Ok(None) => HealthCheck {
            status: "ready",
            detail: "catalog document not created yet; first write will create it".to_string(),
        },
        Err(error) => HealthCheck { status: "degraded", detail: error.to_string() },
    }
}

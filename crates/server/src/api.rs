//! Catalog JSON API consumed by the storefront and the back office.
//!
//! - `GET    /api/products`: full catalog, grouped by category
//! - `POST   /api/products`: add a product to a category (admin)
//! - `DELETE /api/products/{id}`: remove a product wherever it lives (admin)

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use samalook_core::domain::catalog::Catalog;
use samalook_core::domain::product::{Product, ProductId, ProductInput};
use samalook_core::errors::{ApplicationError, DomainError, InterfaceError};
use samalook_store::CatalogRepository;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::auth::{AdminAccess, AdminGate};

const MISSING_FIELDS: &str = "Category and product data are required";

#[derive(Clone)]
pub struct CatalogState {
    pub(crate) repository: Arc<dyn CatalogRepository>,
    pub(crate) admin_gate: AdminGate,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub category: Option<String>,
    pub product: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

/// Interface error rendered as `{"error": ...}` with the matching status code.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self(
            ApplicationError::from(DomainError::InvalidRequest(message.into()))
                .into_interface(correlation_id()),
        )
    }
}

impl From<ApplicationError> for ApiError {
    fn from(value: ApplicationError) -> Self {
        Self(value.into_interface(correlation_id()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let interface = self.0;
        let (status, message) = match &interface {
            InterfaceError::BadRequest { message, .. } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            InterfaceError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, interface.user_message().to_string())
            }
            InterfaceError::Unauthorized { .. } => {
                (StatusCode::UNAUTHORIZED, interface.user_message().to_string())
            }
            InterfaceError::ServiceUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, interface.user_message().to_string())
            }
            InterfaceError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, interface.user_message().to_string())
            }
        };

        if status.is_server_error() {
            error!(
                event_name = "api.request.failed",
                correlation_id = %interface.correlation_id(),
                error = %interface,
                "catalog request failed"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %interface.correlation_id(),
                error = %interface,
                "catalog request rejected"
            );
        }

        let body =
            ErrorBody { error: message, correlation_id: interface.correlation_id().to_string() };
        (status, Json(body)).into_response()
    }
}

pub fn router(repository: Arc<dyn CatalogRepository>, admin_gate: AdminGate) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/{id}", delete(delete_product))
        .with_state(CatalogState { repository, admin_gate })
}

async fn list_products(State(state): State<CatalogState>) -> Result<Json<Catalog>, ApiError> {
    let catalog = state.repository.list().await.map_err(ApplicationError::from)?;
    Ok(Json(catalog))
}

async fn create_product(
    State(state): State<CatalogState>,
    _admin: AdminAccess,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(event_name = "api.products.body_rejected", error = %rejection, "unreadable body");
        ApiError::bad_request(MISSING_FIELDS)
    })?;
    let (category, input) = validate_create(request)?;

    let product = state.repository.create(&category, input).await.map_err(ApplicationError::from)?;

    info!(
        event_name = "api.products.created",
        category = %category,
        product_id = %product.id,
        "product created via api"
    );
    Ok((StatusCode::CREATED, Json(product)))
}

async fn delete_product(
    State(state): State<CatalogState>,
    _admin: AdminAccess,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    // Non-numeric ids can never match a stored product.
    let id = raw_id
        .trim()
        .parse::<u64>()
        .map(ProductId)
        .map_err(|_| ApplicationError::from(DomainError::ProductNotFound(ProductId(0))))?;

    let found = state.repository.delete_by_id(id).await.map_err(ApplicationError::from)?;
    if !found {
        return Err(ApplicationError::from(DomainError::ProductNotFound(id)).into());
    }

    info!(event_name = "api.products.deleted", product_id = %id, "product deleted via api");
    Ok(Json(DeleteResponse { message: "Product deleted successfully".to_string() }))
}

fn validate_create(request: CreateProductRequest) -> Result<(String, ProductInput), ApiError> {
    let category = request.category.filter(|category| !category.trim().is_empty());
    let product = request.product.filter(Value::is_object);
    let (Some(category), Some(product)) = (category, product) else {
        return Err(ApiError::bad_request(MISSING_FIELDS));
    };

    let input: ProductInput = serde_json::from_value(product)
        .map_err(|error| ApiError::bad_request(format!("product is invalid: {error}")))?;
    if let Some(field) = input.first_blank_field() {
        return Err(ApiError::bad_request(format!("product.{field} is required")));
    }

    Ok((category, input))
}

fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    Router,
};
use samalook_core::config::AppConfig;
use samalook_store::{CatalogDocument, JsonFileCatalogRepository};
use thiserror::Error;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{api, auth::AdminGate, auth::ADMIN_SECRET_HEADER, health};

pub struct Application {
    pub config: AppConfig,
    pub document: CatalogDocument,
    pub repository: Arc<JsonFileCatalogRepository>,
    pub admin_gate: AdminGate,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("server.static_dir `{0}` is not a directory")]
    StaticDir(PathBuf),
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    if let Some(static_dir) = &config.server.static_dir {
        if !static_dir.is_dir() {
            return Err(BootstrapError::StaticDir(static_dir.clone()));
        }
    }

    let document = CatalogDocument::new(&config.storage.catalog_path);
    match document.read().await {
        Ok(Some(catalog)) => info!(
            event_name = "system.bootstrap.catalog_loaded",
            correlation_id = "bootstrap",
            path = %document.path().display(),
            products = catalog.product_count(),
            "catalog document loaded"
        ),
        Ok(None) => info!(
            event_name = "system.bootstrap.catalog_absent",
            correlation_id = "bootstrap",
            path = %document.path().display(),
            "catalog document absent; starting with an empty catalog"
        ),
        Err(error) => warn!(
            event_name = "system.bootstrap.catalog_unreadable",
            correlation_id = "bootstrap",
            error = %error,
            "catalog document unreadable; the next write will replace it"
        ),
    }

    let repository = Arc::new(JsonFileCatalogRepository::new(
        document.clone(),
        config.storage.write_failure_policy,
    ));
    let admin_gate = AdminGate::new(config.admin.secret.clone());
    if !admin_gate.is_enabled() {
        warn!(
            event_name = "system.bootstrap.admin_open",
            correlation_id = "bootstrap",
            "admin.secret is not set; catalog mutations are unauthenticated"
        );
    }

    Ok(Application { config, document, repository, admin_gate })
}

impl Application {
    pub fn router(&self) -> Router {
        let mut router = api::router(self.repository.clone(), self.admin_gate.clone())
            .merge(health::router(self.document.clone()));

        if let Some(static_dir) = &self.config.server.static_dir {
            let spa_entry = ServeFile::new(static_dir.join("index.html"));
            router = router.fallback_service(ServeDir::new(static_dir).fallback(spa_entry));
        }

        router
            .layer(cors_layer(&self.config.server.allowed_origins))
            .layer(TraceLayer::new_for_http())
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    event_name = "system.cors.origin_skipped",
                    origin = %origin,
                    "unusable origin"
                );
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_SECRET_HEADER),
        ])
}

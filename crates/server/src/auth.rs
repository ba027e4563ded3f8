use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use samalook_core::errors::InterfaceError;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::api::{ApiError, CatalogState};

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// Shared-secret check guarding catalog mutations. Without a configured secret every
/// caller is admitted.
#[derive(Clone, Debug, Default)]
pub struct AdminGate {
    secret: Option<SecretString>,
}

impl AdminGate {
    pub fn new(secret: Option<SecretString>) -> Self {
        Self { secret }
    }

    pub fn is_enabled(&self) -> bool {
        self.secret.is_some()
    }

    pub fn admits(&self, headers: &HeaderMap) -> bool {
        let Some(secret) = &self.secret else {
            return true;
        };

        presented_secret(headers)
            .is_some_and(|presented| presented.as_bytes() == secret.expose_secret().as_bytes())
    }
}

fn presented_secret(headers: &HeaderMap) -> Option<&str> {
    if let Some(value) = headers.get(ADMIN_SECRET_HEADER).and_then(|value| value.to_str().ok()) {
        return Some(value.trim());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Extractor proving the request passed the admin gate.
pub struct AdminAccess;

impl FromRequestParts<CatalogState> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CatalogState,
    ) -> Result<Self, Self::Rejection> {
        if state.admin_gate.admits(&parts.headers) {
            return Ok(Self);
        }

        Err(ApiError(InterfaceError::Unauthorized {
            message: format!("{} {} without a valid admin secret", parts.method, parts.uri.path()),
            correlation_id: Uuid::new_v4().simple().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue};

    use super::{AdminGate, ADMIN_SECRET_HEADER};

    fn headers(name: &'static str, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn open_gate_admits_anonymous_callers() {
        let gate = AdminGate::default();

        assert!(!gate.is_enabled());
        assert!(gate.admits(&HeaderMap::new()));
    }

    #[test]
    fn configured_gate_checks_header_and_bearer_token() {
        let gate = AdminGate::new(Some("samalook2024".to_string().into()));

        assert!(gate.is_enabled());
        assert!(!gate.admits(&HeaderMap::new()));
        assert!(!gate.admits(&headers(ADMIN_SECRET_HEADER, "wrong")));
        assert!(gate.admits(&headers(ADMIN_SECRET_HEADER, "samalook2024")));
        assert!(gate.admits(&headers("authorization", "Bearer samalook2024")));
        assert!(!gate.admits(&headers("authorization", "Basic samalook2024")));
    }
}

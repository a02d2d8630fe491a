use crate::config::ConfigError;
use crate::registry::{RegistryError, StoreError, TransitionDenied};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Registry(RegistryError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AppError::Registry(RegistryError::DuplicateEmail) => StatusCode::BAD_REQUEST,
            AppError::Registry(RegistryError::Denied(TransitionDenied::RoleNotPermitted {
                ..
            })) => StatusCode::FORBIDDEN,
            AppError::Registry(RegistryError::Denied(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Registry(RegistryError::Store(StoreError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Registry(RegistryError::Store(StoreError::Conflict)) => StatusCode::CONFLICT,
            AppError::Registry(RegistryError::Store(StoreError::Backend(_)))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_denials_map_to_forbidden_or_unprocessable() {
        let forbidden = AppError::Registry(RegistryError::Denied(
            TransitionDenied::RoleNotPermitted {
                role: "officer".to_string(),
                requested: "recommended".to_string(),
            },
        ));
        assert_eq!(
            forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );

        let unprocessable =
            AppError::Registry(RegistryError::Denied(TransitionDenied::StallNumberRequired));
        assert_eq!(
            unprocessable.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn auth_and_store_errors_keep_their_status_codes() {
        let unauthorized = AppError::Registry(RegistryError::InvalidCredentials);
        assert_eq!(
            unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );

        let duplicate = AppError::Registry(RegistryError::DuplicateEmail);
        assert_eq!(
            duplicate.into_response().status(),
            StatusCode::BAD_REQUEST
        );

        let missing = AppError::Registry(RegistryError::Store(StoreError::NotFound));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}

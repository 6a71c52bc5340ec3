use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use samstore_core::{CatalogError, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(ValidationError::DuplicateValue { .. }) => {
                Self::conflict(err.to_string())
            }
            CatalogError::Validation(_) | CatalogError::Cycle { .. } => {
                Self::bad_request(err.to_string())
            }
            CatalogError::NotFound { .. } => Self::not_found(err.to_string()),
            CatalogError::ReferentialIntegrity { .. } => Self::conflict(err.to_string()),
            CatalogError::OrderContention { .. } => {
                tracing::warn!(error = %err, "order assignment gave up");
                Self::unavailable(err.to_string())
            }
            CatalogError::Database(_) => {
                tracing::error!(error = ?err, "database operation failed");
                Self::internal("Database operation failed")
            }
            CatalogError::Internal(_) => {
                tracing::error!(error = ?err, "internal error");
                Self::internal("Internal server error")
            }
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samstore_model::ProductId;
    use samstore_core::catalog::ordering::OrderGroup;

    fn status_of(err: CatalogError) -> StatusCode {
        AppError::from(err).status
    }

    #[test]
    fn catalog_errors_map_to_http_statuses() {
        let group = OrderGroup::ProductLines(ProductId(1));

        assert_eq!(
            status_of(ValidationError::DuplicateOrder { group, order: 1 }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ValidationError::NoFreeOrder { group }.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                ValidationError::DuplicateValue {
                    entity: "category",
                    field: "slug"
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CatalogError::not_found("category", 7)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CatalogError::ReferentialIntegrity {
                entity: "category",
                key: "1".into(),
                referenced_by: "categories",
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(CatalogError::Cycle {
                entity: "category",
                node: "1".into(),
                parent: "2".into(),
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CatalogError::OrderContention { group, attempts: 3 }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(CatalogError::Database("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let err = AppError::from(CatalogError::Database("password=hunter2".into()));
        assert_eq!(err.message, "Database operation failed");
    }
}

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ferrous_zones_domain::DomainError;
use serde_json::json;
use tracing::error;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DomainError::InvalidSyncPayload(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(DomainError::InvalidSyncPayload(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::MissingSyncToken => (StatusCode::UNAUTHORIZED, self.0.to_string()),
            DomainError::InvalidSyncToken => (StatusCode::FORBIDDEN, self.0.to_string()),
            DomainError::NotMaster => (StatusCode::FORBIDDEN, "not a master".to_string()),
            DomainError::NotSlave => (StatusCode::FORBIDDEN, "not a slave".to_string()),

            DomainError::NotFound(_)
            | DomainError::ZoneNotFound(_)
            | DomainError::SlaveNotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),

            DomainError::InvalidDomainName(_)
            | DomainError::InvalidIpAddress(_)
            | DomainError::InvalidRecord(_)
            | DomainError::InvalidZone(_)
            | DomainError::InvalidSyncPayload(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),

            DomainError::ZoneAlreadyExists(_) => (StatusCode::CONFLICT, self.0.to_string()),

            other => {
                error!(error = %other, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tatra_catalog::CatalogError;
use tatra_core::{StoreError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Tour not found")]
    TourNotFound,

    /// Storage failed; `context` is what the client sees
    #[error("{context}")]
    Persistence {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    /// Map a store error, keeping NotFound as a 404.
    pub fn store(err: StoreError, context: &'static str) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::BookingNotFound,
            source => AppError::Persistence { context, source },
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::UnknownTour(_) => AppError::TourNotFound,
            CatalogError::InvalidParticipants(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::BookingNotFound | AppError::TourNotFound => StatusCode::NOT_FOUND,
            AppError::Persistence { context, source } => {
                tracing::error!("{}: {}", context, source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "success": false,
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

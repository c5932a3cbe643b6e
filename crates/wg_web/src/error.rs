use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use wg_core::GatewayError;

/// JSON error body: `{"detail": "..."}`, plus the candidates for ambiguous titles.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

pub enum ApiError {
    Gateway(GatewayError),
    /// The request itself could not be parsed
    Rejected { status: StatusCode, detail: String },
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Gateway(err) => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let detail = err.to_string();
                let options = match err {
                    GatewayError::AmbiguousTitle { options, .. } => options,
                    _ => Vec::new(),
                };
                (status, ErrorBody { detail, options })
            }
            ApiError::Rejected { status, detail } => (
                status,
                ErrorBody {
                    detail,
                    options: Vec::new(),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

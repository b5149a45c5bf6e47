//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use leadroute_core::db::DbError;
use leadroute_core::RepoError;
use log::{error, warn};
use serde_json::json;

/// Failure of one API request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Repo(RepoError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Repo(RepoError::Conflict(_)) => (StatusCode::CONFLICT, "conflict"),
            Self::Repo(RepoError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation")
            }
            Self::Repo(RepoError::Db(_) | RepoError::InvalidData(_))
            | Self::Db(_)
            | Self::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        if status.is_server_error() {
            error!(
                "event=api_error module=api status=error kind={} error={}",
                kind, self
            );
        } else {
            warn!(
                "event=api_error module=api status=rejected kind={} error={}",
                kind, self
            );
        }

        let body = Json(json!({
            "error": kind,
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

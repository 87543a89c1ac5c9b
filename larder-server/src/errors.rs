use axum::{
    http,
    response::{IntoResponse, Response},
    Json,
};
use larder::generation::ErrorBody;

use crate::backend::BackendError;

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Invalid generation request: {0}")]
    Request(#[from] serde_json::Error),
    #[error("{0}")]
    Backend(#[from] BackendError),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        // Every failure on this endpoint is a 500 with an explanation
        let error = self.to_string();
        tracing::error!(%error, "generation request failed");
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error }),
        )
            .into_response()
    }
}

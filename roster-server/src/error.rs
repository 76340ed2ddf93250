use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::{PlayerError, Rejected};
use roster_database::{PlayerPayload, ValidationError};
use serde_json::json;
use tracing::{error, info};

/// Error outcome of a player endpoint, rendered as `{"error": ...}`.
#[derive(Debug)]
pub enum ApiError {
    Player(PlayerError),
    /// Creation failed; the rejected input is echoed back.
    Rejected(Rejected),
    /// Decoded body failed validation before reaching the service.
    InvalidBody {
        error: ValidationError,
        input: PlayerPayload,
    },
    /// Path, query or body could not be decoded at all.
    Malformed(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Player(err) | ApiError::Rejected(Rejected { error: err, .. }) => {
                status_for(err)
            }
            ApiError::InvalidBody { .. } | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn status_for(err: &PlayerError) -> StatusCode {
    match err {
        PlayerError::Validation(_) | PlayerError::InvalidId(_) => StatusCode::BAD_REQUEST,
        PlayerError::NotFound(_) => StatusCode::NOT_FOUND,
        PlayerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(err: &PlayerError) -> String {
    match err {
        PlayerError::Storage(_) => "internal error".to_owned(),
        other => other.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Player(err) => {
                log_player_error(err);
                json!({ "error": public_message(err) })
            }
            ApiError::Rejected(rejected) => {
                log_player_error(&rejected.error);
                json!({ "error": public_message(&rejected.error), "player": rejected.input })
            }
            ApiError::InvalidBody { error, input } => {
                info!(%error, "player body rejected");
                json!({ "error": error.to_string(), "player": input })
            }
            ApiError::Malformed(message) => {
                info!(%message, "malformed request");
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

fn log_player_error(err: &PlayerError) {
    match err {
        PlayerError::Storage(source) => error!(?source, "player storage failure"),
        other => info!(error = %other, "player request rejected"),
    }
}

impl From<PlayerError> for ApiError {
    fn from(err: PlayerError) -> Self {
        ApiError::Player(err)
    }
}

impl From<Rejected> for ApiError {
    fn from(rejected: Rejected) -> Self {
        ApiError::Rejected(rejected)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Player(PlayerError::Validation(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

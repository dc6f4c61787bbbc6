use axum::http::{ header::CONTENT_TYPE, StatusCode };
use axum::response::{ IntoResponse, Response };
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid or missing JSON body")]
    InvalidBody,

    #[error("Request body must include a 'messages' array")]
    MissingMessages,

    #[error("Only POST requests are allowed.")]
    MethodNotAllowed,

    #[error("Upstream API key not configured on relay")]
    CredentialNotConfigured,

    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    /// Upstream answered with a non-success status; status and body are passed through.
    #[error("{body}")]
    UpstreamError { status: StatusCode, body: String },

    #[error("Upstream returned an unreadable response: {0}")]
    InvalidUpstreamResponse(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidBody | RelayError::MissingMessages => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::CredentialNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::UpstreamUnreachable(_) | RelayError::InvalidUpstreamResponse(_) =>
                StatusCode::BAD_GATEWAY,
            RelayError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            RelayError::UpstreamError { status, .. } => *status,
        }
    }

    /// Whether the caller is at fault, as opposed to the relay or the upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RelayError::InvalidBody | RelayError::MissingMessages | RelayError::MethodNotAllowed
        )
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTimeout(err.to_string())
        } else {
            RelayError::UpstreamUnreachable(err.to_string())
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), [(CONTENT_TYPE, "text/plain; charset=utf-8")], self.to_string()).into_response()
    }
}

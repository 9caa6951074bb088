use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server responded {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session storage error: {0}")]
    Storage(String),
    #[error("Invalid input: {0}")]
    Input(String),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Server-supplied `message` field, falling back to the raw body.
    pub fn server_message(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } => Some(message_from_body(body)),
            _ => None,
        }
    }
}

fn message_from_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// What went wrong, as far as the user is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// 400
    BadRequest,
    /// 401
    Unauthorized(String),
    /// 409
    Conflict(String),
    /// 504: the upstream is down.
    ServerClosed,
    /// No HTTP response at all.
    Unreachable(String),
    /// Anything else; carries the body as-is.
    Other(String),
}

impl Failure {
    pub fn classify(err: &ApiError) -> Self {
        match err {
            ApiError::Status { status, body } => match *status {
                StatusCode::BAD_REQUEST => Failure::BadRequest,
                StatusCode::UNAUTHORIZED => Failure::Unauthorized(message_from_body(body)),
                StatusCode::CONFLICT => Failure::Conflict(message_from_body(body)),
                StatusCode::GATEWAY_TIMEOUT => Failure::ServerClosed,
                _ => Failure::Other(body.clone()),
            },
            ApiError::Transport(e) if e.status().is_none() => Failure::Unreachable(e.to_string()),
            other => Failure::Other(other.to_string()),
        }
    }
}

use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to the todo service failed: {0}")]
    Transport(reqwest::Error),
    #[error("the todo service rejected the request ({status})")]
    Rejected { status: StatusCode },
    #[error("the todo service sent an unreadable response: {0}")]
    Decode(reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err)
        } else {
            Self::Transport(err)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("The todo's title must be at least 3 characters long, not including white space")]
    InvalidTitle,
    #[error("You cannot complete a todo you haven't added yet")]
    NotCreated,
    #[error("The change did not go through: {0}")]
    Remote(#[from] ApiError),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<IntentError> for AppError {
    fn from(err: IntentError) -> Self {
        match err {
            IntentError::Remote(_) => Self::bad_gateway(err.to_string()),
            IntentError::InvalidTitle | IntentError::NotCreated => {
                Self::unprocessable(err.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

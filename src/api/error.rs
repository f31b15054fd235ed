use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status, with the server-provided message if any
    #[error("{}", status_message(.status, .message))]
    Status { status: u16, message: Option<String> },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response is missing its data")]
    MissingData,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn status_message(status: &u16, message: &Option<String>) -> String {
    match message.as_deref() {
        Some(message) if !message.trim().is_empty() => message.to_string(),
        _ => format!("Request failed (HTTP {})", status),
    }
}

impl ApiError {
    /// Message suitable for a notification or an error panel
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { .. } => self.to_string(),
            ApiError::Transport(e) if e.is_timeout() => "The server took too long to respond".into(),
            ApiError::Transport(_) => "Could not reach the server".into(),
            ApiError::Decode(_) | ApiError::MissingData => {
                "The server sent an unexpected response".into()
            }
            ApiError::InvalidUrl(_) => "The server address is invalid".into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_uses_server_message() {
        let err = ApiError::Status { status: 400, message: Some("title too long".into()) };
        assert_eq!(err.to_string(), "title too long");
        assert_eq!(err.user_message(), "title too long");
    }

    #[test]
    fn test_status_without_message_is_generic() {
        let err = ApiError::Status { status: 502, message: None };
        assert_eq!(err.to_string(), "Request failed (HTTP 502)");
    }

    #[test]
    fn test_status_with_blank_message_is_generic() {
        let err = ApiError::Status { status: 500, message: Some("  ".into()) };
        assert_eq!(err.to_string(), "Request failed (HTTP 500)");
    }

    #[test]
    fn test_missing_data_user_message() {
        assert_eq!(ApiError::MissingData.user_message(), "The server sent an unexpected response");
        assert_eq!(ApiError::MissingData.status(), None);
    }
}

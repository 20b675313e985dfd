use thiserror::Error;

/// Fallback message for application errors whose envelope carries no message
pub const DEFAULT_APPLICATION_MESSAGE: &str = "Error";

/// Fallback message for transport failures with no display text
pub const DEFAULT_TRANSPORT_MESSAGE: &str = "Request Error";

/// Application error codes the backend uses for authentication failures.
/// Bad credentials, missing token, and unknown user all land in this band.
const AUTH_ERROR_CODES: std::ops::RangeInclusive<i64> = 2000..=2999;

#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP 2xx whose envelope reported a non-zero business code
    #[error("{message}")]
    Application { code: i64, message: String },

    #[error("Unauthorized - token rejected by the server")]
    Unauthorized,

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Whether the server rejected the session itself, as opposed to the
    /// particular request
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ApiError::Unauthorized => true,
            ApiError::Application { code, .. } => AUTH_ERROR_CODES.contains(code),
            _ => false,
        }
    }

    /// Message shown to the user in the status line for this failure
    pub fn notification_message(&self) -> String {
        match self {
            ApiError::Application { message, .. } if !message.is_empty() => message.clone(),
            ApiError::Application { .. } => DEFAULT_APPLICATION_MESSAGE.to_string(),
            other => {
                let message = other.to_string();
                if message.is_empty() {
                    DEFAULT_TRANSPORT_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_taxonomy() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::FORBIDDEN, "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::NOT_FOUND, ""),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_auth_failure_detection() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(ApiError::Application {
            code: 2001,
            message: "Invalid credentials".into()
        }
        .is_auth_failure());
        assert!(ApiError::Application {
            code: 2999,
            message: String::new()
        }
        .is_auth_failure());

        assert!(!ApiError::Application {
            code: 1000,
            message: "Validation failed".into()
        }
        .is_auth_failure());
        assert!(!ApiError::Application {
            code: 3000,
            message: "Not found".into()
        }
        .is_auth_failure());
        assert!(!ApiError::NotFound(String::new()).is_auth_failure());
        assert!(!ApiError::ServerError(String::new()).is_auth_failure());
    }

    #[test]
    fn test_notification_message_defaults() {
        let with_message = ApiError::Application {
            code: 1000,
            message: "Project name is required".into(),
        };
        assert_eq!(with_message.notification_message(), "Project name is required");

        let without_message = ApiError::Application {
            code: 5000,
            message: String::new(),
        };
        assert_eq!(without_message.notification_message(), "Error");
    }

    #[test]
    fn test_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        let text = err.to_string();
        assert!(text.len() < 700);
        assert!(text.contains("truncated"));
    }
}

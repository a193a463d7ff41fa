use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Backend errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Error bodies differ between the auth and table endpoints
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(msg),
            StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(msg),
            StatusCode::CONFLICT => ApiError::Conflict(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }

    /// Build an error from a failed response body, extracting the backend's message
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        Self::from_status(status, extract_message(body))
    }

    /// Errors returned by the sign-in and sign-up endpoints are credential problems
    pub fn from_auth_body(status: StatusCode, body: &str) -> Self {
        let msg = extract_message(body);
        if status.is_client_error() {
            let msg = if msg.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                msg
            };
            ApiError::AuthenticationFailed(msg)
        } else {
            Self::from_status(status, msg)
        }
    }

    /// Whether the error means the stored session can no longer be used
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ApiError::AuthenticationFailed(_) | ApiError::Unauthorized(_) | ApiError::NotAuthenticated
        )
    }
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error_description
            .or(parsed.msg)
            .or(parsed.message)
            .or(parsed.error)
            .unwrap_or_default(),
        Err(_) => body.trim().to_string(),
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_extraction() {
        let err = ApiError::from_auth_body(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Authentication failed: Invalid login credentials");

        let err = ApiError::from_auth_body(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"code":422,"msg":"User already registered"}"#,
        );
        assert!(matches!(err, ApiError::AuthenticationFailed(ref m) if m == "User already registered"));

        let err = ApiError::from_body(
            StatusCode::CONFLICT,
            r#"{"code":"23505","message":"duplicate key value violates unique constraint"}"#,
        );
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_empty_body_uses_reason() {
        let err = ApiError::from_body(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(err.to_string(), "Server error: Service Unavailable");
    }

    #[test]
    fn test_plain_text_body() {
        let err = ApiError::from_body(StatusCode::NOT_FOUND, "no such table\n");
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "no such table"));
    }
}

use reqwest::StatusCode;
use std::fmt;

/// Non-2xx answer from the backend. Returned inside `anyhow::Error`; use
/// `downcast_ref::<ApiStatusError>()` to inspect it.
#[derive(Debug, Clone)]
pub struct ApiStatusError {
    pub method: &'static str,
    pub path: String,
    pub status: StatusCode,
    pub body: String,
}

impl ApiStatusError {
    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }
}

impl fmt::Display for ApiStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request failed with status {} ({} {})",
            self.status, self.method, self.path
        )
    }
}

impl std::error::Error for ApiStatusError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_detected_and_displayed() {
        let err = ApiStatusError {
            method: "GET",
            path: "/api/stocks/missing".to_string(),
            status: StatusCode::NOT_FOUND,
            body: r#"{"error":"Stock not found"}"#.to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "request failed with status 404 Not Found (GET /api/stocks/missing)"
        );
    }

    #[test]
    fn server_error_is_not_not_found() {
        let err = ApiStatusError {
            method: "POST",
            path: "/api/sync".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: String::new(),
        };
        assert!(!err.is_not_found());
    }
}

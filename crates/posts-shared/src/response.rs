//! Response bodies shared by every post route.

use serde::{Deserialize, Serialize};

/// Envelope for successful reads: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Problem details body (RFC 7807) returned by every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    /// What went wrong with this request. Left out for server faults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    fn problem(status: u16, title: &str, detail: Option<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.to_string(),
            status,
            detail,
        }
    }

    /// Rejected payload: malformed JSON or a missing or blank required field.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::problem(400, "Bad Request", Some(detail.into()))
    }

    /// No live post under the requested id or slug.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::problem(404, "Not Found", Some(detail.into()))
    }

    /// Store failure. The cause is logged, never returned.
    pub fn internal_error() -> Self {
        Self::problem(500, "Internal Server Error", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_problem() {
        let body = serde_json::to_value(ErrorResponse::not_found("post 42")).unwrap();
        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["title"], "Not Found");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "post 42");
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let body = serde_json::to_value(ErrorResponse::internal_error()).unwrap();
        assert_eq!(body["status"], 500);
        assert!(body.get("detail").is_none());
    }

    #[test]
    fn test_ok_envelope() {
        let body = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
    }
}

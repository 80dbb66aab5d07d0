use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Error taxonomy for the API. Every failure a handler can surface maps
/// onto one variant, which fixes both the HTTP status and the
/// machine-readable `code` in the response envelope.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or out-of-range input; rejected before any storage call
    Validation(Vec<String>),
    /// Unique-constraint violation (username/email already taken)
    Conflict(&'static str),
    /// Missing, invalid or expired token -- sub-reason never leaks
    Unauthenticated(&'static str),
    /// Valid identity, wrong owner
    Forbidden(&'static str),
    NotFound(&'static str),
    /// Unexpected storage/runtime failure; detail is logged, not exposed
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Validation(_) => "Validation failed",
            ApiError::Conflict(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg) => msg,
            ApiError::Internal(_) => "Internal server error",
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref e) = self {
            tracing::error!("Internal error: {:#}", e);
        }
        let mut body = json!({
            "success": false,
            "message": self.message(),
            "code": self.code(),
        });
        if let ApiError::Validation(ref errors) = self {
            body["errors"] = json!(errors);
        }
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation(vec![]).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Unauthenticated("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_mapping() {
        assert_eq!(ApiError::Validation(vec![]).code(), "VALIDATION_ERROR");
        assert_eq!(ApiError::Conflict("x").code(), "CONFLICT");
        assert_eq!(ApiError::Unauthenticated("x").code(), "UNAUTHENTICATED");
        assert_eq!(ApiError::Forbidden("x").code(), "FORBIDDEN");
        assert_eq!(ApiError::NotFound("x").code(), "NOT_FOUND");
        assert_eq!(ApiError::Internal(anyhow::anyhow!("boom")).code(), "INTERNAL");
    }

    #[test]
    fn test_internal_hides_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("connection to 10.0.0.3 refused"));
        assert_eq!(err.message(), "Internal server error");
    }

    #[tokio::test]
    async fn test_validation_envelope_carries_errors() {
        use http_body_util::BodyExt;

        let response = ApiError::Validation(vec![
            "title must not be empty".to_string(),
            "limit must be between 1 and 100".to_string(),
        ])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], json!(false));
        assert_eq!(json["code"], json!("VALIDATION_ERROR"));
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_non_validation_envelope_has_no_errors_field() {
        use http_body_util::BodyExt;

        let response = ApiError::NotFound("Todo not found").into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], json!(false));
        assert_eq!(json["message"], json!("Todo not found"));
        assert!(json.get("errors").is_none());
    }
}

//! Error response handling for the HTTP layer.
//!
//! This module implements `IntoResponse` for `AuthError` to provide
//! FHIR-compliant error responses (OperationOutcome format). Denials from
//! the resource access guard map straight onto the wire here: inactive
//! applications and ended studies as 401 with a `WWW-Authenticate`
//! header, ownership and scope failures as indistinguishable 404s.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, oauth_error, issue_code, message) = error_details(&self);

        // Build FHIR OperationOutcome response
        let body = json!({
            "resourceType": "OperationOutcome",
            "issue": [{
                "severity": "error",
                "code": issue_code,
                "details": {
                    "coding": [{
                        "system": "https://tools.ietf.org/html/rfc6749",
                        "code": oauth_error
                    }]
                },
                "diagnostics": message
            }]
        });

        // Build headers
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/fhir+json"),
        );

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = build_www_authenticate_header(oauth_error, &message);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Extracts error details from an AuthError.
///
/// Returns (HTTP status, OAuth error code, FHIR issue code, message).
fn error_details(error: &AuthError) -> (StatusCode, &'static str, &'static str, String) {
    match error {
        AuthError::ApplicationInactive { message } => (
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            "security",
            message.clone(),
        ),
        AuthError::StudyExpired { message } => (
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            "security",
            message.clone(),
        ),
        AuthError::MissingCrosswalk => (
            StatusCode::FORBIDDEN,
            "access_denied",
            "forbidden",
            error.to_string(),
        ),
        AuthError::ResourceNotFound => (
            StatusCode::NOT_FOUND,
            "invalid_request",
            "not-found",
            error.to_string(),
        ),
        AuthError::UnsupportedResourceType { .. } => (
            StatusCode::NOT_FOUND,
            "invalid_request",
            "not-found",
            error.to_string(),
        ),
        AuthError::GrantNotFound { .. } => (
            StatusCode::NOT_FOUND,
            "invalid_request",
            "not-found",
            error.to_string(),
        ),
        AuthError::TokenNotFound => (
            StatusCode::NOT_FOUND,
            "invalid_request",
            "not-found",
            error.to_string(),
        ),
        AuthError::DuplicateGrant { .. } => (
            StatusCode::CONFLICT,
            "invalid_request",
            "duplicate",
            error.to_string(),
        ),
        AuthError::InvalidAccessTypeConfiguration { message } => (
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "invalid",
            message.clone(),
        ),
        AuthError::MultipleGrantsFound { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "exception",
            error.to_string(),
        ),
        AuthError::Storage { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "exception",
            message.clone(),
        ),
        AuthError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "server_error",
            "exception",
            message.clone(),
        ),
    }
}

/// Builds the WWW-Authenticate header value for 401 responses.
///
/// Format: `Bearer realm="benegate", error="invalid_client", error_description="..."`
fn build_www_authenticate_header(error: &str, description: &str) -> String {
    // Escape quotes in description
    let escaped_desc = description.replace('\"', "\\\"");
    format!(
        "Bearer realm=\"benegate\", error=\"{}\", error_description=\"{}\"",
        error, escaped_desc
    )
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates a FHIR OperationOutcome JSON for an error.
///
/// This can be used when you need the JSON body without the full response.
#[must_use]
pub fn operation_outcome_json(
    severity: &str,
    code: &str,
    oauth_error: &str,
    diagnostics: &str,
) -> serde_json::Value {
    json!({
        "resourceType": "OperationOutcome",
        "issue": [{
            "severity": severity,
            "code": code,
            "details": {
                "coding": [{
                    "system": "https://tools.ietf.org/html/rfc6749",
                    "code": oauth_error
                }]
            },
            "diagnostics": diagnostics
        }]
    })
}

// =============================================================================
// Tests
// =============================================================================

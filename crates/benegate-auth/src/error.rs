//! Authorization error types.
//!
//! This module defines all error types that can occur during grant
//! management and access-control decisions.

use std::fmt;
use uuid::Uuid;

/// Errors that can occur during grant management and authorization
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A grant already exists for this (application, beneficiary) pair.
    ///
    /// Idempotent callers (upsert, the reconciler) treat this as
    /// success-equivalent; it only surfaces when two creations race.
    #[error("Grant already exists for application {application_id} and beneficiary {beneficiary_id}")]
    DuplicateGrant {
        /// The application holding the existing grant.
        application_id: Uuid,
        /// The beneficiary covered by the existing grant.
        beneficiary_id: Uuid,
    },

    /// No grant exists for this (application, beneficiary) pair.
    #[error("No grant found for application {application_id} and beneficiary {beneficiary_id}")]
    GrantNotFound {
        /// The application that was looked up.
        application_id: Uuid,
        /// The beneficiary that was looked up.
        beneficiary_id: Uuid,
    },

    /// More than one grant exists for a pair that must have at most one.
    ///
    /// This indicates store corruption; it is never produced in normal
    /// operation.
    #[error(
        "Found {count} grants for application {application_id} and beneficiary {beneficiary_id}; expected at most one"
    )]
    MultipleGrantsFound {
        /// The application that was looked up.
        application_id: Uuid,
        /// The beneficiary that was looked up.
        beneficiary_id: Uuid,
        /// How many grants were found.
        count: usize,
    },

    /// An application's data-access type and end date are inconsistent.
    #[error("Invalid access type configuration: {message}")]
    InvalidAccessTypeConfiguration {
        /// Description of the invalid combination.
        message: String,
    },

    /// The requesting application has been deactivated.
    ///
    /// The message is the full operator-facing text, including the
    /// application name.
    #[error("{message}")]
    ApplicationInactive {
        /// Operator-facing denial message.
        message: String,
    },

    /// The requesting application is a research study whose end date has
    /// passed.
    #[error("{message}")]
    StudyExpired {
        /// Operator-facing denial message.
        message: String,
    },

    /// The authenticated user has no identity crosswalk.
    #[error("No identity crosswalk exists for the authenticated user")]
    MissingCrosswalk,

    /// The requested resource does not exist for this caller.
    ///
    /// Deliberately carries no detail: ownership mismatches use this same
    /// error so callers cannot probe for other beneficiaries' data.
    #[error("Not found")]
    ResourceNotFound,

    /// The requested resource type is not served by this gateway.
    #[error("The requested resource type, {resource_type}, is not supported")]
    UnsupportedResourceType {
        /// The unsupported resource type.
        resource_type: String,
    },

    /// No live or archived access token matched the given token string.
    ///
    /// The token string is deliberately not echoed back.
    #[error("No access token found")]
    TokenNotFound,

    /// An error occurred while storing or retrieving authorization data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `DuplicateGrant` error.
    #[must_use]
    pub fn duplicate_grant(application_id: Uuid, beneficiary_id: Uuid) -> Self {
        Self::DuplicateGrant {
            application_id,
            beneficiary_id,
        }
    }

    /// Creates a new `GrantNotFound` error.
    #[must_use]
    pub fn grant_not_found(application_id: Uuid, beneficiary_id: Uuid) -> Self {
        Self::GrantNotFound {
            application_id,
            beneficiary_id,
        }
    }

    /// Creates a new `MultipleGrantsFound` error.
    #[must_use]
    pub fn multiple_grants_found(application_id: Uuid, beneficiary_id: Uuid, count: usize) -> Self {
        Self::MultipleGrantsFound {
            application_id,
            beneficiary_id,
            count,
        }
    }

    /// Creates a new `InvalidAccessTypeConfiguration` error.
    #[must_use]
    pub fn invalid_access_type(message: impl Into<String>) -> Self {
        Self::InvalidAccessTypeConfiguration {
            message: message.into(),
        }
    }

    /// Creates a new `ApplicationInactive` error.
    #[must_use]
    pub fn application_inactive(message: impl Into<String>) -> Self {
        Self::ApplicationInactive {
            message: message.into(),
        }
    }

    /// Creates a new `StudyExpired` error.
    #[must_use]
    pub fn study_expired(message: impl Into<String>) -> Self {
        Self::StudyExpired {
            message: message.into(),
        }
    }

    /// Creates a new `UnsupportedResourceType` error.
    #[must_use]
    pub fn unsupported_resource_type(resource_type: impl Into<String>) -> Self {
        Self::UnsupportedResourceType {
            resource_type: resource_type.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` for the duplicate-creation race absorbed by idempotent
    /// callers.
    #[must_use]
    pub fn is_duplicate_grant(&self) -> bool {
        matches!(self, Self::DuplicateGrant { .. })
    }

    /// Returns `true` if a grant lookup came up empty.
    #[must_use]
    pub fn is_grant_not_found(&self) -> bool {
        matches!(self, Self::GrantNotFound { .. })
    }

    /// Returns `true` if this error maps to a 404 response.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GrantNotFound { .. }
                | Self::ResourceNotFound
                | Self::UnsupportedResourceType { .. }
                | Self::TokenNotFound
        )
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateGrant { .. }
                | Self::GrantNotFound { .. }
                | Self::InvalidAccessTypeConfiguration { .. }
                | Self::ApplicationInactive { .. }
                | Self::StudyExpired { .. }
                | Self::MissingCrosswalk
                | Self::ResourceNotFound
                | Self::UnsupportedResourceType { .. }
                | Self::TokenNotFound
        )
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::MultipleGrantsFound { .. } | Self::Storage { .. } | Self::Internal { .. }
        )
    }

    /// Returns `true` if this is an authentication-layer denial (401).
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            Self::ApplicationInactive { .. } | Self::StudyExpired { .. }
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateGrant { .. } => ErrorCategory::Conflict,
            Self::GrantNotFound { .. } => ErrorCategory::NotFound,
            Self::MultipleGrantsFound { .. } => ErrorCategory::Integrity,
            Self::InvalidAccessTypeConfiguration { .. } => ErrorCategory::Validation,
            Self::ApplicationInactive { .. } => ErrorCategory::Authentication,
            Self::StudyExpired { .. } => ErrorCategory::Authentication,
            Self::MissingCrosswalk => ErrorCategory::Authorization,
            Self::ResourceNotFound => ErrorCategory::NotFound,
            Self::UnsupportedResourceType { .. } => ErrorCategory::NotFound,
            Self::TokenNotFound => ErrorCategory::NotFound,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the OAuth 2.0 error code used in `WWW-Authenticate` headers
    /// and OperationOutcome codings.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::ApplicationInactive { .. } => "invalid_client",
            Self::StudyExpired { .. } => "invalid_client",
            Self::MissingCrosswalk => "access_denied",
            Self::DuplicateGrant { .. } => "invalid_request",
            Self::GrantNotFound { .. } => "invalid_request",
            Self::ResourceNotFound => "invalid_request",
            Self::UnsupportedResourceType { .. } => "invalid_request",
            Self::TokenNotFound => "invalid_request",
            Self::InvalidAccessTypeConfiguration { .. } => "invalid_request",
            Self::MultipleGrantsFound { .. } => "server_error",
            Self::Storage { .. } => "server_error",
            Self::Internal { .. } => "server_error",
        }
    }
}

impl From<benegate_core::CoreError> for AuthError {
    fn from(err: benegate_core::CoreError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Categories of authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Authentication-layer denials (inactive application, ended study).
    Authentication,
    /// Authorization denials (crosswalk, ownership).
    Authorization,
    /// Lookups that found nothing.
    NotFound,
    /// Uniqueness conflicts.
    Conflict,
    /// Request or configuration validation failures.
    Validation,
    /// Invariant violations indicating store corruption.
    Integrity,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Internal errors.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Authorization => write!(f, "authorization"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::Validation => write!(f, "validation"),
            Self::Integrity => write!(f, "integrity"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Convenience result type for authorization operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

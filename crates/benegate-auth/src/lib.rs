//! # benegate-auth
//!
//! Authorization-grant and data-access-control core for the Benegate
//! gateway.
//!
//! This crate provides:
//! - Grant lifecycle management (creation on approval, deduplication,
//!   archival on revocation)
//! - Data-access-type expiration policy (ONE_TIME, RESEARCH_STUDY,
//!   THIRTEEN_MONTH)
//! - Token-to-grant reconciliation for drift repair
//! - Per-request resource access decisions tied to the beneficiary
//!   identity crosswalk
//! - FHIR OperationOutcome error responses
//!
//! ## Overview
//!
//! The external token issuer upserts a grant whenever it mints a token
//! for a new (application, beneficiary) pair, and archives the grant on
//! revocation. The reconciler repairs any drift between the two stores.
//! Every resource read passes through the [`policy::ResourceAccessGuard`]
//! before data leaves the gateway.
//!
//! ## Modules
//!
//! - [`types`] - domain records (applications, grants, tokens, crosswalks)
//! - [`policy`] - access-type expiration policy and the resource guard
//! - [`storage`] - storage traits implemented by backend crates
//! - [`reconcile`] - token-to-grant reconciliation and census counts
//! - [`middleware`] - HTTP response mapping for the error taxonomy
//! - [`error`] - the `AuthError` taxonomy

pub mod error;
pub mod middleware;
pub mod policy;
pub mod reconcile;
pub mod storage;
pub mod types;

pub use error::{AuthError, AuthResult, ErrorCategory};
pub use middleware::operation_outcome_json;
pub use policy::{
    ACCESS_WINDOW_MONTHS, OwnershipRule, PolicySwitch, ResourceAccessGuard, StaticSwitch,
    has_expired, update_expiration_date, update_expiration_date_with_window, validate_access_type,
};
pub use reconcile::{GrantCheckReport, GrantCounts, GrantReconciler, TokenCounts, grant_counts, token_counts};
pub use storage::{ApplicationStorage, CrosswalkStorage, GrantStorage, TokenStorage};
pub use types::{
    AccessToken, Application, ArchivedGrant, ArchivedToken, Crosswalk, DataAccessType, Grant,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use benegate_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{AuthError, AuthResult, ErrorCategory};
    pub use crate::policy::{
        ACCESS_WINDOW_MONTHS, OwnershipRule, PolicySwitch, ResourceAccessGuard, StaticSwitch,
        has_expired, update_expiration_date, update_expiration_date_with_window,
        validate_access_type,
    };
    pub use crate::reconcile::{
        GrantCheckReport, GrantCounts, GrantReconciler, TokenCounts, grant_counts, token_counts,
    };
    pub use crate::storage::{ApplicationStorage, CrosswalkStorage, GrantStorage, TokenStorage};
    pub use crate::types::{
        AccessToken, Application, ArchivedGrant, ArchivedToken, Crosswalk, DataAccessType, Grant,
    };
}

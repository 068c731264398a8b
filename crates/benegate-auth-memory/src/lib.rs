//! In-memory storage backend for Benegate authorization data.
//!
//! This crate implements the storage traits from `benegate-auth` without
//! an external database. Applications and identity crosswalks live in
//! papaya lock-free maps; grants and access tokens each share a
//! `tokio::sync::RwLock` with their archive table so that
//! delete-and-archive is atomic to concurrent readers.
//!
//! Intended for tests and embedded deployments.
//!
//! # Example
//!
//! ```ignore
//! use benegate_auth::GrantStorage;
//! use benegate_auth_memory::InMemoryAuthStorage;
//! use time::OffsetDateTime;
//!
//! let storage = InMemoryAuthStorage::new();
//!
//! // Approve an application for a beneficiary
//! let (grant, created) = storage
//!     .grants()
//!     .upsert_grant(application_id, beneficiary_id, OffsetDateTime::now_utc())
//!     .await?;
//! ```

use std::sync::Arc;

use benegate_auth::GrantReconciler;

pub mod application;
pub mod crosswalk;
pub mod grant;
pub mod token;

// Re-export the storage traits for convenience
pub use benegate_auth::{ApplicationStorage, CrosswalkStorage, GrantStorage, TokenStorage};

pub use application::InMemoryApplicationStorage;
pub use crosswalk::InMemoryCrosswalkStorage;
pub use grant::InMemoryGrantStorage;
pub use token::InMemoryTokenStorage;

/// All four in-memory stores wired together.
///
/// Each store is independently cheap to clone (shared state behind an
/// `Arc`), so handles can be passed to the reconciler, the access guard,
/// and request handlers without further wrapping.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthStorage {
    grants: InMemoryGrantStorage,
    tokens: InMemoryTokenStorage,
    applications: InMemoryApplicationStorage,
    crosswalks: InMemoryCrosswalkStorage,
}

impl InMemoryAuthStorage {
    /// Creates an empty storage bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant store handle.
    #[must_use]
    pub fn grants(&self) -> InMemoryGrantStorage {
        self.grants.clone()
    }

    /// Access-token store handle.
    #[must_use]
    pub fn tokens(&self) -> InMemoryTokenStorage {
        self.tokens.clone()
    }

    /// Application store handle.
    #[must_use]
    pub fn applications(&self) -> InMemoryApplicationStorage {
        self.applications.clone()
    }

    /// Identity-crosswalk store handle.
    #[must_use]
    pub fn crosswalks(&self) -> InMemoryCrosswalkStorage {
        self.crosswalks.clone()
    }

    /// Builds a reconciler over this bundle's token and grant stores.
    #[must_use]
    pub fn reconciler(&self) -> GrantReconciler {
        GrantReconciler::new(
            Arc::new(self.tokens.clone()),
            Arc::new(self.grants.clone()),
        )
    }
}

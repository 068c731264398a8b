//! Grant storage trait.
//!
//! The grant store is the authoritative mapping of
//! (application, beneficiary) to grant record. Two properties every
//! implementation must uphold:
//!
//! - **Uniqueness**: at most one grant per pair. Concurrent creations for
//!   the same pair must resolve to exactly one winner; the losers fail
//!   with `DuplicateGrant`.
//! - **Archival atomicity**: `delete_and_archive` is one operation to any
//!   concurrent observer. A reader never sees neither record present, and
//!   a failed archive write aborts the deletion.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::types::{ArchivedGrant, Grant};

/// Storage trait for grants and their archive.
///
/// # Implementations
///
/// - `benegate-auth-memory` - in-memory backend for tests and embedded
///   deployments
#[async_trait]
pub trait GrantStorage: Send + Sync {
    /// Creates a grant for the pair if none exists.
    ///
    /// Re-approval of an already-granted application is a no-op: the
    /// existing record is returned unchanged, with `false` for the
    /// created flag. A new grant starts with no expiration date and
    /// `created_at = now`.
    ///
    /// # Returns
    ///
    /// The grant and whether it was newly created.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the backend fails. A concurrent create racing
    /// this call may surface as `DuplicateGrant`; callers with idempotent
    /// intent treat that as success.
    async fn upsert_grant(
        &self,
        application_id: Uuid,
        beneficiary_id: Uuid,
        now: OffsetDateTime,
    ) -> AuthResult<(Grant, bool)>;

    /// Fetches the grant for a pair.
    ///
    /// # Errors
    ///
    /// Returns `GrantNotFound` if no grant exists, `MultipleGrantsFound`
    /// if the uniqueness invariant was violated (store corruption).
    async fn get_grant(&self, application_id: Uuid, beneficiary_id: Uuid) -> AuthResult<Grant>;

    /// Persists a policy-recomputed grant (currently only the expiration
    /// date changes).
    ///
    /// # Errors
    ///
    /// Returns `GrantNotFound` if the grant no longer exists.
    async fn update_grant(&self, grant: &Grant) -> AuthResult<()>;

    /// Deletes the pair's grant, archiving it first.
    ///
    /// The archive row carries the grant's data verbatim plus
    /// `archived_at = now`. Archive write and deletion are a single
    /// atomic step.
    ///
    /// # Returns
    ///
    /// The archived record.
    ///
    /// # Errors
    ///
    /// Returns `GrantNotFound` if no grant exists for the pair.
    async fn delete_and_archive(
        &self,
        application_id: Uuid,
        beneficiary_id: Uuid,
        now: OffsetDateTime,
    ) -> AuthResult<ArchivedGrant>;

    /// Counts all grants.
    async fn count_grants(&self) -> AuthResult<usize>;

    /// Lists all grants.
    ///
    /// Reconciliation and census input; order is unspecified.
    async fn list_grants(&self) -> AuthResult<Vec<Grant>>;

    /// Lists the archive rows for a pair, oldest first.
    ///
    /// A pair revoked and re-approved repeatedly has one row per
    /// revocation; an empty result means the pair was never revoked.
    async fn find_archived(
        &self,
        application_id: Uuid,
        beneficiary_id: Uuid,
    ) -> AuthResult<Vec<ArchivedGrant>>;

    /// Counts all archive rows.
    async fn count_archived(&self) -> AuthResult<usize>;
}

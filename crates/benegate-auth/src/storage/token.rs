//! Access-token storage trait.
//!
//! Tokens are minted by the external token issuer; this interface covers
//! what the grant logic needs: enumeration for reconciliation and counts,
//! plus the archival path mirroring the grant archive.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::AuthResult;
use crate::types::{AccessToken, ArchivedToken};

/// Storage trait for access tokens and their archive.
///
/// # Implementations
///
/// - `benegate-auth-memory` - in-memory backend for tests and embedded
///   deployments
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Stores a newly issued token.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the token string collides with a live token
    /// or the backend fails.
    async fn insert_token(&self, token: &AccessToken) -> AuthResult<()>;

    /// Finds a live token by its opaque string.
    async fn get_token(&self, token: &str) -> AuthResult<Option<AccessToken>>;

    /// Lists all live tokens, expired ones included.
    ///
    /// Callers filter by [`AccessToken::is_valid`] where only current
    /// tokens matter.
    async fn list_tokens(&self) -> AuthResult<Vec<AccessToken>>;

    /// Deletes a live token, archiving it first.
    ///
    /// Get-or-create keyed by the token string: if an archive row for the
    /// token already exists (the token was archived before), that row is
    /// returned unchanged and no second row is written. Archive write and
    /// deletion are a single atomic step.
    ///
    /// # Returns
    ///
    /// The archive row for the token.
    ///
    /// # Errors
    ///
    /// Returns `TokenNotFound` if the token string matches neither a live
    /// token nor an existing archive row.
    async fn delete_and_archive_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> AuthResult<ArchivedToken>;

    /// Lists all archived tokens.
    async fn list_archived_tokens(&self) -> AuthResult<Vec<ArchivedToken>>;

    /// Counts all live tokens.
    async fn count_tokens(&self) -> AuthResult<usize>;

    /// Counts all archived tokens.
    async fn count_archived_tokens(&self) -> AuthResult<usize>;
}

//! In-memory access-token storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use benegate_auth::{AccessToken, ArchivedToken, AuthError, AuthResult, TokenStorage};

/// Live tokens and their archive, always locked together.
#[derive(Debug, Default)]
struct TokenTables {
    /// Live tokens keyed by the opaque token string.
    tokens: HashMap<String, AccessToken>,

    /// Archive rows keyed by the opaque token string.
    archive: HashMap<String, ArchivedToken>,
}

/// In-memory access-token store.
///
/// Both tables share one `RwLock` so that
/// [`TokenStorage::delete_and_archive_token`] archives and deletes under a
/// single write guard. The archive is keyed by the token string, which
/// makes repeat archival of the same token a no-op returning the existing
/// row.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStorage {
    tables: Arc<RwLock<TokenTables>>,
}

impl InMemoryTokenStorage {
    /// Creates an empty token store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for InMemoryTokenStorage {
    async fn insert_token(&self, token: &AccessToken) -> AuthResult<()> {
        let mut tables = self.tables.write().await;

        if tables.tokens.contains_key(&token.token) {
            return Err(AuthError::storage(
                "an access token with this value already exists",
            ));
        }

        tables.tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn get_token(&self, token: &str) -> AuthResult<Option<AccessToken>> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.get(token).cloned())
    }

    async fn list_tokens(&self) -> AuthResult<Vec<AccessToken>> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.values().cloned().collect())
    }

    async fn delete_and_archive_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> AuthResult<ArchivedToken> {
        let mut tables = self.tables.write().await;

        // Get-or-create: a token archived before keeps its original row.
        if let Some(existing) = tables.archive.get(token).cloned() {
            tables.tokens.remove(token);
            return Ok(existing);
        }

        let live = tables.tokens.remove(token).ok_or(AuthError::TokenNotFound)?;
        let archived = ArchivedToken::from_token(&live, now);
        tables.archive.insert(live.token.clone(), archived.clone());

        tracing::info!(
            application_id = %archived.application_id,
            beneficiary_id = %archived.beneficiary_id,
            "Archived access token"
        );
        Ok(archived)
    }

    async fn list_archived_tokens(&self) -> AuthResult<Vec<ArchivedToken>> {
        let tables = self.tables.read().await;
        Ok(tables.archive.values().cloned().collect())
    }

    async fn count_tokens(&self) -> AuthResult<usize> {
        let tables = self.tables.read().await;
        Ok(tables.tokens.len())
    }

    async fn count_archived_tokens(&self) -> AuthResult<usize> {
        let tables = self.tables.read().await;
        Ok(tables.archive.len())
    }
}

//! In-memory grant storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use benegate_auth::{ArchivedGrant, AuthError, AuthResult, Grant, GrantStorage};

/// Live grants and their archive, always locked together.
#[derive(Debug, Default)]
struct GrantTables {
    /// Live grants keyed by (application, beneficiary).
    grants: HashMap<(Uuid, Uuid), Grant>,

    /// Archive rows in insertion order, oldest first.
    archive: Vec<ArchivedGrant>,
}

/// In-memory grant store.
///
/// The live table is keyed by the (application, beneficiary) pair, so the
/// one-grant-per-pair invariant holds structurally and concurrent
/// approvals for the same pair resolve to a single record. Both tables
/// sit behind one `RwLock`: [`GrantStorage::delete_and_archive`] holds a
/// single write guard across the archive write and the deletion, so no
/// reader ever observes the grant gone without its archive row present.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGrantStorage {
    tables: Arc<RwLock<GrantTables>>,
}

impl InMemoryGrantStorage {
    /// Creates an empty grant store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GrantStorage for InMemoryGrantStorage {
    async fn upsert_grant(
        &self,
        application_id: Uuid,
        beneficiary_id: Uuid,
        now: OffsetDateTime,
    ) -> AuthResult<(Grant, bool)> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.grants.get(&(application_id, beneficiary_id)) {
            return Ok((existing.clone(), false));
        }

        let grant = Grant::new(application_id, beneficiary_id, now);
        tables
            .grants
            .insert((application_id, beneficiary_id), grant.clone());

        tracing::info!(
            application_id = %application_id,
            beneficiary_id = %beneficiary_id,
            "Created data access grant"
        );
        Ok((grant, true))
    }

    async fn get_grant(&self, application_id: Uuid, beneficiary_id: Uuid) -> AuthResult<Grant> {
        let tables = self.tables.read().await;
        tables
            .grants
            .get(&(application_id, beneficiary_id))
            .cloned()
            .ok_or_else(|| AuthError::grant_not_found(application_id, beneficiary_id))
    }

    async fn update_grant(&self, grant: &Grant) -> AuthResult<()> {
        let mut tables = self.tables.write().await;
        match tables.grants.get_mut(&grant.pair()) {
            Some(existing) => {
                *existing = grant.clone();
                Ok(())
            }
            None => Err(AuthError::grant_not_found(
                grant.application_id,
                grant.beneficiary_id,
            )),
        }
    }

    async fn delete_and_archive(
        &self,
        application_id: Uuid,
        beneficiary_id: Uuid,
        now: OffsetDateTime,
    ) -> AuthResult<ArchivedGrant> {
        let mut tables = self.tables.write().await;

        let grant = tables
            .grants
            .get(&(application_id, beneficiary_id))
            .cloned()
            .ok_or_else(|| AuthError::grant_not_found(application_id, beneficiary_id))?;

        // Archive first, then delete, under the same write guard.
        let archived = ArchivedGrant::from_grant(&grant, now);
        tables.archive.push(archived.clone());
        tables.grants.remove(&(application_id, beneficiary_id));

        tracing::info!(
            application_id = %application_id,
            beneficiary_id = %beneficiary_id,
            "Archived data access grant"
        );
        Ok(archived)
    }

    async fn count_grants(&self) -> AuthResult<usize> {
        let tables = self.tables.read().await;
        Ok(tables.grants.len())
    }

    async fn list_grants(&self) -> AuthResult<Vec<Grant>> {
        let tables = self.tables.read().await;
        Ok(tables.grants.values().cloned().collect())
    }

    async fn find_archived(
        &self,
        application_id: Uuid,
        beneficiary_id: Uuid,
    ) -> AuthResult<Vec<ArchivedGrant>> {
        let tables = self.tables.read().await;
        Ok(tables
            .archive
            .iter()
            .filter(|row| {
                row.application_id == application_id && row.beneficiary_id == beneficiary_id
            })
            .cloned()
            .collect())
    }

    async fn count_archived(&self) -> AuthResult<usize> {
        let tables = self.tables.read().await;
        Ok(tables.archive.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    #[tokio::test]
    async fn test_upsert_creates_then_returns_existing() {
        let store = InMemoryGrantStorage::new();
        let app = Uuid::new_v4();
        let bene = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let (grant, created) = store.upsert_grant(app, bene, now).await.unwrap();
        assert!(created);
        assert_eq!(grant.created_at, now);
        assert!(grant.expiration_date.is_none());

        // Re-approval returns the original record untouched.
        let later = now + Duration::hours(2);
        let (again, created) = store.upsert_grant(app, bene, later).await.unwrap();
        assert!(!created);
        assert_eq!(again.created_at, now);
        assert_eq!(store.count_grants().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_grant_missing_pair() {
        let store = InMemoryGrantStorage::new();
        let err = store
            .get_grant(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_grant_not_found());
    }

    #[tokio::test]
    async fn test_update_grant_persists_expiration() {
        let store = InMemoryGrantStorage::new();
        let app = Uuid::new_v4();
        let bene = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let (mut grant, _) = store.upsert_grant(app, bene, now).await.unwrap();
        grant.expiration_date = Some(now + Duration::days(30));
        store.update_grant(&grant).await.unwrap();

        let stored = store.get_grant(app, bene).await.unwrap();
        assert_eq!(stored.expiration_date, Some(now + Duration::days(30)));
    }

    #[tokio::test]
    async fn test_update_grant_missing_pair() {
        let store = InMemoryGrantStorage::new();
        let grant = Grant::new(Uuid::new_v4(), Uuid::new_v4(), OffsetDateTime::now_utc());
        let err = store.update_grant(&grant).await.unwrap_err();
        assert!(err.is_grant_not_found());
    }

    #[tokio::test]
    async fn test_delete_and_archive_moves_record() {
        let store = InMemoryGrantStorage::new();
        let app = Uuid::new_v4();
        let bene = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let (mut grant, _) = store.upsert_grant(app, bene, now).await.unwrap();
        grant.expiration_date = Some(now + Duration::days(395));
        store.update_grant(&grant).await.unwrap();

        let revoked_at = now + Duration::days(10);
        let archived = store.delete_and_archive(app, bene, revoked_at).await.unwrap();
        assert_eq!(archived.expiration_date, grant.expiration_date);
        assert_eq!(archived.created_at, grant.created_at);
        assert_eq!(archived.archived_at, revoked_at);

        assert!(store.get_grant(app, bene).await.unwrap_err().is_grant_not_found());
        assert_eq!(store.count_grants().await.unwrap(), 0);
        assert_eq!(store.count_archived().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_archive_missing_pair() {
        let store = InMemoryGrantStorage::new();
        let err = store
            .delete_and_archive(Uuid::new_v4(), Uuid::new_v4(), OffsetDateTime::now_utc())
            .await
            .unwrap_err();
        assert!(err.is_grant_not_found());
        assert_eq!(store.count_archived().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_archived_oldest_first() {
        let store = InMemoryGrantStorage::new();
        let app = Uuid::new_v4();
        let bene = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        // Approve, revoke, re-approve, revoke again.
        store.upsert_grant(app, bene, now).await.unwrap();
        store
            .delete_and_archive(app, bene, now + Duration::days(1))
            .await
            .unwrap();
        store
            .upsert_grant(app, bene, now + Duration::days(2))
            .await
            .unwrap();
        store
            .delete_and_archive(app, bene, now + Duration::days(3))
            .await
            .unwrap();

        let rows = store.find_archived(app, bene).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].archived_at < rows[1].archived_at);

        // Other pairs contribute nothing.
        let none = store.find_archived(app, Uuid::new_v4()).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_upserts_create_one_grant() {
        let store = InMemoryGrantStorage::new();
        let app = Uuid::new_v4();
        let bene = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.upsert_grant(app, bene, now).await.unwrap().1
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.count_grants().await.unwrap(), 1);
    }
}

//! In-memory identity-crosswalk storage.

use std::sync::Arc;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use uuid::Uuid;

use benegate_auth::{AuthResult, Crosswalk, CrosswalkStorage};

/// In-memory crosswalk store backed by a papaya lock-free map.
///
/// Keyed by the beneficiary's user id; the one-crosswalk-per-beneficiary
/// rule holds structurally.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCrosswalkStorage {
    crosswalks: Arc<PapayaHashMap<Uuid, Crosswalk>>,
}

impl InMemoryCrosswalkStorage {
    /// Creates an empty crosswalk store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrosswalkStorage for InMemoryCrosswalkStorage {
    async fn save_crosswalk(&self, crosswalk: &Crosswalk) -> AuthResult<()> {
        let guard = self.crosswalks.pin();
        guard.insert(crosswalk.user_id, crosswalk.clone());
        Ok(())
    }

    async fn get_crosswalk(&self, user_id: Uuid) -> AuthResult<Option<Crosswalk>> {
        let guard = self.crosswalks.pin();
        Ok(guard.get(&user_id).cloned())
    }

    async fn list_crosswalks(&self) -> AuthResult<Vec<Crosswalk>> {
        let guard = self.crosswalks.pin();
        Ok(guard.iter().map(|(_, cw)| cw.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryCrosswalkStorage::new();
        let user_id = Uuid::new_v4();

        store
            .save_crosswalk(&Crosswalk::new(user_id, "4321"))
            .await
            .unwrap();

        let found = store.get_crosswalk(user_id).await.unwrap().unwrap();
        assert_eq!(found.fhir_id, "4321");
        assert!(found.is_real());

        assert!(store.get_crosswalk(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let store = InMemoryCrosswalkStorage::new();
        let user_id = Uuid::new_v4();

        store
            .save_crosswalk(&Crosswalk::new(user_id, "4321"))
            .await
            .unwrap();
        store
            .save_crosswalk(&Crosswalk::new(user_id, "-20140000008325"))
            .await
            .unwrap();

        let found = store.get_crosswalk(user_id).await.unwrap().unwrap();
        assert!(found.is_synthetic());
        assert_eq!(store.list_crosswalks().await.unwrap().len(), 1);
    }
}

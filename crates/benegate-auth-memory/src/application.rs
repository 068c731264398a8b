//! In-memory application storage.

use std::sync::Arc;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;
use uuid::Uuid;

use benegate_auth::{Application, ApplicationStorage, AuthResult};

/// In-memory application store backed by a papaya lock-free map.
///
/// Writes validate the record's data-access type configuration before
/// insertion, so an application with a contradictory access type and end
/// date never lands in the map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryApplicationStorage {
    applications: Arc<PapayaHashMap<Uuid, Application>>,
}

impl InMemoryApplicationStorage {
    /// Creates an empty application store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStorage for InMemoryApplicationStorage {
    async fn save_application(&self, application: &Application) -> AuthResult<()> {
        application.validate()?;

        let guard = self.applications.pin();
        guard.insert(application.id, application.clone());
        Ok(())
    }

    async fn get_application(&self, id: Uuid) -> AuthResult<Option<Application>> {
        let guard = self.applications.pin();
        Ok(guard.get(&id).cloned())
    }

    async fn list_applications(&self) -> AuthResult<Vec<Application>> {
        let guard = self.applications.pin();
        Ok(guard.iter().map(|(_, app)| app.clone()).collect())
    }
}

//! Application storage trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::types::Application;

/// Storage trait for application records.
///
/// Application identity and credentials live with the token issuer; this
/// store only holds the fields authorization decisions read.
#[async_trait]
pub trait ApplicationStorage: Send + Sync {
    /// Inserts or replaces an application record.
    ///
    /// Implementations must run [`Application::validate`] and reject
    /// records whose data-access type and end date disagree; an invalid
    /// record is never persisted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccessTypeConfiguration` for an invalid record,
    /// `Storage` if the backend fails.
    async fn save_application(&self, application: &Application) -> AuthResult<()>;

    /// Finds an application by id.
    async fn get_application(&self, id: Uuid) -> AuthResult<Option<Application>>;

    /// Lists all applications.
    async fn list_applications(&self) -> AuthResult<Vec<Application>>;
}

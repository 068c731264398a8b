//! Identity crosswalk storage trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::types::Crosswalk;

/// Storage trait for beneficiary identity crosswalks.
///
/// One crosswalk per beneficiary at most. A beneficiary without a
/// crosswalk cannot pass the resource access guard.
#[async_trait]
pub trait CrosswalkStorage: Send + Sync {
    /// Inserts or replaces a beneficiary's crosswalk.
    async fn save_crosswalk(&self, crosswalk: &Crosswalk) -> AuthResult<()>;

    /// Finds the crosswalk for a beneficiary.
    async fn get_crosswalk(&self, user_id: Uuid) -> AuthResult<Option<Crosswalk>>;

    /// Lists all crosswalks.
    ///
    /// Census input for the real/synthetic beneficiary counts.
    async fn list_crosswalks(&self) -> AuthResult<Vec<Crosswalk>>;
}

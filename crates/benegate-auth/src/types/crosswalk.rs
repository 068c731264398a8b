//! Identity crosswalk domain type.
//!
//! Maps an internal beneficiary id to the external FHIR subject identifier
//! used in resource payloads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mapping from an internal beneficiary id to the external FHIR subject id.
///
/// Synthetic (sandbox) beneficiaries carry a `fhir_id` beginning with `-`;
/// real beneficiaries a non-empty id without that prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crosswalk {
    /// Internal beneficiary user id.
    pub user_id: Uuid,

    /// External FHIR subject identifier.
    pub fhir_id: String,
}

impl Crosswalk {
    /// Creates a new crosswalk entry.
    pub fn new(user_id: Uuid, fhir_id: impl Into<String>) -> Self {
        Self {
            user_id,
            fhir_id: fhir_id.into(),
        }
    }

    /// Returns `true` if this crosswalk names a synthetic beneficiary.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.fhir_id.starts_with('-')
    }

    /// Returns `true` if this crosswalk names a real beneficiary.
    ///
    /// An empty `fhir_id` counts as neither real nor synthetic.
    #[must_use]
    pub fn is_real(&self) -> bool {
        !self.fhir_id.is_empty() && !self.fhir_id.starts_with('-')
    }
}

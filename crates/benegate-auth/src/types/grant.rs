//! Grant and archived-grant domain types.
//!
//! A grant records that an application holds ongoing authorization to
//! access one beneficiary's data. At most one grant exists per
//! (application, beneficiary) pair; deletion always moves the record into
//! its archival form rather than dropping it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One active authorization of an application to access a beneficiary's
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// The application the beneficiary approved.
    pub application_id: Uuid,

    /// The beneficiary whose data is covered.
    pub beneficiary_id: Uuid,

    /// When this grant's access expires.
    ///
    /// Semantics depend on the application's data-access type: only
    /// THIRTEEN_MONTH applications ever set it, and an unset date never
    /// expires.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub expiration_date: Option<OffsetDateTime>,

    /// When this grant was first created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Grant {
    /// Creates a new grant with no expiration date.
    #[must_use]
    pub fn new(application_id: Uuid, beneficiary_id: Uuid, now: OffsetDateTime) -> Self {
        Self {
            application_id,
            beneficiary_id,
            expiration_date: None,
            created_at: now,
        }
    }

    /// Returns the (application, beneficiary) pair this grant covers.
    #[must_use]
    pub fn pair(&self) -> (Uuid, Uuid) {
        (self.application_id, self.beneficiary_id)
    }
}

/// Immutable copy of a grant taken at the moment of deletion.
///
/// Unlike [`Grant`], the archive is not unique per pair: a beneficiary who
/// approves, revokes, and re-approves the same application leaves one
/// archive row per revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedGrant {
    /// The application the grant covered.
    pub application_id: Uuid,

    /// The beneficiary the grant covered.
    pub beneficiary_id: Uuid,

    /// The grant's expiration date at the moment of deletion.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub expiration_date: Option<OffsetDateTime>,

    /// When the original grant was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the grant was deleted and this record written.
    #[serde(with = "time::serde::rfc3339")]
    pub archived_at: OffsetDateTime,
}

impl ArchivedGrant {
    /// Captures a grant into its archival form.
    #[must_use]
    pub fn from_grant(grant: &Grant, archived_at: OffsetDateTime) -> Self {
        Self {
            application_id: grant.application_id,
            beneficiary_id: grant.beneficiary_id,
            expiration_date: grant.expiration_date,
            created_at: grant.created_at,
            archived_at,
        }
    }
}

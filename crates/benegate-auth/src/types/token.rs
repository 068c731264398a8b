//! Access-token domain types.
//!
//! Tokens are minted and owned by the external token issuer; this crate
//! only reads them (reconciliation, counts) and archives them on deletion.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Live access-token fields visible to the grant logic.
///
/// One token per issuance event; a single (application, beneficiary) pair
/// accumulates many tokens over time through refreshes and re-approvals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Opaque token string, unique across live tokens.
    pub token: String,

    /// The application the token was issued to.
    pub application_id: Uuid,

    /// The beneficiary who authorized the token.
    pub beneficiary_id: Uuid,

    /// When the token stops being accepted.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: String,

    /// When the token was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the token was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl AccessToken {
    /// Creates a new token record.
    pub fn new(
        token: impl Into<String>,
        application_id: Uuid,
        beneficiary_id: Uuid,
        expires_at: OffsetDateTime,
        scope: impl Into<String>,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            token: token.into(),
            application_id,
            beneficiary_id,
            expires_at,
            scope: scope.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns `true` if the token is still accepted at the given instant.
    #[must_use]
    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }

    /// Returns the (application, beneficiary) pair this token belongs to.
    #[must_use]
    pub fn pair(&self) -> (Uuid, Uuid) {
        (self.application_id, self.beneficiary_id)
    }
}

/// Immutable copy of an access token taken when the token is deleted.
///
/// Archival is keyed by the token string: archiving the same token twice
/// yields a single archive row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedToken {
    /// The deleted token's opaque string.
    pub token: String,

    /// The application the token was issued to.
    pub application_id: Uuid,

    /// The beneficiary who authorized the token.
    pub beneficiary_id: Uuid,

    /// The token's expiration at the moment of deletion.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: String,

    /// When the original token was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// When the original token was last updated.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,

    /// When the token was deleted and this record written.
    #[serde(with = "time::serde::rfc3339")]
    pub archived_at: OffsetDateTime,
}

impl ArchivedToken {
    /// Captures a token into its archival form.
    #[must_use]
    pub fn from_token(token: &AccessToken, archived_at: OffsetDateTime) -> Self {
        Self {
            token: token.token.clone(),
            application_id: token.application_id,
            beneficiary_id: token.beneficiary_id,
            expires_at: token.expires_at,
            scope: token.scope.clone(),
            created_at: token.created_at,
            updated_at: token.updated_at,
            archived_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn sample_token(expires_at: OffsetDateTime) -> AccessToken {
        AccessToken::new(
            "tok-abc123",
            Uuid::new_v4(),
            Uuid::new_v4(),
            expires_at,
            "patient/Patient.read",
            OffsetDateTime::now_utc(),
        )
    }

    #[test]
    fn test_token_validity() {
        let now = OffsetDateTime::now_utc();

        let token = sample_token(now + Duration::hours(1));
        assert!(token.is_valid(now));

        let token = sample_token(now - Duration::hours(1));
        assert!(!token.is_valid(now));

        // Expiry boundary counts as expired.
        let token = sample_token(now);
        assert!(!token.is_valid(now));
    }

    #[test]
    fn test_archived_token_preserves_fields() {
        let now = OffsetDateTime::now_utc();
        let token = sample_token(now + Duration::hours(1));

        let archived = ArchivedToken::from_token(&token, now);
        assert_eq!(archived.token, token.token);
        assert_eq!(archived.application_id, token.application_id);
        assert_eq!(archived.beneficiary_id, token.beneficiary_id);
        assert_eq!(archived.expires_at, token.expires_at);
        assert_eq!(archived.scope, token.scope);
        assert_eq!(archived.archived_at, now);
    }

    #[test]
    fn test_token_serialization() {
        let token = sample_token(OffsetDateTime::now_utc() + Duration::hours(1));
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["token"], "tok-abc123");
        assert_eq!(json["scope"], "patient/Patient.read");

        let back: AccessToken = serde_json::from_value(json).unwrap();
        assert_eq!(back.token, token.token);
    }
}

//! Application domain types.
//!
//! Defines the application record fields relevant to data-access control:
//! the data-access type, the research-study end date, and the active flag.
//! Application identity and credentials are owned by the external token
//! issuer.

use benegate_config::LIMIT_DATA_ACCESS;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};
use crate::policy::switch::PolicySwitch;

// =============================================================================
// Data Access Type
// =============================================================================

/// Policy class governing how and when an application's access expires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataAccessType {
    /// Single approval, no refresh tokens; revocation handled elsewhere.
    #[default]
    OneTime,
    /// Access ends when the application's research-study end date passes.
    ResearchStudy,
    /// Access expires thirteen calendar months after approval.
    ThirteenMonth,
}

impl DataAccessType {
    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneTime => "ONE_TIME",
            Self::ResearchStudy => "RESEARCH_STUDY",
            Self::ThirteenMonth => "THIRTEEN_MONTH",
        }
    }
}

impl std::fmt::Display for DataAccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataAccessType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONE_TIME" => Ok(Self::OneTime),
            "RESEARCH_STUDY" => Ok(Self::ResearchStudy),
            "THIRTEEN_MONTH" => Ok(Self::ThirteenMonth),
            other => Err(AuthError::invalid_access_type(format!(
                "Invalid data_access_type: {other}"
            ))),
        }
    }
}

// =============================================================================
// Application
// =============================================================================

/// Application record fields relevant to authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Application id.
    pub id: Uuid,

    /// Human-readable application name, used in denial messages.
    pub name: String,

    /// Policy class governing access expiration.
    #[serde(default)]
    pub data_access_type: DataAccessType,

    /// Research-study end date.
    ///
    /// Must be set if and only if `data_access_type` is RESEARCH_STUDY;
    /// [`Application::validate`] enforces the pairing.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub end_date: Option<OffsetDateTime>,

    /// Whether the application may currently access any data.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Application {
    /// Creates a new active ONE_TIME application.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            data_access_type: DataAccessType::OneTime,
            end_date: None,
            active: true,
        }
    }

    /// Returns whether the application is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns whether this application's research study has ended.
    ///
    /// Only meaningful when the `limit_data_access` switch is active; with
    /// the switch off, or for non-RESEARCH_STUDY applications, or when no
    /// end date is configured, this never reports expired.
    #[must_use]
    pub fn has_research_study_expired(&self, switch: &dyn PolicySwitch, now: OffsetDateTime) -> bool {
        if !switch.is_active(LIMIT_DATA_ACCESS) {
            return false;
        }
        if self.data_access_type != DataAccessType::ResearchStudy {
            return false;
        }
        match self.end_date {
            Some(end_date) => end_date < now,
            None => false,
        }
    }

    /// Returns whether this application gets single-use data access.
    ///
    /// The token issuer consults this to skip refresh-token issuance.
    /// Switch-gated like the research-study check.
    #[must_use]
    pub fn has_one_time_only_access(&self, switch: &dyn PolicySwitch) -> bool {
        switch.is_active(LIMIT_DATA_ACCESS) && self.data_access_type == DataAccessType::OneTime
    }

    /// Validates the data-access-type and end-date combination.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAccessTypeConfiguration` when the pairing rule is
    /// violated; callers must reject the record before persisting it.
    pub fn validate(&self) -> AuthResult<()> {
        crate::policy::access_type::validate_access_type(self.data_access_type, self.end_date)
    }
}

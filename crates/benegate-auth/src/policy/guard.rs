//! Resource access guard.
//!
//! Request-scoped authorization decisions evaluated before any protected
//! resource is returned. Checks run in order and short-circuit on the
//! first failure:
//!
//! 1. application active
//! 2. research-study end date (switch-gated)
//! 3. resource type servable
//! 4. beneficiary ownership of the payload, or search-filter scope
//!
//! Steps 1 and 2 fail as authentication errors; ownership and scope
//! failures fail as `ResourceNotFound` so an unauthorized caller cannot
//! distinguish "exists but not yours" from "does not exist".

use std::collections::HashMap;
use std::sync::Arc;

use benegate_config::MessageSettings;
use benegate_core::reference::reference_id;
use benegate_core::resource::{ResourceEnvelope, ResourceType};
use time::OffsetDateTime;

use crate::error::{AuthError, AuthResult};
use crate::policy::switch::PolicySwitch;
use crate::types::{Application, Crosswalk};

// =============================================================================
// Ownership Rule
// =============================================================================

/// How to locate the owning beneficiary's identity on a resource payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipRule {
    /// The identity is the id segment of a `Patient/{id}` FHIR reference
    /// held under the named top-level field.
    Reference(&'static str),
    /// The resource's own `id` field is the identity.
    OwnId,
}

impl OwnershipRule {
    /// Returns the extraction rule for a resource type.
    #[must_use]
    pub fn for_resource_type(resource_type: &ResourceType) -> Self {
        match resource_type {
            ResourceType::Coverage => Self::Reference("beneficiary"),
            ResourceType::ExplanationOfBenefit => Self::Reference("patient"),
            _ => Self::OwnId,
        }
    }
}

// =============================================================================
// Resource Access Guard
// =============================================================================

/// Per-request authorization gate.
///
/// Stateless apart from its injected collaborators; one instance is shared
/// across all requests.
pub struct ResourceAccessGuard {
    switch: Arc<dyn PolicySwitch>,
    messages: MessageSettings,
}

impl ResourceAccessGuard {
    /// Creates a new guard.
    pub fn new(switch: Arc<dyn PolicySwitch>, messages: MessageSettings) -> Self {
        Self { switch, messages }
    }

    /// Checks the application-level denial conditions.
    ///
    /// # Errors
    ///
    /// `ApplicationInactive` when the application is deactivated,
    /// `StudyExpired` when a research study's end date has passed. Both
    /// messages name the application for support diagnosis.
    pub fn check_application(
        &self,
        application: &Application,
        now: OffsetDateTime,
    ) -> AuthResult<()> {
        let app_name = if application.name.is_empty() {
            "Unknown"
        } else {
            application.name.as_str()
        };

        if !application.is_active() {
            return Err(AuthError::application_inactive(
                self.messages.application_inactive_message(app_name),
            ));
        }

        if application.has_research_study_expired(self.switch.as_ref(), now) {
            return Err(AuthError::study_expired(
                self.messages.research_study_ended_message(app_name),
            ));
        }

        Ok(())
    }

    /// Checks that the resource type is one this gateway serves.
    ///
    /// # Errors
    ///
    /// `UnsupportedResourceType` for anything other than `Patient`,
    /// `Coverage`, and `ExplanationOfBenefit`.
    pub fn check_resource_type(&self, resource_type: &ResourceType) -> AuthResult<()> {
        if !resource_type.is_servable() {
            tracing::info!(
                resource_type = %resource_type,
                "User requested read access to an unsupported resource type"
            );
            return Err(AuthError::unsupported_resource_type(
                resource_type.to_string(),
            ));
        }
        Ok(())
    }

    /// Checks that the resource payload belongs to the authenticated
    /// beneficiary.
    ///
    /// Extraction failures (missing field, non-string reference, malformed
    /// reference) are logged and denied exactly like a mismatch.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` on mismatch or extraction failure.
    pub fn check_ownership(
        &self,
        resource: &ResourceEnvelope,
        crosswalk: &Crosswalk,
    ) -> AuthResult<()> {
        let rule = OwnershipRule::for_resource_type(&resource.resource_type);
        let owner_id = match extract_owner_id(resource, rule) {
            Ok(id) => id,
            Err(message) => {
                tracing::warn!(
                    resource_type = %resource.resource_type,
                    error = %message,
                    "An error occurred fetching the beneficiary id"
                );
                return Err(AuthError::ResourceNotFound);
            }
        };

        if owner_id != crosswalk.fhir_id {
            return Err(AuthError::ResourceNotFound);
        }

        Ok(())
    }

    /// Checks that search filters stay within the beneficiary's own data.
    ///
    /// A `patient` filter must equal the beneficiary's identity exactly; a
    /// `beneficiary` filter must contain it (the value may carry a
    /// `Patient/{id}` prefix). Absent filters pass; the upstream data
    /// server scopes unfiltered searches itself.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` when a filter names someone else.
    pub fn check_search_scope(
        &self,
        query: &HashMap<String, String>,
        crosswalk: &Crosswalk,
    ) -> AuthResult<()> {
        if let Some(patient) = query.get("patient") {
            if patient != &crosswalk.fhir_id {
                return Err(AuthError::ResourceNotFound);
            }
        }

        if let Some(beneficiary) = query.get("beneficiary") {
            if !beneficiary.contains(&crosswalk.fhir_id) {
                return Err(AuthError::ResourceNotFound);
            }
        }

        Ok(())
    }

    /// Full authorization for a single-resource read.
    ///
    /// Runs the application checks, the servable-type check, crosswalk
    /// presence, and the ownership check, in that order.
    ///
    /// # Errors
    ///
    /// The first failing check's error; `MissingCrosswalk` when the
    /// principal has no usable identity mapping.
    pub fn authorize_resource(
        &self,
        application: &Application,
        crosswalk: Option<&Crosswalk>,
        resource: &ResourceEnvelope,
        now: OffsetDateTime,
    ) -> AuthResult<()> {
        self.check_application(application, now)?;
        self.check_resource_type(&resource.resource_type)?;
        let crosswalk = require_crosswalk(crosswalk)?;
        self.check_ownership(resource, crosswalk)
    }

    /// Full authorization for a search request.
    ///
    /// Runs the application checks, the servable-type check, crosswalk
    /// presence, and the search-scope check, in that order. Ownership of
    /// each returned bundle entry is checked separately via
    /// [`ResourceAccessGuard::check_ownership`].
    ///
    /// # Errors
    ///
    /// The first failing check's error.
    pub fn authorize_search(
        &self,
        application: &Application,
        crosswalk: Option<&Crosswalk>,
        resource_type: &ResourceType,
        query: &HashMap<String, String>,
        now: OffsetDateTime,
    ) -> AuthResult<()> {
        self.check_application(application, now)?;
        self.check_resource_type(resource_type)?;
        let crosswalk = require_crosswalk(crosswalk)?;
        self.check_search_scope(query, crosswalk)
    }
}

/// A crosswalk with an empty `fhir_id` is as good as no crosswalk.
fn require_crosswalk(crosswalk: Option<&Crosswalk>) -> AuthResult<&Crosswalk> {
    match crosswalk {
        Some(crosswalk) if !crosswalk.fhir_id.is_empty() => Ok(crosswalk),
        _ => Err(AuthError::MissingCrosswalk),
    }
}

fn extract_owner_id(resource: &ResourceEnvelope, rule: OwnershipRule) -> Result<String, String> {
    match rule {
        OwnershipRule::OwnId => Ok(resource.id.clone()),
        OwnershipRule::Reference(field) => {
            let value = resource
                .get_field(field)
                .ok_or_else(|| format!("missing {field} field"))?;
            let reference = value
                .get("reference")
                .and_then(|v| v.as_str())
                .ok_or_else(|| format!("{field}.reference is missing or not a string"))?;
            reference_id(reference).map_err(|err| err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::switch::StaticSwitch;
    use benegate_config::LIMIT_DATA_ACCESS;
    use crate::types::DataAccessType;
    use serde_json::json;
    use time::Duration;
    use uuid::Uuid;

    fn guard() -> ResourceAccessGuard {
        ResourceAccessGuard::new(
            Arc::new(StaticSwitch::with_active([LIMIT_DATA_ACCESS])),
            MessageSettings::default(),
        )
    }

    fn guard_switch_off() -> ResourceAccessGuard {
        ResourceAccessGuard::new(
            Arc::new(StaticSwitch::none_active()),
            MessageSettings::default(),
        )
    }

    fn active_app() -> Application {
        Application::new(Uuid::new_v4(), "Sunny Health")
    }

    fn crosswalk(fhir_id: &str) -> Crosswalk {
        Crosswalk::new(Uuid::new_v4(), fhir_id)
    }

    fn coverage_for(beneficiary_ref: &str) -> ResourceEnvelope {
        ResourceEnvelope::new("coverage-1", ResourceType::Coverage)
            .with_field("beneficiary", json!({ "reference": beneficiary_ref }))
    }

    fn eob_for(patient_ref: &str) -> ResourceEnvelope {
        ResourceEnvelope::new("eob-1", ResourceType::ExplanationOfBenefit)
            .with_field("patient", json!({ "reference": patient_ref }))
    }

    #[test]
    fn test_ownership_rule_dispatch() {
        assert_eq!(
            OwnershipRule::for_resource_type(&ResourceType::Coverage),
            OwnershipRule::Reference("beneficiary")
        );
        assert_eq!(
            OwnershipRule::for_resource_type(&ResourceType::ExplanationOfBenefit),
            OwnershipRule::Reference("patient")
        );
        assert_eq!(
            OwnershipRule::for_resource_type(&ResourceType::Patient),
            OwnershipRule::OwnId
        );
    }

    #[test]
    fn test_inactive_application_denied() {
        let now = OffsetDateTime::now_utc();
        let mut app = active_app();
        app.active = false;

        let err = guard().check_application(&app, now).unwrap_err();
        assert!(matches!(err, AuthError::ApplicationInactive { .. }));
        assert!(err.to_string().contains("Sunny Health"));
    }

    #[test]
    fn test_unnamed_application_denied_as_unknown() {
        let now = OffsetDateTime::now_utc();
        let mut app = active_app();
        app.name = String::new();
        app.active = false;

        let err = guard().check_application(&app, now).unwrap_err();
        assert!(err.to_string().contains("Unknown"));
    }

    #[test]
    fn test_ended_research_study_denied() {
        let now = OffsetDateTime::now_utc();
        let mut app = active_app();
        app.data_access_type = DataAccessType::ResearchStudy;
        app.end_date = Some(now - Duration::days(1));

        let err = guard().check_application(&app, now).unwrap_err();
        assert!(matches!(err, AuthError::StudyExpired { .. }));
        assert!(err.to_string().contains("Sunny Health"));

        // Switch off: the end date is not enforced.
        assert!(guard_switch_off().check_application(&app, now).is_ok());
    }

    #[test]
    fn test_active_application_passes() {
        let now = OffsetDateTime::now_utc();
        assert!(guard().check_application(&active_app(), now).is_ok());
    }

    #[test]
    fn test_unsupported_resource_type_denied() {
        let err = guard()
            .check_resource_type(&ResourceType::Custom("Observation".to_string()))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The requested resource type, Observation, is not supported"
        );

        assert!(guard().check_resource_type(&ResourceType::Patient).is_ok());
        assert!(guard().check_resource_type(&ResourceType::Coverage).is_ok());
        assert!(
            guard()
                .check_resource_type(&ResourceType::ExplanationOfBenefit)
                .is_ok()
        );
    }

    #[test]
    fn test_coverage_ownership_match() {
        let g = guard();
        let cw = crosswalk("12345");

        assert!(
            g.check_ownership(&coverage_for("Patient/12345"), &cw)
                .is_ok()
        );

        let err = g
            .check_ownership(&coverage_for("Patient/99999"), &cw)
            .unwrap_err();
        assert!(matches!(err, AuthError::ResourceNotFound));
    }

    #[test]
    fn test_eob_ownership_match() {
        let g = guard();
        let cw = crosswalk("-20140000008325");

        assert!(
            g.check_ownership(&eob_for("Patient/-20140000008325"), &cw)
                .is_ok()
        );
        assert!(
            g.check_ownership(&eob_for("Patient/-20140000999999"), &cw)
                .is_err()
        );
    }

    #[test]
    fn test_patient_ownership_uses_own_id() {
        let g = guard();
        let resource = ResourceEnvelope::new("12345", ResourceType::Patient);

        assert!(g.check_ownership(&resource, &crosswalk("12345")).is_ok());
        assert!(g.check_ownership(&resource, &crosswalk("67890")).is_err());
    }

    #[test]
    fn test_extraction_failures_deny_as_not_found() {
        let g = guard();
        let cw = crosswalk("12345");

        // Missing beneficiary field entirely.
        let resource = ResourceEnvelope::new("coverage-1", ResourceType::Coverage);
        assert!(matches!(
            g.check_ownership(&resource, &cw).unwrap_err(),
            AuthError::ResourceNotFound
        ));

        // Reference is not a string.
        let resource = ResourceEnvelope::new("coverage-1", ResourceType::Coverage)
            .with_field("beneficiary", json!({ "reference": 42 }));
        assert!(g.check_ownership(&resource, &cw).is_err());

        // Reference has no id segment.
        let resource = coverage_for("Patient");
        assert!(g.check_ownership(&resource, &cw).is_err());
    }

    #[test]
    fn test_search_scope_patient_filter() {
        let g = guard();
        let cw = crosswalk("12345");

        let mut query = HashMap::new();
        query.insert("patient".to_string(), "12345".to_string());
        assert!(g.check_search_scope(&query, &cw).is_ok());

        query.insert("patient".to_string(), "99999".to_string());
        assert!(g.check_search_scope(&query, &cw).is_err());
    }

    #[test]
    fn test_search_scope_beneficiary_filter_containment() {
        let g = guard();
        let cw = crosswalk("12345");

        let mut query = HashMap::new();
        query.insert("beneficiary".to_string(), "Patient/12345".to_string());
        assert!(g.check_search_scope(&query, &cw).is_ok());

        query.insert("beneficiary".to_string(), "12345".to_string());
        assert!(g.check_search_scope(&query, &cw).is_ok());

        query.insert("beneficiary".to_string(), "Patient/99999".to_string());
        assert!(g.check_search_scope(&query, &cw).is_err());
    }

    #[test]
    fn test_search_scope_without_filters_passes() {
        let g = guard();
        let query = HashMap::new();
        assert!(g.check_search_scope(&query, &crosswalk("12345")).is_ok());
    }

    #[test]
    fn test_authorize_resource_full_path() {
        let now = OffsetDateTime::now_utc();
        let g = guard();
        let app = active_app();
        let cw = crosswalk("12345");
        let resource = coverage_for("Patient/12345");

        assert!(
            g.authorize_resource(&app, Some(&cw), &resource, now)
                .is_ok()
        );
    }

    #[test]
    fn test_authorize_resource_missing_crosswalk() {
        let now = OffsetDateTime::now_utc();
        let g = guard();
        let app = active_app();
        let resource = coverage_for("Patient/12345");

        let err = g
            .authorize_resource(&app, None, &resource, now)
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCrosswalk));

        // Empty fhir_id counts as missing.
        let empty = crosswalk("");
        let err = g
            .authorize_resource(&app, Some(&empty), &resource, now)
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCrosswalk));
    }

    #[test]
    fn test_authorize_resource_inactive_app_wins_over_ownership() {
        let now = OffsetDateTime::now_utc();
        let g = guard();
        let mut app = active_app();
        app.active = false;
        let cw = crosswalk("12345");
        let resource = coverage_for("Patient/12345");

        let err = g
            .authorize_resource(&app, Some(&cw), &resource, now)
            .unwrap_err();
        assert!(matches!(err, AuthError::ApplicationInactive { .. }));
    }

    #[test]
    fn test_authorize_search_full_path() {
        let now = OffsetDateTime::now_utc();
        let g = guard();
        let app = active_app();
        let cw = crosswalk("12345");

        let mut query = HashMap::new();
        query.insert("patient".to_string(), "12345".to_string());

        assert!(
            g.authorize_search(
                &app,
                Some(&cw),
                &ResourceType::ExplanationOfBenefit,
                &query,
                now
            )
            .is_ok()
        );

        query.insert("patient".to_string(), "99999".to_string());
        let err = g
            .authorize_search(
                &app,
                Some(&cw),
                &ResourceType::ExplanationOfBenefit,
                &query,
                now,
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::ResourceNotFound));
    }
}

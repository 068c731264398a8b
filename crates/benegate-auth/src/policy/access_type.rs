//! Access-type expiration policy.
//!
//! Pure decision functions over a grant and its application's declared
//! data-access type. All time-sensitive checks take an explicit `now` and
//! an injected [`PolicySwitch`]; nothing here reads the clock or global
//! state.
//!
//! The three access types behave differently:
//!
//! - `ONE_TIME` grants never expire here; revocation is handled by the
//!   token issuer withholding refresh tokens.
//! - `RESEARCH_STUDY` grants never expire per-grant; access ends when the
//!   application's own end date passes (checked by the resource guard).
//! - `THIRTEEN_MONTH` grants expire when `now` passes the grant's
//!   `expiration_date`, but only while the `limit_data_access` switch is
//!   active.

use benegate_config::LIMIT_DATA_ACCESS;
use benegate_core::time::add_months;
use time::OffsetDateTime;

use crate::error::{AuthError, AuthResult};
use crate::policy::switch::PolicySwitch;
use crate::types::{Application, DataAccessType, Grant};

/// Number of calendar months in the default data-access window.
pub const ACCESS_WINDOW_MONTHS: u32 = 13;

/// Returns whether the grant's access has expired.
///
/// Only THIRTEEN_MONTH applications expire through this check, only while
/// the `limit_data_access` switch is active, and only when the grant
/// carries an explicit `expiration_date`. Every other combination returns
/// `false`.
#[must_use]
pub fn has_expired(
    grant: &Grant,
    application: &Application,
    switch: &dyn PolicySwitch,
    now: OffsetDateTime,
) -> bool {
    if !switch.is_active(LIMIT_DATA_ACCESS) {
        return false;
    }
    if application.data_access_type != DataAccessType::ThirteenMonth {
        return false;
    }
    match grant.expiration_date {
        Some(expiration_date) => expiration_date < now,
        None => false,
    }
}

/// Recomputes the grant's expiration date from `now`.
///
/// For THIRTEEN_MONTH applications, sets `expiration_date` to `now` plus
/// the default window ([`ACCESS_WINDOW_MONTHS`] calendar months, day
/// clamped). No-op for other access types. Safe to call on every token
/// issuance; each call restarts the window from `now`.
///
/// # Errors
///
/// Fails only when the computed date falls outside the representable year
/// range.
pub fn update_expiration_date(
    grant: &mut Grant,
    application: &Application,
    now: OffsetDateTime,
) -> AuthResult<()> {
    update_expiration_date_with_window(grant, application, ACCESS_WINDOW_MONTHS, now)
}

/// [`update_expiration_date`] with a caller-supplied window in months.
///
/// Deployments overriding the window via settings thread the configured
/// value through here.
pub fn update_expiration_date_with_window(
    grant: &mut Grant,
    application: &Application,
    window_months: u32,
    now: OffsetDateTime,
) -> AuthResult<()> {
    if application.data_access_type != DataAccessType::ThirteenMonth {
        return Ok(());
    }
    let expiration = add_months(now, window_months as i32)?;
    grant.expiration_date = Some(expiration);
    Ok(())
}

/// Validates a data-access-type and end-date combination.
///
/// RESEARCH_STUDY applications must carry an end date; every other type
/// must not. Callers reject the record on error rather than coercing the
/// fields.
///
/// # Errors
///
/// Returns `InvalidAccessTypeConfiguration` describing the violated
/// pairing rule.
pub fn validate_access_type(
    data_access_type: DataAccessType,
    end_date: Option<OffsetDateTime>,
) -> AuthResult<()> {
    match (data_access_type, end_date) {
        (DataAccessType::ResearchStudy, None) => Err(AuthError::invalid_access_type(
            "RESEARCH_STUDY requires an end date",
        )),
        (DataAccessType::OneTime, Some(_)) | (DataAccessType::ThirteenMonth, Some(_)) => {
            Err(AuthError::invalid_access_type(format!(
                "An end date is only valid for RESEARCH_STUDY, not {data_access_type}"
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::switch::StaticSwitch;
    use time::Duration;
    use uuid::Uuid;

    fn thirteen_month_app() -> Application {
        Application {
            id: Uuid::new_v4(),
            name: "Test App".to_string(),
            data_access_type: DataAccessType::ThirteenMonth,
            end_date: None,
            active: true,
        }
    }

    fn app_with_type(data_access_type: DataAccessType) -> Application {
        Application {
            data_access_type,
            ..thirteen_month_app()
        }
    }

    fn grant_expiring(expiration_date: Option<OffsetDateTime>, now: OffsetDateTime) -> Grant {
        let mut grant = Grant::new(Uuid::new_v4(), Uuid::new_v4(), now);
        grant.expiration_date = expiration_date;
        grant
    }

    fn switch_on() -> StaticSwitch {
        StaticSwitch::with_active([LIMIT_DATA_ACCESS])
    }

    #[test]
    fn test_thirteen_month_expired_when_switch_active() {
        let now = OffsetDateTime::now_utc();
        let app = thirteen_month_app();
        let grant = grant_expiring(Some(now - Duration::hours(1)), now);

        assert!(has_expired(&grant, &app, &switch_on(), now));
        assert!(!has_expired(&grant, &app, &StaticSwitch::none_active(), now));
    }

    #[test]
    fn test_future_expiration_not_expired() {
        let now = OffsetDateTime::now_utc();
        let app = thirteen_month_app();
        let grant = grant_expiring(Some(now + Duration::hours(1)), now);

        assert!(!has_expired(&grant, &app, &switch_on(), now));
        assert!(!has_expired(&grant, &app, &StaticSwitch::none_active(), now));
    }

    #[test]
    fn test_no_expiration_date_never_expires() {
        let now = OffsetDateTime::now_utc();
        let app = thirteen_month_app();
        let grant = grant_expiring(None, now);

        assert!(!has_expired(&grant, &app, &switch_on(), now));
    }

    #[test]
    fn test_one_time_and_research_never_expire_here() {
        let now = OffsetDateTime::now_utc();
        let grant = grant_expiring(Some(now - Duration::days(400)), now);

        let one_time = app_with_type(DataAccessType::OneTime);
        assert!(!has_expired(&grant, &one_time, &switch_on(), now));

        let research = app_with_type(DataAccessType::ResearchStudy);
        assert!(!has_expired(&grant, &research, &switch_on(), now));
    }

    #[test]
    fn test_update_expiration_sets_thirteen_month_window() {
        let now = time::macros::datetime!(2023-01-15 10:00:00 UTC);
        let app = thirteen_month_app();
        let mut grant = grant_expiring(None, now);

        update_expiration_date(&mut grant, &app, now).unwrap();
        assert_eq!(
            grant.expiration_date,
            Some(time::macros::datetime!(2024-02-15 10:00:00 UTC))
        );
    }

    #[test]
    fn test_update_expiration_noop_for_other_types() {
        let now = OffsetDateTime::now_utc();
        let app = app_with_type(DataAccessType::OneTime);
        let mut grant = grant_expiring(None, now);

        update_expiration_date(&mut grant, &app, now).unwrap();
        assert!(grant.expiration_date.is_none());

        let app = app_with_type(DataAccessType::ResearchStudy);
        update_expiration_date(&mut grant, &app, now).unwrap();
        assert!(grant.expiration_date.is_none());
    }

    #[test]
    fn test_update_expiration_recomputes_from_now() {
        let first = time::macros::datetime!(2023-01-15 10:00:00 UTC);
        let later = time::macros::datetime!(2023-06-01 10:00:00 UTC);
        let app = thirteen_month_app();
        let mut grant = grant_expiring(None, first);

        update_expiration_date(&mut grant, &app, first).unwrap();
        let first_expiration = grant.expiration_date;

        update_expiration_date(&mut grant, &app, later).unwrap();
        assert_ne!(grant.expiration_date, first_expiration);
        assert_eq!(
            grant.expiration_date,
            Some(time::macros::datetime!(2024-07-01 10:00:00 UTC))
        );
    }

    #[test]
    fn test_update_expiration_clamps_end_of_month() {
        // Jan 31 + 13 months lands on Feb 29 2024 (leap year).
        let now = time::macros::datetime!(2023-01-31 10:00:00 UTC);
        let app = thirteen_month_app();
        let mut grant = grant_expiring(None, now);

        update_expiration_date(&mut grant, &app, now).unwrap();
        assert_eq!(
            grant.expiration_date,
            Some(time::macros::datetime!(2024-02-29 10:00:00 UTC))
        );
    }

    #[test]
    fn test_update_expiration_with_custom_window() {
        let now = time::macros::datetime!(2023-01-15 10:00:00 UTC);
        let app = thirteen_month_app();
        let mut grant = grant_expiring(None, now);

        update_expiration_date_with_window(&mut grant, &app, 6, now).unwrap();
        assert_eq!(
            grant.expiration_date,
            Some(time::macros::datetime!(2023-07-15 10:00:00 UTC))
        );
    }

    #[test]
    fn test_validate_research_study_requires_end_date() {
        let err = validate_access_type(DataAccessType::ResearchStudy, None).unwrap_err();
        assert!(err.to_string().contains("RESEARCH_STUDY"));

        let now = OffsetDateTime::now_utc();
        assert!(validate_access_type(DataAccessType::ResearchStudy, Some(now)).is_ok());
    }

    #[test]
    fn test_validate_end_date_rejected_for_other_types() {
        let now = OffsetDateTime::now_utc();

        let err = validate_access_type(DataAccessType::OneTime, Some(now)).unwrap_err();
        assert!(err.to_string().contains("ONE_TIME"));

        let err = validate_access_type(DataAccessType::ThirteenMonth, Some(now)).unwrap_err();
        assert!(err.to_string().contains("THIRTEEN_MONTH"));

        assert!(validate_access_type(DataAccessType::OneTime, None).is_ok());
        assert!(validate_access_type(DataAccessType::ThirteenMonth, None).is_ok());
    }
}

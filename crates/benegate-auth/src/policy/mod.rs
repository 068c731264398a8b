//! Access-control policy.
//!
//! Three layers, all synchronous and clock-free (callers pass `now`):
//!
//! - [`switch`] - the injected feature-switch capability
//! - [`access_type`] - per-grant expiration decisions by data-access type
//! - [`guard`] - the per-request resource access gate

pub mod access_type;
pub mod guard;
pub mod switch;

pub use access_type::{
    ACCESS_WINDOW_MONTHS, has_expired, update_expiration_date, update_expiration_date_with_window,
    validate_access_type,
};
pub use guard::{OwnershipRule, ResourceAccessGuard};
pub use switch::{PolicySwitch, StaticSwitch};

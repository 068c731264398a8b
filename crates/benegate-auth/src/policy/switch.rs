//! Policy switch capability.
//!
//! Expiration enforcement is rolled out behind named switches (today just
//! `limit_data_access`). The switch lookup is injected so policy decisions
//! stay deterministic under test.

use std::collections::HashSet;

use benegate_config::SharedFeatureFlags;
use benegate_core::time::now_utc;

/// Capability for consulting named feature switches.
///
/// Implementations must answer from already-loaded state; the lookup sits
/// on every request path.
pub trait PolicySwitch: Send + Sync {
    /// Returns whether the named switch is currently active.
    fn is_active(&self, name: &str) -> bool;
}

/// The feature-flag registry is the production switch.
///
/// Time-based flags are evaluated against the wall clock at lookup time.
impl PolicySwitch for SharedFeatureFlags {
    fn is_active(&self, name: &str) -> bool {
        SharedFeatureFlags::is_active(self, name, now_utc())
    }
}

/// Switch with a fixed set of active names.
///
/// Used by tests and by embedded deployments that configure flags once at
/// startup.
#[derive(Debug, Clone, Default)]
pub struct StaticSwitch {
    active: HashSet<String>,
}

impl StaticSwitch {
    /// Creates a switch with the given names active.
    pub fn with_active<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            active: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a switch with no names active.
    #[must_use]
    pub fn none_active() -> Self {
        Self::default()
    }
}

impl PolicySwitch for StaticSwitch {
    fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }
}

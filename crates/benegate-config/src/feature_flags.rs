//! Feature flags for dynamic policy toggling
//!
//! Supports two flag types:
//! - Boolean: Simple on/off
//! - Time-based: Enable during a specific time window
//!
//! The gateway consults one flag today, `limit_data_access`, which gates
//! data-access-type expiration enforcement. The registry is general so the
//! next operational toggle does not need new plumbing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;

/// Flag gating data-access-type expiration enforcement.
pub const LIMIT_DATA_ACCESS: &str = "limit_data_access";

/// Type of feature flag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
#[derive(Default)]
pub enum FeatureFlagType {
    /// Simple on/off toggle
    #[default]
    Boolean,
    /// Enable during a time window
    TimeBased {
        #[serde(with = "time::serde::rfc3339::option", default)]
        start: Option<OffsetDateTime>,
        #[serde(with = "time::serde::rfc3339::option", default)]
        end: Option<OffsetDateTime>,
    },
}

/// A single feature flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlag {
    /// Flag name (e.g., "limit_data_access")
    pub name: String,
    /// Whether the flag is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Flag type for advanced evaluation
    #[serde(default, flatten)]
    pub flag_type: FeatureFlagType,
    /// Description of what this flag controls
    #[serde(default)]
    pub description: Option<String>,
    /// When this flag was last updated
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub updated_at: Option<OffsetDateTime>,
}

impl FeatureFlag {
    /// Create a new boolean feature flag
    pub fn boolean(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
            flag_type: FeatureFlagType::Boolean,
            description: None,
            updated_at: Some(OffsetDateTime::now_utc()),
        }
    }

    /// Create a time-windowed feature flag
    pub fn time_based(
        name: impl Into<String>,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            flag_type: FeatureFlagType::TimeBased { start, end },
            description: None,
            updated_at: Some(OffsetDateTime::now_utc()),
        }
    }

    /// Add description to flag
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Evaluate this flag at the given instant
    pub fn evaluate(&self, now: OffsetDateTime) -> bool {
        if !self.enabled {
            return false;
        }

        match &self.flag_type {
            FeatureFlagType::Boolean => true,

            FeatureFlagType::TimeBased { start, end } => {
                let after_start = start.is_none_or(|s| now >= s);
                let before_end = end.is_none_or(|e| now <= e);
                after_start && before_end
            }
        }
    }
}

/// Collection of feature flags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    #[serde(flatten)]
    flags: HashMap<String, FeatureFlag>,
}

impl FeatureFlags {
    /// Create a new empty feature flags collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with default built-in flags
    pub fn with_defaults() -> Self {
        let mut flags = Self::new();

        flags.set(
            FeatureFlag::boolean(LIMIT_DATA_ACCESS, false).with_description(
                "Enforce data-access-type expiration (13-month windows, research study end dates)",
            ),
        );

        flags
    }

    /// Set a feature flag
    pub fn set(&mut self, flag: FeatureFlag) {
        self.flags.insert(flag.name.clone(), flag);
    }

    /// Get a feature flag by name
    pub fn get(&self, name: &str) -> Option<&FeatureFlag> {
        self.flags.get(name)
    }

    /// Check if a flag is active at the given instant
    pub fn is_active(&self, name: &str, now: OffsetDateTime) -> bool {
        self.flags.get(name).is_some_and(|flag| flag.evaluate(now))
    }

    /// Remove a feature flag
    pub fn remove(&mut self, name: &str) -> Option<FeatureFlag> {
        self.flags.remove(name)
    }

    /// List all flags
    pub fn list(&self) -> impl Iterator<Item = &FeatureFlag> {
        self.flags.values()
    }

    /// Merge with another set of flags (other takes precedence)
    pub fn merge(&mut self, other: FeatureFlags) {
        for (name, flag) in other.flags {
            self.flags.insert(name, flag);
        }
    }

    /// Get the number of flags
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// A flag registry shared across request handlers and mutable at runtime.
///
/// Cloning is cheap; all clones observe the same flag set.
#[derive(Debug, Clone, Default)]
pub struct SharedFeatureFlags {
    inner: Arc<RwLock<FeatureFlags>>,
}

impl SharedFeatureFlags {
    pub fn new(flags: FeatureFlags) -> Self {
        Self {
            inner: Arc::new(RwLock::new(flags)),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FeatureFlags::with_defaults())
    }

    /// Check if a flag is active at the given instant
    pub fn is_active(&self, name: &str, now: OffsetDateTime) -> bool {
        self.read(|flags| flags.is_active(name, now))
    }

    /// Insert or replace a flag
    pub fn set(&self, flag: FeatureFlag) {
        self.write(|flags| flags.set(flag));
    }

    /// Remove a flag, returning it if present
    pub fn remove(&self, name: &str) -> Option<FeatureFlag> {
        self.write(|flags| flags.remove(name))
    }

    /// Clone the current flag set
    pub fn snapshot(&self) -> FeatureFlags {
        self.read(|flags| flags.clone())
    }

    // Flags are plain data, so a poisoned lock still holds a usable value.
    fn read<R>(&self, f: impl FnOnce(&FeatureFlags) -> R) -> R {
        match self.inner.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }

    fn write<R>(&self, f: impl FnOnce(&mut FeatureFlags) -> R) -> R {
        match self.inner.write() {
            Ok(mut guard) => f(&mut guard),
            Err(poisoned) => f(&mut poisoned.into_inner()),
        }
    }
}

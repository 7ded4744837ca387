#![forbid(unsafe_code)]

//! Registry configuration.
//!
//! Two-way bindings rely on "skip the write when the value is unchanged" to
//! stop echoing back and forth. Converters that are not exact inverses of
//! each other defeat that check and would recurse without end, so every
//! property binding counts how deeply it is re-entered and stops at
//! [`RegistryConfig::max_sync_depth`]. [`CyclePolicy`] decides what stopping
//! means.

/// What to do when a property binding re-enters itself too deeply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CyclePolicy {
    /// Stop propagating and log a warning. The binding stays registered.
    #[default]
    Break,
    /// Panic. Useful in tests and debug builds to surface bad converters.
    Panic,
}

/// Tunables for a [`BindingRegistry`](crate::BindingRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RegistryConfig {
    /// Nested re-entries of one property binding tolerated before the cycle
    /// policy applies. Zero is treated as one.
    pub max_sync_depth: u32,
    /// Reaction to an exceeded depth.
    pub cycle_policy: CyclePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_sync_depth: 8,
            cycle_policy: CyclePolicy::Break,
        }
    }
}

impl RegistryConfig {
    /// Set the maximum re-entry depth.
    #[must_use]
    pub fn with_max_sync_depth(mut self, depth: u32) -> Self {
        self.max_sync_depth = depth;
        self
    }

    /// Set the cycle policy.
    #[must_use]
    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub(crate) fn effective_depth(&self) -> u32 {
        self.max_sync_depth.max(1)
    }
}

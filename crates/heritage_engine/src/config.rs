//! Engine configuration and per-call behavioral switches.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default capacity of the equivalent-interface-method cache.
pub const DEFAULT_INTERFACE_METHOD_CACHE_CAPACITY: usize = 256;

/// Order in which hierarchy members are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraversalDirection {
    /// Supertype members before subtype members.
    #[default]
    TopDown,
    /// Subtype members before supertype members.
    BottomUp,
}

/// What to do when an inner class extends one of its enclosing classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CyclePolicy {
    /// Abort the whole query with an inner-class-cycle error.
    #[default]
    Fail,
    /// Stop expanding the offending branch and keep going.
    AbortBranch,
}

/// Whether class-level tag lookup continues into enclosing classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EnclosingSearch {
    /// Search the class and its supertypes only.
    #[default]
    Default,
    /// Also search the enclosing classes of inner classes, outward.
    IncludeEnclosingClasses,
}

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Capacity of the equivalent-interface-method cache (0 disables it).
    pub interface_method_cache_capacity: usize,

    /// Hide superclass and interface fields behind local fields of the same name.
    pub legacy_field_shadowing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interface_method_cache_capacity: DEFAULT_INTERFACE_METHOD_CACHE_CAPACITY,
            legacy_field_shadowing: false,
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the interface-method cache capacity.
    #[must_use]
    pub const fn with_interface_method_cache_capacity(mut self, capacity: usize) -> Self {
        self.interface_method_cache_capacity = capacity;
        self
    }

    /// Builder method to enable/disable name-based field shadowing.
    #[must_use]
    pub const fn with_legacy_field_shadowing(mut self, enabled: bool) -> Self {
        self.legacy_field_shadowing = enabled;
        self
    }
}

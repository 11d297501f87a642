//! Identifiers for declarations in a graph.
//!
//! Identifiers are dense indices into the owning graph. They are only
//! meaningful for the graph (or snapshots derived from it) that issued them.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a class, interface, tag type, or primitive type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassId(pub u32);

/// Identifier of a field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldId(pub u32);

/// Identifier of a method.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodId(pub u32);

/// A method parameter, addressed by its method and position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParameterRef {
    /// The method declaring the parameter.
    pub method: MethodId,
    /// Zero-based parameter position.
    pub index: u32,
}

impl ClassId {
    /// Returns the raw index of this class.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl FieldId {
    /// Returns the raw index of this field.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl MethodId {
    /// Returns the raw index of this method.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns a reference to one of this method's parameters.
    #[must_use]
    pub const fn parameter(self, index: u32) -> ParameterRef {
        ParameterRef {
            method: self,
            index,
        }
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({})", self.0)
    }
}

impl fmt::Debug for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodId({})", self.0)
    }
}

impl fmt::Debug for ParameterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParameterRef({}#{})", self.method.0, self.index)
    }
}

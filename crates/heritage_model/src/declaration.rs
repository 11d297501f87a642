//! The closed set of declaration kinds.

use std::fmt;

use heritage_foundation::{ClassId, FieldId, MethodId, ParameterRef, TagInstance};

use crate::class::ClassDecl;
use crate::member::{FieldDecl, MethodDecl, ParameterDecl};

/// Any declaration that can carry tags.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub enum Declaration {
    /// A class, interface, tag type, or primitive.
    Class(ClassId),
    /// A field.
    Field(FieldId),
    /// A method.
    Method(MethodId),
    /// A method parameter.
    Parameter(ParameterRef),
}

impl Declaration {
    /// Returns the class id if this is a class declaration.
    #[must_use]
    pub const fn as_class(self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(id),
            _ => None,
        }
    }
}

impl From<ClassId> for Declaration {
    fn from(id: ClassId) -> Self {
        Self::Class(id)
    }
}

impl From<FieldId> for Declaration {
    fn from(id: FieldId) -> Self {
        Self::Field(id)
    }
}

impl From<MethodId> for Declaration {
    fn from(id: MethodId) -> Self {
        Self::Method(id)
    }
}

impl From<ParameterRef> for Declaration {
    fn from(r: ParameterRef) -> Self {
        Self::Parameter(r)
    }
}

impl fmt::Debug for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(id) => write!(f, "{id:?}"),
            Self::Field(id) => write!(f, "{id:?}"),
            Self::Method(id) => write!(f, "{id:?}"),
            Self::Parameter(r) => write!(f, "{r:?}"),
        }
    }
}

/// Capability shared by all declaration kinds: their directly attached tags.
pub trait Tagged {
    /// Returns the directly attached tags in declaration order.
    fn direct_tags(&self) -> &[TagInstance];
}

impl Tagged for ClassDecl {
    fn direct_tags(&self) -> &[TagInstance] {
        &self.tags
    }
}

impl Tagged for FieldDecl {
    fn direct_tags(&self) -> &[TagInstance] {
        &self.tags
    }
}

impl Tagged for MethodDecl {
    fn direct_tags(&self) -> &[TagInstance] {
        &self.tags
    }
}

impl Tagged for ParameterDecl {
    fn direct_tags(&self) -> &[TagInstance] {
        &self.tags
    }
}

//! Attribute type descriptors for tag types.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::id::ClassId;
use crate::value::AttrValue;

/// Declared type of a tag attribute.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttrType {
    /// Boolean attribute.
    Bool,
    /// 64-bit signed integer attribute.
    Int,
    /// String attribute.
    Str,
    /// Class literal attribute.
    Class,
    /// Constant of the given enum class.
    Enum(ClassId),
    /// Nested tag of the given tag type.
    Tag(ClassId),
    /// Homogeneous array attribute.
    Array(Box<AttrType>),
}

impl AttrType {
    /// Creates an array type with the given element type.
    #[must_use]
    pub fn array(element: AttrType) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns true if this is an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns the element type of an array type.
    #[must_use]
    pub fn element(&self) -> Option<&AttrType> {
        match self {
            Self::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the tag type for `Tag` attributes.
    #[must_use]
    pub const fn tag_type(&self) -> Option<ClassId> {
        match self {
            Self::Tag(id) => Some(*id),
            _ => None,
        }
    }

    /// Checks if a value is accepted by this type.
    ///
    /// Arrays check every element recursively.
    #[must_use]
    pub fn accepts(&self, value: &AttrValue) -> bool {
        match (self, value) {
            (Self::Bool, AttrValue::Bool(_))
            | (Self::Int, AttrValue::Int(_))
            | (Self::Str, AttrValue::Str(_))
            | (Self::Class, AttrValue::Class(_)) => true,
            (Self::Enum(ty), AttrValue::Enum { ty: actual, .. }) => ty == actual,
            (Self::Tag(ty), AttrValue::Tag(tag)) => *ty == tag.tag_type(),
            (Self::Array(element), AttrValue::Array(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for AttrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Str => write!(f, "string"),
            Self::Class => write!(f, "class"),
            Self::Enum(id) => write!(f, "enum<{}>", id.0),
            Self::Tag(id) => write!(f, "tag<{}>", id.0),
            Self::Array(element) => write!(f, "{element}[]"),
        }
    }
}

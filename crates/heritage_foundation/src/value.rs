//! Tag attribute values and tag instances.

use std::fmt;
use std::sync::Arc;

use crate::id::ClassId;
use crate::intern::NameId;

/// Value of a tag attribute.
///
/// Values are immutable and cheaply cloneable. Equality and hashing are
/// structural, which makes two tag instances with the same type and the same
/// attribute values the same instance.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum AttrValue {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// String value.
    Str(Arc<str>),
    /// Class literal.
    Class(ClassId),
    /// Enum constant.
    Enum {
        /// The enum class.
        ty: ClassId,
        /// The constant name.
        constant: NameId,
    },
    /// Nested tag instance.
    Tag(TagInstance),
    /// Array of values.
    Array(Arc<[AttrValue]>),
}

impl AttrValue {
    /// Creates an array value.
    #[must_use]
    pub fn array(items: impl IntoIterator<Item = AttrValue>) -> Self {
        Self::Array(items.into_iter().collect())
    }

    /// Creates an array of nested tag instances.
    #[must_use]
    pub fn tags(items: impl IntoIterator<Item = TagInstance>) -> Self {
        Self::Array(items.into_iter().map(Self::Tag).collect())
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract a class literal.
    #[must_use]
    pub const fn as_class(&self) -> Option<ClassId> {
        match self {
            Self::Class(id) => Some(*id),
            _ => None,
        }
    }

    /// Attempts to extract a nested tag.
    #[must_use]
    pub const fn as_tag(&self) -> Option<&TagInstance> {
        match self {
            Self::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Attempts to extract array elements.
    #[must_use]
    pub fn as_array(&self) -> Option<&[AttrValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<TagInstance> for AttrValue {
    fn from(tag: TagInstance) -> Self {
        Self::Tag(tag)
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Class(id) => write!(f, "{id:?}"),
            Self::Enum { ty, constant } => write!(f, "{ty:?}::{constant:?}"),
            Self::Tag(tag) => write!(f, "{tag:?}"),
            Self::Array(items) => f.debug_list().entries(items.iter()).finish(),
        }
    }
}

/// One occurrence of a tag type attached to a declaration.
///
/// Attributes are kept sorted by name with at most one value per name, so two
/// occurrences written with their attributes in a different order are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TagInstance {
    tag_type: ClassId,
    attributes: Arc<[(NameId, AttrValue)]>,
}

impl TagInstance {
    /// Creates an instance with no attribute values.
    #[must_use]
    pub fn new(tag_type: ClassId) -> Self {
        Self {
            tag_type,
            attributes: Arc::from([]),
        }
    }

    /// Creates an instance with the given attribute values.
    #[must_use]
    pub fn with_attributes(
        tag_type: ClassId,
        attributes: impl IntoIterator<Item = (NameId, AttrValue)>,
    ) -> Self {
        let mut sorted = Vec::new();
        for (name, value) in attributes {
            set_attribute(&mut sorted, name, value);
        }
        Self {
            tag_type,
            attributes: sorted.into(),
        }
    }

    /// Returns a copy of this instance with the attribute set to `value`.
    #[must_use]
    pub fn with(&self, name: NameId, value: impl Into<AttrValue>) -> Self {
        let mut attributes = self.attributes.to_vec();
        set_attribute(&mut attributes, name, value.into());
        Self {
            tag_type: self.tag_type,
            attributes: attributes.into(),
        }
    }

    /// Creates a container instance holding the given tags in its `value` array.
    #[must_use]
    pub fn container(tag_type: ClassId, contained: impl IntoIterator<Item = TagInstance>) -> Self {
        Self::with_attributes(tag_type, [(NameId::VALUE, AttrValue::tags(contained))])
    }

    /// Returns the tag type of this instance.
    #[must_use]
    pub const fn tag_type(&self) -> ClassId {
        self.tag_type
    }

    /// Returns all attribute values, sorted by name.
    #[must_use]
    pub fn attributes(&self) -> &[(NameId, AttrValue)] {
        &self.attributes
    }

    /// Gets an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: NameId) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// Gets the `value` attribute.
    #[must_use]
    pub fn value(&self) -> Option<&AttrValue> {
        self.attribute(NameId::VALUE)
    }

    /// Returns the tags held in the `value` array, in order.
    ///
    /// Non-tag elements and a missing or non-array `value` yield nothing.
    pub fn contained_tags(&self) -> impl Iterator<Item = &TagInstance> {
        self.value()
            .and_then(AttrValue::as_array)
            .unwrap_or(&[])
            .iter()
            .filter_map(AttrValue::as_tag)
    }
}

/// Inserts or replaces `name` in a name-sorted attribute list. A later value
/// for the same name wins.
fn set_attribute(attributes: &mut Vec<(NameId, AttrValue)>, name: NameId, value: AttrValue) {
    match attributes.binary_search_by_key(&name, |(n, _)| *n) {
        Ok(index) => attributes[index].1 = value,
        Err(index) => attributes.insert(index, (name, value)),
    }
}

impl fmt::Debug for TagInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.tag_type.0)?;
        if !self.attributes.is_empty() {
            let mut map = f.debug_map();
            for (name, value) in self.attributes.iter() {
                map.entry(&name.index(), value);
            }
            map.finish()?;
        }
        Ok(())
    }
}

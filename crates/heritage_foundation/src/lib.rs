//! Core identifiers, names, tag values, and error types for heritage.
//!
//! This crate provides:
//! - [`ClassId`], [`FieldId`], [`MethodId`], [`ParameterRef`] - Declaration identifiers
//! - [`Interner`] - Name interning for qualified and member names
//! - [`TagInstance`], [`AttrValue`] and [`AttrType`] - Tag occurrences, attribute values, and their types
//! - [`Error`] - Rich error types with context
//! - Collections ([`DeclVec`], [`OrderedSet`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod error;
pub mod id;
pub mod intern;
pub mod types;
pub mod value;

pub use collections::{DeclVec, OrderedSet};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use id::{ClassId, FieldId, MethodId, ParameterRef};
pub use intern::{Interner, NameId};
pub use types::AttrType;
pub use value::{AttrValue, TagInstance};

//! Immutable declaration graph for heritage.
//!
//! This crate provides:
//! - [`ClassDecl`], [`FieldDecl`], [`MethodDecl`], [`ParameterDecl`] - Declarations
//! - [`Declaration`] - Closed variant over all declaration kinds
//! - [`DeclarationSource`] - The provider interface queried by the engine
//! - [`DeclarationGraph`] - Immutable snapshot with structural sharing
//! - [`GraphBuilder`] - Loads declarations and validates the inheritance graph

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builder;
pub mod class;
pub mod declaration;
pub mod graph;
pub mod member;
pub mod source;

pub use builder::{ClassBuilder, FieldBuilder, GraphBuilder, MethodBuilder};
pub use class::{AttributeDecl, ClassDecl, ClassKind, Modifiers, TagTypeInfo, Visibility};
pub use declaration::{Declaration, Tagged};
pub use graph::DeclarationGraph;
pub use member::{FieldDecl, MethodDecl, ParameterDecl, TypeRef};
pub use source::DeclarationSource;

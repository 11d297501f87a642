//! Heritage - declaration metadata resolution
//!
//! This crate re-exports all layers of the heritage system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: heritage_engine     — Hierarchy walker, tag resolver, cycle guard, caches
//! Layer 1: heritage_model      — Declarations, immutable graph snapshots, builder
//! Layer 0: heritage_foundation — Identifiers, names, tag values, Error
//! ```
//!
//! # Example
//!
//! ```
//! use heritage::engine::{Engine, TraversalDirection};
//! use heritage::foundation::TagInstance;
//! use heritage::model::GraphBuilder;
//!
//! let mut b = GraphBuilder::new();
//! let config = b.tag_type("org.example.Config").inherited().finish();
//! let base = b.class("org.example.Base").tag(TagInstance::new(config)).finish();
//! let derived = b.class("org.example.Derived").extends(base).finish();
//! b.method(base, "run").finish();
//! let engine = Engine::new(b.build().unwrap());
//!
//! assert!(engine.is_tagged(derived, config).unwrap());
//! let methods = engine.find_methods(derived, |_| true, TraversalDirection::TopDown).unwrap();
//! assert_eq!(methods.len(), 1);
//! ```

pub use heritage_engine as engine;
pub use heritage_foundation as foundation;
pub use heritage_model as model;

//! Hierarchy walking and tag resolution for heritage.
//!
//! This crate provides:
//! - [`Engine`] - Query facade over a [`DeclarationSource`](heritage_model::DeclarationSource)
//! - Hierarchy walking with override and shadowing rules (`find_methods`, `find_fields`, ...)
//! - Tag resolution: direct, meta, inherited, and repeatable tags (`find_tag`, `find_repeatable_tags`)
//! - Nested-class discovery guarded against inner-class cycles
//! - [`ResolutionCaches`] - Concurrent caches shared between queries
//! - [`EngineConfig`] and the per-call switches [`TraversalDirection`], [`CyclePolicy`], [`EnclosingSearch`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod config;
mod cycle;
mod engine;
mod hierarchy;
mod interface_method;
pub mod ordering;
mod repeatable;
mod tags;

pub use cache::{CacheStats, ResolutionCaches};
pub use config::{CyclePolicy, EnclosingSearch, EngineConfig, TraversalDirection};
pub use engine::Engine;

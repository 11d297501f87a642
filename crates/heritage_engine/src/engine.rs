//! The query facade.

use std::sync::Arc;

use heritage_foundation::{ClassId, FieldId, MethodId};
use heritage_model::{ClassDecl, DeclarationSource, FieldDecl, MethodDecl};

use crate::cache::{CacheStats, ResolutionCaches};
use crate::config::EngineConfig;

/// Resolves members and tags over a declaration source.
///
/// Queries are split across modules: hierarchy walking, single-tag lookup,
/// repeatable-tag flattening, nested-class discovery, and interface-method
/// resolution. All of them take `&self`; an engine can be shared between
/// threads.
#[derive(Debug)]
pub struct Engine<S> {
    pub(crate) source: S,
    pub(crate) config: EngineConfig,
    pub(crate) caches: Arc<ResolutionCaches>,
}

impl<S: DeclarationSource> Engine<S> {
    /// Creates an engine with default configuration and fresh caches.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    /// Creates an engine with the given configuration and fresh caches.
    #[must_use]
    pub fn with_config(source: S, config: EngineConfig) -> Self {
        let caches = Arc::new(ResolutionCaches::with_capacity(
            config.interface_method_cache_capacity,
        ));
        Self::with_caches(source, config, caches)
    }

    /// Creates an engine that uses existing caches.
    ///
    /// Caches keyed by identifiers must only be shared between engines over
    /// the same declaration graph.
    #[must_use]
    pub fn with_caches(source: S, config: EngineConfig, caches: Arc<ResolutionCaches>) -> Self {
        Self {
            source,
            config,
            caches,
        }
    }

    /// Returns the declaration source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the caches.
    #[must_use]
    pub fn caches(&self) -> &Arc<ResolutionCaches> {
        &self.caches
    }

    /// Empties all caches.
    pub fn clear_caches(&self) {
        self.caches.clear();
    }

    /// Returns current cache entry counts.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }

    // =========================================================================
    // Tolerant lookups
    // =========================================================================

    // Mid-walk lookups: a failure drops the branch instead of the query.

    pub(crate) fn load(&self, id: ClassId) -> Option<&ClassDecl> {
        match self.source.class(id) {
            Ok(class) => Some(class),
            Err(err) if err.is_structural() => {
                tracing::debug!(
                    class = self.source.class_name(id),
                    error = %err,
                    "failed to load class; skipping branch"
                );
                None
            }
            Err(err) => {
                tracing::warn!(class = ?id, error = %err, "unexpected class lookup failure");
                None
            }
        }
    }

    pub(crate) fn load_method(&self, id: MethodId) -> Option<&MethodDecl> {
        match self.source.method(id) {
            Ok(method) => Some(method),
            Err(err) => {
                tracing::debug!(method = ?id, error = %err, "failed to load method");
                None
            }
        }
    }

    pub(crate) fn load_field(&self, id: FieldId) -> Option<&FieldDecl> {
        match self.source.field(id) {
            Ok(field) => Some(field),
            Err(err) => {
                tracing::debug!(field = ?id, error = %err, "failed to load field");
                None
            }
        }
    }
}

//! Error types for the heritage system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result type alias used throughout heritage.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for heritage operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unresolved type error.
    #[must_use]
    pub fn unresolved_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedType(name.into()))
    }

    /// Creates an unknown declaration error.
    #[must_use]
    pub fn unknown_declaration(what: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownDeclaration(what.into()))
    }

    /// Creates an inner class cycle error.
    #[must_use]
    pub fn inner_class_cycle(class: impl Into<String>, enclosing: impl Into<String>) -> Self {
        Self::new(ErrorKind::InnerClassCycle {
            class: class.into(),
            enclosing: enclosing.into(),
        })
    }

    /// Creates an inheritance cycle error.
    #[must_use]
    pub fn inheritance_cycle(class: impl Into<String>) -> Self {
        Self::new(ErrorKind::InheritanceCycle(class.into()))
    }

    /// Creates a "not a tag type" error.
    #[must_use]
    pub fn not_a_tag_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotATagType(name.into()))
    }

    /// Creates a "tag type is not repeatable" error.
    #[must_use]
    pub fn not_repeatable(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotRepeatable(name.into()))
    }

    /// Creates a duplicate declaration error.
    #[must_use]
    pub fn duplicate_declaration(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateDeclaration(name.into()))
    }

    /// Creates an invalid attribute value error.
    #[must_use]
    pub fn invalid_attribute(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidAttribute {
            tag: tag.into(),
            attribute: attribute.into(),
            expected: expected.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this error means part of the graph could not be loaded.
    ///
    /// Walks treat these as "this branch contributes nothing".
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnresolvedType(_) | ErrorKind::UnknownDeclaration(_)
        )
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A referenced type has a name but no loaded declaration.
    #[error("unresolved type: {0}")]
    UnresolvedType(String),

    /// An identifier does not belong to the declaration graph.
    #[error("unknown declaration: {0}")]
    UnknownDeclaration(String),

    /// An inner class extends one of its own enclosing classes.
    #[error("detected cycle in inner class hierarchy between {class} and {enclosing}")]
    InnerClassCycle {
        /// The inner class that was checked.
        class: String,
        /// The enclosing class that is also its superclass.
        enclosing: String,
    },

    /// The superclass or interface chain of a class loops back on itself.
    #[error("inheritance cycle through {0}")]
    InheritanceCycle(String),

    /// A tag lookup was requested for a declaration that is not a tag type.
    #[error("not a tag type: {0}")]
    NotATagType(String),

    /// Repeatable-tag flattening was requested for a tag type without a container.
    #[error("{0} must be repeatable")]
    NotRepeatable(String),

    /// The same qualified name was declared twice.
    #[error("duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// A tag instance carries a value its tag type's attribute does not accept.
    #[error("attribute {attribute} of {tag} expects {expected}")]
    InvalidAttribute {
        /// The tag type.
        tag: String,
        /// The attribute name.
        attribute: String,
        /// The declared attribute type.
        expected: String,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The query that was running (e.g. `find_methods`).
    pub operation: Option<String>,
    /// Declarations visited on the way to the failure, outermost first.
    pub path: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Adds a visited declaration.
    #[must_use]
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.path.push(step.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operation) = &self.operation {
            write!(f, "in {operation}")?;
        }
        if !self.path.is_empty() {
            writeln!(f)?;
            for step in &self.path {
                writeln!(f, "  via {step}")?;
            }
        }
        Ok(())
    }
}

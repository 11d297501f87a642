//! Integration tests for Layer 2: Engine
//!
//! Tests for hierarchy walking, tag resolution, repeatable tags, and
//! nested-class discovery.

mod hierarchy;

//! Error Types
//!
//! This module defines the error types used throughout the workspace.
//!
//! # Overview
//!
//! The main error type [`ArborError`] covers the structural violations a
//! caller can commit against the transform hierarchy:
//! - Attaching a node that already has a parent
//! - Addressing a node through a stale or foreign handle
//! - Attaching a node beneath itself or one of its descendants
//!
//! Missing data (an unknown node name, an unbound animation channel) is not
//! an error. Those lookups return `Option` and the evaluators skip them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arbor_core::{ArborError, Result};
//!
//! fn attach(graph: &mut SceneGraph, parent: NodeHandle, child: NodeHandle) -> Result<()> {
//!     graph.add_child(parent, child)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for hierarchy mutation.
///
/// Every variant is raised before any state is touched, so a failed
/// operation leaves both trees exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArborError {
    // ========================================================================
    // Structural Errors
    // ========================================================================
    /// The node is already attached to a parent. Use `reparent` or
    /// `add_child_and_save_transform` to move it.
    #[error("Node '{0}' is already parented")]
    AlreadyParented(String),

    /// A node cannot become its own child.
    #[error("Node '{0}' cannot be attached to itself")]
    SelfParent(String),

    /// The requested parent is a descendant of the child.
    #[error("Attaching '{child}' under '{parent}' would create a cycle")]
    CycleDetected {
        /// Name of the node being attached
        child: String,
        /// Name of the requested parent
        parent: String,
    },

    // ========================================================================
    // Handle Errors
    // ========================================================================
    /// The handle does not refer to a live node in this graph.
    #[error("Invalid node handle: {0}")]
    InvalidHandle(String),
}

/// Alias for `Result<T, ArborError>`.
pub type Result<T> = std::result::Result<T, ArborError>;

//! Errors raised by tree mutations.

use thiserror::Error;

/// Failure of a DOM tree mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node being appended already belongs to another parent.
    #[error("<{tag}> is already attached to a parent")]
    AlreadyAttached {
        /// Tag of the node that was being appended.
        tag: String,
    },
    /// Appending would make a node its own ancestor.
    #[error("cannot append <{child}> inside itself or one of its descendants (<{parent}>)")]
    HierarchyRequest {
        /// Tag of the would-be parent.
        parent: String,
        /// Tag of the node that was being appended.
        child: String,
    },
}

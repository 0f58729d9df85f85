//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
///
/// All of them are raised before the tree is touched, so a failed
/// operation never leaves a partial mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The insertion would make a node its own ancestor
    #[error("Hierarchy request error: node would become its own ancestor")]
    HierarchyRequest,

    /// The named child does not belong to the given parent
    #[error("Node not found: not a child of the given parent")]
    NotFound,

    /// The id does not refer to a node of this tree
    #[error("Invalid node reference {0}")]
    InvalidNode(NodeId),

    /// The operation is not supported for this kind of node
    #[error("Operation not supported for this node")]
    NotSupported,

    /// The element already owns a shadow root
    #[error("Element already has a shadow root")]
    AlreadyAttached,
}

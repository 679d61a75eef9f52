use crate::types::NodeId;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Node {child} is an ancestor of {parent}; adding it would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("A node cannot be its own child: {0}")]
    SelfParent(NodeId),
    #[error("Recursion depth limit exceeded")]
    RecursionLimit,
}

use thiserror::Error;

use crate::NodeRef;

///Errors that happen when operating on the graph directly. For instance, when referencing a deleted node, or when the
/// [lint](crate::Graph::lint) finds a broken invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("The node {0:?} is invalid. It might have been deleted since its creation.")]
    InvalidNode(NodeRef),
    #[error("Node {node:?} is still used by {users} node(s) and can't be removed")]
    NodeInUse { node: NodeRef, users: usize },
    #[error("Expected argument {index} of {node:?} to be a node, but it is a literal or missing")]
    ExpectedNodeArgument { node: NodeRef, index: usize },

    #[error("Node {user:?} uses {producer:?} before it is defined")]
    UseBeforeDefinition { producer: NodeRef, user: NodeRef },
    #[error("{user:?} uses {producer:?}, but is not registered as its user")]
    MissingUser { producer: NodeRef, user: NodeRef },
    #[error("{user:?} is registered as user of {producer:?}, but does not use it (or does not exist)")]
    DanglingUser { producer: NodeRef, user: NodeRef },
    #[error("{0:?} is defined more than once")]
    DuplicateDefinition(NodeRef),
    #[error("{0:?} exists, but is not part of the program order")]
    OrphanNode(NodeRef),
    #[error("Graph has more than one output node ({0:?} and {1:?})")]
    MultipleOutputs(NodeRef, NodeRef),
    #[error("The output node {0:?} is used by other nodes")]
    OutputHasUsers(NodeRef),
}

//! Graph rewriting utilities.
//!
//! - [rewire]: rerouting uses of a node, and node removal.
//! - [dead_node_elimination]: removal of everything that does not contribute to an output.

pub mod dead_node_elimination;
pub mod rewire;

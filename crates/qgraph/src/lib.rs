/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! # QGraph
//!
//! A small node-list graph IR as it is produced by tracing/exporting machine-learning programs.
//!
//! The graph is a flat, ordered list of [Node]s. Each node has a [NodeKind], an ordered list of [Argument]s and a set
//! of _users_, which are all nodes that reference this node as an argument. Nodes are stored in a [SlotMap], the
//! program order is tracked separately, so deleting nodes never invalidates other [NodeRef]s.
//!
//! The crate is generic over the operator set `O` of [NodeKind::Call]. Implement [GraphOp] for your dialect's
//! operator enumeration to use it.
//!
//! Mutation happens through a narrow set of primitives:
//!
//! - [Graph::replace_all_uses_with]: reroute every consumer of a node to another node,
//! - [Graph::remove_node]: delete a node that has no users anymore,
//! - [Graph::eliminate_dead_code]: delete everything that does not contribute to an output,
//! - [Graph::lint]: verify referential integrity after a rewrite.

use std::fmt::Debug;

use ahash::{AHashMap, AHashSet};
use err::GraphError;
use nodes::{Argument, Node, NodeKind};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

#[cfg(feature = "dot")]
pub mod dot;
pub mod err;
pub mod nodes;
mod printer;
pub mod util;
mod verify;

pub use smallvec;

new_key_type! {pub struct NodeRef;}

///Small collection used for argument and user lists. Most nodes have less than four of each.
pub type SmallColl<T> = SmallVec<[T; 4]>;

///Operator set of a dialect that can be _called_ by a [NodeKind::Call] node.
pub trait GraphOp: Debug + Clone + PartialEq {
    ///Name of the operator. Used for naming nodes and printing.
    fn name(&self) -> String;
    ///Impure operators are never removed by [Graph::eliminate_dead_code], even if no one uses their value.
    fn is_impure(&self) -> bool {
        false
    }
}

///The graph state. Owns all nodes and tracks their program order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph<O: GraphOp + 'static> {
    pub(crate) nodes: SlotMap<NodeRef, Node<O>>,
    ///Program order of all nodes in `nodes`.
    pub(crate) order: Vec<NodeRef>,
    ///Counts how often a base name was handed out, used to keep node names unique.
    pub(crate) names: AHashMap<String, usize>,
    ///Every name handed out so far. Names of deleted nodes are not reused.
    pub(crate) issued: AHashSet<String>,
}

impl<O: GraphOp + 'static> Default for Graph<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: GraphOp + 'static> Graph<O> {
    pub fn new() -> Self {
        Graph {
            nodes: SlotMap::default(),
            order: Vec::new(),
            names: AHashMap::default(),
            issued: AHashSet::default(),
        }
    }

    ///Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    ///Appends a new node of `kind` to the graph and registers it as user of all nodes in `args`.
    ///
    /// # Errors
    /// Returns [GraphError::InvalidNode] if any argument references a node that is not (or no longer) part of the graph.
    pub fn insert_node(
        &mut self,
        kind: NodeKind<O>,
        args: impl IntoIterator<Item = Argument>,
    ) -> Result<NodeRef, GraphError> {
        let args: SmallColl<Argument> = args.into_iter().collect();
        for arg in &args {
            if let Argument::Node(producer) = arg {
                if !self.nodes.contains_key(*producer) {
                    return Err(GraphError::InvalidNode(*producer));
                }
            }
        }

        let name = self.unique_name(&kind);
        let nref = self.nodes.insert(Node {
            name,
            kind,
            args,
            users: SmallColl::new(),
        });

        //register as user on all (unique) producers
        for producer in self.producers(nref) {
            self.nodes[producer].add_user(nref);
        }

        self.order.push(nref);
        Ok(nref)
    }

    ///Adds a graph input named `name`.
    pub fn placeholder(&mut self, name: &str) -> NodeRef {
        let name = self.unique_base(name);
        self.push_leaf(name, NodeKind::Placeholder)
    }

    ///Adds a node that loads the constant / parameter `target`.
    pub fn get_attr(&mut self, target: &str) -> NodeRef {
        let kind = NodeKind::GetAttr {
            target: target.to_owned(),
        };
        let name = self.unique_name(&kind);
        self.push_leaf(name, kind)
    }

    ///Appends a node without arguments.
    fn push_leaf(&mut self, name: String, kind: NodeKind<O>) -> NodeRef {
        let nref = self.nodes.insert(Node {
            name,
            kind,
            args: SmallColl::new(),
            users: SmallColl::new(),
        });
        self.order.push(nref);
        nref
    }

    ///Adds a call of `op` with the given arguments.
    pub fn call(
        &mut self,
        op: O,
        args: impl IntoIterator<Item = Argument>,
    ) -> Result<NodeRef, GraphError> {
        self.insert_node(NodeKind::Call(op), args)
    }

    ///Adds the output node that returns all `values`.
    pub fn output(
        &mut self,
        values: impl IntoIterator<Item = NodeRef>,
    ) -> Result<NodeRef, GraphError> {
        self.insert_node(NodeKind::Output, values.into_iter().map(Argument::Node))
    }

    ///Returns reference to the node, assuming that it exists. Panics if it does not exist.
    pub fn node(&self, nref: NodeRef) -> &Node<O> {
        self.nodes.get(nref).unwrap()
    }

    ///Returns reference to the node, assuming that it exists. Panics if it does not exist.
    pub fn node_mut(&mut self, nref: NodeRef) -> &mut Node<O> {
        self.nodes.get_mut(nref).unwrap()
    }

    pub fn try_node(&self, nref: NodeRef) -> Option<&Node<O>> {
        self.nodes.get(nref)
    }

    pub fn contains(&self, nref: NodeRef) -> bool {
        self.nodes.contains_key(nref)
    }

    ///All nodes in program order.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.order
    }

    ///Iterates all nodes in program order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &Node<O>)> + '_ {
        self.order.iter().map(|nref| (*nref, &self.nodes[*nref]))
    }

    ///All nodes that use the value of `nref` as an argument. Empty if `nref` is invalid.
    pub fn users(&self, nref: NodeRef) -> &[NodeRef] {
        self.nodes
            .get(nref)
            .map(|n| n.users.as_slice())
            .unwrap_or(&[])
    }

    ///Returns a unique set of nodes that are referenced by the arguments of `nref`.
    pub fn producers(&self, nref: NodeRef) -> SmallColl<NodeRef> {
        let mut known = SmallColl::new();
        if let Some(node) = self.nodes.get(nref) {
            for producer in node.arg_nodes() {
                if !known.contains(&producer) {
                    known.push(producer);
                }
            }
        }
        known
    }

    ///Returns the first node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeRef> {
        self.iter().find(|(_, n)| n.name == name).map(|(r, _)| r)
    }

    ///The output node, if there is any.
    pub fn output_node(&self) -> Option<NodeRef> {
        self.iter()
            .find(|(_, n)| n.kind.is_output())
            .map(|(r, _)| r)
    }

    fn unique_name(&mut self, kind: &NodeKind<O>) -> String {
        let base = match kind {
            NodeKind::Placeholder => "arg".to_owned(),
            NodeKind::GetAttr { target } => target.replace('.', "_"),
            NodeKind::Call(op) => op.name().replace('.', "_"),
            NodeKind::Output => "output".to_owned(),
        };
        self.unique_base(&base)
    }

    fn unique_base(&mut self, base: &str) -> String {
        let count = self.names.entry(base.to_owned()).or_insert(0);
        loop {
            let candidate = if *count == 0 {
                base.to_owned()
            } else {
                format!("{base}_{count}")
            };
            *count += 1;
            if self.issued.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

impl<O: GraphOp + 'static> std::ops::Index<NodeRef> for Graph<O> {
    type Output = Node<O>;
    fn index(&self, index: NodeRef) -> &Self::Output {
        self.node(index)
    }
}

impl<O: GraphOp + 'static> std::ops::IndexMut<NodeRef> for Graph<O> {
    fn index_mut(&mut self, index: NodeRef) -> &mut Self::Output {
        self.node_mut(index)
    }
}

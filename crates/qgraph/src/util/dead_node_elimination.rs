/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! This module implements the generic dead-node-elimination (DNE).
//!
//! See
//!
//! - [eliminate_dead_code](crate::Graph::eliminate_dead_code)
//! - [liveness](crate::Graph::liveness)
//!
//! The _mark_ phase is a backwards walk over the arguments of all live seeds. Seeds are the output node, all
//! placeholders (the graph's signature must not change) and all impure calls. The _sweep_ deletes every node that
//! was not marked.

use ahash::AHashSet;

use crate::{
    nodes::{Node, NodeKind},
    Graph, GraphOp, NodeRef,
};

impl<O: GraphOp + 'static> Graph<O> {
    ///True if `node` must be kept regardless of its users.
    fn is_liveness_seed(&self, node: NodeRef) -> bool {
        match &self.nodes[node].kind {
            NodeKind::Output | NodeKind::Placeholder => true,
            NodeKind::Call(op) => op.is_impure(),
            NodeKind::GetAttr { .. } => false,
        }
    }

    ///Returns the set of all nodes that (transitively) contribute to an output, placeholder or impure call.
    pub fn liveness(&self) -> AHashSet<NodeRef> {
        let mut live = AHashSet::with_capacity(self.order.len());
        let mut stack: Vec<NodeRef> = self
            .order
            .iter()
            .filter(|n| self.is_liveness_seed(**n))
            .cloned()
            .collect();

        while let Some(node) = stack.pop() {
            if !live.insert(node) {
                continue;
            }
            for producer in self.nodes[node].arg_nodes() {
                if self.nodes.contains_key(producer) && !live.contains(&producer) {
                    stack.push(producer);
                }
            }
        }

        live
    }

    ///Applies dead-node-elimination to the whole graph. Returns all nodes that
    /// where deleted, in program order.
    pub fn eliminate_dead_code(&mut self) -> Vec<Node<O>> {
        let live = self.liveness();
        let dead: Vec<NodeRef> = self
            .order
            .iter()
            .filter(|n| !live.contains(*n))
            .cloned()
            .collect();

        if dead.is_empty() {
            return Vec::with_capacity(0);
        }

        //Users of a dead node are dead as well, so unregistering each dead node
        //from its producers leaves no user entry pointing at a removed node.
        let mut deleted = Vec::with_capacity(dead.len());
        for node in &dead {
            if let Some(removed) = self.detach_node(*node) {
                deleted.push(removed);
            }
        }
        self.order.retain(|n| live.contains(n));

        #[cfg(feature = "log")]
        log::debug!("DNE removed {} node(s)", deleted.len());

        deleted
    }
}

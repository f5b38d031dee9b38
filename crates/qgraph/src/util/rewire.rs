/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{
    err::GraphError,
    nodes::{Argument, Node},
    Graph, GraphOp, NodeRef, SmallColl,
};

impl<O: GraphOp + 'static> Graph<O> {
    ///Reroutes every use of `old` to `new`. Afterwards `old` has no users, and all former users of `old` are users of
    /// `new`. Returns the rewired users.
    ///
    /// The user set of `old` is copied before rewriting, so every user is visited exactly once.
    ///
    /// # Errors
    /// Returns [GraphError::InvalidNode] if either node does not exist.
    pub fn replace_all_uses_with(
        &mut self,
        old: NodeRef,
        new: NodeRef,
    ) -> Result<SmallColl<NodeRef>, GraphError> {
        if !self.nodes.contains_key(old) {
            return Err(GraphError::InvalidNode(old));
        }
        if !self.nodes.contains_key(new) {
            return Err(GraphError::InvalidNode(new));
        }
        if old == new {
            return Ok(SmallColl::new());
        }

        let users = self.nodes[old].users.clone();
        for user in &users {
            let user_node = self
                .nodes
                .get_mut(*user)
                .ok_or(GraphError::DanglingUser {
                    producer: old,
                    user: *user,
                })?;
            for arg in user_node.args.iter_mut() {
                if *arg == Argument::Node(old) {
                    *arg = Argument::Node(new);
                }
            }
            self.nodes[old].remove_user(*user);
            self.nodes[new].add_user(*user);
        }

        #[cfg(feature = "log")]
        log::trace!("rewired {} user(s) of {:?} to {:?}", users.len(), old, new);

        Ok(users)
    }

    ///Removes `node` from the graph, and unregisters it from all its producers. Returns the removed node.
    ///
    /// # Errors
    /// - [GraphError::InvalidNode] if `node` does not exist,
    /// - [GraphError::NodeInUse] if `node` still has users. Use [Graph::replace_all_uses_with] first.
    pub fn remove_node(&mut self, node: NodeRef) -> Result<Node<O>, GraphError> {
        let users = self
            .nodes
            .get(node)
            .ok_or(GraphError::InvalidNode(node))?
            .users
            .len();
        if users > 0 {
            return Err(GraphError::NodeInUse { node, users });
        }

        self.order.retain(|n| *n != node);
        self.detach_node(node).ok_or(GraphError::InvalidNode(node))
    }

    ///Removes `node` from the storage and unregisters it from its producers. Does neither check the users of `node`,
    /// nor touch the program order.
    pub(crate) fn detach_node(&mut self, node: NodeRef) -> Option<Node<O>> {
        for producer in self.producers(node) {
            if let Some(p) = self.nodes.get_mut(producer) {
                p.remove_user(node);
            }
        }
        self.nodes.remove(node)
    }
}

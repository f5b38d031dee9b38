//! Implements the referential-integrity check ("lint") of the graph.

use ahash::AHashMap;

use crate::{err::GraphError, Graph, GraphOp, NodeRef};

impl<O: GraphOp + 'static> Graph<O> {
    ///Checks the structural invariants of the graph and returns the first violation that is found.
    ///
    /// The graph is well formed, if
    ///
    /// - every stored node is part of the program order exactly once,
    /// - every node argument references a live node that is defined _before_ its user (which also rules out cycles),
    /// - user sets and argument lists agree in both directions,
    /// - there is at most one output node, and no one uses it.
    pub fn lint(&self) -> Result<(), GraphError> {
        let res = self.lint_inner();
        #[cfg(feature = "log")]
        if let Err(e) = &res {
            log::error!("graph lint failed: {e}");
        }
        res
    }

    fn lint_inner(&self) -> Result<(), GraphError> {
        let mut position: AHashMap<NodeRef, usize> = AHashMap::with_capacity(self.order.len());
        for (idx, nref) in self.order.iter().enumerate() {
            if !self.nodes.contains_key(*nref) {
                return Err(GraphError::InvalidNode(*nref));
            }
            if position.insert(*nref, idx).is_some() {
                return Err(GraphError::DuplicateDefinition(*nref));
            }
        }
        for nref in self.nodes.keys() {
            if !position.contains_key(&nref) {
                return Err(GraphError::OrphanNode(nref));
            }
        }

        let mut output: Option<NodeRef> = None;
        for (idx, nref) in self.order.iter().enumerate() {
            let node = &self.nodes[*nref];

            for producer in node.arg_nodes() {
                let Some(producer_pos) = position.get(&producer) else {
                    return Err(GraphError::InvalidNode(producer));
                };
                if *producer_pos >= idx {
                    return Err(GraphError::UseBeforeDefinition {
                        producer,
                        user: *nref,
                    });
                }
                if !self.nodes[producer].users.contains(nref) {
                    return Err(GraphError::MissingUser {
                        producer,
                        user: *nref,
                    });
                }
            }

            for user in node.users.iter() {
                let uses = self
                    .nodes
                    .get(*user)
                    .map(|u| u.arg_nodes().any(|p| p == *nref))
                    .unwrap_or(false);
                if !uses {
                    return Err(GraphError::DanglingUser {
                        producer: *nref,
                        user: *user,
                    });
                }
            }

            if node.kind.is_output() {
                if let Some(first) = output {
                    return Err(GraphError::MultipleOutputs(first, *nref));
                }
                if !node.users.is_empty() {
                    return Err(GraphError::OutputHasUsers(*nref));
                }
                output = Some(*nref);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{err::GraphError, nodes::Argument, Graph, GraphOp};

    #[derive(Debug, Clone, PartialEq)]
    struct Relu;

    impl GraphOp for Relu {
        fn name(&self) -> String {
            "relu".to_owned()
        }
    }

    fn simple_graph() -> Graph<Relu> {
        let mut graph = Graph::new();
        let x = graph.placeholder("x");
        let relu = graph.call(Relu, [Argument::Node(x)]).unwrap();
        graph.output([relu]).unwrap();
        graph
    }

    #[test]
    fn well_formed_graph_passes() {
        simple_graph().lint().unwrap();
    }

    #[test]
    fn detects_dangling_user() {
        let mut graph = simple_graph();
        let x = graph.find_by_name("x").unwrap();
        let out = graph.output_node().unwrap();
        graph.nodes[x].users.push(out);
        assert_eq!(
            graph.lint(),
            Err(GraphError::DanglingUser {
                producer: x,
                user: out
            })
        );
    }

    #[test]
    fn detects_missing_user() {
        let mut graph = simple_graph();
        let x = graph.find_by_name("x").unwrap();
        let relu = graph.find_by_name("relu").unwrap();
        graph.nodes[x].users.clear();
        assert_eq!(
            graph.lint(),
            Err(GraphError::MissingUser {
                producer: x,
                user: relu
            })
        );
    }

    #[test]
    fn detects_use_before_definition() {
        let mut graph = simple_graph();
        let x = graph.find_by_name("x").unwrap();
        let relu = graph.find_by_name("relu").unwrap();
        graph.order.swap(0, 1);
        assert_eq!(
            graph.lint(),
            Err(GraphError::UseBeforeDefinition {
                producer: x,
                user: relu
            })
        );
    }

    #[test]
    fn detects_duplicate_definition_and_orphans() {
        let mut graph = simple_graph();
        let x = graph.find_by_name("x").unwrap();
        graph.order.push(x);
        assert_eq!(graph.lint(), Err(GraphError::DuplicateDefinition(x)));

        let mut graph = simple_graph();
        let relu = graph.find_by_name("relu").unwrap();
        graph.order.retain(|n| *n != relu);
        assert_eq!(graph.lint(), Err(GraphError::OrphanNode(relu)));
    }

    #[test]
    fn detects_multiple_outputs() {
        let mut graph = simple_graph();
        let first = graph.output_node().unwrap();
        let x = graph.find_by_name("x").unwrap();
        let second = graph.output([x]).unwrap();
        assert_eq!(graph.lint(), Err(GraphError::MultipleOutputs(first, second)));
    }
}

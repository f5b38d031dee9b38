//! Graphviz export of a [Graph](crate::Graph). Only available with the `dot` feature.

use graphviz_rust::{
    attributes::{color_name, shape, NodeAttributes},
    dot_structures::{Edge, EdgeTy, Graph as DotGraph, Id, Node, NodeId, Stmt, Vertex},
    printer::{DotPrinter, PrinterContext},
};

pub use graphviz_rust;

use slotmap::Key;

use crate::{nodes::NodeKind, Graph, GraphOp, NodeRef};

impl<O: GraphOp + 'static> Graph<O> {
    fn dot_node_id(&self, node: NodeRef) -> NodeId {
        NodeId(Id::Plain(format!("n{}", node.data().as_ffi())), None)
    }

    ///Builds the graphviz representation. Each node becomes a graphviz node, each (unique) producer→user relation an
    /// edge.
    pub fn to_dot(&self) -> DotGraph {
        let mut stmts = Vec::with_capacity(self.len() * 2);
        for (nref, node) in self.iter() {
            let (label, node_color, node_shape) = match &node.kind {
                NodeKind::Placeholder => (node.name.clone(), color_name::blue, shape::ellipse),
                NodeKind::GetAttr { target } => (target.clone(), color_name::green, shape::ellipse),
                NodeKind::Call(op) => (
                    format!("{} = {}({})", node.name, op.name(), self.args_string(nref)),
                    color_name::black,
                    shape::rect,
                ),
                NodeKind::Output => ("output".to_owned(), color_name::red, shape::doublecircle),
            };
            stmts.push(Stmt::Node(Node {
                id: self.dot_node_id(nref),
                attributes: vec![
                    NodeAttributes::label(format!("\"{}\"", label.replace('"', "\\\""))),
                    NodeAttributes::color(node_color),
                    NodeAttributes::shape(node_shape),
                ],
            }));
        }

        for (nref, _node) in self.iter() {
            for producer in self.producers(nref) {
                stmts.push(Stmt::Edge(Edge {
                    ty: EdgeTy::Pair(
                        Vertex::N(self.dot_node_id(producer)),
                        Vertex::N(self.dot_node_id(nref)),
                    ),
                    attributes: vec![],
                }));
            }
        }

        DotGraph::DiGraph {
            id: Id::Plain("QGraph".to_owned()),
            strict: false,
            stmts,
        }
    }

    ///Renders [Graph::to_dot] into the dot language.
    pub fn dot_string(&self) -> String {
        self.to_dot().print(&mut PrinterContext::default())
    }
}

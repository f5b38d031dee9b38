use qgraph::{nodes::Argument, Graph, GraphOp};

///Minimal operator set used by the graph tests.
#[derive(Clone, Debug, PartialEq)]
pub enum TOp {
    Add,
    Neg,
    Store,
}

impl GraphOp for TOp {
    fn name(&self) -> String {
        match self {
            TOp::Add => "add".to_owned(),
            TOp::Neg => "neg".to_owned(),
            TOp::Store => "store".to_owned(),
        }
    }
    fn is_impure(&self) -> bool {
        matches!(self, TOp::Store)
    }
}

#[allow(dead_code)]
pub fn n(node: qgraph::NodeRef) -> Argument {
    Argument::Node(node)
}

#[allow(dead_code)]
pub fn new_graph() -> Graph<TOp> {
    Graph::new()
}

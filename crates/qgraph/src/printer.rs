//! Textual representation of a graph. One node per line, in program order:
//!
//! ```text
//! graph():
//!     %x : placeholder
//!     %dequantize_per_tensor : dequantize_per_tensor(%x, 0.5, 0, -128, 127, int8)
//!     return (%dequantize_per_tensor)
//! ```

use std::fmt::{Display, Write};

use crate::{
    nodes::{Argument, NodeKind},
    Graph, GraphOp, NodeRef,
};

impl<O: GraphOp + 'static> Graph<O> {
    fn arg_string(&self, arg: &Argument) -> String {
        match arg {
            Argument::Node(n) => match self.try_node(*n) {
                Some(node) => format!("%{}", node.name),
                None => format!("%<invalid {n:?}>"),
            },
            Argument::Literal(lit) => lit.to_string(),
        }
    }

    ///Formats the arguments of `node` as a comma separated list.
    pub fn args_string(&self, node: NodeRef) -> String {
        let mut s = String::new();
        for (idx, arg) in self.node(node).args().iter().enumerate() {
            if idx > 0 {
                s.push_str(", ");
            }
            s.push_str(&self.arg_string(arg));
        }
        s
    }
}

impl<O: GraphOp + 'static> Display for Graph<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "graph():")?;
        for (nref, node) in self.iter() {
            let mut line = String::new();
            match &node.kind {
                NodeKind::Placeholder => write!(line, "%{} : placeholder", node.name)?,
                NodeKind::GetAttr { target } => {
                    write!(line, "%{} : get_attr[target={}]", node.name, target)?
                }
                NodeKind::Call(op) => write!(
                    line,
                    "%{} : {}({})",
                    node.name,
                    op.name(),
                    self.args_string(nref)
                )?,
                NodeKind::Output => write!(line, "return ({})", self.args_string(nref))?,
            }
            writeln!(f, "    {line}")?;
        }
        Ok(())
    }
}

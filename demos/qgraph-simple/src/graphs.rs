//! The example graphs of the demo.

use qgraph::{nodes::Argument, NodeRef};
use qgraph_opt::{ops::PerTensorParams, QuantGraph, QuantOp};

fn dq(graph: &mut QuantGraph, input: NodeRef, p: PerTensorParams) -> NodeRef {
    graph
        .call(QuantOp::DequantizePerTensor, p.args(Argument::Node(input)))
        .unwrap()
}

fn q(graph: &mut QuantGraph, input: NodeRef, p: PerTensorParams) -> NodeRef {
    graph
        .call(QuantOp::QuantizePerTensor, p.args(Argument::Node(input)))
        .unwrap()
}

fn conv(graph: &mut QuantGraph, input: NodeRef) -> NodeRef {
    let weight = graph.get_attr("conv.weight");
    graph
        .call(
            QuantOp::compute("quantized.conv2d"),
            [Argument::Node(input), Argument::Node(weight)],
        )
        .unwrap()
}

///`x -> dq(0.5, 0) -> q(0.5, 0) -> conv`. Fuses.
pub fn matching() -> QuantGraph {
    let p = PerTensorParams::int8(0.5, 0);
    let mut graph = QuantGraph::new();
    let x = graph.placeholder("x");
    let d = dq(&mut graph, x, p);
    let qn = q(&mut graph, d, p);
    let y = conv(&mut graph, qn);
    graph.output([y]).unwrap();
    graph
}

///Same as [matching], but the quantize uses a scale of `0.25`. Nothing fuses.
pub fn mismatching() -> QuantGraph {
    let mut graph = QuantGraph::new();
    let x = graph.placeholder("x");
    let d = dq(&mut graph, x, PerTensorParams::int8(0.5, 0));
    let qn = q(&mut graph, d, PerTensorParams::int8(0.25, 0));
    let y = conv(&mut graph, qn);
    graph.output([y]).unwrap();
    graph
}

///One dequantize with a matching and a mismatching quantize user.
pub fn partial() -> QuantGraph {
    let p = PerTensorParams::int8(0.5, 0);
    let mut graph = QuantGraph::new();
    let x = graph.placeholder("x");
    let d = dq(&mut graph, x, p);
    let q_same = q(&mut graph, d, p);
    let q_other = q(&mut graph, d, PerTensorParams::int8(0.5, 4));
    let a = conv(&mut graph, q_same);
    let b = conv(&mut graph, q_other);
    graph.output([a, b]).unwrap();
    graph
}

///A dequantize node nobody uses.
pub fn unused() -> QuantGraph {
    let mut graph = QuantGraph::new();
    let x = graph.placeholder("x");
    let y = conv(&mut graph, x);
    let _d = dq(&mut graph, x, PerTensorParams::int8(0.5, 0));
    graph.output([y]).unwrap();
    graph
}

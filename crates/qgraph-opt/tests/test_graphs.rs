use qgraph::nodes::Argument;
use qgraph::NodeRef;
use qgraph_opt::{ops::PerTensorParams, QuantGraph, QuantOp};

#[allow(dead_code)]
pub fn dq(graph: &mut QuantGraph, input: NodeRef, params: PerTensorParams) -> NodeRef {
    graph
        .call(QuantOp::DequantizePerTensor, params.args(Argument::Node(input)))
        .unwrap()
}

#[allow(dead_code)]
pub fn q(graph: &mut QuantGraph, input: NodeRef, params: PerTensorParams) -> NodeRef {
    graph
        .call(QuantOp::QuantizePerTensor, params.args(Argument::Node(input)))
        .unwrap()
}

#[allow(dead_code)]
pub fn relu(graph: &mut QuantGraph, input: NodeRef) -> NodeRef {
    graph
        .call(QuantOp::compute("aten.relu"), [Argument::Node(input)])
        .unwrap()
}

///`x -> dequantize(x, dq_params) -> quantize(_, q_params) -> relu -> output`
///
/// Returns the graph and `[x, dq, q, relu, output]`.
#[allow(dead_code)]
pub fn dq_q_chain(
    dq_params: PerTensorParams,
    q_params: PerTensorParams,
) -> (QuantGraph, [NodeRef; 5]) {
    let mut graph = QuantGraph::new();
    let x = graph.placeholder("x");
    let d = dq(&mut graph, x, dq_params);
    let qn = q(&mut graph, d, q_params);
    let y = relu(&mut graph, qn);
    let out = graph.output([y]).unwrap();
    (graph, [x, d, qn, y, out])
}

#[allow(dead_code)]
pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

use std::{cell::RefCell, rc::Rc};

use qgraph::{err::GraphError, nodes::Argument};
use qgraph_opt::{
    ops::PerTensorParams, passes::FuseDqQPass, Config, OptError, Pass, PassManager, PassResult,
    QuantGraph, QuantOp,
};
use test_graphs::{dq_q_chain, init_logger};

mod test_graphs;

///Records its name into a shared log whenever it runs.
struct Recorder {
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
    modifies: bool,
}

impl Pass<QuantOp> for Recorder {
    fn name(&self) -> &str {
        self.name
    }
    fn call(&mut self, graph: QuantGraph) -> Result<PassResult<QuantOp>, OptError> {
        self.log.borrow_mut().push(self.name);
        Ok(PassResult {
            graph,
            modified: self.modifies,
        })
    }
}

///Appends a second output node, which the lint rejects.
struct AddOutput;

impl Pass<QuantOp> for AddOutput {
    fn name(&self) -> &str {
        "add_output"
    }
    fn call(&mut self, mut graph: QuantGraph) -> Result<PassResult<QuantOp>, OptError> {
        let x = graph.find_by_name("x").unwrap();
        graph.output([x])?;
        Ok(PassResult {
            graph,
            modified: true,
        })
    }
}

struct Fails;

impl Pass<QuantOp> for Fails {
    fn name(&self) -> &str {
        "fails"
    }
    fn call(&mut self, _graph: QuantGraph) -> Result<PassResult<QuantOp>, OptError> {
        Err(OptError::Internal("nope".to_owned()))
    }
}

fn recorder(
    name: &'static str,
    log: &Rc<RefCell<Vec<&'static str>>>,
    modifies: bool,
) -> Recorder {
    Recorder {
        name,
        log: log.clone(),
        modifies,
    }
}

#[test]
fn runs_passes_in_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut pm = PassManager::<QuantOp>::new(Config {
        steps: 2,
        ..Default::default()
    })
    .with_pass(recorder("a", &log, false))
    .with_pass(recorder("b", &log, false));
    assert_eq!(pm.pass_names(), vec!["a", "b"]);

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, _) = dq_q_chain(p, p);
    let res = pm.run(graph).unwrap();
    assert!(!res.modified);
    assert_eq!(log.borrow().as_slice(), &["a", "b", "a", "b"]);
}

#[test]
fn modified_if_any_pass_modified() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut pm = PassManager::<QuantOp>::default()
        .with_pass(recorder("a", &log, false))
        .with_pass(recorder("b", &log, true))
        .with_pass(recorder("c", &log, false));

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, _) = dq_q_chain(p, p);
    assert!(pm.run(graph).unwrap().modified);
}

#[test]
fn fusion_through_manager() {
    init_logger();
    let mut pm = PassManager::<QuantOp>::default().with_pass(FuseDqQPass::new());

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, [x, d, qn, y, out]) = dq_q_chain(p, p);
    let res = pm.run(graph).unwrap();

    assert!(res.modified);
    assert_eq!(res.graph.nodes(), &[x, y, out]);
    assert_eq!(res.graph[y].args(), &[Argument::Node(x)]);
    assert!(!res.graph.contains(d) && !res.graph.contains(qn));
}

#[test]
fn lint_after_pass_fails_pipeline() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut pm = PassManager::<QuantOp>::default()
        .with_pass(AddOutput)
        .with_pass(recorder("never", &log, false));

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, _) = dq_q_chain(p, p);
    let err = pm.run(graph).unwrap_err();

    match err {
        OptError::PassFailed { pass, error } => {
            assert_eq!(pass, "add_output");
            assert!(matches!(
                *error,
                OptError::Graph(GraphError::MultipleOutputs(_, _))
            ));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(log.borrow().is_empty());
}

#[test]
fn broken_graph_passes_without_lint() {
    let mut pm = PassManager::<QuantOp>::new(Config {
        lint_after_each: false,
        ..Default::default()
    })
    .with_pass(AddOutput);

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, _) = dq_q_chain(p, p);
    let res = pm.run(graph).unwrap();
    assert!(res.graph.lint().is_err());
}

#[test]
fn pass_error_is_wrapped() {
    let mut pm = PassManager::<QuantOp>::new(Config {
        dump_on_error: true,
        ..Default::default()
    })
    .with_pass(Fails);

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, _) = dq_q_chain(p, p);
    let err = pm.run(graph).unwrap_err();
    assert!(matches!(
        err,
        OptError::PassFailed { ref pass, ref error } if pass == "fails" && matches!(**error, OptError::Internal(_))
    ));
}

#[test]
fn zero_steps_runs_nothing() {
    let mut pm = PassManager::<QuantOp>::new(Config {
        steps: 0,
        ..Default::default()
    })
    .with_pass(Fails);

    let p = PerTensorParams::int8(0.5, 0);
    let (graph, nodes) = dq_q_chain(p, p);
    let res = pm.run(graph).unwrap();
    assert!(!res.modified);
    assert_eq!(res.graph.nodes(), &nodes);
}

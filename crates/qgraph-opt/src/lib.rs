//! # QGraph-Opt
//!
//! Optimizer for quantized programs in the [qgraph] IR.
//!
//! The crate defines the quantization dialect ([QuantOp]), a small pass abstraction ([Pass], [PassResult]) and a
//! sequential [PassManager]. Passes live in [passes].
//!
//! ## Debugging
//!
//! Passes print the graph state (at `debug` level) if `QGRAPH_DUMP_ALL` or a pass specific variable like
//! `DUMP_BEFORE_DQ_Q` is set.

pub use qgraph;
use qgraph::{Graph, GraphOp};

pub mod config;
mod error;
pub mod ops;
mod pass_manager;
pub mod passes;

pub use config::Config;
pub use error::OptError;
pub use ops::QuantOp;
pub use pass_manager::{Pass, PassManager, PassResult};

///Graph of the quantization dialect.
pub type QuantGraph = Graph<QuantOp>;

///Prints the `graph` with a `label`, if `QGRAPH_DUMP_ALL` or `env_var` is set.
pub(crate) fn dump_state<O: GraphOp + 'static>(graph: &Graph<O>, env_var: &str, label: &str) {
    if std::env::var("QGRAPH_DUMP_ALL").is_ok() || std::env::var(env_var).is_ok() {
        #[cfg(feature = "log")]
        log::debug!("{label}:\n{graph}");
        #[cfg(not(feature = "log"))]
        eprintln!("{label}:\n{graph}");
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use qgraph::{Graph, GraphOp};

use crate::{Config, OptError};

///Result of running a [Pass]. Hands the (possibly rewritten) graph back to the caller.
#[derive(Debug)]
pub struct PassResult<O: GraphOp + 'static> {
    pub graph: Graph<O>,
    ///True if the pass might have changed the graph.
    pub modified: bool,
}

///A single graph transformation.
pub trait Pass<O: GraphOp + 'static> {
    fn name(&self) -> &str;
    ///Runs the pass on `graph`. The pass takes exclusive ownership for its runtime and returns the graph in the
    /// [PassResult].
    fn call(&mut self, graph: Graph<O>) -> Result<PassResult<O>, OptError>;
}

///Runs a list of passes in order.
pub struct PassManager<O: GraphOp + 'static> {
    passes: Vec<Box<dyn Pass<O>>>,
    pub config: Config,
}

impl<O: GraphOp + 'static> Default for PassManager<O> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<O: GraphOp + 'static> PassManager<O> {
    pub fn new(config: Config) -> Self {
        PassManager {
            passes: Vec::new(),
            config,
        }
    }

    pub fn add_pass(&mut self, pass: impl Pass<O> + 'static) {
        self.passes.push(Box::new(pass));
    }

    pub fn with_pass(mut self, pass: impl Pass<O> + 'static) -> Self {
        self.add_pass(pass);
        self
    }

    ///Names of all registered passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    ///Runs all passes `config.steps` times in order. The result is `modified` if any pass reported a modification.
    ///
    /// Fails on the first pass that returns an error, or (if `config.lint_after_each` is set) on the first pass
    /// that leaves a broken graph behind.
    pub fn run(&mut self, mut graph: Graph<O>) -> Result<PassResult<O>, OptError> {
        let mut modified = false;
        for step in 0..self.config.steps {
            for pass in self.passes.iter_mut() {
                #[cfg(feature = "log")]
                log::info!("step {step}: running {}", pass.name());
                #[cfg(not(feature = "log"))]
                let _ = step;

                let snapshot = if self.config.dump_on_error {
                    Some(graph.clone())
                } else {
                    None
                };

                let result = match pass.call(graph) {
                    Ok(res) => res,
                    Err(e) => {
                        if let Some(snapshot) = snapshot {
                            eprintln!("graph before failing pass {}:\n{snapshot}", pass.name());
                        }
                        return Err(OptError::PassFailed {
                            pass: pass.name().to_owned(),
                            error: Box::new(e),
                        });
                    }
                };

                if self.config.lint_after_each {
                    if let Err(e) = result.graph.lint() {
                        if let Some(snapshot) = snapshot {
                            eprintln!("graph before failing pass {}:\n{snapshot}", pass.name());
                        }
                        return Err(OptError::PassFailed {
                            pass: pass.name().to_owned(),
                            error: Box::new(e.into()),
                        });
                    }
                }

                modified |= result.modified;
                graph = result.graph;
            }
        }

        Ok(PassResult { graph, modified })
    }
}

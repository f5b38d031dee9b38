/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Fuses `quantize_per_tensor(dequantize_per_tensor(x, p), p)` into `x`.
//!
//! With identical quantization parameters the pair is a numerical no-op (up to rounding of the intermediate float
//! value, which is ignored). The pass only rewires uses. The now unused pair is removed by the closing
//! dead-node-elimination.

use qgraph::{
    err::GraphError,
    nodes::{Argument, Node},
    NodeRef, SmallColl,
};

use crate::{dump_state, OptError, Pass, PassResult, QuantGraph, QuantOp};

///Counters of a single [fuse_dq_q] invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuseStats {
    ///Quantize nodes whose uses were rerouted to the dequantize's input.
    pub fused: usize,
    ///Quantize users that were skipped, since their parameters differ from the dequantize's.
    pub param_mismatch: usize,
    ///Dequantize nodes that were skipped, since at least one user is not a `quantize_per_tensor`.
    pub mixed_users: usize,
    ///Nodes removed by dead-node-elimination.
    pub removed: usize,
}

///Quantization parameters of a (de)quantize call: every argument after the transformed value.
fn qparams(node: &Node<QuantOp>) -> &[Argument] {
    node.args().get(1..).unwrap_or(&[])
}

///Runs the fusion on `graph` in place.
///
/// Every `dequantize_per_tensor` node `D` whose users are all `quantize_per_tensor` nodes is inspected. Each user
/// `Q` with exactly the same parameters as `D` gets all its uses rerouted to `D`'s input. A single user of
/// another kind disqualifies `D` entirely, users with other parameters are left untouched.
///
/// This is a single scan in program order. Pairs that only become fusable through a rewrite of a later node are left
/// for the next invocation.
///
/// # Errors
/// - [GraphError::ExpectedNodeArgument] if a fusable `D` does not take a node as its first argument,
/// - any error of the closing [lint](qgraph::Graph::lint).
pub fn fuse_dq_q(graph: &mut QuantGraph) -> Result<FuseStats, OptError> {
    let mut stats = FuseStats::default();

    //rewrites don't add or remove nodes, but iterating a copy keeps the graph free for mutation.
    let order = graph.nodes().to_vec();
    for dq in order {
        if !graph[dq].kind.is_call_of(&QuantOp::DequantizePerTensor) {
            continue;
        }

        //Copy the user set. Rewiring a user changes the user set of `dq`'s input, and might
        //change `dq`'s set as well.
        let users: SmallColl<NodeRef> = graph.users(dq).iter().cloned().collect();
        if !users
            .iter()
            .all(|u| graph[*u].kind.is_call_of(&QuantOp::QuantizePerTensor))
        {
            #[cfg(feature = "log")]
            log::trace!("{} has non-quantize users, skipping", graph[dq].name);
            stats.mixed_users += 1;
            continue;
        }

        for q in users {
            if qparams(&graph[dq]) != qparams(&graph[q]) {
                #[cfg(feature = "log")]
                log::trace!(
                    "qparams of {} and {} differ, not fusing",
                    graph[dq].name,
                    graph[q].name
                );
                stats.param_mismatch += 1;
                continue;
            }

            let input = graph[dq]
                .arg(0)
                .and_then(|a| a.node())
                .ok_or(GraphError::ExpectedNodeArgument {
                    node: dq,
                    index: 0,
                })?;

            graph.replace_all_uses_with(q, input)?;
            #[cfg(feature = "log")]
            log::trace!(
                "fused {} -> {}, rerouted to {}",
                graph[dq].name,
                graph[q].name,
                graph[input].name
            );
            stats.fused += 1;
        }
    }

    graph.lint()?;
    stats.removed = graph.eliminate_dead_code().len();

    Ok(stats)
}

///Pass wrapper around [fuse_dq_q].
///
/// Always reports the graph as modified, regardless of whether a pair was fused. Use [FuseDqQPass::stats] to find
/// out what actually happened.
#[derive(Debug, Default)]
pub struct FuseDqQPass {
    stats: FuseStats,
}

impl FuseDqQPass {
    pub fn new() -> Self {
        Self::default()
    }

    ///Statistics of the last invocation.
    pub fn stats(&self) -> FuseStats {
        self.stats
    }
}

impl Pass<QuantOp> for FuseDqQPass {
    fn name(&self) -> &str {
        "fuse_dq_q"
    }

    fn call(&mut self, mut graph: QuantGraph) -> Result<PassResult<QuantOp>, OptError> {
        dump_state(&graph, "DUMP_BEFORE_DQ_Q", "before dq-q fusion");

        self.stats = fuse_dq_q(&mut graph)?;

        #[cfg(feature = "log")]
        log::info!(
            "fused {} dq-q pair(s), {} param mismatch(es), {} dq node(s) with mixed users, removed {} node(s)",
            self.stats.fused,
            self.stats.param_mismatch,
            self.stats.mixed_users,
            self.stats.removed
        );

        dump_state(&graph, "DUMP_AFTER_DQ_Q", "after dq-q fusion");

        Ok(PassResult {
            graph,
            modified: true,
        })
    }
}

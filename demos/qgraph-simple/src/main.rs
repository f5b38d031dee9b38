/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! # qgraph-simple
//!
//! Builds a few quantized example graphs and runs the dequantize→quantize fusion on them.
//!
//! `QGRAPH_DUMP_ALL=1 RUST_LOG=debug` prints the graph state around each pass.

use clap::{Parser, ValueEnum};
use qgraph_opt::{passes::FuseDqQPass, Config, PassManager, QuantGraph, QuantOp};

mod graphs;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum Example {
    ///dq/q pair with identical parameters
    Matching,
    ///dq/q pair with different scales
    Mismatching,
    ///dq with one matching and one mismatching q user
    Partial,
    ///dq without users
    Unused,
    ///All of the above
    All,
}

#[derive(Parser, Debug)]
#[command(name = "qgraph-simple")]
#[command(version, about, long_about = "Runs the dq-q fusion on example graphs")]
struct Args {
    ///Which example graph is optimized.
    #[arg(long, short, value_enum, default_value_t = Example::All)]
    example: Example,

    ///Prints the graphs in the dot language instead of the textual form.
    #[arg(long, default_value_t = false)]
    dot: bool,

    ///How often the pass list is executed.
    #[arg(long, default_value_t = 1)]
    steps: usize,

    ///Disables linting after each pass.
    #[arg(long, default_value_t = false)]
    no_lint: bool,
}

fn print_graph(graph: &QuantGraph, dot: bool) {
    if dot {
        println!("{}", graph.dot_string());
    } else {
        println!("{graph}");
    }
}

fn main() {
    pretty_env_logger::init();
    let args = Args::parse();

    let examples: Vec<(&str, QuantGraph)> = match args.example {
        Example::Matching => vec![("matching", graphs::matching())],
        Example::Mismatching => vec![("mismatching", graphs::mismatching())],
        Example::Partial => vec![("partial", graphs::partial())],
        Example::Unused => vec![("unused", graphs::unused())],
        Example::All => vec![
            ("matching", graphs::matching()),
            ("mismatching", graphs::mismatching()),
            ("partial", graphs::partial()),
            ("unused", graphs::unused()),
        ],
    };

    for (name, graph) in examples {
        println!("=== {name} ===");
        print_graph(&graph, args.dot);

        let mut pm = PassManager::<QuantOp>::new(Config {
            lint_after_each: !args.no_lint,
            steps: args.steps,
            dump_on_error: true,
        })
        .with_pass(FuseDqQPass::new());

        match pm.run(graph) {
            Ok(res) => {
                log::info!("{name}: modified={}", res.modified);
                println!("--- after ---");
                print_graph(&res.graph, args.dot);
            }
            Err(e) => {
                log::error!("{name}: {e}");
                std::process::exit(1);
            }
        }
    }
}

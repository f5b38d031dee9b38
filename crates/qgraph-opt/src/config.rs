/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Config options for the [PassManager](crate::PassManager)

#[derive(Debug, Clone)]
pub struct Config {
    ///Runs [lint](qgraph::Graph::lint) after every pass, and fails the pipeline on the first broken graph.
    pub lint_after_each: bool,
    ///How often the whole pass list is executed. Passes themselves never iterate to a fixpoint.
    pub steps: usize,
    ///If true, the graph state before a failing pass is printed.
    pub dump_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lint_after_each: true,
            steps: 1,
            dump_on_error: false,
        }
    }
}

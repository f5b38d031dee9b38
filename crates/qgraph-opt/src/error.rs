/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
use qgraph::err::GraphError;
use thiserror::Error;

///Optimizer errors. Passes do not recover locally, a malformed graph is reported to the caller as is.
#[derive(Debug, Error, Clone)]
pub enum OptError {
    #[error("Internal graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Pass {pass} failed: {error}")]
    PassFailed { pass: String, error: Box<OptError> },

    #[error("Internal optimizer error: {0}\nPlease file an issue!")]
    Internal(String),
}

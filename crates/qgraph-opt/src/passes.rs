//! Optimizer passes module.
//!
//! Right now there is a single peephole pass, [FuseDqQPass], that removes redundant dequantize→quantize pairs.

mod fuse_dq_q;

pub use fuse_dq_q::{fuse_dq_q, FuseDqQPass, FuseStats};

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
//! The quantization dialect's operator set.

use std::fmt::Display;

use qgraph::{
    nodes::{Argument, DType},
    GraphOp,
};

///All operators the optimizer knows. Passes match operators by equality on this enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuantOp {
    ///`dequantize_per_tensor(x, scale, zero_point, quant_min, quant_max, dtype)`
    DequantizePerTensor,
    ///`quantize_per_tensor(x, scale, zero_point, quant_min, quant_max, dtype)`
    QuantizePerTensor,
    ///`dequantize_per_channel(x, scales, zero_points, axis, quant_min, quant_max, dtype)`
    DequantizePerChannel,
    ///`quantize_per_channel(x, scales, zero_points, axis, quant_min, quant_max, dtype)`
    QuantizePerChannel,
    ///Any other compute operator, identified by its name. For instance `aten.add`.
    Compute(String),
}

impl QuantOp {
    pub fn compute(name: &str) -> Self {
        QuantOp::Compute(name.to_owned())
    }
}

impl Display for QuantOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantOp::DequantizePerTensor => write!(f, "dequantize_per_tensor"),
            QuantOp::QuantizePerTensor => write!(f, "quantize_per_tensor"),
            QuantOp::DequantizePerChannel => write!(f, "dequantize_per_channel"),
            QuantOp::QuantizePerChannel => write!(f, "quantize_per_channel"),
            QuantOp::Compute(name) => write!(f, "{name}"),
        }
    }
}

impl GraphOp for QuantOp {
    fn name(&self) -> String {
        self.to_string()
    }
}

///Per-tensor quantization parameters in argument order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerTensorParams {
    pub scale: f64,
    pub zero_point: i64,
    pub quant_min: i64,
    pub quant_max: i64,
    pub dtype: DType,
}

impl PerTensorParams {
    ///Symmetric-range `int8` parameters.
    pub fn int8(scale: f64, zero_point: i64) -> Self {
        PerTensorParams {
            scale,
            zero_point,
            quant_min: -128,
            quant_max: 127,
            dtype: DType::I8,
        }
    }

    ///Argument list of a per-tensor (de)quantize call on `input`.
    pub fn args(&self, input: Argument) -> [Argument; 6] {
        [
            input,
            self.scale.into(),
            self.zero_point.into(),
            self.quant_min.into(),
            self.quant_max.into(),
            self.dtype.into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use qgraph::{
        nodes::{Argument, DType, Literal},
        GraphOp, NodeRef,
    };

    use super::{PerTensorParams, QuantOp};

    #[test]
    fn operator_names() {
        assert_eq!(QuantOp::DequantizePerTensor.name(), "dequantize_per_tensor");
        assert_eq!(QuantOp::QuantizePerChannel.name(), "quantize_per_channel");
        assert_eq!(QuantOp::compute("aten.add").name(), "aten.add");
    }

    #[test]
    fn per_tensor_argument_order() {
        let args = PerTensorParams::int8(0.5, 2).args(Argument::Node(NodeRef::default()));
        assert_eq!(
            &args[1..],
            &[
                Argument::Literal(Literal::Float(0.5)),
                Argument::Literal(Literal::Int(2)),
                Argument::Literal(Literal::Int(-128)),
                Argument::Literal(Literal::Int(127)),
                Argument::Literal(Literal::DType(DType::I8)),
            ]
        );
    }
}

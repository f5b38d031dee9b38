//! # Nodes
//!
//! A [Node] is either a graph input ([NodeKind::Placeholder]), a constant access ([NodeKind::GetAttr]), a call of
//! some dialect operator ([NodeKind::Call]) or the graph's [NodeKind::Output].
//!
//! Arguments are kept in order. By convention the first argument of a call is the value being transformed, all
//! following arguments parameterize the operation.

use std::fmt::Display;

use crate::{GraphOp, NodeRef, SmallColl};

///Element type of a tensor. Appears as a literal argument to quantization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DType {
    I8,
    U8,
    I16,
    I32,
    I64,
    F16,
    F32,
    F64,
    Bool,
}

impl Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DType::I8 => "int8",
            DType::U8 => "uint8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F16 => "float16",
            DType::F32 => "float32",
            DType::F64 => "float64",
            DType::Bool => "bool",
        };
        write!(f, "{s}")
    }
}

///Immediate value that is passed as an argument.
///
/// Equality is exact. In particular `Float(NaN) != Float(NaN)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Literal {
    Float(f64),
    Int(i64),
    Bool(bool),
    DType(DType),
    None,
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Int(v) => write!(f, "{v}"),
            Literal::Bool(v) => write!(f, "{v}"),
            Literal::DType(d) => write!(f, "{d}"),
            Literal::None => write!(f, "None"),
        }
    }
}

///A single argument of a node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Argument {
    ///The value produced by another node.
    Node(NodeRef),
    Literal(Literal),
}

impl Argument {
    pub fn node(&self) -> Option<NodeRef> {
        if let Argument::Node(n) = self {
            Some(*n)
        } else {
            None
        }
    }
}

impl From<NodeRef> for Argument {
    fn from(value: NodeRef) -> Self {
        Argument::Node(value)
    }
}

impl From<Literal> for Argument {
    fn from(value: Literal) -> Self {
        Argument::Literal(value)
    }
}

impl From<f64> for Argument {
    fn from(value: f64) -> Self {
        Argument::Literal(Literal::Float(value))
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Literal(Literal::Int(value))
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Literal(Literal::Bool(value))
    }
}

impl From<DType> for Argument {
    fn from(value: DType) -> Self {
        Argument::Literal(Literal::DType(value))
    }
}

///Operation class of a node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind<O: GraphOp + 'static> {
    ///Input of the graph.
    Placeholder,
    ///Loads a constant or parameter called `target`.
    GetAttr { target: String },
    ///Call of a known operator.
    Call(O),
    ///Returns all its arguments from the graph.
    Output,
}

impl<O: GraphOp + 'static> NodeKind<O> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, NodeKind::Placeholder)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, NodeKind::Output)
    }

    ///Returns the called operator, if this is a [NodeKind::Call].
    pub fn op(&self) -> Option<&O> {
        if let NodeKind::Call(op) = self {
            Some(op)
        } else {
            None
        }
    }

    ///True if this is a call of exactly `op`.
    pub fn is_call_of(&self, op: &O) -> bool {
        self.op().map(|o| o == op).unwrap_or(false)
    }
}

///A single node in the [Graph](crate::Graph).
///
/// Arguments and users can only be changed through the graph, so both stay in sync.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<O: GraphOp + 'static> {
    ///Unique name within the graph.
    pub name: String,
    pub kind: NodeKind<O>,
    pub(crate) args: SmallColl<Argument>,
    pub(crate) users: SmallColl<NodeRef>,
}

impl<O: GraphOp + 'static> Node<O> {
    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Argument> {
        self.args.get(index)
    }

    ///All nodes that use this node's value, in the order they started using it.
    pub fn users(&self) -> &[NodeRef] {
        &self.users
    }

    ///Iterates all node arguments, including duplicates.
    pub fn arg_nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.args.iter().filter_map(|a| a.node())
    }

    pub(crate) fn add_user(&mut self, user: NodeRef) {
        if !self.users.contains(&user) {
            self.users.push(user);
        }
    }

    pub(crate) fn remove_user(&mut self, user: NodeRef) {
        self.users.retain(|u| *u != user);
    }
}

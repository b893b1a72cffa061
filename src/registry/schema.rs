//! Declarative node schemas and the values that flow between nodes.

use crate::config::Config;
use crate::error::Result;
use crate::image::ImageBatch;

use super::Inputs;

/// A value passed into or returned from a node.
#[derive(Debug, Clone)]
pub enum Value {
    Image(ImageBatch),
    Int(i64),
    String(String),
}

impl Value {
    /// Kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Image(_) => ValueKind::Image,
            Self::Int(_) => ValueKind::Int,
            Self::String(_) => ValueKind::String,
        }
    }

    /// Take the image batch out of an `Image` value.
    #[must_use]
    pub fn into_image(self) -> Option<ImageBatch> {
        match self {
            Self::Image(images) => Some(images),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Type tag shared by inputs, outputs and values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Image,
    Int,
    String,
}

impl ValueKind {
    /// Type name as the host displays it.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Int => "INT",
            Self::String => "STRING",
        }
    }
}

/// Accepted type and constraints of a node input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// An image batch; always required.
    Image,
    /// An integer with inclusive bounds.
    Int {
        default: i64,
        min: i64,
        max: i64,
        step: i64,
        /// Hint for the host to advance the value after every queued run.
        control_after_generate: bool,
    },
    String {
        default: &'static str,
    },
}

impl InputKind {
    #[must_use]
    pub const fn value_kind(&self) -> ValueKind {
        match self {
            Self::Image => ValueKind::Image,
            Self::Int { .. } => ValueKind::Int,
            Self::String { .. } => ValueKind::String,
        }
    }

    /// Value used when the host does not supply this input.
    #[must_use]
    pub fn default_value(&self) -> Option<Value> {
        match *self {
            Self::Image => None,
            Self::Int { default, .. } => Some(Value::Int(default)),
            Self::String { default } => Some(Value::String(default.to_string())),
        }
    }
}

/// A named node input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
}

/// A named node output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub name: &'static str,
    pub kind: ValueKind,
}

/// Callable behind a node. Receives validated inputs and returns values in
/// the order of the node's output schema.
pub type NodeFn = fn(&Config, &Inputs) -> Result<Vec<Value>>;

/// Everything the host needs to discover, display and invoke a node.
#[derive(Debug, Clone, Copy)]
pub struct NodeSpec {
    /// Unique name used for dispatch.
    pub name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub inputs: &'static [InputSpec],
    pub outputs: &'static [OutputSpec],
    /// Whether the node has side effects the host must always run.
    pub output_node: bool,
    pub function: NodeFn,
}

impl NodeSpec {
    /// Look up an input by name.
    #[must_use]
    pub fn input(&self, name: &str) -> Option<&'static InputSpec> {
        self.inputs.iter().find(|input| input.name == name)
    }
}

//! Per-function data-flow sketch
//!
//! The upstream parser records what comes in (inputs), what happens to it
//! (transformations) and what leaves the function (outputs). The sketch is
//! heuristic; every field may be partial.

use serde::{Deserialize, Serialize};

/// Data-flow sketch of one atom
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataFlow {
    #[serde(default)]
    pub inputs: Vec<Input>,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub transformations: Vec<Transformation>,
}

impl DataFlow {
    pub fn has_side_effect(&self) -> bool {
        self.outputs.iter().any(Output::is_side_effect)
    }
}

/// One parameter binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub name: String,
    #[serde(flatten)]
    pub shape: InputShape,
    #[serde(default)]
    pub position: usize,
    #[serde(default)]
    pub has_default: bool,
    /// How the parameter is used in the body
    #[serde(default)]
    pub usages: Vec<Usage>,
    /// Declared or inferred type, when the parser knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl Input {
    pub fn simple(name: impl Into<String>, position: usize) -> Self {
        Self {
            name: name.into(),
            shape: InputShape::Simple,
            position,
            has_default: false,
            usages: Vec::new(),
            data_type: None,
        }
    }

    pub fn with_shape(mut self, shape: InputShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_data_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    pub fn with_usage(mut self, kind: impl Into<String>) -> Self {
        self.usages.push(Usage {
            kind: kind.into(),
            property: None,
        });
        self
    }

    pub fn is_destructured(&self) -> bool {
        matches!(
            self.shape,
            InputShape::DestructuredObject { .. } | InputShape::DestructuredArray { .. }
        )
    }

    /// Usage kinds sorted, ignoring names
    pub fn usage_pattern(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.usages.iter().map(|u| u.kind.as_str()).collect();
        kinds.sort_unstable();
        kinds
    }
}

/// Binding form of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InputShape {
    Simple,
    DestructuredObject {
        #[serde(default)]
        properties: Vec<String>,
    },
    DestructuredArray {
        #[serde(default)]
        properties: Vec<String>,
    },
    Rest,
}

impl InputShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputShape::Simple => "simple",
            InputShape::DestructuredObject { .. } => "destructured-object",
            InputShape::DestructuredArray { .. } => "destructured-array",
            InputShape::Rest => "rest",
        }
    }
}

/// One observed use of a parameter (`property_access`, `passed_to`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

/// One exit or effect of a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Output {
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<serde_json::Value>,
    },
    Throw {
        #[serde(default, rename = "errorType", skip_serializing_if = "Option::is_none")]
        error_type: Option<String>,
    },
    SideEffect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
}

impl Output {
    pub fn returns() -> Self {
        Output::Return { value: None }
    }

    pub fn throws() -> Self {
        Output::Throw { error_type: None }
    }

    pub fn side_effect(target: impl Into<String>) -> Self {
        Output::SideEffect {
            target: Some(target.into()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Output::Return { .. } => "return",
            Output::Throw { .. } => "throw",
            Output::SideEffect { .. } => "side_effect",
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, Output::Return { .. })
    }

    pub fn is_throw(&self) -> bool {
        matches!(self, Output::Throw { .. })
    }

    pub fn is_side_effect(&self) -> bool {
        matches!(self, Output::SideEffect { .. })
    }
}

/// One intermediate data-shaping step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    /// Binding that receives the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
    /// Older parsers emit `output: {name}` instead of `to`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TransformOutput>,
}

impl Transformation {
    pub fn new(to: impl Into<String>, from: &[&str], operation: Operation) -> Self {
        Self {
            to: Some(to.into()),
            from: from.iter().map(|s| s.to_string()).collect(),
            operation: Some(operation),
            output: None,
        }
    }

    /// Name of the binding this step writes, from `to` or `output.name`
    pub fn target(&self) -> Option<&str> {
        self.to
            .as_deref()
            .or_else(|| self.output.as_ref().map(|o| o.name.as_str()))
    }

    /// Operation name, `transform` when the parser left it blank
    pub fn operation_name(&self) -> &str {
        self.operation
            .as_ref()
            .map(Operation::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("transform")
    }

    pub fn arity(&self) -> usize {
        self.from.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOutput {
    pub name: String,
}

/// Kind of a transformation step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operation {
    PropertyAccess,
    ArrayIndexAccess,
    FunctionCall,
    AwaitFunctionCall,
    Instantiation,
    BinaryOperation,
    UnaryOperation,
    TemplateLiteral,
    Conditional,
    ObjectLiteral,
    ArrayLiteral,
    Mutation,
    Update,
    Other(String),
}

/// Coarse effect class of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCategory {
    Read,
    Transform,
    Write,
    Neutral,
}

impl Operation {
    pub fn as_str(&self) -> &str {
        match self {
            Operation::PropertyAccess => "property_access",
            Operation::ArrayIndexAccess => "array_index_access",
            Operation::FunctionCall => "function_call",
            Operation::AwaitFunctionCall => "await_function_call",
            Operation::Instantiation => "instantiation",
            Operation::BinaryOperation => "binary_operation",
            Operation::UnaryOperation => "unary_operation",
            Operation::TemplateLiteral => "template_literal",
            Operation::Conditional => "conditional",
            Operation::ObjectLiteral => "object_literal",
            Operation::ArrayLiteral => "array_literal",
            Operation::Mutation => "mutation",
            Operation::Update => "update",
            Operation::Other(name) => name,
        }
    }

    pub fn category(&self) -> OpCategory {
        match self {
            Operation::PropertyAccess
            | Operation::ArrayIndexAccess
            | Operation::FunctionCall
            | Operation::AwaitFunctionCall
            | Operation::Instantiation => OpCategory::Read,
            Operation::BinaryOperation
            | Operation::UnaryOperation
            | Operation::TemplateLiteral
            | Operation::Conditional
            | Operation::ObjectLiteral
            | Operation::ArrayLiteral => OpCategory::Transform,
            Operation::Mutation | Operation::Update => OpCategory::Write,
            Operation::Other(_) => OpCategory::Neutral,
        }
    }
}

impl From<String> for Operation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "property_access" => Operation::PropertyAccess,
            "array_index_access" => Operation::ArrayIndexAccess,
            "function_call" => Operation::FunctionCall,
            "await_function_call" => Operation::AwaitFunctionCall,
            "instantiation" => Operation::Instantiation,
            "binary_operation" => Operation::BinaryOperation,
            "unary_operation" => Operation::UnaryOperation,
            "template_literal" => Operation::TemplateLiteral,
            "conditional" => Operation::Conditional,
            "object_literal" => Operation::ObjectLiteral,
            "array_literal" => Operation::ArrayLiteral,
            "mutation" => Operation::Mutation,
            "update" => Operation::Update,
            _ => Operation::Other(name),
        }
    }
}

impl From<&str> for Operation {
    fn from(name: &str) -> Self {
        Operation::from(name.to_string())
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

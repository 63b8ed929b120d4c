//! Argument-to-parameter transform classification

use atomflow_atom::{Argument, ArgumentExpr, Input};
use serde::{Deserialize, Serialize};

/// How an argument's value relates to the parameter it binds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transform {
    PropertyAccess {
        from: String,
        property: String,
        description: String,
    },
    DirectPass {
        variable: String,
        description: String,
    },
    CallResult {
        call: String,
        description: String,
    },
    Literal {
        value: String,
        description: String,
    },
    Spread {
        from: String,
        description: String,
    },
    Unknown {
        description: String,
    },
}

/// Tag of a [`Transform`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformKind {
    PropertyAccess,
    DirectPass,
    CallResult,
    Literal,
    Spread,
    Unknown,
}

impl Transform {
    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::PropertyAccess { .. } => TransformKind::PropertyAccess,
            Transform::DirectPass { .. } => TransformKind::DirectPass,
            Transform::CallResult { .. } => TransformKind::CallResult,
            Transform::Literal { .. } => TransformKind::Literal,
            Transform::Spread { .. } => TransformKind::Spread,
            Transform::Unknown { .. } => TransformKind::Unknown,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Transform::PropertyAccess { description, .. }
            | Transform::DirectPass { description, .. }
            | Transform::CallResult { description, .. }
            | Transform::Literal { description, .. }
            | Transform::Spread { description, .. }
            | Transform::Unknown { description } => description,
        }
    }

    pub fn is_direct_pass(&self) -> bool {
        self.kind() == TransformKind::DirectPass
    }
}

/// Classify the transform between `arg` and `param`
///
/// Checks run in a fixed order and the first match wins: a member
/// expression is a property access even when its root has the parameter's
/// name.
pub fn detect_transform(arg: &Argument, param: &Input) -> Transform {
    match &arg.expr {
        ArgumentExpr::Member { object, property } => Transform::PropertyAccess {
            from: object.clone(),
            property: property.clone(),
            description: format!(
                "property `{}` of `{}` passed as `{}`",
                property, object, param.name
            ),
        },
        _ if names_match(arg, param) => Transform::DirectPass {
            variable: param.name.clone(),
            description: format!("`{}` passed through unchanged", param.name),
        },
        ArgumentExpr::Call { callee } => Transform::CallResult {
            call: callee.clone(),
            description: format!("result of `{}()` passed as `{}`", callee, param.name),
        },
        ArgumentExpr::Literal { value } => Transform::Literal {
            value: value.clone(),
            description: format!("literal {} bound to `{}`", value, param.name),
        },
        ArgumentExpr::Spread { source } => Transform::Spread {
            from: source.clone(),
            description: format!("`{}` spread into `{}`", source, param.name),
        },
        ArgumentExpr::Identifier { .. } | ArgumentExpr::Other { .. } => Transform::Unknown {
            description: format!("`{}` bound to `{}`", arg.code, param.name),
        },
    }
}

/// `arg.name == param.name` or `arg.variable == param.name`
fn names_match(arg: &Argument, param: &Input) -> bool {
    arg.name.as_deref() == Some(param.name.as_str()) || arg.variable() == Some(param.name.as_str())
}

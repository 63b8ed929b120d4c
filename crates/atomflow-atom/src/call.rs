//! Call-site descriptors and argument expressions

use serde::{Deserialize, Serialize};

use crate::ArgumentError;

/// One call made from inside an atom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSite {
    /// Literal identifier at the call site, not resolved
    pub name: String,
    #[serde(default)]
    pub line: u32,
    /// Argument metadata; `None` when the parser did not record any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<RawArgument>>,
}

impl CallSite {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            line,
            args: None,
        }
    }

    pub fn with_args(mut self, args: Vec<RawArgument>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn has_arg_metadata(&self) -> bool {
        self.args.is_some()
    }

    pub fn raw_args(&self) -> &[RawArgument] {
        self.args.as_deref().unwrap_or(&[])
    }
}

/// Argument exactly as the parser emitted it (ESTree node kind + loose fields)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArgument {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Spread source (`...argument`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argument: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl RawArgument {
    pub fn identifier(name: &str) -> Self {
        Self {
            kind: "Identifier".into(),
            code: Some(name.into()),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn member(object: &str, property: &str) -> Self {
        Self {
            kind: "MemberExpression".into(),
            code: Some(format!("{}.{}", object, property)),
            object: Some(object.into()),
            property: Some(property.into()),
            ..Self::default()
        }
    }

    pub fn call(callee: &str) -> Self {
        Self {
            kind: "CallExpression".into(),
            code: Some(format!("{}()", callee)),
            callee: Some(callee.into()),
            ..Self::default()
        }
    }

    pub fn literal(value: serde_json::Value) -> Self {
        Self {
            kind: "Literal".into(),
            code: Some(value.to_string()),
            value: Some(value),
            ..Self::default()
        }
    }

    pub fn spread(source: &str) -> Self {
        Self {
            kind: "SpreadElement".into(),
            code: Some(format!("...{}", source)),
            argument: Some(source.into()),
            ..Self::default()
        }
    }

    pub fn with_data_type(mut self, data_type: &str) -> Self {
        self.data_type = Some(data_type.into());
        self
    }
}

/// Validated argument expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgumentExpr {
    /// `obj.prop`
    Member { object: String, property: String },
    Identifier { name: String },
    /// `fn(...)` whose result is passed along
    Call { callee: String },
    Literal { value: String },
    /// `...source`
    Spread { source: String },
    Other { node_type: String },
}

impl ArgumentExpr {
    pub fn node_type(&self) -> &str {
        match self {
            ArgumentExpr::Member { .. } => "MemberExpression",
            ArgumentExpr::Identifier { .. } => "Identifier",
            ArgumentExpr::Call { .. } => "CallExpression",
            ArgumentExpr::Literal { .. } => "Literal",
            ArgumentExpr::Spread { .. } => "SpreadElement",
            ArgumentExpr::Other { node_type } => node_type,
        }
    }
}

/// A call argument with its source text and optional declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub expr: ArgumentExpr,
    pub code: String,
    /// Raw `name` field, present on identifiers and some other nodes
    pub name: Option<String>,
    pub data_type: Option<String>,
}

impl Argument {
    /// Root binding the argument reads from (`user` for `user.profile.id`)
    pub fn variable(&self) -> Option<&str> {
        match &self.expr {
            ArgumentExpr::Member { object, .. } => Some(root_identifier(object)),
            ArgumentExpr::Identifier { name } => Some(name.as_str()),
            ArgumentExpr::Spread { source } => Some(root_identifier(source)),
            _ => None,
        }
        .filter(|v| !v.is_empty())
    }

    pub fn is_member(&self) -> bool {
        matches!(self.expr, ArgumentExpr::Member { .. })
    }

    pub fn is_spread(&self) -> bool {
        matches!(self.expr, ArgumentExpr::Spread { .. })
    }
}

impl TryFrom<&RawArgument> for Argument {
    type Error = ArgumentError;

    fn try_from(raw: &RawArgument) -> Result<Self, Self::Error> {
        let code = raw.code.clone().unwrap_or_default();
        let expr = match raw.kind.as_str() {
            "MemberExpression" => {
                let (object, property) = match (&raw.object, &raw.property) {
                    (Some(o), Some(p)) => (o.clone(), p.clone()),
                    _ => split_member(&code).ok_or_else(|| ArgumentError::IncompleteMember {
                        code: code.clone(),
                    })?,
                };
                ArgumentExpr::Member { object, property }
            }
            "Identifier" => {
                let name = raw
                    .name
                    .clone()
                    .or_else(|| non_empty(&code))
                    .ok_or(ArgumentError::MissingName)?;
                ArgumentExpr::Identifier { name }
            }
            "CallExpression" => {
                let callee = raw
                    .callee
                    .clone()
                    .or_else(|| code.split('(').next().and_then(non_empty))
                    .ok_or_else(|| ArgumentError::MissingCallee { code: code.clone() })?;
                ArgumentExpr::Call { callee }
            }
            "Literal" => {
                let value = match &raw.value {
                    Some(serde_json::Value::String(s)) => s.clone(),
                    Some(v) => v.to_string(),
                    None => code.clone(),
                };
                ArgumentExpr::Literal { value }
            }
            "SpreadElement" => {
                let source = raw
                    .argument
                    .clone()
                    .or_else(|| non_empty(code.trim_start_matches("...")))
                    .ok_or_else(|| ArgumentError::MissingSpreadSource { code: code.clone() })?;
                ArgumentExpr::Spread { source }
            }
            "" => return Err(ArgumentError::MissingNodeType),
            other => ArgumentExpr::Other {
                node_type: other.to_string(),
            },
        };

        Ok(Argument {
            expr,
            code,
            name: raw.name.clone(),
            data_type: raw.data_type.clone(),
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Split `a.b.c` into (`a.b`, `c`)
fn split_member(code: &str) -> Option<(String, String)> {
    let (object, property) = code.trim().rsplit_once('.')?;
    if object.is_empty() || property.is_empty() {
        return None;
    }
    Some((object.to_string(), property.to_string()))
}

/// Leading identifier of a dotted/indexed path
fn root_identifier(path: &str) -> &str {
    let end = path
        .find(|c: char| c == '.' || c == '[' || c == '(' || c == '?')
        .unwrap_or(path.len());
    path[..end].trim()
}

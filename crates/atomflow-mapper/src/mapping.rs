//! Positional argument mapping for one call site

use atomflow_atom::{Argument, ArgumentExpr, Atom, CallSite, Input};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::chain::{calculate_chain_complexity, detect_chained_transforms};
use crate::returns::{ReturnUsageHeuristic, SourceText};
use crate::transform::{detect_transform, Transform};
use crate::{DataFlowAnalysis, FlowSummary, MapError, ReturnUsage};

const SPREAD_ELEMENT: &str = "SpreadElement";

/// How the arguments of one call bind to the callee's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentMapping {
    pub caller: String,
    pub callee: String,
    pub call_site: u32,
    pub total_args: usize,
    pub total_params: usize,
    pub has_spread: bool,
    pub has_destructuring: bool,
    pub mappings: Vec<Mapping>,
    /// Set when mapping failed and this record is a placeholder
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl ArgumentMapping {
    /// Placeholder recorded when a call site could not be mapped
    pub fn degraded(caller: &Atom, callee: &Atom, call: &CallSite) -> Self {
        Self {
            caller: caller.name.clone(),
            callee: callee.name.clone(),
            call_site: call.line,
            total_args: call.raw_args().len(),
            total_params: callee.params().len(),
            has_spread: false,
            has_destructuring: false,
            mappings: Vec::new(),
            error: true,
        }
    }

    /// Any binding other than a plain pass-through
    pub fn has_data_transformation(&self) -> bool {
        self.mappings.iter().any(|m| !m.transform.is_direct_pass())
    }

    pub fn is_complete(&self) -> bool {
        !self.error && self.total_args == self.total_params
    }
}

/// One argument/parameter pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub position: usize,
    pub argument: ArgumentInfo,
    pub parameter: ParameterInfo,
    pub transform: Transform,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentInfo {
    pub code: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
}

impl From<&Argument> for ArgumentInfo {
    fn from(arg: &Argument) -> Self {
        Self {
            code: arg.code.clone(),
            node_type: arg.expr.node_type().to_string(),
            variable: arg.variable().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub shape: String,
    pub position: usize,
}

impl From<&Input> for ParameterInfo {
    fn from(param: &Input) -> Self {
        Self {
            name: param.name.clone(),
            shape: param.shape.as_str().to_string(),
            position: param.position,
        }
    }
}

/// Confidence that `arg` really binds `param`, in [0, 1]
///
/// Base 0.5; +0.3 when both sides carry the same data type; +0.2 for a
/// member expression; +0.1 when the names match exactly; -0.2 for a spread
/// argument or a destructured parameter.
pub fn calculate_confidence(arg: &Argument, param: &Input) -> f64 {
    let mut confidence: f64 = 0.5;

    if let (Some(a), Some(p)) = (&arg.data_type, &param.data_type) {
        if a == p {
            confidence += 0.3;
        }
    }
    if arg.is_member() {
        confidence += 0.2;
    }
    if exact_name(arg) == Some(param.name.as_str()) {
        confidence += 0.1;
    }
    if arg.is_spread() || param.is_destructured() {
        confidence -= 0.2;
    }

    round2(confidence.clamp(0.0, 1.0))
}

fn exact_name(arg: &Argument) -> Option<&str> {
    match (&arg.name, &arg.expr) {
        (Some(name), _) => Some(name),
        (None, ArgumentExpr::Identifier { name }) => Some(name),
        _ => None,
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Maps one call from `caller` to `callee`
pub struct ArgumentMapper<'a> {
    caller: &'a Atom,
    callee: &'a Atom,
    call: &'a CallSite,
    returns: &'a dyn ReturnUsageHeuristic,
}

impl<'a> ArgumentMapper<'a> {
    pub fn new(caller: &'a Atom, callee: &'a Atom, call: &'a CallSite) -> Self {
        Self {
            caller,
            callee,
            call,
            returns: &SourceText,
        }
    }

    /// Swap the return-usage heuristic
    pub fn with_return_heuristic(mut self, returns: &'a dyn ReturnUsageHeuristic) -> Self {
        self.returns = returns;
        self
    }

    /// Pair each argument with the parameter at the same position
    ///
    /// Surplus arguments and unfilled parameters produce no mapping but are
    /// still counted in `total_args` and `total_params`.
    pub fn map(&self) -> Result<ArgumentMapping, MapError> {
        if !targets(&self.call.name, &self.callee.name) {
            return Err(MapError::CalleeMismatch {
                call: self.call.name.clone(),
                callee: self.callee.name.clone(),
            });
        }

        let raw = self.call.raw_args();
        let params = self.callee.params();

        // only positions with a parameter are validated; surplus arguments
        // are counted but never inspected
        let mappings = raw
            .iter()
            .zip(params)
            .enumerate()
            .map(|(position, (r, param))| {
                let arg = Argument::try_from(r).map_err(|source| MapError::MalformedArgument {
                    call: self.call.name.clone(),
                    position,
                    source,
                })?;
                Ok(Mapping {
                    position,
                    argument: ArgumentInfo::from(&arg),
                    parameter: ParameterInfo::from(param),
                    transform: detect_transform(&arg, param),
                    confidence: calculate_confidence(&arg, param),
                })
            })
            .collect::<Result<Vec<_>, MapError>>()?;

        trace!(
            caller = %self.caller.id,
            callee = %self.callee.id,
            mapped = mappings.len(),
            "mapped call site"
        );

        Ok(ArgumentMapping {
            caller: self.caller.name.clone(),
            callee: self.callee.name.clone(),
            call_site: self.call.line,
            total_args: raw.len(),
            total_params: params.len(),
            has_spread: raw.iter().any(|r| r.kind == SPREAD_ELEMENT),
            has_destructuring: params.iter().any(Input::is_destructured),
            mappings,
            error: false,
        })
    }

    /// What the caller does with the callee's return value
    pub fn track_return_usage(&self) -> ReturnUsage {
        self.returns.track(self.caller, self.callee, self.call)
    }

    /// Mapping, return usage and chains in one record
    pub fn analyze_data_flow(&self) -> Result<DataFlowAnalysis, MapError> {
        let mapping = self.map()?;
        let return_usage = self.track_return_usage();
        let chains = detect_chained_transforms(&mapping, self.caller, self.callee);

        let summary = FlowSummary {
            has_data_transformation: mapping.has_data_transformation(),
            has_return_usage: return_usage.is_used,
            chain_complexity: calculate_chain_complexity(&mapping, &return_usage),
        };

        Ok(DataFlowAnalysis {
            mapping,
            return_usage,
            chains,
            summary,
        })
    }
}

/// `call` names `callee` directly or as a method (`obj.callee`)
fn targets(call: &str, callee: &str) -> bool {
    call == callee
        || call
            .strip_suffix(callee)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

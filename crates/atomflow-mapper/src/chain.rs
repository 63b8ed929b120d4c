//! Caller-side transformation chains feeding a call

use atomflow_atom::Atom;
use serde::{Deserialize, Serialize};

use crate::{ArgumentMapping, ReturnUsage};

/// `caller.operation` produced a value that flows into `callee.input`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub from: String,
    pub to: String,
    pub via: String,
}

/// Link each mapped argument variable to the caller transformation that
/// produced it, if any
pub fn detect_chained_transforms(
    mapping: &ArgumentMapping,
    caller: &Atom,
    callee: &Atom,
) -> Vec<ChainLink> {
    let Some(flow) = &caller.data_flow else {
        return Vec::new();
    };

    mapping
        .mappings
        .iter()
        .filter_map(|m| {
            let variable = m.argument.variable.as_deref()?;
            let producer = flow
                .transformations
                .iter()
                .find(|t| t.target() == Some(variable))?;
            Some(ChainLink {
                from: format!("{}.{}", caller.name, producer.operation_name()),
                to: format!("{}.input", callee.name),
                via: variable.to_string(),
            })
        })
        .collect()
}

/// Non-pass-through bindings, plus one if the result is used, plus each
/// later read of the result
pub fn calculate_chain_complexity(mapping: &ArgumentMapping, return_usage: &ReturnUsage) -> usize {
    let transformed = mapping
        .mappings
        .iter()
        .filter(|m| !m.transform.is_direct_pass())
        .count();
    transformed + usize::from(return_usage.is_used) + return_usage.usage_count()
}

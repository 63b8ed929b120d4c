//! atomflow-mapper: how values cross a call boundary
//!
//! For one call site from a caller atom into a callee atom this crate
//! pairs arguments with parameters, classifies each pairing as a
//! [`Transform`], scores it, and looks at what the caller does with the
//! returned value.

mod chain;
mod error;
mod mapping;
mod returns;
mod transform;

pub use chain::{calculate_chain_complexity, detect_chained_transforms, ChainLink};
pub use error::MapError;
pub use mapping::{
    calculate_confidence, ArgumentInfo, ArgumentMapper, ArgumentMapping, Mapping, ParameterInfo,
};
pub use returns::{ReturnUsage, ReturnUsageHeuristic, ReturnUsageReason, SourceText, UsageSite};
pub use transform::{detect_transform, Transform, TransformKind};

use serde::{Deserialize, Serialize};

/// Everything known about one call's data flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowAnalysis {
    pub mapping: ArgumentMapping,
    pub return_usage: ReturnUsage,
    pub chains: Vec<ChainLink>,
    pub summary: FlowSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub has_data_transformation: bool,
    pub has_return_usage: bool,
    pub chain_complexity: usize,
}

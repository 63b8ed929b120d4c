//! Flow classification, operation sequence, complexity

use atomflow_atom::{DataFlow, OpCategory};

use crate::FlowType;

/// Read/transform/write/return signals of a sketch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSignals {
    pub has_read: bool,
    pub has_transform: bool,
    pub has_write: bool,
    pub has_return: bool,
    /// Throws and never returns
    pub has_throw_only: bool,
}

impl FlowSignals {
    pub fn from_data_flow(data_flow: &DataFlow) -> Self {
        let category = |wanted: OpCategory| {
            data_flow
                .transformations
                .iter()
                .filter_map(|t| t.operation.as_ref())
                .any(|op| op.category() == wanted)
        };

        let has_return = data_flow.outputs.iter().any(|o| o.is_return());
        let has_throw = data_flow.outputs.iter().any(|o| o.is_throw());

        Self {
            has_read: category(OpCategory::Read),
            has_transform: category(OpCategory::Transform),
            has_write: category(OpCategory::Write) || data_flow.has_side_effect(),
            has_return,
            has_throw_only: has_throw && !has_return,
        }
    }

    /// First matching rule wins
    pub fn classify(&self) -> FlowType {
        let Self {
            has_read: read,
            has_transform: transform,
            has_write: write,
            has_return: ret,
            has_throw_only: throw_only,
        } = *self;

        if throw_only && !write {
            FlowType::Guard
        } else if read && transform && write && ret {
            FlowType::ReadTransformPersistReturn
        } else if read && transform && ret {
            FlowType::ReadTransformReturn
        } else if read && write && ret {
            FlowType::ReadPersistReturn
        } else if read && write {
            FlowType::ReadPersist
        } else if transform && ret {
            FlowType::TransformReturn
        } else if read && ret {
            FlowType::ReadReturn
        } else if write && !read && !transform && !ret {
            FlowType::SideEffectOnly
        } else if ret && !read && !transform && !write {
            FlowType::Passthrough
        } else {
            FlowType::Unknown
        }
    }
}

pub fn classify_flow(data_flow: &DataFlow) -> FlowType {
    FlowSignals::from_data_flow(data_flow).classify()
}

/// `receive`, each operation, then `emit` per side effect and `return` per return
pub fn operation_sequence(data_flow: &DataFlow) -> Vec<String> {
    let mut sequence = Vec::new();

    if !data_flow.inputs.is_empty() {
        sequence.push("receive".to_string());
    }

    for t in &data_flow.transformations {
        sequence.push(t.operation_name().to_string());
    }

    for _ in data_flow.outputs.iter().filter(|o| o.is_side_effect()) {
        sequence.push("emit".to_string());
    }
    for _ in data_flow.outputs.iter().filter(|o| o.is_return()) {
        sequence.push("return".to_string());
    }

    sequence
}

/// Rough 1-10 weight of a sketch
pub fn complexity_score(data_flow: &DataFlow) -> u8 {
    let mut score = 1.0
        + 0.5 * data_flow.inputs.len() as f64
        + 0.8 * data_flow.transformations.len() as f64
        + 0.5 * data_flow.outputs.len() as f64;

    if data_flow.has_side_effect() {
        score += 2.0;
    }

    score.round().clamp(1.0, 10.0) as u8
}

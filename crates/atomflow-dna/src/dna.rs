//! The DNA value object

use serde::{Deserialize, Serialize};

/// Placeholder used for every hash of an atom without a data-flow sketch
pub const SENTINEL_HASH: &str = "unknown";

/// Layered fingerprint of one atom
///
/// Hash levels go from coarse to specific: `structural_hash` only sees the
/// shape of the data flow, `contextual_hash` adds classification metadata,
/// `semantic_hash` adds the name and size. `pattern_hash` is the
/// transformation sequence alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dna {
    pub structural_hash: String,
    pub contextual_hash: String,
    pub semantic_hash: String,
    pub pattern_hash: String,
    pub flow_type: FlowType,
    pub operation_sequence: Vec<String>,
    /// 1 to 10
    pub complexity_score: u8,
    pub input_count: usize,
    pub output_count: usize,
    pub transformation_count: usize,
    /// `verb:domain:entity`
    pub semantic_fingerprint: String,
    /// 0 to 100; low means similarity with others is probably boilerplate
    pub duplicability_score: u8,
    pub id: String,
}

impl Dna {
    /// DNA for an atom the parser could not sketch
    pub fn fallback() -> Self {
        let semantic_fingerprint = "unknown:unknown:unknown".to_string();
        let id = crate::hash::dna_id(SENTINEL_HASH, SENTINEL_HASH, &semantic_fingerprint);
        Self {
            structural_hash: SENTINEL_HASH.to_string(),
            contextual_hash: SENTINEL_HASH.to_string(),
            semantic_hash: SENTINEL_HASH.to_string(),
            pattern_hash: SENTINEL_HASH.to_string(),
            flow_type: FlowType::Unknown,
            operation_sequence: Vec::new(),
            complexity_score: 1,
            input_count: 0,
            output_count: 0,
            transformation_count: 0,
            semantic_fingerprint,
            duplicability_score: 0,
            id,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.structural_hash == SENTINEL_HASH
    }
}

/// How data moves through a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowType {
    /// Only throws, validates input and bails
    Guard,
    ReadTransformPersistReturn,
    ReadTransformReturn,
    ReadPersistReturn,
    ReadPersist,
    TransformReturn,
    ReadReturn,
    SideEffectOnly,
    Passthrough,
    Unknown,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Guard => "guard",
            FlowType::ReadTransformPersistReturn => "read-transform-persist-return",
            FlowType::ReadTransformReturn => "read-transform-return",
            FlowType::ReadPersistReturn => "read-persist-return",
            FlowType::ReadPersist => "read-persist",
            FlowType::TransformReturn => "transform-return",
            FlowType::ReadReturn => "read-return",
            FlowType::SideEffectOnly => "side-effect-only",
            FlowType::Passthrough => "passthrough",
            FlowType::Unknown => "unknown",
        }
    }

    pub fn reads(&self) -> bool {
        self.as_str().contains("read")
    }

    pub fn persists(&self) -> bool {
        self.as_str().contains("persist")
    }

    pub fn transforms(&self) -> bool {
        self.as_str().contains("transform")
    }
}

impl std::fmt::Display for FlowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_shape() {
        let dna = Dna::fallback();
        assert!(dna.is_fallback());
        assert_eq!(dna.flow_type, FlowType::Unknown);
        assert_eq!(dna.duplicability_score, 0);
        assert_eq!(dna.pattern_hash, SENTINEL_HASH);
        assert_eq!(dna.id, Dna::fallback().id);
    }

    #[test]
    fn test_flow_type_serializes_kebab_case() {
        let json = serde_json::to_string(&FlowType::ReadTransformPersistReturn).unwrap();
        assert_eq!(json, r#""read-transform-persist-return""#);
        assert!(FlowType::ReadPersist.reads());
        assert!(FlowType::ReadPersist.persists());
        assert!(!FlowType::ReadPersist.transforms());
    }
}

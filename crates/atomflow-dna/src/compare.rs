//! Weighted DNA similarity

use crate::Dna;

const STRUCTURAL_WEIGHT: f64 = 0.4;
const FLOW_PARTIAL: f64 = 0.15;
const PATTERN_WEIGHT: f64 = 0.3;
const PATTERN_PARTIAL: f64 = 0.1;
const SEQUENCE_WEIGHT: f64 = 0.2;
const SEQUENCE_PARTIAL: f64 = 0.1;
const FINGERPRINT_WEIGHT: f64 = 0.1;

/// Similarity of two fingerprints in `[0, 1]`, rounded to two decimals
pub fn compare_dna(a: &Dna, b: &Dna) -> f64 {
    let same_length = a.operation_sequence.len() == b.operation_sequence.len();

    let structural = if a.structural_hash == b.structural_hash {
        STRUCTURAL_WEIGHT
    } else if a.flow_type == b.flow_type {
        FLOW_PARTIAL
    } else {
        0.0
    };

    let pattern = if a.pattern_hash == b.pattern_hash {
        PATTERN_WEIGHT
    } else if same_length {
        PATTERN_PARTIAL
    } else {
        0.0
    };

    let sequence = if a.operation_sequence == b.operation_sequence {
        SEQUENCE_WEIGHT
    } else if same_length {
        SEQUENCE_PARTIAL
    } else {
        0.0
    };

    let fingerprint = if a.semantic_fingerprint == b.semantic_fingerprint {
        FINGERPRINT_WEIGHT
    } else {
        0.0
    };

    let total = structural + pattern + sequence + fingerprint;
    ((total * 100.0).round() / 100.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlowType;

    fn dna(structural: &str, pattern: &str, seq: &[&str], fp: &str, flow: FlowType) -> Dna {
        Dna {
            structural_hash: structural.into(),
            pattern_hash: pattern.into(),
            operation_sequence: seq.iter().map(|s| s.to_string()).collect(),
            semantic_fingerprint: fp.into(),
            flow_type: flow,
            ..Dna::fallback()
        }
    }

    #[test]
    fn test_reflexive() {
        let d = dna("s", "p", &["receive", "return"], "get:api:user", FlowType::ReadReturn);
        assert_eq!(compare_dna(&d, &d), 1.0);
        assert_eq!(compare_dna(&Dna::fallback(), &Dna::fallback()), 1.0);
    }

    #[test]
    fn test_partial_credit() {
        let a = dna("s1", "p1", &["receive", "return"], "get:api:user", FlowType::ReadReturn);
        let b = dna("s2", "p2", &["receive", "emit"], "get:api:order", FlowType::ReadReturn);
        // 0.15 flow + 0.1 pattern length + 0.1 sequence length
        assert_eq!(compare_dna(&a, &b), 0.35);
    }

    #[test]
    fn test_nothing_in_common() {
        let a = dna("s1", "p1", &["receive"], "a:b:c", FlowType::Guard);
        let b = dna("s2", "p2", &["receive", "return"], "d:e:f", FlowType::Passthrough);
        assert_eq!(compare_dna(&a, &b), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = dna("s", "p1", &["receive", "return"], "a:b:c", FlowType::ReadReturn);
        let b = dna("s", "p2", &["receive", "return"], "a:b:d", FlowType::ReadReturn);
        assert_eq!(compare_dna(&a, &b), compare_dna(&b, &a));
        assert_eq!(compare_dna(&a, &b), 0.7);
    }
}

//! Canonical projections and truncated digests
//!
//! Each hash level is SHA-256 over the compact JSON encoding of a projection.
//! `serde_json` maps keep keys sorted, so the encoding is canonical.

use atomflow_atom::{Atom, DataFlow};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

/// Hex length of every hash except the pattern hash
pub const HASH_LEN: usize = 16;

pub const PATTERN_HASH_LEN: usize = 12;

/// Truncated hex SHA-256 of a canonical JSON value
pub fn digest(value: &Value, len: usize) -> String {
    digest_str(&value.to_string(), len)
}

fn digest_str(input: &str, len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..len.min(hex.len())].to_string()
}

/// Name-free shape of a data-flow sketch
pub fn structural_projection(data_flow: &DataFlow) -> Value {
    let inputs: Vec<Value> = data_flow
        .inputs
        .iter()
        .map(|i| {
            json!({
                "type": i.shape.as_str(),
                "usagePattern": i.usage_pattern(),
            })
        })
        .collect();

    let transformations: Vec<Value> = data_flow
        .transformations
        .iter()
        .map(|t| {
            json!({
                "operation": t.operation_name(),
                "arity": t.arity(),
            })
        })
        .collect();

    let outputs: Vec<Value> = data_flow
        .outputs
        .iter()
        .map(|o| {
            json!({
                "type": o.as_str(),
                "hasSideEffect": o.is_side_effect(),
            })
        })
        .collect();

    json!({
        "inputs": inputs,
        "transformations": transformations,
        "outputs": outputs,
    })
}

pub fn structural_hash(data_flow: &DataFlow) -> String {
    digest(&structural_projection(data_flow), HASH_LEN)
}

pub fn contextual_hash(structural: &str, atom: &Atom) -> String {
    let projection = json!({
        "structural": structural,
        "archetype": atom.archetype.as_ref().map(|a| a.kind.as_str()),
        "severity": atom.archetype.as_ref().and_then(|a| a.severity),
        "purpose": atom.purpose.map(|p| p.as_str()),
        "isTestCallback": atom.is_test_callback,
        "testCallbackType": atom.test_callback_type.map(|t| t.as_str()),
        "className": atom.class_name,
        "isExported": atom.is_exported,
        "isAsync": atom.is_async,
    });
    digest(&projection, HASH_LEN)
}

pub fn semantic_hash(contextual: &str, fingerprint: &str, atom: &Atom) -> String {
    let projection = json!({
        "contextual": contextual,
        "semanticFingerprint": fingerprint,
        "name": atom.name,
        "complexity": atom.complexity,
        "linesOfCode": atom.lines_of_code,
    });
    digest(&projection, HASH_LEN)
}

/// Hash of the transformation operations in order
pub fn pattern_hash(data_flow: &DataFlow) -> String {
    let sequence: Vec<&str> = data_flow
        .transformations
        .iter()
        .map(|t| t.operation_name())
        .collect();
    digest_str(&sequence.join("->"), PATTERN_HASH_LEN)
}

/// Identity of a DNA value
pub fn dna_id(semantic: &str, pattern: &str, fingerprint: &str) -> String {
    digest_str(&format!("{}:{}:{}", semantic, pattern, fingerprint), HASH_LEN)
}

/// Digest of every atom field DNA depends on, for cache validation
pub fn content_key(atom: &Atom) -> String {
    let projection = json!({
        "dataFlow": serde_json::to_value(&atom.data_flow).unwrap_or_default(),
        "name": atom.name,
        "archetype": serde_json::to_value(&atom.archetype).unwrap_or_default(),
        "purpose": atom.purpose.map(|p| p.as_str()),
        "complexity": atom.complexity,
        "linesOfCode": atom.lines_of_code,
        "isTestCallback": atom.is_test_callback,
        "testCallbackType": atom.test_callback_type.map(|t| t.as_str()),
        "className": atom.class_name,
        "isExported": atom.is_exported,
        "isAsync": atom.is_async,
        "semantic": serde_json::to_value(&atom.semantic).unwrap_or_default(),
    });
    digest(&projection, HASH_LEN)
}

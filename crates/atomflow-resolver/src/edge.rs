//! Cross-file edges and the edge map

use std::collections::HashMap;

use atomflow_mapper::ArgumentMapping;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Which rule picked the callee among same-named candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    /// Only one candidate existed
    Unique,
    /// The caller imports the candidate's file
    ImportHint,
    /// Exactly one candidate is exported
    SoleExported,
    /// Ambiguous; the first candidate in input order was taken
    FirstCandidate,
}

impl ResolvedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedBy::Unique => "unique",
            ResolvedBy::ImportHint => "import_hint",
            ResolvedBy::SoleExported => "sole_exported",
            ResolvedBy::FirstCandidate => "first_candidate",
        }
    }
}

/// A call from an atom in one file to an atom in another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossFileEdge {
    pub caller_id: String,
    pub callee_id: String,
    pub call_site: u32,
    pub caller_file: String,
    pub callee_file: String,
    pub callee_name: String,
    pub mapping: ArgumentMapping,
    pub confidence: f64,
    pub resolved_by: ResolvedBy,
}

/// Caller id to outgoing edges, only for atoms that produced edges
///
/// Callers keep the order of their first edge, which for a resolver run is
/// atom enumeration order. Serializes as a JSON object in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeMap {
    callers: Vec<(String, Vec<CrossFileEdge>)>,
    slots: HashMap<String, usize>,
}

impl EdgeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, edge: CrossFileEdge) {
        match self.slots.get(&edge.caller_id).copied() {
            Some(slot) => self.callers[slot].1.push(edge),
            None => {
                self.slots.insert(edge.caller_id.clone(), self.callers.len());
                self.callers.push((edge.caller_id.clone(), vec![edge]));
            }
        }
    }

    /// Outgoing edges of `caller_id`, in call order
    pub fn edges_from(&self, caller_id: &str) -> &[CrossFileEdge] {
        self.slots
            .get(caller_id)
            .map(|&slot| self.callers[slot].1.as_slice())
            .unwrap_or(&[])
    }

    /// Every edge whose callee is `callee_id`, in caller order
    pub fn callers_of(&self, callee_id: &str) -> Vec<&CrossFileEdge> {
        self.callers
            .iter()
            .flat_map(|(_, edges)| edges)
            .filter(|e| e.callee_id == callee_id)
            .collect()
    }

    pub fn contains(&self, caller_id: &str) -> bool {
        self.slots.contains_key(caller_id)
    }

    /// Number of callers with edges
    pub fn len(&self) -> usize {
        self.callers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callers.is_empty()
    }

    pub fn total_edges(&self) -> usize {
        self.callers.iter().map(|(_, edges)| edges.len()).sum()
    }

    /// Callers in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CrossFileEdge])> {
        self.callers
            .iter()
            .map(|(id, edges)| (id.as_str(), edges.as_slice()))
    }
}

impl Serialize for EdgeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl FromIterator<CrossFileEdge> for EdgeMap {
    fn from_iter<I: IntoIterator<Item = CrossFileEdge>>(iter: I) -> Self {
        let mut map = EdgeMap::new();
        for edge in iter {
            map.insert(edge);
        }
        map
    }
}

//! Depth-first walks over the edge map

use std::collections::HashSet;

use serde::Serialize;

use crate::{CrossFileEdge, EdgeMap};

/// One hop of a journey; `depth` is 1 for edges leaving the start atom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyStep<'a> {
    pub depth: usize,
    pub edge: &'a CrossFileEdge,
}

/// Follow edges from `start` up to `max_depth` hops
///
/// An edge into an atom already visited is recorded but not followed, so
/// cycles end the branch they close.
pub fn trace_journey<'a>(map: &'a EdgeMap, start: &str, max_depth: usize) -> Vec<JourneyStep<'a>> {
    let mut steps = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(start.to_string());
    walk(map, start, 1, max_depth, &mut visited, &mut steps);
    steps
}

fn walk<'a>(
    map: &'a EdgeMap,
    node: &str,
    depth: usize,
    max_depth: usize,
    visited: &mut HashSet<String>,
    steps: &mut Vec<JourneyStep<'a>>,
) {
    if depth > max_depth {
        return;
    }
    for edge in map.edges_from(node) {
        steps.push(JourneyStep { depth, edge });
        if visited.insert(edge.callee_id.clone()) {
            walk(map, &edge.callee_id, depth + 1, max_depth, visited, steps);
        }
    }
}

impl EdgeMap {
    pub fn trace_journey(&self, start: &str, max_depth: usize) -> Vec<JourneyStep<'_>> {
        trace_journey(self, start, max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::tests::edge;

    fn hops(steps: &[JourneyStep<'_>]) -> Vec<(usize, String)> {
        steps
            .iter()
            .map(|s| (s.depth, format!("{}->{}", s.edge.caller_id, s.edge.callee_id)))
            .collect()
    }

    #[test]
    fn test_depth_first_order() {
        let map: EdgeMap = vec![
            edge("a.js::main", "b.js::load", 1),
            edge("a.js::main", "c.js::save", 2),
            edge("b.js::load", "d.js::read", 5),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            hops(&map.trace_journey("a.js::main", 10)),
            vec![
                (1, "a.js::main->b.js::load".to_string()),
                (2, "b.js::load->d.js::read".to_string()),
                (1, "a.js::main->c.js::save".to_string()),
            ]
        );
    }

    #[test]
    fn test_cycle_is_cut() {
        let map: EdgeMap = vec![
            edge("a.js::ping", "b.js::pong", 1),
            edge("b.js::pong", "a.js::ping", 1),
        ]
        .into_iter()
        .collect();

        let steps = trace_journey(&map, "a.js::ping", 10);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].edge.callee_id, "a.js::ping");
    }

    #[test]
    fn test_depth_limit() {
        let map: EdgeMap = vec![
            edge("a.js::one", "b.js::two", 1),
            edge("b.js::two", "c.js::three", 1),
        ]
        .into_iter()
        .collect();

        assert_eq!(trace_journey(&map, "a.js::one", 1).len(), 1);
        assert!(trace_journey(&map, "a.js::one", 0).is_empty());
        assert!(trace_journey(&map, "z.js::none", 5).is_empty());
    }
}

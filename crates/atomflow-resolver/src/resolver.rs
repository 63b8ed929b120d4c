//! Cross-file call resolution
//!
//! For every call an atom makes, the resolver looks up same-named atoms in
//! other files and picks one:
//! 1. A candidate whose file the caller imports
//! 2. Otherwise the only exported candidate
//! 3. Otherwise the first candidate in input order
//!
//! Same-file calls are not cross-file edges and are skipped.

use std::ops::AddAssign;

use atomflow_atom::{Atom, CallSite};
use atomflow_mapper::{ArgumentMapper, ArgumentMapping};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::imports::{ImportMatcher, PathSuffix};
use crate::{AtomIndex, CrossFileEdge, EdgeMap, ResolvedBy, ResolverConfig};

/// Counters collected during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionStats {
    pub calls_seen: usize,
    /// Calls whose only same-named atoms live in the caller's file
    pub same_file_skips: usize,
    /// Calls with no atom of that name at all
    pub unresolved: usize,
    pub unique: usize,
    pub import_hint: usize,
    pub sole_exported: usize,
    pub first_candidate: usize,
    pub degraded_mappings: usize,
    pub below_min_confidence: usize,
}

impl ResolutionStats {
    pub fn edges(&self) -> usize {
        self.unique + self.import_hint + self.sole_exported + self.first_candidate
            - self.below_min_confidence
    }

    fn record(&mut self, rule: ResolvedBy) {
        match rule {
            ResolvedBy::Unique => self.unique += 1,
            ResolvedBy::ImportHint => self.import_hint += 1,
            ResolvedBy::SoleExported => self.sole_exported += 1,
            ResolvedBy::FirstCandidate => self.first_candidate += 1,
        }
    }
}

impl AddAssign for ResolutionStats {
    fn add_assign(&mut self, other: Self) {
        self.calls_seen += other.calls_seen;
        self.same_file_skips += other.same_file_skips;
        self.unresolved += other.unresolved;
        self.unique += other.unique;
        self.import_hint += other.import_hint;
        self.sole_exported += other.sole_exported;
        self.first_candidate += other.first_candidate;
        self.degraded_mappings += other.degraded_mappings;
        self.below_min_confidence += other.below_min_confidence;
    }
}

/// Resolves calls between atoms of different files
pub struct CrossFileResolver<'a> {
    index: AtomIndex<'a>,
    config: ResolverConfig,
    matcher: Box<dyn ImportMatcher>,
}

impl<'a> CrossFileResolver<'a> {
    pub fn new(atoms: &'a [Atom]) -> Self {
        Self {
            index: AtomIndex::new(atoms),
            config: ResolverConfig::default(),
            matcher: Box::new(PathSuffix),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_matcher(mut self, matcher: Box<dyn ImportMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn index(&self) -> &AtomIndex<'a> {
        &self.index
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Edges leaving `caller`, in `calls` order
    pub fn resolve_edges_from(&self, caller: &Atom) -> Vec<CrossFileEdge> {
        self.resolve_caller(caller, &mut ResolutionStats::default())
    }

    /// Edges for every atom, in atom order
    pub fn resolve_all(&self) -> Vec<CrossFileEdge> {
        self.resolve_all_with_stats().0
    }

    pub fn resolve_all_with_stats(&self) -> (Vec<CrossFileEdge>, ResolutionStats) {
        let mut stats = ResolutionStats::default();
        let mut edges = Vec::new();
        for caller in self.index.atoms() {
            edges.extend(self.resolve_caller(caller, &mut stats));
        }
        debug!(edges = edges.len(), atoms = self.index.len(), "resolved cross-file edges");
        (edges, stats)
    }

    /// Same output as [`resolve_all`](Self::resolve_all), sharded across
    /// threads once the atom count exceeds `parallel_threshold`
    pub fn resolve_all_parallel(&self) -> Vec<CrossFileEdge> {
        self.resolve_all_parallel_with_stats().0
    }

    pub fn resolve_all_parallel_with_stats(&self) -> (Vec<CrossFileEdge>, ResolutionStats) {
        if self.index.len() <= self.config.parallel_threshold {
            return self.resolve_all_with_stats();
        }

        let per_caller: Vec<(Vec<CrossFileEdge>, ResolutionStats)> = self
            .index
            .atoms()
            .par_iter()
            .map(|caller| {
                let mut stats = ResolutionStats::default();
                let edges = self.resolve_caller(caller, &mut stats);
                (edges, stats)
            })
            .collect();

        let mut stats = ResolutionStats::default();
        let mut edges = Vec::new();
        for (caller_edges, caller_stats) in per_caller {
            edges.extend(caller_edges);
            stats += caller_stats;
        }
        debug!(edges = edges.len(), atoms = self.index.len(), "resolved cross-file edges in parallel");
        (edges, stats)
    }

    pub fn build_edge_map(&self) -> EdgeMap {
        self.resolve_all().into_iter().collect()
    }

    fn resolve_caller(&self, caller: &Atom, stats: &mut ResolutionStats) -> Vec<CrossFileEdge> {
        caller
            .calls
            .iter()
            .filter_map(|call| self.resolve_call(caller, call, stats))
            .collect()
    }

    fn resolve_call(
        &self,
        caller: &Atom,
        call: &CallSite,
        stats: &mut ResolutionStats,
    ) -> Option<CrossFileEdge> {
        stats.calls_seen += 1;

        let named = self.index.named(&call.name);
        if named.is_empty() {
            stats.unresolved += 1;
            return None;
        }

        let candidates: Vec<&Atom> = named
            .iter()
            .copied()
            .filter(|a| a.file_path != caller.file_path)
            .collect();
        if candidates.is_empty() {
            stats.same_file_skips += 1;
            return None;
        }

        let (callee, resolved_by) = self.pick(caller, &candidates)?;
        stats.record(resolved_by);

        let import_hint = self.imports_file(caller, &callee.file_path);
        let confidence = edge_confidence(call, callee, import_hint);
        if confidence < self.config.min_confidence {
            stats.below_min_confidence += 1;
            return None;
        }

        let mapping = ArgumentMapper::new(caller, callee, call)
            .map()
            .unwrap_or_else(|err| {
                warn!(
                    caller = %caller.id,
                    callee = %callee.id,
                    line = call.line,
                    code = err.code(),
                    error = %err,
                    "argument mapping failed"
                );
                stats.degraded_mappings += 1;
                ArgumentMapping::degraded(caller, callee, call)
            });

        Some(CrossFileEdge {
            caller_id: caller.id.clone(),
            callee_id: callee.id.clone(),
            call_site: call.line,
            caller_file: caller.file_path.clone(),
            callee_file: callee.file_path.clone(),
            callee_name: callee.name.clone(),
            mapping,
            confidence,
            resolved_by,
        })
    }

    fn pick<'c>(&self, caller: &Atom, candidates: &[&'c Atom]) -> Option<(&'c Atom, ResolvedBy)> {
        if let [only] = candidates {
            let rule = if self.imports_file(caller, &only.file_path) {
                ResolvedBy::ImportHint
            } else {
                ResolvedBy::Unique
            };
            return Some((*only, rule));
        }

        if let Some(hinted) = candidates
            .iter()
            .find(|c| self.imports_file(caller, &c.file_path))
        {
            return Some((*hinted, ResolvedBy::ImportHint));
        }

        let mut exported = candidates.iter().filter(|c| c.is_exported);
        if let (Some(sole), None) = (exported.next(), exported.next()) {
            return Some((*sole, ResolvedBy::SoleExported));
        }

        candidates
            .first()
            .map(|first| (*first, ResolvedBy::FirstCandidate))
    }

    fn imports_file(&self, caller: &Atom, file_path: &str) -> bool {
        caller.imports_any(|source| self.matcher.matches(source, file_path))
    }
}

/// 0.5 base, +0.2 with argument metadata, +0.15 exported callee,
/// +0.15 import hint
fn edge_confidence(call: &CallSite, callee: &Atom, import_hint: bool) -> f64 {
    let mut confidence: f64 = 0.5;
    if call.has_arg_metadata() {
        confidence += 0.2;
    }
    if callee.is_exported {
        confidence += 0.15;
    }
    if import_hint {
        confidence += 0.15;
    }
    ((confidence * 100.0).round() / 100.0).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomflow_atom::{ImportDecl, RawArgument};

    fn atom(file: &str, name: &str, exported: bool) -> Atom {
        let mut a = Atom::new(file, name);
        a.is_exported = exported;
        a
    }

    fn calling(file: &str, name: &str, callee: &str) -> Atom {
        let mut a = atom(file, name, false);
        a.calls.push(CallSite::new(callee, 3));
        a
    }

    #[test]
    fn test_same_file_calls_are_skipped() {
        let atoms = vec![calling("a.js", "main", "helper"), atom("a.js", "helper", false)];
        let resolver = CrossFileResolver::new(&atoms);
        let (edges, stats) = resolver.resolve_all_with_stats();
        assert!(edges.is_empty());
        assert_eq!(stats.same_file_skips, 1);
        assert_eq!(stats.calls_seen, 1);
    }

    #[test]
    fn test_unknown_callee() {
        let atoms = vec![calling("a.js", "main", "console.log")];
        let (edges, stats) = CrossFileResolver::new(&atoms).resolve_all_with_stats();
        assert!(edges.is_empty());
        assert_eq!(stats.unresolved, 1);
    }

    #[test]
    fn test_import_hint_beats_order() {
        let mut main = calling("app.js", "main", "process");
        main.imports.push(ImportDecl::new("./workers/b"));
        let atoms = vec![
            main,
            atom("workers/a.js", "process", true),
            atom("workers/b.js", "process", false),
        ];

        let edges = CrossFileResolver::new(&atoms).resolve_all();
        assert_eq!(edges[0].callee_file, "workers/b.js");
        assert_eq!(edges[0].resolved_by, ResolvedBy::ImportHint);
        // base + import hint
        assert_eq!(edges[0].confidence, 0.65);
    }

    #[test]
    fn test_sole_exported() {
        let atoms = vec![
            calling("app.js", "main", "process"),
            atom("a.js", "process", false),
            atom("b.js", "process", true),
        ];
        let edges = CrossFileResolver::new(&atoms).resolve_all();
        assert_eq!(edges[0].callee_file, "b.js");
        assert_eq!(edges[0].resolved_by, ResolvedBy::SoleExported);
    }

    #[test]
    fn test_min_confidence_filters() {
        let atoms = vec![calling("app.js", "main", "save"), atom("db.js", "save", false)];
        let config = ResolverConfig::default().with_min_confidence(0.6);
        let (edges, stats) = CrossFileResolver::new(&atoms)
            .with_config(config)
            .resolve_all_with_stats();
        assert!(edges.is_empty());
        assert_eq!(stats.below_min_confidence, 1);
        assert_eq!(stats.edges(), 0);
    }

    #[test]
    fn test_malformed_args_degrade() {
        let mut main = atom("app.js", "main", false);
        main.calls
            .push(CallSite::new("save", 7).with_args(vec![RawArgument::default()]));
        let atoms = vec![main, atom("db.js", "save", true)];

        let (edges, stats) = CrossFileResolver::new(&atoms).resolve_all_with_stats();
        assert_eq!(edges.len(), 1);
        assert!(edges[0].mapping.error);
        assert!(edges[0].mapping.mappings.is_empty());
        assert_eq!(stats.degraded_mappings, 1);
    }

    #[test]
    fn test_confidence_is_capped() {
        let callee = atom("m.js", "f", true);
        let call = CallSite::new("f", 1).with_args(vec![]);
        assert_eq!(edge_confidence(&call, &callee, true), 1.0);
        assert_eq!(edge_confidence(&CallSite::new("f", 1), &callee, false), 0.65);
    }

    struct Never;

    impl ImportMatcher for Never {
        fn matches(&self, _import_source: &str, _file_path: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_custom_matcher() {
        let mut main = calling("app.js", "main", "process");
        main.imports.push(ImportDecl::new("./b"));
        let atoms = vec![main, atom("a.js", "process", false), atom("b.js", "process", false)];

        let edges = CrossFileResolver::new(&atoms)
            .with_matcher(Box::new(Never))
            .resolve_all();
        assert_eq!(edges[0].callee_file, "a.js");
        assert_eq!(edges[0].resolved_by, ResolvedBy::FirstCandidate);
    }
}

//! atomflow-resolver: cross-file call edges
//!
//! Turns the literal call names recorded on each atom into edges between
//! atoms in different files, each carrying an argument mapping and a
//! confidence. Edges are grouped per caller in an [`EdgeMap`] that supports
//! forward and reverse lookups and journey tracing.

mod config;
mod edge;
mod imports;
mod index;
mod journey;
mod resolver;

pub use config::{ConfigError, ResolverConfig};
pub use edge::{CrossFileEdge, EdgeMap, ResolvedBy};
pub use imports::{ImportMatcher, PathSuffix};
pub use index::AtomIndex;
pub use journey::{trace_journey, JourneyStep};
pub use resolver::{CrossFileResolver, ResolutionStats};

use atomflow_atom::Atom;

/// Resolve every cross-file edge among `atoms` with default settings
pub fn resolve_all(atoms: &[Atom]) -> Vec<CrossFileEdge> {
    CrossFileResolver::new(atoms).resolve_all()
}

/// Group the cross-file edges among `atoms` by caller id
pub fn build_edge_map(atoms: &[Atom]) -> EdgeMap {
    CrossFileResolver::new(atoms).build_edge_map()
}

//! Explicit DNA cache
//!
//! Entries are keyed by atom id and guarded by a content key, so an atom
//! that changed under the same id is recomputed rather than served stale.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use atomflow_atom::Atom;
use tracing::debug;

use crate::{hash, Dna, DnaExtractor};

struct CachedDna {
    content_key: String,
    file_path: String,
    dna: Dna,
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Cache of computed DNA, owned by whoever drives the analysis
#[derive(Default)]
pub struct DnaCache {
    extractor: DnaExtractor,
    entries: HashMap<String, CachedDna>,
    stats: CacheStats,
}

impl DnaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractor(extractor: DnaExtractor) -> Self {
        Self {
            extractor,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Cached DNA for an atom id, without validating freshness
    pub fn get(&self, atom_id: &str) -> Option<&Dna> {
        self.entries.get(atom_id).map(|e| &e.dna)
    }

    /// DNA for `atom`, computing it on a miss or when the atom changed
    pub fn get_or_extract(&mut self, atom: &Atom) -> &Dna {
        let content_key = hash::content_key(atom);

        match self.entries.entry(atom.id.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().content_key == content_key {
                    self.stats.hits += 1;
                } else {
                    debug!(atom = %atom.id, "atom changed, recomputing DNA");
                    self.stats.misses += 1;
                    entry.insert(CachedDna {
                        content_key,
                        file_path: atom.file_path.clone(),
                        dna: self.extractor.extract(atom),
                    });
                }
                &entry.into_mut().dna
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                let cached = entry.insert(CachedDna {
                    content_key,
                    file_path: atom.file_path.clone(),
                    dna: self.extractor.extract(atom),
                });
                &cached.dna
            }
        }
    }

    /// Drop one atom's entry; returns whether it was present
    pub fn invalidate(&mut self, atom_id: &str) -> bool {
        self.entries.remove(atom_id).is_some()
    }

    /// Drop every entry for atoms defined in `file_path`
    pub fn invalidate_file(&mut self, file_path: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, e| e.file_path != file_path);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

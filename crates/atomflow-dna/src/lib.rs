//! atomflow-dna: layered fingerprints for extracted atoms
//!
//! DNA identifies "the same" logical function across renames and moves.
//! It is derived from an atom's data-flow sketch plus metadata:
//! - `structural_hash`: shape of inputs, transformations, outputs (no names)
//! - `contextual_hash`: structural + archetype/purpose/test/class flags
//! - `semantic_hash`: contextual + fingerprint, name and size
//! - `pattern_hash`: the transformation sequence alone
//!
//! DNA is never stored on atoms. Use [`DnaCache`] when repeated lookups
//! matter.
//!
//! # Example
//!
//! ```
//! use atomflow_atom::{Atom, DataFlow, Input, Output};
//! use atomflow_dna::{compare_dna, extract_dna};
//!
//! let mut add = Atom::new("math.js", "add");
//! add.data_flow = Some(DataFlow {
//!     inputs: vec![Input::simple("a", 0), Input::simple("b", 1)],
//!     outputs: vec![Output::returns()],
//!     transformations: vec![],
//! });
//!
//! let dna = extract_dna(&add);
//! assert_eq!(compare_dna(&dna, &dna), 1.0);
//! ```

mod cache;
mod compare;
mod dna;
mod duplicability;
mod fingerprint;
mod flow;
pub mod hash;

pub use cache::{CacheStats, DnaCache};
pub use compare::compare_dna;
pub use dna::{Dna, FlowType, SENTINEL_HASH};
pub use duplicability::duplicability_score;
pub use fingerprint::{semantic_fingerprint, CommonVerbs, VerbLexicon, COMMON_VERBS};
pub use flow::{classify_flow, complexity_score, operation_sequence, FlowSignals};

use atomflow_atom::Atom;
use tracing::trace;

/// Computes DNA with a configurable verb lexicon
pub struct DnaExtractor {
    lexicon: Box<dyn VerbLexicon>,
}

impl DnaExtractor {
    pub fn new() -> Self {
        Self {
            lexicon: Box::new(CommonVerbs),
        }
    }

    pub fn with_lexicon(lexicon: Box<dyn VerbLexicon>) -> Self {
        Self { lexicon }
    }

    /// Derive the DNA of one atom
    ///
    /// Atoms without a data-flow sketch get [`Dna::fallback`].
    pub fn extract(&self, atom: &Atom) -> Dna {
        let Some(data_flow) = &atom.data_flow else {
            trace!(atom = %atom.id, "no data flow, using fallback DNA");
            return Dna::fallback();
        };

        let flow_type = classify_flow(data_flow);
        let fingerprint = semantic_fingerprint(atom, flow_type, self.lexicon.as_ref());

        let structural = hash::structural_hash(data_flow);
        let contextual = hash::contextual_hash(&structural, atom);
        let semantic = hash::semantic_hash(&contextual, &fingerprint, atom);
        let pattern = hash::pattern_hash(data_flow);
        let id = hash::dna_id(&semantic, &pattern, &fingerprint);

        Dna {
            structural_hash: structural,
            contextual_hash: contextual,
            semantic_hash: semantic,
            pattern_hash: pattern,
            flow_type,
            operation_sequence: operation_sequence(data_flow),
            complexity_score: complexity_score(data_flow),
            input_count: data_flow.inputs.len(),
            output_count: data_flow.outputs.len(),
            transformation_count: data_flow.transformations.len(),
            semantic_fingerprint: fingerprint,
            duplicability_score: duplicability_score(atom),
            id,
        }
    }
}

impl Default for DnaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive DNA with the default verb lexicon
pub fn extract_dna(atom: &Atom) -> Dna {
    DnaExtractor::new().extract(atom)
}

//! Duplicability scoring
//!
//! Repeated test scaffolding and trivial accessors look alike across a
//! codebase without being meaningful duplication. The score lets duplicate
//! detection drop those pairs before flagging them.

use atomflow_atom::{Atom, Purpose};

const BASE: i32 = 100;

/// 0-100 estimate of how meaningful a structural match with this atom is
pub fn duplicability_score(atom: &Atom) -> u8 {
    let mut score = BASE;
    let loc = atom.lines_of_code;
    let complexity = atom.complexity;

    if atom.is_test_callback {
        score -= 60;
        if atom.test_callback_type.is_some_and(|t| t.is_per_test_hook()) {
            score -= 20;
        }
    }

    if atom.class_name.is_some() && complexity == 1 && loc <= 5 {
        score -= 40;
    }

    if is_accessor_name(&atom.name) && complexity <= 1 && loc <= 3 {
        score -= 50;
    }

    if atom.name == "constructor" && complexity <= 2 && loc <= 5 {
        score -= 45;
    }

    if atom.purpose == Some(Purpose::TestHelper) {
        score -= 35;
    }

    if atom.is_exported && atom.purpose == Some(Purpose::ApiExport) {
        score += 15;
    }
    if complexity >= 5 {
        score += 10;
    }
    if loc > 20 {
        score += 15;
    }
    if atom.has_side_effect() {
        score += 10;
    }

    score.clamp(0, 100) as u8
}

/// `get`, `set` or `is` as a whole word: `getName`, `is_valid`, `set`
fn is_accessor_name(name: &str) -> bool {
    ["get", "set", "is"].iter().any(|prefix| {
        let Some(head) = name.get(..prefix.len()) else {
            return false;
        };
        head.eq_ignore_ascii_case(prefix)
            && name[prefix.len()..]
                .chars()
                .next()
                .map_or(true, |c| c.is_uppercase() || c == '_')
    })
}

//! Lookup tables over a slice of atoms

use std::collections::HashMap;

use atomflow_atom::Atom;

/// Read-only index by id and by name
///
/// Candidates under one name keep the order of the input slice.
pub struct AtomIndex<'a> {
    atoms: &'a [Atom],
    by_id: HashMap<&'a str, &'a Atom>,
    by_name: HashMap<&'a str, Vec<&'a Atom>>,
}

impl<'a> AtomIndex<'a> {
    pub fn new(atoms: &'a [Atom]) -> Self {
        let mut by_id = HashMap::with_capacity(atoms.len());
        let mut by_name: HashMap<&str, Vec<&Atom>> = HashMap::new();

        for atom in atoms {
            by_id.insert(atom.id.as_str(), atom);
            by_name.entry(atom.name.as_str()).or_default().push(atom);
        }

        Self {
            atoms,
            by_id,
            by_name,
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Atom> {
        self.by_id.get(id).copied()
    }

    /// All atoms named `name`, in input order
    pub fn named(&self, name: &str) -> &[&'a Atom] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn atoms(&self) -> &'a [Atom] {
        self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

//! Reading atoms from parser output
//!
//! The parser writes one JSON document per file or per project: either an
//! array of atoms or a single atom object. Directories are walked for
//! `*.json` files in a stable, sorted order so atom enumeration order (and
//! therefore resolution order) is reproducible.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::{Atom, LoadError};

/// Parse atoms from a JSON string
///
/// A document starting with `[` is an atom array, anything else a single
/// atom, so a bad field is reported with its line and column.
pub fn parse_atoms(json: &str) -> Result<Vec<Atom>, serde_json::Error> {
    match json.trim_start().as_bytes().first() {
        Some(b'[') => serde_json::from_str(json),
        _ => serde_json::from_str::<Atom>(json).map(|atom| vec![atom]),
    }
}

/// Load atoms from one JSON file
pub fn load_atoms_from_file(path: &Path) -> Result<Vec<Atom>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_atoms(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load atoms from files and directories, rejecting duplicate ids
pub fn load_atoms(paths: &[PathBuf]) -> Result<Vec<Atom>, LoadError> {
    let mut atoms = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        for file in json_files(path)? {
            let loaded = load_atoms_from_file(&file)?;
            debug!(file = %file.display(), count = loaded.len(), "loaded atoms");
            for atom in loaded {
                if !seen.insert(atom.id.clone()) {
                    return Err(LoadError::DuplicateId { id: atom.id });
                }
                atoms.push(atom);
            }
        }
    }

    Ok(atoms)
}

fn json_files(path: &Path) -> Result<Vec<PathBuf>, LoadError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = entry.path().extension().and_then(|e| e.to_str()) == Some("json");
        if entry.file_type().is_file() && is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

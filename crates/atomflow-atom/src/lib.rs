//! atomflow-atom - Core types for extracted function units
//!
//! An atom is one function or method pulled out of a source file by an
//! upstream parser. This crate defines its shape, the data-flow sketch
//! attached to it, and the call-site descriptors used for cross-file
//! resolution. Everything here deserializes from the camelCase JSON the
//! parser emits.
//!
//! Atoms are read-only inputs: the analysis crates derive new structures
//! from them and never write back.

mod atom;
mod call;
mod dataflow;
mod error;
mod load;

pub use atom::*;
pub use call::*;
pub use dataflow::*;
pub use error::{ArgumentError, LoadError};
pub use load::{load_atoms, load_atoms_from_file, parse_atoms};

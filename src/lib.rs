//! atomflow - atom identity and cross-file data-flow resolution
//!
//! This is the root workspace crate that provides integration tests.
//! The actual implementation is in the workspace member crates.

// Re-export main crates for convenience
pub use atomflow_atom as atom;
pub use atomflow_dna as dna;
pub use atomflow_mapper as mapper;
pub use atomflow_resolver as resolver;

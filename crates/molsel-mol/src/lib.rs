//! Molecular record vocabulary for the molsel selection compiler
//!
//! This crate describes the host data model at the boundary the selection
//! compiler needs:
//!
//! - [`ModelRecord`], [`ChainRecord`], [`ResidueRecord`], [`AtomRecord`] -
//!   read-only views of each level of the model → chain → residue → atom
//!   hierarchy
//! - [`ResidueClass`] - residue categories with backbone/sidechain atom tables
//! - [`SecondaryStructure`] - per-residue secondary structure codes
//!
//! Storage is left to the host; the compiler only ever sees these traits.

mod record;
pub mod residue;
mod secondary;

pub use record::{AtomRecord, ChainRecord, ModelRecord, ResidueRecord};
pub use residue::{classify_residue, ResidueClass};
pub use secondary::SecondaryStructure;

//! Field tests supplied by the host data model
//!
//! The compiler never looks inside entities. For each granularity the host
//! provides a test answering "does this entity satisfy this leaf?" with an
//! [`Outcome`]; [`EntityTests`] bundles the four of them.
//!
//! [`MoleculeTests`] implements them over the `molsel-mol` record traits:
//!
//! | leaf field  | atom      | residue             | chain      | model      |
//! |-------------|-----------|---------------------|------------|------------|
//! | keyword     | decides   | decides (1)         | n/a        | n/a        |
//! | resname     | decides   | decides             | n/a        | n/a        |
//! | resno       | decides   | decides             | n/a        | n/a        |
//! | chainname   | decides   | decides (2)         | decides (2)| n/a        |
//! | model       | decides   | decides             | decides    | decides    |
//! | atomname    | decides   | n/a                 | n/a        | n/a        |
//! | element     | decides   | n/a                 | n/a        | n/a        |
//! | altloc      | decides   | n/a                 | n/a        | n/a        |
//! | atomindex   | decides   | decides (3)         | decides (3)| decides (3)|
//!
//! (1) except `backbone` and `sidechain`, which are atom properties.
//! (2) not applicable when the chain has no assigned name.
//! (3) satisfied when the entity's atom range holds a listed index; not
//!     applicable when the record does not report a range.

use std::ops::Range;

use molsel_mol::{AtomRecord, ChainRecord, ModelRecord, ResidueRecord};

use crate::ast::{Keyword, Leaf};
use crate::eval::Outcome;

/// The four primitive field tests of a host data model
///
/// Entity types may be unsized (`dyn AtomRecord`, `str`, ...).
pub trait EntityTests: Send + Sync + 'static {
    type Atom: ?Sized + 'static;
    type Residue: ?Sized + 'static;
    type Chain: ?Sized + 'static;
    type Model: ?Sized + 'static;

    fn test_atom(&self, atom: &Self::Atom, leaf: &Leaf) -> Outcome;
    fn test_residue(&self, residue: &Self::Residue, leaf: &Leaf) -> Outcome;
    fn test_chain(&self, chain: &Self::Chain, leaf: &Leaf) -> Outcome;
    fn test_model(&self, model: &Self::Model, leaf: &Leaf) -> Outcome;
}

/// Field tests over the record traits of `molsel-mol`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoleculeTests;

impl EntityTests for MoleculeTests {
    type Atom = dyn AtomRecord;
    type Residue = dyn ResidueRecord;
    type Chain = dyn ChainRecord;
    type Model = dyn ModelRecord;

    fn test_atom(&self, atom: &dyn AtomRecord, leaf: &Leaf) -> Outcome {
        test_atom(atom, leaf)
    }

    fn test_residue(&self, residue: &dyn ResidueRecord, leaf: &Leaf) -> Outcome {
        test_residue(residue, leaf)
    }

    fn test_chain(&self, chain: &dyn ChainRecord, leaf: &Leaf) -> Outcome {
        test_chain(chain, leaf)
    }

    fn test_model(&self, model: &dyn ModelRecord, leaf: &Leaf) -> Outcome {
        test_model(model, leaf)
    }
}

/// Keyword semantics shared by atoms and residues
///
/// `atom_name` is `None` at residue level, where `backbone`/`sidechain`
/// cannot be decided.
fn keyword_outcome<R>(keyword: Keyword, residue: &R, atom_name: Option<&str>) -> Outcome
where
    R: ResidueRecord + ?Sized,
{
    let class = residue.residue_class();
    let ss = residue.secondary_structure();
    match keyword {
        Keyword::All => Outcome::Satisfied,
        Keyword::Hetero => residue.is_hetero().into(),
        Keyword::Water => class.is_water().into(),
        Keyword::Ion => class.is_ion().into(),
        Keyword::Protein => class.is_protein().into(),
        Keyword::Nucleic => class.is_nucleic().into(),
        Keyword::Rna => class.is_rna().into(),
        Keyword::Dna => class.is_dna().into(),
        Keyword::Polymer => class.is_polymer().into(),
        Keyword::Helix => ss.is_helix().into(),
        Keyword::Sheet => ss.is_sheet().into(),
        Keyword::Backbone => match atom_name {
            Some(name) => class.is_backbone_atom(name).into(),
            None => Outcome::Inapplicable,
        },
        Keyword::Sidechain => match atom_name {
            Some(name) => class.is_sidechain_atom(name).into(),
            None => Outcome::Inapplicable,
        },
    }
}

/// Whether any of the sorted `indices` lies in `range`
fn holds_any_index(indices: &[usize], range: Option<Range<usize>>) -> Outcome {
    match range {
        Some(range) => {
            let first = indices.partition_point(|&i| i < range.start);
            indices.get(first).is_some_and(|&i| i < range.end).into()
        }
        None => Outcome::Inapplicable,
    }
}

/// Atom-level test: every field decides
pub fn test_atom<A: AtomRecord + ?Sized>(atom: &A, leaf: &Leaf) -> Outcome {
    if let Some(keyword) = leaf.keyword {
        return keyword_outcome(keyword, atom, Some(atom.atom_name()));
    }

    let matches = leaf.resname.as_deref().map_or(true, |r| r == atom.residue_name())
        && leaf.chainname.as_deref().map_or(true, |c| c == atom.chain_name())
        && leaf.atomname.as_deref().map_or(true, |a| a == atom.atom_name())
        && leaf.model.map_or(true, |m| m == atom.model_index())
        && leaf.resno.map_or(true, |r| r.contains(atom.residue_number()))
        && leaf.element.as_deref().map_or(true, |e| e == atom.element())
        && leaf.altloc.as_deref().map_or(true, |a| a == atom.altloc())
        && leaf.atomindex.as_deref().map_or(true, |list| {
            atom.atom_index().is_some_and(|i| list.binary_search(&i).is_ok())
        });
    matches.into()
}

/// Residue-level test
pub fn test_residue<R: ResidueRecord + ?Sized>(residue: &R, leaf: &Leaf) -> Outcome {
    if let Some(keyword) = leaf.keyword {
        return keyword_outcome(keyword, residue, None);
    }
    if let Some(indices) = leaf.atomindex.as_deref() {
        return holds_any_index(indices, residue.residue_atoms());
    }

    if leaf.chainname.is_none() && leaf.model.is_none() && leaf.resname.is_none() && leaf.resno.is_none() {
        return Outcome::Inapplicable;
    }
    if leaf.chainname.is_some() && residue.chain_name().is_empty() {
        return Outcome::Inapplicable;
    }

    let matches = leaf.resname.as_deref().map_or(true, |r| r == residue.residue_name())
        && leaf.chainname.as_deref().map_or(true, |c| c == residue.chain_name())
        && leaf.model.map_or(true, |m| m == residue.model_index())
        && leaf.resno.map_or(true, |r| r.contains(residue.residue_number()));
    matches.into()
}

/// Chain-level test: only `chainname`, `model` and `atomindex` apply
pub fn test_chain<C: ChainRecord + ?Sized>(chain: &C, leaf: &Leaf) -> Outcome {
    if let Some(indices) = leaf.atomindex.as_deref() {
        return holds_any_index(indices, chain.chain_atoms());
    }
    if leaf.chainname.is_none() && leaf.model.is_none() {
        return Outcome::Inapplicable;
    }
    if leaf.chainname.is_some() && chain.chain_name().is_empty() {
        return Outcome::Inapplicable;
    }

    let matches = leaf.chainname.as_deref().map_or(true, |c| c == chain.chain_name())
        && leaf.model.map_or(true, |m| m == chain.model_index());
    matches.into()
}

/// Model-level test: only `model` and `atomindex` apply
pub fn test_model<M: ModelRecord + ?Sized>(model: &M, leaf: &Leaf) -> Outcome {
    if let Some(indices) = leaf.atomindex.as_deref() {
        return holds_any_index(indices, model.model_atoms());
    }
    match leaf.model {
        Some(index) => (index == model.model_index()).into(),
        None => Outcome::Inapplicable,
    }
}

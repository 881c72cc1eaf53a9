//! Molecular selection language compiler
//!
//! Compiles short textual queries such as `"10-20:A.CA"`,
//! `"protein and not backbone"` or `"( :A or :B ) and not HOH"` into
//! predicates that decide whether a model, chain, residue or atom is selected.
//!
//! # Overview
//!
//! The pipeline is:
//!
//! 1. [`lexer::chunk`] splits the string into whitespace- and
//!    parenthesis-delimited chunks;
//! 2. the parser walks the chunks with a stack of partially built nodes,
//!    expanding reserved words (`PROTEIN`, `POLAR`, `TURN`, ...) through the
//!    [`keywords`] table and decoding address shorthand
//!    (`resi[-resi2][:chain][.atom][/model]`, `#element`, `~altloc`,
//!    `@index,list`);
//! 3. for each granularity, [`filter`] optionally drops the constraints that
//!    granularity cannot see;
//! 4. [`Predicate`] evaluates the tree with tri-valued logic so that one tree
//!    serves every level of the hierarchy.
//!
//! [`Selection`] ties the pipeline together: it owns the strings, reparses on
//! change, caches eight predicates lazily and notifies observers.
//!
//! # Example
//!
//! ```rust,ignore
//! use molsel_select::Selection;
//!
//! let sele = Selection::new("protein and not backbone");
//! let mask = sele.select_atoms(&atoms);
//! println!("{} side chain atoms", mask.count());
//! ```

mod ast;
mod error;
mod eval;
pub mod filter;
mod host;
pub mod keywords;
pub mod lexer;
mod options;
mod parser;
mod result;
mod selection;

pub use ast::{Keyword, Leaf, Operator, ResNo, Rule, SelectionNode, SelectionTree};
pub use error::{ParseError, ParseResult};
pub use eval::{LeafTest, Outcome, Predicate};
pub use filter::{FilterMode, Granularity};
pub use host::{test_atom, test_chain, test_model, test_residue, EntityTests, MoleculeTests};
pub use options::SelectionOptions;
pub use result::SelectionMask;
pub use selection::{combine, Observer, ObserverId, Selection};

/// Parse a selection string into a tree
///
/// # Example
/// ```rust,ignore
/// let tree = parse(":A and not HOH")?;
/// ```
pub fn parse(input: &str) -> ParseResult<SelectionTree> {
    parser::parse_selection(input)
}

/// Parse a selection string, keeping failures as [`SelectionTree::Error`]
pub fn parse_tree(input: &str) -> SelectionTree {
    parse(input).into()
}

/// Common imports
pub mod prelude {
    pub use crate::{
        EntityTests, FilterMode, Granularity, Leaf, MoleculeTests, Outcome, Predicate, Selection,
        SelectionMask, SelectionNode, SelectionOptions, SelectionTree,
    };
    pub use molsel_mol::{AtomRecord, ChainRecord, ModelRecord, ResidueRecord};
}

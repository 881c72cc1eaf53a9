//! Granularity filter
//!
//! Derives the tree used by the "only" predicates: constraints on fields that
//! a granularity cannot see (e.g. an atom name when testing a chain) are
//! removed.
//!
//! In [`FilterMode::Preserve`] the pruning decides only *whether* anything
//! survives: the original node comes back unchanged when at least one rule
//! survives, and `None` when nothing does. Traversal code relies on the "only"
//! predicates accepting the unfiltered tree in that common case.
//! [`FilterMode::Prune`] returns the pruned subtree itself.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::ast::{Leaf, Rule, SelectionNode};

/// Level of the hierarchy a predicate evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Atom,
    Residue,
    Chain,
    Model,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Atom,
        Granularity::Residue,
        Granularity::Chain,
        Granularity::Model,
    ];

    /// Whether `leaf` constrains a field foreign to this granularity
    ///
    /// Keywords follow the level they classify: `backbone`/`sidechain` belong
    /// to atoms only, residue categories (`protein`, `water`, ...) are foreign
    /// to atoms, chains keep the categories a chain can carry, and models
    /// drop every keyword. Atom indices are never foreign.
    pub fn is_foreign(self, leaf: &Leaf) -> bool {
        let chain = leaf.chainname.is_some();
        let model = leaf.model.is_some();
        let residue = leaf.resname.is_some() || leaf.resno.is_some();
        let atom = leaf.atomname.is_some() || leaf.element.is_some() || leaf.altloc.is_some();

        let keyword = match (self, leaf.keyword) {
            (_, None) => false,
            (Granularity::Atom, Some(k)) => !k.is_atom_property(),
            (Granularity::Residue, Some(k)) => k.is_atom_property(),
            (Granularity::Chain, Some(k)) => !k.is_chain_category(),
            (Granularity::Model, Some(_)) => true,
        };

        keyword
            || match self {
                Granularity::Atom => model || chain || residue,
                Granularity::Residue => model || chain || atom,
                Granularity::Chain => residue || atom,
                Granularity::Model => chain || residue || atom,
            }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Granularity::Atom => "atom",
            Granularity::Residue => "residue",
            Granularity::Chain => "chain",
            Granularity::Model => "model",
        };
        f.write_str(name)
    }
}

/// What the filter hands back when rules survive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Original node whenever anything survives
    #[default]
    Preserve,
    /// The pruned subtree
    Prune,
}

/// Filter `node` for `granularity`
///
/// `None` means every constraint was foreign; callers treat that as
/// "no test" (everything passes). A node without rules is returned as is.
pub fn filter(
    node: &SelectionNode,
    granularity: Granularity,
    mode: FilterMode,
) -> Option<Cow<'_, SelectionNode>> {
    if node.rules.is_empty() {
        return Some(Cow::Borrowed(node));
    }
    let pruned = prune(node, granularity)?;
    match mode {
        FilterMode::Preserve => Some(Cow::Borrowed(node)),
        FilterMode::Prune => Some(Cow::Owned(pruned)),
    }
}

/// Remove foreign leaves and the compound nodes left without rules
fn prune(node: &SelectionNode, granularity: Granularity) -> Option<SelectionNode> {
    if node.rules.is_empty() {
        return Some(node.clone());
    }

    let rules: Vec<Rule> = node
        .rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Node(child) => prune(child, granularity).map(Rule::Node),
            Rule::Leaf(leaf) if granularity.is_foreign(leaf) => None,
            Rule::Leaf(leaf) => Some(Rule::Leaf(leaf.clone())),
        })
        .collect();

    if rules.is_empty() {
        None
    } else {
        Some(SelectionNode { operator: node.operator, negate: node.negate, rules })
    }
}

//! Selection Abstract Syntax Tree
//!
//! A parsed selection is a tree of [`SelectionNode`]s whose leaves are
//! single-field [`Leaf`] constraints. The serde representation matches the
//! JSON shape `{ "operator": "AND", "negate": true, "rules": [...] }` with
//! absent fields omitted and residue ranges written as `[lo, hi]`.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Reserved words that survive into the tree as a `keyword` leaf
///
/// Macro keywords (`SMALL`, `TURN`, ...) are expanded at parse time and never
/// appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    Hetero,
    Water,
    Ion,
    Protein,
    Nucleic,
    Rna,
    Dna,
    Polymer,
    Helix,
    Sheet,
    Backbone,
    Sidechain,
    /// Universal-true marker (`*`, `all`)
    All,
}

impl Keyword {
    /// Uppercase spelling
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Hetero => "HETERO",
            Keyword::Water => "WATER",
            Keyword::Ion => "ION",
            Keyword::Protein => "PROTEIN",
            Keyword::Nucleic => "NUCLEIC",
            Keyword::Rna => "RNA",
            Keyword::Dna => "DNA",
            Keyword::Polymer => "POLYMER",
            Keyword::Helix => "HELIX",
            Keyword::Sheet => "SHEET",
            Keyword::Backbone => "BACKBONE",
            Keyword::Sidechain => "SIDECHAIN",
            Keyword::All => "ALL",
        }
    }

    /// Keywords that classify individual atoms of a residue
    #[inline]
    pub fn is_atom_property(self) -> bool {
        matches!(self, Keyword::Backbone | Keyword::Sidechain)
    }

    /// Residue categories that a chain can be tested against
    #[inline]
    pub fn is_chain_category(self) -> bool {
        matches!(
            self,
            Keyword::Hetero
                | Keyword::Water
                | Keyword::Ion
                | Keyword::Protein
                | Keyword::Nucleic
                | Keyword::Rna
                | Keyword::Dna
                | Keyword::Polymer
        )
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Residue number constraint: a single number or an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResNo {
    Single(i32),
    Range(i32, i32),
}

impl ResNo {
    /// Check whether `resno` satisfies the constraint (bounds inclusive)
    #[inline]
    pub fn contains(self, resno: i32) -> bool {
        match self {
            ResNo::Single(n) => n == resno,
            ResNo::Range(lo, hi) => lo <= resno && resno <= hi,
        }
    }
}

/// Logical operator of a compound node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

/// A single-field selection constraint
///
/// Well-formed parser output populates exactly one field per leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Leaf {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<Keyword>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chainname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atomname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resno: Option<ResNo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altloc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<usize>,
    /// Sorted, deduplicated global atom indices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atomindex: Option<Vec<usize>>,
}

impl Leaf {
    pub fn keyword(keyword: Keyword) -> Self {
        Leaf { keyword: Some(keyword), ..Default::default() }
    }

    pub fn all() -> Self {
        Self::keyword(Keyword::All)
    }

    pub fn resname(name: impl Into<String>) -> Self {
        Leaf { resname: Some(name.into()), ..Default::default() }
    }

    pub fn chainname(name: impl Into<String>) -> Self {
        Leaf { chainname: Some(name.into()), ..Default::default() }
    }

    pub fn atomname(name: impl Into<String>) -> Self {
        Leaf { atomname: Some(name.into()), ..Default::default() }
    }

    pub fn resno(resno: ResNo) -> Self {
        Leaf { resno: Some(resno), ..Default::default() }
    }

    pub fn element(element: impl Into<String>) -> Self {
        Leaf { element: Some(element.into()), ..Default::default() }
    }

    pub fn altloc(altloc: impl Into<String>) -> Self {
        Leaf { altloc: Some(altloc.into()), ..Default::default() }
    }

    pub fn model(index: usize) -> Self {
        Leaf { model: Some(index), ..Default::default() }
    }

    pub fn atomindex(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        Leaf { atomindex: Some(indices), ..Default::default() }
    }

    /// Whether this leaf is the universal-true marker
    #[inline]
    pub fn is_all(&self) -> bool {
        self.keyword == Some(Keyword::All)
    }
}

/// One entry of a node's rule list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    Node(SelectionNode),
    Leaf(Leaf),
}

impl Rule {
    pub fn as_node(&self) -> Option<&SelectionNode> {
        match self {
            Rule::Node(node) => Some(node),
            Rule::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Rule::Leaf(leaf) => Some(leaf),
            Rule::Node(_) => None,
        }
    }
}

impl From<Leaf> for Rule {
    fn from(leaf: Leaf) -> Self {
        Rule::Leaf(leaf)
    }
}

impl From<SelectionNode> for Rule {
    fn from(node: SelectionNode) -> Self {
        Rule::Node(node)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Compound node: an AND/OR (optionally negated) over an ordered rule list
///
/// A node without an operator behaves like OR during evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negate: bool,
    pub rules: Vec<Rule>,
}

impl SelectionNode {
    pub fn new(operator: Option<Operator>, rules: Vec<Rule>) -> Self {
        SelectionNode { operator, negate: false, rules }
    }

    pub fn and(rules: Vec<Rule>) -> Self {
        Self::new(Some(Operator::And), rules)
    }

    pub fn or(rules: Vec<Rule>) -> Self {
        Self::new(Some(Operator::Or), rules)
    }

    /// Same node with `negate` set
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    #[inline]
    pub fn is_and(&self) -> bool {
        self.operator == Some(Operator::And)
    }

    /// Every leaf in the subtree, depth-first
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        for rule in &self.rules {
            match rule {
                Rule::Leaf(leaf) => out.push(leaf),
                Rule::Node(node) => node.collect_leaves(out),
            }
        }
    }
}

/// Result of parsing a selection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTree {
    /// Empty string: every entity is selected
    All,
    /// Successfully parsed tree
    Node(SelectionNode),
    /// Terminal error state: no entity is selected
    Error(ParseError),
}

impl SelectionTree {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, SelectionTree::Error(_))
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            SelectionTree::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn node(&self) -> Option<&SelectionNode> {
        match self {
            SelectionTree::Node(node) => Some(node),
            _ => None,
        }
    }
}

impl From<Result<SelectionTree, ParseError>> for SelectionTree {
    fn from(result: Result<SelectionTree, ParseError>) -> Self {
        result.unwrap_or_else(SelectionTree::Error)
    }
}

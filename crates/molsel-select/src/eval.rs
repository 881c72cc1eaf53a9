//! Predicate compiler
//!
//! Turns a (possibly filtered) tree into a [`Predicate`]: a reusable test for
//! one entity type, driven by a host-supplied leaf test. Evaluation is
//! tri-valued so one tree can serve all four granularities:
//!
//! - a rule whose outcome is [`Outcome::Inapplicable`] never short-circuits;
//! - under `and` the first unsatisfied rule fails the node, under `or` the
//!   first satisfied rule passes it;
//! - when nothing short-circuits the node is inapplicable if any rule was,
//!   otherwise `and` passes (vacuous truth) and `or` fails;
//! - `negate` swaps the pass and fail values but leaves inapplicable alone.

use std::fmt;
use std::sync::Arc;

use crate::ast::{Leaf, Rule, SelectionNode, SelectionTree};

/// Result of testing one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Satisfied,
    Unsatisfied,
    /// The constraint has no meaning at this granularity
    Inapplicable,
}

impl Outcome {
    /// Whether a traversal keeps the entity
    ///
    /// Only [`Outcome::Unsatisfied`] prunes.
    #[inline]
    pub fn admits(self) -> bool {
        self != Outcome::Unsatisfied
    }

    #[inline]
    pub fn is_satisfied(self) -> bool {
        self == Outcome::Satisfied
    }

    /// Swap satisfied and unsatisfied
    #[inline]
    pub fn negate(self) -> Self {
        match self {
            Outcome::Satisfied => Outcome::Unsatisfied,
            Outcome::Unsatisfied => Outcome::Satisfied,
            Outcome::Inapplicable => Outcome::Inapplicable,
        }
    }
}

impl From<bool> for Outcome {
    #[inline]
    fn from(b: bool) -> Self {
        if b {
            Outcome::Satisfied
        } else {
            Outcome::Unsatisfied
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Satisfied => f.write_str("true"),
            Outcome::Unsatisfied => f.write_str("false"),
            Outcome::Inapplicable => f.write_str("-1"),
        }
    }
}

/// Host-supplied test of one leaf against one entity
pub type LeafTest<E> = Arc<dyn Fn(&E, &Leaf) -> Outcome + Send + Sync>;

// ============================================================================
// Compiled Tree
// ============================================================================

#[derive(Debug, Clone)]
enum CompiledRule {
    /// `{ keyword: ALL }`, satisfied without consulting the host
    All,
    Leaf(Leaf),
    Node(CompiledNode),
    /// Compound rule without children
    Empty,
}

#[derive(Debug, Clone)]
struct CompiledNode {
    and: bool,
    negate: bool,
    rules: Box<[CompiledRule]>,
}

impl CompiledNode {
    fn compile(node: &SelectionNode) -> Self {
        let rules = node
            .rules
            .iter()
            .map(|rule| match rule {
                Rule::Leaf(leaf) if leaf.is_all() => CompiledRule::All,
                Rule::Leaf(leaf) => CompiledRule::Leaf(leaf.clone()),
                Rule::Node(child) if child.rules.is_empty() => CompiledRule::Empty,
                Rule::Node(child) => CompiledRule::Node(CompiledNode::compile(child)),
            })
            .collect();

        CompiledNode { and: node.is_and(), negate: node.negate, rules }
    }

    fn evaluate<E, F>(&self, entity: &E, test: &F) -> Outcome
    where
        E: ?Sized,
        F: Fn(&E, &Leaf) -> Outcome + ?Sized,
    {
        let (pass, fail) = if self.negate {
            (Outcome::Unsatisfied, Outcome::Satisfied)
        } else {
            (Outcome::Satisfied, Outcome::Unsatisfied)
        };

        let mut inapplicable = false;
        for rule in self.rules.iter() {
            let ret = match rule {
                CompiledRule::All => Outcome::Satisfied,
                CompiledRule::Leaf(leaf) => test(entity, leaf),
                CompiledRule::Node(node) => node.evaluate(entity, test),
                CompiledRule::Empty => Outcome::Inapplicable,
            };
            match ret {
                Outcome::Inapplicable => inapplicable = true,
                Outcome::Satisfied if !self.and => return pass,
                Outcome::Unsatisfied if self.and => return fail,
                _ => {}
            }
        }

        if inapplicable {
            Outcome::Inapplicable
        } else if self.and {
            pass
        } else {
            fail
        }
    }
}

// ============================================================================
// Predicate
// ============================================================================

#[derive(Debug, Clone)]
enum PredicateKind {
    /// Tree in error state: nothing passes
    Never,
    /// No constraint left: everything passes
    Unconstrained,
    Compiled(Arc<CompiledNode>),
}

/// A compiled selection test for entities of type `E`
///
/// Cheap to clone and safe to share between threads.
pub struct Predicate<E: ?Sized> {
    kind: PredicateKind,
    test: Option<LeafTest<E>>,
}

impl<E: ?Sized> Predicate<E> {
    /// Predicate that rejects every entity
    pub fn never() -> Self {
        Predicate { kind: PredicateKind::Never, test: None }
    }

    /// Predicate that accepts every entity
    pub fn unconstrained() -> Self {
        Predicate { kind: PredicateKind::Unconstrained, test: None }
    }

    /// Compile `node` against a leaf test
    ///
    /// `None` (everything filtered away) and nodes without rules compile to
    /// [`Predicate::unconstrained`].
    pub fn compile(node: Option<&SelectionNode>, test: LeafTest<E>) -> Self {
        match node {
            Some(node) if !node.rules.is_empty() => Predicate {
                kind: PredicateKind::Compiled(Arc::new(CompiledNode::compile(node))),
                test: Some(test),
            },
            _ => Self::unconstrained(),
        }
    }

    /// Compile the full tree
    pub fn from_tree(tree: &SelectionTree, test: LeafTest<E>) -> Self {
        match tree {
            SelectionTree::Error(_) => Self::never(),
            SelectionTree::All => Self::unconstrained(),
            SelectionTree::Node(node) => Self::compile(Some(node), test),
        }
    }

    /// Evaluate one entity
    pub fn evaluate(&self, entity: &E) -> Outcome {
        match (&self.kind, &self.test) {
            (PredicateKind::Compiled(node), Some(test)) => node.evaluate(entity, test.as_ref()),
            (PredicateKind::Never, _) => Outcome::Unsatisfied,
            _ => Outcome::Satisfied,
        }
    }

    /// Shorthand for `evaluate(entity).admits()`
    #[inline]
    pub fn admits(&self, entity: &E) -> bool {
        self.evaluate(entity).admits()
    }

    /// Whether every entity passes without evaluation
    pub fn is_unconstrained(&self) -> bool {
        matches!(self.kind, PredicateKind::Unconstrained)
    }

    /// Whether no entity can pass
    pub fn is_never(&self) -> bool {
        matches!(self.kind, PredicateKind::Never)
    }
}

impl<E: ?Sized> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Predicate { kind: self.kind.clone(), test: self.test.clone() }
    }
}

impl<E: ?Sized> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("kind", &self.kind).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Keyword, ResNo};
    use crate::error::ParseError;

    /// Toy entity: a residue number, with chainname tests inapplicable
    fn resno_test() -> LeafTest<i32> {
        Arc::new(|resno: &i32, leaf: &Leaf| -> Outcome {
            match leaf.resno {
                Some(spec) => spec.contains(*resno).into(),
                None => Outcome::Inapplicable,
            }
        })
    }

    fn resno(lo: i32, hi: i32) -> Rule {
        Leaf::resno(ResNo::Range(lo, hi)).into()
    }

    fn chain() -> Rule {
        Leaf::chainname("A").into()
    }

    fn eval(node: SelectionNode, entity: i32) -> Outcome {
        Predicate::compile(Some(&node), resno_test()).evaluate(&entity)
    }

    #[test]
    fn test_outcome_helpers() {
        assert!(Outcome::Satisfied.admits());
        assert!(Outcome::Inapplicable.admits());
        assert!(!Outcome::Unsatisfied.admits());
        assert_eq!(Outcome::Inapplicable.negate(), Outcome::Inapplicable);
        assert_eq!(Outcome::from(false), Outcome::Unsatisfied);
        assert_eq!(Outcome::Inapplicable.to_string(), "-1");
    }

    #[test]
    fn test_and_short_circuits_on_failure() {
        let node = SelectionNode::and(vec![resno(1, 5), resno(3, 9)]);
        assert_eq!(eval(node.clone(), 4), Outcome::Satisfied);
        assert_eq!(eval(node, 2), Outcome::Unsatisfied);
    }

    #[test]
    fn test_or_short_circuits_on_success() {
        let node = SelectionNode::or(vec![resno(1, 2), resno(8, 9)]);
        assert_eq!(eval(node.clone(), 9), Outcome::Satisfied);
        assert_eq!(eval(node, 5), Outcome::Unsatisfied);
    }

    #[test]
    fn test_missing_operator_behaves_like_or() {
        let node = SelectionNode::new(None, vec![resno(1, 2), resno(8, 9)]);
        assert_eq!(eval(node.clone(), 1), Outcome::Satisfied);
        assert_eq!(eval(node, 5), Outcome::Unsatisfied);
    }

    #[test]
    fn test_inapplicable_does_not_short_circuit() {
        // decisive rule after an inapplicable one still decides
        let node = SelectionNode::and(vec![chain(), resno(1, 5)]);
        assert_eq!(eval(node.clone(), 9), Outcome::Unsatisfied);

        let node = SelectionNode::or(vec![chain(), resno(1, 5)]);
        assert_eq!(eval(node, 3), Outcome::Satisfied);
    }

    #[test]
    fn test_inapplicable_poisons_undecided_default() {
        let node = SelectionNode::and(vec![chain(), resno(1, 5)]);
        assert_eq!(eval(node, 3), Outcome::Inapplicable);

        let node = SelectionNode::or(vec![chain(), resno(1, 5)]);
        assert_eq!(eval(node, 9), Outcome::Inapplicable);
    }

    #[test]
    fn test_all_inapplicable() {
        assert_eq!(eval(SelectionNode::and(vec![chain()]), 1), Outcome::Inapplicable);
    }

    #[test]
    fn test_negation_swaps_decisive_values_only() {
        let node = SelectionNode::and(vec![resno(1, 5)]).negated();
        assert_eq!(eval(node.clone(), 3), Outcome::Unsatisfied);
        assert_eq!(eval(node, 7), Outcome::Satisfied);

        let node = SelectionNode::and(vec![chain()]).negated();
        assert_eq!(eval(node, 3), Outcome::Inapplicable);
    }

    #[test]
    fn test_all_leaf_skips_host_test() {
        let panicking: LeafTest<i32> = Arc::new(|_: &i32, _: &Leaf| -> Outcome { panic!("host test called") });
        let node = SelectionNode::or(vec![Leaf::all().into(), resno(1, 2)]);
        let pred = Predicate::compile(Some(&node), panicking);
        assert_eq!(pred.evaluate(&42), Outcome::Satisfied);
    }

    #[test]
    fn test_all_leaf_under_and_continues() {
        let node = SelectionNode::and(vec![Leaf::all().into(), resno(1, 2)]);
        assert_eq!(eval(node.clone(), 1), Outcome::Satisfied);
        assert_eq!(eval(node, 3), Outcome::Unsatisfied);
    }

    #[test]
    fn test_empty_child_is_inapplicable() {
        let node = SelectionNode::and(vec![SelectionNode::default().into(), resno(1, 2)]);
        assert_eq!(eval(node, 1), Outcome::Inapplicable);
    }

    #[test]
    fn test_nested_nodes() {
        // 1-2 or (5-9 and not 7)
        let node = SelectionNode::or(vec![
            resno(1, 2),
            SelectionNode::and(vec![
                resno(5, 9),
                SelectionNode::new(None, vec![resno(7, 7)]).negated().into(),
            ])
            .into(),
        ]);
        let pred = Predicate::compile(Some(&node), resno_test());
        let picked: Vec<i32> = (0..12).filter(|n| pred.evaluate(n).is_satisfied()).collect();
        assert_eq!(picked, vec![1, 2, 5, 6, 8, 9]);
    }

    #[test]
    fn test_tree_states() {
        let error = SelectionTree::Error(ParseError::NoRules);
        let pred = Predicate::from_tree(&error, resno_test());
        assert!(pred.is_never());
        assert_eq!(pred.evaluate(&1), Outcome::Unsatisfied);

        let pred = Predicate::from_tree(&SelectionTree::All, resno_test());
        assert!(pred.is_unconstrained());
        assert_eq!(pred.evaluate(&1), Outcome::Satisfied);

        let pred = Predicate::compile(None, resno_test());
        assert!(pred.is_unconstrained());
    }

    #[test]
    fn test_keyword_leaf_reaches_host() {
        let test: LeafTest<str> = Arc::new(|name: &str, leaf: &Leaf| -> Outcome {
            (leaf.keyword == Some(Keyword::Water) && name == "HOH").into()
        });
        let node = SelectionNode::new(None, vec![Leaf::keyword(Keyword::Water).into()]);
        let pred = Predicate::compile(Some(&node), test);
        assert!(pred.admits("HOH"));
        assert!(!pred.admits("ALA"));
    }
}

//! Selection facade
//!
//! [`Selection`] owns the source strings and the parsed tree, and hands out
//! the eight compiled predicates (four granularities, each with the full tree
//! and with the granularity-filtered "only" tree). Predicates are built
//! lazily on first request and dropped whenever the source changes.
//!
//! The facade is not internally synchronized: mutate it from one owner and
//! share the predicates (which are `Clone + Send + Sync`) with readers.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::ast::{Leaf, SelectionTree};
use crate::error::ParseError;
use crate::eval::{LeafTest, Predicate};
use crate::filter::{filter, Granularity};
use crate::host::{EntityTests, MoleculeTests};
use crate::options::SelectionOptions;
use crate::parser;

/// Callback receiving the new primary string after a change
pub type Observer = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by [`Selection::connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Combine primary and extra strings into the string that gets parsed
///
/// Both non-empty: `( primary ) and ( extra )`; otherwise whichever is set.
pub fn combine(string: &str, extra: &str) -> String {
    match (string.is_empty(), extra.is_empty()) {
        (true, true) => String::new(),
        (true, false) => extra.to_owned(),
        (false, true) => string.to_owned(),
        (false, false) => format!("( {string} ) and ( {extra} )"),
    }
}

/// Parse into a tree, keeping failures as the terminal error state
fn parse_tree(combined: &str) -> SelectionTree {
    match parser::parse_selection(combined) {
        Ok(tree) => tree,
        Err(e) => {
            log::debug!("Failed to parse selection '{}': {}", combined, e);
            SelectionTree::Error(e)
        }
    }
}

// =============================================================================
// Predicate Cache
// =============================================================================

struct PredicateCache<H: EntityTests> {
    atom: OnceLock<Predicate<H::Atom>>,
    atom_only: OnceLock<Predicate<H::Atom>>,
    residue: OnceLock<Predicate<H::Residue>>,
    residue_only: OnceLock<Predicate<H::Residue>>,
    chain: OnceLock<Predicate<H::Chain>>,
    chain_only: OnceLock<Predicate<H::Chain>>,
    model: OnceLock<Predicate<H::Model>>,
    model_only: OnceLock<Predicate<H::Model>>,
}

impl<H: EntityTests> Default for PredicateCache<H> {
    fn default() -> Self {
        PredicateCache {
            atom: OnceLock::new(),
            atom_only: OnceLock::new(),
            residue: OnceLock::new(),
            residue_only: OnceLock::new(),
            chain: OnceLock::new(),
            chain_only: OnceLock::new(),
            model: OnceLock::new(),
            model_only: OnceLock::new(),
        }
    }
}

impl<H: EntityTests> PredicateCache<H> {
    fn built(&self) -> usize {
        [
            self.atom.get().is_some(),
            self.atom_only.get().is_some(),
            self.residue.get().is_some(),
            self.residue_only.get().is_some(),
            self.chain.get().is_some(),
            self.chain_only.get().is_some(),
            self.model.get().is_some(),
            self.model_only.get().is_some(),
        ]
        .into_iter()
        .filter(|&b| b)
        .count()
    }
}

// =============================================================================
// Selection
// =============================================================================

/// A compiled selection over a host data model
pub struct Selection<H: EntityTests = MoleculeTests> {
    host: Arc<H>,
    options: SelectionOptions,
    string: String,
    extra_string: String,
    combined: String,
    tree: SelectionTree,
    cache: PredicateCache<H>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl Selection<MoleculeTests> {
    /// Selection over the `molsel-mol` record traits
    pub fn new(string: &str) -> Self {
        Self::with_host(MoleculeTests, string, "", SelectionOptions::default())
    }

    /// Selection over the `molsel-mol` record traits with options
    pub fn with_options(string: &str, options: SelectionOptions) -> Self {
        Self::with_host(MoleculeTests, string, "", options)
    }
}

impl Default for Selection<MoleculeTests> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<H: EntityTests> Selection<H> {
    /// Selection over a custom host
    pub fn with_host(host: H, string: &str, extra: &str, options: SelectionOptions) -> Self {
        let combined = combine(string, extra);
        let tree = parse_tree(&combined);
        Selection {
            host: Arc::new(host),
            options,
            string: string.to_owned(),
            extra_string: extra.to_owned(),
            combined,
            tree,
            cache: PredicateCache::default(),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Source strings
    // -------------------------------------------------------------------------

    /// Replace the primary string
    ///
    /// Returns `true` if the selection was re-parsed.
    pub fn set_string(&mut self, string: &str) -> bool {
        let extra = self.extra_string.clone();
        self.update(string.to_owned(), extra, true)
    }

    /// Replace the extra string
    pub fn set_extra_string(&mut self, extra: &str) -> bool {
        let string = self.string.clone();
        self.update(string, extra.to_owned(), true)
    }

    /// Replace both strings
    pub fn set_strings(&mut self, string: &str, extra: &str) -> bool {
        self.update(string.to_owned(), extra.to_owned(), true)
    }

    /// Replace both strings without notifying observers
    pub fn set_strings_silent(&mut self, string: &str, extra: &str) -> bool {
        self.update(string.to_owned(), extra.to_owned(), false)
    }

    fn update(&mut self, string: String, extra: String, notify: bool) -> bool {
        if string == self.string && extra == self.extra_string {
            return false;
        }

        let combined = combine(&string, &extra);
        self.string = string;
        self.extra_string = extra;
        if combined == self.combined {
            return false;
        }

        self.tree = parse_tree(&combined);
        self.combined = combined;
        self.cache = PredicateCache::default();

        if notify {
            self.notify();
        }
        true
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn extra_string(&self) -> &str {
        &self.extra_string
    }

    /// The string actually parsed
    pub fn combined_string(&self) -> &str {
        &self.combined
    }

    pub fn tree(&self) -> &SelectionTree {
        &self.tree
    }

    /// Whether the current string parsed successfully
    pub fn is_valid(&self) -> bool {
        !self.tree.is_error()
    }

    pub fn error(&self) -> Option<&ParseError> {
        self.tree.error()
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Replace the options; cached predicates are rebuilt on next request
    pub fn set_options(&mut self, options: SelectionOptions) {
        if options != self.options {
            self.options = options;
            self.cache = PredicateCache::default();
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Register a callback invoked with the new primary string after every
    /// re-parse (silent updates excepted)
    pub fn connect<F>(&mut self, observer: F) -> ObserverId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Arc::new(observer)));
        id
    }

    /// Remove a callback; returns `false` if it was not registered
    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer(&self.string);
        }
    }

    // -------------------------------------------------------------------------
    // Predicates
    // -------------------------------------------------------------------------

    fn build<E: ?Sized>(&self, granularity: Granularity, only: bool, test: LeafTest<E>) -> Predicate<E> {
        log::trace!(
            "Compiling {}{} predicate for '{}'",
            granularity,
            if only { "-only" } else { "" },
            self.combined
        );
        match (&self.tree, only) {
            (SelectionTree::Node(node), true) => {
                let filtered = filter(node, granularity, self.options.filter_mode);
                Predicate::compile(filtered.as_deref(), test)
            }
            (tree, _) => Predicate::from_tree(tree, test),
        }
    }

    fn atom_leaf_test(&self) -> LeafTest<H::Atom> {
        let host = Arc::clone(&self.host);
        Arc::new(move |atom: &H::Atom, leaf: &Leaf| host.test_atom(atom, leaf))
    }

    fn residue_leaf_test(&self) -> LeafTest<H::Residue> {
        let host = Arc::clone(&self.host);
        Arc::new(move |residue: &H::Residue, leaf: &Leaf| host.test_residue(residue, leaf))
    }

    fn chain_leaf_test(&self) -> LeafTest<H::Chain> {
        let host = Arc::clone(&self.host);
        Arc::new(move |chain: &H::Chain, leaf: &Leaf| host.test_chain(chain, leaf))
    }

    fn model_leaf_test(&self) -> LeafTest<H::Model> {
        let host = Arc::clone(&self.host);
        Arc::new(move |model: &H::Model, leaf: &Leaf| host.test_model(model, leaf))
    }

    /// Atom predicate over the full tree
    pub fn atom_test(&self) -> &Predicate<H::Atom> {
        self.cache
            .atom
            .get_or_init(|| self.build(Granularity::Atom, false, self.atom_leaf_test()))
    }

    /// Atom predicate over the atom-filtered tree
    pub fn atom_only_test(&self) -> &Predicate<H::Atom> {
        self.cache
            .atom_only
            .get_or_init(|| self.build(Granularity::Atom, true, self.atom_leaf_test()))
    }

    /// Residue predicate over the full tree
    pub fn residue_test(&self) -> &Predicate<H::Residue> {
        self.cache
            .residue
            .get_or_init(|| self.build(Granularity::Residue, false, self.residue_leaf_test()))
    }

    /// Residue predicate over the residue-filtered tree
    pub fn residue_only_test(&self) -> &Predicate<H::Residue> {
        self.cache
            .residue_only
            .get_or_init(|| self.build(Granularity::Residue, true, self.residue_leaf_test()))
    }

    /// Chain predicate over the full tree
    pub fn chain_test(&self) -> &Predicate<H::Chain> {
        self.cache
            .chain
            .get_or_init(|| self.build(Granularity::Chain, false, self.chain_leaf_test()))
    }

    /// Chain predicate over the chain-filtered tree
    pub fn chain_only_test(&self) -> &Predicate<H::Chain> {
        self.cache
            .chain_only
            .get_or_init(|| self.build(Granularity::Chain, true, self.chain_leaf_test()))
    }

    /// Model predicate over the full tree
    pub fn model_test(&self) -> &Predicate<H::Model> {
        self.cache
            .model
            .get_or_init(|| self.build(Granularity::Model, false, self.model_leaf_test()))
    }

    /// Model predicate over the model-filtered tree
    pub fn model_only_test(&self) -> &Predicate<H::Model> {
        self.cache
            .model_only
            .get_or_init(|| self.build(Granularity::Model, true, self.model_leaf_test()))
    }

    /// Number of predicates currently built
    pub fn cached_predicates(&self) -> usize {
        self.cache.built()
    }
}

impl<H: EntityTests> fmt::Debug for Selection<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("string", &self.string)
            .field("extra_string", &self.extra_string)
            .field("tree", &self.tree)
            .field("options", &self.options)
            .field("observers", &self.observers.len())
            .finish()
    }
}

//! Selection options
//!
//! Configuration shared by every predicate a [`Selection`](crate::Selection)
//! builds. Deserializable so hosts can load it with the rest of their settings;
//! missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::filter::FilterMode;

/// Options controlling how a selection compiles its predicates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionOptions {
    /// How the "only" predicates filter the tree
    pub filter_mode: FilterMode,
}

impl SelectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for [`filter_mode`](Self::filter_mode)
    pub fn with_filter_mode(mut self, filter_mode: FilterMode) -> Self {
        self.filter_mode = filter_mode;
        self
    }
}

//! Selection masks
//!
//! [`SelectionMask`] records which atoms of a flat atom list a selection
//! picked, one bit per atom.

use bitvec::prelude::*;
use molsel_mol::AtomRecord;

use crate::host::MoleculeTests;
use crate::selection::Selection;

/// Which atoms of an atom list are selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionMask {
    /// Bit i is set if atom i is selected
    bits: BitVec<u64, Lsb0>,
}

impl SelectionMask {
    /// Mask over `atom_count` atoms with nothing selected
    pub fn new(atom_count: usize) -> Self {
        SelectionMask {
            bits: bitvec![u64, Lsb0; 0; atom_count],
        }
    }

    /// Mask over `atom_count` atoms with everything selected
    pub fn all(atom_count: usize) -> Self {
        SelectionMask {
            bits: bitvec![u64, Lsb0; 1; atom_count],
        }
    }

    pub fn from_indices(atom_count: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut mask = Self::new(atom_count);
        for idx in indices {
            mask.set(idx);
        }
        mask
    }

    /// Number of atoms the mask covers
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Number of selected atoms
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    #[inline]
    pub fn contains(&self, idx: usize) -> bool {
        self.bits.get(idx).map(|b| *b).unwrap_or(false)
    }

    /// Select atom `idx`; out-of-range indices are ignored
    #[inline]
    pub fn set(&mut self, idx: usize) {
        if let Some(mut bit) = self.bits.get_mut(idx) {
            *bit = true;
        }
    }

    #[inline]
    pub fn unset(&mut self, idx: usize) {
        if let Some(mut bit) = self.bits.get_mut(idx) {
            *bit = false;
        }
    }

    /// Iterate over indices of selected atoms
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    // =========================================================================
    // Set Operations
    // =========================================================================

    /// Atoms selected in either mask
    ///
    /// # Panics
    ///
    /// Panics if the masks cover different atom counts.
    pub fn union(&self, other: &Self) -> Self {
        assert_eq!(self.bits.len(), other.bits.len(), "Mask sizes must match");
        let mut result = self.clone();
        result.bits |= &other.bits;
        result
    }

    /// Atoms selected in both masks
    ///
    /// # Panics
    ///
    /// Panics if the masks cover different atom counts.
    pub fn intersection(&self, other: &Self) -> Self {
        assert_eq!(self.bits.len(), other.bits.len(), "Mask sizes must match");
        let mut result = self.clone();
        result.bits &= &other.bits;
        result
    }

    /// Atoms selected in `self` but not in `other`
    ///
    /// # Panics
    ///
    /// Panics if the masks cover different atom counts.
    pub fn difference(&self, other: &Self) -> Self {
        assert_eq!(self.bits.len(), other.bits.len(), "Mask sizes must match");
        let mut result = self.clone();
        for i in other.bits.iter_ones() {
            result.bits.set(i, false);
        }
        result
    }

    /// Atoms not in this mask
    pub fn complement(&self) -> Self {
        let mut result = self.clone();
        result.bits = !result.bits;
        result
    }
}

impl Default for SelectionMask {
    fn default() -> Self {
        Self::new(0)
    }
}

impl std::fmt::Display for SelectionMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SelectionMask({} of {} atoms)", self.count(), self.len())
    }
}

// =============================================================================
// Applying a selection
// =============================================================================

impl Selection<MoleculeTests> {
    /// Select atoms from a flat list
    ///
    /// Each atom is walked down the hierarchy the way a structure traversal
    /// would: the model, chain and residue "only" predicates must admit it
    /// before the full atom predicate decides.
    ///
    /// With the default [`FilterMode::Preserve`](crate::FilterMode::Preserve)
    /// this agrees with the atom predicate alone. With
    /// [`FilterMode::Prune`](crate::FilterMode::Prune) it can select fewer
    /// atoms: under negation a pruned residue tree loses the atom-level rules
    /// that would have let atoms through. `not ( ALA and .CA )` keeps ALA side
    /// chains under `Preserve`, but its pruned residue tree is `not ALA`, so
    /// `Prune` drops whole ALA residues.
    pub fn select_atoms<A: AtomRecord + 'static>(&self, atoms: &[A]) -> SelectionMask {
        let model = self.model_only_test();
        let chain = self.chain_only_test();
        let residue = self.residue_only_test();
        let atom = self.atom_test();

        SelectionMask::from_indices(
            atoms.len(),
            atoms.iter().enumerate().filter_map(|(i, a)| {
                let admitted = model.admits(a)
                    && chain.admits(a)
                    && residue.admits(a)
                    && atom.admits(a);
                admitted.then_some(i)
            }),
        )
    }
}

//! Record traits
//!
//! Read-only views of the four levels of a molecular hierarchy. The traits
//! form a chain of supertraits (atom → residue → chain → model), so an atom
//! view also answers every question about its owning residue, chain and model.
//! Hosts implement them over whatever storage they use (structure-of-arrays,
//! proxies, plain structs).

use std::ops::Range;

use crate::residue::{classify_residue, ResidueClass};
use crate::secondary::SecondaryStructure;

/// A model (one entry of an ensemble or trajectory)
pub trait ModelRecord {
    /// Zero-based index of the model
    fn model_index(&self) -> usize;

    /// Global indices of the atoms in this model, if the host numbers atoms
    fn model_atoms(&self) -> Option<Range<usize>> {
        None
    }
}

/// A chain within a model
pub trait ChainRecord: ModelRecord {
    /// Chain identifier; empty when the chain carries no assigned name
    /// (e.g. identifiers generated on load)
    fn chain_name(&self) -> &str;

    /// Global indices of the atoms in this chain, if the host numbers atoms
    fn chain_atoms(&self) -> Option<Range<usize>> {
        None
    }
}

/// A residue within a chain
pub trait ResidueRecord: ChainRecord {
    /// Residue name, uppercase (`ALA`, `HOH`, ...)
    fn residue_name(&self) -> &str;

    /// Residue sequence number
    fn residue_number(&self) -> i32;

    /// Residue category
    ///
    /// Defaults to a lookup of the residue name.
    fn residue_class(&self) -> ResidueClass {
        classify_residue(self.residue_name())
    }

    /// Whether the residue comes from HETATM records
    fn is_hetero(&self) -> bool {
        false
    }

    /// Secondary structure of the residue
    fn secondary_structure(&self) -> SecondaryStructure {
        SecondaryStructure::Loop
    }

    /// Global indices of the atoms in this residue, if the host numbers atoms
    fn residue_atoms(&self) -> Option<Range<usize>> {
        None
    }
}

/// An atom within a residue
pub trait AtomRecord: ResidueRecord {
    /// Atom name, uppercase (`CA`, `OP1`, ...)
    fn atom_name(&self) -> &str;

    /// Element symbol, uppercase (`C`, `FE`, ...)
    fn element(&self) -> &str;

    /// Alternate location indicator; empty when the atom has none
    fn altloc(&self) -> &str {
        ""
    }

    /// Global index of the atom, if the host numbers atoms
    fn atom_index(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Water;

    impl ModelRecord for Water {
        fn model_index(&self) -> usize {
            0
        }
    }

    impl ChainRecord for Water {
        fn chain_name(&self) -> &str {
            ""
        }
    }

    impl ResidueRecord for Water {
        fn residue_name(&self) -> &str {
            "HOH"
        }

        fn residue_number(&self) -> i32 {
            501
        }
    }

    impl AtomRecord for Water {
        fn atom_name(&self) -> &str {
            "O"
        }

        fn element(&self) -> &str {
            "O"
        }
    }

    #[test]
    fn test_default_methods() {
        let w = Water;
        assert_eq!(w.residue_class(), ResidueClass::Water);
        assert!(!w.is_hetero());
        assert_eq!(w.secondary_structure(), SecondaryStructure::Loop);
        assert_eq!(w.altloc(), "");
        assert_eq!(w.atom_index(), None);
        assert_eq!(w.residue_atoms(), None);
        assert_eq!(w.model_atoms(), None);
    }

    #[test]
    fn test_object_safe() {
        let w = Water;
        let atom: &dyn AtomRecord = &w;
        assert_eq!(atom.atom_name(), "O");
        assert_eq!(atom.model_index(), 0);
    }
}

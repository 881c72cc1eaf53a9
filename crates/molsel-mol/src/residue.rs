//! Residue classification
//!
//! Name-based classification of residues into the categories the selection
//! keywords test against (`protein`, `nucleic`, `rna`, `dna`, `water`, ...),
//! plus the per-class backbone atom-name tables used by `backbone` and
//! `sidechain`.

use phf::{phf_map, phf_set};
use serde::{Deserialize, Serialize};

/// Residue category
///
/// Hosts that know more than the residue name (e.g. coarse-grained models
/// detected from bead names) report their own class through
/// [`ResidueRecord::residue_class`](crate::ResidueRecord::residue_class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidueClass {
    /// Amino acid
    Protein,
    /// Coarse-grained bead residue (one or two beads per residue)
    CoarseGrained,
    /// Ribonucleotide
    Rna,
    /// Deoxyribonucleotide
    Dna,
    /// Solvent water
    Water,
    /// Monatomic ion
    Ion,
    /// Ligands and everything else
    #[default]
    Other,
}

impl ResidueClass {
    /// Protein or coarse-grained
    #[inline]
    pub fn is_protein(self) -> bool {
        matches!(self, ResidueClass::Protein | ResidueClass::CoarseGrained)
    }

    /// RNA or DNA
    #[inline]
    pub fn is_nucleic(self) -> bool {
        matches!(self, ResidueClass::Rna | ResidueClass::Dna)
    }

    #[inline]
    pub fn is_rna(self) -> bool {
        self == ResidueClass::Rna
    }

    #[inline]
    pub fn is_dna(self) -> bool {
        self == ResidueClass::Dna
    }

    #[inline]
    pub fn is_coarse_grained(self) -> bool {
        self == ResidueClass::CoarseGrained
    }

    /// Protein, nucleic or coarse-grained
    #[inline]
    pub fn is_polymer(self) -> bool {
        self.is_protein() || self.is_nucleic()
    }

    #[inline]
    pub fn is_water(self) -> bool {
        self == ResidueClass::Water
    }

    /// Monatomic ion
    #[inline]
    pub fn is_ion(self) -> bool {
        self == ResidueClass::Ion
    }

    /// Check whether `atom_name` belongs to the backbone of a residue of this class
    ///
    /// Classes without a backbone (water, ions, ligands) never match.
    pub fn is_backbone_atom(self, atom_name: &str) -> bool {
        match self {
            ResidueClass::Protein => PROTEIN_BACKBONE.contains(atom_name),
            ResidueClass::Rna | ResidueClass::Dna => NUCLEIC_BACKBONE.contains(atom_name),
            ResidueClass::CoarseGrained => COARSE_GRAINED_BACKBONE.contains(atom_name),
            _ => false,
        }
    }

    /// Check whether `atom_name` belongs to the sidechain of a residue of this class
    ///
    /// The complement of [`is_backbone_atom`](Self::is_backbone_atom) within
    /// polymer classes; non-polymer residues have no sidechain.
    pub fn is_sidechain_atom(self, atom_name: &str) -> bool {
        self.is_polymer() && !self.is_backbone_atom(atom_name)
    }
}

// ============================================================================
// Residue Name Tables
// ============================================================================

/// Amino acids: canonical names plus common protonation and modified variants.
static AMINO_ACIDS: phf::Set<&str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    // Histidine protonation states
    "HID", "HIE", "HIP", "HSP", "HSD", "HSE",
    // Cysteine / selenium variants
    "CYX", "MSE", "SEC", "PYL",
    // Charged variants
    "ARGP", "ASPM", "GLUM", "LYSP",
};

/// Nucleotides mapped to their polymer class.
static NUCLEOTIDES: phf::Map<&str, ResidueClass> = phf_map! {
    // DNA
    "DA" => ResidueClass::Dna, "DC" => ResidueClass::Dna, "DG" => ResidueClass::Dna,
    "DT" => ResidueClass::Dna, "DI" => ResidueClass::Dna, "DN" => ResidueClass::Dna,
    "THY" => ResidueClass::Dna,
    "5CM" => ResidueClass::Dna, "8OG" => ResidueClass::Dna,
    // RNA
    "A" => ResidueClass::Rna, "C" => ResidueClass::Rna, "G" => ResidueClass::Rna,
    "U" => ResidueClass::Rna, "I" => ResidueClass::Rna, "N" => ResidueClass::Rna,
    "ADE" => ResidueClass::Rna, "CYT" => ResidueClass::Rna, "GUA" => ResidueClass::Rna,
    "URA" => ResidueClass::Rna,
    "PSU" => ResidueClass::Rna, "5MC" => ResidueClass::Rna, "OMC" => ResidueClass::Rna,
    "OMG" => ResidueClass::Rna, "M2G" => ResidueClass::Rna, "5MU" => ResidueClass::Rna,
    "7MG" => ResidueClass::Rna, "2MG" => ResidueClass::Rna, "H2U" => ResidueClass::Rna,
    "YYG" => ResidueClass::Rna, "1MA" => ResidueClass::Rna, "4SU" => ResidueClass::Rna,
};

/// Common water residue names.
static WATER_NAMES: phf::Set<&str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "TIP", "TIP3", "SPC", "SOL",
};

/// Common ion residue names.
static ION_NAMES: phf::Set<&str> = phf_set! {
    "NA", "NA+", "K", "K+", "CA2", "MG", "MG2",
    "ZN", "ZN2", "FE", "FE2", "CU", "CU2",
    "MN", "MN2", "NI", "CO", "CD",
    "CL", "CL-", "BR", "I-",
    "SOD", "POT", "CLA", "CAL",
};

// ============================================================================
// Backbone Atom Names
// ============================================================================

static PROTEIN_BACKBONE: phf::Set<&str> = phf_set! {
    "CA", "C", "N", "O", "O1", "O2", "OC1", "OC2", "H", "H1", "H2", "H3", "HA",
};

static NUCLEIC_BACKBONE: phf::Set<&str> = phf_set! {
    "P", "O3'", "O5'", "C5'", "C4'", "C3'", "OP1", "OP2",
    "O3*", "O5*", "C5*", "C4*", "C3*",
};

static COARSE_GRAINED_BACKBONE: phf::Set<&str> = phf_set! {
    "CA", "BB",
};

// ============================================================================
// Classification Functions
// ============================================================================

/// Check if a residue name is an amino acid (canonical + variants).
pub fn is_amino_acid(resn: &str) -> bool {
    AMINO_ACIDS.contains(resn)
}

/// Check if a residue name is a nucleotide (standard + modified).
pub fn is_nucleotide(resn: &str) -> bool {
    NUCLEOTIDES.contains_key(resn)
}

/// Check if a residue name is water.
pub fn is_water(resn: &str) -> bool {
    WATER_NAMES.contains(resn)
}

/// Check if a residue name is a known ion.
pub fn is_ion(resn: &str) -> bool {
    ION_NAMES.contains(resn)
}

/// Classify a residue by its (uppercase) name
pub fn classify_residue(resn: &str) -> ResidueClass {
    if is_amino_acid(resn) {
        ResidueClass::Protein
    } else if let Some(&class) = NUCLEOTIDES.get(resn) {
        class
    } else if is_water(resn) {
        ResidueClass::Water
    } else if is_ion(resn) {
        ResidueClass::Ion
    } else {
        ResidueClass::Other
    }
}

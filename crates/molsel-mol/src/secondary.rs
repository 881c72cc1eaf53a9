//! Secondary structure types
//!
//! Per-residue secondary structure as assigned by DSSP-like tools or read from
//! structure files. The selection keywords `helix` and `sheet` test against it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Secondary structure assignment of a residue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryStructure {
    /// Loop or coil (no regular secondary structure)
    #[default]
    Loop,
    /// Alpha helix (`h`)
    Helix,
    /// 3-10 helix (`g`)
    Helix310,
    /// Pi helix (`i`)
    HelixPi,
    /// Extended strand in a ladder (`e`)
    Sheet,
    /// Isolated beta bridge (`b`)
    Bridge,
    /// Turn (`t`)
    Turn,
    /// Bend (`s`)
    Bend,
}

impl SecondaryStructure {
    /// Create from a single character code, case-insensitive
    ///
    /// Unknown codes, including blanks, map to [`SecondaryStructure::Loop`].
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'h' => SecondaryStructure::Helix,
            'g' => SecondaryStructure::Helix310,
            'i' => SecondaryStructure::HelixPi,
            'e' => SecondaryStructure::Sheet,
            'b' => SecondaryStructure::Bridge,
            't' => SecondaryStructure::Turn,
            's' => SecondaryStructure::Bend,
            _ => SecondaryStructure::Loop,
        }
    }

    /// Lowercase single character code
    pub fn to_char(self) -> char {
        match self {
            SecondaryStructure::Loop => 'l',
            SecondaryStructure::Helix => 'h',
            SecondaryStructure::Helix310 => 'g',
            SecondaryStructure::HelixPi => 'i',
            SecondaryStructure::Sheet => 'e',
            SecondaryStructure::Bridge => 'b',
            SecondaryStructure::Turn => 't',
            SecondaryStructure::Bend => 's',
        }
    }

    /// Any helix type (alpha, 3-10 or pi)
    #[inline]
    pub fn is_helix(self) -> bool {
        matches!(
            self,
            SecondaryStructure::Helix | SecondaryStructure::Helix310 | SecondaryStructure::HelixPi
        )
    }

    /// Beta strand or isolated bridge
    #[inline]
    pub fn is_sheet(self) -> bool {
        matches!(self, SecondaryStructure::Sheet | SecondaryStructure::Bridge)
    }

    /// Neither helix nor sheet
    #[inline]
    pub fn is_loop(self) -> bool {
        !self.is_helix() && !self.is_sheet()
    }
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl From<char> for SecondaryStructure {
    fn from(c: char) -> Self {
        Self::from_char(c)
    }
}

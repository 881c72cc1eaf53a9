//! Keyword table for the selection language
//!
//! Maps reserved words to the leaf or subtree they stand for. Expansion
//! happens once at parse time; the resulting tree never refers back to the
//! macro name.

use phf::phf_map;

use crate::ast::{Keyword, Leaf, Rule, SelectionNode};

/// A reserved word of the selection language (operators excluded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedWord {
    // Structural classes
    Hetero,
    Water,
    Ion,
    Protein,
    Nucleic,
    Rna,
    Dna,
    Polymer,
    Hydrogen,

    // Amino-acid property classes
    Small,
    Nucleophilic,
    Hydrophobic,
    Aromatic,
    Amide,
    Acidic,
    Basic,
    Charged,
    Polar,
    Nonpolar,

    // Secondary structure
    Helix,
    Sheet,
    Turn,

    // Backbone / sidechain partition
    Backbone,
    Sidechain,
    SidechainAttached,

    All,
}

/// Reserved words by uppercase spelling
pub static RESERVED_WORDS: phf::Map<&'static str, ReservedWord> = phf_map! {
    "HETERO" => ReservedWord::Hetero,
    "WATER" => ReservedWord::Water,
    "ION" => ReservedWord::Ion,
    "PROTEIN" => ReservedWord::Protein,
    "NUCLEIC" => ReservedWord::Nucleic,
    "RNA" => ReservedWord::Rna,
    "DNA" => ReservedWord::Dna,
    "POLYMER" => ReservedWord::Polymer,
    "HYDROGEN" => ReservedWord::Hydrogen,

    "SMALL" => ReservedWord::Small,
    "NUCLEOPHILIC" => ReservedWord::Nucleophilic,
    "HYDROPHOBIC" => ReservedWord::Hydrophobic,
    "AROMATIC" => ReservedWord::Aromatic,
    "AMIDE" => ReservedWord::Amide,
    "ACIDIC" => ReservedWord::Acidic,
    "BASIC" => ReservedWord::Basic,
    "CHARGED" => ReservedWord::Charged,
    "POLAR" => ReservedWord::Polar,
    "NONPOLAR" => ReservedWord::Nonpolar,

    "HELIX" => ReservedWord::Helix,
    "SHEET" => ReservedWord::Sheet,
    "TURN" => ReservedWord::Turn,

    "BACKBONE" => ReservedWord::Backbone,
    "SIDECHAIN" => ReservedWord::Sidechain,
    "SIDECHAINATTACHED" => ReservedWord::SidechainAttached,

    "*" => ReservedWord::All,
    "" => ReservedWord::All,
    "ALL" => ReservedWord::All,
};

// Residue-name membership of the property classes.
const SMALL: &[&str] = &["GLY", "ALA"];
const NUCLEOPHILIC: &[&str] = &["SER", "THR", "CYS"];
const HYDROPHOBIC: &[&str] = &["VAL", "LEU", "ILE", "MET", "PRO"];
const AROMATIC: &[&str] = &["PHE", "TYR", "TRP"];
const AMIDE: &[&str] = &["ASN", "GLN"];
const ACIDIC: &[&str] = &["ASP", "GLU"];
const BASIC: &[&str] = &["HIS", "LYS", "ARG"];
const CHARGED: &[&str] = &["ASP", "GLU", "HIS", "LYS", "ARG"];
const POLAR: &[&str] = &[
    "ASP", "GLU", "HIS", "LYS", "ARG", "ASN", "GLN", "SER", "THR", "TYR",
];
const NONPOLAR: &[&str] = &[
    "ALA", "CYS", "GLY", "ILE", "LEU", "MET", "PHE", "PRO", "VAL", "TRP",
];

impl ReservedWord {
    /// Expand into the rule appended to the current context
    pub fn expand(self) -> Rule {
        match self {
            ReservedWord::Hetero => keyword(Keyword::Hetero),
            ReservedWord::Water => keyword(Keyword::Water),
            ReservedWord::Ion => keyword(Keyword::Ion),
            ReservedWord::Protein => keyword(Keyword::Protein),
            ReservedWord::Nucleic => keyword(Keyword::Nucleic),
            ReservedWord::Rna => keyword(Keyword::Rna),
            ReservedWord::Dna => keyword(Keyword::Dna),
            ReservedWord::Polymer => keyword(Keyword::Polymer),
            ReservedWord::Hydrogen => Leaf::element("H").into(),

            ReservedWord::Small => any_resname(SMALL),
            ReservedWord::Nucleophilic => any_resname(NUCLEOPHILIC),
            ReservedWord::Hydrophobic => any_resname(HYDROPHOBIC),
            ReservedWord::Aromatic => any_resname(AROMATIC),
            ReservedWord::Amide => any_resname(AMIDE),
            ReservedWord::Acidic => any_resname(ACIDIC),
            ReservedWord::Basic => any_resname(BASIC),
            ReservedWord::Charged => any_resname(CHARGED),
            ReservedWord::Polar => any_resname(POLAR),
            ReservedWord::Nonpolar => any_resname(NONPOLAR),

            ReservedWord::Helix => keyword(Keyword::Helix),
            ReservedWord::Sheet => keyword(Keyword::Sheet),
            ReservedWord::Turn => SelectionNode::or(vec![
                keyword(Keyword::Helix),
                keyword(Keyword::Sheet),
            ])
            .negated()
            .into(),

            ReservedWord::Backbone => keyword(Keyword::Backbone),
            ReservedWord::Sidechain => keyword(Keyword::Sidechain),
            // Proline N, any sidechain atom, CA, or the coarse-grained backbone bead
            ReservedWord::SidechainAttached => SelectionNode::or(vec![
                SelectionNode::and(vec![Leaf::resname("PRO").into(), Leaf::atomname("N").into()])
                    .into(),
                keyword(Keyword::Sidechain),
                Leaf::atomname("CA").into(),
                Leaf::atomname("BB").into(),
            ])
            .into(),

            ReservedWord::All => keyword(Keyword::All),
        }
    }
}

fn keyword(keyword: Keyword) -> Rule {
    Leaf::keyword(keyword).into()
}

fn any_resname(names: &[&str]) -> Rule {
    SelectionNode::or(names.iter().map(|name| Leaf::resname(*name).into()).collect()).into()
}

/// Look up a reserved word (case-insensitive)
pub fn lookup(token: &str) -> Option<ReservedWord> {
    if let Some(&word) = RESERVED_WORDS.get(token) {
        return Some(word);
    }
    RESERVED_WORDS.get(token.to_ascii_uppercase().as_str()).copied()
}

/// Check if a token is a reserved word
pub fn is_reserved(token: &str) -> bool {
    lookup(token).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;

    fn resnames(rule: &Rule) -> Vec<&str> {
        rule.as_node()
            .unwrap()
            .rules
            .iter()
            .map(|r| r.as_leaf().unwrap().resname.as_deref().unwrap())
            .collect()
    }

    #[test]
    fn test_lookup_case_insensitive() {
        assert_eq!(lookup("protein"), Some(ReservedWord::Protein));
        assert_eq!(lookup("Protein"), Some(ReservedWord::Protein));
        assert_eq!(lookup("SideChainAttached"), Some(ReservedWord::SidechainAttached));
        assert_eq!(lookup("*"), Some(ReservedWord::All));
        assert_eq!(lookup(""), Some(ReservedWord::All));
        assert_eq!(lookup("ALA"), None);
        assert!(!is_reserved("and"));
    }

    #[test]
    fn test_simple_keywords_expand_to_leaf() {
        assert_eq!(ReservedWord::Protein.expand(), Rule::Leaf(Leaf::keyword(Keyword::Protein)));
        assert_eq!(lookup("ion"), Some(ReservedWord::Ion));
        assert_eq!(ReservedWord::Ion.expand(), Rule::Leaf(Leaf::keyword(Keyword::Ion)));
        assert_eq!(ReservedWord::Hydrogen.expand(), Rule::Leaf(Leaf::element("H")));
        assert_eq!(ReservedWord::All.expand(), Rule::Leaf(Leaf::all()));
    }

    #[test]
    fn test_property_classes() {
        assert_eq!(resnames(&ReservedWord::Small.expand()), ["GLY", "ALA"]);
        assert_eq!(resnames(&ReservedWord::Nucleophilic.expand()), ["SER", "THR", "CYS"]);
        assert_eq!(
            resnames(&ReservedWord::Hydrophobic.expand()),
            ["VAL", "LEU", "ILE", "MET", "PRO"]
        );
        assert_eq!(resnames(&ReservedWord::Aromatic.expand()), ["PHE", "TYR", "TRP"]);
        assert_eq!(resnames(&ReservedWord::Amide.expand()), ["ASN", "GLN"]);
        assert_eq!(resnames(&ReservedWord::Acidic.expand()), ["ASP", "GLU"]);
        assert_eq!(resnames(&ReservedWord::Basic.expand()), ["HIS", "LYS", "ARG"]);
        assert_eq!(
            resnames(&ReservedWord::Charged.expand()),
            ["ASP", "GLU", "HIS", "LYS", "ARG"]
        );
        assert_eq!(
            resnames(&ReservedWord::Polar.expand()),
            ["ASP", "GLU", "HIS", "LYS", "ARG", "ASN", "GLN", "SER", "THR", "TYR"]
        );
        assert_eq!(
            resnames(&ReservedWord::Nonpolar.expand()),
            ["ALA", "CYS", "GLY", "ILE", "LEU", "MET", "PHE", "PRO", "VAL", "TRP"]
        );
    }

    #[test]
    fn test_turn_is_negated_or() {
        let turn = ReservedWord::Turn.expand();
        let node = turn.as_node().unwrap();
        assert!(node.negate);
        assert_eq!(node.operator, Some(Operator::Or));
        assert_eq!(node.rules.len(), 2);
    }

    #[test]
    fn test_sidechain_attached() {
        let rule = ReservedWord::SidechainAttached.expand();
        let node = rule.as_node().unwrap();
        assert_eq!(node.operator, Some(Operator::Or));
        assert!(!node.negate);
        let proline_n = node.rules[0].as_node().unwrap();
        assert!(proline_n.is_and());
        assert_eq!(
            proline_n.rules,
            vec![Rule::Leaf(Leaf::resname("PRO")), Rule::Leaf(Leaf::atomname("N"))]
        );
        assert_eq!(node.rules[1], Rule::Leaf(Leaf::keyword(Keyword::Sidechain)));
        assert_eq!(node.rules[3], Rule::Leaf(Leaf::atomname("BB")));
    }
}

//! Shared fixture: a flat atom record implementing every level of the hierarchy

#![allow(dead_code)]

use std::ops::Range;

use molsel_mol::{
    classify_residue, AtomRecord, ChainRecord, ModelRecord, ResidueClass, ResidueRecord,
    SecondaryStructure,
};

#[derive(Debug, Clone)]
pub struct FixtureAtom {
    pub model: usize,
    pub chain: String,
    pub resname: String,
    pub resno: i32,
    pub name: String,
    pub element: String,
    pub altloc: String,
    pub class: ResidueClass,
    pub hetero: bool,
    pub ss: SecondaryStructure,
    pub index: Option<usize>,
    pub residue_atoms: Option<Range<usize>>,
    pub chain_atoms: Option<Range<usize>>,
    pub model_atoms: Option<Range<usize>>,
}

impl FixtureAtom {
    /// Atom `name` of residue `resname resno` in chain `chain`, model 0
    pub fn new(chain: &str, resname: &str, resno: i32, name: &str) -> Self {
        FixtureAtom {
            model: 0,
            chain: chain.to_owned(),
            resname: resname.to_owned(),
            resno,
            name: name.to_owned(),
            element: name[..1].to_owned(),
            altloc: String::new(),
            class: classify_residue(resname),
            hetero: false,
            ss: SecondaryStructure::Loop,
            index: None,
            residue_atoms: None,
            chain_atoms: None,
            model_atoms: None,
        }
    }

    pub fn model(mut self, model: usize) -> Self {
        self.model = model;
        self
    }

    pub fn class(mut self, class: ResidueClass) -> Self {
        self.class = class;
        self
    }

    pub fn hetero(mut self) -> Self {
        self.hetero = true;
        self
    }

    pub fn ss(mut self, ss: SecondaryStructure) -> Self {
        self.ss = ss;
        self
    }

    pub fn altloc(mut self, altloc: &str) -> Self {
        self.altloc = altloc.to_owned();
        self
    }
}

impl ModelRecord for FixtureAtom {
    fn model_index(&self) -> usize {
        self.model
    }

    fn model_atoms(&self) -> Option<Range<usize>> {
        self.model_atoms.clone()
    }
}

impl ChainRecord for FixtureAtom {
    fn chain_name(&self) -> &str {
        &self.chain
    }

    fn chain_atoms(&self) -> Option<Range<usize>> {
        self.chain_atoms.clone()
    }
}

impl ResidueRecord for FixtureAtom {
    fn residue_name(&self) -> &str {
        &self.resname
    }

    fn residue_number(&self) -> i32 {
        self.resno
    }

    fn residue_class(&self) -> ResidueClass {
        self.class
    }

    fn is_hetero(&self) -> bool {
        self.hetero
    }

    fn secondary_structure(&self) -> SecondaryStructure {
        self.ss
    }

    fn residue_atoms(&self) -> Option<Range<usize>> {
        self.residue_atoms.clone()
    }
}

impl AtomRecord for FixtureAtom {
    fn atom_name(&self) -> &str {
        &self.name
    }

    fn element(&self) -> &str {
        &self.element
    }

    fn altloc(&self) -> &str {
        &self.altloc
    }

    fn atom_index(&self) -> Option<usize> {
        self.index
    }
}

/// A small two-chain structure with a water
///
/// | idx | chain | residue  | atom |
/// |-----|-------|----------|------|
/// | 0-3 | A     | ALA 15   | N CA C CB |
/// | 4-5 | A     | SER 21   | CA OG |
/// | 6-7 | B     | ALA 15   | CA CB |
/// | 8   | W     | HOH 501  | O    |
pub fn structure() -> Vec<FixtureAtom> {
    vec![
        FixtureAtom::new("A", "ALA", 15, "N"),
        FixtureAtom::new("A", "ALA", 15, "CA"),
        FixtureAtom::new("A", "ALA", 15, "C"),
        FixtureAtom::new("A", "ALA", 15, "CB"),
        FixtureAtom::new("A", "SER", 21, "CA"),
        FixtureAtom::new("A", "SER", 21, "OG"),
        FixtureAtom::new("B", "ALA", 15, "CA"),
        FixtureAtom::new("B", "ALA", 15, "CB"),
        FixtureAtom::new("W", "HOH", 501, "O").hetero(),
    ]
}

/// Run of consecutive atoms sharing `key(atom)` around position `i`
fn run<K: PartialEq>(atoms: &[FixtureAtom], i: usize, key: impl Fn(&FixtureAtom) -> K) -> Range<usize> {
    let k = key(&atoms[i]);
    let start = (0..i).rev().take_while(|&j| key(&atoms[j]) == k).last().unwrap_or(i);
    let end = (i + 1..atoms.len()).take_while(|&j| key(&atoms[j]) == k).last().map_or(i + 1, |j| j + 1);
    start..end
}

/// Assign global atom indices and the atom ranges of every level
pub fn numbered(mut atoms: Vec<FixtureAtom>) -> Vec<FixtureAtom> {
    let snapshot = atoms.clone();
    for (i, atom) in atoms.iter_mut().enumerate() {
        atom.index = Some(i);
        atom.residue_atoms =
            Some(run(&snapshot, i, |a| (a.model, a.chain.clone(), a.resname.clone(), a.resno)));
        atom.chain_atoms = Some(run(&snapshot, i, |a| (a.model, a.chain.clone())));
        atom.model_atoms = Some(run(&snapshot, i, |a| a.model));
    }
    atoms
}

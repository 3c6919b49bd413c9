use super::container::GraphContainer;
use super::ids::{AtomId, BondId, MoleculeId, RingId};
use crate::core::utils::geometry::Rect;
use std::cell::OnceCell;

/// A name attached to a molecule (systematic name, trade name, caption).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoleculeName {
    pub id: String,
    pub value: String,
}

/// A connected component of the graph, or a grouping of child molecules.
///
/// Membership is owned by the [`Model`](super::model::Model); a molecule only
/// records ids. `atoms`/`bonds` are the direct members, `all_atoms`/`all_bonds`
/// add every descendant's members.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub label: String,
    pub names: Vec<MoleculeName>,
    pub(crate) parent: Option<MoleculeId>,
    pub(crate) children: Vec<MoleculeId>,
    pub(crate) atoms: Vec<AtomId>,
    pub(crate) bonds: Vec<BondId>,
    pub(crate) all_atoms: Vec<AtomId>,
    pub(crate) all_bonds: Vec<BondId>,
    pub(crate) rings: Vec<RingId>,
    pub(crate) bounds: OnceCell<Option<Rect>>,
}

impl Molecule {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn parent(&self) -> Option<MoleculeId> {
        self.parent
    }

    pub fn rings(&self) -> &[RingId] {
        &self.rings
    }

    pub fn is_empty(&self) -> bool {
        self.all_atoms.is_empty()
    }

    /// `bonds - atoms + 1` over the direct members; zero or less means acyclic.
    pub fn theoretical_ring_count(&self) -> i64 {
        self.bonds.len() as i64 - self.atoms.len() as i64 + 1
    }

    pub(crate) fn invalidate_bounds(&mut self) {
        self.bounds.take();
    }
}

impl GraphContainer for Molecule {
    fn atom_ids(&self) -> &[AtomId] {
        &self.atoms
    }

    fn bond_ids(&self) -> &[BondId] {
        &self.bonds
    }

    fn all_atom_ids(&self) -> &[AtomId] {
        &self.all_atoms
    }

    fn all_bond_ids(&self) -> &[BondId] {
        &self.all_bonds
    }

    fn child_molecules(&self) -> &[MoleculeId] {
        &self.children
    }
}

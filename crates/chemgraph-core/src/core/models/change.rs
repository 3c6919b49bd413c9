use super::ids::{AtomId, BondId, MoleculeId, RingId};

/// What a single structural mutation touched.
///
/// `*_added` lists entities that joined a molecule they were not in before,
/// `*_moved` lists entities that changed molecule within the model, and
/// `*_removed` lists entities deleted from the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub atoms_added: Vec<AtomId>,
    pub atoms_moved: Vec<AtomId>,
    pub atoms_removed: Vec<AtomId>,
    pub bonds_added: Vec<BondId>,
    pub bonds_moved: Vec<BondId>,
    pub bonds_removed: Vec<BondId>,
    pub molecules_added: Vec<MoleculeId>,
    pub molecules_removed: Vec<MoleculeId>,
    pub rings_invalidated: Vec<RingId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.atoms_added.is_empty()
            && self.atoms_moved.is_empty()
            && self.atoms_removed.is_empty()
            && self.bonds_added.is_empty()
            && self.bonds_moved.is_empty()
            && self.bonds_removed.is_empty()
            && self.molecules_added.is_empty()
            && self.molecules_removed.is_empty()
            && self.rings_invalidated.is_empty()
    }

    pub fn extend(&mut self, other: ChangeSet) {
        self.atoms_added.extend(other.atoms_added);
        self.atoms_moved.extend(other.atoms_moved);
        self.atoms_removed.extend(other.atoms_removed);
        self.bonds_added.extend(other.bonds_added);
        self.bonds_moved.extend(other.bonds_moved);
        self.bonds_removed.extend(other.bonds_removed);
        self.molecules_added.extend(other.molecules_added);
        self.molecules_removed.extend(other.molecules_removed);
        self.rings_invalidated.extend(other.rings_invalidated);
    }

    /// True if the mutation may have changed ring structure somewhere.
    pub fn is_structural(&self) -> bool {
        !(self.atoms_added.is_empty()
            && self.atoms_moved.is_empty()
            && self.atoms_removed.is_empty()
            && self.bonds_added.is_empty()
            && self.bonds_moved.is_empty()
            && self.bonds_removed.is_empty())
    }
}

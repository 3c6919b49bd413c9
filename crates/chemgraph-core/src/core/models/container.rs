use super::ids::{AtomId, BondId, MoleculeId};

/// Membership queries shared by [`Molecule`](super::molecule::Molecule) and
/// [`Model`](super::model::Model).
///
/// `atom_ids`/`bond_ids` are the direct members. `all_atom_ids`/`all_bond_ids` are
/// the union of the direct members and every descendant molecule's members; the
/// model keeps this mirror current on every mutation.
pub trait GraphContainer {
    fn atom_ids(&self) -> &[AtomId];
    fn bond_ids(&self) -> &[BondId];
    fn all_atom_ids(&self) -> &[AtomId];
    fn all_bond_ids(&self) -> &[BondId];
    fn child_molecules(&self) -> &[MoleculeId];

    fn contains_atom(&self, atom_id: AtomId) -> bool {
        self.all_atom_ids().contains(&atom_id)
    }

    fn contains_bond(&self, bond_id: BondId) -> bool {
        self.all_bond_ids().contains(&bond_id)
    }

    fn atom_count(&self) -> usize {
        self.all_atom_ids().len()
    }

    fn bond_count(&self) -> usize {
        self.all_bond_ids().len()
    }
}

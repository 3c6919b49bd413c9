use super::ids::{AtomId, BondId, MoleculeId};

/// A cycle found by ring perception.
///
/// `atoms` are stored in cyclic order and `bonds[i]` joins `atoms[i]` to
/// `atoms[(i + 1) % size]`. A ring is never edited in place; any structural
/// change to its molecule removes it from the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub(crate) atoms: Vec<AtomId>,
    pub(crate) bonds: Vec<BondId>,
    pub(crate) molecule: MoleculeId,
}

impl Ring {
    pub(crate) fn new(molecule: MoleculeId, atoms: Vec<AtomId>, bonds: Vec<BondId>) -> Self {
        debug_assert_eq!(atoms.len(), bonds.len(), "a ring has as many bonds as atoms");
        Self {
            atoms,
            bonds,
            molecule,
        }
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[BondId] {
        &self.bonds
    }

    pub fn molecule(&self) -> MoleculeId {
        self.molecule
    }

    pub fn size(&self) -> usize {
        self.atoms.len()
    }

    /// Rank used when choosing which ring a double bond is drawn into.
    ///
    /// Lower is preferred: six-membered rings first, then 5, 7, 4 and 3.
    pub fn priority(&self) -> u8 {
        size_priority(self.size())
    }

    pub fn contains_atom(&self, atom_id: AtomId) -> bool {
        self.atoms.contains(&atom_id)
    }

    pub fn contains_bond(&self, bond_id: BondId) -> bool {
        self.bonds.contains(&bond_id)
    }
}

pub fn size_priority(size: usize) -> u8 {
    match size {
        6 => 1,
        5 => 2,
        7 => 3,
        4 => 4,
        3 => 5,
        _ => u8::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn atom(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn bond(n: u64) -> BondId {
        BondId::from(KeyData::from_ffi(n))
    }

    fn ring_of_size(size: u64) -> Ring {
        Ring::new(
            MoleculeId::default(),
            (1..=size).map(atom).collect(),
            (1..=size).map(bond).collect(),
        )
    }

    #[test]
    fn priority_prefers_six_then_five_seven_four_three() {
        let order: Vec<u8> = [6, 5, 7, 4, 3].iter().map(|&s| ring_of_size(s).priority()).collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(ring_of_size(8).priority(), u8::MAX);
        assert_eq!(ring_of_size(12).priority(), ring_of_size(8).priority());
    }

    #[test]
    fn membership_queries() {
        let ring = ring_of_size(5);
        assert_eq!(ring.size(), 5);
        assert!(ring.contains_atom(atom(3)));
        assert!(!ring.contains_atom(atom(6)));
        assert!(ring.contains_bond(bond(5)));
        assert!(!ring.contains_bond(bond(9)));
        assert_eq!(ring.molecule(), MoleculeId::default());
    }
}

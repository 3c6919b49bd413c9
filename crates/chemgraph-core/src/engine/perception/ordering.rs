use crate::core::models::bond::BondOrder;
use crate::core::models::ids::{MoleculeId, RingId};
use crate::core::models::model::Model;
use std::cmp::Reverse;

/// The molecule's rings in the order double bonds should be drawn into them.
///
/// Three successive stable sorts, each keeping the relative order left by the
/// previous one: by size priority (6, 5, 7, 4, 3, then everything else), by the
/// total ring membership of the ring's atoms (fewer shared atoms first), and
/// finally by the number of double bonds already in the ring (most first).
pub fn rings_for_double_bond_placement(model: &Model, molecule_id: MoleculeId) -> Vec<RingId> {
    let Some(molecule) = model.molecule(molecule_id) else {
        return Vec::new();
    };
    let mut rings: Vec<RingId> = molecule
        .rings()
        .iter()
        .copied()
        .filter(|&id| model.ring(id).is_some())
        .collect();

    rings.sort_by_key(|&id| model.ring(id).map_or(u8::MAX, |ring| ring.priority()));
    rings.sort_by_key(|&id| membership(model, id));
    rings.sort_by_key(|&id| Reverse(double_bonds(model, id)));
    rings
}

fn membership(model: &Model, ring_id: RingId) -> usize {
    model.ring(ring_id).map_or(0, |ring| {
        ring.atoms()
            .iter()
            .filter_map(|&a| model.atom(a))
            .map(|atom| atom.rings().len())
            .sum()
    })
}

fn double_bonds(model: &Model, ring_id: RingId) -> usize {
    model.ring(ring_id).map_or(0, |ring| {
        ring.bonds()
            .iter()
            .filter_map(|&b| model.bond(b))
            .filter(|bond| bond.order == BondOrder::Double)
            .count()
    })
}

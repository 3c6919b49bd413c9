use super::error::EngineError;
use super::perception::ordering::rings_for_double_bond_placement;
use crate::core::models::bond::RingPlacement;
use crate::core::models::container::GraphContainer;
use crate::core::models::error::GraphError;
use crate::core::models::ids::MoleculeId;
use crate::core::models::model::Model;
use crate::core::utils::geometry;
use tracing::{debug, instrument};

/// Decides on which side of each ring bond the second line of a multiple bond is
/// drawn.
///
/// Every direct bond of the molecule is reset to [`RingPlacement::None`] first.
/// Rings are then visited in [`rings_for_double_bond_placement`] order; a multiple
/// bond takes the side of the first ring that reaches it. Walking from the bond's
/// start to its end, a centroid on the left gives `Anticlockwise` and one on the
/// right gives `Clockwise`. Returns the number of bonds placed.
#[instrument(skip_all, name = "assign_ring_placements")]
pub fn assign_ring_placements(model: &mut Model, molecule_id: MoleculeId) -> Result<usize, EngineError> {
    let bond_ids = model
        .molecule(molecule_id)
        .ok_or(GraphError::MoleculeNotFound(molecule_id))?
        .bond_ids()
        .to_vec();
    for &bond_id in &bond_ids {
        if let Some(bond) = model.bond_mut(bond_id) {
            bond.placement = RingPlacement::None;
        }
    }

    let mut placed = 0;
    for ring_id in rings_for_double_bond_placement(model, molecule_id) {
        let Some(centroid) = model.ring_centroid(ring_id) else {
            continue;
        };
        let Some(ring) = model.ring(ring_id) else {
            continue;
        };
        let mut sides = Vec::new();
        for &bond_id in ring.bonds() {
            let Some(bond) = model.bond(bond_id) else {
                continue;
            };
            if !bond.order.is_multiple() || bond.placement != RingPlacement::None {
                continue;
            }
            let (Some(start), Some(end)) = (model.atom(bond.start()), model.atom(bond.end())) else {
                continue;
            };
            let side = if geometry::cross(&start.position(), &end.position(), &centroid) > 0.0 {
                RingPlacement::Anticlockwise
            } else {
                RingPlacement::Clockwise
            };
            sides.push((bond_id, side));
        }
        for (bond_id, side) in sides {
            if let Some(bond) = model.bond_mut(bond_id) {
                bond.placement = side;
                placed += 1;
            }
        }
    }
    debug!(?molecule_id, placed, "Ring placements assigned");
    Ok(placed)
}

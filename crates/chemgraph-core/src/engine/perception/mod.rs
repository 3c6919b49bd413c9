//! Ring perception.
//!
//! Both algorithms work on a [`graph::RingGraph`], an index-based copy of one
//! molecule's direct atoms and bonds, after side chains have been stripped by
//! [`pruning::WorkingSet`]. [`rp_path`] computes the smallest set of smallest rings
//! and is the default; [`figueras`] strips one ring at a time and is used when
//! configured or when the cyclic core exceeds the configured size cap.

pub mod bitset;
pub mod figueras;
pub mod graph;
pub mod ordering;
pub mod pruning;
pub mod rp_path;

use self::graph::{RingGraph, RingPath};
use self::pruning::WorkingSet;
use super::config::{PerceptionConfig, RingAlgorithm};
use super::error::EngineError;
use crate::core::models::error::GraphError;
use crate::core::models::ids::{MoleculeId, RingId};
use crate::core::models::model::Model;
use crate::core::models::ring::Ring;
use tracing::{debug, info, instrument, warn};

/// Replaces the rings of one molecule with freshly perceived ones.
///
/// Existing rings are invalidated first. Acyclic molecules (cycle rank of zero or
/// less, or nothing left after pruning) end up with no rings. Returns the new ring
/// ids in the order the algorithm produced them.
#[instrument(skip_all, name = "rebuild_rings")]
pub fn rebuild_rings(
    model: &mut Model,
    molecule_id: MoleculeId,
    config: &PerceptionConfig,
) -> Result<Vec<RingId>, EngineError> {
    config.validate()?;
    let theoretical = model
        .molecule(molecule_id)
        .ok_or(GraphError::MoleculeNotFound(molecule_id))?
        .theoretical_ring_count();
    model.invalidate_rings(molecule_id);

    if theoretical <= 0 {
        debug!(?molecule_id, "Molecule is acyclic, skipping ring perception");
        return Ok(Vec::new());
    }
    let Some(graph) = RingGraph::from_molecule(model, molecule_id) else {
        return Ok(Vec::new());
    };
    let mut working = WorkingSet::prune(&graph);
    if working.is_empty() {
        debug!(?molecule_id, "Nothing left after side-chain pruning");
        return Ok(Vec::new());
    }

    let algorithm = config.algorithm_for(working.len());
    if algorithm != config.algorithm {
        warn!(
            atoms = working.len(),
            cap = ?config.max_sssr_atoms,
            "Cyclic core exceeds the SSSR size cap, falling back to Figueras"
        );
    }
    let paths = match algorithm {
        RingAlgorithm::RpPath => rp_path::find_rings(&graph, &working),
        RingAlgorithm::Figueras => figueras::find_rings(&graph, &mut working),
    };

    let ring_ids: Vec<RingId> = paths
        .iter()
        .map(|path| model.attach_ring(to_ring(&graph, molecule_id, path)))
        .collect();
    debug!(?molecule_id, rings = ring_ids.len(), ?algorithm, "Rings perceived");
    Ok(ring_ids)
}

/// Runs [`rebuild_rings`] over every molecule, parents before children.
#[instrument(skip_all, name = "rebuild_all_rings")]
pub fn rebuild_all_rings(model: &mut Model, config: &PerceptionConfig) -> Result<usize, EngineError> {
    let mut total = 0;
    for molecule_id in model.molecules_preorder() {
        total += rebuild_rings(model, molecule_id, config)?.len();
    }
    info!(rings = total, "Ring perception complete");
    Ok(total)
}

fn to_ring(graph: &RingGraph, molecule_id: MoleculeId, path: &RingPath) -> Ring {
    Ring::new(
        molecule_id,
        path.atoms.iter().map(|&i| graph.atom_keys[i]).collect(),
        path.bonds.iter().map(|&e| graph.bond_keys[e]).collect(),
    )
}

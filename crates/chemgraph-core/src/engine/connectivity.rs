use super::error::EngineError;
use crate::core::models::change::ChangeSet;
use crate::core::models::container::GraphContainer;
use crate::core::models::error::GraphError;
use crate::core::models::ids::{AtomId, BondId, MoleculeId};
use crate::core::models::model::Model;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info, instrument};

#[derive(Debug, Default)]
struct Component {
    atoms: Vec<AtomId>,
    bonds: Vec<BondId>,
}

/// Breadth-first flood fill from `seed`, restricted to `members`.
///
/// Atoms are claimed from `pending` as they are reached; a bond is claimed once,
/// when both of its endpoints are members.
fn flood_fill(
    model: &Model,
    seed: AtomId,
    members: &HashSet<AtomId>,
    pending: &mut HashSet<AtomId>,
) -> Component {
    let mut component = Component::default();
    let mut claimed_bonds: HashSet<BondId> = HashSet::new();
    let mut queue = VecDeque::from([seed]);
    pending.remove(&seed);

    while let Some(atom_id) = queue.pop_front() {
        component.atoms.push(atom_id);
        let Some(atom) = model.atom(atom_id) else {
            continue;
        };
        for &bond_id in atom.bonds() {
            let Some(other) = model.bond(bond_id).and_then(|b| b.other_atom(atom_id)) else {
                continue;
            };
            if !members.contains(&other) {
                continue;
            }
            if claimed_bonds.insert(bond_id) {
                component.bonds.push(bond_id);
            }
            if pending.remove(&other) {
                queue.push_back(other);
            }
        }
    }
    component
}

fn assign(model: &mut Model, target: MoleculeId, component: &Component) -> Result<ChangeSet, GraphError> {
    let mut changes = ChangeSet::default();
    for &atom_id in &component.atoms {
        changes.extend(model.add_atom(target, atom_id)?);
    }
    for &bond_id in &component.bonds {
        changes.extend(model.add_bond(target, bond_id)?);
    }
    Ok(changes)
}

/// Rebuilds `molecule_id` as a single connected component.
///
/// The component reachable from the first direct atom stays in the molecule;
/// every other component of its direct atoms is moved into a new sibling under
/// the same parent (or at the top level). Bonds that were created but never
/// placed are picked up along the way. Direct bonds that still reach an atom now
/// owned by another molecule are deleted, so the bond graph and the molecule
/// boundaries agree again. A molecule left with no atoms, bonds or children is
/// deleted.
///
/// Rings are only invalidated where membership actually changed, so refreshing
/// an intact molecule is a no-op.
#[instrument(skip_all)]
pub fn refresh(model: &mut Model, molecule_id: MoleculeId) -> Result<ChangeSet, EngineError> {
    let molecule = model
        .molecule(molecule_id)
        .ok_or(GraphError::MoleculeNotFound(molecule_id))?;
    let parent = molecule.parent();
    let checklist: Vec<AtomId> = molecule.atom_ids().to_vec();
    let members: HashSet<AtomId> = checklist.iter().copied().collect();
    let stale: Vec<BondId> = molecule
        .bond_ids()
        .iter()
        .copied()
        .filter(|&bond_id| {
            model.bond(bond_id).is_some_and(|bond| {
                !members.contains(&bond.start()) || !members.contains(&bond.end())
            })
        })
        .collect();

    let mut changes = ChangeSet::default();
    if !stale.is_empty() {
        debug!(bonds = stale.len(), "Dropping bonds to atoms that left the molecule.");
        for bond_id in stale {
            changes.extend(model.remove_bond(bond_id));
        }
    }

    let is_empty_shell = checklist.is_empty()
        && model
            .molecule(molecule_id)
            .is_some_and(|m| m.bond_ids().is_empty() && m.child_molecules().is_empty());
    if is_empty_shell {
        debug!("Removing empty molecule.");
        changes.extend(model.remove_child_molecule(molecule_id));
        return Ok(changes);
    }

    let mut pending = members.clone();
    let mut components = 0usize;

    for &seed in &checklist {
        if !pending.contains(&seed) {
            continue;
        }
        let component = flood_fill(model, seed, &members, &mut pending);
        let target = if components == 0 {
            molecule_id
        } else {
            let sibling = model.add_molecule(parent)?;
            changes.molecules_added.push(sibling);
            sibling
        };
        components += 1;
        changes.extend(assign(model, target, &component)?);
    }

    if components > 1 {
        debug!(components, "Molecule split into disconnected components.");
    }
    debug_assert!(
        checklist.iter().all(|&a| model.atom(a).is_some_and(|atom| atom.parent().is_some())),
        "every atom has a molecule after refresh"
    );
    Ok(changes)
}

/// Separates the molecule shared by `a` and `b` if they are no longer connected.
///
/// Meant to be called after removing the bond between them. Returns an empty
/// change set if the atoms are in different molecules or still reachable from one
/// another.
pub fn split(model: &mut Model, a: AtomId, b: AtomId) -> Result<ChangeSet, EngineError> {
    let parent_a = model.atom(a).ok_or(GraphError::AtomNotFound(a))?.parent();
    let parent_b = model.atom(b).ok_or(GraphError::AtomNotFound(b))?.parent();

    match (parent_a, parent_b) {
        (Some(pa), Some(pb)) if pa == pb => {
            if reachable(model, pa, a, b) {
                Ok(ChangeSet::default())
            } else {
                refresh(model, pa)
            }
        }
        _ => Ok(ChangeSet::default()),
    }
}

/// Discards every molecule and rebuilds one top-level molecule per connected
/// component of the model's atoms, placed or not.
#[instrument(skip_all)]
pub fn rebuild_molecules(model: &mut Model) -> Result<ChangeSet, EngineError> {
    let mut changes = model.clear_molecules();
    let atoms: Vec<AtomId> = model.atoms_iter().map(|(id, _)| id).collect();
    let members: HashSet<AtomId> = atoms.iter().copied().collect();
    let mut pending = members.clone();

    for seed in atoms {
        if !pending.contains(&seed) {
            continue;
        }
        let component = flood_fill(model, seed, &members, &mut pending);
        let molecule_id = model.add_molecule(None)?;
        changes.molecules_added.push(molecule_id);
        changes.extend(assign(model, molecule_id, &component)?);
    }

    info!(
        molecules = changes.molecules_added.len(),
        "Rebuilt molecules from the atom graph."
    );
    Ok(changes)
}

/// True if every direct atom of the molecule is reachable from every other
/// through the molecule's direct bonds.
pub fn is_connected(model: &Model, molecule_id: MoleculeId) -> bool {
    let Some(molecule) = model.molecule(molecule_id) else {
        return false;
    };
    let Some(&seed) = molecule.atom_ids().first() else {
        return true;
    };
    let members: HashSet<AtomId> = molecule.atom_ids().iter().copied().collect();
    let direct_bonds: HashSet<BondId> = molecule.bond_ids().iter().copied().collect();

    let mut seen = HashSet::from([seed]);
    let mut queue = VecDeque::from([seed]);
    while let Some(atom_id) = queue.pop_front() {
        for &bond_id in model.atom(atom_id).map(|a| a.bonds()).unwrap_or_default() {
            if !direct_bonds.contains(&bond_id) {
                continue;
            }
            if let Some(other) = model.bond(bond_id).and_then(|b| b.other_atom(atom_id)) {
                if members.contains(&other) && seen.insert(other) {
                    queue.push_back(other);
                }
            }
        }
    }
    seen.len() == members.len()
}

fn reachable(model: &Model, molecule_id: MoleculeId, from: AtomId, to: AtomId) -> bool {
    let Some(molecule) = model.molecule(molecule_id) else {
        return false;
    };
    let members: HashSet<AtomId> = molecule.atom_ids().iter().copied().collect();
    let mut pending = members.clone();
    flood_fill(model, from, &members, &mut pending)
        .atoms
        .contains(&to)
}

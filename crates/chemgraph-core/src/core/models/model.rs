use super::atom::Atom;
use super::bond::{Bond, BondOrder};
use super::change::ChangeSet;
use super::container::GraphContainer;
use super::error::GraphError;
use super::formula::Formula;
use super::ids::{AtomId, BondId, MoleculeId, RingId};
use super::molecule::Molecule;
use super::ring::Ring;
use crate::core::elements::ElementRegistry;
use crate::core::utils::geometry::{self, Rect, SymbolMetrics};
use nalgebra::Point2;
use slotmap::SlotMap;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// The whole chemical graph of a document.
///
/// `Model` owns every atom, bond, molecule and ring in generational arenas and is
/// the only place where membership changes. Each mutation performs its cascade
/// synchronously: ancestor membership mirrors (`all_atoms`/`all_bonds`) are kept
/// equal to the union of their descendants, rings of touched molecules are
/// invalidated, and bounding-box caches are dropped. The returned [`ChangeSet`]
/// records what happened.
///
/// Atoms and bonds may exist without a molecule (freshly created, or after
/// [`Model::clear_molecules`]); they are not counted in `all_atoms`/`all_bonds`
/// until added to one.
#[derive(Debug, Clone)]
pub struct Model {
    atoms: SlotMap<AtomId, Atom>,
    bonds: SlotMap<BondId, Bond>,
    molecules: SlotMap<MoleculeId, Molecule>,
    rings: SlotMap<RingId, Ring>,
    roots: Vec<MoleculeId>,
    all_atoms: Vec<AtomId>,
    all_bonds: Vec<BondId>,
    registry: Arc<ElementRegistry>,
    metrics: SymbolMetrics,
}

impl Model {
    pub fn new(registry: Arc<ElementRegistry>) -> Self {
        Self {
            atoms: SlotMap::with_key(),
            bonds: SlotMap::with_key(),
            molecules: SlotMap::with_key(),
            rings: SlotMap::with_key(),
            roots: Vec::new(),
            all_atoms: Vec::new(),
            all_bonds: Vec::new(),
            registry,
            metrics: SymbolMetrics::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: SymbolMetrics) -> Self {
        self.set_metrics(metrics);
        self
    }

    pub fn set_metrics(&mut self, metrics: SymbolMetrics) {
        self.metrics = metrics;
        for molecule in self.molecules.values_mut() {
            molecule.invalidate_bounds();
        }
    }

    pub fn registry(&self) -> &Arc<ElementRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &SymbolMetrics {
        &self.metrics
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Mutable access to an atom's chemical identity and labels.
    ///
    /// The owning molecule's bounding box is invalidated up front, since changing
    /// the element or charge can change whether a symbol is drawn.
    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        let parent = self.atoms.get(id)?.parent;
        if let Some(parent) = parent {
            self.invalidate_bounds(parent);
        }
        self.atoms.get_mut(id)
    }

    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn bond(&self, id: BondId) -> Option<&Bond> {
        self.bonds.get(id)
    }

    pub fn bond_mut(&mut self, id: BondId) -> Option<&mut Bond> {
        self.bonds.get_mut(id)
    }

    pub fn bonds_iter(&self) -> impl Iterator<Item = (BondId, &Bond)> {
        self.bonds.iter()
    }

    pub fn molecule(&self, id: MoleculeId) -> Option<&Molecule> {
        self.molecules.get(id)
    }

    pub fn molecule_mut(&mut self, id: MoleculeId) -> Option<&mut Molecule> {
        self.molecules.get_mut(id)
    }

    pub fn molecules_iter(&self) -> impl Iterator<Item = (MoleculeId, &Molecule)> {
        self.molecules.iter()
    }

    pub fn ring(&self, id: RingId) -> Option<&Ring> {
        self.rings.get(id)
    }

    pub fn rings_iter(&self) -> impl Iterator<Item = (RingId, &Ring)> {
        self.rings.iter()
    }

    /// Top-level molecules in insertion order.
    pub fn roots(&self) -> &[MoleculeId] {
        &self.roots
    }

    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<BondId> {
        self.atoms
            .get(a)?
            .bonds
            .iter()
            .copied()
            .find(|&id| self.bonds.get(id).is_some_and(|bond| bond.joins(a, b)))
    }

    /// Inserts an atom into the arena without placing it in a molecule.
    ///
    /// Topology fields carried by `atom` are cleared; the new atom has no bonds,
    /// no parent and no rings.
    pub fn create_atom(&mut self, mut atom: Atom) -> AtomId {
        atom.bonds.clear();
        atom.parent = None;
        atom.rings.clear();
        self.atoms.insert(atom)
    }

    /// Creates the edge `start`-`end` and registers it with both endpoints.
    ///
    /// The bond is not placed in a molecule; use [`Model::add_bond`] (or
    /// [`Model::insert_bond`], which does both).
    ///
    /// # Arguments
    ///
    /// * `start` - First endpoint.
    /// * `end` - Second endpoint; must differ from `start`.
    /// * `order` - Bond order of a newly created bond.
    ///
    /// # Return
    ///
    /// The id of the new bond, or of the bond that already joins the pair. The
    /// order of an existing bond is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::SelfLoop`] if `start == end`, or
    /// [`GraphError::AtomNotFound`] if either endpoint does not exist.
    pub fn create_bond(&mut self, start: AtomId, end: AtomId, order: BondOrder) -> Result<BondId, GraphError> {
        if start == end {
            return Err(GraphError::SelfLoop(start));
        }
        if !self.atoms.contains_key(start) {
            return Err(GraphError::AtomNotFound(start));
        }
        if !self.atoms.contains_key(end) {
            return Err(GraphError::AtomNotFound(end));
        }
        if let Some(existing) = self.bond_between(start, end) {
            return Ok(existing);
        }

        let bond_id = self.bonds.insert(Bond::new(start, end, order));
        for atom_id in [start, end] {
            let parent = self.atoms.get_mut(atom_id).and_then(|atom| {
                atom.bonds.push(bond_id);
                atom.parent
            });
            if let Some(parent) = parent {
                self.invalidate_bounds(parent);
            }
        }
        Ok(bond_id)
    }

    /// Places an existing atom directly in `molecule_id`.
    ///
    /// An atom already owned by the molecule is left alone. An atom owned by a
    /// different molecule is moved; its bonds are not, so the caller follows up
    /// with a connectivity refresh of the previous owner, which deletes the bonds
    /// left pointing at the moved atom.
    ///
    /// # Arguments
    ///
    /// * `molecule_id` - The molecule that becomes the atom's direct owner.
    /// * `atom_id` - The atom to place.
    ///
    /// # Return
    ///
    /// The change set: the atom as added or moved, plus any invalidated rings.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MoleculeNotFound`] or [`GraphError::AtomNotFound`] if
    /// either id does not exist.
    pub fn add_atom(&mut self, molecule_id: MoleculeId, atom_id: AtomId) -> Result<ChangeSet, GraphError> {
        self.require_molecule(molecule_id)?;
        let previous = self
            .atoms
            .get(atom_id)
            .ok_or(GraphError::AtomNotFound(atom_id))?
            .parent;

        let mut changes = ChangeSet::default();
        if previous == Some(molecule_id) {
            return Ok(changes);
        }

        match previous {
            Some(previous) => {
                changes.rings_invalidated.extend(self.invalidate_rings(previous));
                self.unlink_atom(atom_id);
                changes.atoms_moved.push(atom_id);
            }
            None => changes.atoms_added.push(atom_id),
        }
        changes.rings_invalidated.extend(self.invalidate_rings(molecule_id));
        self.link_atom(molecule_id, atom_id);
        Ok(changes)
    }

    /// Places an existing bond directly in `molecule_id`.
    ///
    /// Endpoints outside the molecule are brought in first. If an endpoint belongs
    /// to an unrelated molecule, that whole molecule is merged into the target, so
    /// bonding two components together yields one component. Endpoints that are
    /// unparented, or owned by an ancestor or descendant of the target, are moved
    /// individually.
    ///
    /// # Arguments
    ///
    /// * `molecule_id` - The molecule that becomes the bond's direct owner.
    /// * `bond_id` - A bond already registered with its endpoints.
    ///
    /// # Return
    ///
    /// The change set, including any merged molecule listed as removed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MoleculeNotFound`], [`GraphError::BondNotFound`] or
    /// [`GraphError::AtomNotFound`] if the molecule, the bond, or one of its atoms
    /// does not exist.
    pub fn add_bond(&mut self, molecule_id: MoleculeId, bond_id: BondId) -> Result<ChangeSet, GraphError> {
        self.require_molecule(molecule_id)?;
        let bond = self.bonds.get(bond_id).ok_or(GraphError::BondNotFound(bond_id))?;
        let (start, end) = bond.atoms();

        let mut changes = ChangeSet::default();
        if bond.parent == Some(molecule_id) {
            return Ok(changes);
        }

        // 1. Bring both endpoints into the target.
        for atom_id in [start, end] {
            let owner = self
                .atoms
                .get(atom_id)
                .ok_or(GraphError::AtomNotFound(atom_id))?
                .parent;
            match owner {
                Some(owner) if owner == molecule_id => {}
                Some(owner) if !self.is_related(owner, molecule_id) => {
                    changes.extend(self.merge(molecule_id, owner)?);
                }
                _ => changes.extend(self.add_atom(molecule_id, atom_id)?),
            }
        }

        // 2. Move the bond itself; a merge above may already have done so.
        let previous = self.bonds.get(bond_id).and_then(|b| b.parent);
        if previous == Some(molecule_id) {
            return Ok(changes);
        }
        match previous {
            Some(previous) => {
                changes.rings_invalidated.extend(self.invalidate_rings(previous));
                self.unlink_bond(bond_id);
                changes.bonds_moved.push(bond_id);
            }
            None => changes.bonds_added.push(bond_id),
        }
        changes.rings_invalidated.extend(self.invalidate_rings(molecule_id));
        self.link_bond(molecule_id, bond_id);
        Ok(changes)
    }

    /// Deletes a bond from the model. Removing an absent bond is a no-op.
    ///
    /// The owning molecule is not split here; see
    /// [`connectivity::split`](crate::engine::connectivity::split).
    pub fn remove_bond(&mut self, bond_id: BondId) -> ChangeSet {
        let mut changes = ChangeSet::default();
        let Some(bond) = self.bonds.get(bond_id) else {
            return changes;
        };
        let (start, end) = bond.atoms();

        if let Some(parent) = bond.parent {
            changes.rings_invalidated.extend(self.invalidate_rings(parent));
            self.unlink_bond(bond_id);
        }
        for atom_id in [start, end] {
            let parent = self.atoms.get_mut(atom_id).and_then(|atom| {
                atom.bonds.retain(|&b| b != bond_id);
                atom.parent
            });
            if let Some(parent) = parent {
                self.invalidate_bounds(parent);
            }
        }

        self.bonds.remove(bond_id);
        changes.bonds_removed.push(bond_id);
        changes
    }

    /// Deletes an atom and, before it, every incident bond. Removing an absent
    /// atom is a no-op.
    pub fn remove_atom(&mut self, atom_id: AtomId) -> ChangeSet {
        let mut changes = ChangeSet::default();
        let Some(atom) = self.atoms.get(atom_id) else {
            return changes;
        };

        // 1. Incident bonds go first so no bond ever points at a missing atom.
        for bond_id in atom.bonds.clone() {
            changes.extend(self.remove_bond(bond_id));
        }

        // 2. Detach from the owning molecule and drop the atom.
        if let Some(parent) = self.atoms.get(atom_id).and_then(|a| a.parent) {
            changes.rings_invalidated.extend(self.invalidate_rings(parent));
            self.unlink_atom(atom_id);
        }
        self.atoms.remove(atom_id);
        changes.atoms_removed.push(atom_id);
        changes
    }

    /// Creates an empty molecule, top-level when `parent` is `None`.
    pub fn add_molecule(&mut self, parent: Option<MoleculeId>) -> Result<MoleculeId, GraphError> {
        if let Some(parent) = parent {
            self.require_molecule(parent)?;
        }
        let molecule_id = self.molecules.insert(Molecule::new());
        self.attach_molecule(parent, molecule_id);
        Ok(molecule_id)
    }

    /// Re-parents `child` (with its whole subtree) under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NestingCycle`] if `parent` is `child` itself or one of
    /// its descendants.
    pub fn add_child_molecule(&mut self, parent: MoleculeId, child: MoleculeId) -> Result<ChangeSet, GraphError> {
        self.require_molecule(parent)?;
        let current = self.require_molecule(child)?.parent;

        let mut changes = ChangeSet::default();
        if current == Some(parent) {
            return Ok(changes);
        }
        if self.is_within(parent, child) {
            return Err(GraphError::NestingCycle { parent, child });
        }

        self.detach_molecule(child);
        self.attach_molecule(Some(parent), child);
        changes.molecules_added.push(child);
        Ok(changes)
    }

    /// Deletes `child`, its descendants, and every atom and bond they contain.
    ///
    /// Works for top-level molecules as well. Removing an absent molecule is a
    /// no-op.
    ///
    /// # Arguments
    ///
    /// * `child` - Root of the subtree to delete.
    ///
    /// # Return
    ///
    /// The change set listing every deleted atom, bond, molecule and ring.
    pub fn remove_child_molecule(&mut self, child: MoleculeId) -> ChangeSet {
        let mut changes = ChangeSet::default();
        if !self.molecules.contains_key(child) {
            return changes;
        }
        let subtree = self.subtree(child);

        // 1. Delete every atom (and with it every bond) in the subtree.
        for &molecule_id in &subtree {
            let (atoms, bonds) = match self.molecules.get(molecule_id) {
                Some(m) => (m.atoms.clone(), m.bonds.clone()),
                None => continue,
            };
            for atom_id in atoms {
                changes.extend(self.remove_atom(atom_id));
            }
            for bond_id in bonds {
                changes.extend(self.remove_bond(bond_id));
            }
        }

        // 2. Unhook the subtree root, then drop the molecules.
        self.detach_molecule(child);
        for molecule_id in subtree {
            changes.rings_invalidated.extend(self.invalidate_rings(molecule_id));
            self.molecules.remove(molecule_id);
            changes.molecules_removed.push(molecule_id);
        }
        changes
    }

    /// Moves every member of `other` into `target` and deletes `other`.
    ///
    /// Direct atoms and bonds become direct members of `target`, child molecules
    /// become children of `target`, and names are appended.
    ///
    /// # Arguments
    ///
    /// * `target` - The surviving molecule.
    /// * `other` - The molecule absorbed and then deleted. Merging a molecule into
    ///   itself does nothing.
    ///
    /// # Return
    ///
    /// The change set with every moved atom and bond and `other` as removed.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MoleculeNotFound`] if either molecule is missing, or
    /// [`GraphError::NestingCycle`] if one molecule contains the other.
    pub fn merge(&mut self, target: MoleculeId, other: MoleculeId) -> Result<ChangeSet, GraphError> {
        self.require_molecule(target)?;
        let source = self.require_molecule(other)?;

        let mut changes = ChangeSet::default();
        if target == other {
            return Ok(changes);
        }
        if self.is_related(target, other) {
            return Err(GraphError::NestingCycle {
                parent: target,
                child: other,
            });
        }

        let atoms = source.atoms.clone();
        let bonds = source.bonds.clone();
        let children = source.children.clone();
        let names = source.names.clone();

        changes.rings_invalidated.extend(self.invalidate_rings(other));
        changes.rings_invalidated.extend(self.invalidate_rings(target));

        for atom_id in atoms {
            self.unlink_atom(atom_id);
            self.link_atom(target, atom_id);
            changes.atoms_moved.push(atom_id);
        }
        for bond_id in bonds {
            self.unlink_bond(bond_id);
            self.link_bond(target, bond_id);
            changes.bonds_moved.push(bond_id);
        }
        for child in children {
            self.detach_molecule(child);
            self.attach_molecule(Some(target), child);
        }
        if let Some(molecule) = self.molecules.get_mut(target) {
            molecule.names.extend(names);
        }

        self.detach_molecule(other);
        self.molecules.remove(other);
        changes.molecules_removed.push(other);

        debug!(
            atoms = changes.atoms_moved.len(),
            bonds = changes.bonds_moved.len(),
            "Merged molecule into its new component."
        );
        Ok(changes)
    }

    pub fn move_atom(&mut self, atom_id: AtomId, position: Point2<f64>) -> Result<(), GraphError> {
        let atom = self
            .atoms
            .get_mut(atom_id)
            .ok_or(GraphError::AtomNotFound(atom_id))?;
        atom.position = position;
        let parent = atom.parent;
        if let Some(parent) = parent {
            self.invalidate_bounds(parent);
        }
        Ok(())
    }

    /// Creates an atom and places it in `molecule_id` in one step.
    pub fn insert_atom(&mut self, molecule_id: MoleculeId, atom: Atom) -> Result<AtomId, GraphError> {
        self.require_molecule(molecule_id)?;
        let atom_id = self.create_atom(atom);
        self.add_atom(molecule_id, atom_id)?;
        Ok(atom_id)
    }

    /// Creates a bond and places it in the molecule of `start`.
    ///
    /// If `end` belongs to another molecule, that molecule is merged in.
    ///
    /// # Arguments
    ///
    /// * `start` - An atom already placed in a molecule.
    /// * `end` - The other endpoint.
    /// * `order` - Bond order of a newly created bond.
    ///
    /// # Return
    ///
    /// The id of the bond joining the pair, new or existing.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DetachedAtom`] if `start` has no molecule, plus the
    /// errors of [`Model::create_bond`].
    pub fn insert_bond(&mut self, start: AtomId, end: AtomId, order: BondOrder) -> Result<BondId, GraphError> {
        let molecule_id = self
            .atoms
            .get(start)
            .ok_or(GraphError::AtomNotFound(start))?
            .parent
            .ok_or(GraphError::DetachedAtom(start))?;
        let bond_id = self.create_bond(start, end, order)?;
        self.add_bond(molecule_id, bond_id)?;
        Ok(bond_id)
    }

    /// Drops the cached rings of a molecule, unregistering them from their atoms
    /// and bonds. Returns the ids that were removed.
    pub fn invalidate_rings(&mut self, molecule_id: MoleculeId) -> Vec<RingId> {
        let Some(molecule) = self.molecules.get_mut(molecule_id) else {
            return Vec::new();
        };
        let ring_ids = std::mem::take(&mut molecule.rings);
        for &ring_id in &ring_ids {
            let Some(ring) = self.rings.remove(ring_id) else {
                continue;
            };
            for atom_id in ring.atoms {
                if let Some(atom) = self.atoms.get_mut(atom_id) {
                    atom.rings.retain(|&r| r != ring_id);
                }
            }
            for bond_id in ring.bonds {
                if let Some(bond) = self.bonds.get_mut(bond_id) {
                    bond.rings.retain(|&r| r != ring_id);
                }
            }
        }
        ring_ids
    }

    pub(crate) fn attach_ring(&mut self, ring: Ring) -> RingId {
        let molecule_id = ring.molecule;
        let atoms = ring.atoms.clone();
        let bonds = ring.bonds.clone();
        let ring_id = self.rings.insert(ring);

        if let Some(molecule) = self.molecules.get_mut(molecule_id) {
            molecule.rings.push(ring_id);
        }
        for atom_id in atoms {
            if let Some(atom) = self.atoms.get_mut(atom_id) {
                atom.rings.push(ring_id);
            }
        }
        for bond_id in bonds {
            if let Some(bond) = self.bonds.get_mut(bond_id) {
                bond.rings.push(ring_id);
            }
        }
        ring_id
    }

    /// Removes every molecule and ring, leaving all atoms and bonds unparented.
    pub(crate) fn clear_molecules(&mut self) -> ChangeSet {
        let changes = ChangeSet {
            molecules_removed: self.molecules.keys().collect(),
            rings_invalidated: self.rings.keys().collect(),
            ..Default::default()
        };
        self.molecules.clear();
        self.rings.clear();
        self.roots.clear();
        self.all_atoms.clear();
        self.all_bonds.clear();
        for atom in self.atoms.values_mut() {
            atom.parent = None;
            atom.rings.clear();
        }
        for bond in self.bonds.values_mut() {
            bond.parent = None;
            bond.rings.clear();
        }
        changes
    }

    pub fn neighbours(&self, atom_id: AtomId) -> Vec<AtomId> {
        let Some(atom) = self.atoms.get(atom_id) else {
            return Vec::new();
        };
        atom.bonds
            .iter()
            .filter_map(|&b| self.bonds.get(b)?.other_atom(atom_id))
            .collect()
    }

    pub fn bond_order_sum(&self, atom_id: AtomId) -> f64 {
        self.atoms.get(atom_id).map_or(0.0, |atom| {
            atom.bonds
                .iter()
                .filter_map(|&b| self.bonds.get(b))
                .map(|bond| bond.order.value())
                .sum()
        })
    }

    pub fn implicit_hydrogen_count(&self, atom_id: AtomId) -> Option<u32> {
        let atom = self.atoms.get(atom_id)?;
        Some(atom.implicit_hydrogen_count(self.bond_order_sum(atom_id)))
    }

    pub fn bond_length(&self, bond_id: BondId) -> Option<f64> {
        let bond = self.bonds.get(bond_id)?;
        let start = self.atoms.get(bond.start)?.position;
        let end = self.atoms.get(bond.end)?.position;
        Some(nalgebra::distance(&start, &end))
    }

    /// Mean of the ring's atom positions at the time of the call.
    pub fn ring_centroid(&self, ring_id: RingId) -> Option<Point2<f64>> {
        let ring = self.rings.get(ring_id)?;
        let points: Vec<Point2<f64>> = ring
            .atoms
            .iter()
            .filter_map(|&a| self.atoms.get(a).map(|atom| atom.position))
            .collect();
        geometry::centroid(&points)
    }

    /// Union of the symbol boxes of every atom in the molecule and its descendants.
    ///
    /// Cached until an atom of the molecule is added, removed, moved or edited.
    pub fn molecule_bounding_box(&self, molecule_id: MoleculeId) -> Option<Rect> {
        let molecule = self.molecules.get(molecule_id)?;
        *molecule
            .bounds
            .get_or_init(|| self.bounds_of(&molecule.all_atoms))
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        self.roots
            .iter()
            .filter_map(|&m| self.molecule_bounding_box(m))
            .reduce(|acc, r| acc.union(&r))
    }

    pub fn convex_hull(&self, molecule_id: MoleculeId) -> Vec<Point2<f64>> {
        let Some(molecule) = self.molecules.get(molecule_id) else {
            return Vec::new();
        };
        let points: Vec<Point2<f64>> = molecule
            .all_atoms
            .iter()
            .filter_map(|&a| self.atoms.get(a).map(|atom| atom.position))
            .collect();
        geometry::convex_hull(&points)
    }

    pub fn molecule_mean_bond_length(&self, molecule_id: MoleculeId) -> Option<f64> {
        self.mean_length_of(&self.molecules.get(molecule_id)?.all_bonds)
    }

    pub fn mean_bond_length(&self) -> Option<f64> {
        self.mean_length_of(&self.all_bonds)
    }

    /// Element counts of the molecule and its descendants, with functional groups
    /// expanded and implicit hydrogens included.
    pub fn calculated_formula(&self, molecule_id: MoleculeId) -> Option<Formula> {
        Some(self.formula_of(&self.molecules.get(molecule_id)?.all_atoms))
    }

    pub fn formula(&self) -> Formula {
        self.formula_of(&self.all_atoms)
    }

    /// Regenerates sequential labels (`m1`, `a1`, `b1`, ...) in depth-first order
    /// over the top-level molecules. With `include_names`, molecule names get
    /// ids of the form `m1.n1`.
    pub fn relabel(&mut self, include_names: bool) {
        let (mut atom_index, mut bond_index) = (0usize, 0usize);
        for (index, molecule_id) in self.molecules_preorder().into_iter().enumerate() {
            let Some(molecule) = self.molecules.get_mut(molecule_id) else {
                continue;
            };
            let label = format!("m{}", index + 1);
            if include_names {
                for (k, name) in molecule.names.iter_mut().enumerate() {
                    name.id = format!("{label}.n{}", k + 1);
                }
            }
            molecule.label = label;
            let atoms = molecule.atoms.clone();
            let bonds = molecule.bonds.clone();

            for atom_id in atoms {
                if let Some(atom) = self.atoms.get_mut(atom_id) {
                    atom_index += 1;
                    atom.label = format!("a{atom_index}");
                }
            }
            for bond_id in bonds {
                if let Some(bond) = self.bonds.get_mut(bond_id) {
                    bond_index += 1;
                    bond.label = format!("b{bond_index}");
                }
            }
        }
    }

    /// Every molecule, parents before children, top-level molecules in order.
    pub fn molecules_preorder(&self) -> Vec<MoleculeId> {
        let mut order = Vec::with_capacity(self.molecules.len());
        let mut stack: Vec<MoleculeId> = self.roots.iter().rev().copied().collect();
        while let Some(molecule_id) = stack.pop() {
            order.push(molecule_id);
            if let Some(molecule) = self.molecules.get(molecule_id) {
                stack.extend(molecule.children.iter().rev().copied());
            }
        }
        order
    }

    pub(crate) fn invalidate_bounds(&mut self, molecule_id: MoleculeId) {
        for id in self.lineage(molecule_id) {
            if let Some(molecule) = self.molecules.get_mut(id) {
                molecule.invalidate_bounds();
            }
        }
    }

    fn require_molecule(&self, molecule_id: MoleculeId) -> Result<&Molecule, GraphError> {
        self.molecules
            .get(molecule_id)
            .ok_or(GraphError::MoleculeNotFound(molecule_id))
    }

    /// `molecule_id` followed by each of its ancestors up to the top level.
    fn lineage(&self, molecule_id: MoleculeId) -> Vec<MoleculeId> {
        let mut chain = Vec::new();
        let mut current = Some(molecule_id);
        while let Some(id) = current {
            let Some(molecule) = self.molecules.get(id) else {
                break;
            };
            chain.push(id);
            current = molecule.parent;
        }
        chain
    }

    /// True if `candidate` is `ancestor` or nested anywhere below it.
    fn is_within(&self, candidate: MoleculeId, ancestor: MoleculeId) -> bool {
        self.lineage(candidate).contains(&ancestor)
    }

    fn is_related(&self, a: MoleculeId, b: MoleculeId) -> bool {
        self.is_within(a, b) || self.is_within(b, a)
    }

    fn subtree(&self, molecule_id: MoleculeId) -> Vec<MoleculeId> {
        let mut order = Vec::new();
        let mut stack = vec![molecule_id];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(molecule) = self.molecules.get(id) {
                stack.extend(molecule.children.iter().rev().copied());
            }
        }
        order
    }

    fn link_atom(&mut self, molecule_id: MoleculeId, atom_id: AtomId) {
        if let Some(molecule) = self.molecules.get_mut(molecule_id) {
            molecule.atoms.push(atom_id);
        }
        for id in self.lineage(molecule_id) {
            if let Some(molecule) = self.molecules.get_mut(id) {
                molecule.all_atoms.push(atom_id);
                molecule.invalidate_bounds();
            }
        }
        self.all_atoms.push(atom_id);
        if let Some(atom) = self.atoms.get_mut(atom_id) {
            atom.parent = Some(molecule_id);
        }
    }

    fn unlink_atom(&mut self, atom_id: AtomId) {
        let Some(parent) = self.atoms.get_mut(atom_id).and_then(|atom| atom.parent.take()) else {
            return;
        };
        if let Some(molecule) = self.molecules.get_mut(parent) {
            molecule.atoms.retain(|&a| a != atom_id);
        }
        for id in self.lineage(parent) {
            if let Some(molecule) = self.molecules.get_mut(id) {
                molecule.all_atoms.retain(|&a| a != atom_id);
                molecule.invalidate_bounds();
            }
        }
        self.all_atoms.retain(|&a| a != atom_id);
    }

    fn link_bond(&mut self, molecule_id: MoleculeId, bond_id: BondId) {
        if let Some(molecule) = self.molecules.get_mut(molecule_id) {
            molecule.bonds.push(bond_id);
        }
        for id in self.lineage(molecule_id) {
            if let Some(molecule) = self.molecules.get_mut(id) {
                molecule.all_bonds.push(bond_id);
            }
        }
        self.all_bonds.push(bond_id);
        if let Some(bond) = self.bonds.get_mut(bond_id) {
            bond.parent = Some(molecule_id);
        }
    }

    fn unlink_bond(&mut self, bond_id: BondId) {
        let Some(parent) = self.bonds.get_mut(bond_id).and_then(|bond| bond.parent.take()) else {
            return;
        };
        if let Some(molecule) = self.molecules.get_mut(parent) {
            molecule.bonds.retain(|&b| b != bond_id);
        }
        for id in self.lineage(parent) {
            if let Some(molecule) = self.molecules.get_mut(id) {
                molecule.all_bonds.retain(|&b| b != bond_id);
            }
        }
        self.all_bonds.retain(|&b| b != bond_id);
    }

    /// Unhooks a molecule from its parent (or the top level), removing its members
    /// from the former ancestors' mirrors. The subtree itself is left intact.
    fn detach_molecule(&mut self, molecule_id: MoleculeId) {
        let Some(molecule) = self.molecules.get_mut(molecule_id) else {
            return;
        };
        let parent = molecule.parent.take();
        let atoms: HashSet<AtomId> = molecule.all_atoms.iter().copied().collect();
        let bonds: HashSet<BondId> = molecule.all_bonds.iter().copied().collect();

        match parent {
            Some(parent) => {
                if let Some(p) = self.molecules.get_mut(parent) {
                    p.children.retain(|&c| c != molecule_id);
                }
                for id in self.lineage(parent) {
                    if let Some(ancestor) = self.molecules.get_mut(id) {
                        ancestor.all_atoms.retain(|a| !atoms.contains(a));
                        ancestor.all_bonds.retain(|b| !bonds.contains(b));
                        ancestor.invalidate_bounds();
                    }
                }
            }
            None => self.roots.retain(|&r| r != molecule_id),
        }
    }

    fn attach_molecule(&mut self, parent: Option<MoleculeId>, molecule_id: MoleculeId) {
        let Some(molecule) = self.molecules.get_mut(molecule_id) else {
            return;
        };
        molecule.parent = parent;
        let atoms = molecule.all_atoms.clone();
        let bonds = molecule.all_bonds.clone();

        match parent {
            Some(parent) => {
                if let Some(p) = self.molecules.get_mut(parent) {
                    p.children.push(molecule_id);
                }
                for id in self.lineage(parent) {
                    if let Some(ancestor) = self.molecules.get_mut(id) {
                        ancestor.all_atoms.extend(&atoms);
                        ancestor.all_bonds.extend(&bonds);
                        ancestor.invalidate_bounds();
                    }
                }
            }
            None => self.roots.push(molecule_id),
        }
    }

    fn bounds_of(&self, atom_ids: &[AtomId]) -> Option<Rect> {
        atom_ids
            .iter()
            .filter_map(|&a| self.atoms.get(a))
            .map(|atom| atom.symbol_box(&self.metrics))
            .reduce(|acc, r| acc.union(&r))
    }

    fn mean_length_of(&self, bond_ids: &[BondId]) -> Option<f64> {
        let lengths: Vec<f64> = bond_ids.iter().filter_map(|&b| self.bond_length(b)).collect();
        if lengths.is_empty() {
            None
        } else {
            Some(lengths.iter().sum::<f64>() / lengths.len() as f64)
        }
    }

    fn formula_of(&self, atom_ids: &[AtomId]) -> Formula {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for &atom_id in atom_ids {
            let Some(atom) = self.atoms.get(atom_id) else {
                continue;
            };
            atom.element.accumulate_counts(1, &mut counts);
            let hydrogens = atom.implicit_hydrogen_count(self.bond_order_sum(atom_id));
            if hydrogens > 0 {
                *counts.entry("H".to_string()).or_default() += hydrogens as usize;
            }
        }
        Formula::from(counts)
    }
}

impl GraphContainer for Model {
    fn atom_ids(&self) -> &[AtomId] {
        &[]
    }

    fn bond_ids(&self) -> &[BondId] {
        &[]
    }

    fn all_atom_ids(&self) -> &[AtomId] {
        &self.all_atoms
    }

    fn all_bond_ids(&self) -> &[BondId] {
        &self.all_bonds
    }

    fn child_molecules(&self) -> &[MoleculeId] {
        &self.roots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::MoleculeName;
    use crate::test_support::{self, Fixture};

    fn sorted<T: Ord + Clone>(items: &[T]) -> Vec<T> {
        let mut v = items.to_vec();
        v.sort();
        v
    }

    fn carbon(model: &Model, x: f64, y: f64) -> Atom {
        Atom::new(model.registry().get("C").unwrap(), Point2::new(x, y))
    }

    mod membership {
        use super::*;

        #[test]
        fn inserted_atoms_and_bonds_are_mirrored_to_ancestors_and_model() {
            let mut model = Model::new(test_support::registry());
            let outer = model.add_molecule(None).unwrap();
            let inner = model.add_molecule(Some(outer)).unwrap();
            let a = model.insert_atom(inner, carbon(&model, 0.0, 0.0)).unwrap();
            let b = model.insert_atom(inner, carbon(&model, 1.0, 0.0)).unwrap();
            let bond = model.insert_bond(a, b, BondOrder::Single).unwrap();

            let inner_mol = model.molecule(inner).unwrap();
            assert_eq!(inner_mol.atom_ids(), &[a, b]);
            assert_eq!(inner_mol.bond_ids(), &[bond]);

            let outer_mol = model.molecule(outer).unwrap();
            assert!(outer_mol.atom_ids().is_empty());
            assert_eq!(outer_mol.all_atom_ids(), &[a, b]);
            assert_eq!(outer_mol.all_bond_ids(), &[bond]);
            assert_eq!(outer_mol.child_molecules(), &[inner]);

            assert!(model.contains_atom(a));
            assert!(model.contains_bond(bond));
            assert_eq!(model.atom_count(), 2);
            assert_eq!(model.bond_count(), 1);
            assert_eq!(model.atom(a).unwrap().parent(), Some(inner));
            assert_eq!(model.bond(bond).unwrap().parent(), Some(inner));
        }

        #[test]
        fn add_atom_is_idempotent() {
            let mut fx = test_support::hexane();
            let atom = fx.atoms[0];
            let changes = fx.model.add_atom(fx.molecule, atom).unwrap();
            assert!(changes.is_empty());
            assert_eq!(fx.model.molecule(fx.molecule).unwrap().atom_count(), 6);
        }

        #[test]
        fn removing_absent_entities_is_a_no_op() {
            let mut fx = test_support::hexane();
            let atom = fx.atoms[2];
            assert!(!fx.model.remove_atom(atom).is_empty());
            assert!(fx.model.remove_atom(atom).is_empty());
            let bond = fx.bonds[4];
            assert!(!fx.model.remove_bond(bond).is_empty());
            assert!(fx.model.remove_bond(bond).is_empty());
        }

        #[test]
        fn remove_atom_removes_incident_bonds_first() {
            let Fixture {
                mut model,
                molecule,
                atoms,
                bonds,
            } = test_support::hexane();
            let changes = model.remove_atom(atoms[1]);
            assert_eq!(sorted(&changes.bonds_removed), sorted(&[bonds[0], bonds[1]]));
            assert_eq!(changes.atoms_removed, vec![atoms[1]]);
            assert!(model.atom(atoms[0]).unwrap().bonds().is_empty());
            assert_eq!(model.atom(atoms[2]).unwrap().bonds(), &[bonds[2]]);
            let mol = model.molecule(molecule).unwrap();
            assert_eq!(mol.atom_count(), 5);
            assert_eq!(mol.bond_count(), 3);
            assert_eq!(model.atom_count(), 5);
        }

        #[test]
        fn every_atom_lists_exactly_its_incident_bonds() {
            let fx = test_support::naphthalene();
            for (atom_id, atom) in fx.model.atoms_iter() {
                for (bond_id, bond) in fx.model.bonds_iter() {
                    assert_eq!(atom.bonds().contains(&bond_id), bond.contains(atom_id));
                }
            }
        }
    }

    mod bonds {
        use super::*;

        #[test]
        fn self_loop_is_rejected() {
            let mut fx = test_support::hexane();
            let err = fx.model.create_bond(fx.atoms[0], fx.atoms[0], BondOrder::Single).unwrap_err();
            assert_eq!(err, GraphError::SelfLoop(fx.atoms[0]));
        }

        #[test]
        fn duplicate_pair_returns_existing_bond() {
            let mut fx = test_support::hexane();
            let again = fx
                .model
                .insert_bond(fx.atoms[1], fx.atoms[0], BondOrder::Double)
                .unwrap();
            assert_eq!(again, fx.bonds[0]);
            assert_eq!(fx.model.bond(again).unwrap().order, BondOrder::Single);
            assert_eq!(fx.model.molecule(fx.molecule).unwrap().bond_count(), 5);
        }

        #[test]
        fn insert_bond_from_detached_atom_fails() {
            let mut model = Model::new(test_support::registry());
            let a = model.create_atom(carbon(&model, 0.0, 0.0));
            let b = model.create_atom(carbon(&model, 1.0, 0.0));
            assert_eq!(
                model.insert_bond(a, b, BondOrder::Single).unwrap_err(),
                GraphError::DetachedAtom(a)
            );
        }

        #[test]
        fn bonding_two_molecules_merges_them() {
            let mut model = Model::new(test_support::registry());
            let m1 = model.add_molecule(None).unwrap();
            let m2 = model.add_molecule(None).unwrap();
            let a = model.insert_atom(m1, carbon(&model, 0.0, 0.0)).unwrap();
            let b = model.insert_atom(m2, carbon(&model, 1.0, 0.0)).unwrap();
            let c = model.insert_atom(m2, carbon(&model, 2.0, 0.0)).unwrap();
            model.insert_bond(b, c, BondOrder::Single).unwrap();
            model
                .molecule_mut(m2)
                .unwrap()
                .names
                .push(MoleculeName { id: String::new(), value: "ethane".into() });

            let bridge = model.create_bond(a, b, BondOrder::Double).unwrap();
            let changes = model.add_bond(m1, bridge).unwrap();

            assert_eq!(changes.molecules_removed, vec![m2]);
            assert_eq!(changes.bonds_added, vec![bridge]);
            assert!(model.molecule(m2).is_none());
            assert_eq!(model.roots(), &[m1]);
            let merged = model.molecule(m1).unwrap();
            assert_eq!(merged.atom_count(), 3);
            assert_eq!(merged.bond_count(), 2);
            assert_eq!(merged.names.len(), 1);
            assert_eq!(model.atom(c).unwrap().parent(), Some(m1));
        }
    }

    mod hierarchy {
        use super::*;

        #[test]
        fn nesting_a_molecule_inside_its_descendant_is_rejected() {
            let mut model = Model::new(test_support::registry());
            let outer = model.add_molecule(None).unwrap();
            let inner = model.add_molecule(Some(outer)).unwrap();
            assert_eq!(
                model.add_child_molecule(inner, outer).unwrap_err(),
                GraphError::NestingCycle { parent: inner, child: outer }
            );
            assert_eq!(
                model.add_child_molecule(outer, outer).unwrap_err(),
                GraphError::NestingCycle { parent: outer, child: outer }
            );
        }

        #[test]
        fn reparenting_moves_members_between_ancestor_mirrors() {
            let mut fx = test_support::benzene();
            let group_a = fx.model.add_molecule(None).unwrap();
            let group_b = fx.model.add_molecule(None).unwrap();

            fx.model.add_child_molecule(group_a, fx.molecule).unwrap();
            assert_eq!(fx.model.molecule(group_a).unwrap().atom_count(), 6);
            assert_eq!(fx.model.roots(), &[group_a, group_b]);

            fx.model.add_child_molecule(group_b, fx.molecule).unwrap();
            assert_eq!(fx.model.molecule(group_a).unwrap().atom_count(), 0);
            assert_eq!(fx.model.molecule(group_b).unwrap().atom_count(), 6);
            assert_eq!(fx.model.molecule(group_b).unwrap().bond_count(), 6);
            assert_eq!(fx.model.atom_count(), 6);
        }

        #[test]
        fn removing_a_child_molecule_removes_its_members_everywhere() {
            let mut fx = test_support::benzene();
            let group = fx.model.add_molecule(None).unwrap();
            fx.model.add_child_molecule(group, fx.molecule).unwrap();

            let changes = fx.model.remove_child_molecule(fx.molecule);
            assert_eq!(changes.atoms_removed.len(), 6);
            assert_eq!(changes.bonds_removed.len(), 6);
            assert_eq!(changes.molecules_removed, vec![fx.molecule]);
            assert_eq!(fx.model.molecule(group).unwrap().atom_count(), 0);
            assert!(fx.model.molecule(group).unwrap().child_molecules().is_empty());
            assert_eq!(fx.model.atom_count(), 0);
            assert!(fx.model.atom(fx.atoms[0]).is_none());
        }
    }

    mod queries {
        use super::*;

        #[test]
        fn formula_includes_implicit_hydrogens() {
            assert_eq!(test_support::benzene().model.formula().to_string(), "C6H6");
            assert_eq!(test_support::hexane().model.formula().to_string(), "C6H14");
            let fx = test_support::naphthalene();
            assert_eq!(
                fx.model.calculated_formula(fx.molecule).unwrap().to_string(),
                "C10H8"
            );
        }

        #[test]
        fn formula_expands_functional_groups() {
            let mut fx = test_support::benzene();
            let carboxyl = fx.model.registry().get("CO2H").unwrap();
            let pos = Point2::new(3.0, 0.0);
            let group = fx.model.insert_atom(fx.molecule, Atom::new(carboxyl, pos)).unwrap();
            fx.model.insert_bond(fx.atoms[0], group, BondOrder::Single).unwrap();
            assert_eq!(fx.model.formula().to_string(), "C7H6O2");
        }

        #[test]
        fn neighbours_and_bond_lengths() {
            let fx = test_support::benzene();
            let neighbours = fx.model.neighbours(fx.atoms[0]);
            assert_eq!(sorted(&neighbours), sorted(&[fx.atoms[1], fx.atoms[5]]));
            let mean = fx.model.molecule_mean_bond_length(fx.molecule).unwrap();
            assert!((mean - 1.0).abs() < 1e-9);
            assert!((fx.model.mean_bond_length().unwrap() - 1.0).abs() < 1e-9);
            assert_eq!(fx.model.implicit_hydrogen_count(fx.atoms[0]), Some(1));
            assert_eq!(fx.model.bond_between(fx.atoms[0], fx.atoms[3]), None);
        }

        #[test]
        fn convex_hull_of_a_ring_is_the_ring() {
            let fx = test_support::benzene();
            assert_eq!(fx.model.convex_hull(fx.molecule).len(), 6);
        }

        #[test]
        fn bounding_box_cache_follows_atom_moves() {
            let mut fx = test_support::hexane();
            let before = fx.model.molecule_bounding_box(fx.molecule).unwrap();
            fx.model.move_atom(fx.atoms[5], Point2::new(100.0, 0.0)).unwrap();
            let after = fx.model.molecule_bounding_box(fx.molecule).unwrap();
            assert!(after.max.x > before.max.x);
            assert_eq!(after.max.x, 100.0);
            assert_eq!(fx.model.bounding_box(), Some(after));
        }

        #[test]
        fn bounding_box_includes_label_extent() {
            let mut fx = test_support::hexane();
            let metrics = SymbolMetrics { font_size: 10.0, char_aspect: 0.5 };
            fx.model.set_metrics(metrics);
            let plain = fx.model.molecule_bounding_box(fx.molecule).unwrap();

            let oxygen = fx.model.registry().get("O").unwrap();
            fx.model.atom_mut(fx.atoms[0]).unwrap().element = oxygen;
            let labelled = fx.model.molecule_bounding_box(fx.molecule).unwrap();
            assert!(labelled.height() > plain.height());
        }
    }

    mod labels_and_clones {
        use super::*;

        #[test]
        fn relabel_numbers_everything_depth_first() {
            let mut fx = test_support::hexane();
            fx.model
                .molecule_mut(fx.molecule)
                .unwrap()
                .names
                .push(MoleculeName { id: String::new(), value: "hexane".into() });
            fx.model.relabel(true);

            let mol = fx.model.molecule(fx.molecule).unwrap();
            assert_eq!(mol.label, "m1");
            assert_eq!(mol.names[0].id, "m1.n1");
            let atom_labels: Vec<&str> = fx
                .atoms
                .iter()
                .map(|&a| fx.model.atom(a).unwrap().label.as_str())
                .collect();
            assert_eq!(atom_labels, ["a1", "a2", "a3", "a4", "a5", "a6"]);
            assert_eq!(fx.model.bond(fx.bonds[4]).unwrap().label, "b5");
        }

        #[test]
        fn relabel_without_names_keeps_name_ids() {
            let mut fx = test_support::hexane();
            fx.model
                .molecule_mut(fx.molecule)
                .unwrap()
                .names
                .push(MoleculeName { id: "custom".into(), value: "hexane".into() });
            fx.model.relabel(false);
            assert_eq!(fx.model.molecule(fx.molecule).unwrap().names[0].id, "custom");
        }

        #[test]
        fn clone_is_a_deep_copy_that_keeps_ids() {
            let fx = test_support::benzene();
            let mut copy = fx.model.clone();
            copy.remove_atom(fx.atoms[0]);
            assert!(copy.atom(fx.atoms[0]).is_none());
            assert!(fx.model.atom(fx.atoms[0]).is_some());
            assert_eq!(copy.atom(fx.atoms[1]).unwrap().position(), fx.model.atom(fx.atoms[1]).unwrap().position());
        }

        #[test]
        fn clear_molecules_leaves_atoms_unparented() {
            let mut fx = test_support::benzene();
            let changes = fx.model.clear_molecules();
            assert_eq!(changes.molecules_removed, vec![fx.molecule]);
            assert!(fx.model.roots().is_empty());
            assert_eq!(fx.model.atom_count(), 0);
            assert!(fx.model.atoms_iter().all(|(_, a)| a.parent().is_none()));
            assert_eq!(fx.model.atom(fx.atoms[0]).unwrap().degree(), 2);
        }
    }
}

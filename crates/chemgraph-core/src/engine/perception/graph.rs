use crate::core::models::container::GraphContainer;
use crate::core::models::ids::{AtomId, BondId, MoleculeId};
use crate::core::models::model::Model;
use itertools::Itertools;
use std::collections::HashMap;

/// Dense, index-based copy of one molecule's direct atoms and bonds.
///
/// Ring perception runs on small integer indices; `atom_keys`/`bond_keys` map them
/// back to model ids when rings are attached.
#[derive(Debug, Clone, Default)]
pub struct RingGraph {
    pub(crate) atom_keys: Vec<AtomId>,
    pub(crate) bond_keys: Vec<BondId>,
    pub(crate) edges: Vec<(usize, usize)>,
    pub(crate) adjacency: Vec<Vec<(usize, usize)>>,
}

impl RingGraph {
    /// Bonds with an endpoint outside the molecule's direct atoms are ignored.
    pub fn from_molecule(model: &Model, molecule_id: MoleculeId) -> Option<Self> {
        let molecule = model.molecule(molecule_id)?;
        let atom_keys: Vec<AtomId> = molecule.atom_ids().to_vec();
        let index: HashMap<AtomId, usize> = atom_keys.iter().enumerate().map(|(i, &a)| (a, i)).collect();

        let mut bond_keys = Vec::with_capacity(molecule.bond_ids().len());
        let mut edges = Vec::with_capacity(molecule.bond_ids().len());
        for &bond_id in molecule.bond_ids() {
            let Some(bond) = model.bond(bond_id) else {
                continue;
            };
            let (Some(&u), Some(&v)) = (index.get(&bond.start()), index.get(&bond.end())) else {
                continue;
            };
            bond_keys.push(bond_id);
            edges.push((u, v));
        }

        let mut graph = Self::from_edges(atom_keys.len(), &edges);
        graph.atom_keys = atom_keys;
        graph.bond_keys = bond_keys;
        Some(graph)
    }

    /// A graph over `n` anonymous atoms; edge `k` joins `edges[k]`.
    pub(crate) fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut adjacency = vec![Vec::new(); n];
        for (k, &(u, v)) in edges.iter().enumerate() {
            adjacency[u].push((v, k));
            adjacency[v].push((u, k));
        }
        Self {
            atom_keys: vec![AtomId::default(); n],
            bond_keys: vec![BondId::default(); edges.len()],
            edges: edges.to_vec(),
            adjacency,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn bond_count(&self) -> usize {
        self.edges.len()
    }

    /// `(neighbour, edge)` pairs of atom `i`.
    pub fn neighbours(&self, i: usize) -> &[(usize, usize)] {
        &self.adjacency[i]
    }

    pub fn edge_between(&self, u: usize, v: usize) -> Option<usize> {
        self.adjacency[u]
            .iter()
            .find(|&&(n, _)| n == v)
            .map(|&(_, e)| e)
    }

    /// Number of connected components among the atoms for which `include` holds.
    pub fn component_count(&self, include: impl Fn(usize) -> bool) -> usize {
        let mut seen = vec![false; self.atom_count()];
        let mut count = 0;
        for start in 0..self.atom_count() {
            if seen[start] || !include(start) {
                continue;
            }
            count += 1;
            seen[start] = true;
            let mut stack = vec![start];
            while let Some(u) = stack.pop() {
                for &(v, _) in &self.adjacency[u] {
                    if !seen[v] && include(v) {
                        seen[v] = true;
                        stack.push(v);
                    }
                }
            }
        }
        count
    }
}

/// A cycle over graph indices in canonical orientation.
///
/// `atoms` starts at the smallest index and runs toward the smaller of its two
/// neighbours; `bonds[i]` joins `atoms[i]` and `atoms[(i + 1) % len]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RingPath {
    pub atoms: Vec<usize>,
    pub bonds: Vec<usize>,
}

impl RingPath {
    /// Canonicalizes a cyclic atom sequence and resolves its bonds.
    ///
    /// Returns `None` for fewer than three atoms or if two consecutive atoms are
    /// not bonded.
    pub fn from_cycle(graph: &RingGraph, cycle: &[usize]) -> Option<Self> {
        let len = cycle.len();
        if len < 3 {
            return None;
        }
        let min_pos = cycle
            .iter()
            .enumerate()
            .min_by_key(|&(_, &atom)| atom)
            .map(|(i, _)| i)?;
        let mut atoms: Vec<usize> = (0..len).map(|i| cycle[(min_pos + i) % len]).collect();
        if atoms[1] > atoms[len - 1] {
            atoms[1..].reverse();
        }

        let bonds = atoms
            .iter()
            .circular_tuple_windows()
            .map(|(&u, &v)| graph.edge_between(u, v))
            .collect::<Option<Vec<usize>>>()?;
        Some(Self { atoms, bonds })
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn square() -> RingGraph {
        RingGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)])
    }

    #[test]
    fn from_molecule_maps_ids_to_indices() {
        let fx = test_support::naphthalene();
        let graph = RingGraph::from_molecule(&fx.model, fx.molecule).unwrap();
        assert_eq!(graph.atom_count(), 10);
        assert_eq!(graph.bond_count(), 11);
        assert_eq!(graph.atom_keys, fx.atoms);
        assert_eq!(graph.bond_keys, fx.bonds);
        assert_eq!(graph.neighbours(4).len(), 3);
        assert_eq!(graph.edge_between(4, 5), Some(4));
        assert_eq!(graph.edge_between(0, 3), None);
    }

    #[test]
    fn component_count_respects_filter() {
        let graph = RingGraph::from_edges(5, &[(0, 1), (1, 2), (3, 4)]);
        assert_eq!(graph.component_count(|_| true), 2);
        assert_eq!(graph.component_count(|i| i != 1), 3);
        assert_eq!(graph.component_count(|_| false), 0);
    }

    #[test]
    fn ring_path_is_canonical_regardless_of_start_and_direction() {
        let graph = square();
        let a = RingPath::from_cycle(&graph, &[2, 3, 0, 1]).unwrap();
        let b = RingPath::from_cycle(&graph, &[1, 0, 3, 2]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.atoms, vec![0, 1, 2, 3]);
        assert_eq!(a.bonds, vec![0, 1, 2, 3]);
    }

    #[test]
    fn ring_path_rejects_broken_or_short_cycles() {
        let graph = square();
        assert!(RingPath::from_cycle(&graph, &[0, 2, 1, 3]).is_none());
        assert!(RingPath::from_cycle(&graph, &[0, 1]).is_none());
    }
}

use super::graph::RingGraph;

/// The cyclic core of a graph: atoms that survive side-chain pruning.
///
/// An atom is pruned when fewer than two of its neighbours are still active;
/// pruning cascades until a fixed point. `degree` tracks the number of active
/// neighbours of every atom.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    active: Vec<bool>,
    degree: Vec<usize>,
}

impl WorkingSet {
    pub fn prune(graph: &RingGraph) -> Self {
        let n = graph.atom_count();
        let mut set = Self {
            active: vec![true; n],
            degree: (0..n).map(|i| graph.neighbours(i).len()).collect(),
        };
        let stale: Vec<usize> = (0..n).filter(|&i| set.degree[i] < 2).collect();
        set.cascade(graph, stale);
        set
    }

    pub fn is_active(&self, i: usize) -> bool {
        self.active[i]
    }

    pub fn degree(&self, i: usize) -> usize {
        self.degree[i]
    }

    pub fn len(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.active.iter().any(|&a| a)
    }

    pub fn active_atoms(&self) -> Vec<usize> {
        (0..self.active.len()).filter(|&i| self.active[i]).collect()
    }

    /// Active atom with the most active neighbours; ties go to the lowest index.
    pub fn highest_degree_atom(&self) -> Option<usize> {
        self.active_atoms()
            .into_iter()
            .rev()
            .max_by_key(|&i| self.degree[i])
    }

    /// Deactivates `atoms` without re-pruning their neighbours.
    ///
    /// Atoms left with fewer than two active neighbours stay active; the single-ring
    /// search may still start from them and close a ring through inactive atoms.
    pub fn remove(&mut self, graph: &RingGraph, atoms: &[usize]) {
        for &i in atoms {
            if !self.active[i] {
                continue;
            }
            self.active[i] = false;
            for &(j, _) in graph.neighbours(i) {
                if self.active[j] {
                    self.degree[j] -= 1;
                }
            }
        }
    }

    fn cascade(&mut self, graph: &RingGraph, mut stack: Vec<usize>) {
        while let Some(i) = stack.pop() {
            if !self.active[i] {
                continue;
            }
            self.active[i] = false;
            for &(j, _) in graph.neighbours(i) {
                if !self.active[j] {
                    continue;
                }
                self.degree[j] -= 1;
                if self.degree[j] < 2 {
                    stack.push(j);
                }
            }
        }
    }
}

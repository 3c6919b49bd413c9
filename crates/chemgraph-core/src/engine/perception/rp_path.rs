use super::bitset::{BondSet, CycleBasis};
use super::graph::{RingGraph, RingPath};
use super::pruning::WorkingSet;
use tracing::{trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One row of the path-included distance matrices.
///
/// `paths[j]` holds every shortest `i -> j` path as a set of bonds; `plus[j]` holds
/// the paths exactly one bond longer.
#[derive(Debug, Clone)]
struct Row {
    dist: Vec<usize>,
    paths: Vec<Vec<BondSet>>,
    plus: Vec<Vec<BondSet>>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    size: usize,
    i: usize,
    j: usize,
}

/// The working set re-indexed densely so the matrices stay `n x n`.
struct Core {
    atoms: Vec<usize>,
    edges: Vec<(usize, usize)>,
}

impl Core {
    fn new(graph: &RingGraph, working: &WorkingSet) -> Self {
        let atoms = working.active_atoms();
        let mut local = vec![None; graph.atom_count()];
        for (index, &atom) in atoms.iter().enumerate() {
            local[atom] = Some(index);
        }
        let edges = graph
            .edges
            .iter()
            .filter_map(|&(u, v)| Some((local[u]?, local[v]?)))
            .collect();
        Self { atoms, edges }
    }

    /// Walks a bond set as a cycle, returning its atoms in order.
    ///
    /// `None` unless every touched atom has exactly two bonds in the set and the
    /// bonds form a single loop.
    fn trace_cycle(&self, ring: &BondSet) -> Option<Vec<usize>> {
        let bonds: Vec<usize> = ring.iter_ones().collect();
        let mut incident: Vec<Vec<(usize, usize)>> = vec![Vec::new(); self.atoms.len()];
        for &e in &bonds {
            let (u, v) = self.edges[e];
            incident[u].push((v, e));
            incident[v].push((u, e));
        }
        if incident.iter().any(|list| !list.is_empty() && list.len() != 2) {
            return None;
        }

        let &first = bonds.first()?;
        let start = self.edges[first].0;
        let mut cycle = vec![start];
        let (mut current, mut via) = (start, usize::MAX);
        loop {
            let &(next, edge) = incident[current].iter().find(|&&(_, e)| e != via)?;
            if next == start {
                break;
            }
            cycle.push(next);
            current = next;
            via = edge;
            if cycle.len() > bonds.len() {
                return None;
            }
        }
        (cycle.len() == bonds.len()).then_some(cycle)
    }
}

/// Smallest set of smallest rings of the working set, by the RP-Path method.
///
/// Builds the path-included distance matrices over the cyclic core, derives a
/// candidate ring for every atom pair with more than one shortest path or a path
/// one bond longer, and accepts candidates smallest first while they stay
/// linearly independent over GF(2). Returns what it found if the cycle rank is
/// not reached.
pub fn find_rings(graph: &RingGraph, working: &WorkingSet) -> Vec<RingPath> {
    let core = Core::new(graph, working);
    let n = core.atoms.len();
    let m = core.edges.len();
    let components = graph.component_count(|i| working.is_active(i));
    let expected = (m + components).saturating_sub(n);
    if expected == 0 {
        return Vec::new();
    }

    let rows = relax(&core);
    let candidates = candidates(&rows, m);

    let mut basis = CycleBasis::new();
    let mut accepted: Vec<BondSet> = Vec::new();
    let mut rings = Vec::new();
    'candidates: for candidate in candidates {
        let shortest = &rows[candidate.i].paths[candidate.j];
        let longer = &rows[candidate.i].plus[candidate.j];
        let combined: Vec<BondSet> = if candidate.size % 2 == 1 {
            longer.iter().map(|q| shortest[0].union(q)).collect()
        } else {
            shortest.windows(2).map(|w| w[0].union(&w[1])).collect()
        };

        for ring in combined {
            if ring.count() != candidate.size {
                continue;
            }
            if accepted.iter().any(|a| ring.is_superset_of(a)) {
                continue;
            }
            let Some(cycle) = core.trace_cycle(&ring) else {
                continue;
            };
            if !basis.try_insert(&ring) {
                continue;
            }
            let atoms: Vec<usize> = cycle.iter().map(|&local| core.atoms[local]).collect();
            let Some(path) = RingPath::from_cycle(graph, &atoms) else {
                continue;
            };
            trace!(size = candidate.size, i = candidate.i, j = candidate.j, "SSSR ring accepted");
            accepted.push(ring);
            rings.push(path);
            if rings.len() == expected {
                break 'candidates;
            }
        }
    }

    if rings.len() < expected {
        warn!(
            found = rings.len(),
            expected, "RP-Path found fewer rings than the cycle rank; keeping the partial set"
        );
    }
    rings
}

fn relax(core: &Core) -> Vec<Row> {
    let n = core.atoms.len();
    let m = core.edges.len();
    let inf = 2 * m + 1;

    let mut rows: Vec<Row> = (0..n)
        .map(|i| {
            let mut dist = vec![inf; n];
            dist[i] = 0;
            Row {
                dist,
                paths: vec![Vec::new(); n],
                plus: vec![Vec::new(); n],
            }
        })
        .collect();
    for (e, &(u, v)) in core.edges.iter().enumerate() {
        for (a, b) in [(u, v), (v, u)] {
            rows[a].dist[b] = 1;
            rows[a].paths[b] = vec![BondSet::single(m, e)];
        }
    }

    // Row k is read by every row within one pass; column k of row i is never
    // written while k is the pivot, so rows can be relaxed independently.
    for k in 0..n {
        let pivot = rows[k].clone();

        #[cfg(not(feature = "parallel"))]
        let iterator = rows.iter_mut().enumerate();

        #[cfg(feature = "parallel")]
        let iterator = rows.par_iter_mut().enumerate();

        iterator.for_each(|(i, row)| relax_row(i, k, row, &pivot, inf));
    }
    rows
}

fn relax_row(i: usize, k: usize, row: &mut Row, pivot: &Row, inf: usize) {
    if i == k || row.dist[k] >= inf {
        return;
    }
    let to_pivot = row.dist[k];
    let left = row.paths[k].clone();

    for j in 0..row.dist.len() {
        if j == i || j == k || pivot.dist[j] >= inf {
            continue;
        }
        let through = to_pivot + pivot.dist[j];
        let current = row.dist[j];

        if current > through {
            if current < inf && current == through + 1 {
                row.plus[j] = std::mem::take(&mut row.paths[j]);
            } else {
                row.plus[j].clear();
            }
            row.dist[j] = through;
            row.paths[j] = product(&left, &pivot.paths[j]);
        } else if current == through {
            for path in product(&left, &pivot.paths[j]) {
                push_unique(&mut row.paths[j], path);
            }
        } else if current + 1 == through {
            for path in product(&left, &pivot.paths[j]) {
                push_unique(&mut row.plus[j], path);
            }
        }
    }
}

fn product(left: &[BondSet], right: &[BondSet]) -> Vec<BondSet> {
    let mut out = Vec::with_capacity(left.len() * right.len());
    for a in left {
        for b in right {
            push_unique(&mut out, a.union(b));
        }
    }
    out
}

fn push_unique(list: &mut Vec<BondSet>, path: BondSet) {
    if !list.contains(&path) {
        list.push(path);
    }
}

/// Ring candidates in ascending size; equal sizes keep pair order.
fn candidates(rows: &[Row], m: usize) -> Vec<Candidate> {
    let inf = 2 * m + 1;
    let n = rows.len();
    let mut out = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let d = rows[i].dist[j];
            if d == 0 || d >= inf {
                continue;
            }
            if rows[i].paths[j].len() > 1 {
                out.push(Candidate { size: 2 * d, i, j });
            }
            if !rows[i].plus[j].is_empty() {
                out.push(Candidate { size: 2 * d + 1, i, j });
            }
        }
    }
    out.sort_by_key(|c| c.size);
    out
}

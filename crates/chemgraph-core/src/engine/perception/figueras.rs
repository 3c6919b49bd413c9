use super::graph::{RingGraph, RingPath};
use super::pruning::WorkingSet;
use std::collections::VecDeque;
use tracing::trace;

/// Breadth-first search for a small ring through `start`.
///
/// Every reached atom remembers the path it was reached by. When two paths meet
/// and share nothing but `start`, their union is the ring. The search walks the
/// whole graph, so rings closing through atoms already claimed by an earlier ring
/// are still found.
pub fn find_ring(graph: &RingGraph, start: usize) -> Option<RingPath> {
    let mut paths: Vec<Option<Vec<usize>>> = vec![None; graph.atom_count()];
    paths[start] = Some(vec![start]);

    let mut queue = VecDeque::new();
    for &(neighbour, _) in graph.neighbours(start) {
        if paths[neighbour].is_none() {
            paths[neighbour] = Some(vec![start, neighbour]);
            queue.push_back((neighbour, start));
        }
    }

    while let Some((current, source)) = queue.pop_front() {
        let Some(here) = paths[current].clone() else {
            continue;
        };
        for &(m, _) in graph.neighbours(current) {
            if m == source {
                continue;
            }
            match &paths[m] {
                None => {
                    let mut extended = here.clone();
                    extended.push(m);
                    paths[m] = Some(extended);
                    queue.push_back((m, current));
                }
                Some(other) => {
                    let overlap = here.iter().filter(|atom| other.contains(atom)).count();
                    if overlap == 1 {
                        let cycle: Vec<usize> = here
                            .iter()
                            .chain(other[1..].iter().rev())
                            .copied()
                            .collect();
                        return RingPath::from_cycle(graph, &cycle);
                    }
                }
            }
        }
    }
    None
}

/// Strips rings off the working set one at a time.
///
/// Starts from the active atom with the most active neighbours, takes the ring
/// found through it, and deactivates that ring's atoms. Fast, but on bridged
/// systems the result need not be a smallest set of smallest rings.
pub fn find_rings(graph: &RingGraph, working: &mut WorkingSet) -> Vec<RingPath> {
    let mut rings: Vec<RingPath> = Vec::new();
    while let Some(start) = working.highest_degree_atom() {
        match find_ring(graph, start) {
            Some(ring) => {
                working.remove(graph, &ring.atoms);
                if !rings.contains(&ring) {
                    trace!(start, size = ring.len(), "Figueras ring found");
                    rings.push(ring);
                }
            }
            None => working.remove(graph, &[start]),
        }
    }
    rings
}

use crate::core::elements::ElementRegistry;
use crate::core::models::atom::Atom;
use crate::core::models::bond::BondOrder;
use crate::core::models::ids::{AtomId, BondId, MoleculeId};
use crate::core::models::model::Model;
use nalgebra::Point2;
use std::f64::consts::PI;
use std::sync::Arc;

/// A single-molecule model with atoms and bonds in creation order.
pub(crate) struct Fixture {
    pub model: Model,
    pub molecule: MoleculeId,
    pub atoms: Vec<AtomId>,
    pub bonds: Vec<BondId>,
}

pub(crate) fn registry() -> Arc<ElementRegistry> {
    Arc::new(ElementRegistry::builtin())
}

/// Builds an all-carbon molecule from coordinates and `(start, end, order)` edges.
pub(crate) fn build(positions: &[(f64, f64)], edges: &[(usize, usize, BondOrder)]) -> Fixture {
    let registry = registry();
    let carbon = registry.get("C").unwrap();
    let mut model = Model::new(registry);
    let molecule = model.add_molecule(None).unwrap();
    let atoms: Vec<AtomId> = positions
        .iter()
        .map(|&(x, y)| {
            model
                .insert_atom(molecule, Atom::new(carbon.clone(), Point2::new(x, y)))
                .unwrap()
        })
        .collect();
    let bonds = edges
        .iter()
        .map(|&(a, b, order)| model.insert_bond(atoms[a], atoms[b], order).unwrap())
        .collect();
    Fixture {
        model,
        molecule,
        atoms,
        bonds,
    }
}

/// Vertices of a regular polygon with unit sides, first vertex at `start_angle`.
pub(crate) fn polygon(n: usize, center: (f64, f64), start_angle: f64) -> Vec<(f64, f64)> {
    let radius = 1.0 / (2.0 * (PI / n as f64).sin());
    (0..n)
        .map(|k| {
            let angle = start_angle + 2.0 * PI * k as f64 / n as f64;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

fn cycle_edges(offset: usize, n: usize, orders: impl Fn(usize) -> BondOrder) -> Vec<(usize, usize, BondOrder)> {
    (0..n)
        .map(|k| (offset + k, offset + (k + 1) % n, orders(k)))
        .collect()
}

pub(crate) fn cycle(n: usize) -> Fixture {
    build(&polygon(n, (0.0, 0.0), 0.0), &cycle_edges(0, n, |_| BondOrder::Single))
}

/// Kekulé benzene: bonds alternate double/single starting with a double.
pub(crate) fn benzene() -> Fixture {
    build(
        &polygon(6, (0.0, 0.0), 0.0),
        &cycle_edges(0, 6, |k| if k % 2 == 0 { BondOrder::Double } else { BondOrder::Single }),
    )
}

pub(crate) fn hexane() -> Fixture {
    let positions: Vec<(f64, f64)> = (0..6)
        .map(|k| (k as f64 * 0.866, if k % 2 == 0 { 0.0 } else { 0.5 }))
        .collect();
    let edges: Vec<_> = (0..5).map(|k| (k, k + 1, BondOrder::Single)).collect();
    build(&positions, &edges)
}

/// Two hexagons fused on the bond between atoms 4 and 5 (eleven bonds, that one
/// shared).
pub(crate) fn naphthalene() -> Fixture {
    let h = 3f64.sqrt() / 2.0;
    let positions = [
        (0.0, 1.0),
        (-h, 0.5),
        (-h, -0.5),
        (0.0, -1.0),
        (h, -0.5),
        (h, 0.5),
        (2.0 * h, -1.0),
        (3.0 * h, -0.5),
        (3.0 * h, 0.5),
        (2.0 * h, 1.0),
    ];
    let d = BondOrder::Double;
    let s = BondOrder::Single;
    let edges = [
        (0, 1, d),
        (1, 2, s),
        (2, 3, d),
        (3, 4, s),
        (4, 5, d),
        (5, 0, s),
        (4, 6, s),
        (6, 7, d),
        (7, 8, s),
        (8, 9, d),
        (9, 5, s),
    ];
    build(&positions, &edges)
}

/// Two benzene rings (atoms 0..6 and 6..12) joined by the last bond, 0-9.
pub(crate) fn biphenyl() -> Fixture {
    let mut positions = polygon(6, (0.0, 0.0), 0.0);
    positions.extend(polygon(6, (3.0, 0.0), 0.0));
    let alternate = |k: usize| if k % 2 == 0 { BondOrder::Double } else { BondOrder::Single };
    let mut edges = cycle_edges(0, 6, alternate);
    edges.extend(cycle_edges(6, 6, alternate));
    edges.push((0, 9, BondOrder::Single));
    build(&positions, &edges)
}

/// The cube graph: eight atoms, twelve bonds, five independent four-rings.
pub(crate) fn cubane() -> Fixture {
    let positions = [
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 2.0),
        (0.0, 2.0),
        (0.5, 0.5),
        (1.5, 0.5),
        (1.5, 1.5),
        (0.5, 1.5),
    ];
    let mut edges = cycle_edges(0, 4, |_| BondOrder::Single);
    edges.extend(cycle_edges(4, 4, |_| BondOrder::Single));
    edges.extend((0..4).map(|k| (k, k + 4, BondOrder::Single)));
    build(&positions, &edges)
}

/// Spiro[5.5]undecane: two cyclohexanes sharing atom 0.
pub(crate) fn spiro() -> Fixture {
    let mut positions = polygon(6, (-1.0, 0.0), 0.0);
    positions.extend(polygon(6, (1.0, 0.0), PI).into_iter().skip(1));
    let mut edges = cycle_edges(0, 6, |_| BondOrder::Single);
    edges.extend([
        (0, 6, BondOrder::Single),
        (6, 7, BondOrder::Single),
        (7, 8, BondOrder::Single),
        (8, 9, BondOrder::Single),
        (9, 10, BondOrder::Single),
        (10, 0, BondOrder::Single),
    ]);
    build(&positions, &edges)
}

/// Bicyclo[2.2.1]heptane: bridgeheads 0 and 3, one-carbon bridge 6.
pub(crate) fn norbornane() -> Fixture {
    let positions = [
        (0.0, 0.0),
        (1.0, -1.0),
        (2.0, -1.0),
        (3.0, 0.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.5, 0.0),
    ];
    let s = BondOrder::Single;
    let edges = [
        (0, 1, s),
        (1, 2, s),
        (2, 3, s),
        (3, 4, s),
        (4, 5, s),
        (5, 0, s),
        (0, 6, s),
        (6, 3, s),
    ];
    build(&positions, &edges)
}

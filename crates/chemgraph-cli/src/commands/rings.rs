use crate::cli::RingsArgs;
use crate::config::{AppConfig, PartialAppConfig};
use crate::error::Result;
use chemgraph::engine::perception::ordering::rings_for_double_bond_placement;
use chemgraph::engine::perception::rebuild_all_rings;
use chemgraph::engine::placement::assign_ring_placements;
use chemgraph::{GraphContainer, Model, RingPlacement};
use std::fmt::Write;
use tracing::info;

pub fn run(args: RingsArgs) -> Result<()> {
    let config = PartialAppConfig::load(args.input.config.as_deref())?.merge_with_cli(&args)?;
    let mut model = super::load_model(&args.input, &config)?;
    let report = report(&mut model, &config, args.placements)?;
    print!("{report}");
    Ok(())
}

/// Perceives rings in every molecule and renders them, one block per molecule.
pub fn report(model: &mut Model, config: &AppConfig, placements: bool) -> Result<String> {
    let total = rebuild_all_rings(model, &config.perception)?;
    info!(rings = total, algorithm = ?config.perception.algorithm, "Ring perception finished");

    let mut out = String::new();
    let roots = model.roots().to_vec();
    for (index, &molecule_id) in roots.iter().enumerate() {
        if placements {
            assign_ring_placements(model, molecule_id)?;
        }
        let Some(molecule) = model.molecule(molecule_id) else {
            continue;
        };
        let formula = model
            .calculated_formula(molecule_id)
            .map(|f| f.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "m{}  {}  atoms={} bonds={} rings={}",
            index + 1,
            formula,
            molecule.atom_count(),
            molecule.bond_count(),
            molecule.rings().len()
        );

        for (k, ring_id) in rings_for_double_bond_placement(model, molecule_id)
            .into_iter()
            .enumerate()
        {
            let Some(ring) = model.ring(ring_id) else {
                continue;
            };
            let labels: Vec<&str> = ring
                .atoms()
                .iter()
                .filter_map(|&a| model.atom(a).map(|atom| atom.label.as_str()))
                .collect();
            let _ = writeln!(out, "  ring {}: size {}  {}", k + 1, ring.size(), labels.join("-"));
        }

        if placements {
            for &bond_id in molecule.bond_ids() {
                let Some(bond) = model.bond(bond_id) else {
                    continue;
                };
                let side = match bond.placement {
                    RingPlacement::None => continue,
                    RingPlacement::Clockwise => "clockwise",
                    RingPlacement::Anticlockwise => "anticlockwise",
                };
                let label = |id| model.atom(id).map_or("?", |atom| atom.label.as_str());
                let _ = writeln!(
                    out,
                    "  bond {}-{} ({}): {}",
                    label(bond.start()),
                    label(bond.end()),
                    bond.order,
                    side
                );
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use chemgraph::{PerceptionConfig, RingAlgorithm};

    #[test]
    fn report_lists_each_molecule_and_its_ring() {
        let mut model = fixtures::model(&fixtures::toluene_and_water());
        let report = report(&mut model, &AppConfig::default(), false).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "m1  C7H8  atoms=7 bonds=7 rings=1");
        assert_eq!(lines[1], "  ring 1: size 6  c1-c2-c3-c4-c5-c6");
        assert_eq!(lines[2], "m2  H2O  atoms=1 bonds=0 rings=0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn placements_are_printed_for_ring_double_bonds() {
        let mut model = fixtures::model(&fixtures::toluene_and_water());
        let report = report(&mut model, &AppConfig::default(), true).unwrap();
        let placed: Vec<&str> = report.lines().filter(|l| l.starts_with("  bond")).collect();
        assert_eq!(placed.len(), 3);
        assert!(placed.iter().all(|l| l.ends_with("anticlockwise") && l.contains("(2)")));
    }

    #[test]
    fn figueras_gives_the_same_single_ring() {
        let mut model = fixtures::model(&fixtures::toluene_and_water());
        let config = AppConfig {
            perception: PerceptionConfig::builder()
                .algorithm(RingAlgorithm::Figueras)
                .build()
                .unwrap(),
            ..AppConfig::default()
        };
        let report = report(&mut model, &config, false).unwrap();
        assert!(report.contains("ring 1: size 6  c1-c2-c3-c4-c5-c6"));
    }
}

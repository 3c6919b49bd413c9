//! The TOML structure description read by every command.
//!
//! ```toml
//! [[atoms]]
//! id = "a1"
//! symbol = "C"
//! x = 0.0
//! y = 0.0
//!
//! [[bonds]]
//! atoms = ["a1", "a2"]
//! order = "2"
//! ```

use crate::error::{CliError, Result};
use anyhow::{Context, anyhow, bail};
use chemgraph::core::utils::geometry::SymbolMetrics;
use chemgraph::engine::connectivity::rebuild_molecules;
use chemgraph::{Atom, AtomId, BondOrder, BondStereo, ElementRegistry, Model};
use nalgebra::Point2;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct AtomRecord {
    id: String,
    symbol: String,
    x: f64,
    y: f64,
    #[serde(default)]
    charge: Option<i32>,
    #[serde(default)]
    isotope: Option<i32>,
    #[serde(default)]
    radical: bool,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct BondRecord {
    atoms: [String; 2],
    #[serde(default = "default_order")]
    order: String,
    #[serde(default)]
    stereo: Option<String>,
}

fn default_order() -> String {
    "1".to_string()
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct StructureFile {
    #[serde(default)]
    atoms: Vec<AtomRecord>,
    #[serde(default)]
    bonds: Vec<BondRecord>,
}

/// Builds a model from a structure description and groups it into molecules.
pub fn parse(content: &str, registry: Arc<ElementRegistry>, metrics: SymbolMetrics) -> anyhow::Result<Model> {
    let file: StructureFile = toml::from_str(content).context("invalid structure TOML")?;
    let mut model = Model::new(registry).with_metrics(metrics);
    let mut ids: HashMap<String, AtomId> = HashMap::with_capacity(file.atoms.len());

    for record in file.atoms {
        let element = model
            .registry()
            .get(&record.symbol)
            .ok_or_else(|| anyhow!("atom '{}': unknown symbol '{}'", record.id, record.symbol))?;
        let mut atom = Atom::new(element, Point2::new(record.x, record.y)).with_label(&record.id);
        atom.formal_charge = record.charge;
        atom.isotope_number = record.isotope;
        atom.is_doublet_radical = record.radical;
        if ids.contains_key(&record.id) {
            bail!("duplicate atom id '{}'", record.id);
        }
        let atom_id = model.create_atom(atom);
        ids.insert(record.id, atom_id);
    }

    for (index, record) in file.bonds.into_iter().enumerate() {
        let [a, b] = &record.atoms;
        let start = *ids
            .get(a)
            .ok_or_else(|| anyhow!("bond {}: unknown atom '{}'", index + 1, a))?;
        let end = *ids
            .get(b)
            .ok_or_else(|| anyhow!("bond {}: unknown atom '{}'", index + 1, b))?;
        let order: BondOrder = record
            .order
            .parse()
            .with_context(|| format!("bond {}: bad order '{}'", index + 1, record.order))?;
        if model.bond_between(start, end).is_some() {
            bail!("bond {}: duplicate bond between '{a}' and '{b}'", index + 1);
        }
        let bond_id = model
            .create_bond(start, end, order)
            .with_context(|| format!("bond {} ({a}-{b})", index + 1))?;
        if let Some(stereo) = &record.stereo {
            let stereo: BondStereo = stereo
                .parse()
                .with_context(|| format!("bond {}: bad stereo '{stereo}'", index + 1))?;
            if let Some(bond) = model.bond_mut(bond_id) {
                bond.stereo = stereo;
            }
        }
    }

    rebuild_molecules(&mut model).context("grouping atoms into molecules")?;
    Ok(model)
}

/// Reads and parses a structure file, mapping failures to [`CliError::FileParsing`].
pub fn load(path: &Path, registry: Arc<ElementRegistry>, metrics: SymbolMetrics) -> Result<Model> {
    let content = std::fs::read_to_string(path)?;
    let model = parse(&content, registry, metrics).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(
        atoms = model.atoms_iter().count(),
        molecules = model.roots().len(),
        "Loaded structure from {:?}",
        path
    );
    Ok(model)
}

use crate::cli::FormulaArgs;
use crate::config::PartialAppConfig;
use crate::error::Result;
use chemgraph::Model;
use std::fmt::Write;

pub fn run(args: FormulaArgs) -> Result<()> {
    let config = PartialAppConfig::load(args.input.config.as_deref())?.resolve()?;
    let model = super::load_model(&args.input, &config)?;
    print!("{}", report(&model));
    Ok(())
}

/// One formula line per top-level molecule, then the whole structure.
pub fn report(model: &Model) -> String {
    let mut out = String::new();
    for (index, &molecule_id) in model.roots().iter().enumerate() {
        let formula = model
            .calculated_formula(molecule_id)
            .map(|f| f.to_string())
            .unwrap_or_default();
        match model.molecule_mean_bond_length(molecule_id) {
            Some(length) => {
                let _ = writeln!(out, "m{}  {}  mean bond length {:.3}", index + 1, formula, length);
            }
            None => {
                let _ = writeln!(out, "m{}  {}", index + 1, formula);
            }
        }
    }
    let _ = writeln!(out, "total  {}", model.formula());
    if let Some(bounds) = model.bounding_box() {
        let _ = writeln!(out, "bounds  {:.3} x {:.3}", bounds.width(), bounds.height());
    }
    out
}

use super::ids::{BondId, MoleculeId, RingId};
use crate::core::elements::ElementLike;
use crate::core::utils::geometry::{Rect, SymbolMetrics};
use nalgebra::Point2;

/// A node of the chemical graph.
///
/// Topology fields (`bonds`, `parent`, `rings`) are maintained by the owning
/// [`Model`](super::model::Model) and are read-only from outside the crate. The
/// position is also crate-private so that every move goes through
/// [`Model::move_atom`](super::model::Model::move_atom), which keeps bounding-box
/// caches honest.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Human-readable identifier (e.g. `"a12"`), regenerated by `Model::relabel`.
    pub label: String,
    pub element: ElementLike,
    pub formal_charge: Option<i32>,
    pub isotope_number: Option<i32>,
    pub is_doublet_radical: bool,
    pub(crate) position: Point2<f64>,
    pub(crate) bonds: Vec<BondId>,
    pub(crate) parent: Option<MoleculeId>,
    pub(crate) rings: Vec<RingId>,
}

impl Atom {
    pub fn new(element: ElementLike, position: Point2<f64>) -> Self {
        Self {
            label: String::new(),
            element,
            formal_charge: None,
            isotope_number: None,
            is_doublet_radical: false,
            position,
            bonds: Vec::new(),
            parent: None,
            rings: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_charge(mut self, charge: i32) -> Self {
        self.formal_charge = Some(charge);
        self
    }

    pub fn position(&self) -> Point2<f64> {
        self.position
    }

    pub fn symbol(&self) -> &str {
        self.element.symbol()
    }

    pub fn bonds(&self) -> &[BondId] {
        &self.bonds
    }

    pub fn degree(&self) -> usize {
        self.bonds.len()
    }

    pub fn parent(&self) -> Option<MoleculeId> {
        self.parent
    }

    pub fn rings(&self) -> &[RingId] {
        &self.rings
    }

    pub fn is_in_ring(&self) -> bool {
        !self.rings.is_empty()
    }

    /// Implicit hydrogen count given the sum of this atom's bond-order values.
    ///
    /// Functional groups never carry implicit hydrogens.
    pub fn implicit_hydrogen_count(&self, bond_order_sum: f64) -> u32 {
        match self.element.as_element() {
            Some(element) => element.implicit_hydrogens(
                bond_order_sum,
                self.formal_charge.unwrap_or(0),
                self.is_doublet_radical,
            ),
            None => 0,
        }
    }

    /// Whether the renderer draws a text label for this atom.
    ///
    /// Skeletal carbons with at least one bond and no decorations are drawn as a
    /// bare vertex.
    pub fn shows_symbol(&self) -> bool {
        !self.element.is_carbon()
            || self.bonds.is_empty()
            || self.formal_charge.is_some_and(|c| c != 0)
            || self.isotope_number.is_some()
            || self.is_doublet_radical
    }

    pub fn symbol_box(&self, metrics: &SymbolMetrics) -> Rect {
        let chars = if self.shows_symbol() {
            self.element.symbol().chars().count()
        } else {
            0
        };
        metrics.label_box(self.position, chars)
    }
}

use super::table::ElementData;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A concrete element with the valence rules used for implicit hydrogen counting.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub name: &'static str,
    pub atomic_number: u8,
    pub atomic_weight: f64,
    pub colour: &'static str,
    pub valences: &'static [u8],
    pub group: u8,
}

impl Element {
    pub(crate) fn from_data(symbol: &'static str, data: &ElementData) -> Self {
        Self {
            symbol,
            name: data.name,
            atomic_number: data.atomic_number,
            atomic_weight: data.atomic_weight,
            colour: data.colour,
            valences: data.valences,
            group: data.group,
        }
    }

    /// Number of hydrogens needed to satisfy the lowest allowed valence that
    /// covers `bond_order_sum`.
    ///
    /// Group 13 elements trade valence against charge (B⁻ is tetravalent), group 14
    /// loses one valence per unit of charge in either direction, and everything to
    /// the right of carbon gains valence with positive charge (N⁺ is tetravalent,
    /// O⁻ monovalent). A doublet radical consumes one more bonding position.
    pub fn implicit_hydrogens(&self, bond_order_sum: f64, formal_charge: i32, doublet_radical: bool) -> u32 {
        if self.valences.is_empty() {
            return 0;
        }
        let bonds = bond_order_sum.trunc() as i32;
        let radical = i32::from(doublet_radical);

        for &valence in self.valences {
            let adjusted = match self.group {
                13 => i32::from(valence) - formal_charge,
                14 => i32::from(valence) - formal_charge.abs(),
                _ => i32::from(valence) + formal_charge,
            };
            if adjusted >= bonds + radical {
                return (adjusted - bonds - radical) as u32;
            }
        }
        0
    }
}

/// One entry in a functional group's decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupComponent {
    pub member: ElementLike,
    pub count: u32,
}

/// A functional-group abbreviation such as `CO2H`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionalGroup {
    pub symbol: String,
    pub components: Vec<GroupComponent>,
    /// Whether the label reverses when the group is attached from the right (`CO2H` / `HO2C`).
    pub flippable: bool,
    /// Whether the group is drawn as its symbol rather than expanded into atoms.
    pub show_as_symbol: bool,
}

impl FunctionalGroup {
    pub fn atomic_weight(&self) -> f64 {
        self.components
            .iter()
            .map(|c| c.member.atomic_weight() * f64::from(c.count))
            .sum()
    }

    /// Label as drawn when the group hangs off the left side of its attachment atom.
    pub fn flipped_label(&self) -> String {
        if !self.flippable {
            return self.symbol.clone();
        }
        self.components
            .iter()
            .rev()
            .map(|c| match c.count {
                1 => c.member.symbol().to_string(),
                n => format!("{}{}", c.member.symbol(), n),
            })
            .collect()
    }
}

/// The chemical identity carried by an atom.
///
/// Cloning only bumps a reference count; all atoms drawn with the same symbol share
/// one registry entry.
#[derive(Debug, Clone)]
pub enum ElementLike {
    Element(Arc<Element>),
    FunctionalGroup(Arc<FunctionalGroup>),
}

impl ElementLike {
    pub fn symbol(&self) -> &str {
        match self {
            ElementLike::Element(e) => e.symbol,
            ElementLike::FunctionalGroup(g) => &g.symbol,
        }
    }

    pub fn atomic_weight(&self) -> f64 {
        match self {
            ElementLike::Element(e) => e.atomic_weight,
            ElementLike::FunctionalGroup(g) => g.atomic_weight(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ElementLike::Element(e) => Some(e),
            ElementLike::FunctionalGroup(_) => None,
        }
    }

    pub fn as_functional_group(&self) -> Option<&FunctionalGroup> {
        match self {
            ElementLike::Element(_) => None,
            ElementLike::FunctionalGroup(g) => Some(g),
        }
    }

    pub fn is_carbon(&self) -> bool {
        matches!(self, ElementLike::Element(e) if e.atomic_number == 6)
    }

    /// Adds this identity's element counts, times `multiplier`, to `counts`.
    ///
    /// Functional groups are expanded recursively down to elements.
    pub fn accumulate_counts(&self, multiplier: usize, counts: &mut BTreeMap<String, usize>) {
        match self {
            ElementLike::Element(e) => {
                *counts.entry(e.symbol.to_string()).or_default() += multiplier;
            }
            ElementLike::FunctionalGroup(g) => {
                for component in &g.components {
                    component
                        .member
                        .accumulate_counts(multiplier * component.count as usize, counts);
                }
            }
        }
    }
}

impl PartialEq for ElementLike {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ElementLike::Element(a), ElementLike::Element(b)) => {
                Arc::ptr_eq(a, b) || a.symbol == b.symbol
            }
            (ElementLike::FunctionalGroup(a), ElementLike::FunctionalGroup(b)) => {
                Arc::ptr_eq(a, b) || a.symbol == b.symbol
            }
            _ => false,
        }
    }
}

impl fmt::Display for ElementLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::elements::table::element_data;

    fn element(symbol: &'static str) -> Element {
        Element::from_data(symbol, element_data(symbol).unwrap())
    }

    fn like(symbol: &'static str) -> ElementLike {
        ElementLike::Element(Arc::new(element(symbol)))
    }

    mod implicit_hydrogens {
        use super::*;

        #[test]
        fn neutral_organic_atoms_fill_lowest_valence() {
            assert_eq!(element("C").implicit_hydrogens(0.0, 0, false), 4);
            assert_eq!(element("C").implicit_hydrogens(2.0, 0, false), 2);
            assert_eq!(element("N").implicit_hydrogens(1.0, 0, false), 2);
            assert_eq!(element("O").implicit_hydrogens(1.0, 0, false), 1);
            assert_eq!(element("Cl").implicit_hydrogens(1.0, 0, false), 0);
        }

        #[test]
        fn aromatic_bond_sum_is_truncated() {
            assert_eq!(element("C").implicit_hydrogens(3.0, 0, false), 1);
            assert_eq!(element("C").implicit_hydrogens(4.0, 0, false), 0);
            assert_eq!(element("N").implicit_hydrogens(3.0, 0, false), 0);
            assert_eq!(element("C").implicit_hydrogens(2.5, 0, false), 2);
        }

        #[test]
        fn higher_valence_is_used_when_lower_is_exceeded() {
            assert_eq!(element("S").implicit_hydrogens(3.0, 0, false), 1);
            assert_eq!(element("P").implicit_hydrogens(4.0, 0, false), 1);
        }

        #[test]
        fn charge_adjusts_target_valence() {
            assert_eq!(element("N").implicit_hydrogens(0.0, 1, false), 4);
            assert_eq!(element("O").implicit_hydrogens(0.0, -1, false), 1);
            assert_eq!(element("C").implicit_hydrogens(0.0, 1, false), 3);
            assert_eq!(element("C").implicit_hydrogens(0.0, -1, false), 3);
            assert_eq!(element("B").implicit_hydrogens(0.0, -1, false), 4);
        }

        #[test]
        fn radical_consumes_a_position() {
            assert_eq!(element("C").implicit_hydrogens(0.0, 0, true), 3);
            assert_eq!(element("O").implicit_hydrogens(1.0, 0, true), 0);
        }

        #[test]
        fn elements_without_valence_rules_get_none() {
            assert_eq!(element("Fe").implicit_hydrogens(0.0, 0, false), 0);
            assert_eq!(element("He").implicit_hydrogens(0.0, 0, false), 0);
        }

        #[test]
        fn overbonded_atoms_get_none() {
            assert_eq!(element("O").implicit_hydrogens(3.0, 0, false), 0);
            assert_eq!(element("F").implicit_hydrogens(2.0, 0, false), 0);
        }
    }

    #[test]
    fn functional_group_weight_and_expansion() {
        let group = FunctionalGroup {
            symbol: "CO2H".to_string(),
            components: vec![
                GroupComponent { member: like("C"), count: 1 },
                GroupComponent { member: like("O"), count: 2 },
                GroupComponent { member: like("H"), count: 1 },
            ],
            flippable: true,
            show_as_symbol: true,
        };
        let expected = 12.011 + 2.0 * 15.999 + 1.008;
        assert!((group.atomic_weight() - expected).abs() < 1e-9);
        assert_eq!(group.flipped_label(), "HO2C");

        let wrapped = ElementLike::FunctionalGroup(Arc::new(group));
        let mut counts = BTreeMap::new();
        wrapped.accumulate_counts(2, &mut counts);
        assert_eq!(counts.get("C"), Some(&2));
        assert_eq!(counts.get("O"), Some(&4));
        assert_eq!(counts.get("H"), Some(&2));
        assert!(!wrapped.is_carbon());
        assert_eq!(wrapped.to_string(), "CO2H");
    }

    #[test]
    fn element_like_equality_is_by_symbol_and_variant() {
        assert_eq!(like("C"), like("C"));
        assert_ne!(like("C"), like("N"));
        let group = ElementLike::FunctionalGroup(Arc::new(FunctionalGroup {
            symbol: "C".to_string(),
            components: Vec::new(),
            flippable: false,
            show_as_symbol: true,
        }));
        assert_ne!(like("C"), group);
    }
}

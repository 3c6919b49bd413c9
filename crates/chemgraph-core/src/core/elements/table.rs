use phf::{Map, phf_map};

/// Static per-element data compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    pub atomic_number: u8,
    pub name: &'static str,
    pub atomic_weight: f64,
    /// CPK display colour as `#RRGGBB`.
    pub colour: &'static str,
    /// Allowed valences in ascending order; empty when implicit hydrogens are never added.
    pub valences: &'static [u8],
    /// Periodic table group (1-18).
    pub group: u8,
}

const fn e(
    atomic_number: u8,
    name: &'static str,
    atomic_weight: f64,
    colour: &'static str,
    valences: &'static [u8],
    group: u8,
) -> ElementData {
    ElementData {
        atomic_number,
        name,
        atomic_weight,
        colour,
        valences,
        group,
    }
}

pub static ELEMENTS: Map<&'static str, ElementData> = phf_map! {
    "H" => e(1, "Hydrogen", 1.008, "#FFFFFF", &[1], 1),
    "He" => e(2, "Helium", 4.0026, "#D9FFFF", &[], 18),
    "Li" => e(3, "Lithium", 6.94, "#CC80FF", &[1], 1),
    "Be" => e(4, "Beryllium", 9.0122, "#C2FF00", &[2], 2),
    "B" => e(5, "Boron", 10.81, "#FFB5B5", &[3], 13),
    "C" => e(6, "Carbon", 12.011, "#909090", &[4], 14),
    "N" => e(7, "Nitrogen", 14.007, "#3050F8", &[3, 5], 15),
    "O" => e(8, "Oxygen", 15.999, "#FF0D0D", &[2], 16),
    "F" => e(9, "Fluorine", 18.998, "#90E050", &[1], 17),
    "Ne" => e(10, "Neon", 20.180, "#B3E3F5", &[], 18),
    "Na" => e(11, "Sodium", 22.990, "#AB5CF2", &[1], 1),
    "Mg" => e(12, "Magnesium", 24.305, "#8AFF00", &[2], 2),
    "Al" => e(13, "Aluminium", 26.982, "#BFA6A6", &[3], 13),
    "Si" => e(14, "Silicon", 28.085, "#F0C8A0", &[4], 14),
    "P" => e(15, "Phosphorus", 30.974, "#FF8000", &[3, 5], 15),
    "S" => e(16, "Sulfur", 32.06, "#FFFF30", &[2, 4, 6], 16),
    "Cl" => e(17, "Chlorine", 35.45, "#1FF01F", &[1, 3, 5, 7], 17),
    "Ar" => e(18, "Argon", 39.948, "#80D1E3", &[], 18),
    "K" => e(19, "Potassium", 39.098, "#8F40D4", &[1], 1),
    "Ca" => e(20, "Calcium", 40.078, "#3DFF00", &[2], 2),
    "Sc" => e(21, "Scandium", 44.956, "#E6E6E6", &[], 3),
    "Ti" => e(22, "Titanium", 47.867, "#BFC2C7", &[], 4),
    "V" => e(23, "Vanadium", 50.942, "#A6A6AB", &[], 5),
    "Cr" => e(24, "Chromium", 51.996, "#8A99C7", &[], 6),
    "Mn" => e(25, "Manganese", 54.938, "#9C7AC7", &[], 7),
    "Fe" => e(26, "Iron", 55.845, "#E06633", &[], 8),
    "Co" => e(27, "Cobalt", 58.933, "#F090A0", &[], 9),
    "Ni" => e(28, "Nickel", 58.693, "#50D050", &[], 10),
    "Cu" => e(29, "Copper", 63.546, "#C88033", &[], 11),
    "Zn" => e(30, "Zinc", 65.38, "#7D80B0", &[], 12),
    "Ga" => e(31, "Gallium", 69.723, "#C28F8F", &[3], 13),
    "Ge" => e(32, "Germanium", 72.630, "#668F8F", &[4], 14),
    "As" => e(33, "Arsenic", 74.922, "#BD80E3", &[3, 5], 15),
    "Se" => e(34, "Selenium", 78.971, "#FFA100", &[2, 4, 6], 16),
    "Br" => e(35, "Bromine", 79.904, "#A62929", &[1, 3, 5, 7], 17),
    "Kr" => e(36, "Krypton", 83.798, "#5CB8D1", &[], 18),
    "Rb" => e(37, "Rubidium", 85.468, "#702EB0", &[1], 1),
    "Sr" => e(38, "Strontium", 87.62, "#00FF00", &[2], 2),
    "Pd" => e(46, "Palladium", 106.42, "#006985", &[], 10),
    "Ag" => e(47, "Silver", 107.87, "#C0C0C0", &[], 11),
    "Cd" => e(48, "Cadmium", 112.41, "#FFD98F", &[], 12),
    "In" => e(49, "Indium", 114.82, "#A67573", &[3], 13),
    "Sn" => e(50, "Tin", 118.71, "#668080", &[2, 4], 14),
    "Sb" => e(51, "Antimony", 121.76, "#9E63B5", &[3, 5], 15),
    "Te" => e(52, "Tellurium", 127.60, "#D47A00", &[2, 4, 6], 16),
    "I" => e(53, "Iodine", 126.90, "#940094", &[1, 3, 5, 7], 17),
    "Xe" => e(54, "Xenon", 131.29, "#429EB0", &[], 18),
    "Cs" => e(55, "Caesium", 132.91, "#57178F", &[1], 1),
    "Ba" => e(56, "Barium", 137.33, "#00C900", &[2], 2),
    "Pt" => e(78, "Platinum", 195.08, "#D0D0E0", &[], 10),
    "Au" => e(79, "Gold", 196.97, "#FFD123", &[], 11),
    "Hg" => e(80, "Mercury", 200.59, "#B8B8D0", &[], 12),
    "Tl" => e(81, "Thallium", 204.38, "#A6544D", &[1, 3], 13),
    "Pb" => e(82, "Lead", 207.2, "#575961", &[2, 4], 14),
    "Bi" => e(83, "Bismuth", 208.98, "#9E4FB5", &[3, 5], 15),
};

pub fn element_data(symbol: &str) -> Option<&'static ElementData> {
    ELEMENTS.get(symbol)
}

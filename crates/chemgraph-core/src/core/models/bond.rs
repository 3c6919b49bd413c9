use super::ids::{AtomId, MoleculeId, RingId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BondOrder {
    Zero,
    /// Partial bond between zero and single (e.g. hydrogen bond, coordination).
    ZeroOne,
    #[default]
    Single,
    /// Partial bond between single and double; also used for aromatic bonds.
    OneHalf,
    Double,
    TwoThree,
    Triple,
    Unknown,
}

impl BondOrder {
    /// Numeric bond order as used in valence sums.
    pub fn value(&self) -> f64 {
        match self {
            Self::Zero | Self::Unknown => 0.0,
            Self::ZeroOne => 0.5,
            Self::Single => 1.0,
            Self::OneHalf => 1.5,
            Self::Double => 2.0,
            Self::TwoThree => 2.5,
            Self::Triple => 3.0,
        }
    }

    /// True for orders drawn with a second line offset to one side of the bond.
    ///
    /// Triple bonds are drawn symmetrically and are excluded.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::OneHalf | Self::Double | Self::TwoThree)
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "0" | "zero" | "other" => Ok(Self::Zero),
            "0.5" | "hbond" | "partial01" => Ok(Self::ZeroOne),
            "1" | "s" | "single" => Ok(Self::Single),
            "1.5" | "a" | "ar" | "aromatic" | "partial12" => Ok(Self::OneHalf),
            "2" | "d" | "double" => Ok(Self::Double),
            "2.5" | "partial23" => Ok(Self::TwoThree),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "unknown" | "?" => Ok(Self::Unknown),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Zero => "0",
                Self::ZeroOne => "0.5",
                Self::Single => "1",
                Self::OneHalf => "1.5",
                Self::Double => "2",
                Self::TwoThree => "2.5",
                Self::Triple => "3",
                Self::Unknown => "unknown",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Wedge,
    Hatch,
    Cis,
    Trans,
    Indeterminate,
}

#[derive(Debug, Error)]
#[error("Invalid bond stereo string")]
pub struct ParseBondStereoError;

impl FromStr for BondStereo {
    type Err = ParseBondStereoError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "w" | "wedge" => Ok(Self::Wedge),
            "h" | "hatch" => Ok(Self::Hatch),
            "c" | "cis" => Ok(Self::Cis),
            "t" | "trans" => Ok(Self::Trans),
            "s" | "indeterminate" | "either" => Ok(Self::Indeterminate),
            _ => Err(ParseBondStereoError),
        }
    }
}

/// Which side of a multiple bond its offset line is drawn on.
///
/// Only meaningful for multiple bonds inside a ring; the offset goes toward the
/// ring interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RingPlacement {
    #[default]
    None,
    Clockwise,
    Anticlockwise,
}

#[derive(Debug, Error)]
#[error("Invalid ring placement string")]
pub struct ParseRingPlacementError;

impl FromStr for RingPlacement {
    type Err = ParseRingPlacementError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "clockwise" | "cw" => Ok(Self::Clockwise),
            "anticlockwise" | "counterclockwise" | "ccw" => Ok(Self::Anticlockwise),
            _ => Err(ParseRingPlacementError),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub label: String,
    pub order: BondOrder,
    pub stereo: BondStereo,
    pub placement: RingPlacement,
    pub(crate) start: AtomId,
    pub(crate) end: AtomId,
    pub(crate) parent: Option<MoleculeId>,
    pub(crate) rings: Vec<RingId>,
}

impl Bond {
    pub(crate) fn new(start: AtomId, end: AtomId, order: BondOrder) -> Self {
        Self {
            label: String::new(),
            order,
            stereo: BondStereo::None,
            placement: RingPlacement::None,
            start,
            end,
            parent: None,
            rings: Vec::new(),
        }
    }

    pub fn start(&self) -> AtomId {
        self.start
    }

    pub fn end(&self) -> AtomId {
        self.end
    }

    pub fn atoms(&self) -> (AtomId, AtomId) {
        (self.start, self.end)
    }

    pub fn contains(&self, atom_id: AtomId) -> bool {
        self.start == atom_id || self.end == atom_id
    }

    /// The endpoint opposite `atom_id`, or `None` if `atom_id` is not an endpoint.
    pub fn other_atom(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.start == atom_id {
            Some(self.end)
        } else if self.end == atom_id {
            Some(self.start)
        } else {
            None
        }
    }

    /// True if this bond joins the unordered pair `{a, b}`.
    pub fn joins(&self, a: AtomId, b: AtomId) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
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
}

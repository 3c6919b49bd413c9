//! # Elements Module
//!
//! Chemical identities an atom can carry: concrete elements from the periodic table
//! and functional-group abbreviations ("Me", "Ph", "CO2H") that stand for a small
//! fragment drawn as a single symbol.
//!
//! Identities are interned: the [`ElementRegistry`] builds each one once and hands out
//! cheap [`ElementLike`] handles that atoms share.

pub mod element;
pub mod registry;
pub mod table;

pub use element::{Element, ElementLike, FunctionalGroup, GroupComponent};
pub use registry::{ElementRegistry, RegistryError};

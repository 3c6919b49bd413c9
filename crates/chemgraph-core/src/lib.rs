//! # ChemGraph Core Library
//!
//! The chemical graph model behind an interactive structure editor: atoms and bonds
//! stored in a mutable graph, connected components ("molecules") kept consistent as
//! the graph is edited, and ring perception for the layout and rendering code that
//! sits on top of it.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** The element registry, the arena-backed [`Model`]
//!   with its atoms, bonds, molecules and rings, and small geometry helpers. Every
//!   structural mutation is an explicit method returning a [`ChangeSet`].
//!
//! - **[`engine`]: The Algorithms.** Connectivity refresh (splitting a molecule into
//!   its connected components), the Figueras single-ring search, the RP-Path SSSR
//!   computation, ring ordering, and ring placement of double bonds.
//!
//! File formats, rendering and host-application integration are external
//! collaborators; they read and write the model only through this API.

pub mod core;
pub mod engine;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::core::elements::{ElementLike, ElementRegistry};
pub use crate::core::models::atom::Atom;
pub use crate::core::models::bond::{Bond, BondOrder, BondStereo, RingPlacement};
pub use crate::core::models::change::ChangeSet;
pub use crate::core::models::container::GraphContainer;
pub use crate::core::models::error::GraphError;
pub use crate::core::models::ids::{AtomId, BondId, MoleculeId, RingId};
pub use crate::core::models::model::Model;
pub use crate::core::models::molecule::Molecule;
pub use crate::core::models::ring::Ring;
pub use crate::engine::config::{PerceptionConfig, RingAlgorithm};
pub use crate::engine::error::EngineError;

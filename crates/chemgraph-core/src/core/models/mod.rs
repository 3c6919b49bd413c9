//! # Core Models Module
//!
//! The chemical graph: atoms as nodes, bonds as edges, molecules as maintained
//! connected components, and rings as cached cyclic subsets of a molecule.
//!
//! ## Ownership
//!
//! A single [`Model`](model::Model) owns every entity in generational arenas. Atoms,
//! bonds and rings refer back to their owners through [`ids`] keys rather than
//! pointers, so there are no reference cycles and a `Model` clone is a deep copy
//! that keeps every id valid.
//!
//! ## Key Components
//!
//! - [`atom`] - graph node with identity, position, charge and radical flags
//! - [`bond`] - graph edge with order, stereo and ring placement
//! - [`ring`] - ordered atom/bond cycle produced by ring perception
//! - [`molecule`] - connected component with cached rings and bounding box
//! - [`container`] - membership queries shared by `Molecule` and `Model`
//! - [`model`] - the arena and the mutation API that keeps membership consistent
//! - [`change`] - the record of what a mutation touched
//! - [`formula`] - element-count rollups
//!
//! ```
//! use chemgraph::{Atom, BondOrder, ElementRegistry, GraphContainer, GraphError, Model};
//! use nalgebra::Point2;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), GraphError> {
//! let registry = Arc::new(ElementRegistry::builtin());
//! let carbon = registry.get("C").expect("carbon is a built-in element");
//! let mut model = Model::new(registry.clone());
//! let mol = model.add_molecule(None)?;
//! let c1 = model.insert_atom(mol, Atom::new(carbon.clone(), Point2::new(0.0, 0.0)))?;
//! let c2 = model.insert_atom(mol, Atom::new(carbon, Point2::new(1.0, 0.0)))?;
//! model.insert_bond(c1, c2, BondOrder::Single)?;
//! assert_eq!(model.molecule(mol).map(|m| m.bond_count()), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod atom;
pub mod bond;
pub mod change;
pub mod container;
pub mod error;
pub mod formula;
pub mod ids;
pub mod model;
pub mod molecule;
pub mod ring;

//! # Core Module
//!
//! Data models and static chemistry knowledge shared by every algorithm in the crate.
//!
//! - **Chemical identity** ([`elements`]) - element table, functional groups and the
//!   immutable [`ElementRegistry`](elements::ElementRegistry) used to look them up
//! - **Graph representation** ([`models`]) - atoms, bonds, rings, molecules and the
//!   top-level [`Model`](models::model::Model) arena that owns them
//! - **Geometry** ([`utils`]) - 2-D points, rectangles, centroids and convex hulls
//!
//! Nothing in this module performs connectivity or ring analysis; those live in
//! [`crate::engine`] and operate on the models defined here.

pub mod elements;
pub mod models;
pub mod utils;

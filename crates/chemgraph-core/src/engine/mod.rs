//! # Engine Module
//!
//! Algorithms that run over the [`Model`](crate::core::models::model::Model) after
//! it has been edited.
//!
//! ## Overview
//!
//! The core models only keep membership consistent; they never decide what a
//! molecule *is*. The engine re-derives that: it splits molecules into their
//! connected components, perceives rings, orders them for drawing, and decides on
//! which side of a ring each double bond's second line goes.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - ring algorithm choice and size cap
//! - **Error Handling** ([`error`]) - engine-level error type
//! - **Connectivity** ([`connectivity`]) - refresh, split and whole-model rebuild
//! - **Ring Perception** ([`perception`]) - Figueras single-ring search, RP-Path
//!   SSSR, and ring ordering
//! - **Placement** ([`placement`]) - ring placement of multiple bonds
//!
//! Every entry point takes the model by `&mut` and runs to completion before
//! returning; callers serialize edits.

pub mod config;
pub mod connectivity;
pub mod error;
pub mod perception;
pub mod placement;

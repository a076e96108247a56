//! Core types and contracts for sample-consensus primitive fitting.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Vec3`, ...),
//! - the read-only point container consumed by all models ([`PointCloud`]),
//! - the primitive-model contract ([`SacModel`]) an iterative consensus
//!   driver programs against.
//!
//! Concrete shape models (sphere, ...) live in their own crates and only
//! implement the trait; the driver never sees shape-specific logic.

/// Point container and index types.
pub mod cloud;
/// Linear algebra type aliases.
pub mod math;
/// Primitive-model contract and estimation errors.
pub mod model;

pub use cloud::*;
pub use math::*;
pub use model::*;

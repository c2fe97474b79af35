//! Shared data model and pure helpers for the floor-plan generation
//! platform.
//!
//! This crate has no internal dependencies and no I/O. It defines the
//! job lifecycle types, the structured floor-plan records (rooms,
//! walls, furniture, validation scores), polygon geometry primitives,
//! and the shared hash helper used for deterministic seed derivation.

pub mod error;
pub mod geometry;
pub mod hashing;
pub mod job;
pub mod options;
pub mod plan;

pub use error::CoreError;

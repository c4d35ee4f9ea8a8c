//! Ragdoll figure assembly and body/sprite synchronization for a
//! physics-driven page.
//!
//! This crate is DOM-agnostic: it computes segment placements, wires the
//! joints, wraps the 2D physics world, and produces per-frame sprite
//! transforms. Browser integration lives in `tumble2d-web`.

#![forbid(unsafe_code)]

mod error;
mod layout;
mod segment;
mod sync;
mod world;

#[cfg(feature = "json")]
pub mod anchors;

pub use error::*;
pub use layout::*;
pub use segment::*;
pub use sync::*;
pub use world::*;

/// Physics handle types, re-exported so binding consumers do not need a
/// direct rapier dependency.
pub use rapier2d::prelude::{ImpulseJointHandle, RigidBodyHandle};

#[cfg(test)]
mod layout_tests;

#[cfg(test)]
mod sync_tests;

#[cfg(test)]
mod world_tests;

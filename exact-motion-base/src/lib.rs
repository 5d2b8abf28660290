//! This library is an internal component of [`exact-motion`],
//! which defines the polynomial algebra and the piecewise-in-time container
//! that trajectories are built from.
//! Do not depend on this library; use only [`exact-motion`] instead.
//!
//! [`exact-motion`]: https://crates.io/crates/exact-motion/

/// Do not use this module directly; its contents are re-exported from `exact-motion`.
pub mod math;

/// Do not use this module directly; its contents are re-exported from `exact-motion`.
pub mod timeline;

//! Polynomials, tolerant comparison, and units of measure.

pub use exact_motion_base::math::*;

/// Unit-of-measure type for points and vectors that are positions in meters.
#[derive(Debug, Eq, PartialEq)]
pub enum World {}

/// Unit-of-measure type for vectors that are velocity in m/s.
#[derive(Debug, Eq, PartialEq)]
pub enum Velocity {}

/// Unit-of-measure type for vectors that are acceleration in m/s².
#[derive(Debug, Eq, PartialEq)]
pub enum Acceleration {}

/// Unit-of-measure type for vectors that are momentum in kg·m/s.
#[derive(Debug, Eq, PartialEq)]
pub enum Momentum {}

/// A position in the plane of motion.
pub type Position = euclid::Point2D<f64, World>;

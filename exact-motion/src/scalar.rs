//! Simulations of a single quantity with at most one change of mode, computed in closed
//! form rather than by searching for events.
//!
//! These use the same [`Polynomial`](crate::math::Polynomial) and
//! [`Timeline`](crate::timeline::Timeline) machinery as the collision simulator, one axis
//! at a time.

mod disc;
pub use disc::*;
mod rocket;
pub use rocket::*;
mod rolling;
pub use rolling::*;
mod torque;
pub use torque::*;

/// Standard gravity at the Earth’s surface, in m/s².
pub const STANDARD_GRAVITY: f64 = 9.807;

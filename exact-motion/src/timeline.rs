//! Piecewise-in-time storage; see [`Timeline`].

pub use exact_motion_base::timeline::*;

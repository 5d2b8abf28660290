//! Exact, closed-form trajectories of disc-shaped bodies moving under constant
//! acceleration, including the elastic collisions between them and with the walls of an
//! enclosing box.
//!
//! Rather than stepping time forward in small increments, every trajectory is stored as
//! a sequence of polynomials in time, each governing the motion over one interval.
//! A collision is an exact instant found by solving for the roots of a polynomial, and
//! resolving it starts a new interval. Once generated, positions at any time are found
//! by evaluating the polynomial in effect at that time.
//!
//! ## Overview
//!
//! * [`math::Polynomial`] is the single-variable polynomial type all motion is built from.
//! * [`timeline::Timeline`] maps each instant of time to the value in effect then.
//! * [`trajectory::AxisTrajectory`] and [`trajectory::Trajectory`] combine those to
//!   describe motion along one or two axes.
//! * [`simulate::CollisionSimulator`] produces a [`simulate::TrajectorySet`] for a
//!   collection of [`body::Body`]s within an optional [`arena::Arena`].
//! * [`scalar`] contains simulators for single quantities with one change of mode:
//!   a disc rolling with friction, a disc under constant torque, and a rocket.
//!
//! ```
//! use exact_motion::arena::Arena;
//! use exact_motion::body::Body;
//! use exact_motion::simulate::{CollisionSimulator, SimulationWindow, Simulator as _};
//! use exact_motion::trajectory::InitialMotion;
//! use euclid::{point2, vec2};
//!
//! let arena = Arena::new(point2(-5.0, -5.0), point2(5.0, 5.0))?;
//! let simulator = CollisionSimulator::new(
//!     Some(arena),
//!     [(
//!         Body::new(1.0, 0.5)?,
//!         InitialMotion::new(point2(-4.5, 0.0), vec2(10.0, 0.0), vec2(0.0, 0.0), 0.0),
//!     )],
//! )?;
//! let trajectories = simulator.generate(SimulationWindow::new(0.0, 2.0)?);
//! assert_eq!(trajectories.events().len(), 2);
//! # Ok::<(), exact_motion::ConfigError>(())
//! ```
//!
//! ## Package features
//!
//! This package defines the following feature flags:
//!
//! * `"serde"`:
//!   Enables serialization and deserialization of configuration and of polynomials, and
//!   the declarative `scenario::Scenario` format.
//! * `"auto-threads"`:
//!   Makes [`simulate::generate_in_background()`] run generation on the `rayon` thread
//!   pool. Without it, the returned future does the work when first polled.
//!
//! ## Logging
//!
//! This crate reports progress through the [`log`] facade: `debug` for each generation
//! run and each resolved event, `trace` for root searches, and `warn` when a run is cut
//! short by its event limit. Install a logger of your choice to see them.

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]

pub mod arena;
pub mod body;
mod error;
pub use error::ConfigError;
pub mod math;
pub mod scalar;
#[cfg(feature = "serde")]
pub mod scenario;
pub mod simulate;
pub mod time;
pub mod timeline;
pub mod trajectory;

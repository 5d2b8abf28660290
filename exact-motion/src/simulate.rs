//! Generating trajectories, and querying them once generated.

use core::future::Future;
use std::sync::Arc;

use euclid::Vector2D;

use crate::ConfigError;
use crate::arena::Wall;
use crate::body::{Body, BodyId};
use crate::math::{Acceleration, Momentum, Position, Velocity};
use crate::time::PlaybackClock;
use crate::trajectory::Trajectory;

mod collision;
pub use collision::*;

#[cfg(test)]
mod tests;

/// Default for [`CollisionSimulator::with_event_limit()`].
pub const DEFAULT_EVENT_LIMIT: usize = 10_000;

/// Speed, along the line of contact, below which a [`CollisionSimulator`] treats two
/// touching bodies (or a body and a wall) as grazing rather than colliding.
///
/// Grazing contacts are not events: the bodies carry on through each other. This is
/// separate from the time tolerance [`EPSILON`](crate::math::EPSILON), though it has the
/// same value.
pub const GRAZING_SPEED: f64 = 5e-6;

/// The closed interval of time `[start, end]` over which a simulation looks for events.
///
/// Trajectories remain defined outside the window; they just don't have any events
/// there.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "WindowSer", into = "WindowSer")
)]
pub struct SimulationWindow {
    start: f64,
    end: f64,
}

impl SimulationWindow {
    /// Constructs a window, or returns an error if `end` precedes `start` or either is
    /// not finite.
    pub fn new(start: f64, end: f64) -> Result<Self, ConfigError> {
        if start.is_finite() && end.is_finite() && start <= end {
            Ok(Self { start, end })
        } else {
            Err(ConfigError::Window { start, end })
        }
    }

    /// The first instant at which events are looked for.
    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    /// The last instant at which events are looked for.
    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }
}

#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
struct WindowSer {
    start: f64,
    end: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<WindowSer> for SimulationWindow {
    type Error = ConfigError;
    fn try_from(value: WindowSer) -> Result<Self, Self::Error> {
        SimulationWindow::new(value.start, value.end)
    }
}

#[cfg(feature = "serde")]
impl From<SimulationWindow> for WindowSer {
    fn from(value: SimulationWindow) -> Self {
        WindowSer {
            start: value.start,
            end: value.end,
        }
    }
}

/// Something which can compute the motion of its contents over a [`SimulationWindow`].
///
/// Generation is a pure function of the simulator’s configuration and the window:
/// calling it twice, or on another thread via [`generate_in_background()`], gives
/// identical results.
pub trait Simulator {
    /// The computed motion.
    type Output;

    /// Computes the motion over `window`.
    fn generate(&self, window: SimulationWindow) -> Self::Output;
}

cfg_if::cfg_if! {
    if #[cfg(feature = "auto-threads")] {
        /// Runs [`Simulator::generate()`] on the `rayon` thread pool, returning a future
        /// which resolves to its output.
        ///
        /// The output is identical to that of calling `generate()` directly.
        /// Dropping the future does not stop the computation, but discards its result.
        pub fn generate_in_background<S>(
            simulator: Arc<S>,
            window: SimulationWindow,
        ) -> impl Future<Output = S::Output> + Send + 'static
        where
            S: Simulator + Send + Sync + 'static,
            S::Output: Send + 'static,
        {
            let (sender, receiver) = futures_channel::oneshot::channel();
            rayon::spawn(move || {
                // If the receiver was dropped, nobody wants the output, which is fine.
                let _ = sender.send(simulator.generate(window));
            });
            async move {
                match receiver.await {
                    Ok(output) => output,
                    // The sender is only dropped unsent if generation panicked, and the
                    // panic was already reported on the worker thread.
                    Err(futures_channel::oneshot::Canceled) => {
                        panic!("trajectory generation panicked")
                    }
                }
            }
        }
    } else {
        /// Returns a future which runs [`Simulator::generate()`] when first polled,
        /// resolving to its output.
        ///
        /// The output is identical to that of calling `generate()` directly.
        /// Enable the `auto-threads` feature to run generation on a thread pool instead.
        pub fn generate_in_background<S>(
            simulator: Arc<S>,
            window: SimulationWindow,
        ) -> impl Future<Output = S::Output> + Send + 'static
        where
            S: Simulator + Send + Sync + 'static,
            S::Output: Send + 'static,
        {
            async move { simulator.generate(window) }
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// A collision which changed the motion of one or two bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Two bodies collided with each other.
    Pairwise {
        /// When the bodies touched.
        time: f64,
        /// The participant with the lower [`BodyId`].
        first: BodyId,
        /// The participant with the higher [`BodyId`].
        second: BodyId,
    },
    /// A body collided with a wall of the arena.
    Boundary {
        /// When the body touched the wall.
        time: f64,
        /// The body which bounced.
        body: BodyId,
        /// The wall it bounced off.
        wall: Wall,
    },
}

impl Event {
    /// The time at which the collision happened.
    pub fn time(&self) -> f64 {
        match *self {
            Event::Pairwise { time, .. } | Event::Boundary { time, .. } => time,
        }
    }

    /// Returns whether `body` took part in this event.
    pub fn involves(&self, body: BodyId) -> bool {
        match *self {
            Event::Pairwise { first, second, .. } => first == body || second == body,
            Event::Boundary { body: b, .. } => b == body,
        }
    }
}

/// The output of a [`CollisionSimulator`]: every body’s [`Trajectory`], and the events
/// which shaped them.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySet {
    pub(crate) window: SimulationWindow,
    pub(crate) bodies: Vec<Body>,
    pub(crate) trajectories: Vec<Trajectory>,
    pub(crate) events: Vec<Event>,
    pub(crate) truncated: bool,
}

impl TrajectorySet {
    /// The window the trajectories were generated over.
    pub fn window(&self) -> SimulationWindow {
        self.window
    }

    /// Iterates over all bodies and their IDs.
    pub fn bodies(&self) -> impl ExactSizeIterator<Item = (BodyId, &Body)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, body)| (BodyId(index), body))
    }

    /// Returns the body with the given ID, if there is one.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Returns the trajectory of the body with the given ID, if there is one.
    pub fn trajectory(&self, id: BodyId) -> Option<&Trajectory> {
        self.trajectories.get(id.0)
    }

    /// All events, in the order they were resolved (which is time order).
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns whether generation stopped at the event limit rather than at the end of
    /// the window. If so, there may be collisions after the last event which were never
    /// resolved.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Position of a body at time `t`, or [`None`] if there is no such body.
    pub fn position_at(&self, id: BodyId, t: f64) -> Option<Position> {
        Some(self.trajectory(id)?.position_at(t))
    }

    /// Velocity of a body at time `t`, or [`None`] if there is no such body.
    pub fn velocity_at(&self, id: BodyId, t: f64) -> Option<Vector2D<f64, Velocity>> {
        Some(self.trajectory(id)?.velocity_at(t))
    }

    /// Acceleration of a body at time `t`, or [`None`] if there is no such body.
    pub fn acceleration_at(&self, id: BodyId, t: f64) -> Option<Vector2D<f64, Acceleration>> {
        Some(self.trajectory(id)?.acceleration_at(t))
    }

    /// Positions of all bodies at time `t`, in [`BodyId`] order.
    pub fn positions_at(&self, t: f64) -> Vec<(BodyId, Position)> {
        self.trajectories
            .iter()
            .enumerate()
            .map(|(index, trajectory)| (BodyId(index), trajectory.position_at(t)))
            .collect()
    }

    /// Positions of all bodies at the time currently shown by `clock`, measured from the
    /// start of the window.
    pub fn sample(&self, clock: &dyn PlaybackClock) -> Vec<(BodyId, Position)> {
        self.positions_at(self.window.start + clock.current_time().as_secs_f64())
    }

    /// Sum of the momenta of all bodies at time `t`.
    ///
    /// Collisions conserve this, but acceleration (and walls) change it.
    pub fn total_momentum_at(&self, t: f64) -> Vector2D<f64, Momentum> {
        self.bodies
            .iter()
            .zip(&self.trajectories)
            .map(|(body, trajectory)| (trajectory.velocity_at(t) * body.mass()).cast_unit())
            .fold(Vector2D::zero(), |total, momentum| total + momentum)
    }

    /// Sum of the kinetic energies of all bodies at time `t`.
    pub fn kinetic_energy_at(&self, t: f64) -> f64 {
        self.bodies
            .iter()
            .zip(&self.trajectories)
            .map(|(body, trajectory)| {
                0.5 * body.mass() * trajectory.velocity_at(t).square_length()
            })
            .sum()
    }
}

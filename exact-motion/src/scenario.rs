//! Declarative descriptions of a collision simulation, for loading from files.

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::arena::Arena;
use crate::body::Body;
use crate::simulate::{CollisionSimulator, DEFAULT_EVENT_LIMIT, SimulationWindow};
use crate::trajectory::InitialMotion;

/// Everything needed to run a [`CollisionSimulator`].
///
/// The window and arena are checked while deserializing; everything else is checked by
/// [`Scenario::build()`].
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use exact_motion::scenario::Scenario;
/// use exact_motion::simulate::Simulator as _;
///
/// let scenario: Scenario = serde_json::from_str(r#"{
///     "window": {"start": 0, "end": 2},
///     "arena": {"min": [-5, -5], "max": [5, 5]},
///     "bodies": [
///         {"mass": 1, "radius": 0.5, "motion": {
///             "x": {"position": -4.5, "velocity": 10},
///             "y": {"position": 0}
///         }}
///     ]
/// }"#)?;
/// let (simulator, window) = scenario.build()?;
/// assert_eq!(simulator.generate(window).events().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    /// Span of time in which to find events.
    pub window: SimulationWindow,
    /// Walls to bounce off, if any.
    #[serde(default)]
    pub arena: Option<Arena>,
    /// The bodies, in [`BodyId`](crate::body::BodyId) order.
    pub bodies: Vec<BodySpec>,
    /// Overrides [`DEFAULT_EVENT_LIMIT`].
    #[serde(default = "default_event_limit")]
    pub event_limit: usize,
}

/// One body of a [`Scenario`]: its physical properties and how it starts moving.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BodySpec {
    /// Must be positive and finite.
    pub mass: f64,
    /// Defaults to zero, a point mass.
    #[serde(default)]
    pub radius: f64,
    /// Position, velocity and acceleration at the reference time.
    pub motion: InitialMotion,
}

fn default_event_limit() -> usize {
    DEFAULT_EVENT_LIMIT
}

impl Scenario {
    /// Validates the scenario and constructs a simulator for it, returned along with the
    /// window to pass to [`Simulator::generate()`](crate::simulate::Simulator::generate).
    pub fn build(&self) -> Result<(CollisionSimulator, SimulationWindow), ConfigError> {
        let bodies = self
            .bodies
            .iter()
            .map(|spec| Ok((Body::new(spec.mass, spec.radius)?, spec.motion)))
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let simulator =
            CollisionSimulator::new(self.arena, bodies)?.with_event_limit(self.event_limit);
        log::debug!(
            "scenario: {} bodies over [{}, {}]",
            self.bodies.len(),
            self.window.start(),
            self.window.end()
        );
        Ok((simulator, self.window))
    }
}

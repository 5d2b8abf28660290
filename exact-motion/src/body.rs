//! [`Body`], the things whose motion is simulated.

use core::fmt;

use crate::ConfigError;
use crate::error::positive_mass;

/// A rigid disc (or point, if its radius is zero) with mass.
///
/// A [`Body`] does not know where it is; its motion is described separately by a
/// [`Trajectory`](crate::trajectory::Trajectory), and its identity within a simulation
/// by a [`BodyId`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    mass: f64,
    radius: f64,
}

impl Body {
    /// Constructs a [`Body`], or returns an error if the mass is not positive or the
    /// radius is negative.
    pub fn new(mass: f64, radius: f64) -> Result<Self, ConfigError> {
        let mass = positive_mass(mass)?;
        if !(radius >= 0.0 && radius.is_finite()) {
            return Err(ConfigError::Radius(radius));
        }
        Ok(Self { mass, radius })
    }

    /// Constructs a point mass, a [`Body`] with zero radius.
    pub fn point(mass: f64) -> Result<Self, ConfigError> {
        Self::new(mass, 0.0)
    }

    /// Mass in kilograms. Always positive.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Radius in meters. Always non-negative.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Identifies one of the bodies in a simulation.
///
/// IDs are assigned in the order bodies were given to the simulator, starting from zero,
/// and they also determine the order in which simultaneous events are resolved.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Returns the position of this body in the order it was given to the simulator.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

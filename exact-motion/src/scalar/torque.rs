use crate::ConfigError;
use crate::error::finite;
use crate::scalar::Disc;
use crate::simulate::{SimulationWindow, Simulator};
use crate::trajectory::{AxisMotion, AxisTrajectory};

/// A [`Disc`] free to spin about its center, pushed by a constant force applied
/// tangentially at its rim.
#[derive(Clone, Debug, PartialEq)]
pub struct TorqueSimulator {
    disc: Disc,
    initial_angular_velocity: f64,
    force: f64,
}

impl TorqueSimulator {
    /// Returns an error if either quantity is not finite.
    pub fn new(disc: Disc, initial_angular_velocity: f64, force: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            disc,
            initial_angular_velocity: finite("angular velocity", initial_angular_velocity)?,
            force: finite("force", force)?,
        })
    }

    /// Constant angular acceleration, τ / I.
    pub fn angular_acceleration(&self) -> f64 {
        self.force * self.disc.radius() / self.disc.moment_of_inertia()
    }
}

impl Simulator for TorqueSimulator {
    /// Angle of rotation in radians, zero at the start of the window.
    type Output = AxisTrajectory;

    fn generate(&self, window: SimulationWindow) -> AxisTrajectory {
        AxisTrajectory::new(AxisMotion::new(
            self.angular_acceleration(),
            self.initial_angular_velocity,
            0.0,
            window.start(),
        ))
    }
}

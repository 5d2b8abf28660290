use crate::ConfigError;
use crate::error::finite;
use crate::math::approx_eq;
use crate::scalar::{Disc, STANDARD_GRAVITY};
use crate::simulate::{SimulationWindow, Simulator};
use crate::trajectory::{AxisMotion, AxisTrajectory};

/// A [`Disc`] standing on its rim on a flat floor, launched with some combination of
/// sliding and spinning.
///
/// While the rim slips against the floor, kinetic friction slows the slipping, both by
/// decelerating the disc and by torquing it. Once the slip reaches zero the disc rolls
/// without slipping at whatever speed it has reached, forever.
///
/// Angular velocity is counterclockwise-positive with the floor below, so a disc moving
/// in +X rolls without slipping when its angular velocity is `-velocity / radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct RollingDiscSimulator {
    disc: Disc,
    initial_velocity: f64,
    initial_angular_velocity: f64,
    kinetic_friction: f64,
    gravity: f64,
}

impl RollingDiscSimulator {
    /// Constructs a simulator with [`STANDARD_GRAVITY`].
    ///
    /// Returns an error if the coefficient of friction is negative or any quantity is not
    /// finite.
    pub fn new(
        disc: Disc,
        initial_velocity: f64,
        initial_angular_velocity: f64,
        kinetic_friction: f64,
    ) -> Result<Self, ConfigError> {
        if !(kinetic_friction >= 0.0 && kinetic_friction.is_finite()) {
            return Err(ConfigError::Friction(kinetic_friction));
        }
        Ok(Self {
            disc,
            initial_velocity: finite("velocity", initial_velocity)?,
            initial_angular_velocity: finite("angular velocity", initial_angular_velocity)?,
            kinetic_friction,
            gravity: STANDARD_GRAVITY,
        })
    }

    /// Replaces the acceleration of gravity, which determines the normal force and hence
    /// the friction.
    pub fn with_gravity(mut self, gravity: f64) -> Result<Self, ConfigError> {
        self.gravity = finite("gravity", gravity)?;
        Ok(self)
    }

    /// The disc being rolled.
    pub fn disc(&self) -> &Disc {
        &self.disc
    }

    /// Speed of the rim relative to the floor at the contact point.
    fn slip(&self, velocity: f64, angular_velocity: f64) -> f64 {
        velocity + angular_velocity * self.disc.radius()
    }
}

impl Simulator for RollingDiscSimulator {
    type Output = RollingDiscTrajectory;

    fn generate(&self, window: SimulationWindow) -> RollingDiscTrajectory {
        let t1 = window.start();
        let (mass, inertia, radius) = (
            self.disc.mass(),
            self.disc.moment_of_inertia(),
            self.disc.radius(),
        );

        let initial_slip = self.slip(self.initial_velocity, self.initial_angular_velocity);
        let friction = if approx_eq(initial_slip, 0.0) {
            0.0
        } else {
            -initial_slip.signum() * self.kinetic_friction * mass * self.gravity
        };
        log::debug!("rolling disc: initial slip {initial_slip}, friction force {friction}");

        let mut linear = AxisTrajectory::new(AxisMotion::new(
            friction / mass,
            self.initial_velocity,
            0.0,
            t1,
        ));
        // Friction acts at the bottom of the rim, so its torque is R·F.
        let mut angular = AxisTrajectory::new(AxisMotion::new(
            friction * radius / inertia,
            self.initial_angular_velocity,
            0.0,
            t1,
        ));

        // Slip changes linearly while friction acts, so it reaches zero after a time that
        // may be far shorter than any tolerance on time.
        let slip_rate = friction / mass + friction * radius / inertia * radius;
        let slip_duration = -initial_slip / slip_rate;
        let slip_end =
            (friction != 0.0 && slip_duration > 0.0 && slip_duration.is_finite())
                .then_some(t1 + slip_duration);

        if let Some(t) = slip_end {
            log::debug!("rolling disc: slipping stops at t = {t}");
            for trajectory in [&mut linear, &mut angular] {
                let state = trajectory.state_at(t);
                trajectory.seed(
                    t..,
                    AxisMotion {
                        acceleration: 0.0,
                        ..state
                    },
                );
            }
        }

        RollingDiscTrajectory {
            mass,
            moment_of_inertia: inertia,
            linear,
            angular,
            slip_end,
        }
    }
}

/// The output of a [`RollingDiscSimulator`].
#[derive(Clone, Debug, PartialEq)]
pub struct RollingDiscTrajectory {
    mass: f64,
    moment_of_inertia: f64,
    linear: AxisTrajectory,
    angular: AxisTrajectory,
    slip_end: Option<f64>,
}

impl RollingDiscTrajectory {
    /// Position of the center along the floor, zero at the start of the window.
    pub fn linear(&self) -> &AxisTrajectory {
        &self.linear
    }

    /// Angle of rotation in radians, zero at the start of the window.
    pub fn angular(&self) -> &AxisTrajectory {
        &self.angular
    }

    /// The time at which slipping stopped, or [`None`] if the disc never slipped (or
    /// never stops slipping, because there is no friction).
    pub fn slip_end(&self) -> Option<f64> {
        self.slip_end
    }

    /// Summarizes the motion at time `t`.
    pub fn state_at(&self, t: f64) -> RollingState {
        let velocity = self.linear.velocity_at(t);
        let angular_velocity = self.angular.velocity_at(t);
        let translational_energy = 0.5 * self.mass * velocity * velocity;
        let rotational_energy = 0.5 * self.moment_of_inertia * angular_velocity * angular_velocity;
        RollingState {
            velocity,
            angular_velocity,
            momentum: self.mass * velocity,
            angular_momentum: self.moment_of_inertia * angular_velocity,
            translational_energy,
            rotational_energy,
            kinetic_energy: translational_energy + rotational_energy,
        }
    }
}

/// Derived quantities describing a rolling disc at one moment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct RollingState {
    /// Speed of the center along the floor.
    pub velocity: f64,
    /// Rate of spin, positive when rolling toward negative positions.
    pub angular_velocity: f64,
    /// Linear momentum, m·v.
    pub momentum: f64,
    /// Angular momentum about the center, I·ω.
    pub angular_momentum: f64,
    /// ½·m·v²
    pub translational_energy: f64,
    /// ½·I·ω²
    pub rotational_energy: f64,
    /// Sum of the translational and rotational energies.
    pub kinetic_energy: f64,
}

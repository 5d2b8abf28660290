//! Motion of a body over time, stored as polynomials per axis.

use euclid::{Point2D, Vector2D};

use crate::ConfigError;
use crate::arena::Axis;
use crate::error::finite;
use crate::math::{Acceleration, Polynomial, Position, Velocity, World};
use crate::timeline::{Interval, Timeline};

/// The kinematic state of motion along one axis, at a particular moment.
///
/// Acceleration is constant over whatever span of time this describes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisMotion {
    /// Acceleration, constant.
    #[cfg_attr(feature = "serde", serde(default))]
    pub acceleration: f64,
    /// Velocity at [`Self::reference_time`].
    #[cfg_attr(feature = "serde", serde(default))]
    pub velocity: f64,
    /// Position at [`Self::reference_time`].
    pub position: f64,
    /// The time at which `velocity` and `position` are measured.
    #[cfg_attr(feature = "serde", serde(default))]
    pub reference_time: f64,
}

impl AxisMotion {
    /// Constructs an [`AxisMotion`] from its fields, in declaration order.
    pub const fn new(acceleration: f64, velocity: f64, position: f64, reference_time: f64) -> Self {
        Self {
            acceleration,
            velocity,
            position,
            reference_time,
        }
    }

    /// Returns the position as a polynomial in absolute time.
    ///
    /// This is built up from the acceleration by integrating twice, then shifted so that
    /// evaluating it at [`Self::reference_time`] gives exactly the stated velocity and
    /// position.
    ///
    /// ```
    /// use exact_motion::trajectory::AxisMotion;
    ///
    /// let p = AxisMotion::new(-9.8, 20.0, 10.0, 0.0).polynomial();
    /// assert_eq!(p.coefficients(), [10.0, 20.0, -4.9]);
    /// ```
    pub fn polynomial(&self) -> Polynomial {
        Polynomial::constant(self.acceleration)
            .antiderivative(self.velocity)
            .antiderivative(self.position)
            .offset(-self.reference_time)
    }

    /// Returns an error if any field is not finite.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        finite("acceleration", self.acceleration)?;
        finite("velocity", self.velocity)?;
        finite("position", self.position)?;
        finite("reference time", self.reference_time)?;
        Ok(())
    }
}

/// The initial kinematic state of a body moving in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialMotion {
    /// Motion along the horizontal axis.
    pub x: AxisMotion,
    /// Motion along the vertical axis.
    pub y: AxisMotion,
}

impl InitialMotion {
    /// Constructs an [`InitialMotion`] from vectors, all measured at `reference_time`.
    pub fn new(
        position: Position,
        velocity: Vector2D<f64, Velocity>,
        acceleration: Vector2D<f64, Acceleration>,
        reference_time: f64,
    ) -> Self {
        Self {
            x: AxisMotion::new(acceleration.x, velocity.x, position.x, reference_time),
            y: AxisMotion::new(acceleration.y, velocity.y, position.y, reference_time),
        }
    }

    /// Returns the motion along the given axis.
    pub fn axis(&self, axis: Axis) -> &AxisMotion {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Position along one axis as a function of time, piecewise polynomial.
///
/// Defined for all time: before the first change of motion and after the last, the
/// nearest polynomial extrapolates.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTrajectory {
    timeline: Timeline<Polynomial>,
}

impl AxisTrajectory {
    /// Constructs a trajectory in which `motion` applies to all time.
    pub fn new(motion: AxisMotion) -> Self {
        Self::from_polynomial(motion.polynomial())
    }

    /// Constructs a trajectory in which `position` applies to all time.
    pub fn from_polynomial(position: Polynomial) -> Self {
        Self {
            timeline: Timeline::filled(position),
        }
    }

    /// Replaces the motion within `interval` with `motion`.
    pub fn seed(&mut self, interval: impl Into<Interval>, motion: AxisMotion) {
        self.timeline.insert(interval, motion.polynomial());
    }

    /// Returns the position polynomial in effect at time `t`.
    ///
    /// This is [`None`] only if `t` is NaN.
    pub fn polynomial_at(&self, t: f64) -> Option<&Polynomial> {
        self.timeline.get(t)
    }

    /// Position at time `t`.
    pub fn position_at(&self, t: f64) -> f64 {
        self.polynomial_at(t).map_or(f64::NAN, |p| p.evaluate(t))
    }

    /// Velocity at time `t`.
    ///
    /// At the instant of a collision, this is the velocity after the collision.
    pub fn velocity_at(&self, t: f64) -> f64 {
        self.polynomial_at(t)
            .map_or(f64::NAN, |p| p.derivative().evaluate(t))
    }

    /// Acceleration at time `t`.
    pub fn acceleration_at(&self, t: f64) -> f64 {
        self.polynomial_at(t)
            .map_or(f64::NAN, |p| p.derivative().derivative().evaluate(t))
    }

    /// Returns the kinematic state at time `t`, referenced to `t`.
    ///
    /// Seeding a trajectory with this state from `t` onward leaves it unchanged
    /// (up to rounding).
    pub fn state_at(&self, t: f64) -> AxisMotion {
        AxisMotion {
            acceleration: self.acceleration_at(t),
            velocity: self.velocity_at(t),
            position: self.position_at(t),
            reference_time: t,
        }
    }

    /// Returns the number of pieces the trajectory has. This is one more than the
    /// number of times its motion was changed.
    pub fn segment_count(&self) -> usize {
        self.timeline.len()
    }

    /// Returns the underlying [`Timeline`].
    pub fn timeline(&self) -> &Timeline<Polynomial> {
        &self.timeline
    }
}

/// Position in the plane as a function of time; an [`AxisTrajectory`] for each axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    x: AxisTrajectory,
    y: AxisTrajectory,
}

impl Trajectory {
    /// Constructs a trajectory in which `motion` applies to all time.
    pub fn new(motion: &InitialMotion) -> Self {
        Self {
            x: AxisTrajectory::new(motion.x),
            y: AxisTrajectory::new(motion.y),
        }
    }

    /// Motion along the X axis.
    pub fn x(&self) -> &AxisTrajectory {
        &self.x
    }

    /// Motion along the Y axis.
    pub fn y(&self) -> &AxisTrajectory {
        &self.y
    }

    /// Motion along the given axis.
    pub fn axis(&self, axis: Axis) -> &AxisTrajectory {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub(crate) fn axis_mut(&mut self, axis: Axis) -> &mut AxisTrajectory {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
        }
    }

    /// Position at time `t`.
    pub fn position_at(&self, t: f64) -> Point2D<f64, World> {
        Point2D::new(self.x.position_at(t), self.y.position_at(t))
    }

    /// Velocity at time `t`.
    pub fn velocity_at(&self, t: f64) -> Vector2D<f64, Velocity> {
        Vector2D::new(self.x.velocity_at(t), self.y.velocity_at(t))
    }

    /// Acceleration at time `t`.
    pub fn acceleration_at(&self, t: f64) -> Vector2D<f64, Acceleration> {
        Vector2D::new(self.x.acceleration_at(t), self.y.acceleration_at(t))
    }
}

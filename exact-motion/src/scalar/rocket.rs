use crate::ConfigError;
use crate::error::{finite, positive_mass};
use crate::math::Polynomial;
use crate::simulate::{SimulationWindow, Simulator};
use crate::timeline::{Interval, Timeline};
use crate::trajectory::AxisMotion;

/// A rocket moving in a straight line, which expels its fuel at a constant rate and
/// then coasts.
///
/// Thrust is `mass_loss_rate · exhaust_velocity`; since the rocket gets lighter as it
/// burns, the acceleration this produces grows over time. Gravity, if any, acts against
/// the direction of travel.
#[derive(Clone, Debug, PartialEq)]
pub struct RocketSimulator {
    base_mass: f64,
    fuel_mass: f64,
    mass_loss_rate: f64,
    exhaust_velocity: f64,
    initial_velocity: f64,
    gravity: f64,
}

impl RocketSimulator {
    /// Constructs a simulator with no gravity.
    ///
    /// `base_mass` is the mass of the rocket with its fuel spent; `fuel_mass` is the
    /// mass of fuel, burned at `mass_loss_rate` (mass per unit time).
    pub fn new(
        base_mass: f64,
        fuel_mass: f64,
        mass_loss_rate: f64,
        exhaust_velocity: f64,
        initial_velocity: f64,
    ) -> Result<Self, ConfigError> {
        if !(fuel_mass >= 0.0 && fuel_mass.is_finite()) {
            return Err(ConfigError::Fuel(fuel_mass));
        }
        if !(mass_loss_rate > 0.0 && mass_loss_rate.is_finite()) {
            return Err(ConfigError::MassLossRate(mass_loss_rate));
        }
        Ok(Self {
            base_mass: positive_mass(base_mass)?,
            fuel_mass,
            mass_loss_rate,
            exhaust_velocity: finite("exhaust velocity", exhaust_velocity)?,
            initial_velocity: finite("velocity", initial_velocity)?,
            gravity: 0.0,
        })
    }

    /// Adds gravity (a positive number), pulling against the direction of travel.
    pub fn with_gravity(mut self, gravity: f64) -> Result<Self, ConfigError> {
        self.gravity = finite("gravity", gravity)?;
        Ok(self)
    }

    /// How long the fuel lasts.
    pub fn burn_duration(&self) -> f64 {
        self.fuel_mass / self.mass_loss_rate
    }
}

impl Simulator for RocketSimulator {
    type Output = RocketTrajectory;

    fn generate(&self, window: SimulationWindow) -> RocketTrajectory {
        let start = window.start();
        let burn = Burn {
            start,
            initial_mass: self.base_mass + self.fuel_mass,
            mass_loss_rate: self.mass_loss_rate,
            exhaust_velocity: self.exhaust_velocity,
            initial_velocity: self.initial_velocity,
            gravity: self.gravity,
        };
        let burn_end = start + self.burn_duration();

        let mut timeline = Timeline::new();
        if burn_end > start {
            timeline.insert(start..burn_end, RocketPhase::Burning(burn));
        }
        let coast = AxisMotion::new(
            -self.gravity,
            burn.velocity(burn_end),
            burn.position(burn_end),
            burn_end,
        );
        timeline.insert(burn_end.., RocketPhase::Coasting(coast.polynomial()));
        log::debug!("rocket: burns over [{start}, {burn_end})");

        RocketTrajectory {
            timeline,
            base_mass: self.base_mass,
            burn,
            burn_end,
        }
    }
}

/// Motion during the burn, from the rocket equation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Burn {
    start: f64,
    initial_mass: f64,
    mass_loss_rate: f64,
    exhaust_velocity: f64,
    initial_velocity: f64,
    gravity: f64,
}

impl Burn {
    /// Mass at time `t`.
    pub fn mass(&self, t: f64) -> f64 {
        self.initial_mass - self.mass_loss_rate * (t - self.start)
    }

    /// Natural logarithm of the mass ratio m₀ / m(t).
    fn log_mass_ratio(&self, t: f64) -> f64 {
        (self.initial_mass / self.mass(t)).ln()
    }

    /// Net acceleration at time `t`, thrust less gravity.
    pub fn acceleration(&self, t: f64) -> f64 {
        self.mass_loss_rate * self.exhaust_velocity / self.mass(t) - self.gravity
    }

    /// Velocity at time `t`.
    pub fn velocity(&self, t: f64) -> f64 {
        let tau = t - self.start;
        self.initial_velocity + self.exhaust_velocity * self.log_mass_ratio(t) - self.gravity * tau
    }

    /// Distance travelled since the start of the burn.
    pub fn position(&self, t: f64) -> f64 {
        let tau = t - self.start;
        let burnout = self.initial_mass / self.mass_loss_rate;
        self.exhaust_velocity * ((tau - burnout) * self.log_mass_ratio(t) + tau)
            + self.initial_velocity * tau
            - 0.5 * self.gravity * tau * tau
    }
}

/// A piece of a [`RocketTrajectory`].
#[derive(Clone, Debug, PartialEq)]
pub enum RocketPhase {
    /// Thrusting, with decreasing mass.
    Burning(Burn),
    /// Out of fuel; position is this polynomial in time.
    Coasting(Polynomial),
}

/// The output of a [`RocketSimulator`].
///
/// The motion is not defined before the start of the window, when the rocket has not
/// been launched; all queries for those times return [`None`].
#[derive(Clone, Debug, PartialEq)]
pub struct RocketTrajectory {
    timeline: Timeline<RocketPhase>,
    base_mass: f64,
    burn: Burn,
    burn_end: f64,
}

impl RocketTrajectory {
    /// The time the fuel runs out.
    pub fn burn_end(&self) -> f64 {
        self.burn_end
    }

    /// Returns the phase of flight at time `t`, and the interval it lasts for.
    pub fn phase_at(&self, t: f64) -> Option<(Interval, &RocketPhase)> {
        let (interval, phase) = self.timeline.segment_containing(t)?;
        Some((interval, phase?))
    }

    /// Distance travelled since launch.
    pub fn position_at(&self, t: f64) -> Option<f64> {
        Some(match self.timeline.get(t)? {
            RocketPhase::Burning(burn) => burn.position(t),
            RocketPhase::Coasting(p) => p.evaluate(t),
        })
    }

    /// Velocity at time `t`, or [`None`] if `t` is NaN.
    pub fn velocity_at(&self, t: f64) -> Option<f64> {
        Some(match self.timeline.get(t)? {
            RocketPhase::Burning(burn) => burn.velocity(t),
            RocketPhase::Coasting(p) => p.derivative().evaluate(t),
        })
    }

    /// Acceleration at time `t`, or [`None`] if `t` is NaN.
    pub fn acceleration_at(&self, t: f64) -> Option<f64> {
        Some(match self.timeline.get(t)? {
            RocketPhase::Burning(burn) => burn.acceleration(t),
            RocketPhase::Coasting(p) => p.derivative().derivative().evaluate(t),
        })
    }

    /// Mass of the rocket including remaining fuel.
    pub fn mass_at(&self, t: f64) -> Option<f64> {
        Some(match self.timeline.get(t)? {
            RocketPhase::Burning(burn) => burn.mass(t),
            RocketPhase::Coasting(_) => self.base_mass,
        })
    }

    /// The burn, whether or not it has any duration.
    pub fn burn(&self) -> &Burn {
        &self.burn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    // 100 kg dry, 400 kg fuel burned at 10 kg/s with 2000 m/s exhaust: burn lasts 40 s
    // and ends at a mass ratio of 5.
    fn test_rocket() -> RocketSimulator {
        RocketSimulator::new(100.0, 400.0, 10.0, 2000.0, 0.0).unwrap()
    }

    #[test]
    fn burn_time_and_values() {
        let window = SimulationWindow::new(5.0, 100.0).unwrap();
        let output = test_rocket().generate(window);
        assert_eq!(output.burn_end(), 45.0);

        // Just after launch, a = 10 · 2000 / 500
        assert!(close(output.acceleration_at(5.0).unwrap(), 40.0));
        assert_eq!(output.mass_at(25.0), Some(300.0));
        // Burnout velocity from the rocket equation: ve · ln 5
        let burnout_velocity = 2000.0 * 5.0f64.ln();
        assert!(close(output.velocity_at(45.0).unwrap(), burnout_velocity));
        assert_eq!(output.mass_at(60.0), Some(100.0));
        assert_eq!(output.acceleration_at(60.0), Some(0.0));

        // Position is continuous across burnout and grows linearly afterward.
        let at_burnout = output.position_at(45.0).unwrap();
        assert!((output.position_at(44.999_999).unwrap() - at_burnout).abs() < 1e-2);
        assert!(close(
            output.position_at(55.0).unwrap(),
            at_burnout + 10.0 * burnout_velocity
        ));
    }

    #[test]
    fn burn_position_integrates_velocity() {
        let window = SimulationWindow::new(0.0, 100.0).unwrap();
        let output = test_rocket().with_gravity(9.8).unwrap().generate(window);
        // Trapezoid rule over the burn
        let n = 4000;
        let dt = 40.0 / f64::from(n);
        let integral: f64 = (0..n)
            .map(|i| {
                let t = f64::from(i) * dt;
                0.5 * (output.velocity_at(t).unwrap() + output.velocity_at(t + dt).unwrap()) * dt
            })
            .sum();
        let position = output.position_at(40.0).unwrap();
        assert!((integral - position).abs() < 1e-3 * position, "{integral} vs {position}");
    }

    #[test]
    fn nothing_before_launch() {
        let window = SimulationWindow::new(5.0, 100.0).unwrap();
        let output = test_rocket().generate(window);
        assert_eq!(output.position_at(4.999), None);
        assert_eq!(output.velocity_at(0.0), None);
        assert_eq!(output.mass_at(-10.0), None);
        assert_eq!(output.position_at(5.0), Some(0.0));
        assert!(matches!(
            output.phase_at(10.0),
            Some((_, RocketPhase::Burning(_)))
        ));
        assert!(matches!(
            output.phase_at(50.0),
            Some((_, RocketPhase::Coasting(_)))
        ));
    }

    #[test]
    fn no_fuel_just_coasts() {
        let window = SimulationWindow::new(0.0, 10.0).unwrap();
        let output = RocketSimulator::new(100.0, 0.0, 1.0, 2000.0, 3.0)
            .unwrap()
            .generate(window);
        assert_eq!(output.burn_end(), 0.0);
        assert_eq!(output.position_at(2.0), Some(6.0));
        assert_eq!(output.mass_at(0.0), Some(100.0));
    }

    #[test]
    fn rejects_bad_parameters() {
        assert_eq!(
            RocketSimulator::new(0.0, 1.0, 1.0, 1.0, 0.0),
            Err(ConfigError::Mass(0.0))
        );
        assert_eq!(
            RocketSimulator::new(1.0, -1.0, 1.0, 1.0, 0.0),
            Err(ConfigError::Fuel(-1.0))
        );
        assert_eq!(
            RocketSimulator::new(1.0, 1.0, 0.0, 1.0, 0.0),
            Err(ConfigError::MassLossRate(0.0))
        );
    }
}

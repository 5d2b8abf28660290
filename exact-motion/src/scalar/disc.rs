use core::f64::consts::PI;

use crate::ConfigError;
use crate::math::Polynomial;

/// A flat, rotationally symmetric disc whose areal density may vary with radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Disc {
    radius: f64,
    specific_mass: Polynomial,
    mass: f64,
    moment_of_inertia: f64,
}

impl Disc {
    /// Constructs a disc of the given radius whose mass per unit area, at distance `r`
    /// from the center, is `specific_mass(r)`.
    ///
    /// Returns an error if the radius is not positive, or if the density integrates to a
    /// mass or moment of inertia which is not positive.
    pub fn new(radius: f64, specific_mass: Polynomial) -> Result<Self, ConfigError> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(ConfigError::Radius(radius));
        }
        // Each thin ring at radius r has area 2πr·dr.
        let mass = 2.0 * PI * specific_mass.definite_integral(radius);
        if !(mass > 0.0 && mass.is_finite()) {
            return Err(ConfigError::DiscMass(mass));
        }
        let r_squared = Polynomial::new([0.0, 0.0, 1.0]);
        let moment_of_inertia = 2.0 * PI * (&specific_mass * &r_squared).definite_integral(radius);
        if !(moment_of_inertia > 0.0 && moment_of_inertia.is_finite()) {
            return Err(ConfigError::DiscMomentOfInertia(moment_of_inertia));
        }
        Ok(Self {
            radius,
            specific_mass,
            mass,
            moment_of_inertia,
        })
    }

    /// Constructs a disc of uniform density with the given total mass.
    pub fn uniform(radius: f64, mass: f64) -> Result<Self, ConfigError> {
        let mass = crate::error::positive_mass(mass)?;
        Self::new(radius, Polynomial::constant(mass / (PI * radius * radius)))
    }

    /// Distance from the center to the rim.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Mass per unit area as a function of distance from the center.
    pub fn specific_mass(&self) -> &Polynomial {
        &self.specific_mass
    }

    /// Total mass, the integral of the specific mass over the disc.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Moment of inertia about the axis through the center, perpendicular to the disc.
    pub fn moment_of_inertia(&self) -> f64 {
        self.moment_of_inertia
    }
}

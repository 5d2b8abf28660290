/// A simulation was configured with physically meaningless parameters.
///
/// These are detected when the affected value is constructed, so that generation itself
/// never fails.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A mass was zero, negative, or not finite.
    #[error("mass must be positive and finite, not {0}")]
    Mass(f64),

    /// A radius was negative or not finite.
    #[error("radius must be non-negative and finite, not {0}")]
    Radius(f64),

    /// The end of a simulation window precedes its start, or either is not finite.
    #[error("simulation window [{start}, {end}] is not a finite forward interval")]
    Window {
        /// Start of the rejected window.
        start: f64,
        /// End of the rejected window.
        end: f64,
    },

    /// An arena has zero width or height, or non-finite extents.
    #[error("arena must have finite, nonzero width and height")]
    DegenerateArena,

    /// A kinematic quantity of an initial state was not finite.
    #[error("initial {quantity} must be finite, not {value}")]
    Motion {
        /// Name of the offending quantity.
        quantity: &'static str,
        /// The value given.
        value: f64,
    },

    /// Integrating a disc's density gave a mass that is not positive.
    #[error("disc density integrates to a mass of {0}, which is not positive")]
    DiscMass(f64),

    /// Integrating a disc's density gave a moment of inertia that is not positive.
    #[error("disc density integrates to a moment of inertia of {0}, which is not positive")]
    DiscMomentOfInertia(f64),

    /// A coefficient of friction was negative or not finite.
    #[error("coefficient of friction must be non-negative and finite, not {0}")]
    Friction(f64),

    /// A rocket's fuel mass was negative or not finite.
    #[error("fuel mass must be non-negative and finite, not {0}")]
    Fuel(f64),

    /// A rocket's rate of mass loss was not positive.
    #[error("mass loss rate must be positive and finite, not {0}")]
    MassLossRate(f64),
}

/// Checks that `value` is finite, reporting it as `quantity` otherwise.
pub(crate) fn finite(quantity: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Motion { quantity, value })
    }
}

/// Checks that `value` is a usable mass.
pub(crate) fn positive_mass(value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::Mass(value))
    }
}

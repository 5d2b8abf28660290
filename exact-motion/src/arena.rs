//! [`Arena`], the box bodies bounce around in, and its [`Wall`]s.

#[cfg(feature = "serde")]
use euclid::Point2D;

use crate::ConfigError;
use crate::math::Position;

/// An axis-aligned rectangle which bodies stay within, bouncing elastically off its
/// walls.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ArenaSer", into = "ArenaSer")
)]
pub struct Arena {
    min: Position,
    max: Position,
}

impl Arena {
    /// Constructs an [`Arena`] with the given opposite corners, in either order.
    ///
    /// Returns an error if the corners are not finite or do not span a nonzero width and
    /// height.
    pub fn new(a: Position, b: Position) -> Result<Self, ConfigError> {
        let min = a.min(b);
        let max = a.max(b);
        if !(min.x.is_finite() && min.y.is_finite() && max.x.is_finite() && max.y.is_finite())
            || min.x == max.x
            || min.y == max.y
        {
            return Err(ConfigError::DegenerateArena);
        }
        Ok(Self { min, max })
    }

    /// The corner with the lowest coordinates.
    #[inline]
    pub fn min(&self) -> Position {
        self.min
    }

    /// The corner with the highest coordinates.
    #[inline]
    pub fn max(&self) -> Position {
        self.max
    }

    /// The coordinate, on the axis perpendicular to `wall`, of the center of a body of
    /// the given radius touching that wall.
    pub fn contact_coordinate(&self, wall: Wall, radius: f64) -> f64 {
        match wall {
            Wall::Left => self.min.x + radius,
            Wall::Right => self.max.x - radius,
            Wall::Bottom => self.min.y + radius,
            Wall::Top => self.max.y - radius,
        }
    }
}

/// One of the four walls of an [`Arena`].
///
/// The ordering is the order in which simultaneous hits on walls are resolved.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Wall {
    /// The wall at minimum X.
    Left,
    /// The wall at maximum X.
    Right,
    /// The wall at minimum Y.
    Bottom,
    /// The wall at maximum Y.
    Top,
}

impl Wall {
    /// All walls, in resolution order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Bottom, Self::Top];

    /// The axis perpendicular to this wall, which is the one a hit reverses.
    pub fn axis(self) -> Axis {
        match self {
            Wall::Left | Wall::Right => Axis::X,
            Wall::Bottom | Wall::Top => Axis::Y,
        }
    }

    /// +1 if the inside of the arena is in the positive direction from this wall, −1 if
    /// negative.
    pub(crate) fn inward(self) -> f64 {
        match self {
            Wall::Left | Wall::Bottom => 1.0,
            Wall::Right | Wall::Top => -1.0,
        }
    }
}

/// One of the two axes of the plane of motion.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// Both axes.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];
}

#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
struct ArenaSer {
    min: [f64; 2],
    max: [f64; 2],
}

#[cfg(feature = "serde")]
impl TryFrom<ArenaSer> for Arena {
    type Error = ConfigError;
    fn try_from(value: ArenaSer) -> Result<Self, Self::Error> {
        Arena::new(Point2D::from(value.min), Point2D::from(value.max))
    }
}

#[cfg(feature = "serde")]
impl From<Arena> for ArenaSer {
    fn from(value: Arena) -> Self {
        ArenaSer {
            min: value.min.to_array(),
            max: value.max.to_array(),
        }
    }
}

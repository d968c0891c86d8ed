//! Board coordinates.

use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use ndarray::Ix;
use thiserror::Error;

/// One coordinate of a [`Position`].
pub type Coord = usize;
/// A board width or height.
pub type Dimension = NonZero<Coord>;

/// A position `(x, y)` on a board. The top left corner is `Position(0, 0)`.
///
/// Positions double as set and map keys; their canonical text form is `"x,y"`.
#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Default)]
pub struct Position(pub Coord, pub Coord);

impl Position {
    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    /// Step by `(dx, dy)`.
    ///
    /// Steps off the top or left edge wrap around to huge coordinates, which no board contains.
    pub fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }

    /// The `(dx, dy)` offset leading from `self` to `other`.
    pub fn delta_to(self, other: Position) -> (isize, isize) {
        (
            other.0.wrapping_sub(self.0) as isize,
            other.1.wrapping_sub(self.1) as isize,
        )
    }

    /// Manhattan distance, the remaining-cost estimate used by path search.
    pub fn manhattan(self, other: Position) -> usize {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }
}

impl From<(Ix, Ix)> for Position {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

/// Failure to read a position from its `"x,y"` form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a position of the form \"x,y\", got {0:?}")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePositionError(s.to_owned());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        Ok(Self(
            x.trim().parse().map_err(|_| err())?,
            y.trim().parse().map_err(|_| err())?,
        ))
    }
}

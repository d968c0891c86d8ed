//! Cell shapes: the directions a line may step in.

use std::fmt::Debug;
use std::hash::Hash;

use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::position::Position;

/// One direction of travel between neighboring cells. Each board shape supplies its own.
///
/// The order of [`VariantArray::VARIANTS`] is significant: it must walk around a cell clockwise.
/// Perimeter tracing relies on this and does not check it.
///
/// [`SquareStep`] and [`HexStep`] are built-in implementations.
pub trait Step: Sized + Copy + VariantArray + Debug + PartialEq + Eq + Hash + Ord + PartialOrd + 'static {
    /// The `(dx, dy)` offset this direction has when stepping from `position`.
    fn offset(&self, position: Position) -> (isize, isize);

    /// The direction pointing back the way `self` came.
    fn invert(&self) -> Self;

    /// Attempt the step from `position` in the direction specified by `self` and return the resultant [`Position`].
    fn attempt_from(&self, position: Position) -> Position {
        position.offset_by(self.offset(position))
    }

    /// Lay out one character per cell, a row per line.
    fn print(board: &Array2<char>) -> String {
        board.rows()
            .into_iter()
            .map(|row| row.iter().collect::<String>())
            .join("\n")
    }
}

/// The square cell type and rectangular board shape, with four neighbors per cell.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    /// Towards row 0.
    Up,
    /// Towards higher columns.
    Right,
    /// Towards higher rows.
    Down,
    /// Towards column 0.
    Left,
}

impl Step for SquareStep {
    fn offset(&self, _: Position) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    fn invert(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }
}

// NB: hexagonal boards are stored in a plain grid with every even column shifted half a cell down:
//  0   2   4
//    1   3
//  0   2   4
//    1   3
/// Hexagonal cells with six neighbors, stored in columns where even columns sit half a cell lower.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum HexStep {
    /// Up and to the left.
    UpLeft,
    /// Straight up the column.
    Up,
    /// Up and to the right.
    UpRight,
    /// Down and to the right.
    DownRight,
    /// Straight down the column.
    Down,
    /// Down and to the left.
    DownLeft,
}

impl Step for HexStep {
    fn offset(&self, position: Position) -> (isize, isize) {
        // the diagonal neighbors depend on the parity of the column
        let lowered = position.0 % 2 == 0;
        match self {
            Self::UpLeft => if lowered { (-1, 0) } else { (-1, -1) },
            Self::Up => (0, -1),
            Self::UpRight => if lowered { (1, 0) } else { (1, -1) },
            Self::DownRight => if lowered { (1, 1) } else { (1, 0) },
            Self::Down => (0, 1),
            Self::DownLeft => if lowered { (-1, 1) } else { (-1, 0) },
        }
    }

    fn invert(&self) -> Self {
        match self {
            Self::UpLeft => Self::DownRight,
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::DownRight => Self::UpLeft,
            Self::Down => Self::Up,
            Self::DownLeft => Self::UpRight,
        }
    }
}

/// Functionality on top of [`Step`] with identical implementation across all shapes.
pub trait BoardShape: Step {
    /// Get all neighbors of a [`Position`] in "theory", by attempting every step direction in clockwise order.
    fn neighbors_of(position: Position) -> Vec<(Self, Position)>;
    /// The ordered `(dx, dy)` offsets of every neighbor of `position`.
    fn neighbor_directions(position: Position) -> Vec<(isize, isize)>;
    /// The direction leading from `a` straight to `b`.
    ///
    /// Returns [`None`] if `a` and `b` are not adjacent.
    fn direction_to(a: Position, b: Position) -> Option<Self>;
    /// Position of this direction in the clockwise rotation.
    fn rotation_index(&self) -> usize;
    /// The direction one clockwise turn after this one.
    fn next_clockwise(&self) -> Self;
    /// Every direction, clockwise, starting with this one.
    fn clockwise_from(&self) -> Vec<Self>;
}

impl<Sh> BoardShape for Sh
where
    Sh: Step,
{
    fn neighbors_of(position: Position) -> Vec<(Self, Position)> {
        Self::VARIANTS.iter()
            .map(|dir| (*dir, dir.attempt_from(position)))
            .collect_vec()
    }

    fn neighbor_directions(position: Position) -> Vec<(isize, isize)> {
        Self::VARIANTS.iter()
            .map(|dir| dir.offset(position))
            .collect_vec()
    }

    fn direction_to(a: Position, b: Position) -> Option<Self> {
        Self::VARIANTS.iter().find(|dir| dir.attempt_from(a) == b).copied()
    }

    fn rotation_index(&self) -> usize {
        Self::VARIANTS.iter()
            .position(|dir| dir == self)
            .unwrap_or_default()
    }

    fn next_clockwise(&self) -> Self {
        Self::VARIANTS[(self.rotation_index() + 1) % Self::VARIANTS.len()]
    }

    fn clockwise_from(&self) -> Vec<Self> {
        Self::VARIANTS.iter()
            .cycle()
            .skip(self.rotation_index())
            .take(Self::VARIANTS.len())
            .copied()
            .collect_vec()
    }
}

//! The [`Board`] grid, its text form, and queries over cells and lines.

use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use thiserror::Error;

use crate::cell::Cell;
use crate::color::{Affiliation, Color};
use crate::position::Position;
use crate::shape::{BoardShape, Step};

/// Ways a board can refuse an operation or fail to be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// The position is not on the board.
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    /// The board text has no cells.
    #[error("board text contains no cells")]
    Empty,
    /// A row of the board text does not match the width of the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
}

/// A board object using cells organized as specified by `Sh`.
/// See the [`Step`] and [`BoardShape`] traits for more information.
///
/// Boards are read from text (see [`FromStr`]) or assembled with a [`BoardBuilder`](crate::builder::BoardBuilder).
/// Every position in range holds exactly one [`Cell`]; cloning copies all of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board<Sh>
where
    Sh: Step,
{
    pub(crate) cells: Array2<Cell>,
    shape: PhantomData<Sh>,
}

impl<Sh> Board<Sh>
where
    Sh: Step,
{
    pub(crate) fn from_cells(cells: Array2<Cell>) -> Self {
        Self { cells, shape: PhantomData }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.cells.ncols()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.cells.nrows()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// The cell at `position`, if it is on the board.
    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.cells.get(position.as_index())
    }

    /// The cell at `position`, failing for positions off the board.
    pub fn get_cell(&self, position: Position) -> Result<&Cell, BoardError> {
        self.cell(position).ok_or(BoardError::OutOfBounds(position))
    }

    /// Recolor the cell at `position`. The endpoint flag is left alone.
    pub fn set_color(&mut self, position: Position, color: Color) -> Result<(), BoardError> {
        let cell = self.cells.get_mut(position.as_index()).ok_or(BoardError::OutOfBounds(position))?;
        cell.color = color;
        Ok(())
    }

    // for positions already known to be on the board
    pub(crate) fn paint(&mut self, position: Position, color: Color) {
        self[position].color = color;
    }

    /// Whether `position` is on the board and not a wall.
    pub fn is_valid_position(&self, position: Position) -> bool {
        self.cell(position).is_some_and(|cell| !cell.is_wall())
    }

    /// Neighbors of `position` that are valid positions, in clockwise order.
    pub fn neighbor_positions(&self, position: Position) -> impl Iterator<Item=Position> + '_ {
        Sh::neighbors_of(position)
            .into_iter()
            .map(|(_, neighbor)| neighbor)
            .filter(move |neighbor| self.is_valid_position(*neighbor))
    }

    /// Cells at [`Self::neighbor_positions`].
    pub fn neighbor_cells(&self, position: Position) -> impl Iterator<Item=&Cell> + '_ {
        self.neighbor_positions(position).map(move |neighbor| &self[neighbor])
    }

    /// Neighbor cells with exactly the color found at `position`.
    pub fn same_color_neighbor_cells(&self, position: Position) -> impl Iterator<Item=&Cell> + '_ {
        let color = self.cell(position).map(|cell| cell.color);
        self.neighbor_cells(position).filter(move |neighbor| Some(neighbor.color) == color)
    }

    /// Empty neighbor cells of `position`.
    pub fn empty_neighbor_cells(&self, position: Position) -> impl Iterator<Item=&Cell> + '_ {
        self.neighbor_cells(position).filter(|neighbor| neighbor.is_empty())
    }

    /// Positions the line at `position` is joined to. Empty for cells without a line.
    pub fn connections(&self, position: Position) -> Vec<Position> {
        if !self.cell(position).is_some_and(Cell::has_line) {
            return Vec::new();
        }

        self.same_color_neighbor_cells(position)
            .map(|neighbor| neighbor.position)
            .collect_vec()
    }

    /// Every cell, row by row.
    pub fn iterate_cells(&self) -> impl Iterator<Item=&Cell> + '_ {
        self.cells.iter()
    }

    /// Cells carrying a line color, row by row.
    pub fn iterate_filled_cells(&self) -> impl Iterator<Item=&Cell> + '_ {
        self.iterate_cells().filter(|cell| cell.has_line())
    }

    /// Loose line ends, row by row. A lone endpoint counts as a tail.
    pub fn iterate_tails(&self) -> impl Iterator<Item=&Cell> + '_ {
        self.iterate_filled_cells().filter(move |cell| cell.is_tail(self))
    }

    /// How many cells are still empty.
    pub fn empty_count(&self) -> usize {
        self.iterate_cells().filter(|cell| cell.is_empty()).count()
    }

    /// Every line color present on the board.
    pub fn colors(&self) -> BTreeSet<Affiliation> {
        self.iterate_cells()
            .filter_map(|cell| cell.color.affiliation())
            .collect()
    }

    /// Whether an open route joins `from` and `to`, moving through empty cells and cells colored like `from`.
    pub fn can_connect(&self, from: Position, to: Position) -> bool {
        let Some(origin) = self.cell(from) else {
            return false;
        };

        let mut seen = HashSet::from([from]);
        let mut frontier = VecDeque::from([from]);
        while let Some(position) = frontier.pop_front() {
            if position == to {
                return true;
            }

            for neighbor in self.neighbor_cells(position) {
                if (neighbor.is_empty() || neighbor.color == origin.color) && seen.insert(neighbor.position) {
                    frontier.push_back(neighbor.position);
                }
            }
        }

        false
    }

    /// Whether the board is solved.
    ///
    /// Every cell is a wall or a line, no tails remain, endpoints have exactly one same-colored neighbor,
    /// segments exactly two, and the cells of each color form one connected line.
    pub fn is_complete(&self) -> bool {
        if !self.iterate_cells().all(|cell| cell.is_wall() || cell.has_line()) {
            return false;
        }

        if self.iterate_tails().next().is_some() {
            return false;
        }

        let degrees_match = self.iterate_filled_cells().all(|cell| {
            let expected = if cell.is_endpoint { 1 } else { 2 };
            self.same_color_neighbor_cells(cell.position).count() == expected
        });
        if !degrees_match {
            return false;
        }

        // a stray loop of some color would satisfy the degree check on its own
        self.colors().into_iter().all(|affiliation| {
            let color = Color::from(affiliation);
            let members = self.iterate_cells()
                .filter(|cell| cell.color == color)
                .collect_vec();
            members.iter()
                .find(|cell| cell.is_endpoint)
                .is_some_and(|endpoint| self.color_component(endpoint.position).len() == members.len())
        })
    }

    fn color_component(&self, from: Position) -> HashSet<Position> {
        let mut seen = HashSet::from([from]);
        let mut frontier = vec![from];
        while let Some(position) = frontier.pop() {
            for neighbor in self.same_color_neighbor_cells(position) {
                if seen.insert(neighbor.position) {
                    frontier.push(neighbor.position);
                }
            }
        }

        seen
    }
}

impl<Sh: Step> Index<Position> for Board<Sh> {
    type Output = Cell;

    /// Panics if `index` is off the board.
    fn index(&self, index: Position) -> &Self::Output {
        &self.cells[index.as_index()]
    }
}

impl<Sh: Step> IndexMut<Position> for Board<Sh> {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.cells[index.as_index()]
    }
}

impl<Sh: Step> FromStr for Board<Sh> {
    type Err = BoardError;

    /// Read a board: one character per cell, rows separated by newlines.
    /// Uppercase letters are endpoints, lowercase letters are segments, `#` is a wall and `-` is empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.trim()
            .lines()
            .map(|row| row.chars().collect_vec())
            .collect_vec();

        let width = rows.first()
            .map(Vec::len)
            .filter(|width| *width > 0)
            .ok_or(BoardError::Empty)?;
        if let Some((row, found)) = rows.iter().map(Vec::len).enumerate().find(|(_, len)| *len != width) {
            return Err(BoardError::Ragged { row, expected: width, found });
        }

        Ok(Self::from_cells(Array2::from_shape_fn((rows.len(), width), |(y, x)| {
            let (color, is_endpoint) = Color::from_char(rows[y][x]);
            Cell::new(Position(x, y), color, is_endpoint)
        })))
    }
}

impl<Sh: Step> Display for Board<Sh> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Sh::print(&self.cells.map(|cell| cell.color.to_char(cell.is_endpoint))))
    }
}

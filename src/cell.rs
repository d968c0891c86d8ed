//! Single cells and their role in a line.

use crate::board::Board;
use crate::color::Color;
use crate::position::Position;
use crate::shape::Step;

/// Role of a cell, derived from its color and endpoint flag.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
pub enum CellType {
    /// No line yet.
    Empty,
    /// Impassable.
    Wall,
    /// A fixed terminus of a line.
    Endpoint,
    /// A drawn, non-endpoint part of a line.
    LineSegment,
    /// Content outside the board grammar.
    Unknown,
}

/// A single grid position's content.
///
/// Cells hold no reference to their board; queries which depend on neighbors take the [`Board`] explicitly.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Cell {
    /// Where this cell lives.
    pub position: Position,
    /// Current content.
    pub color: Color,
    /// Whether this cell is a fixed terminus. Survives recoloring.
    pub is_endpoint: bool,
}

impl Cell {
    pub(crate) fn new(position: Position, color: Color, is_endpoint: bool) -> Self {
        Self { position, color, is_endpoint }
    }

    /// Classify this cell.
    pub fn cell_type(&self) -> CellType {
        match self.color {
            Color::Empty => CellType::Empty,
            Color::Wall => CellType::Wall,
            Color::Line(_) if self.is_endpoint => CellType::Endpoint,
            Color::Line(_) => CellType::LineSegment,
            Color::Unknown(_) => CellType::Unknown,
        }
    }

    /// Whether no line passes through here.
    pub fn is_empty(&self) -> bool {
        self.color == Color::Empty
    }

    /// Whether this is a wall.
    pub fn is_wall(&self) -> bool {
        self.color == Color::Wall
    }

    /// Whether this cell carries a line color.
    pub fn has_line(&self) -> bool {
        self.color.is_line()
    }

    /// Whether this is the loose end of a line: a lone endpoint, or a segment with a single same-colored neighbor.
    pub fn is_tail<Sh: Step>(&self, board: &Board<Sh>) -> bool {
        if !self.has_line() {
            return false;
        }

        match board.same_color_neighbor_cells(self.position).count() {
            0 => true,
            1 => !self.is_endpoint,
            _ => false,
        }
    }

    /// Whether a neighboring line can still extend into this cell.
    pub fn is_active<Sh: Step>(&self, board: &Board<Sh>) -> bool {
        self.is_empty() || self.is_tail(board)
    }
}

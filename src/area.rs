//! Open areas: the regions of empty space a line can still grow into, and the clockwise trace of their boundaries.

use std::collections::{BTreeSet, HashSet, VecDeque};

use itertools::Itertools;
use log::trace;
use ndarray::Array2;
use thiserror::Error;

use crate::board::Board;
use crate::color::Affiliation;
use crate::knot::AreaColors;
use crate::position::Position;
use crate::shape::{BoardShape, Step};

/// Broken assumptions while building an [`Area`]. These indicate a defect in the caller or a corrupted board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AreaError {
    /// Areas grow only from empty cells and tails.
    #[error("cannot grow an area from inactive cell {0}")]
    InactiveSeed(Position),
    /// The trace start must border something outside the area.
    #[error("perimeter start {0} has no neighbor outside its area")]
    NoExteriorDirection(Position),
    /// No member of the area follows this position along the boundary.
    #[error("perimeter trace found no next step from {0}")]
    DetachedStep(Position),
    /// The boundary walk did not close.
    #[error("perimeter trace starting at {0} did not close")]
    Unterminated(Position),
}

/// A maximal connected region of active cells.
///
/// `perimeter` walks the boundary of `positions` clockwise and closes back on its first element.
/// Positions along one-cell-wide channels appear on it once per side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Area {
    /// Every cell reached by the flood fill.
    pub positions: HashSet<Position>,
    /// Clockwise boundary trace.
    pub perimeter: Vec<Position>,
    /// `positions` not on the perimeter.
    pub body: HashSet<Position>,
}

impl Area {
    fn new(positions: HashSet<Position>, perimeter: Vec<Position>) -> Self {
        let on_perimeter: HashSet<Position> = perimeter.iter().copied().collect();
        let body = positions.difference(&on_perimeter).copied().collect();
        Self { positions, perimeter, body }
    }

    /// Flood-fill the area around `seed`, which must be empty or a tail.
    ///
    /// The fill only spreads out of empty cells. Tails join the area they touch but never carry the fill past themselves,
    /// so a drawn line splits the empty space on either side of it into separate areas.
    pub fn from_cell<Sh: Step>(board: &Board<Sh>, seed: Position) -> Result<Self, AreaError> {
        if !board.cell(seed).is_some_and(|cell| cell.is_active(board)) {
            return Err(AreaError::InactiveSeed(seed));
        }

        let mut positions = HashSet::from([seed]);
        let mut frontier = VecDeque::from([seed]);
        while let Some(position) = frontier.pop_front() {
            if !board[position].is_empty() {
                continue;
            }

            for neighbor in board.neighbor_cells(position) {
                if neighbor.is_active(board) && positions.insert(neighbor.position) {
                    frontier.push_back(neighbor.position);
                }
            }
        }

        if positions.len() == 1 {
            return Ok(Self::new(positions, vec![seed]));
        }

        let perimeter = trace_perimeter::<Sh>(&positions)?;
        Ok(Self::new(positions, perimeter))
    }

    /// Line colors found in the body. Every body cell is active, so these are all tails.
    pub fn inner_colors<Sh: Step>(&self, board: &Board<Sh>) -> BTreeSet<Affiliation> {
        self.body.iter()
            .filter_map(|position| board[*position].color.affiliation())
            .collect()
    }

    /// Draw this area over `board`: `^` for members, `@` for the perimeter and `-` elsewhere.
    pub fn render<Sh: Step>(&self, board: &Board<Sh>) -> String {
        let mut grid = Array2::from_elem(board.cells.raw_dim(), '-');
        for position in &self.positions {
            grid[position.as_index()] = '^';
        }
        for position in &self.perimeter {
            grid[position.as_index()] = '@';
        }

        Sh::print(&grid)
    }
}

/// Follow the boundary of `positions` clockwise, keeping the outside on the left.
///
/// The walk starts at the member with the lowest `x` (then `y`), facing out of the area, and stops as soon as it is about to
/// repeat its first step. Until then the start may be passed through again, which happens when it sits on a thin channel.
fn trace_perimeter<Sh: Step>(positions: &HashSet<Position>) -> Result<Vec<Position>, AreaError> {
    let Some(start) = positions.iter().min().copied() else {
        return Ok(Vec::new());
    };

    let outward = Sh::VARIANTS.iter()
        .find(|direction| !positions.contains(&direction.attempt_from(start)))
        .ok_or(AreaError::NoExteriorDirection(start))?;
    let first = next_boundary_step(positions, start, *outward)
        .ok_or(AreaError::DetachedStep(start))?;

    // every directed step between members is taken at most once
    let limit = positions.len() * Sh::VARIANTS.len();

    let mut perimeter = vec![start];
    let (mut previous, mut current) = (start, first);
    loop {
        let back = Sh::direction_to(current, previous).ok_or(AreaError::DetachedStep(current))?;
        let next = next_boundary_step(positions, current, back).ok_or(AreaError::DetachedStep(current))?;
        if current == start && next == first {
            return Ok(perimeter);
        }

        perimeter.push(current);
        if perimeter.len() > limit {
            return Err(AreaError::Unterminated(start));
        }
        (previous, current) = (current, next);
    }
}

// scan clockwise starting one turn past `back`, so going back the way we came is the last resort
fn next_boundary_step<Sh: Step>(positions: &HashSet<Position>, from: Position, back: Sh) -> Option<Position> {
    back.next_clockwise()
        .clockwise_from()
        .into_iter()
        .map(|direction| direction.attempt_from(from))
        .find(|candidate| positions.contains(candidate))
}

impl<Sh> Board<Sh>
where
    Sh: Step,
{
    /// Split every active cell into areas.
    ///
    /// Empty cells are claimed first, in row order. Tails left over afterwards have no empty neighbor and each become a
    /// single-cell area. Positions may belong to more than one area when a tail borders several.
    pub fn open_areas(&self) -> Result<Vec<Area>, AreaError> {
        let mut areas = Vec::new();
        let mut claimed = HashSet::new();

        let order = self.iterate_cells().map(|cell| cell.position).collect_vec();
        for empty_pass in [true, false] {
            for position in &order {
                let cell = &self[*position];
                if claimed.contains(position) || (empty_pass && !cell.is_empty()) || !cell.is_active(self) {
                    continue;
                }

                let area = Area::from_cell(self, *position)?;
                claimed.extend(area.positions.iter().copied());
                areas.push(area);
            }
        }

        trace!("found {} open areas", areas.len());
        Ok(areas)
    }

    /// Line colors met along `perimeter`, in order.
    pub fn edge_color_ordering(&self, perimeter: &[Position]) -> Vec<Affiliation> {
        perimeter.iter()
            .filter_map(|position| self[*position].color.affiliation())
            .collect_vec()
    }

    /// Color summary of `area` for knot simplification.
    pub fn area_colors(&self, area: &Area) -> AreaColors {
        AreaColors::new(self.edge_color_ordering(&area.perimeter), area.inner_colors(self))
    }

    /// Color summaries of `areas`, taken together.
    ///
    /// Colors with a tail in more than one area are released from every summary, see [`AreaColors::release_shared`].
    /// A released color still counts as a line into each area holding both of its tails, since the rest of a line runs
    /// through empty cells and so never leaves one area.
    pub fn open_area_colors(&self, areas: &[Area]) -> Vec<AreaColors> {
        let shared: BTreeSet<Affiliation> = areas.iter()
            .flat_map(|area| area.positions.iter())
            .counts()
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .filter_map(|(position, _)| self[*position].color.affiliation())
            .collect();
        if !shared.is_empty() {
            trace!("tails shared between areas: {}", shared.iter().join(""));
        }

        areas.iter()
            .map(|area| {
                let mut colors = self.area_colors(area);
                // every line cell of an area is a tail
                let reaching: BTreeSet<Affiliation> = area.positions.iter()
                    .filter_map(|position| self[*position].color.affiliation())
                    .counts()
                    .into_iter()
                    .filter(|(_, tails)| *tails >= 2)
                    .map(|(color, _)| color)
                    .collect();
                colors.release_shared(&shared, &reaching);
                colors
            })
            .collect_vec()
    }
}

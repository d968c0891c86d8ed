//! Path search for drawing single lines, with or without displacing others.

use std::cmp::Reverse;
use std::ops::Deref;

use itertools::Itertools;
use log::{debug, trace};
use ndarray::Array2;

use crate::board::Board;
use crate::color::{Affiliation, Color};
use crate::position::Position;
use crate::shape::Step;

/// Bounds on path search effort.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchLimits {
    /// Partial paths that may be expanded before the search reports no path.
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self { max_expansions: 10_000 }
    }
}

/// A route across a board, from its first position to its last.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Path(pub Vec<Position>);

impl Deref for Path {
    type Target = [Position];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Path {
    /// Draw the path over `board` as `@`, with `-` elsewhere.
    pub fn render<Sh: Step>(&self, board: &Board<Sh>) -> String {
        let mut grid = Array2::from_elem(board.cells.raw_dim(), '-');
        for position in self.iter() {
            if let Some(slot) = grid.get_mut(position.as_index()) {
                *slot = '@';
            }
        }

        Sh::print(&grid)
    }
}

/// Move generation and ranking for [`find_path`].
pub trait SearchPolicy<Sh: Step> {
    /// Positions the partial `path` may be extended to.
    fn next_moves(&self, board: &Board<Sh>, path: &[Position]) -> Vec<Position>;

    /// Rank of a partial path heading for `target`; lower is better.
    ///
    /// Defaults to the path length plus the Manhattan distance left.
    fn heuristic(&self, path: &[Position], target: Position) -> usize {
        path.len() + path.last().map_or(0, |last| last.manhattan(target))
    }
}

/// Extends through empty cells, or onto a tail of the line being drawn.
#[derive(Copy, Clone, Debug)]
pub struct NonColliding {
    /// Color of the line being drawn.
    pub color: Color,
}

impl<Sh: Step> SearchPolicy<Sh> for NonColliding {
    fn next_moves(&self, board: &Board<Sh>, path: &[Position]) -> Vec<Position> {
        let Some(last) = path.last() else {
            return Vec::new();
        };

        board.neighbor_cells(*last)
            .filter(|cell| !path.contains(&cell.position))
            .filter(|cell| cell.is_empty() || (cell.is_tail(board) && cell.color == self.color))
            .map(|cell| cell.position)
            .collect_vec()
    }
}

/// Extends through other lines too, so long as their cells can be pushed aside.
#[derive(Clone, Debug)]
pub struct Pushing {
    /// Color of the line being drawn.
    pub color: Color,
    /// Colors which must not be displaced.
    pub avoid: Vec<Affiliation>,
}

impl<Sh: Step> SearchPolicy<Sh> for Pushing {
    fn next_moves(&self, board: &Board<Sh>, path: &[Position]) -> Vec<Position> {
        let Some(last) = path.last() else {
            return Vec::new();
        };

        board.neighbor_cells(*last)
            .filter(|cell| !path.contains(&cell.position))
            // only cross the line being drawn where it ends
            .filter(|cell| cell.color != self.color || cell.is_tail(board))
            // endpoints of other lines never move
            .filter(|cell| cell.color == self.color || !cell.is_endpoint)
            .filter(|cell| !cell.color.affiliation().is_some_and(|affiliation| self.avoid.contains(&affiliation)))
            .map(|cell| cell.position)
            .collect_vec()
    }
}

/// Greedy best-first search from `from` to `to`.
///
/// The open list holds whole partial paths and always expands the best ranked one, latest first among ties.
/// Different paths may reach the same cell, so the result is not guaranteed shortest.
/// Returns [`None`] when the open list runs dry or the expansion budget is spent.
pub fn find_path<Sh, P>(board: &Board<Sh>, from: Position, to: Position, policy: &P, limits: &SearchLimits) -> Option<Path>
where
    Sh: Step,
    P: SearchPolicy<Sh>,
{
    let mut open = vec![vec![from]];
    let mut expansions = 0;

    loop {
        // stable, so the most recently pushed of equally ranked paths ends up last
        open.sort_by_key(|path| Reverse(policy.heuristic(path, to)));
        let path = open.pop()?;
        if path.last() == Some(&to) {
            trace!("found path of length {} from {} to {}", path.len(), from, to);
            return Some(Path(path));
        }

        expansions += 1;
        if expansions > limits.max_expansions {
            debug!("path search from {} to {} gave up after {} expansions", from, to, limits.max_expansions);
            return None;
        }

        for next in policy.next_moves(board, &path) {
            let mut extended = path.clone();
            extended.push(next);
            open.push(extended);
        }
    }
}

impl<Sh> Board<Sh>
where
    Sh: Step,
{
    /// [`Self::connect_path_to_position_with`] using [`SearchLimits::default`].
    pub fn connect_path_to_position(&mut self, from: Position, to: Position, color: Affiliation) -> bool {
        self.connect_path_to_position_with(from, to, color, &SearchLimits::default())
    }

    /// Draw `color` from `from` to `to` through empty cells only.
    ///
    /// `from` must already carry `color`. Returns whether a route was found and drawn.
    pub fn connect_path_to_position_with(&mut self, from: Position, to: Position, color: Affiliation, limits: &SearchLimits) -> bool {
        let color = Color::from(color);
        if self.cell(from).map(|cell| cell.color) != Some(color) {
            return false;
        }

        let Some(path) = find_path(self, from, to, &NonColliding { color }, limits) else {
            debug!("no open route from {} to {}", from, to);
            return false;
        };

        for position in path.iter() {
            self.paint(*position, color);
        }
        true
    }

    /// [`Self::connect_path_with_pushing_with`] using [`SearchLimits::default`].
    pub fn connect_path_with_pushing(&mut self, from: Position, to: Position, color: Affiliation, avoid: &[Affiliation]) -> bool {
        self.connect_path_with_pushing_with(from, to, color, avoid, &SearchLimits::default())
    }

    /// Draw `color` from `from` to `to`, shoving other lines out of the way.
    ///
    /// `from` must already carry `color`. Lines in `avoid` and the endpoints of other lines are never crossed.
    /// Every displaced line is rerouted around the new one, recursively; each level adds the color it pushed to `avoid`,
    /// so no line is displaced twice in one cascade.
    pub fn connect_path_with_pushing_with(
        &mut self,
        from: Position,
        to: Position,
        color: Affiliation,
        avoid: &[Affiliation],
        limits: &SearchLimits,
    ) -> bool {
        let line = Color::from(color);
        if self.cell(from).map(|cell| cell.color) != Some(line) {
            return false;
        }

        let policy = Pushing { color: line, avoid: avoid.to_vec() };
        let Some(path) = find_path(self, from, to, &policy, limits) else {
            debug!("no route for {} from {} to {}, even pushing", color, from, to);
            return false;
        };

        let mut avoid = avoid.to_vec();
        avoid.push(color);
        for position in path.iter() {
            if self[*position].color != line && !self.push_color_with(*position, color, &avoid, limits) {
                debug!("could not push {} into {}", color, position);
            }
        }
        true
    }

    /// [`Self::push_color_with`] using [`SearchLimits::default`].
    pub fn push_color(&mut self, position: Position, color: Affiliation, avoid: &[Affiliation]) -> bool {
        self.push_color_with(position, color, avoid, &SearchLimits::default())
    }

    /// Recolor `position` to `color`, then reconnect the line that used to pass through it.
    ///
    /// Endpoints cannot be recolored; for them this only reports whether they already have `color`.
    pub fn push_color_with(&mut self, position: Position, color: Affiliation, avoid: &[Affiliation], limits: &SearchLimits) -> bool {
        let Some(cell) = self.cell(position).copied() else {
            return false;
        };
        if cell.is_endpoint {
            return cell.color == Color::from(color);
        }

        let connections = self.connections(position);
        self.paint(position, color.into());
        trace!("pushed {} into {}\n{}", color, position, self);

        if let [first, second] = connections.as_slice() {
            if let Some(displaced) = self[*first].color.affiliation() {
                debug!("rerouting {} around {}", displaced, position);
                let mut avoid = avoid.to_vec();
                avoid.push(color);
                if !self.connect_path_with_pushing_with(*first, *second, displaced, &avoid, limits) {
                    debug!("{} stays broken between {} and {}", displaced, first, second);
                }
            }
        }
        true
    }
}

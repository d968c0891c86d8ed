//! Validity checks and the backtracking solver.

use std::collections::HashMap;

use itertools::Itertools;
use log::{debug, trace};

use crate::area::AreaError;
use crate::board::Board;
use crate::color::{Affiliation, Color};
use crate::knot::simplify_edge_color_orderings;
use crate::position::Position;
use crate::shape::{BoardShape, Step};

/// Tunables for [`Board::solve_with`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SolverConfig {
    /// How many speculative boards may be explored before giving up.
    /// This bounds effort only; a board may be solvable beyond it.
    pub max_attempts: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { max_attempts: 4096 }
    }
}

impl SolverConfig {
    /// Replace the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

/// Result of [`Board::solve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOutcome<Sh>
where
    Sh: Step,
{
    /// The first complete board found, or else the most filled-in valid board reached.
    pub board: Board<Sh>,
    /// Whether `board` is complete.
    pub is_complete: bool,
    /// Speculative boards explored.
    pub attempts: usize,
}

impl<Sh> Board<Sh>
where
    Sh: Step,
{
    /// Check the board for states no sequence of further moves can complete.
    ///
    /// `false` is always correct: the board cannot be finished. `true` only means none of the checks found a problem.
    pub fn is_valid_partial(&self) -> Result<bool, AreaError> {
        let tails = self.iterate_tails().map(|cell| (cell.position, cell.color)).collect_vec();

        // an odd count means some line has closed on itself
        let tail_counts: HashMap<Color, usize> = tails.iter().map(|(_, color)| *color).counts();
        if let Some(color) = tail_counts.iter().find(|(_, count)| *count % 2 == 1).map(|(color, _)| color) {
            trace!("odd number of {:?} tails", color);
            return Ok(false);
        }

        for (position, color) in &tails {
            let partner = tails.iter().find(|(other, other_color)| other != position && other_color == color);
            match partner {
                Some((other, _)) if self.can_connect(*position, *other) => {}
                _ => {
                    trace!("tail at {} is cut off from its partner", position);
                    return Ok(false);
                }
            }
        }

        let areas = self.open_areas()?;
        let orderings = self.open_area_colors(&areas);
        if let Some(knot) = simplify_edge_color_orderings(&orderings).iter().find(|colors| !colors.is_resolved()) {
            trace!("unresolved area colors {:?}", knot);
            return Ok(false);
        }

        // an area no tail touches can never be filled
        if areas.iter().any(|area| !area.positions.iter().any(|position| self[*position].is_tail(self))) {
            trace!("an area has no tail to fill it");
            return Ok(false);
        }

        Ok(true)
    }

    /// Moves from the tail at `position` into an empty neighbor that keep the board valid.
    pub fn valid_moves_from(&self, position: Position) -> Result<Vec<(Sh, Position)>, AreaError> {
        let Some(color) = self.cell(position).map(|cell| cell.color) else {
            return Ok(Vec::new());
        };

        let mut moves = Vec::new();
        for (direction, target) in Sh::neighbors_of(position) {
            if !self.is_valid_position(target) || !self[target].is_empty() {
                continue;
            }

            let mut hypothesis = self.clone();
            hypothesis.paint(target, color);
            if hypothesis.is_valid_partial()? {
                moves.push((direction, target));
            }
        }

        Ok(moves)
    }

    /// Commit moves that are forced until none remain, returning each commit in order.
    ///
    /// A move is forced when a tail has exactly one empty neighbor, or exactly one move from it keeps the board valid.
    /// The tail scan restarts after every commit.
    pub fn solve_choiceless_moves(&mut self) -> Result<Vec<(Position, Affiliation)>, AreaError> {
        let mut commits = Vec::new();

        'scan: loop {
            let tails = self.iterate_tails()
                .filter_map(|cell| cell.color.affiliation().map(|affiliation| (cell.position, affiliation)))
                .collect_vec();

            for (tail, affiliation) in tails {
                let empty = self.empty_neighbor_cells(tail).map(|cell| cell.position).collect_vec();
                let forced = match empty.as_slice() {
                    [only] => Some(*only),
                    _ => match self.valid_moves_from(tail)?.as_slice() {
                        [(_, only)] => Some(*only),
                        _ => None,
                    },
                };

                if let Some(target) = forced {
                    trace!("forced {} from {} to {}", affiliation, tail, target);
                    self.paint(target, affiliation.into());
                    commits.push((target, affiliation));
                    continue 'scan;
                }
            }

            break;
        }

        if !commits.is_empty() {
            debug!("committed {} choiceless moves", commits.len());
        }
        Ok(commits)
    }

    // every tail extended into every empty neighbor, in scan order
    fn branches(&self) -> Vec<Board<Sh>> {
        let mut branches = Vec::new();
        for tail in self.iterate_tails() {
            for empty in self.empty_neighbor_cells(tail.position) {
                let mut branch = self.clone();
                branch.paint(empty.position, tail.color);
                branches.push(branch);
            }
        }

        branches
    }

    /// [`Self::solve_with`] using [`SolverConfig::default`].
    pub fn solve(&self) -> Result<SolveOutcome<Sh>, AreaError> {
        self.solve_with(&SolverConfig::default())
    }

    /// Solve a copy of this board.
    ///
    /// Forced moves are propagated first. Then boards are explored depth first from an explicit stack, each one extending
    /// a single tail by one cell, until a complete board turns up or `config.max_attempts` boards have been explored.
    /// Branches which fail [`Self::is_valid_partial`] are dropped.
    ///
    /// Running out of attempts is not an error: the outcome then holds the valid board with the fewest empty cells seen.
    pub fn solve_with(&self, config: &SolverConfig) -> Result<SolveOutcome<Sh>, AreaError> {
        let mut root = self.clone();
        root.solve_choiceless_moves()?;
        if root.is_complete() {
            return Ok(SolveOutcome { board: root, is_complete: true, attempts: 0 });
        }

        if !root.is_valid_partial()? {
            debug!("board is not completable as given");
            return Ok(SolveOutcome { board: root, is_complete: false, attempts: 0 });
        }

        let mut stack = root.branches();
        stack.reverse();
        let mut best = root;
        let mut attempts = 0;

        while let Some(mut board) = stack.pop() {
            if attempts >= config.max_attempts {
                debug!("gave up after {} attempts", attempts);
                break;
            }
            attempts += 1;

            board.solve_choiceless_moves()?;
            if board.is_complete() {
                debug!("solved after {} attempts", attempts);
                return Ok(SolveOutcome { board, is_complete: true, attempts });
            }

            if !board.is_valid_partial()? {
                trace!("dropping branch\n{}", board);
                continue;
            }

            if board.empty_count() < best.empty_count() {
                debug!("best board so far has {} empty cells", board.empty_count());
                best = board.clone();
            }

            let mut children = board.branches();
            children.reverse();
            stack.extend(children);
        }

        Ok(SolveOutcome { board: best, is_complete: false, attempts })
    }
}

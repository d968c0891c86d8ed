//! Connection state between neighboring cells.
//!
//! An [`EdgeMap`] assigns each edge an id and remembers whether it is still possible and whether it is drawn.

use std::collections::HashMap;
use std::marker::PhantomData;

use itertools::Itertools;
use log::trace;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::board::Board;
use crate::position::Position;
use crate::shape::{BoardShape, Step};

/// Whether a line may run, or already runs, between two adjacent cells.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct EdgeState {
    possible: bool,
    connected: bool,
}

impl Default for EdgeState {
    fn default() -> Self {
        Self { possible: true, connected: false }
    }
}

impl EdgeState {
    /// Whether a line could still use this edge.
    pub fn is_possible(&self) -> bool {
        self.possible
    }

    /// Whether a line uses this edge.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

/// A partial change to an [`EdgeState`]. Unset fields keep their value.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EdgeUpdate {
    /// New `possible` flag.
    pub possible: Option<bool>,
    /// New `connected` flag.
    pub connected: Option<bool>,
}

/// Rejected edge updates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeError {
    /// The two positions are not neighbors on this board.
    #[error("{0} and {1} do not share an edge")]
    NotAdjacent(Position, Position),
    /// A connected edge must stay possible.
    #[error("edge between {0} and {1} would be connected but impossible")]
    ConnectedImpossible(Position, Position),
}

/// Connection state for every pair of adjacent cells on a board of shape `Sh`.
/// Edges never set explicitly are possible and unconnected.
#[derive(Clone, Debug)]
pub struct EdgeMap<Sh>
where
    Sh: Step,
{
    dims: (usize, usize),
    edges: HashMap<UnorderedPair<Position>, EdgeState>,
    shape: PhantomData<Sh>,
}

impl<Sh> EdgeMap<Sh>
where
    Sh: Step,
{
    /// Every edge of a `width` by `height` board in its default state.
    pub fn with_dims(dims: (usize, usize)) -> Self {
        Self { dims, edges: HashMap::new(), shape: PhantomData }
    }

    /// Edge states implied by the lines drawn on `board`.
    ///
    /// Edges touching a wall are impossible; edges between two cells of the same line color are connected.
    pub fn from_board(board: &Board<Sh>) -> Self {
        let mut map = Self::with_dims(board.dimensions());
        for cell in board.iterate_cells() {
            for (_, neighbor) in Sh::neighbors_of(cell.position) {
                let Some(other) = board.cell(neighbor) else {
                    continue;
                };

                let state = EdgeState {
                    possible: !cell.is_wall() && !other.is_wall(),
                    connected: cell.has_line() && cell.color == other.color,
                };
                map.edges.insert(UnorderedPair::from((cell.position, neighbor)), state);
            }
        }

        map
    }

    fn contains(&self, position: Position) -> bool {
        position.0 < self.dims.0 && position.1 < self.dims.1
    }

    /// The edges around `position`, as pairs, in clockwise order.
    pub fn edge_ids_for_cell(&self, position: Position) -> Vec<UnorderedPair<Position>> {
        if !self.contains(position) {
            return Vec::new();
        }

        Sh::neighbors_of(position)
            .into_iter()
            .filter(|(_, neighbor)| self.contains(*neighbor))
            .map(|(_, neighbor)| UnorderedPair::from((position, neighbor)))
            .collect_vec()
    }

    /// State of the edge between `a` and `b`, or [`None`] if they are not adjacent.
    pub fn get_edge(&self, a: Position, b: Position) -> Option<EdgeState> {
        if !self.contains(a) || !self.contains(b) || Sh::direction_to(a, b).is_none() {
            return None;
        }

        Some(self.edges.get(&UnorderedPair::from((a, b))).copied().unwrap_or_default())
    }

    /// Neighbors of `position` paired with the state of the edge to each.
    pub fn edges_of(&self, position: Position) -> Vec<(Position, EdgeState)> {
        self.edge_ids_for_cell(position)
            .into_iter()
            .map(|UnorderedPair(a, b)| {
                let neighbor = if a == position { b } else { a };
                (neighbor, self.edges.get(&UnorderedPair(a, b)).copied().unwrap_or_default())
            })
            .collect_vec()
    }

    /// Apply `update` to the edge between `a` and `b` and return its new state.
    pub fn set_edge(&mut self, a: Position, b: Position, update: EdgeUpdate) -> Result<EdgeState, EdgeError> {
        let mut state = self.get_edge(a, b).ok_or(EdgeError::NotAdjacent(a, b))?;
        state.possible = update.possible.unwrap_or(state.possible);
        state.connected = update.connected.unwrap_or(state.connected);
        if state.connected && !state.possible {
            return Err(EdgeError::ConnectedImpossible(a, b));
        }

        self.edges.insert(UnorderedPair::from((a, b)), state);
        Ok(state)
    }

    /// Once two edges of `position` are connected, no other edge of it can be. Mark those impossible.
    pub fn mark_impossible_edges(&mut self, position: Position) {
        let edges = self.edges_of(position);
        let connected = edges.iter().filter(|(_, state)| state.connected).count();
        if connected < 2 {
            return;
        }

        for (neighbor, state) in edges {
            if !state.connected {
                trace!("edge {} to {} is now impossible", position, neighbor);
                self.edges.insert(UnorderedPair::from((position, neighbor)), EdgeState { possible: false, connected: false });
            }
        }
    }
}

//! Exact solving by reduction to Boolean satisfiability.
//!
//! Each cell picks one color and each edge is drawn in at most one color. Endpoints get one drawn edge, every other cell
//! two. Loops cut off from their endpoints are forbidden round by round as the solver turns them up.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::convert::identity;

use itertools::Itertools;
use log::debug;
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::Bfs;
use thiserror::Error;
use unordered_pair::UnorderedPair;
use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

use crate::board::Board;
use crate::color::{Affiliation, Color};
use crate::logic::{equivalent_to_both, exactly_one, implies_exactly_two};
use crate::position::Position;
use crate::shape::Step;

/// Reasons [`Board::solve_exact`] may fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverFailure {
    /// The SAT solver detected a logical inconsistency, i.e. the board as drawn cannot be completed.
    #[error("the board cannot be completed")]
    Inconsistent,
    /// The board holds a character outside the board grammar.
    #[error("cell {0} holds an unknown character")]
    UnknownCell(Position),
    /// The SAT solver assigned no color to this cell.
    /// This should probably never happen.
    #[error("no color was found for cell {0}")]
    NoColorFound(Position),
}

/// Complete a board by expressing it as a Boolean satisfiability problem.
///
/// # Logical setup
/// Every open cell V has exactly one color from those on the board. Drawn cells keep the color they have.
///
/// Every pair E of adjacent open cells has color C if and only if both its cells have color C.
///
/// An endpoint of color C has exactly one incident edge of color C. Any other cell has exactly two incident edges of its color.
///
/// These rules still admit closed loops of one color detached from its endpoints. After each solve, every same-colored
/// component without an endpoint is forbidden with a clause stating its cells do not all have those colors, and the
/// problem is solved again.
struct ExactSolver<'a, Sh>
where
    Sh: Step,
{
    board: &'a Board<Sh>,
    colors: Vec<Affiliation>,
    open: Vec<Position>,
    edges: Vec<UnorderedPair<Position>>,
    edge_indices: HashMap<UnorderedPair<Position>, usize>,
}

impl<'a, Sh> ExactSolver<'a, Sh>
where
    Sh: Step,
{
    fn new(board: &'a Board<Sh>) -> Self {
        let open = board.iterate_cells()
            .filter(|cell| !cell.is_wall())
            .map(|cell| cell.position)
            .collect_vec();

        // each pair once, in a stable order
        let edges = open.iter()
            .flat_map(|position| board.neighbor_positions(*position).map(move |neighbor| {
                if *position < neighbor { (*position, neighbor) } else { (neighbor, *position) }
            }))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(UnorderedPair::from)
            .collect_vec();
        let edge_indices = edges.iter().enumerate().map(|(index, edge)| (*edge, index)).collect();

        Self {
            board,
            colors: board.colors().into_iter().collect_vec(),
            open,
            edges,
            edge_indices,
        }
    }

    #[inline]
    fn cell_var(&self, position: Position, color: usize) -> Var {
        Var::from_index((position.1 * self.board.width() + position.0) * self.colors.len() + color)
    }

    #[inline]
    fn edge_var(&self, edge: usize, color: usize) -> Var {
        Var::from_index((self.board.width() * self.board.height() + edge) * self.colors.len() + color)
    }

    fn incident(&self, position: Position) -> Vec<usize> {
        self.board.neighbor_positions(position)
            .filter_map(|neighbor| self.edge_indices.get(&UnorderedPair::from((position, neighbor))).copied())
            .collect_vec()
    }

    fn formula(&self) -> Result<CnfFormula, SolverFailure> {
        let mut formula = CnfFormula::new();
        let mut add = |clauses: Vec<Vec<Lit>>| clauses.iter().for_each(|clause| formula.add_clause(clause));

        for position in &self.open {
            let cell = &self.board[*position];

            // V has exactly one color
            add(exactly_one(&(0..self.colors.len()).map(|color| self.cell_var(*position, color).positive()).collect_vec()));

            let fixed = match cell.color {
                Color::Line(affiliation) => self.colors.iter().position(|color| *color == affiliation),
                Color::Unknown(_) => return Err(SolverFailure::UnknownCell(*position)),
                _ => None,
            };
            if let Some(color) = fixed {
                add(vec![vec![self.cell_var(*position, color).positive()]]);
            }

            let incident = self.incident(*position);
            for color in 0..self.colors.len() {
                let edge_lits = incident.iter().map(|edge| self.edge_var(*edge, color).positive()).collect_vec();
                if cell.is_endpoint {
                    if fixed == Some(color) {
                        add(exactly_one(&edge_lits));
                    }
                } else {
                    add(implies_exactly_two(self.cell_var(*position, color).positive(), &edge_lits));
                }
            }
        }

        for (index, UnorderedPair(a, b)) in self.edges.iter().enumerate() {
            for color in 0..self.colors.len() {
                // E has color C <=> both of its cells have color C
                add(equivalent_to_both(
                    self.edge_var(index, color).positive(),
                    self.cell_var(*a, color).positive(),
                    self.cell_var(*b, color).positive(),
                ));
            }
        }

        Ok(formula)
    }

    fn solve(&self) -> Result<Board<Sh>, SolverFailure> {
        if self.colors.is_empty() {
            // nothing can fill an open cell
            return if self.open.is_empty() { Ok(self.board.clone()) } else { Err(SolverFailure::Inconsistent) };
        }

        let mut solver = Solver::new();
        solver.add_formula(&self.formula()?);

        let mut round = 0;
        loop {
            round += 1;
            if !solver.solve().is_ok_and(identity) {
                return Err(SolverFailure::Inconsistent);
            }
            let truths: HashSet<Var> = solver.model()
                .unwrap_or_default()
                .into_iter()
                .filter(|lit| lit.is_positive())
                .map(|lit| lit.var())
                .collect();

            let mut solved = self.board.clone();
            let mut assigned = HashMap::with_capacity(self.open.len());
            for position in &self.open {
                let color = (0..self.colors.len())
                    .find(|color| truths.contains(&self.cell_var(*position, *color)))
                    .ok_or(SolverFailure::NoColorFound(*position))?;
                assigned.insert(*position, color);
                solved.paint(*position, self.colors[color].into());
            }

            let detached = self.detached_components(&truths);
            if detached.is_empty() {
                debug!("exact solve finished after {} rounds", round);
                return Ok(solved);
            }

            debug!("round {}: forbidding {} detached loops", round, detached.len());
            for component in detached {
                let clause = component.iter()
                    .map(|position| self.cell_var(*position, assigned[position]).negative())
                    .collect_vec();
                solver.add_clause(&clause);
            }
        }
    }

    // same-colored components containing no endpoint
    fn detached_components(&self, truths: &HashSet<Var>) -> Vec<Vec<Position>> {
        let mut graph: UnGraphMap<Position, ()> = UnGraphMap::with_capacity(self.open.len(), self.edges.len());
        for position in &self.open {
            graph.add_node(*position);
        }
        for (index, UnorderedPair(a, b)) in self.edges.iter().enumerate() {
            if (0..self.colors.len()).any(|color| truths.contains(&self.edge_var(index, color))) {
                graph.add_edge(*a, *b, ());
            }
        }

        let mut seen = HashSet::new();
        let mut detached = Vec::new();
        for start in &self.open {
            if seen.contains(start) {
                continue;
            }

            let mut component = Vec::new();
            let mut bfs = Bfs::new(&graph, *start);
            while let Some(position) = bfs.next(&graph) {
                seen.insert(position);
                component.push(position);
            }

            if !component.iter().any(|position| self.board[*position].is_endpoint) {
                detached.push(component);
            }
        }

        detached
    }
}

impl<Sh> Board<Sh>
where
    Sh: Step,
{
    /// Complete this board exactly, or report that no completion exists.
    ///
    /// Cells already drawn keep their colors. Every open cell gets a color; detached loops are ruled out.
    pub fn solve_exact(&self) -> Result<Self, SolverFailure> {
        ExactSolver::new(self).solve()
    }

    /// Whether some completion of this board exists. Only malformed boards produce errors.
    pub fn is_completable(&self) -> Result<bool, SolverFailure> {
        match self.solve_exact() {
            Ok(_) => Ok(true),
            Err(SolverFailure::Inconsistent) => Ok(false),
            Err(failure) => Err(failure),
        }
    }
}

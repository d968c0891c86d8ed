#![warn(missing_docs)]

//! # `flowknot`
//!
//! Analysis and solving for [Numberlink](https://en.wikipedia.org/wiki/Numberlink) style boards as posited in the mobile game Flow Free.
//! Every cell is a wall, empty, or part of a colored line, and a board is solved when each color's two endpoints are joined by one
//! unbroken line and no cell is left empty.
//!
//! Read a [`Board`] from text (`#` wall, `-` empty, uppercase endpoint, lowercase line segment) or assemble one with a
//! [`BoardBuilder`](builder::BoardBuilder), then call [`solve()`](Board::solve).
//!
//! Boards are generic over their cell shape `Sh`, which must implement [`Step`](shape::Step); square and hexagonal cells are provided.
//! [`BoardShape`](shape::BoardShape) is `impl`'d automatically on top.
//!
//! # Internals
//! Solving is a depth-first search which extends one line by one cell at a time, but almost all branches are cut early.
//!
//! After every move, forced moves are committed: a line end with a single empty neighbor, or a single move that does not
//! break the board, can only go one way. A board is broken when:
//! 1. some color has an odd number of loose ends, meaning a line closed on itself;
//! 2. some loose end cannot reach its partner through open space;
//! 3. the colors around some open area are knotted;
//! 4. some open area touches no loose end, so nothing can fill it.
//!
//! The knot check is the heart of this crate. Open space is split into [`Area`](area::Area)s whose boundaries are traced
//! clockwise. Walking a boundary yields a cyclic sequence of line colors. Colors which can only join up without crossing,
//! such as two neighbors in the sequence, are cancelled repeatedly, across all areas at once (see [`knot`]).
//! Anything left over, like `R, O, R, O`, cannot be untangled without crossing lines.
//! Colors with a loose end bordering more than one area are left out of every sequence, since that end may leave into
//! any of them.
//!
//! An exact completion check also exists, expressing the board as a Boolean satisfiability problem
//! (see [`Board::solve_exact`]). It is the yardstick the fast checks above are tested against.
//!
//! Interactive editing uses a greedy best-first [`search`] which can shove other lines out of the way.

pub use board::{Board, BoardError};
pub use position::Position;

pub mod area;
pub mod board;
pub mod builder;
pub mod cell;
pub mod color;
pub mod edges;
pub mod exact;
pub mod knot;
pub(crate) mod logic;
pub mod position;
pub mod search;
pub mod shape;
pub mod solver;
mod tests;
#[cfg(feature = "wasm")]
pub mod wasm;

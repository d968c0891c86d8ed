//! Incremental board construction for editors.

use std::num::NonZero;

use ndarray::Array2;
use thiserror::Error;

use crate::board::Board;
use crate::cell::Cell;
use crate::color::{Affiliation, Color};
use crate::position::{Dimension, Position};
use crate::shape::Step;

/// Why a [`BoardBuilder`] refused a feature.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A terminus or wall lies outside the builder's dimensions.
    #[error("feature placed outside the board")]
    FeatureOutOfBounds,
    /// Termini were given a display character which is not a letter.
    #[error("termini must be displayed as a letter")]
    NotALetter,
}

/// Assembles a [`Board`] feature by feature.
///
/// Each call edits the builder in place; [`Clone`] it to keep a checkpoint.
/// Once invalid, a builder ignores further changes and [`build`](Self::build) reports why.
#[derive(Clone, Debug)]
pub struct BoardBuilder {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<Cell>,
    termini: Vec<(Affiliation, (Position, Position))>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        let five = NonZero::<usize>::MIN.saturating_add(4);
        Self::with_dims((five, five))
    }
}

impl BoardBuilder {
    /// An all-empty builder, `dims` given as `(width, height)`.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_fn((dims.1.get(), dims.0.get()), |index| Cell::new(Position::from(index), Color::Empty, false)),
            termini: Default::default(),
            invalid_reasons: Default::default(),
        }
    }

    #[inline]
    fn in_bounds(&self, position: Position) -> bool {
        position.0 < self.dims.0.get() && position.1 < self.dims.1.get()
    }

    /// Place both endpoints of the line lettered `display`. Either case of the letter works, and the pair is unordered.
    ///
    /// Off-board positions record [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) and a `display`
    /// outside `A..=Z` records [`NotALetter`](BuilderInvalidReason::NotALetter). Ignored once the builder is invalid.
    pub fn add_termini(&mut self, display: char, positions: (Position, Position)) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let Some(affiliation) = Affiliation::new(display) else {
            self.invalid_reasons.push(BuilderInvalidReason::NotALetter);
            return self;
        };

        if !self.in_bounds(positions.0) || !self.in_bounds(positions.1) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        for position in [positions.0, positions.1] {
            self.cells[position.as_index()] = Cell::new(position, affiliation.into(), true);
        }
        self.termini.push((affiliation, positions));

        self
    }

    /// Undo the latest [`add_termini`](Self::add_termini). Endpoints overwritten since then are left alone.
    ///
    /// No-op on an invalid builder or one without termini.
    pub fn pop_termini(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if let Some((affiliation, positions)) = self.termini.pop() {
            for position in [positions.0, positions.1] {
                let cell = &mut self.cells[position.as_index()];
                if cell.color == Color::from(affiliation) {
                    *cell = Cell::new(position, Color::Empty, false);
                }
            }
        }

        self
    }

    /// Place a wall at `position`, replacing whatever was there.
    ///
    /// Off-board positions record [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds). Ignored once the builder is invalid.
    pub fn add_wall(&mut self, position: Position) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.in_bounds(position) {
            self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds);
            return self;
        }

        self.cells[position.as_index()] = Cell::new(position, Color::Wall, false);
        self
    }

    /// `None` while every feature so far was accepted, otherwise the reasons it stopped accepting them.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Snapshot the cells into a [`Board`] of shape `Sh`, or hand back the reasons this builder is invalid.
    pub fn build<Sh: Step>(&self) -> Result<Board<Sh>, &Vec<BuilderInvalidReason>> {
        match self.is_valid() {
            Some(reasons) => Err(reasons),
            None => Ok(Board::from_cells(self.cells.clone())),
        }
    }
}

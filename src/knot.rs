//! Knot detection on the colors around open areas.

use std::collections::BTreeSet;

use itertools::Itertools;
use log::trace;

use crate::color::Affiliation;

/// The colors surrounding and filling one [`Area`](crate::area::Area).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AreaColors {
    /// Perimeter colors as first computed, never simplified.
    pub original_perimeter_colors: Vec<Affiliation>,
    /// Perimeter colors still unresolved. Treated as cyclic.
    pub perimeter_colors: Vec<Affiliation>,
    /// Colors of tails in the body of the area.
    pub inner_colors: BTreeSet<Affiliation>,
    /// Colors known to be completable as one path within this area.
    pub line_colors: BTreeSet<Affiliation>,
}

impl AreaColors {
    /// Summarize an area from its perimeter color sequence and body colors.
    ///
    /// Body colors that never reach the perimeter are lines contained by the area and count as resolved from the start.
    pub fn new(perimeter_colors: Vec<Affiliation>, inner_colors: BTreeSet<Affiliation>) -> Self {
        let line_colors = inner_colors.iter()
            .filter(|color| !perimeter_colors.contains(color))
            .copied()
            .collect();

        Self {
            original_perimeter_colors: perimeter_colors.clone(),
            perimeter_colors,
            inner_colors,
            line_colors,
        }
    }

    /// Drop `shared` from the perimeter. Those of them also in `reaching` count as lines within this area.
    ///
    /// A tail bordering several areas may leave into any of them, so where it sits on a perimeter says nothing about
    /// a knot. Every area of a board must release the same colors.
    pub fn release_shared(&mut self, shared: &BTreeSet<Affiliation>, reaching: &BTreeSet<Affiliation>) {
        self.perimeter_colors.retain(|color| !shared.contains(color));
        self.line_colors.extend(reaching.intersection(shared).copied());
    }

    /// Apply the first applicable cancellation to the perimeter and return the color it resolved.
    ///
    /// A color seen once on the perimeter which also has a tail in the body can run inwards to it.
    /// Two cyclically adjacent occurrences of one color can join along the edge.
    fn simplify_once(&mut self) -> Option<Affiliation> {
        let len = self.perimeter_colors.len();
        for index in 0..len {
            let current = self.perimeter_colors[index];
            let next_index = (index + 1) % len;

            let occurrences = self.perimeter_colors.iter().filter(|color| **color == current).count();
            if occurrences == 1 && self.inner_colors.contains(&current) {
                self.perimeter_colors.remove(index);
                self.line_colors.insert(current);
                return Some(current);
            }

            if len > 1 && self.perimeter_colors[next_index] == current {
                // remove the later index first so the earlier one stays put
                self.perimeter_colors.remove(index.max(next_index));
                self.perimeter_colors.remove(index.min(next_index));
                self.line_colors.insert(current);
                return Some(current);
            }
        }

        None
    }

    /// Whether nothing on the perimeter is left unresolved and some line can reach into the area.
    pub fn is_resolved(&self) -> bool {
        self.perimeter_colors.is_empty() && !self.line_colors.is_empty()
    }
}

/// Cancel resolvable colors across all areas until nothing changes.
///
/// Each pass applies at most one cancellation per area, then removes every color resolved so far from every perimeter,
/// since a color that forms one clean line in one area cannot knot anywhere else.
///
/// Interleaved orderings such as `R, O, R, O` are left in place. An unresolved leftover means the board is stuck,
/// but a stuck board may still simplify cleanly.
pub fn simplify_edge_color_orderings(orderings: &[AreaColors]) -> Vec<AreaColors> {
    let mut simplified = orderings.to_vec();
    let mut resolved = BTreeSet::new();

    loop {
        let mut changed = false;

        for area in simplified.iter_mut() {
            if let Some(color) = area.simplify_once() {
                resolved.insert(color);
                changed = true;
            }
        }

        for area in simplified.iter_mut() {
            let before = area.perimeter_colors.len();
            area.perimeter_colors.retain(|color| !resolved.contains(color));
            changed |= area.perimeter_colors.len() < before;
        }

        if !changed {
            break;
        }
    }

    trace!(
        "simplified knots to [{}], resolved {}",
        simplified.iter().map(|area| area.perimeter_colors.iter().join("")).join("|"),
        resolved.iter().join("")
    );
    simplified
}

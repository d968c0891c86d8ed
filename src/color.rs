//! Cell contents and the line color alphabet.

use std::fmt::{Display, Formatter};

/// Board text for a wall.
pub const WALL: char = '#';
/// Board text for an empty cell.
pub const EMPTY: char = '-';
/// The endpoint alphabet. Path segments use the lowercase counterpart.
pub const ENDPOINT_COLORS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The color of one line, stored as its uppercase letter.
///
/// Case only distinguishes endpoints from segments when printing; both share an affiliation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Affiliation(char);

impl Affiliation {
    /// The affiliation for letter `c` in either case, if `c` is in the alphabet.
    pub fn new(c: char) -> Option<Self> {
        let upper = c.to_ascii_uppercase();
        ENDPOINT_COLORS.contains(upper).then_some(Self(upper))
    }

    /// Uppercase display letter.
    pub fn display(&self) -> char {
        self.0
    }
}

impl Display for Affiliation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of a single cell.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Color {
    /// Impassable.
    Wall,
    /// Open space.
    #[default]
    Empty,
    /// Part of a line, endpoint or segment.
    Line(Affiliation),
    /// A character outside the board grammar, kept so it prints back unchanged.
    Unknown(char),
}

impl Color {
    /// Read one board character. Returns the color and whether the cell is an endpoint.
    pub fn from_char(c: char) -> (Self, bool) {
        match c {
            WALL => (Self::Wall, false),
            EMPTY => (Self::Empty, false),
            c => match Affiliation::new(c) {
                Some(affiliation) => (Self::Line(affiliation), c.is_ascii_uppercase()),
                None => (Self::Unknown(c), false),
            },
        }
    }

    /// Print this color, upper-casing line colors only for endpoints.
    pub fn to_char(self, is_endpoint: bool) -> char {
        match self {
            Self::Wall => WALL,
            Self::Empty => EMPTY,
            Self::Line(affiliation) if is_endpoint => affiliation.display(),
            Self::Line(affiliation) => affiliation.display().to_ascii_lowercase(),
            Self::Unknown(c) => c,
        }
    }

    /// The line affiliation, if this is a line color.
    pub fn affiliation(self) -> Option<Affiliation> {
        match self {
            Self::Line(affiliation) => Some(affiliation),
            _ => None,
        }
    }

    /// Whether this color belongs to a line.
    pub fn is_line(self) -> bool {
        matches!(self, Self::Line(_))
    }
}

impl From<Affiliation> for Color {
    fn from(value: Affiliation) -> Self {
        Self::Line(value)
    }
}

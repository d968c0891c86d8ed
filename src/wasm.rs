//! JavaScript bindings for square boards, for use by an editor front end.
//!
//! Positions are passed as separate `x` and `y` arguments and colors as single board characters.

use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::board::Board;
use crate::color::{Affiliation, Color};
use crate::position::Position;
use crate::shape::SquareStep;
use crate::solver::SolverConfig;

/// A square board owned by JavaScript.
#[wasm_bindgen]
pub struct WasmBoard {
    board: Board<SquareStep>,
}

fn affiliation_of(color: char) -> Result<Affiliation, JsError> {
    Affiliation::new(color).ok_or_else(|| JsError::new(&format!("{color:?} is not a line color")))
}

#[wasm_bindgen]
impl WasmBoard {
    /// Read a board from its text form.
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> Result<WasmBoard, JsError> {
        Ok(Self { board: text.parse()? })
    }

    /// The board in its text form.
    #[wasm_bindgen(js_name = "toText")]
    pub fn to_text(&self) -> String {
        self.board.to_string()
    }

    /// Board width in cells.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.board.width()
    }

    /// Board height in cells.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.board.height()
    }

    /// The character shown at `(x, y)`, or `undefined` off the board.
    #[wasm_bindgen(js_name = "getColor")]
    pub fn get_color(&self, x: usize, y: usize) -> Option<char> {
        self.board.cell(Position(x, y)).map(|cell| cell.color.to_char(cell.is_endpoint))
    }

    /// Recolor `(x, y)` with a board character.
    #[wasm_bindgen(js_name = "setColor")]
    pub fn set_color(&mut self, x: usize, y: usize, color: char) -> Result<(), JsError> {
        let (color, _) = Color::from_char(color);
        Ok(self.board.set_color(Position(x, y), color)?)
    }

    /// See [`Board::is_valid_partial`].
    #[wasm_bindgen(js_name = "isValidPartial")]
    pub fn is_valid_partial(&self) -> Result<bool, JsError> {
        Ok(self.board.is_valid_partial()?)
    }

    /// See [`Board::is_complete`].
    #[wasm_bindgen(js_name = "isComplete")]
    pub fn is_complete(&self) -> bool {
        self.board.is_complete()
    }

    /// Commit all forced moves and return how many there were.
    #[wasm_bindgen(js_name = "solveChoicelessMoves")]
    pub fn solve_choiceless_moves(&mut self) -> Result<usize, JsError> {
        Ok(self.board.solve_choiceless_moves()?.len())
    }

    /// Solve, replacing this board with the result.
    /// Returns `{ isComplete, attempts }`.
    pub fn solve(&mut self, max_attempts: usize) -> Result<JsValue, JsValue> {
        let outcome = self.board
            .solve_with(&SolverConfig::default().with_max_attempts(max_attempts))
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        let obj = Object::new();
        Reflect::set(&obj, &"isComplete".into(), &outcome.is_complete.into())?;
        Reflect::set(&obj, &"attempts".into(), &outcome.attempts.into())?;
        self.board = outcome.board;
        Ok(obj.into())
    }

    /// Draw a line of `color` from `(x1, y1)` to `(x2, y2)` through empty cells.
    #[wasm_bindgen(js_name = "connectPathToPosition")]
    pub fn connect_path_to_position(&mut self, x1: usize, y1: usize, x2: usize, y2: usize, color: char) -> Result<bool, JsError> {
        Ok(self.board.connect_path_to_position(Position(x1, y1), Position(x2, y2), affiliation_of(color)?))
    }

    /// Draw a line of `color` from `(x1, y1)` to `(x2, y2)`, pushing other lines aside.
    #[wasm_bindgen(js_name = "connectPathWithPushing")]
    pub fn connect_path_with_pushing(&mut self, x1: usize, y1: usize, x2: usize, y2: usize, color: char) -> Result<bool, JsError> {
        Ok(self.board.connect_path_with_pushing(Position(x1, y1), Position(x2, y2), affiliation_of(color)?, &[]))
    }
}

//! Terminal presentation layer.
//!
//! A small game-style rendering pipeline: the pure [`GameView`] maps a
//! [`crate::core::GameSnapshot`] into a styled-cell [`Frame`], and
//! [`Screen`] diffs consecutive frames onto the terminal. Nothing in here
//! feeds back into the core.

pub mod fb;
pub mod game_view;
pub mod screen;

pub use fb::{Frame, Glyph, Rgb, Style};
pub use game_view::GameView;
pub use screen::Screen;

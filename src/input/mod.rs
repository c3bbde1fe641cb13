//! Input layer: terminal keys to game actions.
//!
//! The core only understands discrete [`GameAction`] events. Everything
//! about physical keys lives here: bindings, delayed auto shift, repeat
//! rate, and coping with terminals that never send key-release events.

mod handler;

pub use handler::{map_key, should_quit, InputHandler, RepeatOutput};

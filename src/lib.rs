//! Handheld-style falling-block puzzle.
//!
//! The crate splits into a deterministic [`core`] (rules, timing, scoring,
//! no I/O), an [`input`] layer turning terminal keys into discrete game
//! actions, and a [`term`] presentation layer that draws snapshots. The
//! core never learns what is rendering it.

pub mod core;
pub mod input;
pub mod term;
pub mod types;

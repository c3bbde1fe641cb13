//! Game core: deterministic rules with no I/O dependencies.

pub mod board;
pub mod game;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use board::Board;
pub use game::Game;
pub use pieces::{kick_candidates, shape, Piece};
pub use rng::BagRandomizer;
pub use snapshot::GameSnapshot;

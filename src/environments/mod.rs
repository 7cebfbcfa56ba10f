//! Small worlds for exercising agents
//!
//! Each environment owns its random number generator, so a seeded environment
//! always produces the same episode for the same actions.

mod coin_flip;
mod extended_tiger;
mod one_d_maze;

pub use coin_flip::{CoinFlip, CoinReward, Face};
pub use extended_tiger::{ExtendedTiger, TigerAction, TigerObservation, TigerReward};
pub use one_d_maze::{MazeAction, MazeObservation, MazeReward, OneDMaze};

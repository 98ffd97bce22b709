pub mod game;
pub mod snapshot;

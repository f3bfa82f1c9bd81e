//! Types shared by the game logic and the engine,
//! so that the game doesn't need to know anything about windows or GPUs.

pub mod game;

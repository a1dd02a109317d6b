//! BLOCKFALL - the board and piece state machine of a falling-block puzzle
//!
//! The crate has no rendering, sound, or input layer. Those sit outside and
//! talk to a [`GameState`]: they send [`Command`]s, move its clock with
//! [`GameState::advance`], and read back [`Snapshot`]s and [`GameEvent`]s.

pub mod board;
pub mod collision;
pub mod color;
pub mod config;
pub mod event;
pub mod game;
pub mod line_clear;
pub mod lock;
pub mod piece;
pub mod randomizer;
pub mod scheduler;
pub mod snapshot;
pub mod tetromino;

pub use board::{Board, Cell};
pub use color::Color;
pub use config::{ConfigError, GameConfig};
pub use event::GameEvent;
pub use game::{Command, GameState};
pub use lock::LockPhase;
pub use piece::Piece;
pub use snapshot::Snapshot;
pub use tetromino::TetrominoType;

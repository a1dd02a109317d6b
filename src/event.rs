//! Notifications for observers (renderers, sound, logs)
//!
//! The session pushes events as it mutates; observers drain them with
//! [`crate::game::GameState::drain_events`].

use crate::tetromino::TetrominoType;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// First resume of a session
    Started,
    Paused,
    Resumed,
    PieceSpawned {
        kind: TetrominoType,
        cells: [(i32, i32); 4],
    },
    /// The active piece touched down and the lock timer is running
    LockArmed,
    /// The lock timer expired with room below the piece
    LockCancelled,
    PieceLocked {
        cells: [(i32, i32); 4],
    },
    /// Full rows were found, scored, and highlighted
    RowsMarked {
        rows: Vec<usize>,
        points: u64,
    },
    /// Highlighted rows were removed and the stack collapsed
    RowsCleared {
        rows: Vec<usize>,
    },
    GameOver {
        score: u64,
    },
    Restarted,
}

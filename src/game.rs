//! Core game state and logic
//!
//! `GameState` owns the board, the active piece, and every timer. It is
//! driven from outside by two calls:
//! - [`GameState::apply`] for player commands, run to completion on receipt
//! - [`GameState::advance`] to move the session clock, which fires gravity
//!   ticks, lock delays, and clear animations in deadline order

use crate::board::Board;
use crate::collision;
use crate::config::{ConfigError, GameConfig};
use crate::event::GameEvent;
use crate::line_clear::LineClearEngine;
use crate::lock::{LockOutcome, LockPhase, LockScheduler};
use crate::piece::Piece;
use crate::randomizer::Randomizer;
use crate::scheduler::{Scheduler, TaskKind};
use crate::snapshot::{ActivePiece, Snapshot};
use crate::tetromino::TetrominoType;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Row inspected after every lock; anything settled here ends the game
pub const GAME_OVER_ROW: usize = 1;

/// Input commands the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveDown,
    Rotate,
    TogglePause,
    Restart,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Command::MoveLeft),
            "right" => Ok(Command::MoveRight),
            "down" => Ok(Command::MoveDown),
            "rotate" => Ok(Command::Rotate),
            "pause" => Ok(Command::TogglePause),
            "restart" => Ok(Command::Restart),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// The main game struct
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    /// Current falling piece
    active: Option<Piece>,
    score: u64,
    paused: bool,
    /// Set by the first resume of a session
    started: bool,
    game_over: bool,
    /// Full rows waiting out the clear animation
    marked_rows: Vec<usize>,
    lock: LockScheduler,
    line_clear: LineClearEngine,
    scheduler: Scheduler,
    randomizer: Randomizer,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new paused session with its first piece already spawned
    ///
    /// Fails when the config describes a game that cannot run, such as a board
    /// smaller than the piece box or a zero tick interval.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: GameConfig, seed: u64) -> Self {
        let board = Board::new(config.columns, config.rows, config.colors.empty);
        let lock = LockScheduler::new(config.lock_delay());
        let line_clear = LineClearEngine::new(config.per_square_score, config.colors.highlight);
        let randomizer = Randomizer::new(config.randomizer, config.colors.palette.clone(), seed);

        let mut game = Self {
            config,
            board,
            active: None,
            score: 0,
            paused: true,
            started: false,
            game_over: false,
            marked_rows: Vec::new(),
            lock,
            line_clear,
            scheduler: Scheduler::new(),
            randomizer,
            events: Vec::new(),
        };
        game.spawn_next();
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn lock_phase(&self) -> LockPhase {
        self.lock.phase()
    }

    pub fn marked_rows(&self) -> &[usize] {
        &self.marked_rows
    }

    /// Time on the session clock
    pub fn elapsed(&self) -> Duration {
        self.scheduler.now()
    }

    /// Upcoming piece types
    pub fn preview(&self, count: usize) -> &[TetrominoType] {
        self.randomizer.preview(count)
    }

    /// Whether player commands and gravity currently have any effect
    pub fn can_act(&self) -> bool {
        !self.paused && !self.game_over && self.marked_rows.is_empty()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Process a command, returns true if it changed anything
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => {
                self.restart();
                true
            }
            _ if !self.can_act() => false,
            Command::MoveLeft => self.shift_active(collision::can_move_left, -1, 0),
            Command::MoveRight => self.shift_active(collision::can_move_right, 1, 0),
            Command::MoveDown => self.shift_active(collision::can_move_down, 0, 1),
            Command::Rotate => self.rotate_active(),
        }
    }

    /// Move the session clock forward, firing every task that comes due
    pub fn advance(&mut self, dt: Duration) {
        let target = self.scheduler.now() + dt;
        while let Some((_, kind)) = self.scheduler.pop_due(target) {
            match kind {
                TaskKind::Gravity => self.on_gravity(),
                TaskKind::LockDelay => self.on_lock_timer(),
                TaskKind::ClearAnimation => self.on_clear_timer(),
            }
        }
        self.scheduler.advance_to(target);
    }

    /// Read-only copy of everything a renderer needs
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            columns: self.board.columns(),
            rows: self.board.rows(),
            cells: self.board.cells().to_vec(),
            score: self.score,
            active: self.active.map(|piece| ActivePiece {
                kind: piece.kind,
                rotation: piece.rotation,
                cells: piece.cells(),
                color: piece.color,
            }),
            marked_rows: self.marked_rows.clone(),
            lock_phase: self.lock.phase(),
            paused: self.paused,
            can_act: self.can_act(),
            game_over: self.game_over,
            elapsed_ms: self.scheduler.now().as_millis() as u64,
        }
    }

    /// Wipe the session back to a fresh, paused state
    pub fn restart(&mut self) {
        self.scheduler.reset();
        self.lock.reset(&mut self.scheduler);
        self.board.reset();
        self.active = None;
        self.score = 0;
        self.paused = true;
        self.started = false;
        self.game_over = false;
        self.marked_rows.clear();
        self.events.push(GameEvent::Restarted);
        info!("session restarted");
        self.spawn_next();
    }

    fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.paused {
            self.resume();
        } else {
            self.paused = true;
            self.scheduler.cancel_kind(TaskKind::Gravity);
            self.events.push(GameEvent::Paused);
            debug!("paused");
        }
        true
    }

    fn resume(&mut self) {
        self.paused = false;
        if self.started {
            self.events.push(GameEvent::Resumed);
            debug!("resumed");
        } else {
            self.started = true;
            self.events.push(GameEvent::Started);
            info!(
                columns = self.board.columns(),
                rows = self.board.rows(),
                "session started"
            );
        }

        // A clear animation that ran out while paused finishes now
        if !self.marked_rows.is_empty() && !self.scheduler.is_pending(TaskKind::ClearAnimation) {
            self.finish_clear();
        }

        self.scheduler.cancel_kind(TaskKind::Gravity);
        self.scheduler
            .schedule(TaskKind::Gravity, self.config.tick_interval());
    }

    fn shift_active(&mut self, allowed: fn(&Board, &Piece) -> bool, dx: i32, dy: i32) -> bool {
        let Some(piece) = &mut self.active else {
            return false;
        };
        if !allowed(&self.board, piece) {
            return false;
        }
        *piece = piece.shifted(dx, dy);
        true
    }

    fn rotate_active(&mut self) -> bool {
        let Some(piece) = &mut self.active else {
            return false;
        };
        piece.try_rotate(&self.board)
    }

    fn on_gravity(&mut self) {
        if self.paused || self.game_over {
            return;
        }
        self.scheduler
            .schedule(TaskKind::Gravity, self.config.tick_interval());
        self.tick();
    }

    /// One gravity step
    fn tick(&mut self) {
        if !self.can_act() {
            return;
        }
        let Some(piece) = &mut self.active else {
            return;
        };
        if piece.try_shift(0, 1, &self.board) {
            return;
        }
        if self.lock.on_grounded(&mut self.scheduler) {
            self.events.push(GameEvent::LockArmed);
        }
    }

    fn on_lock_timer(&mut self) {
        let Some(piece) = self.active else {
            self.lock.abandon();
            return;
        };
        if !self.can_act() {
            // The next tick after resuming re-arms the timer
            self.lock.abandon();
            return;
        }
        let can_fall = collision::can_move_down(&self.board, &piece);
        match self.lock.on_timer_fired(can_fall) {
            LockOutcome::Cancelled => self.events.push(GameEvent::LockCancelled),
            LockOutcome::Commit => self.commit_active(),
        }
    }

    /// Copy the active piece into the board, then check for game over and full rows
    fn commit_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        let cells = piece.cells();
        self.board.lock_cells(&cells, piece.color);
        self.events.push(GameEvent::PieceLocked { cells });
        debug!(kind = ?piece.kind, x = piece.x, y = piece.y, "piece locked");

        if self.board.row_has_block(GAME_OVER_ROW) {
            self.end_game();
            return;
        }

        let rows = LineClearEngine::detect(&self.board);
        if rows.is_empty() {
            self.spawn_next();
            return;
        }

        let points = self.line_clear.score(self.board.columns(), rows.len());
        self.score += points;
        self.line_clear.mark(&mut self.board, &rows);
        info!(rows = ?rows, points, score = self.score, "rows full");
        self.events.push(GameEvent::RowsMarked {
            rows: rows.clone(),
            points,
        });
        self.marked_rows = rows;
        self.scheduler
            .schedule(TaskKind::ClearAnimation, self.config.clear_animation());
    }

    fn on_clear_timer(&mut self) {
        if self.paused || self.game_over {
            // Finished by the next resume
            return;
        }
        self.finish_clear();
    }

    fn finish_clear(&mut self) {
        let rows = std::mem::take(&mut self.marked_rows);
        LineClearEngine::collapse(&mut self.board, &rows);
        debug!(rows = ?rows, "rows removed");
        self.events.push(GameEvent::RowsCleared { rows });
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        self.lock.reset(&mut self.scheduler);
        let kind = self.randomizer.next_kind();
        let color = self.randomizer.next_color();
        let piece = Piece::spawn(kind, color, self.board.columns());

        if !collision::fits(&self.board, &piece.cells()) {
            debug!(kind = ?kind, "spawn blocked");
            self.end_game();
            return;
        }

        self.active = Some(piece);
        self.events.push(GameEvent::PieceSpawned {
            kind,
            cells: piece.cells(),
        });
    }

    fn end_game(&mut self) {
        self.game_over = true;
        self.active = None;
        self.lock.reset(&mut self.scheduler);
        self.scheduler.cancel_kind(TaskKind::Gravity);
        self.events.push(GameEvent::GameOver { score: self.score });
        info!(score = self.score, "game over");
    }
}

impl Default for GameState {
    fn default() -> Self {
        // The default config always validates
        Self::build(GameConfig::default(), 0)
    }
}

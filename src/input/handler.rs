//! Key bindings and DAS/ARR auto-repeat.
//!
//! Horizontal movement repeats after a DAS delay at a fixed ARR rate. Soft
//! drop is a held state in the engine, so this layer only has to report the
//! press and the release. Terminals without key-release reporting get a
//! timeout-based auto release so a tap never sticks.

use arrayvec::ArrayVec;
use crossterm::event::{KeyCode, KeyEvent};

use crate::types::{GameAction, ARR_MS, DAS_MS};

/// Keys that should leave the program entirely.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
}

/// One-shot bindings with no repeat behavior.
pub fn map_key(code: KeyCode) -> Option<GameAction> {
    match code {
        KeyCode::Char(' ') => Some(GameAction::HardDrop),
        KeyCode::Up | KeyCode::Char('x') => Some(GameAction::RotateCw),
        KeyCode::Char('z') => Some(GameAction::RotateCcw),
        KeyCode::Char('c') => Some(GameAction::Hold),
        KeyCode::Enter | KeyCode::Char('p') => Some(GameAction::StartPause),
        KeyCode::Char('r') => Some(GameAction::Restart),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Horizontal {
    Left,
    Right,
    None,
}

impl Horizontal {
    fn action(self) -> Option<GameAction> {
        match self {
            Horizontal::Left => Some(GameAction::MoveLeft),
            Horizontal::Right => Some(GameAction::MoveRight),
            Horizontal::None => None,
        }
    }
}

/// Repeats and release notifications produced by one tick.
#[derive(Debug, Default)]
pub struct RepeatOutput {
    /// Horizontal moves generated by ARR this tick.
    pub moves: ArrayVec<GameAction, 16>,
    /// True when the held soft drop ended (release key or timeout).
    pub soft_drop_released: bool,
}

// Without key-release events a single tap must not become a sustained hold.
const KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks held keys and turns them into repeated actions.
#[derive(Debug, Clone)]
pub struct InputHandler {
    horizontal: Horizontal,
    soft_drop_held: bool,
    das_timer_ms: u32,
    arr_accumulator_ms: u32,
    idle_ms: u32,
    das_ms: u32,
    arr_ms: u32,
    release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(DAS_MS, ARR_MS)
    }

    pub fn with_config(das_ms: u32, arr_ms: u32) -> Self {
        Self {
            horizontal: Horizontal::None,
            soft_drop_held: false,
            das_timer_ms: 0,
            arr_accumulator_ms: 0,
            idle_ms: 0,
            das_ms,
            arr_ms,
            release_timeout_ms: KEY_RELEASE_TIMEOUT_MS,
        }
    }

    /// Disable the auto-release timeout (for terminals with real release
    /// events, and for tests).
    pub fn without_release_timeout(mut self) -> Self {
        self.release_timeout_ms = u32::MAX;
        self
    }

    /// Feed a key press. Returns the action to apply immediately, if any.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        match code {
            KeyCode::Left | KeyCode::Char('a') => {
                self.idle_ms = 0;
                self.begin_horizontal(Horizontal::Left)
            }
            KeyCode::Right | KeyCode::Char('d') => {
                self.idle_ms = 0;
                self.begin_horizontal(Horizontal::Right)
            }
            KeyCode::Down | KeyCode::Char('s') => {
                self.idle_ms = 0;
                if self.soft_drop_held {
                    None
                } else {
                    self.soft_drop_held = true;
                    Some(GameAction::SoftDrop)
                }
            }
            other => map_key(other),
        }
    }

    /// Feed a key release from terminals that report them. Returns the
    /// action whose held state ended, if any.
    pub fn handle_key_release(&mut self, code: KeyCode) -> Option<GameAction> {
        match code {
            KeyCode::Left | KeyCode::Char('a') => {
                if self.horizontal == Horizontal::Left {
                    self.stop_horizontal();
                }
                None
            }
            KeyCode::Right | KeyCode::Char('d') => {
                if self.horizontal == Horizontal::Right {
                    self.stop_horizontal();
                }
                None
            }
            KeyCode::Down | KeyCode::Char('s') => {
                if self.soft_drop_held {
                    self.soft_drop_held = false;
                    Some(GameAction::SoftDrop)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Advance the repeat timers by `elapsed_ms`.
    pub fn update(&mut self, elapsed_ms: u32) -> RepeatOutput {
        let mut out = RepeatOutput::default();

        // Auto release stale holds.
        self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
        if self.idle_ms > self.release_timeout_ms {
            if self.horizontal != Horizontal::None {
                self.stop_horizontal();
            }
            if self.soft_drop_held {
                self.soft_drop_held = false;
                out.soft_drop_released = true;
            }
        }

        if let Some(action) = self.horizontal.action() {
            let prev = self.das_timer_ms;
            self.das_timer_ms += elapsed_ms;

            if self.das_timer_ms >= self.das_ms {
                let excess = if prev < self.das_ms {
                    self.das_timer_ms - self.das_ms
                } else {
                    elapsed_ms
                };
                self.arr_accumulator_ms += excess;
                while self.arr_accumulator_ms >= self.arr_ms {
                    let _ = out.moves.try_push(action);
                    self.arr_accumulator_ms -= self.arr_ms;
                }
            }
        }

        out
    }

    pub fn reset(&mut self) {
        self.horizontal = Horizontal::None;
        self.soft_drop_held = false;
        self.das_timer_ms = 0;
        self.arr_accumulator_ms = 0;
        self.idle_ms = 0;
    }

    fn begin_horizontal(&mut self, direction: Horizontal) -> Option<GameAction> {
        if self.horizontal == direction {
            return None;
        }
        self.horizontal = direction;
        self.das_timer_ms = 0;
        self.arr_accumulator_ms = 0;
        direction.action()
    }

    fn stop_horizontal(&mut self) {
        self.horizontal = Horizontal::None;
        self.das_timer_ms = 0;
        self.arr_accumulator_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

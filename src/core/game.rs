//! The game engine: one `Game` per session.
//!
//! Ties the board, piece catalog, randomizer and scoring together behind
//! two mutating entry points (discrete actions and the per-frame
//! [`Game::update`] tick) and an immutable snapshot for renderers. All
//! invalid moves are silent no-ops; the only terminal condition is failing
//! to place a freshly spawned or hold-swapped piece.

use crate::core::board::Board;
use crate::core::pieces::{kick_candidates, Piece};
use crate::core::rng::BagRandomizer;
use crate::core::scoring::{
    drop_score, gravity_ms, level_for_lines, line_clear_score, soft_drop_gravity_ms,
};
use crate::core::snapshot::GameSnapshot;
use crate::types::{
    GameAction, PieceKind, Status, LOCK_DELAY_MS, NEXT_QUEUE_LEN, START_LEVEL,
};

/// Complete session state. Owned exclusively by its controller; everything
/// external reads through [`Game::snapshot`].
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    can_hold: bool,
    next_queue: [PieceKind; NEXT_QUEUE_LEN],
    randomizer: BagRandomizer,
    status: Status,
    score: u32,
    level: u32,
    lines: u32,
    gravity_timer_ms: u32,
    lock_timer_ms: u32,
    soft_dropping: bool,
}

impl Game {
    /// A new session in attract mode. Nothing moves until
    /// [`GameAction::StartPause`] (or [`Game::start`]).
    pub fn new(seed: u32) -> Self {
        let mut randomizer = BagRandomizer::new(seed);
        let mut next_queue = [PieceKind::I; NEXT_QUEUE_LEN];
        for slot in &mut next_queue {
            *slot = randomizer.next();
        }

        Self {
            board: Board::new(),
            active: None,
            hold: None,
            can_hold: true,
            next_queue,
            randomizer,
            status: Status::Attract,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            gravity_timer_ms: 0,
            lock_timer_ms: 0,
            soft_dropping: false,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn playing(&self) -> bool {
        self.status == Status::Playing
    }

    pub fn paused(&self) -> bool {
        self.status == Status::Paused
    }

    pub fn game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn next_queue(&self) -> &[PieceKind; NEXT_QUEUE_LEN] {
        &self.next_queue
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access. Test scaffolding for building stack states.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Row the active piece would land on if dropped straight down.
    pub fn ghost_row(&self) -> Option<i8> {
        self.active.as_ref().map(|p| self.board.ghost_row(p))
    }

    /// Begin a fresh game from attract or game-over.
    pub fn start(&mut self) {
        if matches!(self.status, Status::Attract | Status::GameOver) {
            self.begin_session();
        }
    }

    /// Apply a press-style action. Unknown combinations of status and
    /// action are ignored.
    pub fn handle_action(&mut self, action: GameAction) {
        match self.status {
            Status::Attract => {
                if action == GameAction::StartPause {
                    self.begin_session();
                }
            }
            Status::Paused => {
                if action == GameAction::StartPause {
                    // Timers pick up where they left off.
                    self.status = Status::Playing;
                }
            }
            Status::GameOver => {
                if matches!(action, GameAction::StartPause | GameAction::Restart) {
                    self.begin_session();
                }
            }
            Status::Playing => match action {
                GameAction::MoveLeft => {
                    self.try_shift(-1);
                }
                GameAction::MoveRight => {
                    self.try_shift(1);
                }
                GameAction::SoftDrop => {
                    self.soft_dropping = true;
                }
                GameAction::HardDrop => self.hard_drop(),
                GameAction::RotateCw => {
                    self.try_rotate(true);
                }
                GameAction::RotateCcw => {
                    self.try_rotate(false);
                }
                GameAction::Hold => self.hold(),
                GameAction::StartPause => self.status = Status::Paused,
                GameAction::Restart => {}
            },
        }
    }

    /// Apply a release-style action. Only soft drop has release semantics.
    pub fn handle_action_release(&mut self, action: GameAction) {
        if action == GameAction::SoftDrop {
            self.soft_dropping = false;
        }
    }

    /// Advance timers by `delta_ms` of wall-clock time. One call performs
    /// at most one gravity step and at most one lock, however large the
    /// delta.
    pub fn update(&mut self, delta_ms: u32) {
        if self.status != Status::Playing {
            return;
        }
        let Some(active) = self.active else {
            return;
        };

        let grounded = !self.board.position_valid(&active.translated(0, 1));
        if grounded {
            self.lock_timer_ms += delta_ms;
            if self.lock_timer_ms >= LOCK_DELAY_MS {
                self.lock_active();
            }
            return;
        }

        let interval = if self.soft_dropping {
            soft_drop_gravity_ms(self.level)
        } else {
            gravity_ms(self.level)
        };

        self.gravity_timer_ms += delta_ms;
        if self.gravity_timer_ms >= interval {
            self.gravity_timer_ms = 0;
            if self.try_descend() && self.soft_dropping {
                self.score += drop_score(1, false);
            }
        }
    }

    /// Write the externally-observable state into a caller-owned snapshot.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_visible_grid(&mut out.board);
        out.active = self.active;
        out.ghost_row = self.ghost_row();
        out.hold = self.hold;
        out.next_queue = self.next_queue;
        out.can_hold = self.can_hold;
        out.status = self.status;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    fn begin_session(&mut self) {
        self.board = Board::new();
        self.active = None;
        self.hold = None;
        self.can_hold = true;
        self.score = 0;
        self.level = START_LEVEL;
        self.lines = 0;
        self.gravity_timer_ms = 0;
        self.lock_timer_ms = 0;
        self.soft_dropping = false;

        // Fresh shuffle for the new game.
        self.randomizer.reset();
        for slot in &mut self.next_queue {
            *slot = self.randomizer.next();
        }

        self.status = Status::Playing;
        self.spawn_from_queue();
    }

    /// Pop the head of the next queue, top the queue back up from the bag,
    /// and place the popped kind at the spawn cell. A blocked spawn ends
    /// the game.
    fn spawn_from_queue(&mut self) {
        let kind = self.next_queue[0];
        self.next_queue.rotate_left(1);
        self.next_queue[NEXT_QUEUE_LEN - 1] = self.randomizer.next();
        self.spawn_piece(kind);
    }

    fn spawn_piece(&mut self, kind: PieceKind) {
        let piece = Piece::spawn(kind);
        self.gravity_timer_ms = 0;
        self.lock_timer_ms = 0;

        if !self.board.position_valid(&piece) {
            self.active = None;
            self.status = Status::GameOver;
            return;
        }

        self.active = Some(piece);
        self.can_hold = true;
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.translated(dx, 0);
        if self.board.position_valid(&moved) {
            self.active = Some(moved);
            // Any successful move cancels an in-progress lock countdown.
            self.lock_timer_ms = 0;
            return true;
        }
        false
    }

    fn try_descend(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.translated(0, 1);
        if self.board.position_valid(&moved) {
            self.active = Some(moved);
            self.lock_timer_ms = 0;
            return true;
        }
        false
    }

    /// Quarter-turn rotation with wall kicks, first-fit over the candidate
    /// list. Total failure leaves the piece untouched.
    fn try_rotate(&mut self, clockwise: bool) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        let to = if clockwise {
            active.rotation.cw()
        } else {
            active.rotation.ccw()
        };
        let Some(kicks) = kick_candidates(active.kind, active.rotation, to) else {
            return false;
        };

        for &(dx, dy) in kicks {
            // Kick offsets are y-up; the grid is y-down.
            let candidate = Piece {
                kind: active.kind,
                x: active.x + dx,
                y: active.y - dy,
                rotation: to,
            };
            if self.board.position_valid(&candidate) {
                self.active = Some(candidate);
                self.lock_timer_ms = 0;
                return true;
            }
        }
        false
    }

    fn hard_drop(&mut self) {
        let Some(active) = self.active else {
            return;
        };
        let target = self.board.ghost_row(&active);
        let distance = (target - active.y) as u32;
        self.score += drop_score(distance, true);
        self.active = Some(Piece { y: target, ..active });
        self.lock_active();
    }

    /// Exchange the active piece with the hold slot, or stash it if the
    /// slot is empty. Re-spawning the held kind into a blocked spawn cell
    /// ends the game.
    fn hold(&mut self) {
        if !self.can_hold {
            return;
        }
        let Some(active) = self.active else {
            return;
        };

        match self.hold.take() {
            None => {
                self.hold = Some(active.kind);
                self.spawn_from_queue();
            }
            Some(held) => {
                self.hold = Some(active.kind);
                self.spawn_piece(held);
            }
        }

        // One hold per piece; the next lock re-arms it.
        self.can_hold = false;
    }

    /// Commit the active piece: write it to the board, clear lines, score
    /// the clear at the current level, advance lines/level, spawn the next
    /// piece.
    fn lock_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.place(&active);

        let cleared = self.board.clear_lines();
        if cleared > 0 {
            self.score += line_clear_score(cleared, self.level);
            self.lines += cleared;
            self.level = level_for_lines(self.lines, START_LEVEL);
        }

        self.spawn_from_queue();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Rotation, BOARD_WIDTH, SPAWN_X, SPAWN_Y, TOTAL_HEIGHT,
    };

    #[test]
    fn new_game_idles_in_attract() {
        let game = Game::new(12345);
        assert_eq!(game.status(), Status::Attract);
        assert!(game.active().is_none());
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), START_LEVEL);
        assert_eq!(game.lines(), 0);
    }

    #[test]
    fn attract_ignores_gameplay_actions() {
        let mut game = Game::new(12345);
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::Hold,
            GameAction::Restart,
        ] {
            game.handle_action(action);
            assert_eq!(game.status(), Status::Attract);
            assert!(game.active().is_none());
        }
    }

    #[test]
    fn start_pause_starts_and_toggles_pause() {
        let mut game = Game::new(12345);
        game.handle_action(GameAction::StartPause);
        assert_eq!(game.status(), Status::Playing);
        assert!(game.active().is_some());

        game.handle_action(GameAction::StartPause);
        assert_eq!(game.status(), Status::Paused);

        // Paused ignores gameplay.
        let before = game.active();
        game.handle_action(GameAction::MoveLeft);
        game.handle_action(GameAction::HardDrop);
        assert_eq!(game.active(), before);

        game.handle_action(GameAction::StartPause);
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn pause_freezes_timers() {
        let mut game = Game::new(12345);
        game.start();
        let y_before = game.active().unwrap().y;

        game.handle_action(GameAction::StartPause);
        for _ in 0..100 {
            game.update(1000);
        }
        assert_eq!(game.active().unwrap().y, y_before);
    }

    #[test]
    fn spawn_uses_canonical_cell_and_feeds_the_queue() {
        let mut game = Game::new(12345);
        game.start();

        let active = game.active().unwrap();
        assert_eq!((active.x, active.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(active.rotation, Rotation::North);

        // FIFO: the queue head becomes the next active piece.
        let upcoming = game.next_queue()[0];
        game.handle_action(GameAction::HardDrop);
        assert_eq!(game.active().unwrap().kind, upcoming);
    }

    #[test]
    fn shift_moves_one_column_and_stops_at_walls() {
        let mut game = Game::new(12345);
        game.start();
        let x0 = game.active().unwrap().x;

        game.handle_action(GameAction::MoveRight);
        assert_eq!(game.active().unwrap().x, x0 + 1);
        game.handle_action(GameAction::MoveLeft);
        assert_eq!(game.active().unwrap().x, x0);

        // Push against the left wall; the piece never leaves the grid.
        for _ in 0..(BOARD_WIDTH as usize + 2) {
            game.handle_action(GameAction::MoveLeft);
        }
        let cells = game.active().unwrap().cells();
        assert!(cells.iter().all(|&(x, _)| x >= 0));
    }

    #[test]
    fn hard_drop_scores_distance_and_spawns_next() {
        let mut game = Game::new(12345);
        game.start();

        let active = game.active().unwrap();
        let distance = (game.board().ghost_row(&active) - active.y) as u32;
        assert!(distance > 0);

        game.handle_action(GameAction::HardDrop);

        assert_eq!(game.score(), 2 * distance);
        assert!(!game.game_over());
        // Next piece is live.
        let respawned = game.active().unwrap();
        assert_eq!((respawned.x, respawned.y), (SPAWN_X, SPAWN_Y));
    }

    #[test]
    fn gravity_descends_one_row_per_interval_then_locks() {
        let mut game = Game::new(12345);
        game.start();

        let interval = gravity_ms(game.level());
        let start_y = game.active().unwrap().y;
        let floor_y = game.ghost_row().unwrap();
        let steps = (floor_y - start_y) as u32;

        for step in 1..=steps {
            game.update(interval);
            assert_eq!(game.active().unwrap().y, start_y + step as i8);
        }

        // Grounded now; lock happens only after the full delay.
        game.update(LOCK_DELAY_MS - 1);
        assert_eq!(game.active().unwrap().y, floor_y);

        game.update(1);
        // Piece committed, next one spawned at the top.
        assert_eq!(game.active().unwrap().y, SPAWN_Y);
        assert!(game
            .board()
            .visible()
            .iter()
            .any(|&c| c != 0));
    }

    #[test]
    fn large_delta_performs_single_gravity_step() {
        let mut game = Game::new(12345);
        game.start();
        let y0 = game.active().unwrap().y;

        // A tab-switch-sized delta moves the piece one row, not many.
        game.update(60_000);
        assert_eq!(game.active().unwrap().y, y0 + 1);
    }

    #[test]
    fn successful_shift_cancels_lock_countdown() {
        let mut game = Game::new(12345);
        game.start();

        // Ride gravity to the floor.
        let interval = gravity_ms(game.level());
        while game.ghost_row() != game.active().map(|p| p.y) {
            game.update(interval);
        }
        let floor_y = game.active().unwrap().y;

        // Accumulate most of the lock delay, then shift; the countdown
        // restarts from zero.
        game.update(LOCK_DELAY_MS - 50);
        game.handle_action(GameAction::MoveRight);

        game.update(LOCK_DELAY_MS - 50);
        assert_eq!(game.active().unwrap().y, floor_y);

        // Completing the restarted delay commits the piece.
        game.update(50);
        assert_eq!(game.active().unwrap().y, SPAWN_Y);
    }

    #[test]
    fn soft_drop_accelerates_and_scores_per_row() {
        let mut game = Game::new(12345);
        game.start();
        let y0 = game.active().unwrap().y;

        game.handle_action(GameAction::SoftDrop);
        let fast = soft_drop_gravity_ms(game.level());
        game.update(fast);
        assert_eq!(game.active().unwrap().y, y0 + 1);
        assert_eq!(game.score(), 1);

        // Release restores normal gravity: one fast interval is no longer
        // enough to descend.
        game.handle_action_release(GameAction::SoftDrop);
        game.update(fast);
        assert_eq!(game.active().unwrap().y, y0 + 1);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn hold_stashes_then_swaps() {
        let mut game = Game::new(12345);
        game.start();

        let first = game.active().unwrap().kind;
        let second_expected = game.next_queue()[0];

        game.handle_action(GameAction::Hold);
        assert_eq!(game.hold_piece(), Some(first));
        assert_eq!(game.active().unwrap().kind, second_expected);
        assert!(!game.can_hold());

        // Second hold before a lock is a no-op.
        let before = game.active();
        game.handle_action(GameAction::Hold);
        assert_eq!(game.active(), before);
        assert_eq!(game.hold_piece(), Some(first));

        // Lock re-arms hold; the swap brings the stashed kind back.
        game.handle_action(GameAction::HardDrop);
        assert!(game.can_hold());
        let third = game.active().unwrap().kind;
        game.handle_action(GameAction::Hold);
        assert_eq!(game.active().unwrap().kind, first);
        assert_eq!(game.hold_piece(), Some(third));
    }

    #[test]
    fn rotation_with_no_valid_kick_is_a_silent_noop() {
        let mut game = Game::new(12345);
        game.start();

        // O rotates in place; cycle to a kind whose rotations differ.
        let mut guard = 0;
        while game.active().unwrap().kind == PieceKind::O {
            game.handle_action(GameAction::HardDrop);
            *game.board_mut() = Board::new();
            guard += 1;
            assert!(guard < 16);
        }

        // Wall in everything except the active piece's own cells, so every
        // kick candidate collides.
        let keep = game.active().unwrap().cells();
        for y in 0..TOTAL_HEIGHT {
            for x in 0..BOARD_WIDTH {
                if !keep.contains(&(x, y)) {
                    game.board_mut().set(x, y, 1);
                }
            }
        }

        let before = game.active().unwrap();
        game.handle_action(GameAction::RotateCw);
        assert_eq!(game.active().unwrap(), before);
        game.handle_action(GameAction::RotateCcw);
        assert_eq!(game.active().unwrap(), before);
    }

    #[test]
    fn rotation_in_open_space_changes_state() {
        let mut game = Game::new(12345);
        game.start();

        let mut guard = 0;
        while game.active().unwrap().kind == PieceKind::O {
            game.handle_action(GameAction::HardDrop);
            *game.board_mut() = Board::new();
            guard += 1;
            assert!(guard < 16);
        }

        let before = game.active().unwrap();
        game.handle_action(GameAction::RotateCw);
        assert_eq!(game.active().unwrap().rotation, before.rotation.cw());
        game.handle_action(GameAction::RotateCcw);
        assert_eq!(game.active().unwrap().rotation, before.rotation);
    }

    fn brick_up_spawn_area(game: &mut Game) {
        // Fill the spawn rows except column 0, so nothing is clearable but
        // every spawn cell the pieces use is occupied.
        for y in 0..(SPAWN_Y + 4) {
            for x in 1..BOARD_WIDTH {
                game.board_mut().set(x, y, 1);
            }
        }
    }

    #[test]
    fn blocked_spawn_ends_the_game() {
        let mut game = Game::new(12345);
        game.start();

        brick_up_spawn_area(&mut game);
        game.handle_action(GameAction::HardDrop);
        assert!(game.game_over());
        assert!(game.active().is_none());
    }

    #[test]
    fn game_over_restarts_clean() {
        let mut game = Game::new(12345);
        game.start();
        brick_up_spawn_area(&mut game);
        game.handle_action(GameAction::HardDrop);
        assert!(game.game_over());

        game.handle_action(GameAction::Restart);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.score(), 0);
        assert_eq!(game.lines(), 0);
        assert_eq!(game.level(), START_LEVEL);
        assert!(game.active().is_some());
        assert!(game.board().visible().iter().all(|&c| c == 0));
    }

    #[test]
    fn line_clear_updates_score_lines_and_level() {
        let mut game = Game::new(12345);
        game.start();

        // Fill the bottom visible row except where the active piece's drop
        // footprint lands; the hard drop then completes exactly that row.
        let active = game.active().unwrap();
        let landing = Piece {
            y: game.board().ghost_row(&active),
            ..active
        };
        let footprint = landing.cells();
        let bottom = TOTAL_HEIGHT - 1;
        assert!(
            footprint.iter().any(|&(_, y)| y == bottom),
            "north-spawn pieces land flush with the floor"
        );
        for x in 0..BOARD_WIDTH {
            if !footprint.contains(&(x, bottom)) {
                game.board_mut().set(x, bottom, 1);
            }
        }

        let drop_distance = (landing.y - active.y) as u32;
        game.handle_action(GameAction::HardDrop);

        assert_eq!(game.lines(), 1);
        assert_eq!(
            game.score(),
            drop_score(drop_distance, true) + line_clear_score(1, 1)
        );
        assert_eq!(game.level(), START_LEVEL);
    }

    #[test]
    fn snapshot_is_detached_from_later_mutation() {
        let mut game = Game::new(12345);
        game.start();

        let snap = game.snapshot();
        let board_copy = snap.board;
        let score_copy = snap.score;

        game.handle_action(GameAction::HardDrop);
        game.update(1000);

        assert_eq!(snap.board, board_copy);
        assert_eq!(snap.score, score_copy);
    }
}

//! Terminal gameplay entrypoint.
//!
//! Fixed-timestep loop: render the latest snapshot, poll input until the
//! next tick deadline, then advance repeat timers and the engine together.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;

use pockettris::core::{Game, GameSnapshot};
use pockettris::input::{should_quit, InputHandler};
use pockettris::term::{Frame, GameView, Screen};
use pockettris::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    let mut screen = Screen::new();
    screen.enter()?;

    let result = run(&mut screen);

    // Restore the terminal even when the loop errored.
    let _ = screen.exit();
    result
}

fn run(screen: &mut Screen) -> Result<()> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(1);

    let mut game = Game::new(seed);
    let view = GameView::default();
    let mut input = InputHandler::new();

    let (mut width, mut height) = terminal::size().unwrap_or((80, 24));
    let mut frame = Frame::new(width, height);
    let mut snapshot = GameSnapshot::default();

    let tick = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        game.snapshot_into(&mut snapshot);
        view.render(&snapshot, &mut frame);
        screen.present(&mut frame)?;

        // Poll input until the next tick is due.
        let timeout = tick
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if let Some(action) = input.handle_key_press(key.code) {
                            game.handle_action(action);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = input.handle_key_release(key.code) {
                            game.handle_action_release(action);
                        }
                    }
                    KeyEventKind::Repeat => {}
                },
                Event::Resize(w, h) => {
                    width = w;
                    height = h;
                    frame.resize(width, height);
                    screen.invalidate();
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick {
            let delta_ms = elapsed.as_millis() as u32;
            last_tick = Instant::now();

            let repeats = input.update(delta_ms);
            for action in repeats.moves {
                game.handle_action(action);
            }
            if repeats.soft_drop_released {
                game.handle_action_release(GameAction::SoftDrop);
            }

            game.update(delta_ms);
        }
    }
}

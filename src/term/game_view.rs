//! Pure mapping from a game snapshot to a frame. No I/O, unit-testable.

use crate::core::snapshot::GameSnapshot;
use crate::term::fb::{Frame, Rgb, Style};
use crate::types::{Cell, PieceKind, Status, BOARD_HEIGHT, BOARD_WIDTH, SPAWN_ROWS};

/// Renders the playfield, side panel and status overlays. Board cells are
/// drawn two columns wide to compensate for terminal glyph aspect ratio.
pub struct GameView {
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 2 }
    }
}

const FIELD_W: u16 = BOARD_WIDTH as u16;
const FIELD_H: u16 = BOARD_HEIGHT as u16;

impl GameView {
    /// Render `snapshot` into `frame` at the frame's current size.
    pub fn render(&self, snapshot: &GameSnapshot, frame: &mut Frame) {
        frame.clear();

        let board_w = FIELD_W * self.cell_w;
        let frame_w = board_w + 2;
        let frame_h = FIELD_H + 2;

        let origin_x = frame.width().saturating_sub(frame_w + 14) / 2;
        let origin_y = frame.height().saturating_sub(frame_h) / 2;

        let well = Style {
            fg: Rgb::new(90, 90, 100),
            bg: Rgb::new(24, 24, 32),
            bold: false,
            dim: true,
        };

        frame.fill_rect(origin_x + 1, origin_y + 1, board_w, FIELD_H, '·', well);
        self.draw_border(frame, origin_x, origin_y, frame_w, frame_h);

        // Settled stack.
        for (row_idx, row) in snapshot.board.iter().enumerate() {
            for (col_idx, &cell) in row.iter().enumerate() {
                if cell != 0 {
                    self.draw_cell(
                        frame,
                        origin_x,
                        origin_y,
                        col_idx as u16,
                        row_idx as u16,
                        '█',
                        cell_style(cell, false),
                    );
                }
            }
        }

        // Ghost, then the active piece over it.
        if let (Some(active), Some(ghost_row)) = (snapshot.active, snapshot.ghost_row) {
            let ghost = active.translated(0, ghost_row - active.y);
            for (x, y) in ghost.cells() {
                self.draw_visible_cell(frame, origin_x, origin_y, x, y, '░', ghost_style());
            }
        }
        if let Some(active) = snapshot.active {
            let style = cell_style(active.kind.color_index(), true);
            for (x, y) in active.cells() {
                self.draw_visible_cell(frame, origin_x, origin_y, x, y, '█', style);
            }
        }

        self.draw_panel(frame, snapshot, origin_x + frame_w + 2, origin_y);

        match snapshot.status {
            Status::Attract => {
                self.overlay(frame, origin_x, origin_y, frame_w, frame_h, "PRESS START")
            }
            Status::Paused => self.overlay(frame, origin_x, origin_y, frame_w, frame_h, "PAUSED"),
            Status::GameOver => {
                self.overlay(frame, origin_x, origin_y, frame_w, frame_h, "GAME OVER")
            }
            Status::Playing => {}
        }
    }

    fn draw_border(&self, frame: &mut Frame, x: u16, y: u16, w: u16, h: u16) {
        let style = Style {
            fg: Rgb::new(190, 190, 190),
            ..Style::default()
        };
        frame.put(x, y, '┌', style);
        frame.put(x + w - 1, y, '┐', style);
        frame.put(x, y + h - 1, '└', style);
        frame.put(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            frame.put(x + dx, y, '─', style);
            frame.put(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            frame.put(x, y + dy, '│', style);
            frame.put(x + w - 1, y + dy, '│', style);
        }
    }

    /// Draw at a full-grid position, clipping the hidden spawn rows.
    fn draw_visible_cell(
        &self,
        frame: &mut Frame,
        origin_x: u16,
        origin_y: u16,
        x: i8,
        y: i8,
        ch: char,
        style: Style,
    ) {
        let visible_y = y - SPAWN_ROWS;
        if x < 0 || x >= BOARD_WIDTH || visible_y < 0 || visible_y >= BOARD_HEIGHT {
            return;
        }
        self.draw_cell(
            frame,
            origin_x,
            origin_y,
            x as u16,
            visible_y as u16,
            ch,
            style,
        );
    }

    fn draw_cell(
        &self,
        frame: &mut Frame,
        origin_x: u16,
        origin_y: u16,
        col: u16,
        row: u16,
        ch: char,
        style: Style,
    ) {
        let px = origin_x + 1 + col * self.cell_w;
        let py = origin_y + 1 + row;
        frame.fill_rect(px, py, self.cell_w, 1, ch, style);
    }

    fn draw_panel(&self, frame: &mut Frame, snapshot: &GameSnapshot, x: u16, y: u16) {
        if x >= frame.width() {
            return;
        }
        let label = Style {
            bold: true,
            ..Style::default()
        };
        let value = Style::default();

        let mut row = y;
        for (name, number) in [
            ("SCORE", snapshot.score),
            ("LEVEL", snapshot.level),
            ("LINES", snapshot.lines),
        ] {
            frame.put_str(x, row, name, label);
            frame.put_str(x, row + 1, &number.to_string(), value);
            row += 3;
        }

        frame.put_str(x, row, "HOLD", label);
        let hold_text = snapshot.hold.map(kind_letter).unwrap_or("-");
        let hold_style = if snapshot.can_hold {
            value
        } else {
            Style { dim: true, ..value }
        };
        frame.put_str(x, row + 1, hold_text, hold_style);
        row += 3;

        frame.put_str(x, row, "NEXT", label);
        for (i, &kind) in snapshot.next_queue.iter().enumerate() {
            frame.put_str(
                x,
                row + 1 + i as u16,
                kind_letter(kind),
                cell_style(kind.color_index(), false),
            );
        }
    }

    fn overlay(&self, frame: &mut Frame, x: u16, y: u16, w: u16, h: u16, text: &str) {
        let style = Style {
            fg: Rgb::new(255, 255, 255),
            bold: true,
            ..Style::default()
        };
        let text_w = text.chars().count() as u16;
        let tx = x + w.saturating_sub(text_w) / 2;
        frame.put_str(tx, y + h / 2, text, style);
    }
}

fn ghost_style() -> Style {
    Style {
        fg: Rgb::new(130, 130, 140),
        bg: Rgb::new(24, 24, 32),
        bold: false,
        dim: true,
    }
}

/// Style for a board color index.
fn cell_style(cell: Cell, bold: bool) -> Style {
    let fg = match cell {
        1 => Rgb::new(80, 220, 220),  // I cyan
        2 => Rgb::new(240, 220, 80),  // O yellow
        3 => Rgb::new(200, 120, 220), // T purple
        4 => Rgb::new(100, 220, 120), // S green
        5 => Rgb::new(220, 80, 80),   // Z red
        6 => Rgb::new(90, 130, 230),  // J blue
        7 => Rgb::new(240, 160, 60),  // L orange
        _ => Rgb::new(120, 120, 120),
    };
    Style {
        fg,
        bg: Rgb::new(24, 24, 32),
        bold,
        dim: false,
    }
}

fn kind_letter(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::I => "I",
        PieceKind::O => "O",
        PieceKind::T => "T",
        PieceKind::S => "S",
        PieceKind::Z => "Z",
        PieceKind::J => "J",
        PieceKind::L => "L",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Game;
    use crate::types::GameAction;

    fn frame_text(frame: &Frame) -> String {
        let mut out = String::new();
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                out.push(frame.get(x, y).unwrap().ch);
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn attract_screen_shows_start_prompt() {
        let game = Game::new(1);
        let view = GameView::default();
        let mut frame = Frame::new(60, 26);
        view.render(&game.snapshot(), &mut frame);
        assert!(frame_text(&frame).contains("PRESS START"));
    }

    #[test]
    fn playing_screen_shows_panel_and_piece() {
        let mut game = Game::new(1);
        game.start();
        let view = GameView::default();
        let mut frame = Frame::new(60, 26);
        view.render(&game.snapshot(), &mut frame);

        let text = frame_text(&frame);
        assert!(text.contains("SCORE"));
        assert!(text.contains("NEXT"));
        assert!(!text.contains("PRESS START"));
        // Ghost of the falling piece reaches the field.
        assert!(text.contains('░'));
    }

    #[test]
    fn paused_screen_shows_overlay() {
        let mut game = Game::new(1);
        game.start();
        game.handle_action(GameAction::StartPause);

        let view = GameView::default();
        let mut frame = Frame::new(60, 26);
        view.render(&game.snapshot(), &mut frame);
        assert!(frame_text(&frame).contains("PAUSED"));
    }

    #[test]
    fn hidden_rows_never_draw() {
        let mut game = Game::new(1);
        game.start();
        // The freshly spawned piece sits in the hidden area; the visible
        // field should contain the ghost but not the solid piece glyph
        // above the top border row.
        let view = GameView::default();
        let mut frame = Frame::new(60, 26);
        view.render(&game.snapshot(), &mut frame);

        let origin_y = frame.height().saturating_sub(FIELD_H + 2) / 2;
        for y in 0..=origin_y {
            for x in 0..frame.width() {
                assert_ne!(frame.get(x, y).unwrap().ch, '█');
            }
        }
    }
}

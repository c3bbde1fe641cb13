//! Flushes frames to the terminal, diffing against the previous frame.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::term::fb::{Frame, Rgb, Style};

pub struct Screen {
    stdout: io::Stdout,
    prev: Option<Frame>,
    force_full: bool,
}

impl Screen {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            prev: None,
            force_full: true,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next present to redraw everything (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.force_full = true;
    }

    /// Draw a frame. The frame is swapped into internal state so the
    /// caller's buffer can be reused next frame without cloning.
    pub fn present(&mut self, frame: &mut Frame) -> Result<()> {
        let mut prev = self
            .prev
            .take()
            .unwrap_or_else(|| Frame::new(frame.width(), frame.height()));

        let full = self.force_full
            || prev.width() != frame.width()
            || prev.height() != frame.height();

        if full {
            self.redraw_all(frame)?;
            prev.resize(frame.width(), frame.height());
            self.force_full = false;
        } else {
            self.redraw_changed(frame, &prev)?;
        }

        // Swap the drawn frame into `prev`; the caller reuses the old
        // buffer next frame.
        std::mem::swap(&mut prev, frame);
        self.prev = Some(prev);
        Ok(())
    }

    fn redraw_all(&mut self, frame: &Frame) -> Result<()> {
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;

        let mut style: Option<Style> = None;
        for y in 0..frame.height() {
            self.stdout.queue(cursor::MoveTo(0, y))?;
            for x in 0..frame.width() {
                let glyph = frame.get(x, y).unwrap_or_default();
                if style != Some(glyph.style) {
                    self.apply_style(glyph.style)?;
                    style = Some(glyph.style);
                }
                self.stdout.queue(Print(glyph.ch))?;
            }
        }

        self.finish_frame()
    }

    fn redraw_changed(&mut self, next: &Frame, prev: &Frame) -> Result<()> {
        let mut style: Option<Style> = None;

        for y in 0..next.height() {
            let mut x = 0;
            while x < next.width() {
                if prev.get(x, y) == next.get(x, y) {
                    x += 1;
                    continue;
                }

                // Start of a changed run; emit one cursor move for it.
                self.stdout.queue(cursor::MoveTo(x, y))?;
                while x < next.width() && prev.get(x, y) != next.get(x, y) {
                    let glyph = next.get(x, y).unwrap_or_default();
                    if style != Some(glyph.style) {
                        self.apply_style(glyph.style)?;
                        style = Some(glyph.style);
                    }
                    self.stdout.queue(Print(glyph.ch))?;
                    x += 1;
                }
            }
        }

        self.finish_frame()
    }

    fn finish_frame(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;
        Ok(())
    }

    fn apply_style(&mut self, style: Style) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(SetForegroundColor(to_color(style.fg)))?;
        self.stdout.queue(SetBackgroundColor(to_color(style.bg)))?;
        if style.bold {
            self.stdout.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.stdout.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

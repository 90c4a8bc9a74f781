//! TerminalRenderer: flushes framebuffers to the terminal.
//!
//! Each frame is diffed row by row against the previous one. Changed spans
//! separated by fewer unchanged columns than the merge gap are written as a
//! single span, so a gem that changes both of its columns, or two gems with a
//! one-column seam between them, cost one cursor move. The gap is the board
//! cell width of the view being drawn.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor, event, queue,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

/// Matches the default two-column gem cell.
const DEFAULT_MERGE_GAP: u16 = 2;

/// Columns `start..end` of row `y` that need rewriting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub y: u16,
    pub start: u16,
    pub end: u16,
}

/// Encodes frame transitions as terminal commands.
///
/// Keeps its run list between frames so a warmed-up encoder does not allocate.
#[derive(Debug)]
pub struct FrameEncoder {
    merge_gap: u16,
    runs: Vec<Run>,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_GAP)
    }
}

impl FrameEncoder {
    pub fn new(merge_gap: u16) -> Self {
        Self {
            merge_gap: merge_gap.max(1),
            runs: Vec::new(),
        }
    }

    pub fn merge_gap(&self) -> u16 {
        self.merge_gap
    }

    /// Spans of `next` that differ from `prev`. Without a previous frame of
    /// the same size every row is one full-width span.
    pub fn changed_runs(&mut self, prev: Option<&FrameBuffer>, next: &FrameBuffer) -> &[Run] {
        self.runs.clear();
        let prev = prev.filter(|p| same_shape(p, next));
        for y in 0..next.height() {
            match prev {
                Some(p) => push_row_runs(&mut self.runs, y, p.row(y), next.row(y), self.merge_gap),
                None if next.width() > 0 => self.runs.push(Run {
                    y,
                    start: 0,
                    end: next.width(),
                }),
                None => {}
            }
        }
        &self.runs
    }

    /// Append the commands that turn `prev` into `next` on screen. Without a
    /// usable previous frame the screen is cleared and fully redrawn.
    pub fn encode(
        &mut self,
        prev: Option<&FrameBuffer>,
        next: &FrameBuffer,
        out: &mut Vec<u8>,
    ) -> Result<()> {
        if !prev.is_some_and(|p| same_shape(p, next)) {
            queue!(out, terminal::Clear(terminal::ClearType::All))?;
        }
        self.changed_runs(prev, next);

        let mut pen = Pen::default();
        for run in &self.runs {
            queue!(out, cursor::MoveTo(run.start, run.y))?;
            for cell in &next.row(run.y)[run.start as usize..run.end as usize] {
                pen.switch(out, cell.style)?;
                queue!(out, Print(cell.ch))?;
            }
        }
        if pen.inked() {
            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        Ok(())
    }
}

fn same_shape(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    (a.width(), a.height()) == (b.width(), b.height())
}

fn push_row_runs(runs: &mut Vec<Run>, y: u16, old: &[Cell], new: &[Cell], merge_gap: u16) {
    let differs = |x: usize| old.get(x) != Some(&new[x]);
    let mut x = 0;
    while x < new.len() {
        if !differs(x) {
            x += 1;
            continue;
        }
        let start = x as u16;
        while x < new.len() && differs(x) {
            x += 1;
        }
        let end = x as u16;
        match runs.last_mut() {
            Some(last) if last.y == y && start - last.end < merge_gap => last.end = end,
            _ => runs.push(Run { y, start, end }),
        }
    }
}

/// Tracks the style last written so only changed attributes are emitted.
#[derive(Debug, Default)]
struct Pen {
    current: Option<CellStyle>,
}

impl Pen {
    fn inked(&self) -> bool {
        self.current.is_some()
    }

    fn switch(&mut self, out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
        match self.current.replace(style) {
            Some(prev) if prev == style => {}
            Some(prev) if (prev.bold, prev.dim) == (style.bold, style.dim) => {
                if prev.fg != style.fg {
                    queue!(out, SetForegroundColor(style.fg.into()))?;
                }
                if prev.bg != style.bg {
                    queue!(out, SetBackgroundColor(style.bg.into()))?;
                }
            }
            // Attribute reset also drops colors, so both are re-sent.
            _ => {
                queue!(
                    out,
                    SetAttribute(Attribute::Reset),
                    SetForegroundColor(style.fg.into()),
                    SetBackgroundColor(style.bg.into())
                )?;
                if style.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if style.dim {
                    queue!(out, SetAttribute(Attribute::Dim))?;
                }
            }
        }
        Ok(())
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    encoder: FrameEncoder,
    /// Frame currently on screen.
    prev: Option<FrameBuffer>,
    bytes: Vec<u8>,
    mouse: bool,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            encoder: FrameEncoder::default(),
            prev: None,
            bytes: Vec::with_capacity(16 * 1024),
            mouse: false,
        }
    }

    /// Merge changed spans closer than `columns`; pass the view's cell width.
    pub fn with_merge_gap(mut self, columns: u16) -> Self {
        self.encoder = FrameEncoder::new(columns);
        self
    }

    /// Report mouse clicks as terminal events while the renderer is entered.
    pub fn with_mouse_capture(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.bytes.clear();
        queue!(
            self.bytes,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap
        )?;
        if self.mouse {
            queue!(self.bytes, event::EnableMouseCapture)?;
        }
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.bytes.clear();
        if self.mouse {
            queue!(self.bytes, event::DisableMouseCapture)?;
        }
        queue!(
            self.bytes,
            SetAttribute(Attribute::Reset),
            ResetColor,
            terminal::EnableLineWrap,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Redraw everything on the next frame, e.g. after a terminal resize.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Draw `fb`, then hand back the previously shown frame in its place so
    /// the caller renders the next frame into that allocation.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let prev = self.prev.take();
        self.bytes.clear();
        self.encoder.encode(prev.as_ref(), fb, &mut self.bytes)?;
        self.flush()?;

        let mut shown = prev.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
        std::mem::swap(&mut shown, fb);
        self.prev = Some(shown);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        self.stdout.write_all(&self.bytes)?;
        self.stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gem(fb: &mut FrameBuffer, x: u16, y: u16, ch: char) {
        fb.put(x, y, ch, CellStyle::new(Rgb::new(230, 70, 70), Rgb::BLACK));
    }

    fn scattered() -> FrameBuffer {
        let mut fb = FrameBuffer::new(10, 2);
        gem(&mut fb, 1, 0, '◆');
        gem(&mut fb, 2, 0, '◆');
        gem(&mut fb, 4, 0, '●');
        gem(&mut fb, 8, 0, '▲');
        gem(&mut fb, 0, 1, '■');
        fb
    }

    fn run(y: u16, start: u16, end: u16) -> Run {
        Run { y, start, end }
    }

    #[test]
    fn runs_merge_across_seams_narrower_than_a_gem_cell() {
        let blank = FrameBuffer::new(10, 2);
        let next = scattered();
        let mut encoder = FrameEncoder::new(2);

        assert_eq!(
            encoder.changed_runs(Some(&blank), &next),
            &[run(0, 1, 5), run(0, 8, 9), run(1, 0, 1)]
        );
    }

    #[test]
    fn single_column_gap_keeps_exact_runs() {
        let blank = FrameBuffer::new(10, 2);
        let next = scattered();
        let mut encoder = FrameEncoder::new(1);

        assert_eq!(
            encoder.changed_runs(Some(&blank), &next),
            &[run(0, 1, 3), run(0, 4, 5), run(0, 8, 9), run(1, 0, 1)]
        );
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = scattered();
        let b = a.clone();

        let mut out = Vec::new();
        FrameEncoder::default().encode(Some(&a), &b, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn missing_or_resized_previous_frame_redraws_everything() {
        let mut fb = FrameBuffer::new(3, 2);
        fb.put_str(0, 0, "◆●▲", CellStyle::default());
        fb.put_str(0, 1, "■♥★", CellStyle::default());
        let mut encoder = FrameEncoder::default();

        let stale = FrameBuffer::new(5, 5);
        assert_eq!(
            encoder.changed_runs(Some(&stale), &fb),
            &[run(0, 0, 3), run(1, 0, 3)]
        );

        let mut out = Vec::new();
        encoder.encode(None, &fb, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[2J"));
        for ch in "◆●▲■♥★".chars() {
            assert!(text.contains(ch), "{ch}");
        }
    }

    #[test]
    fn pen_only_resends_colors_that_change() {
        let blank = FrameBuffer::new(2, 1);
        let mut next = FrameBuffer::new(2, 1);
        next.put(0, 0, '◆', CellStyle::new(Rgb::new(230, 70, 70), Rgb::BLACK));
        next.put(1, 0, '●', CellStyle::new(Rgb::new(80, 140, 240), Rgb::BLACK));

        let mut out = Vec::new();
        FrameEncoder::default()
            .encode(Some(&blank), &next, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("38;2;").count(), 2);
        assert_eq!(text.matches("48;2;").count(), 1);
        assert!(!text.contains("\x1b[2J"));
    }
}

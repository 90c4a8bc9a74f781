//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Animation, GameSnapshot, Phase};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Gem, Pos};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);
const SELECTED_BG: Rgb = Rgb::new(150, 120, 40);

const BOARD: CellStyle = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
const EMPTY_CELL: CellStyle = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
const FRAME: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
const LABEL: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), Rgb::BLACK).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);
const HINT: CellStyle = VALUE.dim();
const OVERLAY: CellStyle = CellStyle::new(Rgb::new(255, 255, 255), Rgb::BLACK).bold();

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Frontend state drawn alongside the game: things the engine does not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudView {
    /// Keyboard cursor cell
    pub cursor: Option<Pos>,
    /// Difficulty the next restart will use
    pub next_difficulty: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Board frame placement within a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// A lightweight terminal renderer for the gem board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Terminal columns per board cell.
    pub fn cell_width(&self) -> u16 {
        self.cell_w
    }

    fn layout(&self, board_size: u8, viewport: Viewport) -> Layout {
        let frame_w = (board_size as u16) * self.cell_w + 2;
        let frame_h = (board_size as u16) * self.cell_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        Layout {
            start_x,
            start_y,
            frame_w,
            frame_h,
        }
    }

    /// Board cell under terminal position `(x, y)`, using the same layout as
    /// rendering. Border and panel positions map to `None`.
    pub fn cell_at(&self, board_size: u8, viewport: Viewport, x: u16, y: u16) -> Option<Pos> {
        let l = self.layout(board_size, viewport);
        let bx = x.checked_sub(l.start_x + 1)? / self.cell_w;
        let by = y.checked_sub(l.start_y + 1)? / self.cell_h;
        if bx >= board_size as u16 || by >= board_size as u16 {
            return None;
        }
        Some(Pos::new(by as u8, bx as u8))
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_hud(snap, None, viewport, fb);
    }

    pub fn render_into_with_hud(
        &self,
        snap: &GameSnapshot,
        hud: Option<&HudView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let size = snap.board.size();
        let l = self.layout(size, viewport);

        fb.fill_rect(l.start_x + 1, l.start_y + 1, l.frame_w - 2, l.frame_h - 2, ' ', BOARD);
        draw_frame(fb, l);

        // Cursor and selection backgrounds go under everything else.
        let cursor = hud.and_then(|h| h.cursor);
        for pos in snap.board.positions() {
            let cell_bg = if snap.selected == Some(pos) {
                SELECTED_BG
            } else if cursor == Some(pos) {
                CURSOR_BG
            } else {
                continue;
            };
            self.fill_at(fb, l, pos.row as f32, pos.col as f32, ' ', BOARD.on(cell_bg));
        }

        // Resting gems. Cells that an animation ends on are drawn by the animation.
        for pos in snap.board.positions() {
            if snap.animation_at(pos).is_some() {
                continue;
            }
            match snap.board.get(pos).flatten() {
                Some(gem) => {
                    let style = self.cell_style(gem, snap, cursor, pos);
                    self.fill_at(fb, l, pos.row as f32, pos.col as f32, gem_glyph(gem), style);
                }
                None => self.fill_at(fb, l, pos.row as f32, pos.col as f32, '·', EMPTY_CELL),
            }
        }

        for anim in &snap.animations {
            self.draw_animation(fb, l, anim);
        }

        self.draw_side_panel(fb, snap, hud, viewport, l);

        if snap.game_over {
            self.draw_overlay_text(fb, l, 0, "GAME OVER");
            self.draw_overlay_text(fb, l, 1, "r: restart");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_hud(
        &self,
        snap: &GameSnapshot,
        hud: Option<&HudView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_hud(snap, hud, viewport, &mut fb);
        fb
    }

    fn cell_style(&self, gem: Gem, snap: &GameSnapshot, cursor: Option<Pos>, pos: Pos) -> CellStyle {
        let bg = if snap.selected == Some(pos) {
            SELECTED_BG
        } else if cursor == Some(pos) {
            CURSOR_BG
        } else {
            BOARD_BG
        };
        let style = CellStyle::new(gem_color(gem), bg);
        if snap.selected == Some(pos) {
            style.bold()
        } else {
            style
        }
    }

    fn draw_animation(&self, fb: &mut FrameBuffer, l: Layout, anim: &Animation) {
        let (row, col) = anim.position();
        let scale = anim.scale();
        let ch = if scale > 0.66 {
            gem_glyph(anim.gem)
        } else if scale > 0.33 {
            '•'
        } else if scale > 0.0 {
            '·'
        } else {
            ' '
        };
        let style = CellStyle::new(gem_color(anim.gem), BOARD_BG).bold();
        let style = if scale < 1.0 { style.dim() } else { style };
        self.fill_at(fb, l, row, col, ch, style);
    }

    /// Fill one board cell at a fractional board position, rounded to the
    /// nearest terminal column and row.
    fn fill_at(&self, fb: &mut FrameBuffer, l: Layout, row: f32, col: f32, ch: char, style: CellStyle) {
        let px = l.start_x + 1 + (col * self.cell_w as f32).round().max(0.0) as u16;
        let py = l.start_y + 1 + (row * self.cell_h as f32).round().max(0.0) as u16;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: Option<&HudView>,
        viewport: Viewport,
        l: Layout,
    ) {
        let panel_x = l.start_x.saturating_add(l.frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let mut y = l.start_y;
        fb.put_str(panel_x, y, "SCORE", LABEL);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, VALUE);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "CHAIN", LABEL);
        y = y.saturating_add(1);
        if snap.chain > 0 {
            fb.put(panel_x, y, 'x', VALUE);
            fb.put_u32(panel_x + 1, y, snap.chain, VALUE);
        } else {
            fb.put_str(panel_x, y, "-", VALUE);
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "DIFFICULTY", LABEL);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.settings.difficulty as u32, VALUE);
        fb.put(panel_x + 2, y, '(', HINT);
        fb.put_u32(panel_x + 3, y, snap.settings.gem_types() as u32, HINT);
        fb.put_str(panel_x + 4, y, " gems)", HINT);
        if let Some(next) = hud.and_then(|h| h.next_difficulty) {
            if next != snap.settings.difficulty {
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "next:", HINT);
                fb.put_u32(panel_x + 6, y, next as u32, VALUE);
            }
        }
        y = y.saturating_add(2);

        let status = match snap.phase {
            _ if snap.game_over => "NO MOVES",
            Phase::Idle if snap.selected.is_some() => "SWAP WITH?",
            Phase::Idle => "READY",
            Phase::Swapping { reverting: true, .. } => "NO MATCH",
            _ => "...",
        };
        fb.put_str(panel_x, y, status, VALUE);
        y = y.saturating_add(2);

        const HELP: [&str; 5] = [
            "arrows  move",
            "space   select",
            "1-3     level",
            "r       restart",
            "q       quit",
        ];
        if y.saturating_add(HELP.len() as u16) <= viewport.height {
            for line in HELP {
                fb.put_str(panel_x, y, line, HINT);
                y = y.saturating_add(1);
            }
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, l: Layout, line: u16, text: &str) {
        let mid_y = l.start_y.saturating_add(l.frame_h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = l.start_x.saturating_add(l.frame_w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y, text, OVERLAY);
    }
}

/// Box-drawing frame around the board area.
fn draw_frame(fb: &mut FrameBuffer, l: Layout) {
    let (x0, y0) = (l.start_x, l.start_y);
    let x1 = x0.saturating_add(l.frame_w.saturating_sub(1));
    let y1 = y0.saturating_add(l.frame_h.saturating_sub(1));
    for x in x0 + 1..x1 {
        fb.put(x, y0, '─', FRAME);
        fb.put(x, y1, '─', FRAME);
    }
    for y in y0 + 1..y1 {
        fb.put(x0, y, '│', FRAME);
        fb.put(x1, y, '│', FRAME);
    }
    for (x, y, ch) in [(x0, y0, '┌'), (x1, y0, '┐'), (x0, y1, '└'), (x1, y1, '┘')] {
        fb.put(x, y, ch, FRAME);
    }
}

/// Glyph per gem type; shapes differ so colors are not the only cue.
pub fn gem_glyph(gem: Gem) -> char {
    const GLYPHS: [char; 7] = ['◆', '●', '▲', '■', '♥', '✚', '★'];
    GLYPHS[gem as usize % GLYPHS.len()]
}

pub fn gem_color(gem: Gem) -> Rgb {
    match gem % 7 {
        0 => Rgb::new(230, 70, 70),
        1 => Rgb::new(80, 140, 240),
        2 => Rgb::new(100, 220, 120),
        3 => Rgb::new(240, 220, 80),
        4 => Rgb::new(220, 110, 220),
        5 => Rgb::new(255, 165, 0),
        _ => Rgb::new(80, 220, 220),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_at_inverts_layout() {
        let view = GameView::default();
        let vp = Viewport::new(18, 10);
        // 8x8 board, 2 columns per cell: frame 18x10 at (0,0).
        assert_eq!(view.cell_at(8, vp, 0, 0), None);
        assert_eq!(view.cell_at(8, vp, 1, 1), Some(Pos::new(0, 0)));
        assert_eq!(view.cell_at(8, vp, 2, 1), Some(Pos::new(0, 0)));
        assert_eq!(view.cell_at(8, vp, 3, 1), Some(Pos::new(0, 1)));
        assert_eq!(view.cell_at(8, vp, 16, 8), Some(Pos::new(7, 7)));
        assert_eq!(view.cell_at(8, vp, 17, 8), None);
        assert_eq!(view.cell_at(8, vp, 5, 9), None);
    }

    #[test]
    fn glyphs_are_distinct_per_gem_type() {
        let glyphs: Vec<char> = (0..7).map(gem_glyph).collect();
        for (i, a) in glyphs.iter().enumerate() {
            assert!(!glyphs[i + 1..].contains(a));
        }
    }
}

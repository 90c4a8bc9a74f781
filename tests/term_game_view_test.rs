use tui_gems::core::{Board, GameState, Settings, SimpleRng};
use tui_gems::term::{
    gem_glyph, AnchorY, FrameBuffer, FrameEncoder, GameView, HudView, Run, Viewport,
};
use tui_gems::types::{Gem, Pos};

fn screen_text(fb: &FrameBuffer) -> String {
    let mut all = String::new();
    for y in 0..fb.height() {
        all.push_str(&fb.row_text(y));
        all.push('\n');
    }
    all
}

fn patterned_game() -> GameState {
    let rows: Vec<Vec<Option<Gem>>> = (0..8u8)
        .map(|r| (0..8u8).map(|c| Some((r + 2 * c) % 5)).collect())
        .collect();
    GameState::from_board(
        Board::from_rows(rows).unwrap(),
        Settings::default(),
        SimpleRng::new(1),
    )
}

#[test]
fn term_view_renders_border_corners() {
    let snap = GameState::new(Settings::default(), 1).snapshot();
    let view = GameView::default();

    // 8 cells * 2 columns + border => 18 wide, 8 rows + border => 10 tall.
    let fb = view.render(&snap, Viewport::new(18, 10));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
    assert_eq!(fb.get(17, 0).unwrap().ch, '┐');
    assert_eq!(fb.get(0, 9).unwrap().ch, '└');
    assert_eq!(fb.get(17, 9).unwrap().ch, '┘');
}

#[test]
fn term_view_renders_gems_two_chars_wide() {
    let snap = patterned_game().snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(18, 10));

    // Cell (2,3) holds gem (2 + 6) % 5 = 3.
    let (x0, y0) = (1 + 3 * 2, 1 + 2);
    assert_eq!(fb.get(x0, y0).unwrap().ch, gem_glyph(3));
    assert_eq!(fb.get(x0 + 1, y0).unwrap().ch, gem_glyph(3));
}

#[test]
fn term_view_draws_empty_cells_as_dots() {
    let mut snap = patterned_game().snapshot();
    snap.board.set(Pos::new(0, 0), None);
    let fb = GameView::default().render(&snap, Viewport::new(18, 10));
    assert_eq!(fb.get(1, 1).unwrap().ch, '·');
}

#[test]
fn term_view_highlights_selection_and_cursor() {
    let mut game = patterned_game();
    game.handle_cell_interaction(4, 4);
    let snap = game.snapshot();
    let view = GameView::default();
    let vp = Viewport::new(18, 10);

    let plain = view.render(&snap, vp);
    let hud = HudView {
        cursor: Some(Pos::new(1, 1)),
        next_difficulty: None,
    };
    let with_cursor = view.render_with_hud(&snap, Some(&hud), vp);

    let selected = plain.get(1 + 4 * 2, 1 + 4).unwrap();
    let normal = plain.get(1 + 5 * 2, 1 + 4).unwrap();
    assert_ne!(selected.style.bg, normal.style.bg);
    assert!(selected.style.bold);

    assert_ne!(
        with_cursor.get(1 + 2, 1 + 1).unwrap().style.bg,
        plain.get(1 + 2, 1 + 1).unwrap().style.bg
    );
}

#[test]
fn term_view_draws_swap_in_flight_between_cells() {
    let mut game = patterned_game();
    game.attempt_swap(Pos::new(0, 0), Pos::new(0, 1));
    // Halfway through the 200ms swap both gems meet between their cells.
    game.tick(100);
    let snap = game.snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(18, 10));

    // Cells (0,0) and (0,1) span columns 1..=4; the gems occupy the middle two.
    assert_eq!(fb.get(1, 1).unwrap().ch, ' ');
    assert_eq!(fb.get(4, 1).unwrap().ch, ' ');
    // The gem moving left is drawn last.
    assert_eq!(fb.get(2, 1).unwrap().ch, gem_glyph(2));
    assert_eq!(fb.get(3, 1).unwrap().ch, gem_glyph(2));
}

#[test]
fn term_view_draws_side_panel_when_wide_enough() {
    let mut snap = GameState::new(Settings::default(), 1).snapshot();
    snap.score = 1070;
    snap.chain = 3;

    let hud = HudView {
        cursor: None,
        next_difficulty: Some(3),
    };
    let fb = GameView::default().render_with_hud(&snap, Some(&hud), Viewport::new(60, 24));
    let all = screen_text(&fb);

    assert!(all.contains("SCORE"));
    assert!(all.contains("1070"));
    assert!(all.contains("x3"));
    assert!(all.contains("DIFFICULTY"));
    assert!(all.contains("next: 3"));
    assert!(all.contains("restart"));
}

#[test]
fn term_view_shows_game_over_overlay() {
    let mut snap = GameState::new(Settings::default(), 1).snapshot();
    snap.game_over = true;
    let fb = GameView::default().render(&snap, Viewport::new(40, 12));
    assert!(screen_text(&fb).contains("GAME OVER"));
}

#[test]
fn term_view_centers_board_by_default_on_tall_viewports() {
    let snap = GameState::new(Settings::default(), 1).snapshot();
    let fb = GameView::default().render(&snap, Viewport::new(18, 20));

    // start_y = (20 - 10) / 2 = 5.
    assert_eq!(fb.get(0, 5).unwrap().ch, '┌');
}

#[test]
fn term_view_can_anchor_board_to_top() {
    let snap = GameState::new(Settings::default(), 1).snapshot();
    let view = GameView::default().with_anchor_y(AnchorY::Top);
    let fb = view.render(&snap, Viewport::new(18, 20));

    assert_eq!(fb.get(0, 0).unwrap().ch, '┌');
}

#[test]
fn term_view_follows_board_size() {
    let settings = Settings {
        board_size: 5,
        ..Settings::default()
    };
    let snap = GameState::new(settings, 1).snapshot();
    let view = GameView::default();
    let vp = Viewport::new(12, 7);
    let fb = view.render(&snap, vp);

    assert_eq!(fb.get(11, 6).unwrap().ch, '┘');
    assert_eq!(view.cell_at(5, vp, 10, 5), Some(Pos::new(4, 4)));
}

#[test]
fn term_selection_change_rewrites_one_gem_cell() {
    let mut game = patterned_game();
    let view = GameView::default();
    let vp = Viewport::new(18, 10);
    let before = view.render(&game.snapshot(), vp);

    game.handle_cell_interaction(4, 4);
    let after = view.render(&game.snapshot(), vp);

    let mut encoder = FrameEncoder::new(view.cell_width());
    // Cell (4,4) covers columns 9..11 of screen row 5.
    assert_eq!(
        encoder.changed_runs(Some(&before), &after),
        &[Run {
            y: 5,
            start: 9,
            end: 11
        }]
    );
}

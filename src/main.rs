//! Terminal gem-matching runner (default binary).
//!
//! It uses crossterm for keyboard and mouse input and a custom
//! framebuffer-based renderer.

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tui_gems::app::App;
use tui_gems::cli::{parse_run_args, RunConfig, USAGE};
use tui_gems::core::GameSnapshot;
use tui_gems::input::{handle_key_event, handle_mouse_event, should_quit, InputHandler};
use tui_gems::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_gems::types::{InputAction, Pos, TICK_MS};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(config) = parse_run_args(&args)? else {
        print!("{USAGE}");
        return Ok(());
    };

    // The terminal belongs to the game; logs only go to a file.
    if let Some(path) = &config.log {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let view = GameView::default();
    let mut term = TerminalRenderer::new()
        .with_merge_gap(view.cell_width())
        .with_mouse_capture(true);
    term.enter()?;

    let result = run(&mut term, &view, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, view: &GameView, config: &RunConfig) -> Result<()> {
    let mut app = App::new(config.settings, config.seed);
    info!(seed = config.seed, settings = ?config.settings, "game started");

    let mut input_handler = InputHandler::new();
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        app.snapshot_into(&mut snap);
        view.render_into_with_hud(&snap, Some(&app.hud()), viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let ev = event::read()?;
            if let Event::Resize(_, _) = ev {
                term.invalidate();
            }
            let to_board = |x, y| view.cell_at(snap.board.size(), viewport, x, y);
            if dispatch(ev, &mut app, &mut input_handler, to_board) == Flow::Quit {
                info!(score = app.game().score(), "quit");
                return Ok(());
            }
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            for action in input_handler.update(TICK_MS) {
                app.apply(action);
            }
            app.tick(TICK_MS);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Route one terminal event to the session. Cursor movement goes through the
/// DAS/ARR handler; everything else is applied directly.
fn dispatch(
    ev: Event,
    app: &mut App,
    input_handler: &mut InputHandler,
    to_board: impl Fn(u16, u16) -> Option<Pos>,
) -> Flow {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if should_quit(key) {
                return Flow::Quit;
            }
            if let Some(action) = input_handler.handle_key_press(key.code) {
                app.apply(action);
            }
            if let Some(action) = handle_key_event(key) {
                if !matches!(action, InputAction::Move(_)) {
                    app.apply(action);
                }
            }
        }
        Event::Key(key) if key.kind == KeyEventKind::Release => {
            input_handler.handle_key_release(key.code);
        }
        Event::Mouse(mouse) => {
            if let Some(action) = handle_mouse_event(mouse, to_board) {
                app.apply(action);
            }
        }
        // Terminal auto-repeat is ignored; the handler repeats moves itself.
        _ => {}
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};
    use tui_gems::core::Settings;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn dispatch_quits_and_routes_keys() {
        let mut app = App::new(Settings::default(), 3);
        let mut handler = InputHandler::new();
        let off_board = |_: u16, _: u16| -> Option<Pos> { None };

        let down = key(KeyCode::Down, KeyEventKind::Press);
        assert_eq!(dispatch(down, &mut app, &mut handler, off_board), Flow::Continue);
        // One step from the handler, none from the key map.
        assert_eq!(app.cursor(), Pos::new(1, 0));

        let release = key(KeyCode::Down, KeyEventKind::Release);
        dispatch(release, &mut app, &mut handler, off_board);
        assert_eq!(handler.held(), None);

        let quit = key(KeyCode::Char('q'), KeyEventKind::Press);
        assert_eq!(dispatch(quit, &mut app, &mut handler, off_board), Flow::Quit);
    }
}

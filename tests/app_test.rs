use std::io::Write;

use tui_gems::app::App;
use tui_gems::cli::parse_run_args;
use tui_gems::core::Settings;
use tui_gems::types::{Direction, InputAction, Pos, TICK_MS};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn cursor_moves_and_stays_on_board() {
    let mut app = App::new(Settings::default(), 7);
    assert_eq!(app.cursor(), Pos::new(0, 0));

    app.apply(InputAction::Move(Direction::Up));
    app.apply(InputAction::Move(Direction::Left));
    assert_eq!(app.cursor(), Pos::new(0, 0));

    for _ in 0..20 {
        app.apply(InputAction::Move(Direction::Right));
        app.apply(InputAction::Move(Direction::Down));
    }
    assert_eq!(app.cursor(), Pos::new(7, 7));
    assert_eq!(app.hud().cursor, Some(Pos::new(7, 7)));
}

#[test]
fn activate_selects_the_cursor_cell() {
    let mut app = App::new(Settings::default(), 7);
    app.apply(InputAction::Move(Direction::Down));
    app.apply(InputAction::Activate);
    assert_eq!(app.game().selected(), Some(Pos::new(1, 0)));

    app.apply(InputAction::Activate);
    assert_eq!(app.game().selected(), None);
}

#[test]
fn click_moves_cursor_and_swaps() {
    let mut app = App::new(Settings::default(), 7);
    app.apply(InputAction::Click(Pos::new(3, 3)));
    assert_eq!(app.cursor(), Pos::new(3, 3));
    app.apply(InputAction::Click(Pos::new(3, 4)));
    assert!(app.game().is_processing());

    for _ in 0..1_000 {
        if !app.game().is_processing() {
            break;
        }
        app.tick(TICK_MS);
    }
    assert!(!app.game().is_processing());

    // Off-board clicks leave the cursor alone.
    app.apply(InputAction::Click(Pos::new(20, 20)));
    assert_eq!(app.cursor(), Pos::new(3, 4));
}

#[test]
fn difficulty_applies_on_restart() {
    let mut app = App::new(Settings::default(), 7);
    app.apply(InputAction::Difficulty(3));
    assert_eq!(app.next_difficulty(), 3);
    assert_eq!(app.game().settings().difficulty, 2);

    app.apply(InputAction::Difficulty(9));
    assert_eq!(app.next_difficulty(), 3);

    app.apply(InputAction::Restart);
    assert_eq!(app.game().settings().difficulty, 3);
    assert_eq!(app.game().episode_id(), 1);
}

#[test]
fn cli_defaults() {
    let config = parse_run_args(&args(&["--seed", "5"])).unwrap().unwrap();
    assert_eq!(config.settings, Settings::default());
    assert_eq!(config.seed, 5);
    assert_eq!(config.log, None);
}

#[test]
fn cli_flags_override_config_file() {
    let path = std::env::temp_dir().join(format!("tui-gems-cli-{}.json", std::process::id()));
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(br#"{ "difficulty": 1, "fall_speed": 5, "board_size": 10 }"#)
        .unwrap();
    drop(f);

    let config = parse_run_args(&args(&[
        "--difficulty",
        "3",
        "--config",
        path.to_str().unwrap(),
        "--log",
        "/tmp/gems.log",
    ]))
    .unwrap()
    .unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.settings.difficulty, 3);
    assert_eq!(config.settings.fall_speed, 5);
    assert_eq!(config.settings.board_size, 10);
    assert_eq!(config.log.as_deref(), Some(std::path::Path::new("/tmp/gems.log")));
}

#[test]
fn cli_rejects_bad_input() {
    assert!(parse_run_args(&args(&["--difficulty", "4"])).is_err());
    assert!(parse_run_args(&args(&["--fall-speed", "fast"])).is_err());
    assert!(parse_run_args(&args(&["--size"])).is_err());
    assert!(parse_run_args(&args(&["--bogus", "1"])).is_err());
    assert!(parse_run_args(&args(&["--config", "/nonexistent/gems.json"])).is_err());
    assert!(parse_run_args(&args(&["--help"])).unwrap().is_none());
}

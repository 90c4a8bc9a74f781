//! Command-line arguments for the terminal runner.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};

use crate::core::Settings;

pub const USAGE: &str = "\
usage: tui-gems [options]

  --difficulty N       1 (5 gem types) .. 3 (7 gem types)
  --disappear-speed N  1 (very slow) .. 5 (very fast)
  --fall-speed N       1 (very slow) .. 5 (very fast)
  --size N             board edge, 3 .. 16
  --seed N             gem generator seed
  --config PATH        JSON settings file; flags override it
  --log PATH           write structured logs to PATH
  -h, --help           show this help
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub settings: Settings,
    pub seed: u32,
    pub log: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct Overrides {
    difficulty: Option<u8>,
    disappear_speed: Option<u8>,
    fall_speed: Option<u8>,
    size: Option<u8>,
}

/// Parse runner arguments (without the program name).
///
/// Returns `Ok(None)` when help was requested. A `--config` file is loaded
/// first and the other flags override it, whatever their order.
pub fn parse_run_args(args: &[String]) -> Result<Option<RunConfig>> {
    let mut config_path: Option<PathBuf> = None;
    let mut seed: Option<u32> = None;
    let mut log: Option<PathBuf> = None;
    let mut o = Overrides::default();

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        if flag == "-h" || flag == "--help" {
            return Ok(None);
        }
        i += 1;
        let v = args
            .get(i)
            .ok_or_else(|| anyhow!("missing value for {}", flag))?;
        match flag {
            "--difficulty" => o.difficulty = Some(parse_u8(flag, v)?),
            "--disappear-speed" => o.disappear_speed = Some(parse_u8(flag, v)?),
            "--fall-speed" => o.fall_speed = Some(parse_u8(flag, v)?),
            "--size" => o.size = Some(parse_u8(flag, v)?),
            "--seed" => {
                seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                )
            }
            "--config" => config_path = Some(PathBuf::from(v)),
            "--log" => log = Some(PathBuf::from(v)),
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    let mut settings = match &config_path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(v) = o.difficulty {
        settings.difficulty = v;
    }
    if let Some(v) = o.disappear_speed {
        settings.disappear_speed = v;
    }
    if let Some(v) = o.fall_speed {
        settings.fall_speed = v;
    }
    if let Some(v) = o.size {
        settings.board_size = v;
    }
    let settings = settings.validate()?;

    Ok(Some(RunConfig {
        settings,
        seed: seed.unwrap_or_else(clock_seed),
        log,
    }))
}

fn parse_u8(flag: &str, v: &str) -> Result<u8> {
    v.parse::<u8>()
        .map_err(|_| anyhow!("invalid {} value: {}", flag, v))
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

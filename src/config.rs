/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// The ladder-free "classic" variant is plain configuration:
///   [physics] ladders = false, speed = 2.0

use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::ladder::LadderCatalog;
use crate::domain::player::PlayerTuning;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PlayerTuning,
    pub ladders_enabled: bool,
    pub spawn: (f64, f64),
    pub ladder_tiles: LadderTiles,
    pub map_path: PathBuf,
    pub tick_rate_ms: u64,
    pub gamepad: GamepadConfig,
}

#[derive(Clone, Debug)]
pub struct LadderTiles {
    pub top: Vec<i32>,
    pub middle: Vec<i32>,
    pub bottom: Vec<i32>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub jump: Vec<String>,
    pub fullscreen: Vec<String>,
}

impl GameConfig {
    pub fn ladder_catalog(&self) -> LadderCatalog {
        LadderCatalog::new(
            self.ladder_tiles.top.clone(),
            self.ladder_tiles.middle.clone(),
            self.ladder_tiles.bottom.clone(),
        )
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    spawn: TomlSpawn,
    #[serde(default)]
    ladder_tiles: TomlLadderTiles,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    gamepad: TomlGamepad,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_speed")]
    speed: f64,
    #[serde(default = "default_jump_speed")]
    jump_speed: f64,
    #[serde(default = "default_gravity")]
    gravity: f64,
    #[serde(default = "default_center_threshold")]
    ladder_center_threshold: f64,
    #[serde(default = "default_ladders")]
    ladders: bool,
}

#[derive(Deserialize, Debug)]
struct TomlSpawn {
    #[serde(default = "default_spawn_x")]
    x: f64,
    #[serde(default = "default_spawn_y")]
    y: f64,
}

#[derive(Deserialize, Debug)]
struct TomlLadderTiles {
    #[serde(default = "default_ladder_top")]
    top: Vec<i32>,
    #[serde(default = "default_ladder_middle")]
    middle: Vec<i32>,
    #[serde(default = "default_ladder_bottom")]
    bottom: Vec<i32>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_map_path")]
    map_path: String,
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_jump")]
    jump: Vec<String>,
    #[serde(default = "default_pad_fullscreen")]
    fullscreen: Vec<String>,
}

// ── Defaults ──

fn default_speed() -> f64 { 1.5 }
fn default_jump_speed() -> f64 { -5.0 }
fn default_gravity() -> f64 { 0.3 }
fn default_center_threshold() -> f64 { 5.0 }
fn default_ladders() -> bool { true }

fn default_spawn_x() -> f64 { 50.0 }
fn default_spawn_y() -> f64 { 100.0 }

fn default_ladder_top() -> Vec<i32> { vec![4] }
fn default_ladder_middle() -> Vec<i32> { vec![24] }
fn default_ladder_bottom() -> Vec<i32> { vec![44] }

fn default_map_path() -> String { "assets/tilemap.json".into() }
fn default_tick_rate() -> u64 { 16 }

fn default_pad_jump() -> Vec<String> { vec!["A".into()] }
fn default_pad_fullscreen() -> Vec<String> { vec!["Y".into()] }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            speed: default_speed(),
            jump_speed: default_jump_speed(),
            gravity: default_gravity(),
            ladder_center_threshold: default_center_threshold(),
            ladders: default_ladders(),
        }
    }
}

impl Default for TomlSpawn {
    fn default() -> Self {
        TomlSpawn { x: default_spawn_x(), y: default_spawn_y() }
    }
}

impl Default for TomlLadderTiles {
    fn default() -> Self {
        TomlLadderTiles {
            top: default_ladder_top(),
            middle: default_ladder_middle(),
            bottom: default_ladder_bottom(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            map_path: default_map_path(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            jump: default_pad_jump(),
            fullscreen: default_pad_fullscreen(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);
        Self::from_toml(toml_cfg, &search_dirs)
    }

    fn from_toml(cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let map_path = resolve_path(&cfg.general.map_path, search_dirs);
        GameConfig {
            physics: PlayerTuning {
                speed: cfg.physics.speed,
                jump_speed: cfg.physics.jump_speed,
                gravity: cfg.physics.gravity,
                ladder_center_threshold: cfg.physics.ladder_center_threshold,
            },
            ladders_enabled: cfg.physics.ladders,
            spawn: (cfg.spawn.x, cfg.spawn.y),
            ladder_tiles: LadderTiles {
                top: cfg.ladder_tiles.top,
                middle: cfg.ladder_tiles.middle,
                bottom: cfg.ladder_tiles.bottom,
            },
            map_path,
            tick_rate_ms: cfg.general.tick_rate_ms,
            gamepad: GamepadConfig {
                jump: cfg.gamepad.jump,
                fullscreen: cfg.gamepad.fullscreen,
            },
        }
    }
}

/// Resolve a possibly-relative path against the candidate directories,
/// preferring the first existing match.
fn resolve_path(raw: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(raw))
        .find(|p| p.exists())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        let cfg = GameConfig::from_toml(cfg, &[]);
        assert_eq!(cfg.physics.speed, 1.5);
        assert_eq!(cfg.physics.jump_speed, -5.0);
        assert_eq!(cfg.physics.gravity, 0.3);
        assert!(cfg.ladders_enabled);
        assert_eq!(cfg.spawn, (50.0, 100.0));
        assert_eq!(cfg.tick_rate_ms, 16);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let text = r#"
            [physics]
            speed = 2.0
            ladders = false
        "#;
        let cfg: TomlConfig = toml::from_str(text).unwrap();
        let cfg = GameConfig::from_toml(cfg, &[]);
        assert_eq!(cfg.physics.speed, 2.0);
        assert!(!cfg.ladders_enabled);
        // Untouched sections keep their defaults.
        assert_eq!(cfg.physics.gravity, 0.3);
        assert_eq!(cfg.ladder_tiles.bottom, vec![44]);
    }

    #[test]
    fn catalog_built_from_config_lists() {
        let text = r#"
            [ladder_tiles]
            top = [10, 11]
            middle = [12]
            bottom = [13]
        "#;
        let cfg: TomlConfig = toml::from_str(text).unwrap();
        let cfg = GameConfig::from_toml(cfg, &[]);
        let cat = cfg.ladder_catalog();
        use crate::domain::ladder::LadderKind;
        assert_eq!(cat.kind_of(11), Some(LadderKind::Top));
        assert_eq!(cat.kind_of(12), Some(LadderKind::Middle));
        assert_eq!(cat.kind_of(13), Some(LadderKind::Bottom));
        assert_eq!(cat.kind_of(44), None);
    }
}

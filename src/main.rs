/// Entry point and fixed-tick loop.
///
/// The binary is a headless harness around the simulation core: it loads
/// the config and tilemap, samples keyboard/gamepad intent once per tick,
/// steps the world, and surfaces simulation events through the log. A
/// renderer is an external collaborator; it would read the committed
/// player state between ticks.

mod config;
mod domain;
mod sim;
mod ui;

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    KeyCode, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement};

use config::GameConfig;
use domain::player::FrameInput;
use sim::step;
use sim::tilemap::TileMap;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::InputState;

const FRAME_SLEEP: Duration = Duration::from_millis(2);

// ── Key bindings ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Char(' ')];
const KEYS_FULLSCREEN: &[KeyCode] = &[KeyCode::Char('f'), KeyCode::Char('F')];

fn main() {
    env_logger::init();
    let config = GameConfig::load();

    match run(&config) {
        Ok(world) => {
            println!(
                "Session over after {} ticks; player at ({:.1}, {:.1}).",
                world.tick, world.player.x, world.player.y
            );
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run(config: &GameConfig) -> Result<WorldState> {
    let map = TileMap::load(&config.map_path)?;
    log::info!(
        "loaded map {} ({}x{} tiles, {} layers)",
        config.map_path.display(), map.width, map.height, map.layers.len()
    );

    let mut world = WorldState::new(map, config);

    let term = TerminalGuard::enter().context("terminal init")?;
    let mut kb = InputState::new();
    kb.honor_release = term.enhanced;
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    if gp.connected {
        log::info!("gamepad connected");
    }

    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let mut last_tick = Instant::now();

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() || kb.any_pressed(&[KeyCode::Esc, KeyCode::Char('q')]) {
            break;
        }

        if last_tick.elapsed() >= tick_rate {
            let input = sample_input(&kb, &gp);
            let events = step::step(&mut world, input);
            for event in &events {
                log::info!("{event:?}");
            }
            last_tick = Instant::now();
        }

        std::thread::sleep(FRAME_SLEEP);
    }

    drop(term);
    Ok(world)
}

fn sample_input(kb: &InputState, gp: &GamepadState) -> FrameInput {
    FrameInput {
        left: kb.any_held(KEYS_LEFT) || gp.left_held(),
        right: kb.any_held(KEYS_RIGHT) || gp.right_held(),
        up: kb.any_held(KEYS_UP) || gp.up_held(),
        down: kb.any_held(KEYS_DOWN) || gp.down_held(),
        jump: kb.any_pressed(KEYS_JUMP) || gp.jump_pressed(),
        toggle_fullscreen: kb.any_pressed(KEYS_FULLSCREEN) || gp.fullscreen_pressed(),
    }
}

/// Raw-mode guard: keyboard enhancement (for Release events) is pushed on
/// entry when supported and popped with raw mode on drop, including on the
/// error path.
struct TerminalGuard {
    enhanced: bool,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(TerminalGuard { enhanced })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
    }
}

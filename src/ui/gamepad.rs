/// Gamepad input tracker using gilrs.
///
/// Button mapping comes from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick  →  Movement (held)
///   A                   →  Jump (edge)
///   Y                   →  Fullscreen toggle (edge)
///
/// Without the `gamepad` feature this compiles to an inert stub so the
/// calling code needs no cfg switches.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Btn {
    A, // South
    B, // East
    X, // West
    Y, // North
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; 8],

    dpad_up: BtnState,
    dpad_down: BtnState,
    dpad_left: BtnState,
    dpad_right: BtnState,

    stick_x: f32,
    stick_y: f32,

    jump_btns: Vec<Btn>,
    fullscreen_btns: Vec<Btn>,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(_) => (None, false),
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); 8],
            dpad_up: BtnState::default(),
            dpad_down: BtnState::default(),
            dpad_left: BtnState::default(),
            dpad_right: BtnState::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            jump_btns: vec![Btn::A],
            fullscreen_btns: vec![Btn::Y],
            connected,
        }
    }

    /// Load button mapping from config. Empty or unparseable lists keep
    /// the defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let jump = parse_list(&cfg.jump);
        if !jump.is_empty() {
            self.jump_btns = jump;
        }
        let fs = parse_list(&cfg.fullscreen);
        if !fs.is_empty() {
            self.fullscreen_btns = fs;
        }
    }

    pub fn update(&mut self) {
        self.clear_just_pressed();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true, true);
                }
                EventType::ButtonReleased(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, false, false);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool, just_pressed: bool) {
        let state = match gilrs_btn {
            Button::DPadUp => &mut self.dpad_up,
            Button::DPadDown => &mut self.dpad_down,
            Button::DPadLeft => &mut self.dpad_left,
            Button::DPadRight => &mut self.dpad_right,
            _ => match Btn::from_gilrs(gilrs_btn) {
                Some(btn) => &mut self.buttons[btn as usize],
                None => return,
            },
        };
        state.held = held;
        if just_pressed {
            state.just_pressed = true;
        }
    }

    // ── Action queries ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn jump_pressed(&self) -> bool {
        self.any_just_pressed(&self.jump_btns)
    }

    pub fn fullscreen_pressed(&self) -> bool {
        self.any_just_pressed(&self.fullscreen_btns)
    }

    // Movement (continuous, held). Stick Y is positive-up in gilrs.
    pub fn up_held(&self) -> bool {
        self.dpad_up.held || self.stick_y > STICK_DEADZONE
    }
    pub fn down_held(&self) -> bool {
        self.dpad_down.held || self.stick_y < -STICK_DEADZONE
    }
    pub fn left_held(&self) -> bool {
        self.dpad_left.held || self.stick_x < -STICK_DEADZONE
    }
    pub fn right_held(&self) -> bool {
        self.dpad_right.held || self.stick_x > STICK_DEADZONE
    }

    // ── Internal ──

    fn clear_just_pressed(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }
        self.dpad_up.just_pressed = false;
        self.dpad_down.just_pressed = false;
        self.dpad_left.just_pressed = false;
        self.dpad_right.just_pressed = false;
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        for b in &mut self.buttons {
            *b = BtnState::default();
        }
        self.dpad_up = BtnState::default();
        self.dpad_down = BtnState::default();
        self.dpad_left = BtnState::default();
        self.dpad_right = BtnState::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

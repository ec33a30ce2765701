/// Keyboard input sampler.
///
/// Bridges crossterm's event stream to the simulation's per-tick intent
/// booleans:
///   - held keys (level-sensitive, for movement)
///   - fresh presses (edge-triggered, for jump and fullscreen)
///
/// Uses crossterm's keyboard enhancement for Release events when the
/// terminal supports it; otherwise a key counts as held until no
/// Press/Repeat has been seen for a short timeout.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, poll};

/// Without Release events, a key is considered released after this long
/// with no Press/Repeat.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

pub struct InputState {
    /// Timestamp of the last Press/Repeat event per key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from released to held during the latest
    /// `drain_events` call.
    fresh_presses: Vec<KeyCode>,

    /// Ctrl-C seen during the latest drain.
    ctrl_c: bool,

    /// Honor Release events. Only set when keyboard enhancement is
    /// confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            ctrl_c: false,
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call once per frame, before the simulation tick.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else { continue };

            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            {
                self.ctrl_c = true;
            }

            match key.kind {
                KeyEventKind::Release if self.honor_release => {
                    self.last_active.remove(&key.code);
                }
                KeyEventKind::Release => {
                    // No enhancement: rely on timeout-based expiry.
                }
                _ => {
                    let was_held = self.held_inner(key.code);
                    self.last_active.insert(key.code, Instant::now());
                    if !was_held {
                        self.fresh_presses.push(key.code);
                    }
                }
            }
        }

        // Expire keys that timed out (terminals without Release events).
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    /// Is this key currently held? (level-sensitive)
    pub fn is_held(&self, code: KeyCode) -> bool {
        self.held_inner(code)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was this key freshly pressed this frame? (edge-triggered)
    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.fresh_presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }

    // ── Internal ──

    fn held_inner(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }
}

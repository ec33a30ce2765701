/// Player state machine.
///
/// One `update` per simulation tick applies input, ladder transitions,
/// gravity, and axis-separated collision in a fixed order. The order is
/// load-bearing: later steps read the mode set by earlier ones, so
/// reordering changes behavior (e.g. the ladder-top exit must run before
/// ladder entry, or the exit would immediately re-attach).
///
/// ## Transition order
///   1. Ladder detection (skipped entirely without a ladder layer)
///   2. Ladder-top exit
///   3. Ladder entry
///   4. Jump off ladder (edge-triggered)
///   5. Horizontal intent (breaks ladder attachment)
///   6. Vertical control: climb speed on ladder, gravity otherwise
///   7. Grounded jump (edge-triggered)
///   8. Axis-separated move
///   9. Post-move ladder release
///  10. Ladder bottom clamp
///  11. Screen-top clamp

use super::ladder::{self, LadderCatalog, LadderKind};
use super::physics::{self, BoundingBox};
use super::tile::{GridView, TILE_SIZE};

/// One tick's input intent, sampled once by the input collaborator.
/// Directions are level-sensitive (true while held); `jump` and
/// `toggle_fullscreen` are edge-triggered (true only on the press tick).
#[derive(Clone, Copy, Default, Debug)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub toggle_fullscreen: bool,
}

/// Control mode. Exactly one holds at a time; `jumping` tracks an active
/// jump arc while airborne and is cleared on landing.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Mode {
    Grounded,
    Airborne { jumping: bool },
    OnLadder { kind: LadderKind },
}

impl Mode {
    #[inline]
    pub fn on_ground(self) -> bool {
        matches!(self, Mode::Grounded)
    }

    #[inline]
    pub fn on_ladder(self) -> bool {
        matches!(self, Mode::OnLadder { .. })
    }

    #[allow(dead_code)]
    #[inline]
    pub fn jumping(self) -> bool {
        matches!(self, Mode::Airborne { jumping: true })
    }
}

/// Movement tunables. Defaults are the ladder profile; `classic()` is the
/// ladder-free variant with its faster run speed.
#[derive(Clone, Copy, Debug)]
pub struct PlayerTuning {
    /// Run and climb speed, px/frame.
    pub speed: f64,
    /// Initial jump velocity, px/frame (negative = up).
    pub jump_speed: f64,
    /// Per-frame downward acceleration, px/frame².
    pub gravity: f64,
    /// Ladder centering tolerance, px.
    pub ladder_center_threshold: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        PlayerTuning {
            speed: 1.5,
            jump_speed: -5.0,
            gravity: 0.3,
            ladder_center_threshold: ladder::CENTER_THRESHOLD,
        }
    }
}

impl PlayerTuning {
    /// The ladder-free variant's tuning.
    #[allow(dead_code)]
    pub fn classic() -> Self {
        PlayerTuning { speed: 2.0, ..Default::default() }
    }
}

/// The player entity: position and velocity in pixels (top-left anchored),
/// plus the current control mode. Mutated only by `update`, once per tick.
#[derive(Clone, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub mode: Mode,
}

impl Player {
    pub fn new(x: f64, y: f64) -> Self {
        Player {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: TILE_SIZE as f64,
            height: TILE_SIZE as f64,
            mode: Mode::Airborne { jumping: false },
        }
    }

    /// Current bounding box.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds_at(self.x, self.y)
    }

    /// Bounding box at a candidate position.
    #[inline]
    fn bounds_at(&self, x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, self.width, self.height)
    }

    /// Advance the player by one tick.
    ///
    /// `collision` is the solid layer; `ladders` the ladder layer. Either
    /// may be absent, in which case the corresponding logic degrades to a
    /// no-op (no obstruction / no ladder). `world_width` bounds horizontal
    /// movement in pixels.
    pub fn update(
        &mut self,
        input: FrameInput,
        collision: Option<GridView<'_>>,
        ladders: Option<GridView<'_>>,
        catalog: &LadderCatalog,
        tuning: &PlayerTuning,
        world_width: f64,
    ) {
        let detect = |bounds: &BoundingBox, attached: bool| {
            ladders.and_then(|g| {
                ladder::check_ladder(bounds, attached, g, catalog, tuning.ladder_center_threshold)
            })
        };

        // 1. Ladder detection at the pre-move position.
        let hit = detect(&self.bounds(), self.mode.on_ladder());

        // 2. Ladder-top exit: climbing up with the head at or above the top
        // tile's upper edge steps off into the air.
        if self.mode.on_ladder() {
            if let Some(hit) = hit {
                if hit.kind == LadderKind::Top && self.vy < 0.0 && self.y <= hit.top_edge() {
                    self.mode = Mode::Airborne { jumping: false };
                }
            }
        }

        // 3. Ladder entry. Falling or standing into a ladder always grabs
        // it (and kills the fall); rising into one grabs only on upward
        // intent, keeping the climb speed.
        if !self.mode.on_ladder() {
            if let Some(hit) = hit {
                if self.vy >= 0.0 {
                    self.mode = Mode::OnLadder { kind: hit.kind };
                    self.vy = 0.0;
                } else if input.up {
                    self.mode = Mode::OnLadder { kind: hit.kind };
                    self.vy = -tuning.speed;
                }
            }
        }

        // 4. Jump off the ladder.
        if self.mode.on_ladder() && input.jump {
            self.vy = tuning.jump_speed;
            self.mode = Mode::Airborne { jumping: true };
        }

        // 5. Horizontal intent. Any sideways input breaks ladder attachment.
        if input.left {
            self.vx = -tuning.speed;
        } else if input.right {
            self.vx = tuning.speed;
        } else {
            self.vx = 0.0;
        }
        if (input.left || input.right) && self.mode.on_ladder() {
            self.mode = Mode::Airborne { jumping: false };
        }

        // 6. Vertical control. A ladder overrides gravity completely; an
        // idle climber does not drift.
        if self.mode.on_ladder() {
            if input.up {
                self.vy = -tuning.speed;
            } else if input.down {
                self.vy = tuning.speed;
            } else {
                self.vy = 0.0;
            }
        } else {
            self.vy += tuning.gravity;
        }

        // 7. Grounded jump.
        if self.mode.on_ground() && input.jump {
            self.vy = tuning.jump_speed;
            self.mode = Mode::Airborne { jumping: true };
        }

        // 8. Axis-separated move.
        self.resolve_move(collision, world_width);

        // 9. Post-move ladder release: drifted off the ladder during the
        // move (or the ladder ended).
        if self.mode.on_ladder() {
            match detect(&self.bounds(), true) {
                Some(hit) => self.mode = Mode::OnLadder { kind: hit.kind },
                None => self.mode = Mode::Airborne { jumping: false },
            }
        }

        // 10. A climber cannot descend below the ladder layer's bottom edge.
        if self.mode.on_ladder() {
            if let Some(g) = ladders {
                let floor = g.pixel_height();
                if self.y + self.height > floor {
                    self.y = floor - self.height;
                    self.vy = 0.0;
                }
            }
        }

        // 11. Screen-top clamp.
        if self.y < 0.0 {
            self.y = 0.0;
            if self.vy < 0.0 {
                self.vy = 0.0;
            }
        }
    }

    /// Resolve one frame of motion, horizontal axis first. Each axis either
    /// commits or cancels its velocity independently, so a diagonal move
    /// into a corner slides along one axis instead of stopping dead.
    fn resolve_move(&mut self, collision: Option<GridView<'_>>, world_width: f64) {
        let blocked = |bounds: &BoundingBox, vy: f64| {
            collision.is_some_and(|g| physics::collides(bounds, vy, g))
        };

        let new_x = self.x + self.vx;
        if blocked(&self.bounds_at(new_x, self.y), self.vy) {
            self.vx = 0.0;
        } else {
            self.x = new_x.clamp(0.0, world_width - self.width);
        }

        let new_y = self.y + self.vy;
        if blocked(&self.bounds_at(self.x, new_y), self.vy) {
            if self.vy > 0.0 {
                // Landed.
                self.mode = Mode::Grounded;
            }
            self.vy = 0.0;
        } else {
            self.y = new_y;
            if self.vy > 0.0 && self.mode.on_ground() {
                // Stepped or fell off the ground.
                self.mode = Mode::Airborne { jumping: false };
            }
        }
    }
}

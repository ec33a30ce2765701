/// The step function: advances the world by one tick.
///
/// Per-tick order:
///   1. Session toggles (fullscreen)
///   2. Player update (ladder transitions, input, gravity, collision)
///   3. Transition events for the presentation layer
///
/// The player update is a single synchronous call; nothing outside this
/// function mutates the world, so readers between ticks always see a
/// complete frame.

use crate::domain::player::{FrameInput, Mode, Player};
use crate::sim::event::GameEvent;
use crate::sim::world::WorldState;
use crate::sim::tilemap::{COLLISION_LAYER, LADDER_LAYER};

pub fn step(world: &mut WorldState, input: FrameInput) -> Vec<GameEvent> {
    world.tick += 1;
    let mut events: Vec<GameEvent> = Vec::new();

    log::trace!(
        "tick {} input: left={} right={} up={} down={} jump={}",
        world.tick, input.left, input.right, input.up, input.down, input.jump
    );

    if input.toggle_fullscreen {
        world.fullscreen = !world.fullscreen;
        events.push(GameEvent::FullscreenToggled { on: world.fullscreen });
    }

    let before = world.player.mode;

    {
        let WorldState { map, player, catalog, tuning, ladders_enabled, .. } = world;
        let collision = map.layer(COLLISION_LAYER).map(|l| l.grid());
        let ladders = if *ladders_enabled {
            map.layer(LADDER_LAYER).map(|l| l.grid())
        } else {
            None
        };
        player.update(input, collision, ladders, catalog, tuning, map.pixel_width());
    }

    push_transition_events(before, &world.player, &mut events);

    log::trace!(
        "tick {} resolved: pos=({:.2}, {:.2}) vel=({:.2}, {:.2}) mode={:?}",
        world.tick, world.player.x, world.player.y, world.player.vx, world.player.vy,
        world.player.mode
    );

    events
}

fn push_transition_events(before: Mode, player: &Player, events: &mut Vec<GameEvent>) {
    let after = player.mode;
    match (before, after) {
        // Staying attached (possibly on a different rung) is not a transition.
        (Mode::OnLadder { .. }, Mode::OnLadder { .. }) => {}
        (a, b) if a == b => {}
        (_, Mode::Grounded) => events.push(GameEvent::Landed { x: player.x, y: player.y }),
        (_, Mode::OnLadder { kind }) => events.push(GameEvent::LadderEntered { kind }),
        (_, Mode::Airborne { jumping: true }) => events.push(GameEvent::Jumped),
        (Mode::OnLadder { .. }, Mode::Airborne { jumping: false }) => {
            events.push(GameEvent::LadderExited)
        }
        (Mode::Grounded, Mode::Airborne { jumping: false }) => {
            events.push(GameEvent::FallStarted)
        }
        _ => {}
    }

    if before != after {
        log::debug!(
            "mode {before:?} -> {after:?} at ({:.2}, {:.2})",
            player.x, player.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ladder::{LadderCatalog, LadderKind};
    use crate::domain::player::PlayerTuning;
    use crate::sim::tilemap::TileMap;

    /// 4x4 map: solid floor on row 3, one ladder-bottom tile at (1, 2).
    fn test_map() -> TileMap {
        TileMap::from_json(
            r#"{
                "width": 4, "height": 4,
                "tilewidth": 16, "tileheight": 16,
                "layers": [
                    {"name": "Collision", "type": "tilelayer",
                     "width": 4, "height": 4,
                     "data": [0,0,0,0, 0,0,0,0, 0,0,0,0, 1,1,1,1]},
                    {"name": "Ladders", "type": "tilelayer",
                     "width": 4, "height": 4,
                     "data": [0,0,0,0, 0,0,0,0, 0,44,0,0, 0,0,0,0]}
                ]
            }"#,
        )
        .expect("test map is valid")
    }

    fn test_world(x: f64, y: f64) -> WorldState {
        WorldState {
            map: test_map(),
            player: Player::new(x, y),
            catalog: LadderCatalog::default(),
            tuning: PlayerTuning::default(),
            ladders_enabled: true,
            fullscreen: false,
            tick: 0,
        }
    }

    #[test]
    fn tick_counter_advances() {
        let mut w = test_world(40.0, 0.0);
        step(&mut w, FrameInput::default());
        step(&mut w, FrameInput::default());
        assert_eq!(w.tick, 2);
    }

    #[test]
    fn falling_emits_a_single_landed_event() {
        let mut w = test_world(40.0, 0.0);
        let mut landed = 0;
        for _ in 0..60 {
            for e in step(&mut w, FrameInput::default()) {
                if matches!(e, GameEvent::Landed { .. }) {
                    landed += 1;
                }
            }
        }
        assert_eq!(landed, 1);
        assert!(w.player.mode.on_ground());
        let feet = w.player.y + w.player.height;
        assert!(feet <= 48.0 && feet > 47.0);
    }

    #[test]
    fn grounded_jump_emits_jumped() {
        let mut w = test_world(40.0, 0.0);
        for _ in 0..60 {
            step(&mut w, FrameInput::default());
        }
        let events = step(&mut w, FrameInput { jump: true, ..FrameInput::default() });
        assert!(events.contains(&GameEvent::Jumped));
        assert!(w.player.mode.jumping());
    }

    #[test]
    fn ladder_entry_emits_event() {
        let mut w = test_world(16.0, 18.0);
        let events = step(&mut w, FrameInput::default());
        assert!(events.contains(&GameEvent::LadderEntered { kind: LadderKind::Bottom }));
        assert!(w.player.mode.on_ladder());
    }

    #[test]
    fn disabled_ladders_are_invisible() {
        let mut w = test_world(16.0, 18.0);
        w.ladders_enabled = false;
        let events = step(&mut w, FrameInput::default());
        assert!(events.is_empty());
        assert!(!w.player.mode.on_ladder());
    }

    #[test]
    fn fullscreen_toggle_round_trips() {
        let mut w = test_world(40.0, 0.0);
        let toggle = FrameInput { toggle_fullscreen: true, ..FrameInput::default() };
        let events = step(&mut w, toggle);
        assert!(events.contains(&GameEvent::FullscreenToggled { on: true }));
        assert!(w.fullscreen);
        let events = step(&mut w, toggle);
        assert!(events.contains(&GameEvent::FullscreenToggled { on: false }));
        assert!(!w.fullscreen);
    }
}

/// WorldState: everything one running session owns.
///
/// The tile map is immutable after load and only ever borrowed read-only;
/// the player is mutated exclusively by `step`, once per tick, so a
/// renderer reading between ticks always observes a fully committed frame.
///
/// Session flags that were process-wide globals in older engines
/// (fullscreen, in particular) live here explicitly.

use crate::config::GameConfig;
use crate::domain::ladder::LadderCatalog;
use crate::domain::player::{Player, PlayerTuning};
use crate::domain::tile::GridView;
use crate::sim::tilemap::{TileMap, COLLISION_LAYER, LADDER_LAYER};

pub struct WorldState {
    /// Level data. Never mutated after load.
    pub map: TileMap,
    pub player: Player,
    pub catalog: LadderCatalog,
    pub tuning: PlayerTuning,
    /// Config switch for the ladder-free variant: when false, the ladder
    /// layer is never consulted even if the map carries one.
    pub ladders_enabled: bool,
    pub fullscreen: bool,
    pub tick: u64,
}

impl WorldState {
    pub fn new(map: TileMap, config: &GameConfig) -> Self {
        WorldState {
            map,
            player: Player::new(config.spawn.0, config.spawn.1),
            catalog: config.ladder_catalog(),
            tuning: config.physics,
            ladders_enabled: config.ladders_enabled,
            fullscreen: false,
            tick: 0,
        }
    }

}

// ── Layer queries ──
//
// `step` splits borrows and looks layers up itself; these are for readers
// that hold the whole world (a renderer collaborator, tooling).

#[allow(dead_code)]
impl WorldState {
    /// Solid layer view, if the map has one.
    pub fn collision_grid(&self) -> Option<GridView<'_>> {
        self.map.layer(COLLISION_LAYER).map(|l| l.grid())
    }

    /// Ladder layer view; `None` when absent or disabled, which switches
    /// the whole ladder feature off.
    pub fn ladder_grid(&self) -> Option<GridView<'_>> {
        if !self.ladders_enabled {
            return None;
        }
        self.map.layer(LADDER_LAYER).map(|l| l.grid())
    }
}

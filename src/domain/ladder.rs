/// Ladder detection.
///
/// A ladder tile only counts when the player is roughly centered on it:
/// the player's horizontal center must lie within a small tolerance of the
/// tile's horizontal center. This stops a glancing one-pixel overlap from
/// grabbing the ladder while running past it.
///
/// Two scan phases, selected by attachment state:
///   1. **Entry** — when not attached, only the tile row under the player's
///      bottom edge is examined. A ladder is grabbed feet-first.
///   2. **Continuation** — while attached, every row the player spans is
///      examined top to bottom, so a mid-climb player stays attached after
///      the feet leave the entry row.

use super::physics::BoundingBox;
use super::tile::{tile_center_x, GridView, TILE_SIZE};

/// Default centering tolerance in pixels.
pub const CENTER_THRESHOLD: f64 = 5.0;

/// Sub-classification of a ladder tile.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LadderKind {
    /// Exit point at the ladder's top.
    Top,
    Middle,
    /// Entry point at the ladder's base.
    Bottom,
}

/// Maps raw tile indices to ladder sub-types. Built once at startup from
/// configuration and immutable afterwards.
#[derive(Clone, Debug)]
pub struct LadderCatalog {
    top: Vec<i32>,
    middle: Vec<i32>,
    bottom: Vec<i32>,
}

impl LadderCatalog {
    pub fn new(top: Vec<i32>, middle: Vec<i32>, bottom: Vec<i32>) -> Self {
        LadderCatalog { top, middle, bottom }
    }

    /// Ladder sub-type for a raw tile index, if the index is a ladder at all.
    pub fn kind_of(&self, tile: i32) -> Option<LadderKind> {
        if self.top.contains(&tile) {
            Some(LadderKind::Top)
        } else if self.middle.contains(&tile) {
            Some(LadderKind::Middle)
        } else if self.bottom.contains(&tile) {
            Some(LadderKind::Bottom)
        } else {
            None
        }
    }
}

impl Default for LadderCatalog {
    fn default() -> Self {
        // Matches the stock tilesheet layout; override in config.toml for
        // other sheets.
        LadderCatalog {
            top: vec![4],
            middle: vec![24],
            bottom: vec![44],
        }
    }
}

/// A qualifying ladder tile: its sub-type and tile coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LadderHit {
    pub kind: LadderKind,
    pub tx: i32,
    pub ty: i32,
}

impl LadderHit {
    /// Pixel Y of this tile's top edge, used by the ladder-top exit check.
    #[inline]
    pub fn top_edge(&self) -> f64 {
        (self.ty * TILE_SIZE) as f64
    }
}

/// Scan for a ladder tile the player qualifies for.
///
/// `attached` selects the phase: while already on a ladder the whole body is
/// scanned top to bottom (continuation), otherwise only the bottom-edge row
/// (entry). Returns the first qualifying hit.
pub fn check_ladder(
    bounds: &BoundingBox,
    attached: bool,
    grid: GridView<'_>,
    catalog: &LadderCatalog,
    threshold: f64,
) -> Option<LadderHit> {
    let (left, right) = bounds.tile_cols();
    let (top, bottom) = bounds.tile_rows();
    let center = bounds.center_x();

    let qualify = |tx: i32, ty: i32| -> Option<LadderHit> {
        let kind = catalog.kind_of(grid.tile_at(tx, ty)?)?;
        if (center - tile_center_x(tx)).abs() <= threshold {
            Some(LadderHit { kind, tx, ty })
        } else {
            None
        }
    };

    let rows = if attached { top..=bottom } else { bottom..=bottom };
    for ty in rows {
        for tx in left..=right {
            if let Some(hit) = qualify(tx, ty) {
                return Some(hit);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i32 = 4;
    const M: i32 = 24;
    const B: i32 = 44;

    /// 'T'/'M'/'B' place catalog tiles, anything else is empty.
    fn ladder_data(rows: &[&str]) -> (Vec<i32>, i32, i32) {
        let h = rows.len() as i32;
        let w = rows[0].len() as i32;
        let mut data = vec![0; (w * h) as usize];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                data[y * w as usize + x] = match ch {
                    'T' => T,
                    'M' => M,
                    'B' => B,
                    _ => 0,
                };
            }
        }
        (data, w, h)
    }

    fn player_at(x: f64, y: f64) -> BoundingBox {
        BoundingBox::new(x, y, 16.0, 16.0)
    }

    #[test]
    fn catalog_classifies_indices() {
        let c = LadderCatalog::default();
        assert_eq!(c.kind_of(T), Some(LadderKind::Top));
        assert_eq!(c.kind_of(M), Some(LadderKind::Middle));
        assert_eq!(c.kind_of(B), Some(LadderKind::Bottom));
        assert_eq!(c.kind_of(0), None);
        assert_eq!(c.kind_of(99), None);
    }

    #[test]
    fn centered_player_qualifies_at_feet() {
        let (data, w, h) = ladder_data(&[" T ", " M ", " B "]);
        let g = GridView { width: w, height: h, data: &data };
        let c = LadderCatalog::default();
        // Feet in row 2 (the bottom tile), centered on column 1.
        let hit = check_ladder(&player_at(16.0, 20.0), false, g, &c, CENTER_THRESHOLD);
        assert_eq!(hit, Some(LadderHit { kind: LadderKind::Bottom, tx: 1, ty: 2 }));
    }

    #[test]
    fn off_center_player_does_not_qualify() {
        let (data, w, h) = ladder_data(&[" B "]);
        let g = GridView { width: w, height: h, data: &data };
        let c = LadderCatalog::default();
        // Tile center is 24.0; player center 16+8=24 qualifies, 22+8=30 does not.
        assert!(check_ladder(&player_at(16.0, -16.0), false, g, &c, 5.0).is_some());
        assert!(check_ladder(&player_at(22.0, -16.0), false, g, &c, 5.0).is_none());
        // Exactly on the threshold still qualifies.
        assert!(check_ladder(&player_at(21.0, -16.0), false, g, &c, 5.0).is_some());
    }

    #[test]
    fn entry_scan_ignores_rows_above_feet() {
        let (data, w, h) = ladder_data(&["M", " "]);
        let g = GridView { width: w, height: h, data: &data };
        let c = LadderCatalog::default();
        // Ladder tile overlaps the body but not the bottom-edge row.
        let player = player_at(0.0, 8.0); // rows 0..=1, feet row = 1 (empty)
        assert!(check_ladder(&player, false, g, &c, 5.0).is_none());
        // Attached, the continuation scan sees it.
        assert!(check_ladder(&player, true, g, &c, 5.0).is_some());
    }

    #[test]
    fn continuation_scan_returns_topmost_hit() {
        let (data, w, h) = ladder_data(&["T", "M"]);
        let g = GridView { width: w, height: h, data: &data };
        let c = LadderCatalog::default();
        // Feet row (1) holds the Middle tile, so entry reports Middle.
        let player = player_at(0.0, 0.0);
        let hit = check_ladder(&player, false, g, &c, 5.0).unwrap();
        assert_eq!(hit.kind, LadderKind::Middle);
        // Attached and positioned with an empty feet row, the body scan
        // finds the Top tile first.
        let (data, w, h) = ladder_data(&["T", " "]);
        let g = GridView { width: w, height: h, data: &data };
        let player = player_at(0.0, 8.0);
        let hit = check_ladder(&player, true, g, &c, 5.0).unwrap();
        assert_eq!(hit.kind, LadderKind::Top);
        assert_eq!(hit.top_edge(), 0.0);
    }

    #[test]
    fn missing_grid_region_is_no_ladder() {
        let (data, w, h) = ladder_data(&["B"]);
        let g = GridView { width: w, height: h, data: &data };
        let c = LadderCatalog::default();
        assert!(check_ladder(&player_at(200.0, 200.0), true, g, &c, 5.0).is_none());
    }
}

/// Collision probe: pixel-space overlap queries against a solid tile layer.
///
/// A candidate bounding box covers the inclusive tile range
/// `[x/16, (x+w)/16] × [y/16, (y+h)/16]` (truncating division). Any covered
/// in-bounds tile with a nonzero index blocks, with one directional
/// exception: a box actively rising (`vy < 0`) whose bottom edge extends
/// below a tile's top edge passes upward through that tile. The same tile
/// still blocks falling and resting contact, which is what makes platforms
/// jump-through from underneath and solid from above.
///
/// The probe takes the candidate vertical velocity because the exception is
/// part of the overlap test itself, not of the caller's axis resolution.

use super::tile::{to_tile, GridView, TILE_SIZE};

/// An axis-aligned box in pixel space, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        BoundingBox { x, y, width, height }
    }

    /// Horizontal center, used by the ladder centering test.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Tile column range covered by this box (inclusive).
    #[inline]
    pub fn tile_cols(&self) -> (i32, i32) {
        (to_tile(self.x), to_tile(self.x + self.width))
    }

    /// Tile row range covered by this box (inclusive).
    #[inline]
    pub fn tile_rows(&self) -> (i32, i32) {
        (to_tile(self.y), to_tile(self.y + self.height))
    }
}

/// Does the box at its candidate position overlap a solid tile?
///
/// `vy` is the candidate vertical velocity for this frame. The `vy <= 0`
/// guard around the `vy < 0` test mirrors the one-way platform rule exactly;
/// do not collapse or widen it.
pub fn collides(bounds: &BoundingBox, vy: f64, grid: GridView<'_>) -> bool {
    let (left, right) = bounds.tile_cols();
    let (top, bottom) = bounds.tile_rows();

    for ty in top..=bottom {
        for tx in left..=right {
            let tile = match grid.tile_at(tx, ty) {
                Some(t) => t,
                None => continue,
            };
            if tile == 0 {
                continue;
            }
            if vy <= 0.0 {
                // Rising into the tile from below: pass through.
                let tile_top = (ty * TILE_SIZE) as f64;
                if bounds.y + bounds.height > tile_top && vy < 0.0 {
                    continue;
                }
            }
            return true;
        }
    }
    false
}

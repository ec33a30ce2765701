/// Tiled JSON map loading.
///
/// Parses the subset of the Tiled export format the simulation needs: map
/// dimensions, tile size, and named tile layers carrying a row-major flat
/// index array (`0` = empty, `> 0` = raw tile index). Structural problems
/// are fatal at load time; after that the map is immutable and every query
/// on it is infallible.
///
/// The collision layer treats any nonzero raw index as solid. The renderer
/// subtracts one for sprite lookup (Tiled indices are 1-based), but no such
/// adjustment applies here.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::domain::tile::{GridView, TILE_SIZE};

/// Name of the layer whose nonzero tiles block movement.
pub const COLLISION_LAYER: &str = "Collision";
/// Name of the layer holding ladder tiles. Optional: a map without it
/// simply has no ladders.
pub const LADDER_LAYER: &str = "Ladders";

#[derive(Clone, Debug, Deserialize)]
pub struct TileMap {
    pub width: i32,
    pub height: i32,
    #[serde(rename = "tilewidth")]
    pub tile_width: i32,
    #[serde(rename = "tileheight")]
    pub tile_height: i32,
    pub layers: Vec<MapLayer>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MapLayer {
    pub name: String,
    pub width: i32,
    pub height: i32,
    /// Row-major tile indices. Absent on non-tile layers.
    #[serde(default)]
    pub data: Vec<i32>,
    #[serde(rename = "type")]
    pub kind: LayerKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum LayerKind {
    #[serde(rename = "tilelayer")]
    Tile,
    #[serde(rename = "objectgroup")]
    Object,
    #[serde(rename = "imagelayer")]
    Image,
    #[serde(rename = "group")]
    Group,
}

impl TileMap {
    /// Parse and validate a Tiled JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let map: TileMap = serde_json::from_str(text).context("parsing tilemap JSON")?;
        map.validate()?;
        Ok(map)
    }

    /// Read, parse, and validate a map file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading tilemap {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("loading tilemap {}", path.display()))
    }

    /// Find a layer by name. Linear scan; absence is not an error, callers
    /// degrade (no collision, no ladders) rather than fail.
    pub fn layer(&self, name: &str) -> Option<&MapLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Map width in pixels.
    pub fn pixel_width(&self) -> f64 {
        (self.width * TILE_SIZE) as f64
    }

    /// Map height in pixels.
    pub fn pixel_height(&self) -> f64 {
        (self.height * TILE_SIZE) as f64
    }

    fn validate(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            bail!("map dimensions must be positive, got {}x{}", self.width, self.height);
        }
        if self.tile_width != TILE_SIZE || self.tile_height != TILE_SIZE {
            bail!(
                "unsupported tile size {}x{}, expected {}x{}",
                self.tile_width, self.tile_height, TILE_SIZE, TILE_SIZE
            );
        }
        for layer in &self.layers {
            if layer.kind != LayerKind::Tile {
                continue;
            }
            let expected = (layer.width as usize) * (layer.height as usize);
            if layer.data.len() != expected {
                bail!(
                    "layer '{}' has {} tiles, expected {} ({}x{})",
                    layer.name, layer.data.len(), expected, layer.width, layer.height
                );
            }
        }
        Ok(())
    }
}

impl MapLayer {
    /// Borrowed grid view for domain queries.
    pub fn grid(&self) -> GridView<'_> {
        GridView { width: self.width, height: self.height, data: &self.data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> String {
        r#"{
            "width": 4, "height": 2,
            "tilewidth": 16, "tileheight": 16,
            "layers": [
                {"name": "Background", "type": "tilelayer",
                 "width": 4, "height": 2,
                 "data": [5, 5, 5, 5, 5, 5, 5, 5]},
                {"name": "Collision", "type": "tilelayer",
                 "width": 4, "height": 2,
                 "data": [0, 0, 0, 0, 1, 1, 1, 1]},
                {"name": "Spawns", "type": "objectgroup",
                 "width": 4, "height": 2}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn parses_valid_map() {
        let map = TileMap::from_json(&sample_json()).expect("valid map should parse");
        assert_eq!(map.width, 4);
        assert_eq!(map.pixel_width(), 64.0);
        assert_eq!(map.pixel_height(), 32.0);
        assert_eq!(map.layers.len(), 3);
        assert_eq!(map.layers[2].kind, LayerKind::Object);
    }

    #[test]
    fn layer_lookup_by_name() {
        let map = TileMap::from_json(&sample_json()).unwrap();
        let collision = map.layer(COLLISION_LAYER).expect("collision layer present");
        assert!(collision.grid().is_solid(0, 1));
        assert!(!collision.grid().is_solid(0, 0));
        assert!(map.layer(LADDER_LAYER).is_none());
        assert!(map.layer("nope").is_none());
    }

    #[test]
    fn rejects_data_length_mismatch() {
        let bad = r#"{
            "width": 2, "height": 2,
            "tilewidth": 16, "tileheight": 16,
            "layers": [
                {"name": "Collision", "type": "tilelayer",
                 "width": 2, "height": 2, "data": [1, 2, 3]}
            ]
        }"#;
        let err = TileMap::from_json(bad).expect_err("short data should fail");
        assert!(format!("{err:#}").contains("expected 4"));
    }

    #[test]
    fn rejects_unsupported_tile_size() {
        let bad = r#"{
            "width": 1, "height": 1,
            "tilewidth": 32, "tileheight": 32,
            "layers": []
        }"#;
        assert!(TileMap::from_json(bad).is_err());
    }

    #[test]
    fn object_layers_skip_data_validation() {
        let json = r#"{
            "width": 1, "height": 1,
            "tilewidth": 16, "tileheight": 16,
            "layers": [
                {"name": "Objects", "type": "objectgroup", "width": 1, "height": 1}
            ]
        }"#;
        let map = TileMap::from_json(json).expect("object layer without data is fine");
        assert!(map.layer("Objects").is_some());
    }
}

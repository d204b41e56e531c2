//! Raised ground tiles
//!
//! Terrain is a list of scrolling segments, each a run of tile columns with an
//! elevation level. Ground hazards sit on whatever surface is under them.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Source of the ground line under a screen x
pub trait GroundProfile {
    fn ground_y_at(&self, x: f32) -> f32;
}

/// Level ground everywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround;

impl GroundProfile for FlatGround {
    fn ground_y_at(&self, _x: f32) -> f32 {
        GROUND_Y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKind {
    FlatLow,
    Flat,
    SlopeUp,
    SlopeDown,
}

impl TileKind {
    /// Classify a column against the one before it
    pub fn classify(level: u8, prev_level: u8) -> Self {
        if level > prev_level {
            TileKind::SlopeUp
        } else if level < prev_level {
            TileKind::SlopeDown
        } else if level == 0 {
            TileKind::FlatLow
        } else {
            TileKind::Flat
        }
    }

    /// Surface height `frac` (0..=1) of the way across the tile
    pub fn surface_y(&self, frac: f32) -> f32 {
        let lerp = |a: f32, b: f32| a + (b - a) * frac;
        match self {
            TileKind::SlopeUp => {
                TILE_ROW_Y + lerp(TILE_SURFACE_OFFSET_LOW, TILE_SURFACE_OFFSET_NORMAL)
            }
            TileKind::SlopeDown => {
                TILE_ROW_Y + lerp(TILE_SURFACE_OFFSET_NORMAL, TILE_SURFACE_OFFSET_LOW)
            }
            TileKind::Flat => TILE_ROW_Y + TILE_SURFACE_OFFSET_NORMAL,
            TileKind::FlatLow => GROUND_Y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub local_x: f32,
    pub kind: TileKind,
    pub level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainSegment {
    pub x: f32,
    pub width: f32,
    pub tiles: Vec<Tile>,
}

impl TerrainSegment {
    /// Tile containing segment-local `local_x`
    fn tile_at(&self, local_x: f32) -> Option<&Tile> {
        if local_x < 0.0 || local_x >= self.width {
            return None;
        }
        self.tiles.iter().rev().find(|t| local_x >= t.local_x)
    }
}

/// A tile column seen on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TileColumn {
    pub screen_x: f32,
    pub kind: TileKind,
    pub level: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Terrain {
    segments: Vec<TerrainSegment>,
}

impl Terrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.segments.clear();
    }

    pub fn segments(&self) -> &[TerrainSegment] {
        &self.segments
    }

    /// Add one tile column per level, starting at screen x
    pub fn add_segment(&mut self, levels: &[u8], x: f32) {
        if levels.is_empty() {
            return;
        }
        let tiles: Vec<Tile> = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| {
                let prev = if i > 0 { levels[i - 1] } else { level };
                Tile {
                    local_x: i as f32 * TILE_SIZE,
                    kind: TileKind::classify(level, prev),
                    level,
                }
            })
            .collect();
        let width = tiles.last().map(|t| t.local_x + TILE_SIZE).unwrap_or(0.0);
        self.segments.push(TerrainSegment { x, width, tiles });
    }

    pub fn update(&mut self, dt: f32) {
        let scroll = AUTO_RUN_SPEED * dt;
        for seg in &mut self.segments {
            seg.x -= scroll;
        }
        self.segments.retain(|seg| seg.x + seg.width > -TILE_SIZE);
    }

    pub fn visible_columns(&self) -> Vec<TileColumn> {
        self.segments
            .iter()
            .flat_map(|seg| {
                seg.tiles.iter().map(move |t| TileColumn {
                    screen_x: seg.x + t.local_x,
                    kind: t.kind,
                    level: t.level,
                })
            })
            .filter(|c| c.screen_x + TILE_SIZE >= 0.0 && c.screen_x <= CANVAS_WIDTH)
            .collect()
    }

    /// Mean level of the columns under the screen, 0 when there are none
    pub fn average_elevation(&self) -> f32 {
        let (sum, count) = (0..(CANVAS_WIDTH / TILE_SIZE) as u32)
            .map(|i| i as f32 * TILE_SIZE)
            .filter_map(|x| self.locate(x).map(|(_, t)| t.level as f32))
            .fold((0.0, 0u32), |(s, c), l| (s + l, c + 1));
        if count > 0 { sum / count as f32 } else { 0.0 }
    }

    fn locate(&self, x: f32) -> Option<(&TerrainSegment, &Tile)> {
        self.segments
            .iter()
            .find_map(|seg| seg.tile_at(x - seg.x).map(|t| (seg, t)))
    }
}

impl GroundProfile for Terrain {
    fn ground_y_at(&self, x: f32) -> f32 {
        match self.locate(x) {
            Some((seg, tile)) => {
                let frac = ((x - seg.x - tile.local_x) / TILE_SIZE).clamp(0.0, 1.0);
                tile.kind.surface_y(frac)
            }
            None => GROUND_Y,
        }
    }
}

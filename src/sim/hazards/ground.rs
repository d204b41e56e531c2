//! Obstacles standing on the ground line

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::HazardError;
use crate::consts::*;
use crate::sim::collision::{Circle, Rect, Shape};
use crate::sim::terrain::GroundProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroundKind {
    PoolNoodle,
    SandCastle,
    OldIguana,
    TieDyeIguana,
    /// Round obstacle, collides as its inscribed circle
    Boulder,
}

impl GroundKind {
    pub const ALL: [GroundKind; 5] = [
        GroundKind::PoolNoodle,
        GroundKind::SandCastle,
        GroundKind::OldIguana,
        GroundKind::TieDyeIguana,
        GroundKind::Boulder,
    ];

    /// (width, height) in pixels
    pub fn size(&self) -> (f32, f32) {
        match self {
            GroundKind::PoolNoodle => (POOL_NOODLE_WIDTH, POOL_NOODLE_HEIGHT),
            GroundKind::SandCastle => (SAND_CASTLE_WIDTH, SAND_CASTLE_HEIGHT),
            GroundKind::OldIguana => (OLD_IGUANA_WIDTH, OLD_IGUANA_HEIGHT),
            GroundKind::TieDyeIguana => (TIE_DYE_IGUANA_WIDTH, TIE_DYE_IGUANA_HEIGHT),
            GroundKind::Boulder => (BOULDER_SIZE, BOULDER_SIZE),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroundKind::PoolNoodle => "poolNoodle",
            GroundKind::SandCastle => "sandCastle",
            GroundKind::OldIguana => "oldIguana",
            GroundKind::TieDyeIguana => "tieDyeIguana",
            GroundKind::Boulder => "boulder",
        }
    }
}

impl FromStr for GroundKind {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroundKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HazardError::UnknownGroundHazard(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundHazard {
    pub kind: GroundKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl GroundHazard {
    /// New hazard at the right screen edge, resting on flat ground
    pub fn new(kind: GroundKind) -> Self {
        Self::at(kind, CANVAS_WIDTH)
    }

    pub fn at(kind: GroundKind, x: f32) -> Self {
        let (w, h) = kind.size();
        Self {
            kind,
            x,
            y: GROUND_Y - h,
            w,
            h,
        }
    }

    /// Hazard at `x` resting on the given ground
    pub fn seated(kind: GroundKind, x: f32, ground: &dyn GroundProfile) -> Self {
        let mut hazard = Self::at(kind, x);
        hazard.y = ground.ground_y_at(x + hazard.w / 2.0) - hazard.h;
        hazard
    }

    /// Scroll left and re-seat on the ground under the hazard's center
    pub fn update(&mut self, dt: f32, ground: &dyn GroundProfile) {
        self.x -= AUTO_RUN_SPEED * dt;
        self.y = ground.ground_y_at(self.x + self.w / 2.0) - self.h;
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.w < 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn shape(&self) -> Shape {
        match self.kind {
            GroundKind::Boulder => Shape::Circle(Circle::inscribed(self.x, self.y, self.w)),
            _ => Shape::Rect(self.rect()),
        }
    }

    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        self.shape().overlaps_rect(hitbox)
    }
}

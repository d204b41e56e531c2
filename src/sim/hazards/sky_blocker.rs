//! Large round obstacles drifting through the sky band

use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::HazardError;
use crate::consts::*;
use crate::sim::collision::{Circle, Rect, circle_rect_overlap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkyBlockerKind {
    Pufferfish,
    SmallAsteroid,
    MediumAsteroid,
    LargeAsteroid,
}

impl SkyBlockerKind {
    pub const ALL: [SkyBlockerKind; 4] = [
        SkyBlockerKind::Pufferfish,
        SkyBlockerKind::SmallAsteroid,
        SkyBlockerKind::MediumAsteroid,
        SkyBlockerKind::LargeAsteroid,
    ];

    /// Bounding square side
    pub fn size(&self) -> f32 {
        match self {
            SkyBlockerKind::Pufferfish => PUFFERFISH_SIZE,
            SkyBlockerKind::SmallAsteroid => SMALL_ASTEROID_SIZE,
            SkyBlockerKind::MediumAsteroid => MEDIUM_ASTEROID_SIZE,
            SkyBlockerKind::LargeAsteroid => LARGE_ASTEROID_SIZE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkyBlockerKind::Pufferfish => "pufferfish",
            SkyBlockerKind::SmallAsteroid => "smallAsteroid",
            SkyBlockerKind::MediumAsteroid => "mediumAsteroid",
            SkyBlockerKind::LargeAsteroid => "largeAsteroid",
        }
    }
}

impl FromStr for SkyBlockerKind {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkyBlockerKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HazardError::UnknownSkyBlocker(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyBlocker {
    pub kind: SkyBlockerKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Visual rotation (radians)
    pub angle: f32,
    /// Radians per second, either sign
    pub rotate_rate: f32,
}

impl SkyBlocker {
    pub fn new(kind: SkyBlockerKind, x: f32, y: f32, rotate_rate: f32) -> Self {
        Self {
            kind,
            x,
            y,
            size: kind.size(),
            angle: 0.0,
            rotate_rate,
        }
    }

    /// Random rotation rate and direction
    pub fn spawn<R: Rng + ?Sized>(kind: SkyBlockerKind, x: f32, y: f32, rng: &mut R) -> Self {
        let rate = rng.random_range(SKY_BLOCKER_ROTATE_MIN..SKY_BLOCKER_ROTATE_MAX);
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Self::new(kind, x, y, rate * sign)
    }

    pub fn update(&mut self, dt: f32) {
        self.x -= AUTO_RUN_SPEED * dt;
        self.angle += self.rotate_rate * dt;
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.size < 0.0
    }

    pub fn hit_circle(&self) -> Circle {
        Circle::inscribed(self.x, self.y, self.size)
    }

    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        circle_rect_overlap(&self.hit_circle(), hitbox)
    }
}

//! Player vertical physics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::Rect;

/// The player's body: fixed x, thrust against gravity on y
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            x: PLAYER_START_X,
            y: GROUND_Y - PLAYER_HEIGHT,
            vy: 0.0,
        }
    }
}

impl PlayerBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, dt: f32, thrusting: bool) {
        if thrusting {
            self.vy -= THRUST * dt;
        } else {
            self.vy += GRAVITY * dt;
        }
        self.vy = self.vy.clamp(-TERMINAL_VEL_UP, TERMINAL_VEL_DOWN);
        self.y += self.vy * dt;

        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = 0.0;
        }
        if self.y + PLAYER_HEIGHT > GROUND_Y {
            self.y = GROUND_Y - PLAYER_HEIGHT;
            self.vy = 0.0;
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.y + PLAYER_HEIGHT >= GROUND_Y
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    pub fn center(&self) -> Vec2 {
        self.hitbox().center()
    }
}

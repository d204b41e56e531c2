//! Homing flyers
//!
//! A flyer telegraphs from the right edge, then dives at the player. It only
//! steers for a short tracking window and at a capped turn rate, so a late
//! vertical change makes it overshoot. Horizontal speed is fixed; heading
//! only sets the vertical component, so arrival time never depends on aim.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::normalize_angle;
use crate::sim::collision::{Rect, rects_overlap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FlyerState {
    /// Motionless off-screen, indicator flashing
    Warning { timer: f32 },
    /// Flying; `tracking` seconds of steering left
    Active { tracking: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flyer {
    pub x: f32,
    pub y: f32,
    /// Heading in radians (π = straight left)
    pub angle: f32,
    pub state: FlyerState,
    pub speed: f32,
    pub turn_rate: f32,
}

impl Flyer {
    pub fn new(target_y: f32) -> Self {
        Self::with_warning(target_y, FLYER_WARNING_DURATION)
    }

    pub fn with_warning(target_y: f32, warning: f32) -> Self {
        Self {
            x: CANVAS_WIDTH + FLYER_WIDTH,
            y: target_y,
            angle: std::f32::consts::PI,
            state: FlyerState::Warning { timer: warning },
            speed: FLYER_SPEED,
            turn_rate: FLYER_TURN_RATE,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, FlyerState::Active { .. })
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, FlyerState::Active { tracking } if tracking > 0.0)
    }

    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x + FLYER_WIDTH / 2.0, self.y + FLYER_HEIGHT / 2.0)
    }

    pub fn update(&mut self, dt: f32, player_center: glam::Vec2) {
        match &mut self.state {
            FlyerState::Warning { timer } => {
                *timer -= dt;
                if *timer <= 0.0 {
                    self.state = FlyerState::Active {
                        tracking: FLYER_TRACKING_DURATION,
                    };
                }
                return;
            }
            FlyerState::Active { tracking } => {
                if *tracking > 0.0 {
                    *tracking -= dt;
                    let to_player = player_center - self.center();
                    let desired = to_player.y.atan2(to_player.x);
                    let diff = normalize_angle(desired - self.angle);
                    let max_turn = self.turn_rate * dt;
                    self.angle = if diff.abs() <= max_turn {
                        desired
                    } else {
                        self.angle + diff.signum() * max_turn
                    };
                }
            }
        }

        self.x -= self.speed * dt;
        self.y += self.angle.sin() * self.speed * dt;
    }

    /// Past the cull margin on any edge. Warning flyers are never culled.
    pub fn is_off_screen(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.x + FLYER_WIDTH < -FLYER_CULL_MARGIN_X
            || self.x > CANVAS_WIDTH + FLYER_WIDTH + FLYER_CULL_MARGIN_X
            || self.y + FLYER_HEIGHT < -FLYER_CULL_MARGIN_Y
            || self.y > GROUND_Y + FLYER_CULL_MARGIN_Y
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, FLYER_WIDTH, FLYER_HEIGHT)
    }

    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        self.is_active() && rects_overlap(&self.rect(), hitbox)
    }

    /// Knock the flyer out of play
    pub fn punch(&self) -> PunchedFlyer {
        PunchedFlyer {
            x: self.x,
            y: self.y,
            vx: FLYER_PUNCH_VX,
            vy: FLYER_PUNCH_VY,
            spin: self.angle,
            alpha: 1.0,
        }
    }
}

/// Harmless tumbling flyer (ballistic arc, spin and fade)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchedFlyer {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub spin: f32,
    pub alpha: f32,
}

impl PunchedFlyer {
    pub fn update(&mut self, dt: f32) {
        self.vy += FLYER_PUNCH_GRAVITY * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        self.spin += FLYER_PUNCH_SPIN * dt;
        self.alpha = (self.alpha - dt / FLYER_PUNCH_FADE).max(0.0);
    }

    pub fn is_off_screen(&self) -> bool {
        self.y > GROUND_Y + FLYER_PUNCH_CULL_DEPTH
    }
}

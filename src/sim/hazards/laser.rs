//! Standalone lasers placed by the spawner
//!
//! Unlike the full-screen keyframed patterns these scroll with the world and
//! ping-pong between a harmless warning phase and a deadly active phase.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::polar_to_cartesian;
use crate::sim::collision::{Rect, beam_hits_rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaserPhase {
    Warning,
    Active,
}

/// Where a sweeping laser is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotSide {
    Ceiling,
    Ground,
}

impl PivotSide {
    pub fn pivot_y(&self) -> f32 {
        match self {
            PivotSide::Ceiling => 0.0,
            PivotSide::Ground => GROUND_Y,
        }
    }

    /// Arc center: straight down from the ceiling, straight up from the ground
    pub fn center_angle(&self) -> f32 {
        match self {
            PivotSide::Ceiling => FRAC_PI_2,
            PivotSide::Ground => -FRAC_PI_2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LaserKind {
    /// Horizontal beam of fixed width
    Static { x: f32, beam_y: f32, beam_width: f32 },
    /// Beam rotating back and forth about a pivot
    Sweep {
        pivot_x: f32,
        pivot_y: f32,
        length: f32,
        angle: f32,
        angle_min: f32,
        angle_max: f32,
        speed: f32,
        /// +1 or -1
        dir: f32,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub kind: LaserKind,
    pub phase: LaserPhase,
    /// Seconds left in the current phase
    pub timer: f32,
    pub warning_duration: f32,
    pub active_duration: f32,
}

impl Laser {
    pub fn new_static(x: f32, beam_y: f32, beam_width: Option<f32>) -> Self {
        Self::with_durations(
            LaserKind::Static {
                x,
                beam_y,
                beam_width: beam_width.unwrap_or(LASER_STATIC_WIDTH),
            },
            LASER_STATIC_WARNING_DURATION,
            LASER_STATIC_ACTIVE_DURATION,
        )
    }

    pub fn new_sweep(pivot_x: f32, pivot_y: f32, angle_min: f32, angle_max: f32, speed: Option<f32>) -> Self {
        Self::with_durations(
            LaserKind::Sweep {
                pivot_x,
                pivot_y,
                length: LASER_SWEEP_LENGTH,
                angle: angle_min,
                angle_min,
                angle_max,
                speed: speed.unwrap_or(LASER_SWEEP_SPEED),
                dir: 1.0,
            },
            LASER_SWEEP_WARNING_DURATION,
            LASER_SWEEP_ACTIVE_DURATION,
        )
    }

    /// Sweep mounted on the ceiling or ground, covering the standard arc
    pub fn sweep_from(pivot_x: f32, side: PivotSide) -> Self {
        let half_arc = LASER_SWEEP_ARC / 2.0;
        let center = side.center_angle();
        Self::new_sweep(pivot_x, side.pivot_y(), center - half_arc, center + half_arc, None)
    }

    /// Starts in the warning phase
    pub fn with_durations(kind: LaserKind, warning_duration: f32, active_duration: f32) -> Self {
        Self {
            kind,
            phase: LaserPhase::Warning,
            timer: warning_duration,
            warning_duration,
            active_duration,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == LaserPhase::Active
    }

    pub fn update(&mut self, dt: f32) {
        let scroll = AUTO_RUN_SPEED * dt;
        match &mut self.kind {
            LaserKind::Static { x, .. } => *x -= scroll,
            LaserKind::Sweep { pivot_x, .. } => *pivot_x -= scroll,
        }

        self.timer -= dt;
        if self.timer <= 0.0 {
            (self.phase, self.timer) = match self.phase {
                LaserPhase::Warning => (LaserPhase::Active, self.active_duration),
                LaserPhase::Active => (LaserPhase::Warning, self.warning_duration),
            };
        }

        if let LaserKind::Sweep {
            angle,
            angle_min,
            angle_max,
            speed,
            dir,
            ..
        } = &mut self.kind
        {
            *angle += *speed * *dir * dt;
            if *angle >= *angle_max {
                *angle = *angle_max;
                *dir = -1.0;
            } else if *angle <= *angle_min {
                *angle = *angle_min;
                *dir = 1.0;
            }
        }
    }

    pub fn is_off_screen(&self) -> bool {
        match self.kind {
            LaserKind::Static { x, beam_width, .. } => x + beam_width < 0.0,
            // Pivot plus the longest possible reach to the right
            LaserKind::Sweep { pivot_x, length, .. } => pivot_x + length < 0.0,
        }
    }

    /// Current beam endpoints
    pub fn beam(&self) -> (Vec2, Vec2) {
        match self.kind {
            LaserKind::Static { x, beam_y, beam_width } => {
                (Vec2::new(x, beam_y), Vec2::new(x + beam_width, beam_y))
            }
            LaserKind::Sweep {
                pivot_x,
                pivot_y,
                length,
                angle,
                ..
            } => {
                let pivot = Vec2::new(pivot_x, pivot_y);
                (pivot, pivot + polar_to_cartesian(length, angle))
            }
        }
    }

    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        if !self.is_active() {
            return false;
        }
        let (start, end) = self.beam();
        beam_hits_rect(start, end, LASER_BEAM_THICKNESS, hitbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_phase_ping_pong() {
        let mut laser = Laser::new_static(CANVAS_WIDTH, 200.0, None);
        assert_eq!(laser.phase, LaserPhase::Warning);
        laser.update(1.5);
        assert_eq!(laser.phase, LaserPhase::Active);
        assert_eq!(laser.timer, LASER_STATIC_ACTIVE_DURATION);
        laser.update(1.2);
        assert_eq!(laser.phase, LaserPhase::Warning);
        assert_eq!(laser.timer, LASER_STATIC_WARNING_DURATION);
    }

    #[test]
    fn test_static_scrolls_and_culls() {
        let mut laser = Laser::new_static(0.0, 200.0, Some(100.0));
        laser.update(0.2);
        assert!(!laser.is_off_screen());
        laser.update(0.2);
        assert!(laser.is_off_screen());
    }

    #[test]
    fn test_static_only_hurts_when_active() {
        let mut laser = Laser::new_static(50.0, 200.0, None);
        let hitbox = Rect::new(100.0, 190.0, 40.0, 30.0);
        assert!(!laser.check_collision(&hitbox));
        laser.phase = LaserPhase::Active;
        assert!(laser.check_collision(&hitbox));
        assert!(!laser.check_collision(&Rect::new(100.0, 100.0, 40.0, 30.0)));
    }

    #[test]
    fn test_sweep_bounces_between_bounds() {
        let mut laser = Laser::sweep_from(400.0, PivotSide::Ceiling);
        let LaserKind::Sweep { angle_min, angle_max, .. } = laser.kind else {
            panic!("expected sweep");
        };
        assert!((angle_min - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
        assert!((angle_max - 3.0 * std::f32::consts::FRAC_PI_4).abs() < 1e-5);

        for _ in 0..400 {
            laser.update(1.0 / 60.0);
            let LaserKind::Sweep { angle, .. } = laser.kind else {
                unreachable!()
            };
            assert!(angle >= angle_min - 1e-6 && angle <= angle_max + 1e-6);
        }
    }

    #[test]
    fn test_sweep_reverses_at_max() {
        let mut laser = Laser::new_sweep(400.0, 0.0, 0.0, 0.5, Some(1.0));
        laser.update(0.6);
        let LaserKind::Sweep { angle, dir, .. } = laser.kind else {
            panic!("expected sweep");
        };
        assert_eq!(angle, 0.5);
        assert_eq!(dir, -1.0);
    }

    #[test]
    fn test_sweep_beam_points_from_pivot() {
        let laser = Laser::sweep_from(300.0, PivotSide::Ground);
        let (start, end) = laser.beam();
        assert_eq!(start, Vec2::new(300.0, GROUND_Y));
        // Ground pivots aim upward
        assert!(end.y < GROUND_Y);
        assert!(((end - start).length() - LASER_SWEEP_LENGTH).abs() < 1e-3);
    }

    #[test]
    fn test_sweep_off_screen_uses_reach() {
        let mut laser = Laser::sweep_from(-LASER_SWEEP_LENGTH + 1.0, PivotSide::Ceiling);
        assert!(!laser.is_off_screen());
        laser.update(0.01);
        assert!(laser.is_off_screen());
    }
}

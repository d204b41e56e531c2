//! Turkey Run - hazard simulation core for a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hazards, spawner, laser choreography)
//! - `tuning`: Data-driven spawner balance
//! - `export`: Laser pattern catalog dump for offline tooling
//! - `solvability`: Offline reachability check for laser patterns

pub mod export;
pub mod sim;
pub mod solvability;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use tuning::{TierRow, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical canvas resolution
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 450.0;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest real frame time a single frame may simulate
    pub const MAX_FRAME_TIME: f32 = SIM_DT * MAX_SUBSTEPS as f32;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_START_X: f32 = 100.0;

    /// Player physics (px/s and px/s²)
    pub const GRAVITY: f32 = 1200.0;
    pub const THRUST: f32 = 1500.0;
    pub const TERMINAL_VEL_UP: f32 = 380.0;
    pub const TERMINAL_VEL_DOWN: f32 = 450.0;

    /// World
    pub const GROUND_Y: f32 = 400.0;
    pub const AUTO_RUN_SPEED: f32 = 300.0;
    pub const PIXELS_PER_METER: f32 = 50.0;

    /// Ground hazards
    pub const POOL_NOODLE_WIDTH: f32 = 15.0;
    pub const POOL_NOODLE_HEIGHT: f32 = 60.0;
    pub const SAND_CASTLE_WIDTH: f32 = 50.0;
    pub const SAND_CASTLE_HEIGHT: f32 = 35.0;
    pub const OLD_IGUANA_WIDTH: f32 = 50.0;
    pub const OLD_IGUANA_HEIGHT: f32 = 50.0;
    pub const TIE_DYE_IGUANA_WIDTH: f32 = 56.0;
    pub const TIE_DYE_IGUANA_HEIGHT: f32 = 28.0;
    pub const BOULDER_SIZE: f32 = 44.0;

    /// Zappers
    pub const ZAPPER_WIDTH: f32 = 30.0;
    pub const ZAPPER_GAP_MIN: f32 = 90.0;
    pub const ZAPPER_GAP_MAX: f32 = 150.0;
    /// Min distance from ceiling/ground for gap edges
    pub const ZAPPER_GAP_MARGIN: f32 = 30.0;
    pub const ZAPPER_BOTTOM_OPEN_MIN_HEIGHT: f32 = 100.0;
    pub const ZAPPER_BOTTOM_OPEN_MAX_HEIGHT: f32 = 280.0;

    /// Food collectibles
    pub const FOOD_SIZE: f32 = 16.0;
    pub const FOOD_HITBOX_PADDING: f32 = 8.0;
    pub const FOOD_SPAWN_CHANCE: f32 = 0.7;
    pub const FOOD_RISKY_CHANCE: f32 = 0.35;
    pub const FOOD_COUNT_MIN: u32 = 3;
    pub const FOOD_COUNT_MAX: u32 = 8;
    pub const FOOD_SPACING: f32 = 32.0;
    pub const FOOD_ARC_HEIGHT: f32 = 80.0;
    pub const FOOD_RISE_PER_ITEM: f32 = 18.0;
    pub const FOOD_Y_MIN: f32 = 20.0;
    pub const FOOD_Y_BOTTOM_MARGIN: f32 = 30.0;

    /// Homing flyers
    pub const FLYER_WIDTH: f32 = 30.0;
    pub const FLYER_HEIGHT: f32 = 20.0;
    pub const FLYER_SPEED: f32 = 220.0;
    /// Max steering rate (radians/s) - limited so dodging works
    pub const FLYER_TURN_RATE: f32 = 2.5;
    pub const FLYER_WARNING_DURATION: f32 = 1.0;
    /// Seconds of steering after activation before the heading locks
    pub const FLYER_TRACKING_DURATION: f32 = 1.2;
    /// Off-screen margins (any edge)
    pub const FLYER_CULL_MARGIN_X: f32 = 80.0;
    pub const FLYER_CULL_MARGIN_Y: f32 = 120.0;
    /// Punched tumble
    pub const FLYER_PUNCH_VX: f32 = 260.0;
    pub const FLYER_PUNCH_VY: f32 = -420.0;
    pub const FLYER_PUNCH_GRAVITY: f32 = 1400.0;
    pub const FLYER_PUNCH_SPIN: f32 = 14.0;
    pub const FLYER_PUNCH_FADE: f32 = 0.8;
    pub const FLYER_PUNCH_CULL_DEPTH: f32 = 200.0;

    /// Lasers
    pub const LASER_BEAM_THICKNESS: f32 = 16.0;
    pub const LASER_WARNING_THICKNESS: f32 = 2.0;
    pub const LASER_STATIC_WIDTH: f32 = 300.0;
    pub const LASER_STATIC_WARNING_DURATION: f32 = 1.5;
    pub const LASER_STATIC_ACTIVE_DURATION: f32 = 1.2;
    pub const LASER_SWEEP_LENGTH: f32 = 300.0;
    pub const LASER_SWEEP_WARNING_DURATION: f32 = 1.0;
    pub const LASER_SWEEP_ACTIVE_DURATION: f32 = 2.0;
    /// Radians per second
    pub const LASER_SWEEP_SPEED: f32 = 1.0;
    /// Total sweep arc (90 degrees)
    pub const LASER_SWEEP_ARC: f32 = std::f32::consts::FRAC_PI_2;
    /// Lead-in before any keyframed beam turns deadly
    pub const LASER_WARN_WINDOW: f32 = 1.0;

    /// Sky blockers
    pub const PUFFERFISH_SIZE: f32 = 180.0;
    pub const SMALL_ASTEROID_SIZE: f32 = 36.0;
    pub const MEDIUM_ASTEROID_SIZE: f32 = 50.0;
    pub const LARGE_ASTEROID_SIZE: f32 = 72.0;
    pub const SKY_BLOCKER_Y_MIN: f32 = 20.0;
    pub const SKY_BLOCKER_Y_MAX: f32 = 250.0;
    /// Per-instance rotation rate range (radians/s, either direction)
    pub const SKY_BLOCKER_ROTATE_MIN: f32 = 0.4;
    pub const SKY_BLOCKER_ROTATE_MAX: f32 = 1.6;

    /// Terrain tiles
    pub const TILE_SIZE: f32 = 40.0;
    pub const TILE_ROW_Y: f32 = 360.0;
    /// Surface offsets inside a raised tile (from TILE_ROW_Y)
    pub const TILE_SURFACE_OFFSET_NORMAL: f32 = 8.0;
    pub const TILE_SURFACE_OFFSET_LOW: f32 = 40.0;

    /// Spawner defaults (overridable through `Tuning`)
    pub const SPAWNER_GRACE_DISTANCE: f32 = 600.0;
    pub const SPAWNER_BASE_GAP: f32 = 700.0;
    pub const SPAWNER_MIN_GAP: f32 = 250.0;
    /// Gap reduction per 1000 m traveled
    pub const SPAWNER_GAP_SHRINK_RATE: f32 = 150.0;
    pub const SPAWNER_MEDIUM_FROM: f32 = 300.0;
    pub const SPAWNER_EASY_UNTIL: f32 = 500.0;
    pub const SPAWNER_HARD_FROM: f32 = 1000.0;
    pub const SPAWNER_HARD_DOMINANT: f32 = 2000.0;
    /// Zapper gap-center jitter (fraction of the available band)
    pub const SPAWNER_GAP_CENTER_JITTER: f32 = 0.08;

    /// Flyer cadence defaults (overridable through `Tuning`)
    pub const FLYER_SPAWN_MIN_DISTANCE: f32 = 400.0;
    pub const FLYER_SPAWN_BASE_INTERVAL: f32 = 8.0;
    pub const FLYER_SPAWN_MIN_INTERVAL: f32 = 2.5;
    /// Seconds of interval reduction per 1000 m
    pub const FLYER_SPAWN_INTERVAL_DECAY: f32 = 0.8;
    pub const FLYER_VOLLEY_CHANCE: f32 = 0.3;
    pub const FLYER_VOLLEY_MAX: u32 = 3;
    pub const FLYER_VOLLEY_DELAY: f32 = 0.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a pixel distance into whole meters
#[inline]
pub fn pixels_to_meters(distance_px: f32) -> f32 {
    (distance_px / consts::PIXELS_PER_METER).floor()
}

//! Hazard archetypes
//!
//! Every hazard scrolls left with the world and exposes the same lifecycle:
//! construct, `update(dt)`, `is_off_screen()`, `check_collision(hitbox)`.

pub mod flyer;
pub mod ground;
pub mod laser;
pub mod sky_blocker;
pub mod zapper;

pub use flyer::{Flyer, FlyerState, PunchedFlyer};
pub use ground::{GroundHazard, GroundKind};
pub use laser::{Laser, LaserKind, LaserPhase, PivotSide};
pub use sky_blocker::{SkyBlocker, SkyBlockerKind};
pub use zapper::{Zapper, ZapperKind};

use thiserror::Error;

/// Configuration errors raised while building hazards or looking up patterns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HazardError {
    #[error("unknown ground hazard type: {0}")]
    UnknownGroundHazard(String),
    #[error("unknown sky blocker type: {0}")]
    UnknownSkyBlocker(String),
    #[error("unknown laser pattern: {0}")]
    UnknownPattern(String),
    #[error("unknown tier: {0}")]
    UnknownTier(String),
}

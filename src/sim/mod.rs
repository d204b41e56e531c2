//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod food;
pub mod generators;
pub mod hazards;
pub mod pattern;
pub mod player;
pub mod session;
pub mod spawner;
pub mod terrain;
pub mod timeline;
pub mod world;

pub use catalog::LaserCatalog;
pub use collision::{Circle, Rect, Shape, beam_hits_rect, circle_rect_overlap, rects_overlap};
pub use food::{Food, FoodField, Formation};
pub use hazards::{
    Flyer, FlyerState, GroundHazard, GroundKind, HazardError, Laser, LaserKind, LaserPhase,
    PivotSide, PunchedFlyer, SkyBlocker, SkyBlockerKind, Zapper, ZapperKind,
};
pub use pattern::{LaserPattern, PatternPlayer, Tier};
pub use player::PlayerBody;
pub use session::{RunEnd, Session, Snapshot};
pub use spawner::{ElementSpec, HazardHit, PatternEntry, Spawner};
pub use terrain::{FlatGround, GroundProfile, Terrain, TileKind};
pub use timeline::{BeamSample, BeamState, BeamTimeline, BeamTrack, Keyframe};
pub use world::WorldClock;

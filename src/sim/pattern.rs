//! Full-screen laser pattern playback
//!
//! A pattern is a bundle of beam timelines that plays for a fixed duration.
//! The player holds at most one running pattern; starting another replaces
//! it without any completion callback.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::collision::{Rect, beam_hits_rect};
use super::timeline::{BeamSample, BeamTimeline, BeamTrack};
use crate::consts::LASER_BEAM_THICKNESS;

/// Difficulty bucket shared by the spawner pool and the laser catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Easy, Tier::Medium, Tier::Hard, Tier::Extreme];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
            Tier::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = super::HazardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" | "med" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            "extreme" => Ok(Tier::Extreme),
            _ => Err(super::HazardError::UnknownTier(s.to_string())),
        }
    }
}

/// Authored multi-beam choreography
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserPattern {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    /// Seconds the pattern runs before ending
    pub duration: f32,
    pub lasers: Vec<BeamTimeline>,
}

impl LaserPattern {
    /// Delay every beam by `pad` seconds (holding them off meanwhile) and
    /// extend the duration to match
    pub fn with_startup_pad(self, pad: f32) -> Self {
        if pad <= 0.0 {
            return self;
        }
        Self {
            duration: self.duration + pad,
            lasers: self.lasers.iter().map(|l| l.with_startup_pad(pad)).collect(),
            ..self
        }
    }
}

/// Running instance of a pattern
#[derive(Debug, Clone)]
struct ActivePattern {
    id: String,
    name: String,
    elapsed: f32,
    duration: f32,
    tracks: Vec<BeamTrack>,
}

/// Plays one laser pattern at a time
#[derive(Debug, Clone, Default)]
pub struct PatternPlayer {
    active: Option<ActivePattern>,
}

impl PatternPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `pattern` from t=0, discarding whatever was running
    pub fn start(&mut self, pattern: &LaserPattern) {
        if let Some(prev) = &self.active {
            log::debug!("Laser pattern {} replaced by {}", prev.id, pattern.id);
        }
        log::info!("Laser pattern {} started ({:.1}s)", pattern.name, pattern.duration);
        self.active = Some(ActivePattern {
            id: pattern.id.clone(),
            name: pattern.name.clone(),
            elapsed: 0.0,
            duration: pattern.duration,
            tracks: pattern.lasers.iter().map(BeamTrack::new).collect(),
        });
    }

    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Advance playback. Returns false once the pattern has ended (or if
    /// nothing is running).
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        active.elapsed += dt;
        for track in &mut active.tracks {
            track.advance(dt);
        }

        if active.elapsed >= active.duration {
            log::info!("Laser pattern {} finished", active.name);
            self.active = None;
            return false;
        }
        true
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }

    pub fn active_name(&self) -> &str {
        self.active.as_ref().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn elapsed(&self) -> f32 {
        self.active.as_ref().map(|a| a.elapsed).unwrap_or(0.0)
    }

    pub fn duration(&self) -> f32 {
        self.active.as_ref().map(|a| a.duration).unwrap_or(0.0)
    }

    /// Current beam of every timeline (empty timelines are skipped)
    pub fn samples(&self) -> Vec<BeamSample> {
        self.active
            .iter()
            .flat_map(|a| a.tracks.iter().filter_map(BeamTrack::current))
            .collect()
    }

    /// True if any currently deadly beam touches `hitbox`
    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        let Some(active) = &self.active else {
            return false;
        };
        active
            .tracks
            .iter()
            .filter_map(BeamTrack::current)
            .filter(BeamSample::is_deadly)
            .any(|s| beam_hits_rect(s.start, s.end, LASER_BEAM_THICKNESS, hitbox))
    }
}

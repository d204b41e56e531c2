//! Spawner balance
//!
//! Everything that decides how hard a run gets with distance lives here so it
//! can be tweaked from JSON without a rebuild. Missing fields fall back to the
//! shipped defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Tier;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Tier odds up to a distance breakpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRow {
    /// Row applies below this many meters; `None` = no upper bound
    #[serde(default)]
    pub until_meters: Option<f32>,
    pub easy: f32,
    pub medium: f32,
    pub hard: f32,
}

impl TierRow {
    pub const fn new(until_meters: Option<f32>, easy: f32, medium: f32, hard: f32) -> Self {
        Self {
            until_meters,
            easy,
            medium,
            hard,
        }
    }

    fn total(&self) -> f32 {
        self.easy + self.medium + self.hard
    }

    /// Map a uniform draw in [0, 1) onto a tier by relative weight. A draw
    /// that rounds past the end lands on the last tier with any weight.
    pub fn pick(&self, r: f32) -> Tier {
        let x = r * self.total();
        if x < self.easy {
            Tier::Easy
        } else if x < self.easy + self.medium {
            Tier::Medium
        } else if self.hard > 0.0 {
            Tier::Hard
        } else if self.medium > 0.0 {
            Tier::Medium
        } else {
            Tier::Easy
        }
    }
}

/// Run-time balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pattern pacing ===
    /// Distance (px) before the first pattern
    pub grace_distance: f32,
    /// Empty space (px) between patterns at the start of a run
    pub base_gap: f32,
    /// Floor for the gap
    pub min_gap: f32,
    /// Gap reduction (px) per 1000 m
    pub gap_shrink_rate: f32,
    /// Tier odds by distance, ascending breakpoints
    pub tiers: Vec<TierRow>,

    // === Flyers ===
    /// Meters before flyers start
    pub flyer_min_distance: f32,
    pub flyer_base_interval: f32,
    pub flyer_min_interval: f32,
    /// Interval reduction (s) per 1000 m past `flyer_min_distance`
    pub flyer_interval_decay: f32,
    pub flyer_volley_chance: f32,
    /// Largest volley including the flyer that triggered it; 1 disables
    /// volleys
    pub flyer_volley_max: u32,
    pub flyer_volley_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grace_distance: SPAWNER_GRACE_DISTANCE,
            base_gap: SPAWNER_BASE_GAP,
            min_gap: SPAWNER_MIN_GAP,
            gap_shrink_rate: SPAWNER_GAP_SHRINK_RATE,
            tiers: vec![
                TierRow::new(Some(SPAWNER_MEDIUM_FROM), 1.0, 0.0, 0.0),
                TierRow::new(Some(SPAWNER_EASY_UNTIL), 0.6, 0.4, 0.0),
                TierRow::new(Some(SPAWNER_HARD_FROM), 0.3, 0.7, 0.0),
                TierRow::new(Some(SPAWNER_HARD_DOMINANT), 0.15, 0.55, 0.3),
                TierRow::new(None, 0.1, 0.35, 0.55),
            ],

            flyer_min_distance: FLYER_SPAWN_MIN_DISTANCE,
            flyer_base_interval: FLYER_SPAWN_BASE_INTERVAL,
            flyer_min_interval: FLYER_SPAWN_MIN_INTERVAL,
            flyer_interval_decay: FLYER_SPAWN_INTERVAL_DECAY,
            flyer_volley_chance: FLYER_VOLLEY_CHANCE,
            flyer_volley_max: FLYER_VOLLEY_MAX,
            flyer_volley_delay: FLYER_VOLLEY_DELAY,
        }
    }
}

impl Tuning {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate().inspect_err(|e| log::warn!("Rejected tuning: {e}"))?;
        Ok(tuning)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("base_gap", self.base_gap),
            ("min_gap", self.min_gap),
            ("flyer_base_interval", self.flyer_base_interval),
            ("flyer_min_interval", self.flyer_min_interval),
            ("flyer_volley_delay", self.flyer_volley_delay),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
        }
        if self.grace_distance < 0.0 || self.gap_shrink_rate < 0.0 || self.flyer_interval_decay < 0.0 {
            return Err(TuningError::Invalid("distances and rates must not be negative".into()));
        }
        if !(0.0..=1.0).contains(&self.flyer_volley_chance) {
            return Err(TuningError::Invalid("flyer_volley_chance must be within 0..=1".into()));
        }
        if self.flyer_volley_max < 1 {
            return Err(TuningError::Invalid("flyer_volley_max must be at least 1".into()));
        }

        let Some(last) = self.tiers.last() else {
            return Err(TuningError::Invalid("tier table is empty".into()));
        };
        if last.until_meters.is_some() {
            return Err(TuningError::Invalid("last tier row must be open-ended".into()));
        }
        for (i, row) in self.tiers.iter().enumerate() {
            if row.easy < 0.0 || row.medium < 0.0 || row.hard < 0.0 || !(row.total() > 0.0) {
                return Err(TuningError::Invalid(format!("tier row {i} has no usable weights")));
            }
            if i + 1 < self.tiers.len() && row.until_meters.is_none() {
                return Err(TuningError::Invalid(format!("tier row {i} is open-ended but not last")));
            }
        }
        let bounds: Vec<f32> = self.tiers.iter().filter_map(|r| r.until_meters).collect();
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TuningError::Invalid("tier breakpoints must ascend".into()));
        }
        Ok(())
    }

    /// Row whose breakpoint covers `meters`
    pub fn tier_row(&self, meters: f32) -> Option<&TierRow> {
        self.tiers
            .iter()
            .find(|row| row.until_meters.is_none_or(|until| meters < until))
    }

    /// Pacing gap (px) after a pattern placed at `meters`
    pub fn gap_for(&self, meters: f32) -> f32 {
        (self.base_gap - meters / 1000.0 * self.gap_shrink_rate).max(self.min_gap)
    }

    /// Seconds until the next flyer at `meters`
    pub fn flyer_interval(&self, meters: f32) -> f32 {
        let beyond = (meters - self.flyer_min_distance).max(0.0);
        (self.flyer_base_interval - beyond / 1000.0 * self.flyer_interval_decay)
            .max(self.flyer_min_interval)
    }
}

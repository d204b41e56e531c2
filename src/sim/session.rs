//! Fixed timestep host loop
//!
//! A `Session` is one run: distance clock, player body, spawner and the
//! laser pattern player, advanced together in fixed steps.

use serde::Serialize;

use super::pattern::{LaserPattern, PatternPlayer};
use super::player::PlayerBody;
use super::spawner::{HazardHit, Spawner};
use super::timeline::BeamSample;
use super::world::WorldClock;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunEnd {
    Hazard(HazardHit),
    LaserPattern,
}

/// Serializable view of a session for hosts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub meters: f32,
    pub coins: u32,
    pub player: PlayerBody,
    pub ended: Option<RunEnd>,
    pub ground_hazards: usize,
    pub zappers: usize,
    pub flyers: usize,
    pub lasers: usize,
    pub sky_blockers: usize,
    pub food: usize,
    pub pattern: Option<String>,
    pub beams: Vec<BeamSample>,
}

#[derive(Debug, Clone)]
pub struct Session {
    clock: WorldClock,
    player: PlayerBody,
    spawner: Spawner,
    patterns: PatternPlayer,
    accumulator: f32,
    ticks: u64,
    ended: Option<RunEnd>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::from_spawner(Spawner::new(seed))
    }

    /// Session with custom balance; rejects a tuning that fails validation
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Ok(Self::from_spawner(Spawner::with_tuning(seed, tuning)?))
    }

    fn from_spawner(spawner: Spawner) -> Self {
        Self {
            clock: WorldClock::new(),
            player: PlayerBody::new(),
            spawner,
            patterns: PatternPlayer::new(),
            accumulator: 0.0,
            ticks: 0,
            ended: None,
        }
    }

    /// Start a fresh run; the RNG stream carries on
    pub fn reset(&mut self) {
        log::info!("Run reset after {}m", self.clock.meters());
        self.clock.reset();
        self.player = PlayerBody::new();
        self.spawner.reset();
        self.patterns.stop();
        self.accumulator = 0.0;
        self.ticks = 0;
        self.ended = None;
    }

    /// Feed real frame time; runs as many fixed steps as fit (at most
    /// `MAX_SUBSTEPS`). Returns true once the run has ended.
    pub fn advance(&mut self, frame_dt: f32, thrusting: bool) -> bool {
        if self.ended.is_some() {
            return true;
        }
        // Non-finite frame times (NaN from a stalled host clock) count as zero
        let frame_dt = if frame_dt.is_finite() { frame_dt.clamp(0.0, MAX_FRAME_TIME) } else { 0.0 };
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(thrusting);
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.ended.is_some() {
                self.accumulator = 0.0;
                break;
            }
        }
        self.ended.is_some()
    }

    fn step(&mut self, thrusting: bool) {
        self.ticks += 1;
        self.clock.update(SIM_DT);
        self.player.update(SIM_DT, thrusting);

        self.spawner
            .update(SIM_DT, self.clock.distance_px, self.player.center());
        let hitbox = self.player.hitbox();
        self.spawner.food_mut().update(SIM_DT, &hitbox);
        self.patterns.update(SIM_DT);

        let hit = self
            .spawner
            .first_hit(&hitbox)
            .map(RunEnd::Hazard)
            .or_else(|| self.patterns.check_collision(&hitbox).then_some(RunEnd::LaserPattern));
        if let Some(cause) = hit {
            log::info!(
                "Run ended at {}m ({cause:?}), {} coins",
                self.clock.meters(),
                self.spawner.food().coins()
            );
            self.ended = Some(cause);
        }
    }

    /// Replace whatever laser pattern is playing
    pub fn start_laser_pattern(&mut self, pattern: &LaserPattern) {
        self.patterns.start(pattern);
    }

    pub fn ended(&self) -> Option<RunEnd> {
        self.ended
    }

    pub fn is_over(&self) -> bool {
        self.ended.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn distance_px(&self) -> f32 {
        self.clock.distance_px
    }

    pub fn meters(&self) -> f32 {
        self.clock.meters()
    }

    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn spawner_mut(&mut self) -> &mut Spawner {
        &mut self.spawner
    }

    pub fn pattern_player(&self) -> &PatternPlayer {
        &self.patterns
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            meters: self.clock.meters(),
            coins: self.spawner.food().coins(),
            player: self.player,
            ended: self.ended,
            ground_hazards: self.spawner.ground_hazards().len(),
            zappers: self.spawner.zappers().len(),
            flyers: self.spawner.flyers().len(),
            lasers: self.spawner.lasers().len(),
            sky_blockers: self.spawner.sky_blockers().len(),
            food: self.spawner.food().items().len(),
            pattern: self.patterns.active_id().map(str::to_owned),
            beams: self.patterns.samples(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::LaserCatalog;
    use crate::sim::timeline::{BeamTimeline, Keyframe};
    use crate::sim::{BeamState, Tier};

    #[test]
    fn test_frame_time_is_clamped() {
        let mut s = Session::new(1);
        s.advance(10.0, false);
        assert_eq!(s.ticks(), MAX_SUBSTEPS as u64);
        assert!((s.distance_px() - AUTO_RUN_SPEED * SIM_DT * MAX_SUBSTEPS as f32).abs() < 1e-3);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut s = Session::new(1);
        s.advance(SIM_DT * 0.6, false);
        assert_eq!(s.ticks(), 0);
        s.advance(SIM_DT * 0.6, false);
        assert_eq!(s.ticks(), 1);
    }

    #[test]
    fn test_nan_frame_time_does_not_stall() {
        let mut s = Session::new(1);
        s.advance(f32::NAN, false);
        s.advance(f32::INFINITY, false);
        assert_eq!(s.ticks(), 0);
        for _ in 0..10 {
            s.advance(SIM_DT, false);
        }
        assert_eq!(s.ticks(), 10);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let tuning = Tuning {
            flyer_min_interval: 0.0,
            ..Tuning::default()
        };
        assert!(matches!(Session::with_tuning(1, tuning), Err(TuningError::Invalid(_))));
        assert!(Session::with_tuning(1, Tuning::default()).is_ok());
    }

    #[test]
    fn test_quiet_start_before_grace_distance() {
        let mut s = Session::new(7);
        // 600 px at 300 px/s: just under two seconds is hazard-free
        for _ in 0..100 {
            assert!(!s.advance(SIM_DT, false));
        }
        assert_eq!(s.spawner().patterns_placed(), 0);
    }

    #[test]
    fn test_laser_pattern_ends_run() {
        let mut s = Session::new(3);
        let y = GROUND_Y - PLAYER_HEIGHT / 2.0;
        let pattern = LaserPattern {
            id: "floor".into(),
            name: "Floor".into(),
            tier: Tier::Easy,
            duration: 5.0,
            lasers: vec![BeamTimeline::once(vec![
                Keyframe::horizontal(0.0, y, BeamState::Off),
                Keyframe::horizontal(1.0, y, BeamState::Active),
                Keyframe::horizontal(4.0, y, BeamState::Off),
            ])],
        };
        s.start_laser_pattern(&pattern);
        let mut frames = 0;
        while !s.advance(SIM_DT, false) {
            frames += 1;
            assert!(frames < 120, "beam never killed the player");
        }
        assert_eq!(s.ended(), Some(RunEnd::LaserPattern));
        assert!(frames >= 59);
    }

    #[test]
    fn test_ended_run_stays_frozen_until_reset() {
        let mut s = Session::new(3);
        s.spawner_mut().place(
            crate::sim::spawner::pool()
                .iter()
                .find(|e| e.name == "castle")
                .unwrap(),
        );
        // Walk the castle into the grounded player
        while !s.advance(SIM_DT, false) {}
        assert_eq!(s.ended(), Some(RunEnd::Hazard(HazardHit::Ground)));
        let ticks = s.ticks();
        assert!(s.advance(1.0, false));
        assert_eq!(s.ticks(), ticks);

        s.start_laser_pattern(LaserCatalog::standard().find("M1").unwrap());
        s.reset();
        assert!(!s.is_over());
        assert_eq!(s.distance_px(), 0.0);
        assert!(!s.pattern_player().is_active());
        assert!(s.spawner().ground_hazards().is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut s = Session::new(5);
        s.advance(SIM_DT, true);
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        assert!(json.contains("\"meters\""));
        assert!(json.contains("\"groundHazards\""));
        assert!(json.contains("\"ended\":null"));
    }
}

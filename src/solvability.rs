//! Offline survivability check for laser patterns
//!
//! Steps a pattern at a fixed `dt` and tracks every player height that can
//! still be alive. Heights are the player's top edge, from the ceiling
//! (0) down to resting on the ground. Between steps the reachable band
//! widens by what terminal velocity allows, then gets cut down to the
//! rows no deadly beam touches. A pattern passes if the band never empties.
//!
//! Only authored `active` spans block. The warn lead-in is cosmetic.

use serde::Serialize;

use crate::consts::*;
use crate::export::ExportConfig;
use crate::sim::{BeamState, BeamTrack, LaserPattern, Rect, Tier, beam_hits_rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    pub ground_y: f32,
    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub beam_thickness: f32,
    pub max_rise: f32,
    pub max_fall: f32,
    /// Vertical resolution of the safe-row scan (px)
    pub row_step: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::from(ExportConfig::default())
    }
}

impl From<ExportConfig> for SolverConfig {
    fn from(c: ExportConfig) -> Self {
        Self {
            ground_y: c.ground_y,
            player_x: c.player_start_x,
            player_width: c.player_width,
            player_height: c.player_height,
            beam_thickness: c.laser_beam_thickness,
            max_rise: c.terminal_vel_up,
            max_fall: c.terminal_vel_down,
            row_step: 2.0,
        }
    }
}

impl SolverConfig {
    /// Lowest top edge the player can have
    fn floor_y(&self) -> f32 {
        self.ground_y - self.player_height
    }

    fn hitbox_at(&self, y: f32) -> Rect {
        Rect::new(self.player_x, y, self.player_width, self.player_height)
    }
}

/// Closed interval of player top-edge heights
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Span {
    pub lo: f32,
    pub hi: f32,
}

impl Span {
    pub fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    fn intersect(&self, other: &Span) -> Option<Span> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo <= hi).then_some(Span { lo, hi })
    }
}

/// Sort and join overlapping or touching spans
pub fn merge_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| a.lo.total_cmp(&b.lo));
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for s in spans {
        match merged.last_mut() {
            Some(last) if s.lo <= last.hi => last.hi = last.hi.max(s.hi),
            _ => merged.push(s),
        }
    }
    merged
}

/// Heights at which some active beam touches the player at time `t`
pub fn blocked_rows(tracks: &[BeamTrack], t: f32, config: &SolverConfig) -> Vec<Span> {
    let beams: Vec<_> = tracks
        .iter()
        .filter_map(|track| track.sample(t))
        .filter(|s| s.authored == BeamState::Active)
        .collect();
    if beams.is_empty() {
        return Vec::new();
    }

    let floor = config.floor_y();
    let rows = (floor / config.row_step).ceil() as usize;
    let mut spans = Vec::new();
    for i in 0..=rows {
        let y = (i as f32 * config.row_step).min(floor);
        let hitbox = config.hitbox_at(y);
        if beams
            .iter()
            .any(|b| beam_hits_rect(b.start, b.end, config.beam_thickness, &hitbox))
        {
            // A blocked sample poisons the half-row on either side of it
            let half = config.row_step / 2.0;
            spans.push(Span::new((y - half).max(0.0), (y + half).min(floor)));
        }
    }
    merge_spans(spans)
}

/// Complement of `blocked` within the playable band
pub fn safe_rows(blocked: &[Span], config: &SolverConfig) -> Vec<Span> {
    let floor = config.floor_y();
    let mut safe = Vec::new();
    let mut cursor = 0.0;
    for b in blocked {
        if b.lo > cursor {
            safe.push(Span::new(cursor, b.lo));
        }
        cursor = cursor.max(b.hi);
    }
    if cursor < floor {
        safe.push(Span::new(cursor, floor));
    }
    safe
}

/// Widen every reachable span by one step of travel and keep what is safe
pub fn advance_frontier(reachable: &[Span], safe: &[Span], dt: f32, config: &SolverConfig) -> Vec<Span> {
    let floor = config.floor_y();
    let grown = merge_spans(
        reachable
            .iter()
            .map(|r| Span::new((r.lo - config.max_rise * dt).max(0.0), (r.hi + config.max_fall * dt).min(floor)))
            .collect(),
    );
    let next = grown
        .iter()
        .flat_map(|g| safe.iter().filter_map(move |s| g.intersect(s)))
        .collect();
    merge_spans(next)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternResult {
    pub id: String,
    pub name: String,
    pub tier: Tier,
    pub passed: bool,
    /// First time the reachable band emptied
    pub failed_at: Option<f32>,
    /// Narrowest reachable band over the run (px)
    pub tightest: f32,
    pub steps: u32,
}

impl PatternResult {
    pub fn report_line(&self) -> String {
        match self.failed_at {
            None => format!(
                "[PASS] {} ({}) tightest band {:.0}px over {} steps",
                self.name, self.tier, self.tightest, self.steps
            ),
            Some(t) => format!("[FAIL] {} ({}) no safe height at t={t:.2}s", self.name, self.tier),
        }
    }
}

pub fn analyze_pattern(pattern: &LaserPattern, dt: f32, config: &SolverConfig) -> PatternResult {
    let tracks: Vec<BeamTrack> = pattern.lasers.iter().map(BeamTrack::new).collect();
    let dt = if dt > 0.0 { dt } else { SIM_DT };

    let mut reachable = safe_rows(&blocked_rows(&tracks, 0.0, config), config);
    let mut tightest = band_width(&reachable);
    let mut failed_at = reachable.is_empty().then_some(0.0);
    let mut steps = 0;

    let total = (pattern.duration / dt).ceil() as u32;
    while failed_at.is_none() && steps < total {
        steps += 1;
        let t = steps as f32 * dt;
        let safe = safe_rows(&blocked_rows(&tracks, t, config), config);
        reachable = advance_frontier(&reachable, &safe, dt, config);
        if reachable.is_empty() {
            failed_at = Some(t);
        } else {
            tightest = tightest.min(band_width(&reachable));
        }
    }

    let result = PatternResult {
        id: pattern.id.clone(),
        name: pattern.name.clone(),
        tier: pattern.tier,
        passed: failed_at.is_none(),
        failed_at,
        tightest,
        steps,
    };
    if !result.passed {
        log::warn!("{}", result.report_line());
    }
    result
}

fn band_width(spans: &[Span]) -> f32 {
    spans.iter().map(|s| s.hi - s.lo).fold(0.0, f32::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BeamTimeline, Keyframe, LaserCatalog};

    fn wall(active_from: f32, duration: f32) -> LaserPattern {
        // Beams every 20px from ceiling to ground leave no gap for a 30px player
        let lasers = (0..=20)
            .map(|i| {
                let y = i as f32 * 20.0;
                BeamTimeline::once(vec![
                    Keyframe::horizontal(0.0, y, BeamState::Off),
                    Keyframe::horizontal(active_from, y, BeamState::Active),
                    Keyframe::horizontal(duration, y, BeamState::Active),
                ])
            })
            .collect();
        LaserPattern {
            id: "W".into(),
            name: "W: Wall".into(),
            tier: Tier::Extreme,
            duration,
            lasers,
        }
    }

    #[test]
    fn test_merge_joins_touching() {
        let merged = merge_spans(vec![Span::new(10.0, 20.0), Span::new(0.0, 5.0), Span::new(5.0, 12.0)]);
        assert_eq!(merged, vec![Span::new(0.0, 20.0)]);
        let apart = merge_spans(vec![Span::new(0.0, 1.0), Span::new(2.0, 3.0)]);
        assert_eq!(apart.len(), 2);
    }

    #[test]
    fn test_safe_rows_complement() {
        let config = SolverConfig::default();
        let safe = safe_rows(&[Span::new(100.0, 150.0)], &config);
        assert_eq!(safe, vec![Span::new(0.0, 100.0), Span::new(150.0, GROUND_Y - PLAYER_HEIGHT)]);
        assert_eq!(safe_rows(&[], &config), vec![Span::new(0.0, 370.0)]);
    }

    #[test]
    fn test_single_beam_blocks_its_band() {
        let config = SolverConfig::default();
        let track = BeamTrack::new(&BeamTimeline::once(vec![Keyframe::horizontal(0.0, 200.0, BeamState::Active)]));
        let blocked = blocked_rows(&[track], 0.0, &config);
        assert_eq!(blocked.len(), 1);
        // Player top from 200-8-30 to 200+8 touches the beam
        assert!(blocked[0].lo <= 163.0 && blocked[0].lo >= 160.0);
        assert!(blocked[0].hi >= 207.0 && blocked[0].hi <= 210.0);
    }

    #[test]
    fn test_frontier_limited_by_speed() {
        let config = SolverConfig::default();
        let safe = vec![Span::new(0.0, 50.0), Span::new(300.0, 370.0)];
        // From the ground one step cannot reach the top band
        let next = advance_frontier(&[Span::new(370.0, 370.0)], &safe, SIM_DT, &config);
        assert_eq!(next.len(), 1);
        assert!(next[0].lo >= 300.0);
    }

    #[test]
    fn test_wall_fails_when_it_lights() {
        let result = analyze_pattern(&wall(1.0, 3.0), SIM_DT, &SolverConfig::default());
        assert!(!result.passed);
        let t = result.failed_at.unwrap();
        assert!((t - 1.0).abs() < 2.0 * SIM_DT, "failed at {t}");
        assert!(result.report_line().starts_with("[FAIL]"));
    }

    #[test]
    fn test_empty_pattern_passes() {
        let pattern = LaserPattern {
            lasers: Vec::new(),
            ..wall(1.0, 2.0)
        };
        let result = analyze_pattern(&pattern, SIM_DT, &SolverConfig::default());
        assert!(result.passed);
        assert_eq!(result.tightest, GROUND_Y - PLAYER_HEIGHT);
        assert!(result.report_line().starts_with("[PASS]"));
    }

    #[test]
    fn test_easy_beat_is_survivable() {
        let catalog = LaserCatalog::standard();
        let result = analyze_pattern(catalog.find("M2").unwrap(), SIM_DT, &SolverConfig::default());
        assert!(result.passed, "{}", result.report_line());
        assert_eq!(result.steps, (12.0 / SIM_DT).ceil() as u32);
    }
}

//! Keyframed beam timelines
//!
//! A timeline is a list of two-endpoint beam keyframes. Sampling lerps the
//! endpoints between the bracketing pair and derives the visible state.
//! Authors only mark `active` spans; the one-second `warn` telegraph before
//! each active span is derived here so every pattern gets the same lead-in
//! no matter how its keyframes were written.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_WIDTH, LASER_WARN_WINDOW};

/// Visibility state of a beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeamState {
    /// Invisible, harmless
    Off,
    /// Dashed telegraph line, harmless
    Warn,
    /// Deadly
    Active,
}

/// One timestamped beam position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub t: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub state: BeamState,
}

impl Keyframe {
    pub fn new(t: f32, start: Vec2, end: Vec2, state: BeamState) -> Self {
        Self {
            t,
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
            state,
        }
    }

    /// Full-width horizontal beam at height `y`
    pub fn horizontal(t: f32, y: f32, state: BeamState) -> Self {
        Self {
            t,
            x1: 0.0,
            y1: y,
            x2: CANVAS_WIDTH,
            y2: y,
            state,
        }
    }

    #[inline]
    pub fn start(&self) -> Vec2 {
        Vec2::new(self.x1, self.y1)
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        Vec2::new(self.x2, self.y2)
    }

    /// Same keyframe, shifted later by `delay`
    pub fn delayed(&self, delay: f32) -> Self {
        Self {
            t: self.t + delay,
            ..*self
        }
    }
}

fn default_loop() -> bool {
    true
}

/// Authored beam timeline (static data)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamTimeline {
    #[serde(rename = "loop", default = "default_loop")]
    pub looping: bool,
    pub keyframes: Vec<Keyframe>,
}

impl BeamTimeline {
    pub fn looping(keyframes: Vec<Keyframe>) -> Self {
        Self {
            looping: true,
            keyframes,
        }
    }

    pub fn once(keyframes: Vec<Keyframe>) -> Self {
        Self {
            looping: false,
            keyframes,
        }
    }

    /// Last keyframe's time (0 for an empty timeline)
    pub fn cycle_duration(&self) -> f32 {
        self.keyframes.last().map(|k| k.t).unwrap_or(0.0)
    }

    /// Shift every keyframe later by `pad` and hold an `off` copy of the
    /// first keyframe at t=0
    pub fn with_startup_pad(&self, pad: f32) -> Self {
        let Some(first) = self.keyframes.first() else {
            return self.clone();
        };
        if pad <= 0.0 {
            return self.clone();
        }
        let mut keyframes = Vec::with_capacity(self.keyframes.len() + 1);
        keyframes.push(Keyframe {
            t: 0.0,
            state: BeamState::Off,
            ..*first
        });
        keyframes.extend(self.keyframes.iter().map(|k| k.delayed(pad)));
        Self {
            looping: self.looping,
            keyframes,
        }
    }
}

/// Interpolated beam at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeamSample {
    pub start: Vec2,
    pub end: Vec2,
    /// Effective state after the warn-window rule
    pub state: BeamState,
    /// State as written in the keyframes
    pub authored: BeamState,
}

impl BeamSample {
    #[inline]
    pub fn is_deadly(&self) -> bool {
        self.state == BeamState::Active
    }
}

/// Playback of one timeline: derived cycle data plus an elapsed accumulator
#[derive(Debug, Clone)]
pub struct BeamTrack {
    keyframes: Vec<Keyframe>,
    looping: bool,
    cycle_duration: f32,
    /// Sorted times where the authored state turns active
    active_starts: Vec<f32>,
    pub elapsed: f32,
}

impl BeamTrack {
    pub fn new(timeline: &BeamTimeline) -> Self {
        Self {
            keyframes: timeline.keyframes.clone(),
            looping: timeline.looping,
            cycle_duration: timeline.cycle_duration(),
            active_starts: collect_active_starts(&timeline.keyframes, timeline.looping),
            elapsed: 0.0,
        }
    }

    pub fn cycle_duration(&self) -> f32 {
        self.cycle_duration
    }

    pub fn active_starts(&self) -> &[f32] {
        &self.active_starts
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Sample at the track's own elapsed time
    pub fn current(&self) -> Option<BeamSample> {
        self.sample(self.elapsed)
    }

    /// Sample the beam at `elapsed` seconds. `None` for an empty timeline.
    pub fn sample(&self, elapsed: f32) -> Option<BeamSample> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;

        let mut t = elapsed;
        if self.looping && self.cycle_duration > 0.0 {
            t = t.rem_euclid(self.cycle_duration);
        }

        if t <= first.t {
            return Some(self.held(first, t));
        }
        if t >= last.t {
            return Some(self.held(last, t));
        }

        // first.t < t < last.t, so 1 <= idx < len
        let idx = self.keyframes.partition_point(|k| k.t <= t);
        let a = &self.keyframes[idx - 1];
        let b = &self.keyframes[idx];
        let seg = b.t - a.t;
        let frac = if seg > 0.0 { (t - a.t) / seg } else { 0.0 };

        Some(BeamSample {
            start: a.start().lerp(b.start(), frac),
            end: a.end().lerp(b.end(), frac),
            state: self.effective_state(a.state, t),
            authored: a.state,
        })
    }

    fn held(&self, k: &Keyframe, t: f32) -> BeamSample {
        BeamSample {
            start: k.start(),
            end: k.end(),
            state: self.effective_state(k.state, t),
            authored: k.state,
        }
    }

    /// Active passes through; anything else becomes `warn` inside the lead-in
    /// window of the next active start and `off` otherwise.
    fn effective_state(&self, authored: BeamState, t: f32) -> BeamState {
        if authored == BeamState::Active {
            return BeamState::Active;
        }
        match self.time_until_next_active_start(t) {
            Some(dt) if dt > 0.0 && dt <= LASER_WARN_WINDOW => BeamState::Warn,
            _ => BeamState::Off,
        }
    }

    fn time_until_next_active_start(&self, t: f32) -> Option<f32> {
        let wrap = self.looping && self.cycle_duration > 0.0;
        self.active_starts
            .iter()
            .filter_map(|&s| {
                let mut dt = s - t;
                if wrap {
                    if dt <= 0.0 {
                        dt += self.cycle_duration;
                    }
                    Some(dt)
                } else if dt > 0.0 {
                    Some(dt)
                } else {
                    None
                }
            })
            .min_by(f32::total_cmp)
    }
}

fn collect_active_starts(keyframes: &[Keyframe], looping: bool) -> Vec<f32> {
    let Some(first) = keyframes.first() else {
        return Vec::new();
    };

    let mut starts = Vec::new();
    if first.state == BeamState::Active {
        starts.push(0.0);
    }
    for pair in keyframes.windows(2) {
        if pair[0].state != BeamState::Active && pair[1].state == BeamState::Active {
            starts.push(pair[1].t);
        }
    }
    if looping && keyframes.len() > 1 {
        let last = &keyframes[keyframes.len() - 1];
        if last.state != BeamState::Active && first.state == BeamState::Active {
            starts.push(0.0);
        }
    }

    starts.sort_by(f32::total_cmp);
    starts.dedup();
    starts
}

#[cfg(test)]
mod tests {
    use super::*;
    use BeamState::*;

    fn gate(windows: &[(f32, f32)], cycle: f32) -> BeamTrack {
        let mut times = vec![0.0, cycle];
        for &(s, e) in windows {
            times.push(s);
            times.push(e);
        }
        times.sort_by(f32::total_cmp);
        times.dedup();
        let keyframes = times
            .into_iter()
            .map(|t| {
                let on = windows.iter().any(|&(s, e)| t >= s && t < e);
                Keyframe::horizontal(t, 200.0, if on { Active } else { Off })
            })
            .collect();
        BeamTrack::new(&BeamTimeline::looping(keyframes))
    }

    #[test]
    fn test_empty_timeline_samples_nothing() {
        let track = BeamTrack::new(&BeamTimeline::looping(Vec::new()));
        assert!(track.sample(0.0).is_none());
        assert!(track.sample(3.7).is_none());
        assert!(track.active_starts().is_empty());
    }

    #[test]
    fn test_lerps_between_keyframes() {
        let track = BeamTrack::new(&BeamTimeline::once(vec![
            Keyframe::horizontal(0.0, 400.0, Active),
            Keyframe::horizontal(2.0, 0.0, Active),
        ]));
        let s = track.sample(0.5).unwrap();
        assert!((s.start.y - 300.0).abs() < 1e-4);
        assert!((s.end.y - 300.0).abs() < 1e-4);
        assert_eq!(s.end.x, CANVAS_WIDTH);
        assert_eq!(s.state, Active);
    }

    #[test]
    fn test_clamps_outside_range_when_not_looping() {
        let track = BeamTrack::new(&BeamTimeline::once(vec![
            Keyframe::horizontal(1.0, 100.0, Off),
            Keyframe::horizontal(2.0, 300.0, Off),
        ]));
        assert_eq!(track.sample(0.0).unwrap().start.y, 100.0);
        assert_eq!(track.sample(9.0).unwrap().start.y, 300.0);
    }

    #[test]
    fn test_zero_length_segment_uses_first_keyframe() {
        let track = BeamTrack::new(&BeamTimeline::once(vec![
            Keyframe::horizontal(0.0, 100.0, Off),
            Keyframe::horizontal(1.0, 100.0, Off),
            Keyframe::horizontal(1.0, 250.0, Active),
            Keyframe::horizontal(2.0, 250.0, Active),
        ]));
        let s = track.sample(1.0).unwrap();
        assert_eq!(s.start.y, 250.0);
        assert_eq!(s.state, Active);
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let track = gate(&[(1.0, 1.8), (3.0, 3.5)], 4.0);
        for i in 0..80 {
            let t = i as f32 * 0.0731;
            assert_eq!(track.sample(t), track.sample(t));
        }
    }

    #[test]
    fn test_looping_is_periodic() {
        let track = BeamTrack::new(&BeamTimeline::looping(vec![
            Keyframe::horizontal(0.0, 400.0, Off),
            Keyframe::horizontal(1.5, 200.0, Active),
            Keyframe::horizontal(2.75, 0.0, Off),
            Keyframe::horizontal(4.25, 200.0, Active),
            Keyframe::horizontal(5.5, 400.0, Off),
        ]));
        let cycle = track.cycle_duration();
        assert_eq!(cycle, 5.5);
        for i in 0..40 {
            let t = 0.037 + i as f32 * 0.131;
            let a = track.sample(t).unwrap();
            let b = track.sample(t + cycle).unwrap();
            assert_eq!(a.state, b.state, "state mismatch at t={t}");
            assert!((a.start - b.start).length() < 1e-2);
            assert!((a.end - b.end).length() < 1e-2);
        }
    }

    #[test]
    fn test_warn_window_precedes_active_start() {
        let track = gate(&[(2.0, 2.8)], 6.0);
        assert_eq!(track.active_starts(), &[2.0]);
        assert_eq!(track.sample(2.0 - 0.5).unwrap().state, Warn);
        assert_eq!(track.sample(2.0 - 1.5).unwrap().state, Off);
        assert_eq!(track.sample(2.4).unwrap().state, Active);
        assert_eq!(track.sample(3.5).unwrap().state, Off);
    }

    #[test]
    fn test_warn_window_wraps_through_cycle_end() {
        // Active from t=0, so the lead-in sits at the end of the previous cycle
        let track = gate(&[(0.0, 1.0)], 5.0);
        assert_eq!(track.active_starts(), &[0.0]);
        assert_eq!(track.sample(4.5).unwrap().state, Warn);
        assert_eq!(track.sample(3.5).unwrap().state, Off);
    }

    #[test]
    fn test_authored_warn_outside_window_is_off() {
        // Authored warn two seconds before the active start still renders off
        let track = BeamTrack::new(&BeamTimeline::once(vec![
            Keyframe::horizontal(0.0, 400.0, Warn),
            Keyframe::horizontal(3.0, 200.0, Active),
            Keyframe::horizontal(4.0, 200.0, Active),
        ]));
        let early = track.sample(0.5).unwrap();
        assert_eq!(early.authored, Warn);
        assert_eq!(early.state, Off);
        assert_eq!(track.sample(2.5).unwrap().state, Warn);
    }

    #[test]
    fn test_non_looping_has_no_warn_after_last_start() {
        let track = BeamTrack::new(&BeamTimeline::once(vec![
            Keyframe::horizontal(0.0, 100.0, Active),
            Keyframe::horizontal(1.0, 100.0, Off),
            Keyframe::horizontal(5.0, 100.0, Off),
        ]));
        assert_eq!(track.sample(4.5).unwrap().state, Off);
    }

    #[test]
    fn test_timed_gate_single_window() {
        let track = gate(&[(1.0, 1.8)], 4.0);
        let early = track.sample(0.5).unwrap();
        assert_eq!(early.authored, Off);
        // Inside the one-second lead-in of the 1.0s start
        assert_eq!(early.state, Warn);
        assert_eq!(track.sample(1.2).unwrap().state, Active);
        assert_eq!(track.sample(2.0).unwrap().state, Off);
        assert_eq!(track.sample(2.0).unwrap().authored, Off);
    }

    #[test]
    fn test_startup_pad_shifts_keyframes() {
        let timeline = BeamTimeline::looping(vec![
            Keyframe::horizontal(0.0, 120.0, Active),
            Keyframe::horizontal(2.0, 120.0, Off),
        ]);
        let padded = timeline.with_startup_pad(1.0);
        assert_eq!(padded.keyframes.len(), 3);
        assert_eq!(padded.keyframes[0].t, 0.0);
        assert_eq!(padded.keyframes[0].state, Off);
        assert_eq!(padded.keyframes[0].y1, 120.0);
        assert_eq!(padded.keyframes[1].t, 1.0);
        assert_eq!(padded.cycle_duration(), 3.0);
        assert_eq!(timeline.with_startup_pad(0.0), timeline);
    }

    #[test]
    fn test_timeline_json_defaults_loop() {
        let json = r#"{"keyframes":[{"t":0.0,"x1":0,"y1":1,"x2":2,"y2":3,"state":"warn"}]}"#;
        let timeline: BeamTimeline = serde_json::from_str(json).unwrap();
        assert!(timeline.looping);
        assert_eq!(timeline.keyframes[0].state, Warn);
    }
}

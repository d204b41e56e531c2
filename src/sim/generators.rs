//! Keyframe generators for laser patterns
//!
//! Patterns are written "path first": describe where the safe lane or the
//! beam endpoints go, and let these builders expand that into keyframes.

use std::f32::consts::TAU;

use glam::Vec2;

use super::timeline::{BeamState, BeamTimeline, Keyframe};

/// Keyframe times closer than this are treated as the same instant
const TIME_EPSILON: f32 = 1e-4;

/// Looping full-width beam stepping through `(t, y, state)` stops
pub fn horizontal_sweep(stops: &[(f32, f32, BeamState)]) -> BeamTimeline {
    BeamTimeline::looping(
        stops
            .iter()
            .map(|&(t, y, state)| Keyframe::horizontal(t, y, state))
            .collect(),
    )
}

/// Beam rotating about `pivot` from `angle_start` to `angle_end`, sampled in
/// `steps` segments so the swept tip traces the arc instead of a chord
#[allow(clippy::too_many_arguments)]
pub fn arc_sweep(
    pivot: Vec2,
    length: f32,
    t_start: f32,
    t_end: f32,
    angle_start: f32,
    angle_end: f32,
    steps: u32,
    state: BeamState,
) -> Vec<Keyframe> {
    let steps = steps.max(1);
    (0..=steps)
        .map(|i| {
            let frac = i as f32 / steps as f32;
            let t = t_start + (t_end - t_start) * frac;
            let angle = angle_start + (angle_end - angle_start) * frac;
            let tip = pivot + Vec2::from_angle(angle) * length;
            Keyframe::new(t, pivot, tip, state)
        })
        .collect()
}

/// Center of the safe lane at time `t`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub t: f32,
    pub center_y: f32,
}

/// Sine-shaped lane
#[derive(Debug, Clone, Copy)]
pub struct SineLane {
    pub start_t: f32,
    pub end_t: f32,
    pub samples: u32,
    pub center_y: f32,
    pub amplitude: f32,
    pub period: f32,
}

impl SineLane {
    pub fn waypoints(&self) -> Vec<Waypoint> {
        let samples = self.samples.max(1);
        (0..=samples)
            .map(|i| {
                let frac = i as f32 / samples as f32;
                let t = self.start_t + (self.end_t - self.start_t) * frac;
                let phase = (t - self.start_t) / self.period;
                Waypoint {
                    t,
                    center_y: self.center_y + self.amplitude * (phase * TAU).sin(),
                }
            })
            .collect()
    }
}

/// Sine lane riding a half-cosine envelope: dips by `trend_amplitude` at
/// mid-cycle and comes back up
#[derive(Debug, Clone, Copy)]
pub struct DownUpLane {
    pub start_t: f32,
    pub end_t: f32,
    pub samples: u32,
    pub center_y: f32,
    pub wave_amplitude: f32,
    pub wave_period: f32,
    pub trend_amplitude: f32,
}

impl DownUpLane {
    pub fn waypoints(&self) -> Vec<Waypoint> {
        let samples = self.samples.max(1);
        (0..=samples)
            .map(|i| {
                let frac = i as f32 / samples as f32;
                let t = self.start_t + (self.end_t - self.start_t) * frac;
                let wave =
                    self.wave_amplitude * ((t - self.start_t) / self.wave_period * TAU).sin();
                let trend = self.trend_amplitude * (1.0 - (frac * TAU).cos()) * 0.5;
                Waypoint {
                    t,
                    center_y: self.center_y + trend + wave,
                }
            })
            .collect()
    }
}

/// Which wall of a corridor a beam forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorSide {
    Top,
    Bottom,
}

impl CorridorSide {
    fn sign(self) -> f32 {
        match self {
            CorridorSide::Top => -1.0,
            CorridorSide::Bottom => 1.0,
        }
    }
}

/// One wall of a moving corridor: off until the first waypoint, active along
/// the waypoints, off again after the last one until `cycle`
pub fn corridor_beam(waypoints: &[Waypoint], gap: f32, side: CorridorSide, cycle: f32) -> BeamTimeline {
    let (Some(first), Some(last)) = (waypoints.first(), waypoints.last()) else {
        return BeamTimeline::looping(Vec::new());
    };
    let y = |w: &Waypoint| w.center_y + side.sign() * gap * 0.5;

    let mut keyframes = Vec::with_capacity(waypoints.len() + 3);
    keyframes.push(Keyframe::horizontal(0.0, y(first), BeamState::Off));
    keyframes.push(Keyframe::horizontal(first.t, y(first), BeamState::Active));
    keyframes.extend(
        waypoints[1..]
            .iter()
            .map(|w| Keyframe::horizontal(w.t, y(w), BeamState::Active)),
    );
    keyframes.push(Keyframe::horizontal(last.t, y(last), BeamState::Off));
    keyframes.push(Keyframe::horizontal(cycle, y(first), BeamState::Off));
    BeamTimeline::looping(keyframes)
}

/// Top and bottom walls of a corridor `gap` pixels tall
pub fn corridor(waypoints: &[Waypoint], gap: f32, cycle: f32) -> [BeamTimeline; 2] {
    [
        corridor_beam(waypoints, gap, CorridorSide::Top, cycle),
        corridor_beam(waypoints, gap, CorridorSide::Bottom, cycle),
    ]
}

/// Half-open `[start, end)` window in seconds or orbit phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub start: f32,
    pub end: f32,
}

impl Window {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, t: f32) -> bool {
        t >= self.start && t < self.end
    }

    /// Membership for a window on the unit circle (`start > end` wraps)
    #[inline]
    pub fn contains_wrapped(&self, p: f32) -> bool {
        if self.start <= self.end {
            self.contains(p)
        } else {
            p >= self.start || p < self.end
        }
    }
}

/// Fixed-height beam that switches on inside each window
pub fn timed_gate(y: f32, windows: &[Window], cycle: f32) -> BeamTimeline {
    let mut times = vec![0.0, cycle];
    for w in windows {
        times.push(w.start);
        times.push(w.end);
    }
    sort_times(&mut times);

    BeamTimeline::looping(
        times
            .into_iter()
            .map(|t| {
                let state = if windows.iter().any(|w| w.contains(t)) {
                    BeamState::Active
                } else {
                    BeamState::Off
                };
                Keyframe::horizontal(t, y, state)
            })
            .collect(),
    )
}

/// Beam whose endpoints travel the perimeter of a square, half a turn apart,
/// so it always crosses the center
#[derive(Debug, Clone)]
pub struct SquareOrbit {
    pub left: f32,
    pub top: f32,
    pub size: f32,
    /// Seconds per full turn
    pub cycle: f32,
    pub samples: u32,
    /// Active windows as orbit-phase fractions in [0, 1)
    pub windows: Vec<Window>,
}

impl SquareOrbit {
    /// Point at phase `p` (turns) clockwise from the top-left corner
    pub fn edge_point(&self, p: f32) -> Vec2 {
        let q = p.rem_euclid(1.0) * 4.0;
        let (left, top, size) = (self.left, self.top, self.size);
        let right = left + size;
        let bottom = top + size;

        if q < 1.0 {
            Vec2::new(left + size * q, top)
        } else if q < 2.0 {
            Vec2::new(right, top + size * (q - 1.0))
        } else if q < 3.0 {
            Vec2::new(right - size * (q - 2.0), bottom)
        } else {
            Vec2::new(left, bottom - size * (q - 3.0))
        }
    }

    fn is_active_at(&self, p: f32) -> bool {
        self.windows.iter().any(|w| w.contains_wrapped(p))
    }

    fn phase_at(&self, t: f32, offset: f32) -> f32 {
        (t / self.cycle + offset).rem_euclid(1.0)
    }

    /// Timeline for an endpoint pair starting `offset` turns into the orbit
    pub fn beam(&self, offset: f32) -> BeamTimeline {
        let mut times = vec![0.0, self.cycle];
        for w in &self.windows {
            times.push((w.start - offset).rem_euclid(1.0) * self.cycle);
            times.push((w.end - offset).rem_euclid(1.0) * self.cycle);
        }
        let samples = self.samples.max(1);
        times.extend((1..samples).map(|i| i as f32 / samples as f32 * self.cycle));
        sort_times(&mut times);

        // A keyframe's state covers the segment it opens, so classify by the
        // segment midpoint rather than the boundary phase itself
        let keyframes = times
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                let p = self.phase_at(t, offset);
                let mid = match times.get(i + 1) {
                    Some(&next) => (t + next) * 0.5,
                    None => times.get(1).map(|&n| n * 0.5).unwrap_or(t),
                };
                let state = if self.is_active_at(self.phase_at(mid, offset)) {
                    BeamState::Active
                } else {
                    BeamState::Off
                };
                Keyframe::new(t, self.edge_point(p), self.edge_point(p + 0.5), state)
            })
            .collect();
        BeamTimeline::looping(keyframes)
    }
}

/// One step of a row-matrix pattern: every row moves to `rows[i]` and takes
/// `state`
#[derive(Debug, Clone, Copy)]
pub struct MatrixEvent<const N: usize> {
    pub t: f32,
    pub rows: [f32; N],
    pub state: BeamState,
}

/// One timeline per row, following the event list
pub fn gap_shift_matrix<const N: usize>(events: &[MatrixEvent<N>]) -> Vec<BeamTimeline> {
    (0..N)
        .map(|row| {
            BeamTimeline::looping(
                events
                    .iter()
                    .map(|e| Keyframe::horizontal(e.t, e.rows[row], e.state))
                    .collect(),
            )
        })
        .collect()
}

fn sort_times(times: &mut Vec<f32>) {
    times.sort_by(f32::total_cmp);
    times.dedup_by(|a, b| (*a - *b).abs() < TIME_EPSILON);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timeline::BeamTrack;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_sine_lane_endpoints() {
        let lane = SineLane {
            start_t: 1.0,
            end_t: 5.0,
            samples: 20,
            center_y: 200.0,
            amplitude: 74.0,
            period: 4.4,
        };
        let wps = lane.waypoints();
        assert_eq!(wps.len(), 21);
        assert_eq!(wps[0].t, 1.0);
        assert!((wps[20].t - 5.0).abs() < 1e-5);
        assert!((wps[0].center_y - 200.0).abs() < 1e-4);
        assert!(wps.iter().all(|w| (w.center_y - 200.0).abs() <= 74.0 + 1e-3));
    }

    #[test]
    fn test_down_up_lane_returns_to_center() {
        let lane = DownUpLane {
            start_t: 1.0,
            end_t: 5.2,
            samples: 28,
            center_y: 170.0,
            wave_amplitude: 0.0,
            wave_period: 2.2,
            trend_amplitude: 66.0,
        };
        let wps = lane.waypoints();
        assert!((wps[0].center_y - 170.0).abs() < 1e-3);
        assert!((wps[14].center_y - 236.0).abs() < 1e-3);
        assert!((wps[28].center_y - 170.0).abs() < 1e-3);
    }

    #[test]
    fn test_corridor_walls_straddle_center() {
        let wps = [
            Waypoint { t: 1.0, center_y: 200.0 },
            Waypoint { t: 3.0, center_y: 250.0 },
        ];
        let [top, bottom] = corridor(&wps, 100.0, 6.0);
        assert_eq!(top.keyframes.len(), 5);
        assert_eq!(top.keyframes[0].y1, 150.0);
        assert_eq!(top.keyframes[0].state, BeamState::Off);
        assert_eq!(top.keyframes[1].state, BeamState::Active);
        assert_eq!(bottom.keyframes[2].y1, 300.0);
        assert_eq!(bottom.keyframes[3].state, BeamState::Off);
        assert_eq!(bottom.cycle_duration(), 6.0);
    }

    #[test]
    fn test_timed_gate_keyframes_at_boundaries() {
        let tl = timed_gate(130.0, &[Window::new(1.1, 1.9), Window::new(4.2, 5.0)], 6.5);
        let times: Vec<f32> = tl.keyframes.iter().map(|k| k.t).collect();
        assert_eq!(times, vec![0.0, 1.1, 1.9, 4.2, 5.0, 6.5]);
        let states: Vec<BeamState> = tl.keyframes.iter().map(|k| k.state).collect();
        use BeamState::*;
        assert_eq!(states, vec![Off, Active, Off, Active, Off, Off]);
    }

    #[test]
    fn test_timed_gate_scenario() {
        // Single window [1.0, 1.8): authored off at 0.5, active at 1.2, off at 2.0
        let track = BeamTrack::new(&timed_gate(200.0, &[Window::new(1.0, 1.8)], 4.0));
        let early = track.sample(0.5).unwrap();
        assert_eq!(early.authored, BeamState::Off);
        assert_eq!(early.state, BeamState::Warn);
        assert_eq!(track.sample(1.2).unwrap().state, BeamState::Active);
        assert_eq!(track.sample(2.0).unwrap().state, BeamState::Off);
    }

    fn orbit() -> SquareOrbit {
        SquareOrbit {
            left: 80.0,
            top: 0.0,
            size: 400.0,
            cycle: 10.0,
            samples: 40,
            windows: vec![Window::new(0.70, 0.95), Window::new(0.20, 0.45)],
        }
    }

    #[test]
    fn test_square_edge_points() {
        let o = orbit();
        assert_eq!(o.edge_point(0.0), Vec2::new(80.0, 0.0));
        assert_eq!(o.edge_point(0.25), Vec2::new(480.0, 0.0));
        assert_eq!(o.edge_point(0.5), Vec2::new(480.0, 400.0));
        assert_eq!(o.edge_point(0.75), Vec2::new(80.0, 400.0));
        assert_eq!(o.edge_point(1.125), o.edge_point(0.125));
    }

    #[test]
    fn test_square_orbit_states_inside_windows() {
        let o = orbit();
        for offset in [0.0, 0.25] {
            let track = BeamTrack::new(&o.beam(offset));
            assert!((track.cycle_duration() - 10.0).abs() < 1e-5);
            // Phases well inside / outside the windows
            for (phase, expect) in [(0.1, false), (0.3, true), (0.55, false), (0.8, true)] {
                let t = (phase - offset).rem_euclid(1.0) * 10.0;
                let s = track.sample(t).unwrap();
                assert_eq!(s.authored == BeamState::Active, expect, "offset {offset} phase {phase}");
            }
        }
    }

    #[test]
    fn test_square_orbit_endpoints_half_turn_apart() {
        let o = orbit();
        let tl = o.beam(0.0);
        let center = Vec2::new(280.0, 200.0);
        for k in &tl.keyframes {
            let mid = (k.start() + k.end()) * 0.5;
            assert!((mid - center).length() < 1e-2, "beam at t={} misses center", k.t);
        }
    }

    #[test]
    fn test_gap_shift_matrix_rows() {
        use BeamState::*;
        let events = [
            MatrixEvent { t: 0.0, rows: [10.0, 20.0], state: Off },
            MatrixEvent { t: 1.0, rows: [30.0, 40.0], state: Active },
        ];
        let beams = gap_shift_matrix(&events);
        assert_eq!(beams.len(), 2);
        assert_eq!(beams[1].keyframes[1].y1, 40.0);
        assert_eq!(beams[0].keyframes[1].state, Active);
    }

    #[test]
    fn test_arc_sweep_traces_circle() {
        let pivot = Vec2::new(150.0, 0.0);
        let kfs = arc_sweep(pivot, 300.0, 0.0, 2.0, 0.0, FRAC_PI_2, 8, BeamState::Active);
        assert_eq!(kfs.len(), 9);
        for k in &kfs {
            assert_eq!(k.start(), pivot);
            assert!(((k.end() - pivot).length() - 300.0).abs() < 1e-2);
        }
        assert!((kfs[8].end() - Vec2::new(150.0, 300.0)).length() < 1e-2);
    }

    #[test]
    fn test_horizontal_sweep_loops() {
        let tl = horizontal_sweep(&[(0.0, 400.0, BeamState::Warn), (1.5, 200.0, BeamState::Active)]);
        assert!(tl.looping);
        assert_eq!(tl.keyframes[1].x2, crate::consts::CANVAS_WIDTH);
    }
}

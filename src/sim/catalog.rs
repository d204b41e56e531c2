//! Named full-screen laser patterns
//!
//! This catalog is its own selection path: the hazard spawner never draws
//! from it. Callers that want a choreography pick one by tier or id and hand
//! it to a `PatternPlayer`.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::HazardError;
use super::generators::{
    DownUpLane, MatrixEvent, SineLane, SquareOrbit, Window, corridor, gap_shift_matrix,
    horizontal_sweep, timed_gate,
};
use super::pattern::{LaserPattern, Tier};
use super::timeline::BeamState::{self, Active, Off, Warn};
use crate::consts::GROUND_Y;

/// Lead-in added in front of most patterns so the first beam never opens
/// deadly
const DEFAULT_STARTUP_PAD: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct LaserCatalog {
    patterns: Vec<LaserPattern>,
}

impl Default for LaserCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl LaserCatalog {
    /// Catalog from arbitrary patterns (e.g. loaded from an export)
    pub fn new(patterns: Vec<LaserPattern>) -> Self {
        Self { patterns }
    }

    /// The built-in set, in play order
    pub fn standard() -> Self {
        Self::new(vec![
            breezy_bend(),
            easy_beat(),
            serpent_run(),
            twin_arcs(),
            sky_lanes(),
            orbit_cross(),
            cyclone_ribbon(),
            pulse_matrix(),
            gap_shift(),
        ])
    }

    pub fn patterns(&self) -> &[LaserPattern] {
        &self.patterns
    }

    pub fn into_patterns(self) -> Vec<LaserPattern> {
        self.patterns
    }

    pub fn by_tier(&self, tier: Tier) -> Vec<&LaserPattern> {
        self.patterns.iter().filter(|p| p.tier == tier).collect()
    }

    pub fn find(&self, id: &str) -> Result<&LaserPattern, HazardError> {
        self.patterns
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| HazardError::UnknownPattern(id.to_string()))
    }

    /// Uniform draw from one tier. `None` if the tier has no patterns.
    pub fn pick<R: Rng + ?Sized>(&self, tier: Tier, rng: &mut R) -> Option<&LaserPattern> {
        self.by_tier(tier).choose(rng).copied()
    }
}

fn pattern(id: &str, name: &str, tier: Tier, duration: f32) -> LaserPattern {
    LaserPattern {
        id: id.to_string(),
        name: format!("{id}: {name}"),
        tier,
        duration,
        lasers: Vec::new(),
    }
}

fn breezy_bend() -> LaserPattern {
    let lane = SineLane {
        start_t: 1.0,
        end_t: 5.4,
        samples: 20,
        center_y: 205.0,
        amplitude: 66.0,
        period: 3.4,
    };
    LaserPattern {
        lasers: corridor(&lane.waypoints(), 232.0, 6.5).into(),
        ..pattern("M1", "Breezy Bend", Tier::Medium, 12.0)
    }
    .with_startup_pad(DEFAULT_STARTUP_PAD)
}

// Gentlest timed gate; its first window is far enough in that it runs unpadded
fn easy_beat() -> LaserPattern {
    LaserPattern {
        lasers: vec![
            timed_gate(130.0, &[Window::new(1.1, 1.9), Window::new(4.2, 5.0)], 6.5),
            timed_gate(270.0, &[Window::new(2.2, 3.0), Window::new(5.2, 6.0)], 6.5),
        ],
        ..pattern("M2", "Easy Beat", Tier::Medium, 12.0)
    }
}

fn serpent_run() -> LaserPattern {
    let lane = SineLane {
        start_t: 1.0,
        end_t: 5.0,
        samples: 20,
        center_y: 200.0,
        amplitude: 74.0,
        period: 4.4,
    };
    LaserPattern {
        lasers: corridor(&lane.waypoints(), 204.0, 6.0).into(),
        ..pattern("H1", "Serpent Run", Tier::Hard, 12.0)
    }
    .with_startup_pad(DEFAULT_STARTUP_PAD)
}

fn twin_arcs() -> LaserPattern {
    let waypoints = SineLane {
        start_t: 1.0,
        end_t: 5.0,
        samples: 24,
        center_y: 200.0,
        amplitude: 52.0,
        period: 2.6,
    }
    .waypoints();
    // Inner pair is the lane; the outer pair only adds rhythm
    let lasers = [160.0, 300.0]
        .into_iter()
        .flat_map(|gap| corridor(&waypoints, gap, 6.0))
        .collect();
    LaserPattern {
        lasers,
        ..pattern("H2", "Twin Arcs", Tier::Hard, 12.0)
    }
    .with_startup_pad(DEFAULT_STARTUP_PAD)
}

fn sky_lanes() -> LaserPattern {
    LaserPattern {
        lasers: vec![horizontal_sweep(&[
            (0.0, GROUND_Y, Warn),
            (1.5, 200.0, Active),
            (2.75, 0.0, Warn),
            (4.25, 200.0, Active),
            (5.5, GROUND_Y, Warn),
        ])],
        ..pattern("H3", "Sky Lanes", Tier::Hard, 11.0)
    }
    .with_startup_pad(0.5)
}

fn orbit_cross() -> LaserPattern {
    let orbit = SquareOrbit {
        left: 80.0,
        top: 0.0,
        size: GROUND_Y,
        cycle: 10.0,
        samples: 40,
        // Opposite endpoint reaches the bottom-left stretch half a turn later
        windows: vec![Window::new(0.70, 0.95), Window::new(0.20, 0.45)],
    };
    LaserPattern {
        lasers: vec![orbit.beam(0.0), orbit.beam(0.25)],
        ..pattern("H4", "Orbit Cross", Tier::Hard, 12.0)
    }
    .with_startup_pad(2.0)
}

fn cyclone_ribbon() -> LaserPattern {
    let waypoints = DownUpLane {
        start_t: 1.0,
        end_t: 5.2,
        samples: 28,
        center_y: 170.0,
        wave_amplitude: 36.0,
        wave_period: 2.2,
        trend_amplitude: 66.0,
    }
    .waypoints();
    let lasers = [152.0, 286.0]
        .into_iter()
        .flat_map(|gap| corridor(&waypoints, gap, 6.0))
        .collect();
    LaserPattern {
        lasers,
        ..pattern("X1", "Cyclone Ribbon", Tier::Extreme, 12.0)
    }
    .with_startup_pad(DEFAULT_STARTUP_PAD)
}

fn pulse_matrix() -> LaserPattern {
    let odd = [Window::new(1.0, 1.8), Window::new(4.6, 5.4)];
    let even = [Window::new(2.4, 3.2), Window::new(6.0, 6.8)];
    let lasers = [80.0, 140.0, 200.0, 260.0, 320.0]
        .into_iter()
        .enumerate()
        .map(|(i, y)| timed_gate(y, if i % 2 == 0 { &odd } else { &even }, 7.2))
        .collect();
    LaserPattern {
        lasers,
        ..pattern("X2", "Pulse Matrix", Tier::Extreme, 7.2)
    }
    .with_startup_pad(DEFAULT_STARTUP_PAD)
}

fn gap_shift() -> LaserPattern {
    // Open gap between rows 3-4, 2-3, 4-5, 1-2, 5-6
    const A: [f32; 6] = [40.0, 85.0, 130.0, 270.0, 315.0, 360.0];
    const B: [f32; 6] = [40.0, 85.0, 225.0, 270.0, 315.0, 360.0];
    const C: [f32; 6] = [40.0, 85.0, 130.0, 175.0, 315.0, 360.0];
    const D: [f32; 6] = [40.0, 180.0, 225.0, 270.0, 315.0, 360.0];
    const E: [f32; 6] = [40.0, 85.0, 130.0, 175.0, 220.0, 360.0];

    let ev = |t: f32, rows: [f32; 6], state: BeamState| MatrixEvent { t, rows, state };
    let events = [
        ev(0.0, A, Off),
        ev(1.0, A, Active),
        ev(1.8, A, Off),
        ev(2.6, B, Active),
        ev(3.4, B, Off),
        ev(4.2, C, Active),
        ev(5.0, C, Off),
        ev(5.8, D, Active),
        ev(6.6, D, Off),
        ev(7.4, E, Active),
        ev(8.2, E, Off),
        ev(9.0, A, Active),
        ev(9.8, A, Off),
        ev(10.4, A, Off),
    ];
    LaserPattern {
        lasers: gap_shift_matrix(&events),
        ..pattern("X3", "Gap Shift Matrix", Tier::Extreme, 10.4)
    }
    .with_startup_pad(DEFAULT_STARTUP_PAD)
}

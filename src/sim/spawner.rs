//! Procedural hazard spawning
//!
//! Hazards arrive as short pre-made patterns drawn from a tiered pool. Which
//! tier gets drawn depends on distance, and the empty gap between patterns
//! shrinks as the run goes on. Flyers run on their own timer, independent of
//! the pool, and sometimes arrive in small volleys.

use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::{Rect, rects_overlap};
use super::food::FoodField;
use super::hazards::{
    Flyer, GroundHazard, GroundKind, Laser, PivotSide, PunchedFlyer, SkyBlocker, SkyBlockerKind,
    Zapper,
};
use super::pattern::Tier;
use super::terrain::Terrain;
use crate::consts::*;
use crate::pixels_to_meters;
use crate::tuning::{Tuning, TuningError};

/// Zapper gap presets
const GAP_SMALL: f32 = ZAPPER_GAP_MIN;
const GAP_MEDIUM: f32 = (ZAPPER_GAP_MIN + ZAPPER_GAP_MAX) / 2.0;
const GAP_LARGE: f32 = ZAPPER_GAP_MAX;

/// Flyer spawn band inset from ceiling and ground
const FLYER_Y_MARGIN: f32 = 20.0;
/// Static beams stay this far (plus the beam thickness) from the edges
const BEAM_EDGE_CLEARANCE: f32 = 10.0;

/// One hazard inside a pool pattern. `x` is relative to the pattern start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementSpec {
    Ground {
        x: f32,
        kind: GroundKind,
    },
    /// Gap zapper; `gap_center` is 0 (top) ..= 1 (bottom) of the usable band
    Zapper {
        x: f32,
        gap_center: f32,
        gap_h: f32,
    },
    /// Ceiling-hung zapper; `reach` 0..=1 spans the min..max bar height
    HangingZapper {
        x: f32,
        reach: f32,
    },
    StaticLaser {
        x: f32,
        beam_center: f32,
        beam_width: Option<f32>,
    },
    SweepLaser {
        x: f32,
        side: PivotSide,
    },
    SkyBlocker {
        x: f32,
        kind: SkyBlockerKind,
    },
    /// Raised terrain, one elevation level per tile column
    Mound {
        x: f32,
        levels: &'static [u8],
    },
}

/// Pre-made layout in the spawner pool
#[derive(Debug, Clone, Copy)]
pub struct PatternEntry {
    pub name: &'static str,
    pub tier: Tier,
    /// Horizontal extent in pixels
    pub width: f32,
    pub elements: &'static [ElementSpec],
}

macro_rules! ground {
    ($x:expr, $kind:expr) => {
        ElementSpec::Ground { x: $x, kind: $kind }
    };
}

macro_rules! zap {
    ($x:expr, $center:expr, $gap:expr) => {
        ElementSpec::Zapper {
            x: $x,
            gap_center: $center,
            gap_h: $gap,
        }
    };
}

macro_rules! hang {
    ($x:expr, $reach:expr) => {
        ElementSpec::HangingZapper { x: $x, reach: $reach }
    };
}

macro_rules! beam {
    ($x:expr, $center:expr, $width:expr) => {
        ElementSpec::StaticLaser {
            x: $x,
            beam_center: $center,
            beam_width: $width,
        }
    };
}

macro_rules! sweep {
    ($x:expr, $side:expr) => {
        ElementSpec::SweepLaser { x: $x, side: $side }
    };
}

macro_rules! sky {
    ($x:expr, $kind:expr) => {
        ElementSpec::SkyBlocker { x: $x, kind: $kind }
    };
}

const fn entry(name: &'static str, tier: Tier, width: f32, elements: &'static [ElementSpec]) -> PatternEntry {
    PatternEntry {
        name,
        tier,
        width,
        elements,
    }
}

use GroundKind::{Boulder, OldIguana, PoolNoodle, SandCastle, TieDyeIguana};
use PivotSide::{Ceiling, Ground as Floor};
use SkyBlockerKind::{LargeAsteroid, MediumAsteroid, Pufferfish, SmallAsteroid};

static POOL: &[PatternEntry] = &[
    // --- easy ---
    entry("noodle", Tier::Easy, 15.0, &[ground!(0.0, PoolNoodle)]),
    entry("castle", Tier::Easy, 50.0, &[ground!(0.0, SandCastle)]),
    entry("iguana", Tier::Easy, 50.0, &[ground!(0.0, OldIguana)]),
    entry("noodle-castle", Tier::Easy, 250.0, &[ground!(0.0, PoolNoodle), ground!(200.0, SandCastle)]),
    entry("zap-mid", Tier::Easy, 30.0, &[zap!(0.0, 0.5, GAP_LARGE)]),
    entry("zap-high", Tier::Easy, 30.0, &[zap!(0.0, 0.3, GAP_LARGE)]),
    entry("zap-low", Tier::Easy, 30.0, &[zap!(0.0, 0.7, GAP_LARGE)]),
    entry("hang-short", Tier::Easy, 30.0, &[hang!(0.0, 0.0)]),
    entry("castle-zap", Tier::Easy, 350.0, &[ground!(0.0, SandCastle), zap!(300.0, 0.4, GAP_LARGE)]),
    // --- medium ---
    entry(
        "noodle-row",
        Tier::Medium,
        300.0,
        &[ground!(0.0, PoolNoodle), ground!(120.0, SandCastle), ground!(280.0, PoolNoodle)],
    ),
    entry("zap-step", Tier::Medium, 300.0, &[zap!(0.0, 0.3, GAP_MEDIUM), zap!(250.0, 0.7, GAP_MEDIUM)]),
    entry("castle-then-zap", Tier::Medium, 250.0, &[ground!(0.0, SandCastle), zap!(200.0, 0.5, GAP_MEDIUM)]),
    entry(
        "noodles-zap",
        Tier::Medium,
        280.0,
        &[ground!(0.0, PoolNoodle), ground!(80.0, PoolNoodle), zap!(230.0, 0.6, GAP_MEDIUM)],
    ),
    entry("zap-tight", Tier::Medium, 30.0, &[zap!(0.0, 0.5, GAP_MEDIUM)]),
    entry("zap-then-castle", Tier::Medium, 200.0, &[zap!(0.0, 0.4, GAP_MEDIUM), ground!(150.0, SandCastle)]),
    entry("beam-mid", Tier::Medium, 300.0, &[beam!(0.0, 0.45, None)]),
    entry("beam-high", Tier::Medium, 300.0, &[beam!(0.0, 0.25, None)]),
    entry("beam-low", Tier::Medium, 300.0, &[beam!(0.0, 0.7, None)]),
    entry("beam-noodle", Tier::Medium, 350.0, &[beam!(0.0, 0.65, None), ground!(200.0, PoolNoodle)]),
    entry("castle-beam", Tier::Medium, 400.0, &[ground!(0.0, SandCastle), beam!(150.0, 0.4, Some(250.0))]),
    entry("tie-dye-pair", Tier::Medium, 260.0, &[ground!(0.0, TieDyeIguana), ground!(200.0, TieDyeIguana)]),
    entry("hang-castle", Tier::Medium, 250.0, &[hang!(0.0, 0.5), ground!(200.0, SandCastle)]),
    entry("asteroid", Tier::Medium, 50.0, &[sky!(0.0, MediumAsteroid)]),
    entry(
        "mound-castle",
        Tier::Medium,
        160.0,
        &[ElementSpec::Mound { x: 0.0, levels: &[0, 1, 1, 0] }, ground!(55.0, SandCastle)],
    ),
    // --- hard ---
    entry("zap-pair", Tier::Hard, 200.0, &[zap!(0.0, 0.25, GAP_SMALL), zap!(160.0, 0.75, GAP_SMALL)]),
    entry(
        "gauntlet",
        Tier::Hard,
        400.0,
        &[
            ground!(0.0, SandCastle),
            ground!(80.0, PoolNoodle),
            ground!(200.0, SandCastle),
            zap!(350.0, 0.4, GAP_SMALL),
        ],
    ),
    entry(
        "zap-weave",
        Tier::Hard,
        380.0,
        &[zap!(0.0, 0.3, GAP_SMALL), zap!(170.0, 0.65, GAP_SMALL), zap!(340.0, 0.4, GAP_SMALL)],
    ),
    entry(
        "noodle-fence",
        Tier::Hard,
        280.0,
        &[
            ground!(0.0, PoolNoodle),
            ground!(60.0, PoolNoodle),
            ground!(120.0, PoolNoodle),
            ground!(220.0, SandCastle),
        ],
    ),
    entry("zap-castle", Tier::Hard, 230.0, &[zap!(0.0, 0.7, GAP_SMALL), ground!(180.0, SandCastle)]),
    entry("sweep-ceiling", Tier::Hard, 300.0, &[sweep!(150.0, Ceiling)]),
    entry("sweep-ground", Tier::Hard, 300.0, &[sweep!(150.0, Floor)]),
    entry("beam-castle", Tier::Hard, 400.0, &[beam!(0.0, 0.35, None), ground!(320.0, SandCastle)]),
    entry("sweep-noodle", Tier::Hard, 450.0, &[sweep!(100.0, Ceiling), ground!(380.0, PoolNoodle)]),
    entry("beam-split", Tier::Hard, 400.0, &[beam!(0.0, 0.3, Some(200.0)), beam!(0.0, 0.7, Some(200.0))]),
    entry("sweep-zap", Tier::Hard, 500.0, &[sweep!(80.0, Floor), zap!(400.0, 0.4, GAP_SMALL)]),
    entry("boulder-zap", Tier::Hard, 300.0, &[ground!(0.0, Boulder), zap!(250.0, 0.35, GAP_SMALL)]),
    entry("pufferfish", Tier::Hard, 180.0, &[sky!(0.0, Pufferfish)]),
    entry("asteroid-pair", Tier::Hard, 250.0, &[sky!(0.0, SmallAsteroid), sky!(178.0, LargeAsteroid)]),
    entry("hang-noodle", Tier::Hard, 300.0, &[hang!(0.0, 1.0), ground!(240.0, PoolNoodle)]),
];

/// The full spawner pool
pub fn pool() -> &'static [PatternEntry] {
    POOL
}

pub fn pool_for(tier: Tier) -> Vec<&'static PatternEntry> {
    POOL.iter().filter(|e| e.tier == tier).collect()
}

/// Which collection a collision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HazardHit {
    Ground,
    Zapper,
    Flyer,
    Laser,
    SkyBlocker,
}

/// Map a 0..=1 gap center (jittered) into the zapper band
fn resolve_gap_y<R: Rng + ?Sized>(gap_center: f32, gap_h: f32, rng: &mut R) -> f32 {
    let jitter = (rng.random::<f32>() * 2.0 - 1.0) * SPAWNER_GAP_CENTER_JITTER;
    let clamped = (gap_center + jitter).clamp(0.0, 1.0);
    let available = GROUND_Y - 2.0 * ZAPPER_GAP_MARGIN - gap_h;
    ZAPPER_GAP_MARGIN + available * clamped
}

/// Map a 0..=1 beam center into the band a beam can occupy
fn resolve_beam_y(beam_center: f32) -> f32 {
    let margin = LASER_BEAM_THICKNESS + BEAM_EDGE_CLEARANCE;
    margin + (GROUND_Y - 2.0 * margin) * beam_center.clamp(0.0, 1.0)
}

fn hanging_bar_height(reach: f32) -> f32 {
    ZAPPER_BOTTOM_OPEN_MIN_HEIGHT
        + (ZAPPER_BOTTOM_OPEN_MAX_HEIGHT - ZAPPER_BOTTOM_OPEN_MIN_HEIGHT) * reach.clamp(0.0, 1.0)
}

/// Run state of the hazard spawner
#[derive(Debug, Clone)]
pub struct Spawner {
    tuning: Tuning,
    rng: Pcg32,
    next_spawn_px: f32,
    patterns_placed: u32,

    ground: Vec<GroundHazard>,
    zappers: Vec<Zapper>,
    flyers: Vec<Flyer>,
    punched: Vec<PunchedFlyer>,
    lasers: Vec<Laser>,
    sky_blockers: Vec<SkyBlocker>,
    terrain: Terrain,
    food: FoodField,

    flyer_timer: f32,
    volley_queue: u32,
    volley_timer: f32,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Spawner with custom balance. The tuning must pass `Tuning::validate`.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning
            .validate()
            .inspect_err(|e| log::warn!("Rejected tuning: {e}"))?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut spawner = Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            next_spawn_px: 0.0,
            patterns_placed: 0,
            ground: Vec::new(),
            zappers: Vec::new(),
            flyers: Vec::new(),
            punched: Vec::new(),
            lasers: Vec::new(),
            sky_blockers: Vec::new(),
            terrain: Terrain::new(),
            food: FoodField::new(),
            flyer_timer: 0.0,
            volley_queue: 0,
            volley_timer: 0.0,
        };
        spawner.reset();
        spawner
    }

    /// Clear every collection and arm the first spawn at the grace distance
    pub fn reset(&mut self) {
        self.next_spawn_px = self.tuning.grace_distance;
        self.patterns_placed = 0;
        self.ground.clear();
        self.zappers.clear();
        self.flyers.clear();
        self.punched.clear();
        self.lasers.clear();
        self.sky_blockers.clear();
        self.terrain.reset();
        self.food.reset();
        self.flyer_timer = 0.0;
        self.volley_queue = 0;
        self.volley_timer = 0.0;
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn next_spawn_px(&self) -> f32 {
        self.next_spawn_px
    }

    pub fn patterns_placed(&self) -> u32 {
        self.patterns_placed
    }

    pub fn ground_hazards(&self) -> &[GroundHazard] {
        &self.ground
    }

    pub fn zappers(&self) -> &[Zapper] {
        &self.zappers
    }

    pub fn flyers(&self) -> &[Flyer] {
        &self.flyers
    }

    pub fn punched_flyers(&self) -> &[PunchedFlyer] {
        &self.punched
    }

    pub fn lasers(&self) -> &[Laser] {
        &self.lasers
    }

    pub fn sky_blockers(&self) -> &[SkyBlocker] {
        &self.sky_blockers
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn food(&self) -> &FoodField {
        &self.food
    }

    pub fn food_mut(&mut self) -> &mut FoodField {
        &mut self.food
    }

    /// Tier for a pattern placed at `meters`
    pub fn select_tier(&mut self, meters: f32) -> Tier {
        let r = self.rng.random::<f32>();
        self.tuning
            .tier_row(meters)
            .map(|row| row.pick(r))
            .unwrap_or(Tier::Easy)
    }

    pub fn update(&mut self, dt: f32, distance_px: f32, player_center: Vec2) {
        let meters = pixels_to_meters(distance_px);

        if distance_px >= self.next_spawn_px {
            let tier = self.select_tier(meters);
            let candidates = pool_for(tier);
            if let Some(&entry) = candidates.choose(&mut self.rng) {
                self.place(entry);
                self.next_spawn_px = distance_px + entry.width + self.tuning.gap_for(meters);
                log::debug!(
                    "Placed {tier} pattern {} at {meters}m, next at {:.0}px",
                    entry.name,
                    self.next_spawn_px
                );
            }
        }

        self.terrain.update(dt);
        let terrain = &self.terrain;
        for h in &mut self.ground {
            h.update(dt, terrain);
        }
        self.ground.retain(|h| !h.is_off_screen());

        for z in &mut self.zappers {
            z.update(dt);
        }
        self.zappers.retain(|z| !z.is_off_screen());

        for l in &mut self.lasers {
            l.update(dt);
        }
        self.lasers.retain(|l| !l.is_off_screen());

        for b in &mut self.sky_blockers {
            b.update(dt);
        }
        self.sky_blockers.retain(|b| !b.is_off_screen());

        for p in &mut self.punched {
            p.update(dt);
        }
        self.punched.retain(|p| !p.is_off_screen());

        if meters >= self.tuning.flyer_min_distance {
            self.run_flyer_cadence(dt, meters);
        }

        for f in &mut self.flyers {
            f.update(dt, player_center);
        }
        self.flyers.retain(|f| !f.is_off_screen());
    }

    fn run_flyer_cadence(&mut self, dt: f32, meters: f32) {
        if self.volley_queue > 0 {
            self.volley_timer -= dt;
            if self.volley_timer <= 0.0 {
                self.spawn_flyer();
                self.volley_queue -= 1;
                self.volley_timer = self.tuning.flyer_volley_delay;
            }
        }

        self.flyer_timer -= dt;
        if self.flyer_timer <= 0.0 {
            self.spawn_flyer();
            self.flyer_timer = self.tuning.flyer_interval(meters);

            // Volleys need room for at least one flyer besides the trigger
            let extra = self.tuning.flyer_volley_max.saturating_sub(1);
            if extra > 0 && self.rng.random::<f32>() < self.tuning.flyer_volley_chance {
                self.volley_queue = 1 + (self.rng.random::<f32>() * extra as f32) as u32;
                self.volley_timer = self.tuning.flyer_volley_delay;
            }
        }
    }

    /// New flyer at a random height
    pub fn spawn_flyer(&mut self) {
        let band = GROUND_Y - FLYER_HEIGHT - 2.0 * FLYER_Y_MARGIN;
        let y = FLYER_Y_MARGIN + self.rng.random::<f32>() * band;
        log::debug!("Flyer incoming at y={y:.0}");
        self.flyers.push(Flyer::new(y));
    }

    /// Instantiate every element of `entry` at the right screen edge
    pub fn place(&mut self, entry: &PatternEntry) {
        for element in entry.elements {
            self.place_element(element);
        }
        self.food.spawn_for_pattern(entry.width, &mut self.rng);
        self.patterns_placed += 1;
    }

    fn place_element(&mut self, element: &ElementSpec) {
        match *element {
            ElementSpec::Ground { x, kind } => {
                let hazard = GroundHazard::seated(kind, CANVAS_WIDTH + x, &self.terrain);
                self.ground.push(hazard);
            }
            ElementSpec::Zapper { x, gap_center, gap_h } => {
                let gap_y = resolve_gap_y(gap_center, gap_h, &mut self.rng);
                self.zappers.push(Zapper::gap(CANVAS_WIDTH + x, gap_y, gap_h));
            }
            ElementSpec::HangingZapper { x, reach } => {
                self.zappers
                    .push(Zapper::bottom_open(CANVAS_WIDTH + x, hanging_bar_height(reach)));
            }
            ElementSpec::StaticLaser {
                x,
                beam_center,
                beam_width,
            } => {
                let beam_y = resolve_beam_y(beam_center);
                self.lasers
                    .push(Laser::new_static(CANVAS_WIDTH + x, beam_y, beam_width));
            }
            ElementSpec::SweepLaser { x, side } => {
                self.lasers.push(Laser::sweep_from(CANVAS_WIDTH + x, side));
            }
            ElementSpec::SkyBlocker { x, kind } => {
                // Leave at least two player heights of open air below it
                let y_max = SKY_BLOCKER_Y_MAX.min(GROUND_Y - kind.size() - 2.0 * PLAYER_HEIGHT);
                let y = SKY_BLOCKER_Y_MIN + self.rng.random::<f32>() * (y_max - SKY_BLOCKER_Y_MIN).max(0.0);
                let blocker = SkyBlocker::spawn(kind, CANVAS_WIDTH + x, y, &mut self.rng);
                self.sky_blockers.push(blocker);
            }
            ElementSpec::Mound { x, levels } => {
                self.terrain.add_segment(levels, CANVAS_WIDTH + x);
            }
        }
    }

    /// Convert every flyer touching `rect` into a harmless tumbling one.
    /// Returns how many were punched.
    pub fn punch_flyers_in(&mut self, rect: &Rect) -> usize {
        let punched = &mut self.punched;
        let before = self.flyers.len();
        self.flyers.retain(|f| {
            if rects_overlap(&f.rect(), rect) {
                punched.push(f.punch());
                false
            } else {
                true
            }
        });
        before - self.flyers.len()
    }

    pub fn hits_ground_hazard(&self, hitbox: &Rect) -> bool {
        self.ground.iter().any(|h| h.check_collision(hitbox))
    }

    pub fn hits_zapper(&self, hitbox: &Rect) -> bool {
        self.zappers.iter().any(|z| z.check_collision(hitbox))
    }

    pub fn hits_flyer(&self, hitbox: &Rect) -> bool {
        self.flyers.iter().any(|f| f.check_collision(hitbox))
    }

    pub fn hits_laser(&self, hitbox: &Rect) -> bool {
        self.lasers.iter().any(|l| l.check_collision(hitbox))
    }

    pub fn hits_sky_blocker(&self, hitbox: &Rect) -> bool {
        self.sky_blockers.iter().any(|b| b.check_collision(hitbox))
    }

    /// First collection whose hazards touch `hitbox`
    pub fn first_hit(&self, hitbox: &Rect) -> Option<HazardHit> {
        if self.hits_ground_hazard(hitbox) {
            Some(HazardHit::Ground)
        } else if self.hits_zapper(hitbox) {
            Some(HazardHit::Zapper)
        } else if self.hits_flyer(hitbox) {
            Some(HazardHit::Flyer)
        } else if self.hits_laser(hitbox) {
            Some(HazardHit::Laser)
        } else if self.hits_sky_blocker(hitbox) {
            Some(HazardHit::SkyBlocker)
        } else {
            None
        }
    }

    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        self.first_hit(hitbox).is_some()
    }
}

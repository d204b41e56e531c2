//! Food collectibles
//!
//! Food comes in small formations dropped alongside spawned patterns. Some
//! formations sit inside the pattern (risky), the rest trail just after it.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::{Rect, rects_overlap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formation {
    Line,
    Rise,
    Fall,
    Arc,
}

impl Formation {
    pub const ALL: [Formation; 4] = [Formation::Line, Formation::Rise, Formation::Fall, Formation::Arc];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub x: f32,
    pub y: f32,
}

impl Food {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, FOOD_SIZE, FOOD_SIZE)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FoodField {
    items: Vec<Food>,
    coins: u32,
}

impl FoodField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.coins = 0;
    }

    pub fn items(&self) -> &[Food] {
        &self.items
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    /// Lay out `count` items starting at `origin_x`
    pub fn spawn(&mut self, formation: Formation, origin_x: f32, base_y: f32, count: u32) {
        let n = count as usize;
        self.items.extend((0..n).map(|i| {
            let fi = i as f32;
            match formation {
                Formation::Line => Food {
                    x: origin_x + fi * FOOD_SPACING,
                    y: base_y,
                },
                Formation::Rise => Food {
                    x: origin_x + fi * FOOD_SPACING,
                    y: base_y - fi * FOOD_RISE_PER_ITEM,
                },
                Formation::Fall => Food {
                    x: origin_x + fi * FOOD_SPACING,
                    y: base_y + fi * FOOD_RISE_PER_ITEM,
                },
                Formation::Arc => {
                    let t = if n > 1 { fi / (n - 1) as f32 } else { 0.5 };
                    let width = (n.saturating_sub(1)) as f32 * FOOD_SPACING;
                    Food {
                        x: origin_x + t * width,
                        y: base_y - 4.0 * FOOD_ARC_HEIGHT * t * (1.0 - t),
                    }
                }
            }
        }));
    }

    /// Maybe drop a random formation for a pattern `pattern_width` pixels
    /// wide that was just placed at the right screen edge
    pub fn spawn_for_pattern<R: Rng + ?Sized>(&mut self, pattern_width: f32, rng: &mut R) {
        if rng.random::<f32>() > FOOD_SPAWN_CHANCE {
            return;
        }
        let count = rng.random_range(FOOD_COUNT_MIN..=FOOD_COUNT_MAX);
        let formation = *Formation::ALL.choose(rng).unwrap_or(&Formation::Line);

        let base_x = if rng.random::<f32>() < FOOD_RISKY_CHANCE {
            let max_offset = (pattern_width - count as f32 * FOOD_SPACING).max(0.0);
            CANVAS_WIDTH + rng.random::<f32>() * max_offset
        } else {
            CANVAS_WIDTH + pattern_width + 40.0
        };

        let min_y = FOOD_Y_MIN;
        let max_y = GROUND_Y - FOOD_Y_BOTTOM_MARGIN;
        let total_rise = (count - 1) as f32 * FOOD_RISE_PER_ITEM;
        let mut in_range = |lo: f32, hi: f32| lo + rng.random::<f32>() * (hi - lo).max(0.0);
        let base_y = match formation {
            Formation::Line => in_range(min_y, max_y),
            Formation::Rise => in_range(min_y + total_rise, max_y),
            Formation::Fall => in_range(min_y, max_y - total_rise),
            Formation::Arc => in_range(min_y + FOOD_ARC_HEIGHT, max_y),
        };

        log::debug!("Food {formation:?} x{count} at {base_x:.0}");
        self.spawn(formation, base_x, base_y, count);
    }

    /// Scroll, collect anything under the (padded) player box, drop items
    /// past the left edge. Returns the number collected this tick.
    pub fn update(&mut self, dt: f32, player: &Rect) -> u32 {
        let reach = player.padded(FOOD_HITBOX_PADDING);
        let scroll = AUTO_RUN_SPEED * dt;

        self.items.iter_mut().for_each(|f| f.x -= scroll);
        let mut collected = 0;
        self.items.retain(|f| {
            if rects_overlap(&reach, &f.rect()) {
                collected += 1;
                false
            } else {
                f.x > -FOOD_SIZE
            }
        });

        self.coins += collected;
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn away() -> Rect {
        Rect::new(-500.0, -500.0, 1.0, 1.0)
    }

    #[test]
    fn test_formations_layout() {
        let mut field = FoodField::new();
        field.spawn(Formation::Rise, 100.0, 300.0, 3);
        let ys: Vec<f32> = field.items().iter().map(|f| f.y).collect();
        assert_eq!(ys, [300.0, 282.0, 264.0]);
        assert_eq!(field.items()[2].x, 164.0);

        field.reset();
        field.spawn(Formation::Arc, 0.0, 300.0, 5);
        let mid = field.items()[2];
        assert_eq!(mid.x, 64.0);
        assert_eq!(mid.y, 300.0 - FOOD_ARC_HEIGHT);
        assert_eq!(field.items()[0].y, 300.0);
        assert_eq!(field.items()[4].y, 300.0);
    }

    #[test]
    fn test_collects_with_padding() {
        let mut field = FoodField::new();
        field.spawn(Formation::Line, 150.0, 200.0, 1);
        // Player ends at x=140; padding reaches 148, food after scrolling sits at 147
        let player = Rect::new(100.0, 190.0, 40.0, 30.0);
        assert_eq!(field.update(0.01, &player), 1);
        assert_eq!(field.coins(), 1);
        assert!(field.items().is_empty());
    }

    #[test]
    fn test_culls_past_left_edge() {
        let mut field = FoodField::new();
        field.spawn(Formation::Line, 0.0, 200.0, 2);
        field.update(0.1, &away());
        assert_eq!(field.items().len(), 1);
        assert_eq!(field.coins(), 0);
    }

    #[test]
    fn test_random_formations_stay_in_band() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut field = FoodField::new();
        for _ in 0..200 {
            field.spawn_for_pattern(300.0, &mut rng);
        }
        assert!(!field.items().is_empty());
        for f in field.items() {
            assert!(f.y >= FOOD_Y_MIN - 1e-3, "food too high: {}", f.y);
            assert!(f.y <= GROUND_Y - FOOD_Y_BOTTOM_MARGIN + 1e-3, "food too low: {}", f.y);
            assert!(f.x >= CANVAS_WIDTH);
        }
    }
}

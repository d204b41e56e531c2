//! Distance clock

use serde::{Deserialize, Serialize};

use crate::consts::AUTO_RUN_SPEED;
use crate::pixels_to_meters;

/// Distance traveled this run; the only progression signal
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldClock {
    pub distance_px: f32,
}

impl WorldClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.distance_px = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        self.distance_px += AUTO_RUN_SPEED * dt;
    }

    pub fn meters(&self) -> f32 {
        pixels_to_meters(self.distance_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_at_run_speed() {
        let mut clock = WorldClock::new();
        clock.update(2.0);
        assert_eq!(clock.distance_px, 600.0);
        assert_eq!(clock.meters(), 12.0);
        clock.reset();
        assert_eq!(clock.distance_px, 0.0);
    }
}

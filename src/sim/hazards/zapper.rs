//! Electrified bars

use serde::{Deserialize, Serialize};

use crate::consts::{AUTO_RUN_SPEED, GROUND_Y, ZAPPER_WIDTH};
use crate::sim::collision::{Rect, rects_overlap};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum ZapperKind {
    /// Ceiling bar and ground bar with a flyable gap between them
    Gap { gap_y: f32, gap_h: f32 },
    /// Single bar hanging from the ceiling, open below
    BottomOpen { bar_height: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zapper {
    pub x: f32,
    pub w: f32,
    pub kind: ZapperKind,
}

impl Zapper {
    pub fn gap(x: f32, gap_y: f32, gap_h: f32) -> Self {
        Self {
            x,
            w: ZAPPER_WIDTH,
            kind: ZapperKind::Gap { gap_y, gap_h },
        }
    }

    pub fn bottom_open(x: f32, bar_height: f32) -> Self {
        Self {
            x,
            w: ZAPPER_WIDTH,
            kind: ZapperKind::BottomOpen { bar_height },
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.x -= AUTO_RUN_SPEED * dt;
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.w < 0.0
    }

    /// Deadly bars (one or two)
    pub fn bars(&self) -> Vec<Rect> {
        match self.kind {
            ZapperKind::Gap { gap_y, gap_h } => {
                let bottom_y = gap_y + gap_h;
                vec![
                    Rect::new(self.x, 0.0, self.w, gap_y),
                    Rect::new(self.x, bottom_y, self.w, GROUND_Y - bottom_y),
                ]
            }
            ZapperKind::BottomOpen { bar_height } => {
                vec![Rect::new(self.x, 0.0, self.w, bar_height)]
            }
        }
    }

    pub fn check_collision(&self, hitbox: &Rect) -> bool {
        self.bars().iter().any(|bar| rects_overlap(bar, hitbox))
    }
}

//! Laser catalog dump for offline tooling
//!
//! The payload pairs every pattern with the handful of constants a checker
//! needs to replay them (player box, ground line, beam thickness and
//! vertical speed limits). Config keys keep their constant names so the
//! JSON reads the same as the `consts` module.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{LaserCatalog, LaserPattern};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(rename = "GROUND_Y")]
    pub ground_y: f32,
    #[serde(rename = "PLAYER_HEIGHT")]
    pub player_height: f32,
    #[serde(rename = "PLAYER_WIDTH")]
    pub player_width: f32,
    #[serde(rename = "PLAYER_START_X")]
    pub player_start_x: f32,
    #[serde(rename = "LASER_BEAM_THICKNESS")]
    pub laser_beam_thickness: f32,
    #[serde(rename = "TERMINAL_VEL_UP")]
    pub terminal_vel_up: f32,
    #[serde(rename = "TERMINAL_VEL_DOWN")]
    pub terminal_vel_down: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ground_y: GROUND_Y,
            player_height: PLAYER_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_start_x: PLAYER_START_X,
            laser_beam_thickness: LASER_BEAM_THICKNESS,
            terminal_vel_up: TERMINAL_VEL_UP,
            terminal_vel_down: TERMINAL_VEL_DOWN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogExport {
    pub config: ExportConfig,
    pub patterns: Vec<LaserPattern>,
}

impl CatalogExport {
    pub fn from_catalog(catalog: &LaserCatalog) -> Self {
        Self {
            config: ExportConfig::default(),
            patterns: catalog.patterns().to_vec(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

//! Browser bindings
//!
//! The JS host owns rendering and input; it feeds frame time and the thrust
//! button in, and reads back a JSON snapshot each frame.

use wasm_bindgen::prelude::*;

use crate::sim::{LaserCatalog, Session};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Turkey Run core loaded");
}

#[wasm_bindgen]
pub struct WasmSession {
    session: Session,
    catalog: LaserCatalog,
}

#[wasm_bindgen]
impl WasmSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        Self {
            session: Session::new(seed),
            catalog: LaserCatalog::standard(),
        }
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Returns true once the run has ended
    pub fn advance(&mut self, frame_dt: f32, thrusting: bool) -> bool {
        self.session.advance(frame_dt, thrusting)
    }

    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start a catalog laser pattern by id (case-insensitive)
    #[wasm_bindgen(js_name = startLaserPattern)]
    pub fn start_laser_pattern(&mut self, id: &str) -> Result<(), JsValue> {
        let pattern = self
            .catalog
            .find(id)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.start_laser_pattern(pattern);
        Ok(())
    }

    #[wasm_bindgen(js_name = patternIds)]
    pub fn pattern_ids(&self) -> Vec<String> {
        self.catalog.patterns().iter().map(|p| p.id.clone()).collect()
    }
}

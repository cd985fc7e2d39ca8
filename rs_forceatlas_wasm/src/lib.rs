// rs_forceatlas_wasm/src/lib.rs
// WebAssembly wrapper around the ForceAtlas2 layout.

use wasm_bindgen::prelude::*;
use rs_forceatlas::graph::CsrMatrix;
use rs_forceatlas::layout::{ForceAtlas2, ForceAtlasConfig};
use rs_forceatlas::utils::LayoutError;

fn to_js(error: LayoutError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct WasmForceAtlas {
    config: ForceAtlasConfig,
}

impl Default for WasmForceAtlas {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl WasmForceAtlas {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: ForceAtlasConfig::default(),
        }
    }

    #[wasm_bindgen(setter)]
    pub fn set_n_components(&mut self, n_components: usize) {
        self.config.n_components = n_components;
    }

    #[wasm_bindgen(setter)]
    pub fn set_n_iter(&mut self, n_iter: usize) {
        self.config.n_iter = n_iter;
    }

    #[wasm_bindgen(setter)]
    pub fn set_barnes_hut(&mut self, barnes_hut: bool) {
        self.config.barnes_hut = barnes_hut;
    }

    #[wasm_bindgen(setter)]
    pub fn set_lin_log(&mut self, lin_log: bool) {
        self.config.lin_log = lin_log;
    }

    #[wasm_bindgen(setter)]
    pub fn set_gravity_factor(&mut self, gravity_factor: f64) {
        self.config.gravity_factor = gravity_factor;
    }

    #[wasm_bindgen(setter)]
    pub fn set_strong_gravity(&mut self, strong_gravity: bool) {
        self.config.strong_gravity = strong_gravity;
    }

    #[wasm_bindgen(setter)]
    pub fn set_repulsive_factor(&mut self, repulsive_factor: f64) {
        self.config.repulsive_factor = repulsive_factor;
    }

    #[wasm_bindgen(setter)]
    pub fn set_weight_exponent(&mut self, weight_exponent: f64) {
        self.config.weight_exponent = weight_exponent;
    }

    #[wasm_bindgen(setter)]
    pub fn set_no_hubs(&mut self, no_hubs: bool) {
        self.config.no_hubs = no_hubs;
    }

    /// A non-positive value restores the tolerance derived from the node count.
    #[wasm_bindgen(setter)]
    pub fn set_tolerance(&mut self, tolerance: f64) {
        self.config.tolerance = if tolerance > 0.0 { Some(tolerance) } else { None };
    }

    #[wasm_bindgen(setter)]
    pub fn set_speed(&mut self, speed: f64) {
        self.config.speed = speed;
    }

    #[wasm_bindgen(setter)]
    pub fn set_speed_max(&mut self, speed_max: f64) {
        self.config.speed_max = speed_max;
    }

    #[wasm_bindgen(setter)]
    pub fn set_theta(&mut self, theta: f64) {
        self.config.theta = theta;
    }

    #[wasm_bindgen(setter)]
    pub fn set_random_state(&mut self, seed: u32) {
        self.config.random_state = Some(u64::from(seed));
    }

    /// Lays out the square CSR adjacency given by its three arrays and
    /// returns the positions row-major, `n_components` values per node.
    #[wasm_bindgen]
    pub fn layout(
        &self,
        n_nodes: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<js_sys::Float64Array, JsValue> {
        let positions = self.layout_positions(n_nodes, indptr, indices, data).map_err(to_js)?;
        Ok(js_sys::Float64Array::from(positions.as_slice()))
    }
}

impl WasmForceAtlas {
    fn layout_positions(
        &self,
        n_nodes: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Vec<f64>, LayoutError> {
        let adjacency = CsrMatrix::new(n_nodes, n_nodes, indptr, indices, data)?;
        let mut force_atlas = ForceAtlas2::new(self.config.clone())?;
        Ok(force_atlas.fit_transform(&adjacency)?.into_vec())
    }
}

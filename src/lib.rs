pub mod color;
pub mod config;
pub mod error;
pub mod overlay;
pub mod params;
pub mod render;
pub mod shader;
pub mod viewport;

pub use config::DemoConfig;
pub use error::{Result, VizError};
pub use params::{ParameterStore, TextParameters, WaveParameters};
pub use render::{FrameOutcome, GpuSurface, UniformSet, WaveRenderer};
pub use viewport::Viewport;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod gl;
    mod listener;
    mod overlay;
    mod panel;
    mod render;

    pub use render::{start_experiment, ExperimentView};

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("interference viz loaded");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{start_experiment, ExperimentView};

use wasm_bindgen::prelude::*;

mod utils;
pub mod error;
pub mod settings;
pub mod geometry;
pub mod scene;
pub mod sizing;
pub mod tween;
pub mod controls;
pub mod panel;
pub mod viewer;
mod renderer;

use crate::error::ViewerError;
use crate::settings::ViewerSettings;


#[wasm_bindgen(start)]
pub fn dummy_main() {
}


/// Starts the viewer with the default settings
#[wasm_bindgen]
pub async fn run() {
    utils::set_panic_hook();
    if let Err(e) = renderer::main(ViewerSettings::default()).await {
        log!("run(): {}", e);
    }
}


/// Starts the viewer with settings given as a plain JS object, e.g. `{ subdivisions: 4 }`
#[wasm_bindgen]
pub async fn run_with_settings(settings: JsValue) {
    utils::set_panic_hook();
    let result = match settings_from_js(&settings) {
        Ok(settings) => renderer::main(settings).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        log!("run_with_settings(): {}", e);
    }
}


fn settings_from_js(value: &JsValue) -> Result<ViewerSettings, ViewerError> {
    if value.is_undefined() || value.is_null() {
        return Ok(ViewerSettings::default());
    }
    let json = js_sys::JSON::stringify(value)
        .map_err(|e| ViewerError::Js(format!("{:?}", e)))?;
    let json: String = json.into();
    ViewerSettings::from_json(&json)
}

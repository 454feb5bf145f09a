use wasm_bindgen::prelude::*;
use std::sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}};


#[macro_export]
macro_rules! log {
    ( $( $t:tt )* ) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!( $( $t )* ).into());
        // console imports are only callable from wasm; native test builds go to stderr
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!( $( $t )* );
    }}
}


#[wasm_bindgen(module = "/helper.js")]
extern "C" {
    pub fn get_window_inner_width() -> u32;
    pub fn get_window_inner_height() -> u32;
    pub fn get_device_pixel_ratio() -> f64;
    pub fn set_canvas_size(width: u32, height: u32, pixel_ratio: f64);
}


/// Enable better error messages if our code ever panics
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}


/// Sets error flag and appends a line to the message shown in the egui error window
#[inline(always)]
pub fn set_error_for_egui(flag: &Arc<AtomicBool>, msg: &Arc<Mutex<String>>, s: String) {
    flag.store(true, Ordering::Relaxed);
    if let Ok(mut mutex) = msg.lock() {
        if !mutex.is_empty() {
            mutex.push('\n');
        }
        *mutex += s.as_str();
    }
}


/// Clears the error flag and message once the user dismissed the error window
#[inline(always)]
pub fn clear_error_for_egui(flag: &Arc<AtomicBool>, msg: &Arc<Mutex<String>>) {
    flag.store(false, Ordering::Relaxed);
    if let Ok(mut mutex) = msg.lock() {
        mutex.clear();
    }
}

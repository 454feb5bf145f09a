use serde::{Deserialize, Serialize};

use crate::error::{ViewerError, ViewerResult};
use crate::scene::parse_hex_color;
use crate::tween::Easing;


/// Everything the viewer reads at startup. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerSettings {
    /// Title of the floating debug window
    pub panel_title: String,
    pub panel_width: f32,

    /// Edge length of the cube
    pub cube_size: f32,
    /// Initial material color as `#rrggbb`
    pub cube_color: String,
    pub subdivisions: u32,
    pub min_subdivisions: u32,
    pub max_subdivisions: u32,
    /// Radius of the cylinders drawn for each wireframe edge
    pub edge_radius: f32,

    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub camera_position: [f32; 3],

    /// Fraction of the pending orbit delta applied per frame
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Upper bound on the device pixel ratio used for the canvas backing store
    pub max_pixel_ratio: f64,
    pub spin_duration_secs: f64,
    /// Curve of the spin tween, `"linear"` or `"quadratic_out"`
    pub spin_easing: Easing,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            panel_title: "Debug UI".to_string(),
            panel_width: 300.0,
            cube_size: 1.0,
            cube_color: "#9f2ab7".to_string(),
            subdivisions: 2,
            min_subdivisions: 1,
            max_subdivisions: 20,
            edge_radius: 0.004,
            fov_degrees: 75.0,
            z_near: 0.1,
            z_far: 100.0,
            camera_position: [1.0, 1.0, 2.0],
            damping_factor: 0.05,
            min_distance: 0.1,
            max_distance: 100.0,
            max_pixel_ratio: 2.0,
            spin_duration_secs: 1.0,
            spin_easing: Easing::QuadraticOut,
        }
    }
}

impl ViewerSettings {
    /// Parses settings from JSON and validates them
    pub fn from_json(json: &str) -> ViewerResult<Self> {
        let settings: ViewerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ViewerResult<()> {
        if self.min_subdivisions < 1 || self.min_subdivisions > self.max_subdivisions {
            return Err(ViewerError::InvalidSettings(format!(
                "subdivision range {}..={} is empty or starts below 1",
                self.min_subdivisions, self.max_subdivisions
            )));
        }
        if !(self.min_subdivisions..=self.max_subdivisions).contains(&self.subdivisions) {
            return Err(ViewerError::InvalidSubdivision {
                value: self.subdivisions,
                min: self.min_subdivisions,
                max: self.max_subdivisions,
            });
        }
        parse_hex_color(&self.cube_color)?;
        if self.z_near <= 0.0 || self.z_far <= self.z_near {
            return Err(ViewerError::InvalidSettings(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                self.z_near, self.z_far
            )));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(ViewerError::InvalidSettings(format!(
                "damping factor {} must be in (0, 1]",
                self.damping_factor
            )));
        }
        if self.max_pixel_ratio < 1.0 {
            return Err(ViewerError::InvalidSettings(format!(
                "max pixel ratio {} must be at least 1",
                self.max_pixel_ratio
            )));
        }
        Ok(())
    }

    pub fn spin_duration_ms(&self) -> f64 {
        self.spin_duration_secs * 1000.0
    }
}

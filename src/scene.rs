use three_d::prelude::*;
use three_d::{Context, CpuMesh, InstancedMesh, Mesh, Srgba};

use crate::error::{ViewerError, ViewerResult};
use crate::geometry::BoxGeometry;
use crate::log; // macro import
use crate::settings::ViewerSettings;


/// Mutable appearance of the cube. The panel and the spin tween are the only writers.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneState {
    pub position: Vec3,
    pub rotation_y: f32,
    pub visible: bool,
    pub wireframe: bool,
    /// Material color
    pub color: Srgba,
    /// Hex string the color picker edits
    pub color_hex: String,
    /// Committed subdivision count of the installed geometry
    pub subdivisions: u32,
}

impl SceneState {
    pub fn new(settings: &ViewerSettings) -> ViewerResult<Self> {
        let color = parse_hex_color(&settings.cube_color)?;
        Ok(Self {
            position: vec3(0.0, 0.0, 0.0),
            rotation_y: 0.0,
            visible: true,
            wireframe: false,
            color,
            color_hex: to_hex_color(color),
            subdivisions: settings.subdivisions,
        })
    }

    /// Writes the hex proxy and applies it to the material color.
    /// Leaves both untouched if `hex` does not parse.
    pub fn set_color_hex(&mut self, hex: &str) -> ViewerResult<()> {
        let color = parse_hex_color(hex)?;
        self.color = color;
        self.color_hex = to_hex_color(color);
        Ok(())
    }

    pub fn transformation(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_angle_y(radians(self.rotation_y))
    }
}


/// Parses `#rrggbb` (the `#` is optional, digits are case-insensitive)
pub fn parse_hex_color(hex: &str) -> ViewerResult<Srgba> {
    let invalid = || ViewerError::InvalidColor(hex.to_string());
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    Ok(Srgba::new_opaque(channel(0)?, channel(2)?, channel(4)?))
}


pub fn to_hex_color(color: Srgba) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}


/// Builds and releases the GPU geometry of the cube
pub trait GeometryFactory {
    type Geometry;

    fn build(&self, segments: u32) -> Self::Geometry;

    /// Frees the resources held by `geometry`. Takes ownership so it can run only once per handle.
    fn release(&self, geometry: Self::Geometry) {
        drop(geometry);
    }
}


/// Holds the one geometry currently installed on the mesh.
/// A rebuild empties the slot with `take`, releases that handle, then `install`s the new one.
pub struct GeometrySlot<G> {
    geometry: Option<G>,
    segments: u32,
}

impl<G> GeometrySlot<G> {
    pub fn new(geometry: G, segments: u32) -> Self {
        Self { geometry: Some(geometry), segments }
    }

    pub fn get(&self) -> Option<&G> {
        self.geometry.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut G> {
        self.geometry.as_mut()
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    /// Removes the installed geometry, which the caller must release
    #[must_use = "the removed geometry has to be released"]
    pub fn take(&mut self) -> Option<G> {
        self.geometry.take()
    }

    /// Installs `geometry`. The slot has to be empty; anything still installed is handed back.
    #[must_use = "a geometry that was still installed has to be released"]
    pub fn install(&mut self, geometry: G, segments: u32) -> Option<G> {
        self.segments = segments;
        self.geometry.replace(geometry)
    }
}


/// GPU buffers of the cube: a solid mesh and one thin cylinder per wireframe edge
pub struct CubeGeometry {
    pub segments: u32,
    pub solid: Mesh,
    pub edges: InstancedMesh,
}

impl CubeGeometry {
    pub fn set_transformation(&mut self, transformation: Mat4) {
        self.solid.set_transformation(transformation);
        self.edges.set_transformation(transformation);
    }
}


pub struct GpuCubeFactory {
    context: Context,
    size: f32,
    edge_radius: f32,
    cylinder: CpuMesh,
}

impl GpuCubeFactory {
    pub fn new(context: &Context, settings: &ViewerSettings) -> Self {
        Self {
            context: context.clone(),
            size: settings.cube_size,
            edge_radius: settings.edge_radius,
            cylinder: CpuMesh::cylinder(8),
        }
    }
}

impl GeometryFactory for GpuCubeFactory {
    type Geometry = CubeGeometry;

    fn build(&self, segments: u32) -> CubeGeometry {
        let cpu = BoxGeometry::new(vec3(self.size, self.size, self.size), segments);
        let instances = cpu.edge_instances(self.edge_radius);
        log!(
            "GpuCubeFactory::build(): segments={}, triangles={}, edges={}",
            cpu.segments,
            cpu.triangle_count(),
            instances.transformations.len()
        );
        CubeGeometry {
            segments: cpu.segments,
            solid: Mesh::new(&self.context, &cpu.to_cpu_mesh()),
            edges: InstancedMesh::new(&self.context, &instances, &self.cylinder),
        }
    }

    fn release(&self, geometry: CubeGeometry) {
        log!("GpuCubeFactory::release(): segments={}", geometry.segments);
        // dropping the meshes deletes their vertex buffers
        drop(geometry);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_rgb() {
        assert_eq!(parse_hex_color("#9f2ab7").unwrap(), Srgba::new_opaque(0x9f, 0x2a, 0xb7));
        assert_eq!(parse_hex_color("#ffffff").unwrap(), Srgba::new_opaque(255, 255, 255));
        assert_eq!(parse_hex_color("9F2AB7").unwrap(), Srgba::new_opaque(0x9f, 0x2a, 0xb7));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#fff", "#12345g", "#1234567", "#ééé", "purple"] {
            assert!(matches!(parse_hex_color(bad), Err(ViewerError::InvalidColor(_))), "{bad}");
        }
    }

    #[test]
    fn hex_formatting_is_lowercase() {
        assert_eq!(to_hex_color(Srgba::new_opaque(0x9f, 0x2a, 0xb7)), "#9f2ab7");
        assert_eq!(to_hex_color(Srgba::new_opaque(0, 1, 2)), "#000102");
    }

    #[test]
    fn defaults_from_settings() {
        let state = SceneState::new(&ViewerSettings::default()).unwrap();
        assert!(state.visible);
        assert!(!state.wireframe);
        assert_eq!(state.subdivisions, 2);
        assert_eq!(state.color_hex, "#9f2ab7");
        assert_eq!(state.position, vec3(0.0, 0.0, 0.0));
    }

    #[test]
    fn invalid_color_leaves_state_unchanged() {
        let mut state = SceneState::new(&ViewerSettings::default()).unwrap();
        let before = state.clone();
        assert!(state.set_color_hex("nope").is_err());
        assert_eq!(state, before);

        state.set_color_hex("#FFFFFF").unwrap();
        assert_eq!(state.color, Srgba::new_opaque(255, 255, 255));
        assert_eq!(state.color_hex, "#ffffff");
    }

    #[test]
    fn transformation_translates_then_rotates() {
        let mut state = SceneState::new(&ViewerSettings::default()).unwrap();
        state.position.y = 1.5;
        state.rotation_y = std::f32::consts::FRAC_PI_2;
        let p = state.transformation() * vec4(1.0, 0.0, 0.0, 1.0);
        assert!((p.x - 0.0).abs() < 1e-5);
        assert!((p.y - 1.5).abs() < 1e-5);
        assert!((p.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn slot_take_then_install() {
        let mut slot = GeometrySlot::new("two", 2);
        assert_eq!(slot.take(), Some("two"));
        assert!(slot.get().is_none());
        assert_eq!(slot.take(), None);

        assert_eq!(slot.install("five", 5), None);
        assert_eq!(slot.get(), Some(&"five"));
        assert_eq!(slot.segments(), 5);

        // installing over an occupied slot hands the old geometry back
        assert_eq!(slot.install("six", 6), Some("five"));
    }
}

use three_d::*;

use crate::controls::DampedOrbitControl;
use crate::error::{ViewerError, ViewerResult};
use crate::log; // macro import
use crate::panel::{PanelEvent, PanelState};
use crate::scene::{GeometryFactory, GeometrySlot, SceneState};
use crate::settings::ViewerSettings;
use crate::sizing::{ResizeEvent, ViewportSizes};
use crate::tween::Animator;


/// Key that shows or hides the debug panel
pub const PANEL_TOGGLE_KEY: Key = Key::H;


/// All state of the demo. Built once and handed to every event handler.
pub struct Viewer<F: GeometryFactory> {
    pub settings: ViewerSettings,
    pub scene: SceneState,
    pub panel: PanelState,
    pub sizes: ViewportSizes,
    pub camera: Camera,
    pub controls: DampedOrbitControl,
    pub animator: Animator,
    factory: F,
    geometry: GeometrySlot<F::Geometry>,
}

impl<F: GeometryFactory> Viewer<F> {
    pub fn new(settings: ViewerSettings, factory: F, window: ResizeEvent) -> ViewerResult<Self> {
        settings.validate()?;
        let scene = SceneState::new(&settings)?;
        let panel = PanelState::new(&settings);
        let sizes = ViewportSizes::from_resize(window, settings.max_pixel_ratio);

        let [x, y, z] = settings.camera_position;
        let camera = Camera::new_perspective(
            sizes.viewport(),
            vec3(x, y, z),
            vec3(0.0, 0.0, 0.0),
            vec3(0.0, 1.0, 0.0),
            degrees(settings.fov_degrees),
            settings.z_near,
            settings.z_far,
        );
        let controls = DampedOrbitControl::new(&camera, &settings);
        let geometry = GeometrySlot::new(factory.build(scene.subdivisions), scene.subdivisions);

        Ok(Self {
            animator: Animator::new(settings.spin_easing),
            settings,
            scene,
            panel,
            sizes,
            camera,
            controls,
            factory,
            geometry,
        })
    }

    pub fn geometry(&self) -> Option<&F::Geometry> {
        self.geometry.get()
    }

    pub fn geometry_mut(&mut self) -> Option<&mut F::Geometry> {
        self.geometry.get_mut()
    }

    /// Geometry to draw this frame and whether to draw it as a wireframe, or None when hidden
    pub fn visible_geometry(&self) -> Option<(&F::Geometry, bool)> {
        if !self.scene.visible {
            return None;
        }
        self.geometry.get().map(|geometry| (geometry, self.scene.wireframe))
    }

    /// Recomputes the surface size and the camera projection
    pub fn on_resize(&mut self, event: ResizeEvent) -> ViewportSizes {
        self.sizes = ViewportSizes::from_resize(event, self.settings.max_pixel_ratio);
        self.camera.set_viewport(self.sizes.viewport());
        let (w, h) = self.sizes.surface();
        log!(
            "Viewer::on_resize(): {}x{} @{} -> surface {}x{}",
            self.sizes.width, self.sizes.height, self.sizes.pixel_ratio, w, h
        );
        self.sizes
    }

    /// Returns true if the key was consumed
    pub fn on_key(&mut self, key: Key) -> bool {
        if key != PANEL_TOGGLE_KEY {
            return false;
        }
        self.panel.toggle();
        true
    }

    pub fn on_panel_event(&mut self, event: PanelEvent, now_ms: f64) -> ViewerResult<()> {
        match event {
            PanelEvent::ColorChanged(hex) => self.scene.set_color_hex(&hex),
            PanelEvent::Spin => {
                self.animator.spin(self.scene.rotation_y, now_ms, self.settings.spin_duration_ms());
                Ok(())
            }
            PanelEvent::SubdivisionCommitted(segments) => self.rebuild_geometry(segments),
        }
    }

    /// Releases the installed geometry, then builds and installs one with `segments` per edge
    pub fn rebuild_geometry(&mut self, segments: u32) -> ViewerResult<()> {
        let (min, max) = (self.settings.min_subdivisions, self.settings.max_subdivisions);
        if !(min..=max).contains(&segments) {
            return Err(ViewerError::InvalidSubdivision { value: segments, min, max });
        }
        if let Some(previous) = self.geometry.take() {
            self.factory.release(previous);
        }
        let geometry = self.factory.build(segments);
        if let Some(stale) = self.geometry.install(geometry, segments) {
            self.factory.release(stale);
        }
        self.scene.subdivisions = segments;
        Ok(())
    }

    /// Feeds pointer input to the orbit control
    pub fn handle_pointer(&mut self, events: &mut [Event]) -> bool {
        self.controls.handle_events(&self.camera, events)
    }

    /// Advances tweens and the damped control by one frame. Returns whether the camera moved.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        self.animator.update(now_ms, &mut self.scene.rotation_y);
        self.controls.update(&mut self.camera)
    }
}

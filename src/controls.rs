use std::f32::consts::{PI, TAU};

use three_d::*;

use crate::settings::ViewerSettings;


const EPS: f32 = 0.000001;
/// Radius scale per wheel step
const ZOOM_SCALE: f32 = 0.95;


/// Camera offset from the orbit target in spherical coordinates (y-up)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Azimuth, measured from +z towards +x
    pub theta: f32,
    /// Polar angle from +y
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.magnitude();
        if radius < EPS {
            return Self { radius: 0.0, theta: 0.0, phi: 0.0 };
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        vec3(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keeps the polar angle away from the poles so the up vector stays well defined
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}


/// Orbit control with inertia: drags accumulate a pending delta that is applied
/// a fraction at a time in `update`, so the camera eases out after the pointer stops.
/// Left drag orbits, right drag pans, the wheel zooms.
pub struct DampedOrbitControl {
    target: Vec3,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
    damping_factor: f32,
    min_distance: f32,
    max_distance: f32,
    half_fov_tan: f32,
}

impl DampedOrbitControl {
    pub fn new(camera: &Camera, settings: &ViewerSettings) -> Self {
        let target = *camera.target();
        Self {
            target,
            spherical: Spherical::from_offset(*camera.position() - target),
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::zero(),
            damping_factor: settings.damping_factor,
            min_distance: settings.min_distance,
            max_distance: settings.max_distance,
            half_fov_tan: (settings.fov_degrees.to_radians() * 0.5).tan(),
        }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Accumulates pointer input. Handled events are skipped and consumed ones are marked handled.
    pub fn handle_events(&mut self, camera: &Camera, events: &mut [Event]) -> bool {
        let height = camera.viewport().height.max(1) as f32;
        let mut change = false;
        for event in events.iter_mut() {
            match event {
                Event::MouseMotion {
                    delta,
                    button,
                    handled,
                    ..
                } => {
                    if *handled {
                        continue;
                    }
                    match button {
                        Some(MouseButton::Left) => {
                            self.rotate(delta.0, delta.1, height);
                        }
                        Some(MouseButton::Right) => {
                            self.pan(camera, delta.0, delta.1, height);
                        }
                        _ => continue,
                    }
                    *handled = true;
                    change = true;
                }
                Event::MouseWheel { delta, handled, .. } => {
                    if *handled {
                        continue;
                    }
                    self.dolly(delta.1);
                    *handled = true;
                    change = true;
                }
                _ => {}
            }
        }
        change
    }

    /// Queues an orbit for a pointer movement of (dx, dy) pixels on a surface `height` pixels tall
    pub fn rotate(&mut self, dx: f32, dy: f32, height: f32) {
        self.delta_theta -= TAU * dx / height;
        self.delta_phi -= TAU * dy / height;
    }

    /// Queues a pan in the camera plane, scaled so the target follows the pointer
    pub fn pan(&mut self, camera: &Camera, dx: f32, dy: f32, height: f32) {
        let target_distance = (*camera.position() - self.target).magnitude() * self.half_fov_tan;
        let right = camera.right_direction();
        let up = right.cross(camera.view_direction());
        self.pan_offset += -right * (2.0 * dx * target_distance / height);
        self.pan_offset += up * (2.0 * dy * target_distance / height);
    }

    /// Queues a zoom; positive steps move towards the target
    pub fn dolly(&mut self, steps: f32) {
        if steps > 0.0 {
            self.scale *= ZOOM_SCALE;
        } else if steps < 0.0 {
            self.scale /= ZOOM_SCALE;
        }
    }

    /// Applies a damped share of the pending input to the camera. Must be called each frame.
    /// Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let previous_position = *camera.position();
        let previous_target = self.target;

        self.spherical.theta += self.delta_theta * self.damping_factor;
        self.spherical.phi += self.delta_phi * self.damping_factor;
        self.spherical.make_safe();
        self.spherical.radius = (self.spherical.radius * self.scale)
            .clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * self.damping_factor;

        let position = self.target + self.spherical.to_offset();
        camera.set_view(position, self.target, vec3(0.0, 1.0, 0.0));

        let decay = 1.0 - self.damping_factor;
        self.delta_theta *= decay;
        self.delta_phi *= decay;
        self.pan_offset *= decay;
        self.scale = 1.0;

        (position - previous_position).magnitude2() > EPS
            || (self.target - previous_target).magnitude2() > EPS
    }
}

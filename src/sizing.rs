use three_d::Viewport;


/// Window size in CSS pixels together with the device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}


/// Logical size of the output surface and the pixel ratio applied to its backing store
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSizes {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl ViewportSizes {
    pub fn from_resize(event: ResizeEvent, max_pixel_ratio: f64) -> Self {
        let ratio = if event.device_pixel_ratio.is_finite() && event.device_pixel_ratio > 0.0 {
            event.device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: event.width.max(1),
            height: event.height.max(1),
            pixel_ratio: ratio.min(max_pixel_ratio),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Backing store size in physical pixels
    pub fn surface(&self) -> (u32, u32) {
        (
            (self.width as f64 * self.pixel_ratio).round().max(1.0) as u32,
            (self.height as f64 * self.pixel_ratio).round().max(1.0) as u32,
        )
    }

    pub fn viewport(&self) -> Viewport {
        let (width, height) = self.surface();
        Viewport::new_at_origo(width, height)
    }
}

use three_d::egui;

use crate::scene::{SceneState, parse_hex_color, to_hex_color};
use crate::settings::ViewerSettings;


pub const CUBE_TWEAKS: &str = "Cube Tweaks";

pub const POSITION_Y: RangeControl = RangeControl { min: -3.0, max: 3.0, step: 0.01 };


/// Numeric control bounds: values are clamped to [min, max] and snapped to `min + k*step`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeControl {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl RangeControl {
    pub fn apply(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let k = ((clamped - self.min) / self.step).round();
        (self.min + k * self.step).min(self.max)
    }
}


/// Callbacks raised by the panel. Plain field bindings are written directly and not reported.
#[derive(Clone, Debug, PartialEq)]
pub enum PanelEvent {
    ColorChanged(String),
    Spin,
    SubdivisionCommitted(u32),
}


pub struct PanelState {
    pub visible: bool,
    /// Live value of the subdivision slider
    pub subdivision_draft: u32,
    pub subdivision_range: RangeControl,
    committed: u32,
    /// Pointer was down on the subdivision slider last frame
    subdivision_held: bool,
}

impl PanelState {
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            visible: true,
            subdivision_draft: settings.subdivisions,
            subdivision_range: RangeControl {
                min: settings.min_subdivisions as f64,
                max: settings.max_subdivisions as f64,
                step: 1.0,
            },
            committed: settings.subdivisions,
            subdivision_held: false,
        }
    }

    /// Flips panel visibility and returns the new value
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Moves the subdivision slider without committing
    pub fn drag_subdivisions(&mut self, value: f64) {
        self.subdivision_draft = self.subdivision_range.apply(value) as u32;
    }

    /// Tracks one frame of slider input. An interaction ends when the pointer lets go of the
    /// slider, or when the value changed with no pointer held (clicks, keyboard steps).
    pub fn subdivision_input(&mut self, held: bool, changed: bool) -> Option<u32> {
        let released = self.subdivision_held && !held;
        self.subdivision_held = held;
        if released || (changed && !held) {
            self.finish_subdivisions()
        } else {
            None
        }
    }

    /// Called when an interaction with the subdivision slider ends.
    /// Yields the draft only if it differs from the last committed value.
    pub fn finish_subdivisions(&mut self) -> Option<u32> {
        if self.subdivision_draft == self.committed {
            return None;
        }
        self.committed = self.subdivision_draft;
        Some(self.committed)
    }
}


pub struct PanelOutput {
    pub events: Vec<PanelEvent>,
    pub pointer_over_panel: bool,
    /// Whether the "Cube Tweaks" group was expanded this frame
    pub tweaks_open: bool,
}


/// Writes the picked color to the hex proxy and reports it
pub fn pick_color(scene: &mut SceneState, rgb: [u8; 3]) -> PanelEvent {
    scene.color_hex = to_hex_color(three_d::Srgba::new_opaque(rgb[0], rgb[1], rgb[2]));
    PanelEvent::ColorChanged(scene.color_hex.clone())
}


/// The deferred "Wireframe Divisions" slider. Returns the slider response and a committed count, if any.
pub fn subdivision_slider(ui: &mut egui::Ui, panel: &mut PanelState) -> (egui::Response, Option<u32>) {
    let range = panel.subdivision_range;
    let mut draft = panel.subdivision_draft as f64;
    let response = ui.add(
        egui::Slider::new(&mut draft, range.min..=range.max)
            .step_by(range.step)
            .fixed_decimals(0),
    );
    if response.changed() {
        panel.drag_subdivisions(draft);
    }
    let committed = panel.subdivision_input(response.is_pointer_button_down_on(), response.changed());
    (response, committed)
}


/// Draws the debug window and applies the live bindings to `scene`
pub fn show(
    ctx: &egui::Context,
    panel: &mut PanelState,
    scene: &mut SceneState,
    settings: &ViewerSettings,
) -> PanelOutput {
    let mut events = Vec::new();
    let mut tweaks_open = false;

    if panel.visible {
        egui::Window::new(settings.panel_title.as_str())
            .default_width(settings.panel_width)
            .show(ctx, |ui| {
                let tweaks = egui::CollapsingHeader::new(CUBE_TWEAKS)
                    .default_open(false)
                    .show(ui, |ui| {
                        egui::Grid::new("cube_tweaks_grid")
                            .num_columns(2)
                            .spacing([40.0, 4.0])
                            .striped(true)
                            .show(ui, |ui| {
                                ui.add(egui::Label::new("Cube Y Position"));
                                let mut y = scene.position.y as f64;
                                let slider = egui::Slider::new(&mut y, POSITION_Y.min..=POSITION_Y.max)
                                    .step_by(POSITION_Y.step);
                                if ui.add(slider).changed() {
                                    scene.position.y = POSITION_Y.apply(y) as f32;
                                }
                                ui.end_row();

                                ui.add(egui::Label::new("Cube Visible"));
                                ui.checkbox(&mut scene.visible, "");
                                ui.end_row();

                                ui.add(egui::Label::new("Cube Wireframe"));
                                ui.checkbox(&mut scene.wireframe, "");
                                ui.end_row();

                                ui.add(egui::Label::new("Cube Color"));
                                let current = parse_hex_color(&scene.color_hex).unwrap_or(scene.color);
                                let mut rgb = [current.r, current.g, current.b];
                                if ui.color_edit_button_srgb(&mut rgb).changed() {
                                    events.push(pick_color(scene, rgb));
                                }
                                ui.end_row();

                                ui.add(egui::Label::new(""));
                                if ui.button("Spin the Cube").clicked() {
                                    events.push(PanelEvent::Spin);
                                }
                                ui.end_row();

                                ui.add(egui::Label::new("Wireframe Divisions"));
                                if let (_, Some(n)) = subdivision_slider(ui, panel) {
                                    events.push(PanelEvent::SubdivisionCommitted(n));
                                }
                                ui.end_row();
                            });
                    });
                tweaks_open = tweaks.body_returned.is_some();
            });
    }

    PanelOutput {
        events,
        pointer_over_panel: ctx.is_using_pointer() || ctx.is_pointer_over_area(),
        tweaks_open,
    }
}

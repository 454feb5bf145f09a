use std::sync::{Arc, Mutex, atomic::{AtomicBool, Ordering}};

use three_d::*;

use crate::error::ViewerResult;
use crate::log; // macro import
use crate::panel::{self, PanelEvent};
use crate::scene::GpuCubeFactory;
use crate::settings::ViewerSettings;
use crate::sizing::ResizeEvent;
use crate::utils::*;
use crate::viewer::Viewer;


fn poll_window_size() -> ResizeEvent {
    ResizeEvent {
        width: get_window_inner_width(),
        height: get_window_inner_height(),
        device_pixel_ratio: get_device_pixel_ratio(),
    }
}


pub async fn main(settings: ViewerSettings) -> ViewerResult<()> {
    let error_flag = Arc::new(AtomicBool::new(false));
    let error_msg = Arc::new(Mutex::new(String::new()));

    log!("main(): settings={:?}", settings);

    let mut window_size = poll_window_size();
    log!(
        "main(): window size: {}x{} @{}",
        window_size.width, window_size.height, window_size.device_pixel_ratio
    );

    let window = Window::new(WindowSettings {
        title: "Cube Tweaks".to_string(),
        ..Default::default()
    })?;

    let context = window.gl();
    log!("main(): OpenGL version: {:?}", context.version());

    let factory = GpuCubeFactory::new(&context, &settings);
    let mut viewer = Viewer::new(settings, factory, window_size)?;
    let sizes = viewer.on_resize(window_size);
    set_canvas_size(sizes.width, sizes.height, sizes.pixel_ratio);

    let mut material = ColorMaterial::new_opaque(
        &context,
        &CpuMaterial {
            albedo: viewer.scene.color,
            ..Default::default()
        },
    );

    let mut gui = three_d::GUI::new(&context);
    let mut pointer_over_gui = false;

    window.render_loop(move |mut frame_input| {
        let now = frame_input.accumulated_time;

        let size = poll_window_size();
        if size != window_size {
            window_size = size;
            let sizes = viewer.on_resize(size);
            set_canvas_size(sizes.width, sizes.height, sizes.pixel_ratio);
        }

        let mut panel_events: Vec<PanelEvent> = Vec::new();
        gui.update(
            &mut frame_input.events,
            frame_input.accumulated_time,
            frame_input.viewport,
            frame_input.device_pixel_ratio,
            |gui_context| {
                if error_flag.load(Ordering::Relaxed) {
                    egui::Window::new("Error")
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .show(gui_context, |ui| {
                            if let Ok(mutex) = error_msg.lock() {
                                ui.colored_label(egui::Color32::RED, mutex.as_str());
                            }
                            if ui.button("Ok").clicked() {
                                clear_error_for_egui(&error_flag, &error_msg);
                            }
                        });
                }

                let output = panel::show(
                    gui_context,
                    &mut viewer.panel,
                    &mut viewer.scene,
                    &viewer.settings,
                );
                panel_events = output.events;
                pointer_over_gui = output.pointer_over_panel;
            },
        );

        for event in frame_input.events.iter_mut() {
            if let Event::KeyPress { kind, handled, .. } = event {
                if !*handled && viewer.on_key(*kind) {
                    *handled = true;
                }
            }
        }

        for event in panel_events {
            if let Err(e) = viewer.on_panel_event(event, now) {
                log!("main(): {}", e);
                set_error_for_egui(&error_flag, &error_msg, format!("ERROR: {}", e));
            }
        }

        if !pointer_over_gui {
            viewer.handle_pointer(&mut frame_input.events);
        }
        viewer.tick(now);

        material.color = viewer.scene.color;
        let transformation = viewer.scene.transformation();
        if let Some(cube) = viewer.geometry_mut() {
            cube.set_transformation(transformation);
        }

        let screen = frame_input.screen();
        screen.clear(ClearState::color_and_depth(0.0, 0.0, 0.0, 1.0, 1.0));
        match viewer.visible_geometry() {
            Some((cube, true)) => {
                screen.render_with_material(&material, &viewer.camera, &cube.edges, &[]);
            }
            Some((cube, false)) => {
                screen.render_with_material(&material, &viewer.camera, &cube.solid, &[]);
            }
            None => {}
        }
        gui.render();

        // Returns default frame output to end the frame
        FrameOutput::default()
    });

    Ok(())
}

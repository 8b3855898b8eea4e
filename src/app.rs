//! Interactive eframe app driving the CPU scene: click and drag on the
//! canvas to inject dye and stir the fluid.

use crate::scene::FluidScene;
use crate::FluidSimulation;
use eframe::egui;

pub struct InteractiveApp {
    scene: FluidScene,
    paused: bool,
    frame_count: usize,
    cell_size: f32,
    frame_rate: f32,
    texture: Option<egui::TextureHandle>,
}

impl InteractiveApp {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            scene: FluidScene::new((width, height)),
            paused: false,
            frame_count: 0,
            cell_size: 4.0,
            frame_rate: 0.0,
            texture: None,
        }
    }

    fn substance_image(&self) -> egui::ColorImage {
        let substance = self.scene.substance();
        let (width, height) = substance.resolution();
        let data = substance.read();

        let mut pixels = Vec::with_capacity(width * height);
        // Field rows run bottom-up in world space; the image runs top-down.
        for j in (0..height).rev() {
            for i in 0..width {
                let idx = (j * width + i) * 4;
                pixels.push(egui::Color32::from_rgb(
                    (data[idx].clamp(0.0, 1.0) * 255.0) as u8,
                    (data[idx + 1].clamp(0.0, 1.0) * 255.0) as u8,
                    (data[idx + 2].clamp(0.0, 1.0) * 255.0) as u8,
                ));
            }
        }
        egui::ColorImage {
            size: [width, height],
            pixels,
        }
    }
}

impl eframe::App for InteractiveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("neptune - Interactive Fluid Simulation");

            ui.horizontal(|ui| {
                if ui.button("Pause/Resume").clicked() {
                    self.paused = !self.paused;
                }
                ui.add(egui::Slider::new(&mut self.cell_size, 1.0..=10.0).text("Cell Size"));
            });

            ui.separator();

            let (width, height) = self.scene.resolution();
            let canvas_width = width as f32 * self.cell_size;
            let canvas_height = height as f32 * self.cell_size;

            let (rect, response) = ui.allocate_exact_size(
                egui::Vec2::new(canvas_width, canvas_height),
                egui::Sense::click_and_drag(),
            );

            // Click-drag injects substance and velocity at the cursor.
            if response.is_pointer_button_down_on() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let u = (pos.x - rect.left()) / rect.width();
                    let v = (pos.y - rect.top()) / rect.height();
                    self.scene.activate();
                    self.scene.move_to(u, v);
                }
            } else {
                self.scene.deactivate();
            }

            // Advance the simulation before drawing so the frame reflects it.
            if !self.paused {
                let delta_time = ctx.input(|i| i.stable_dt).min(0.05);
                self.frame_rate = 1.0 / delta_time.max(1e-6);
                self.scene.step(delta_time);
                self.frame_count += 1;
            }

            let image = self.substance_image();
            match &mut self.texture {
                Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.texture = Some(ctx.load_texture(
                        "substance",
                        image,
                        egui::TextureOptions::NEAREST,
                    ));
                }
            }
            if let Some(texture) = &self.texture {
                ui.painter().image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            ui.label(format!(
                "Frame: {} | Resolution: {}x{} | {:.0} fps | Click+drag: inject dye",
                self.frame_count, width, height, self.frame_rate
            ));
        });

        ctx.request_repaint();
    }
}

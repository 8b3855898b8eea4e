use glam::Vec2;
use neptune::{FieldMetrics, FluidScene, FluidSimulation, ImageExporter};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "export" {
        run_headless_export()?;
    } else {
        run_gui_app()?;
    }

    Ok(())
}

fn run_headless_export() -> Result<(), Box<dyn std::error::Error>> {
    println!("Running headless fluid simulation with PNG export...");

    let mut scene = FluidScene::new((128, 128));
    scene.injector_mut().radius = 0.6;
    let exporter = ImageExporter::new(4);

    let delta_time = 1.0 / 60.0;
    scene.activate();

    for frame in 0..=60 {
        // Drag the pointer along a slow circle to keep injecting momentum.
        let angle = frame as f32 * 0.08;
        scene.move_to_world(Vec2::new(2.0 * angle.cos(), 2.0 * angle.sin()));
        scene.step(delta_time);

        if frame % 10 == 0 {
            let path = format!("export_frame_{:04}.png", frame);
            exporter.export_substance_png(scene.substance(), Path::new(&path))?;
            FieldMetrics::analyze(&scene, frame).print_summary();
        }
    }

    println!("Export complete.");
    Ok(())
}

fn run_gui_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 880.0])
            .with_title("neptune - Interactive Fluid Simulation"),
        ..Default::default()
    };

    eframe::run_native(
        "neptune",
        options,
        Box::new(|_cc| Box::new(neptune::InteractiveApp::new(128, 128))),
    )
}

//! PNG export of the substance field, for the headless mode.

use crate::field::Field;
use image::RgbImage;
use std::path::Path;

pub struct ImageExporter {
    scale: u32,
}

impl ImageExporter {
    /// `scale` output pixels per simulation cell.
    pub fn new(scale: u32) -> Self {
        Self { scale: scale.max(1) }
    }

    pub fn substance_to_image(&self, substance: &Field) -> RgbImage {
        let (width, height) = substance.resolution();
        let data = substance.read();

        let mut img = RgbImage::new(width as u32 * self.scale, height as u32 * self.scale);
        for (px, py, pixel) in img.enumerate_pixels_mut() {
            let i = (px / self.scale) as usize;
            // Field row 0 is the world-space bottom; image row 0 is the top.
            let j = height - 1 - (py / self.scale) as usize;
            let idx = (j * width + i) * 4;

            pixel.0 = [
                to_channel(data[idx]),
                to_channel(data[idx + 1]),
                to_channel(data[idx + 2]),
            ];
        }
        img
    }

    pub fn export_substance_png(
        &self,
        substance: &Field,
        path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let img = self.substance_to_image(substance);
        img.save(path)?;
        Ok(())
    }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

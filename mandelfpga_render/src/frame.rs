use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::{debug, info, warn};
use mandelfpga::PixelRecord;
use simple_error::SimpleError;

use crate::color;

/// Paints decoded pixels into an image. The device counts rows from the
/// bottom, images from the top.
pub fn render_image(pixels: &[PixelRecord], width: u32, height: u32) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    let mut rogue = 0;

    for pixel in pixels {
        let (x, y) = (u32::from(pixel.x), u32::from(pixel.y));

        if x >= width || y >= height {
            debug!("rogue pixel: {:?}", pixel);
            rogue += 1;
            continue;
        }

        image.put_pixel(x, height - 1 - y, color::color_for(pixel));
    }

    if rogue > 0 {
        warn!("skipped {} pixels outside {}x{}", rogue, width, height);
    }

    image
}

pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), SimpleError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| SimpleError::with("could not save image", e))?;

    info!("wrote {}", path.display());

    Ok(())
}

use image::Rgb;
use log::warn;
use mandelfpga::PixelRecord;

// the palette from the wikipedia mandelbrot renders
pub const COLOR_TABLE: [[u8; 3]; 16] = [
    [66, 30, 15],
    [25, 7, 26],
    [9, 1, 47],
    [4, 4, 73],
    [0, 7, 100],
    [12, 44, 138],
    [24, 82, 177],
    [57, 125, 209],
    [134, 181, 229],
    [211, 236, 248],
    [241, 233, 191],
    [248, 201, 95],
    [255, 170, 0],
    [204, 128, 0],
    [153, 87, 0],
    [106, 52, 3],
];

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

pub fn palette_index(iterations: u32) -> usize {
    iterations as usize % COLOR_TABLE.len()
}

/// Points inside the set are black, escaped points are colored by
/// iteration count. A record claiming neither is left black too.
pub fn color_for(pixel: &PixelRecord) -> Rgb<u8> {
    if pixel.status.maxed() || !pixel.status.escaped() {
        BLACK
    } else {
        Rgb(COLOR_TABLE[palette_index(pixel.iterations)])
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Histogram {
    pub buckets: [usize; 16],
    pub maxed: usize,
    /// Records whose escaped and maxed flags agree, which the gateware
    /// should never produce.
    pub inconsistent: usize,
}

impl Histogram {
    pub fn of(pixels: &[PixelRecord]) -> Self {
        let mut histogram = Self::default();

        for pixel in pixels {
            let (escaped, maxed) = (pixel.status.escaped(), pixel.status.maxed());

            if escaped == maxed {
                histogram.inconsistent += 1;
            }
            if maxed {
                histogram.maxed += 1;
            }
            if escaped {
                histogram.buckets[palette_index(pixel.iterations)] += 1;
            }
        }

        if histogram.inconsistent > 0 {
            warn!(
                "{} pixels are both escaped and maxed, or neither",
                histogram.inconsistent
            );
        }

        histogram
    }
}

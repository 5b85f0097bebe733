use crate::fixed::{fix_to_float, float_to_fix, SCALE};
use crate::protocol::RenderRequest;

/// A rectangular window onto the complex plane, stored the way the device
/// wants it: lower left corner and per-pixel step in fixed point.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalView {
    center_x: f64,
    center_y: f64,
    radius: f64,
    pub corner_x: i128,
    pub corner_y: i128,
    pub step: i128,
    pub width: u16,
    pub height: u16,
    pub max_iterations: u32,
}

impl FractalView {
    /// `radius` is the distance from the center to the nearest edge.
    pub fn new(
        center_x: f64,
        center_y: f64,
        radius: f64,
        width: u16,
        height: u16,
        max_iterations: u32,
    ) -> Self {
        let radius_pixels = f64::from(width.min(height)) / 2.0;
        let step = radius / radius_pixels;

        Self {
            center_x,
            center_y,
            radius,
            corner_x: float_to_fix(center_x - f64::from(width) / 2.0 * step),
            corner_y: float_to_fix(center_y - f64::from(height) / 2.0 * step),
            step: float_to_fix(step),
            width,
            height,
            max_iterations,
        }
    }

    pub fn default_view() -> Self {
        Self::new(-0.75, 0.0, 1.25, 1550, 1080, 170)
    }

    pub fn swirl() -> Self {
        Self::new(-0.74791, 0.0888909763, 6.9921e-5, 1550, 1080, 4096)
    }

    /// The fixed viewport the first gateware revision was brought up with.
    pub fn legacy() -> Self {
        let corner_x = -2i128 << SCALE;
        let corner_y = -5i128 << (SCALE - 2);
        let step = 1i128 << (SCALE - 9);
        let (width, height) = (1920u16, 1300u16);

        let step_f = fix_to_float(step);
        let radius = step_f * f64::from(width.min(height)) / 2.0;

        Self {
            center_x: fix_to_float(corner_x) + step_f * f64::from(width) / 2.0,
            center_y: fix_to_float(corner_y) + step_f * f64::from(height) / 2.0,
            radius,
            corner_x,
            corner_y,
            step,
            width,
            height,
            max_iterations: 255,
        }
    }

    /// Keeps center and radius, recomputing corner and step for a new size.
    pub fn resize(&mut self, width: u16, height: u16, max_iterations: u32) {
        *self = Self::new(
            self.center_x,
            self.center_y,
            self.radius,
            width,
            height,
            max_iterations,
        );
    }

    pub fn with_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn center(&self) -> (f64, f64) {
        let step = fix_to_float(self.step);
        (
            fix_to_float(self.corner_x) + step * f64::from(self.width) / 2.0,
            fix_to_float(self.corner_y) + step * f64::from(self.height) / 2.0,
        )
    }

    pub fn radius(&self) -> f64 {
        fix_to_float(self.step) * f64::from(self.width.min(self.height)) / 2.0
    }

    pub fn lower_left(&self) -> (f64, f64) {
        (fix_to_float(self.corner_x), fix_to_float(self.corner_y))
    }

    pub fn upper_right(&self) -> (f64, f64) {
        let step = fix_to_float(self.step);
        (
            fix_to_float(self.corner_x) + f64::from(self.width) * step,
            fix_to_float(self.corner_y) + f64::from(self.height) * step,
        )
    }

    /// Maps a device pixel coordinate (y grows upward) to the complex plane.
    pub fn pixel_to_point(&self, x: f64, y: f64) -> (f64, f64) {
        let step = fix_to_float(self.step);
        (
            fix_to_float(self.corner_x) + x * step,
            fix_to_float(self.corner_y) + y * step,
        )
    }

    pub fn request(&self) -> RenderRequest {
        RenderRequest {
            pixel_width: self.width,
            pixel_height: self.height,
            max_iterations: self.max_iterations,
            origin_x: self.corner_x,
            origin_y: self.corner_y,
            step: self.step,
        }
    }
}

impl std::fmt::Display for FractalView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (x, y) = self.center();
        write!(
            f,
            "center_x: {}, center_y: {}, radius: {}",
            x,
            y,
            self.radius()
        )
    }
}

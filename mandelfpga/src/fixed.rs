/// Number of fractional bits in every fixed-point value sent to or derived
/// from the device.
pub const SCALE: u32 = 8 * 8;

fn scale_factor() -> f64 {
    2f64.powi(SCALE as i32)
}

pub fn fix_to_float(fix: i128) -> f64 {
    fix as f64 / scale_factor()
}

/// Truncates toward zero, saturating at the bounds of `i128`.
pub fn float_to_fix(f: f64) -> i128 {
    (f * scale_factor()) as i128
}

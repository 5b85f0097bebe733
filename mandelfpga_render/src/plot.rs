use std::io::{self, BufRead, Write};

use image::{Rgb, RgbImage};
use itertools::{Itertools, MinMaxResult};
use mandelfpga::{FractalView, PixelRecord};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Complex-plane coordinates of every pixel that hit the iteration cap.
pub fn maxed_points(pixels: &[PixelRecord], view: &FractalView) -> Vec<(f64, f64)> {
    pixels
        .iter()
        .filter(|p| p.status.maxed())
        .map(|p| view.pixel_to_point(f64::from(p.x), f64::from(p.y)))
        .collect()
}

/// Black dots on white, axes spanning the view.
pub fn scatter_image(
    points: &[(f64, f64)],
    view: &FractalView,
    width: u32,
    height: u32,
) -> RgbImage {
    let mut image = RgbImage::from_pixel(width, height, WHITE);

    let (left, bottom) = view.lower_left();
    let (right, top) = view.upper_right();
    let (span_x, span_y) = (right - left, top - bottom);

    if span_x <= 0.0 || span_y <= 0.0 {
        return image;
    }

    for &(x, y) in points {
        let u = (x - left) / span_x * f64::from(width);
        let v = (y - bottom) / span_y * f64::from(height);

        if u >= 0.0 && v >= 0.0 && u < f64::from(width) && v < f64::from(height) {
            image.put_pixel(u as u32, height - 1 - v as u32, Rgb([0, 0, 0]));
        }
    }

    image
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    match values.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

const HELP: &str = "commands: count | bounds | point <i> | at <px> <py> | view | help | quit";

/// Line oriented prompt for poking at a finished plot.
pub fn inspect<R: BufRead, W: Write>(
    points: &[(f64, f64)],
    view: &FractalView,
    reader: R,
    mut writer: W,
) -> io::Result<()> {
    writeln!(writer, "{}", HELP)?;
    write!(writer, "> ")?;
    writer.flush()?;

    for line in reader.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => break,
            ["help"] => writeln!(writer, "{}", HELP)?,
            ["count"] => writeln!(writer, "{} points", points.len())?,
            ["view"] => writeln!(writer, "{}", view)?,
            ["bounds"] => {
                let xs = bounds(points.iter().map(|p| p.0));
                let ys = bounds(points.iter().map(|p| p.1));
                match (xs, ys) {
                    (Some((x0, x1)), Some((y0, y1))) => {
                        writeln!(writer, "x: {} .. {}  y: {} .. {}", x0, x1, y0, y1)?
                    }
                    _ => writeln!(writer, "no points")?,
                }
            }
            ["point", i] => match i.parse::<usize>().ok().and_then(|i| points.get(i)) {
                Some((x, y)) => writeln!(writer, "x: {} y: {}", x, y)?,
                None => writeln!(writer, "no such point: {}", i)?,
            },
            ["at", px, py] => match (px.parse::<f64>(), py.parse::<f64>()) {
                (Ok(px), Ok(py)) => {
                    let (x, y) = view.pixel_to_point(px, py);
                    writeln!(writer, "x: {} y: {}", x, y)?
                }
                _ => writeln!(writer, "expected two pixel coordinates")?,
            },
            _ => writeln!(writer, "unknown command, {}", HELP)?,
        }

        write!(writer, "> ")?;
        writer.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandelfpga::Status;

    fn pixel(x: u16, y: u16, status: u8) -> PixelRecord {
        PixelRecord {
            x,
            y,
            iterations: 0,
            status: Status(status),
        }
    }

    #[test]
    fn only_maxed_pixels_are_plotted() {
        let view = FractalView::legacy();
        let pixels = [pixel(0, 0, 0x01), pixel(1, 0, 0x10), pixel(512, 512, 0x01)];

        let points = maxed_points(&pixels, &view);

        assert_eq!(points, vec![(-2.0, -1.25), (-1.0, -0.25)]);
    }

    #[test]
    fn scatter_marks_points() {
        let view = FractalView::legacy();
        // lower left corner lands in the bottom left of the image
        let image = scatter_image(&[(-2.0, -1.25)], &view, 100, 50);

        assert_eq!(*image.get_pixel(0, 49), Rgb([0, 0, 0]));
        assert_eq!(image.pixels().filter(|p| **p != WHITE).count(), 1);
    }

    #[test]
    fn scatter_ignores_outside_points() {
        let view = FractalView::legacy();
        let image = scatter_image(&[(5.0, 5.0), (-3.0, 0.0)], &view, 10, 10);

        assert!(image.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn prompt_session() {
        let view = FractalView::legacy();
        let points = vec![(-1.0, 0.5), (0.25, -0.5)];
        let input = b"count\nbounds\npoint 1\npoint 7\nat 512 512\nbogus\nquit\ncount\n";
        let mut out = Vec::new();

        inspect(&points, &view, &input[..], &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("2 points"));
        assert!(out.contains("x: -1 .. 0.25  y: -0.5 .. 0.5"));
        assert!(out.contains("x: 0.25 y: -0.5"));
        assert!(out.contains("no such point: 7"));
        assert!(out.contains("x: -1 y: -0.25"));
        assert!(out.contains("unknown command"));
        // nothing after quit is handled
        assert_eq!(out.matches("2 points").count(), 1);
    }

    #[test]
    fn bounds_of_nothing() {
        assert_eq!(bounds(std::iter::empty()), None);
        assert_eq!(bounds([1.5].into_iter()), Some((1.5, 1.5)));
    }
}

//! Raster canvas addressed in chart-disk units.
//!
//! Disk coordinates put the zenith at (0, 0) and the horizon on the unit
//! circle, with `y` growing downwards like the raster.

use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
    text_size,
};

/// Visible window in disk units, either side of the centre
pub const VIEW_HALF_WIDTH: f64 = 1.15;
pub const VIEW_HALF_HEIGHT: f64 = 1.25;
/// Physical canvas width the point sizes are laid out for (10 inches)
const CANVAS_WIDTH_POINTS: f64 = 720.0;
const DASH_ON_POINTS: f64 = 4.0;
const DASH_OFF_POINTS: f64 = 3.0;

/// Mix `foreground` over `background` with the given opacity
pub fn blend(foreground: Rgb<u8>, background: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |fg: u8, bg: u8| -> u8 {
        (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    Rgb([
        mix(foreground[0], background[0]),
        mix(foreground[1], background[1]),
        mix(foreground[2], background[2]),
    ])
}

pub struct ChartCanvas {
    image: RgbImage,
    centre: (f64, f64),
    pixels_per_unit: f64,
    pixels_per_point: f64,
}

impl ChartCanvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        let pixels_per_unit = (f64::from(width) / (2.0 * VIEW_HALF_WIDTH))
            .min(f64::from(height) / (2.0 * VIEW_HALF_HEIGHT));
        Self {
            image: RgbImage::from_pixel(width, height, background),
            centre: (f64::from(width) / 2.0, f64::from(height) / 2.0),
            pixels_per_unit,
            pixels_per_point: f64::from(width) / CANVAS_WIDTH_POINTS,
        }
    }

    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        (
            (self.centre.0 + x * self.pixels_per_unit) as f32,
            (self.centre.1 + y * self.pixels_per_unit) as f32,
        )
    }

    fn to_pixel_i32(&self, x: f64, y: f64) -> (i32, i32) {
        let (px, py) = self.to_pixel(x, y);
        (px.round() as i32, py.round() as i32)
    }

    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points * self.pixels_per_point
    }

    /// Solid ring of `radius` disk units, `width_points` thick
    pub fn ring(&mut self, radius: f64, width_points: f64, color: Rgb<u8>) {
        let half_width = self.points_to_pixels(width_points).max(1.0) / 2.0;
        let radius_px = radius * self.pixels_per_unit;
        let (cx, cy) = self.centre;
        let outer = radius_px + half_width;

        let x_min = (cx - outer).floor().max(0.0) as u32;
        let y_min = (cy - outer).floor().max(0.0) as u32;
        let x_max = ((cx + outer).ceil() as u32).min(self.image.width().saturating_sub(1));
        let y_max = ((cy + outer).ceil() as u32).min(self.image.height().saturating_sub(1));

        for py in y_min..=y_max {
            for px in x_min..=x_max {
                let distance = (f64::from(px) + 0.5 - cx).hypot(f64::from(py) + 0.5 - cy);
                if (distance - radius_px).abs() <= half_width {
                    self.image.put_pixel(px, py, color);
                }
            }
        }
    }

    /// Filled disk with a one-pixel edge
    pub fn disk(&mut self, radius: f64, fill: Rgb<u8>, edge: Rgb<u8>) {
        let centre = self.to_pixel_i32(0.0, 0.0);
        let radius_px = (radius * self.pixels_per_unit).round() as i32;
        draw_filled_circle_mut(&mut self.image, centre, radius_px, fill);
        draw_hollow_circle_mut(&mut self.image, centre, radius_px, edge);
    }

    pub fn dashed_circle(&mut self, radius: f64, color: Rgb<u8>) {
        let circumference = std::f64::consts::TAU * radius * self.pixels_per_unit;
        let steps = circumference.ceil().max(64.0) as usize;
        let path: Vec<(f32, f32)> = (0..=steps)
            .map(|step| {
                let angle = std::f64::consts::TAU * step as f64 / steps as f64;
                self.to_pixel(radius * angle.cos(), radius * angle.sin())
            })
            .collect();
        self.dashed_path(&path, color);
    }

    pub fn dashed_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb<u8>) {
        let length = (to.0 - from.0).hypot(to.1 - from.1) * self.pixels_per_unit;
        let steps = length.ceil().max(1.0) as usize;
        let path: Vec<(f32, f32)> = (0..=steps)
            .map(|step| {
                let t = step as f64 / steps as f64;
                self.to_pixel(from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
            })
            .collect();
        self.dashed_path(&path, color);
    }

    fn dashed_path(&mut self, path: &[(f32, f32)], color: Rgb<u8>) {
        let on = self.points_to_pixels(DASH_ON_POINTS) as f32;
        let period = on + self.points_to_pixels(DASH_OFF_POINTS) as f32;
        let mut travelled = 0.0f32;

        for segment in path.windows(2) {
            let (start, end) = (segment[0], segment[1]);
            if travelled % period < on {
                draw_line_segment_mut(&mut self.image, start, end, color);
            }
            travelled += (end.0 - start.0).hypot(end.1 - start.1);
        }
    }

    /// Star marker whose area follows `size` (points squared)
    pub fn star(&mut self, x: f64, y: f64, size: f64, color: Rgb<u8>) {
        let radius = (self.points_to_pixels(size.max(0.0).sqrt()) / 2.0).round().max(1.0) as i32;
        let centre = self.to_pixel_i32(x, y);
        draw_filled_circle_mut(&mut self.image, centre, radius, color);
    }

    /// Text centred on a disk-unit position
    pub fn text_centred(
        &mut self,
        font: &FontArc,
        text: &str,
        at: (f64, f64),
        size_points: f64,
        color: Rgb<u8>,
    ) {
        if text.is_empty() {
            return;
        }
        let scale = PxScale::from(self.points_to_pixels(size_points) as f32);
        let (width, height) = text_size(scale, font, text);
        let (cx, cy) = self.to_pixel_i32(at.0, at.1);
        let x = cx - (width / 2) as i32;
        let y = cy - (height / 2) as i32;
        draw_text_mut(&mut self.image, color, x, y, scale, font, text);
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}

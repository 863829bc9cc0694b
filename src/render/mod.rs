//! Chart renderer: draws projected stars and the fixed chart decorations and
//! encodes the raster as PNG.

use ab_glyph::FontArc;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::config::{PngCompression, RenderConfig};
use crate::errors::AppResult;
use crate::sky::ProjectedStar;
use crate::sky::projection::{altitude_ring_radius, project_point};

pub mod canvas;
pub mod captions;
pub mod font;

pub use canvas::ChartCanvas;
pub use captions::DateFields;

pub const BACKGROUND: Rgb<u8> = Rgb([0x0a, 0x16, 0x28]);
pub const BORDER: Rgb<u8> = Rgb([0x7c, 0xb3, 0x42]);
pub const STAR: Rgb<u8> = Rgb([0xe8, 0xf5, 0xe9]);
pub const GRID: Rgb<u8> = Rgb([0x4a, 0x55, 0x68]);
pub const TEXT: Rgb<u8> = Rgb([0xa5, 0xd6, 0xa7]);

const STAR_OPACITY: f32 = 0.9;
const GRID_OPACITY: f32 = 0.3;
const HORIZON_RADIUS: f64 = 0.98;
const BORDER_WIDTH_POINTS: f64 = 2.0;
const REFERENCE_ALTITUDES: [f64; 2] = [30.0, 60.0];
const CARDINALS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)];
const LABEL_RADIUS: f64 = 1.08;
const TITLE_Y: f64 = -1.18;
const DATE_Y: f64 = 1.12;
const COORDINATES_Y: f64 = 1.18;

pub struct ChartRenderer {
    config: RenderConfig,
    font: Option<FontArc>,
}

impl ChartRenderer {
    /// Create a renderer, loading the caption font once
    pub fn new(config: RenderConfig) -> Self {
        let font = font::load_caption_font(config.font_path.as_deref());
        Self { config, font }
    }

    /// Renderer that draws no text
    pub fn without_captions(config: RenderConfig) -> Self {
        Self { config, font: None }
    }

    pub fn has_captions(&self) -> bool {
        self.font.is_some()
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw the chart and encode it as PNG
    pub fn render(
        &self,
        stars: &[ProjectedStar],
        title: Option<&str>,
        date: DateFields,
        latitude: f64,
        longitude: f64,
    ) -> AppResult<Vec<u8>> {
        let mut canvas = ChartCanvas::new(self.config.width, self.config.height, BACKGROUND);
        let grid = canvas::blend(GRID, BACKGROUND, GRID_OPACITY);
        let star_color = canvas::blend(STAR, BACKGROUND, STAR_OPACITY);

        canvas.ring(1.0, BORDER_WIDTH_POINTS, BORDER);
        canvas.disk(HORIZON_RADIUS, BACKGROUND, BORDER);

        for altitude in REFERENCE_ALTITUDES {
            canvas.dashed_circle(altitude_ring_radius(altitude), grid);
        }
        for (_, azimuth) in CARDINALS {
            canvas.dashed_line((0.0, 0.0), project_point(0.0, azimuth), grid);
        }

        for star in stars {
            canvas.star(star.x, star.y, star.size, star_color);
        }

        if let Some(font) = &self.font {
            for (label, azimuth) in CARDINALS {
                let (x, y) = project_point(0.0, azimuth);
                canvas.text_centred(font, label, (x * LABEL_RADIUS, y * LABEL_RADIUS), 12.0, TEXT);
            }
            let title = captions::chart_title(title, &self.config.default_title);
            canvas.text_centred(font, &title, (0.0, TITLE_Y), 16.0, TEXT);
            canvas.text_centred(font, &captions::date_caption(date), (0.0, DATE_Y), 10.0, TEXT);
            canvas.text_centred(
                font,
                &captions::coordinate_caption(latitude, longitude),
                (0.0, COORDINATES_Y),
                10.0,
                TEXT,
            );
        }

        encode_png(&canvas.into_image(), self.config.compression)
    }
}

fn encode_png(image: &RgbImage, compression: PngCompression) -> AppResult<Vec<u8>> {
    let compression = match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    };

    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, compression, FilterType::Adaptive).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn small_renderer() -> ChartRenderer {
        ChartRenderer::without_captions(RenderConfig {
            width: 460,
            height: 500,
            compression: PngCompression::Fast,
            ..RenderConfig::default()
        })
    }

    fn june_15() -> DateFields {
        DateFields {
            year: 2024,
            month: 6,
            day: 15,
        }
    }

    #[test]
    fn test_renders_decodable_png() {
        let bytes = small_renderer()
            .render(&[], None, june_15(), 40.7128, -74.006)
            .unwrap();
        assert_eq!(bytes[..8], PNG_SIGNATURE);

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (460, 500));
        assert_eq!(*decoded.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn test_star_is_drawn_at_projected_position() {
        let zenith_star = ProjectedStar {
            x: 0.0,
            y: 0.0,
            size: 50.0,
            magnitude: 0.0,
        };
        let bytes = small_renderer()
            .render(&[zenith_star], Some("test"), june_15(), 0.0, 0.0)
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();

        let expected = canvas::blend(STAR, BACKGROUND, STAR_OPACITY);
        assert_eq!(*decoded.get_pixel(230, 250), expected);
        // Empty sky between the rings stays background
        assert_eq!(*decoded.get_pixel(230 + 40, 250 + 120), BACKGROUND);
    }

    /// Pixels inside `half` of `centre` that captions changed to at least half
    /// text colour
    fn text_pixels(
        captioned: &RgbImage,
        plain: &RgbImage,
        centre: (f32, f32),
        half: i32,
    ) -> usize {
        let midpoint = canvas::blend(TEXT, BACKGROUND, 0.5);
        let (cx, cy) = (centre.0.round() as i32, centre.1.round() as i32);
        let mut count = 0;
        for y in (cy - half)..=(cy + half) {
            for x in (cx - half)..=(cx + half) {
                let (x, y) = (x as u32, y as u32);
                let pixel = captioned.get_pixel(x, y);
                if pixel != plain.get_pixel(x, y) && (0..3).all(|c| pixel[c] >= midpoint[c]) {
                    count += 1;
                }
            }
        }
        count
    }

    #[test]
    fn test_bundled_font_draws_title_and_cardinal_labels() {
        let config = RenderConfig {
            width: 1440,
            height: 1565,
            compression: PngCompression::Fast,
            ..RenderConfig::default()
        };
        let captioned = ChartRenderer {
            config: config.clone(),
            font: font::embedded_font(),
        };
        let plain = ChartRenderer::without_captions(config.clone());

        let decode = |renderer: &ChartRenderer| {
            let bytes = renderer
                .render(&[], Some("Orion"), june_15(), 40.7128, -74.006)
                .unwrap();
            image::load_from_memory(&bytes).unwrap().to_rgb8()
        };
        let with_text = decode(&captioned);
        let without_text = decode(&plain);

        let canvas = ChartCanvas::new(config.width, config.height, BACKGROUND);
        let north = canvas.to_pixel(0.0, -LABEL_RADIUS);
        let title = canvas.to_pixel(0.0, TITLE_Y);
        assert!(text_pixels(&with_text, &without_text, north, 14) > 0);
        assert!(text_pixels(&with_text, &without_text, title, 20) > 0);
        // Empty sky near the zenith carries no text
        let zenith = canvas.to_pixel(0.1, 0.1);
        assert_eq!(text_pixels(&with_text, &without_text, zenith, 14), 0);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let stars = [ProjectedStar {
            x: 0.3,
            y: -0.2,
            size: 8.0,
            magnitude: 4.0,
        }];
        let renderer = small_renderer();
        let first = renderer.render(&stars, None, june_15(), 1.0, 2.0).unwrap();
        let second = renderer.render(&stars, None, june_15(), 1.0, 2.0).unwrap();
        assert_eq!(first, second);
    }
}

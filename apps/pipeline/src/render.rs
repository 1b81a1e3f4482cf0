//! Image composition — canonical resize, contrast shade, text overlay.
//!
//! Pipeline per canvas: resize to the canonical width, darken the whole
//! frame so white text stays readable over busy photos, then draw the
//! placed text block. Downloading is behind `ImageFetcher` so batch tests
//! run without a network.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::errors::PipelineError;
use crate::layout::{self, typeface::TypeFace, Placement, TextBlock};

/// Fraction of each color channel retained by the contrast shade,
/// equivalent to darkening the canvas by 50%.
const SHADE_KEEP: f32 = 0.5;
const TEXT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Downloads the encoded bytes of a source photo.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, PipelineError>;
}

pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, PipelineError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?)
    }
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PipelineError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Produces the annotated canvas for one photo: canonicalize, shade, draw.
/// The source image is untouched; the caller owns the returned buffer.
pub fn compose(source: &DynamicImage, quote: &str, face: &dyn TypeFace) -> RgbaImage {
    let (width, height) = layout::canonical_size(source.width(), source.height());
    let mut canvas = image::imageops::resize(source, width, height, FilterType::Lanczos3);

    shade(&mut canvas, SHADE_KEEP);

    let (block, placement) = layout::place_block(quote, face, width, height);
    debug!(
        "Placing {} text lines at ({}, {})",
        block.lines.len(),
        placement.x,
        placement.y
    );
    draw_block(&mut canvas, &block, &placement, face);

    canvas
}

/// Uniform darkening of the whole canvas; alpha is left alone.
fn shade(canvas: &mut RgbaImage, keep: f32) {
    for pixel in canvas.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = (f32::from(*channel) * keep) as u8;
        }
    }
}

/// Draws each display line centered horizontally inside the placed box,
/// stacking lines from the block's top. The block itself is already
/// vertically centered by the placement.
fn draw_block(canvas: &mut RgbaImage, block: &TextBlock, placement: &Placement, face: &dyn TypeFace) {
    for (index, line) in block.lines.iter().enumerate() {
        let line_width = face.line_width(line);
        let x = placement.x + ((placement.width as f32 - line_width) / 2.0).round() as i32;
        let y = placement.y + (index as f32 * face.line_height()).round() as i32;
        face.draw_line(canvas, line, x, y, TEXT_COLOR);
    }
}

/// Persists the canvas as an RGB JPEG. Written once; the file is keyed by
/// the photo id upstream and never rewritten.
pub fn write_jpeg(canvas: RgbaImage, path: &Path) -> Result<(), PipelineError> {
    let rgb = DynamicImage::ImageRgba8(canvas).into_rgb8();
    rgb.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::GenericImageView;

    use super::*;
    use crate::layout::typeface::FixedWidthFace;

    fn gray_source(width: u32, height: u32, level: u8) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([level, level, level, 255]),
        ))
    }

    #[test]
    fn test_shade_halves_color_channels() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([100, 200, 40, 255]));
        shade(&mut canvas, 0.5);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([50, 100, 20, 255]));
    }

    #[test]
    fn test_compose_resizes_to_canonical_width() {
        let face = FixedWidthFace {
            advance: 10.0,
            height: 20.0,
        };
        let canvas = compose(&gray_source(3840, 2160, 100), "A short inspiring line", &face);
        assert_eq!(canvas.dimensions(), (1920, 1080));
    }

    #[test]
    fn test_compose_darkens_background() {
        let face = FixedWidthFace {
            advance: 10.0,
            height: 20.0,
        };
        let canvas = compose(&gray_source(3840, 2160, 100), "A short inspiring line", &face);
        // A corner pixel is far from the text block, so only the shade applies.
        let corner = canvas.get_pixel(0, 0);
        assert!(
            corner.0[0] <= 55,
            "background should be darkened, got {corner:?}"
        );
    }

    #[test]
    fn test_compose_draws_text_inside_centered_box() {
        let face = FixedWidthFace {
            advance: 10.0,
            height: 20.0,
        };
        // One 220px line in the 1800px box on a 1920x1080 canvas:
        // block top-left is (60, 530), line starts at x = 60 + 790 = 850.
        let canvas = compose(&gray_source(3840, 2160, 100), "A short inspiring line", &face);
        assert_eq!(canvas.get_pixel(900, 535), &Rgba([255, 255, 255, 255]));
        // Just left of the line there is no text.
        assert_ne!(canvas.get_pixel(840, 535), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_write_jpeg_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let canvas = RgbaImage::from_pixel(32, 24, Rgba([10, 20, 30, 255]));

        write_jpeg(canvas, &path).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.dimensions(), (32, 24));
    }
}

//! Glyph metrics and rasterization behind the `TypeFace` trait.
//!
//! Layout and composition only ever see the trait, so tests run against a
//! fixed-width fake and never need a real font file on disk. Production
//! loads a TTF once at startup and shares it across all item pipelines.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

/// Font seam consumed by `layout_block` and the composer.
pub trait TypeFace: Send + Sync {
    /// Vertical advance between stacked lines, in pixels.
    fn line_height(&self) -> f32;

    /// Rendered width of a single line of text, in pixels.
    fn line_width(&self, text: &str) -> f32;

    /// Rasterizes one line with its top-left corner at `(x, y)`, alpha
    /// blending glyph coverage over the canvas. Pixels falling outside the
    /// canvas are clipped, not an error.
    fn draw_line(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>);
}

/// A TTF loaded from disk, scaled to a fixed pixel size.
pub struct TrueTypeFont {
    font: Font<'static>,
    scale: Scale,
}

impl TrueTypeFont {
    pub fn load(path: &Path, size_px: f32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font file {}", path.display()))?;
        let font = Font::try_from_vec(bytes)
            .with_context(|| format!("failed to parse font file {}", path.display()))?;
        Ok(Self {
            font,
            scale: Scale::uniform(size_px),
        })
    }
}

impl TypeFace for TrueTypeFont {
    fn line_height(&self) -> f32 {
        let vm = self.font.v_metrics(self.scale);
        vm.ascent - vm.descent + vm.line_gap
    }

    fn line_width(&self, text: &str) -> f32 {
        // Kerning-aware: position of the last glyph plus its advance.
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    fn draw_line(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
        let vm = self.font.v_metrics(self.scale);
        // Callers pass top-left; rusttype positions glyphs on the baseline.
        let baseline = point(x as f32, y as f32 + vm.ascent);

        for glyph in self.font.layout(text, self.scale, baseline) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= canvas.width() || py >= canvas.height() {
                    return;
                }
                if coverage <= 0.0 {
                    return;
                }
                let dst = canvas.get_pixel_mut(px, py);
                // src-over blend of the glyph color against the canvas
                let sa = coverage.min(1.0);
                let inv = 1.0 - sa;
                dst.0[0] = (color.0[0] as f32 * sa + dst.0[0] as f32 * inv) as u8;
                dst.0[1] = (color.0[1] as f32 * sa + dst.0[1] as f32 * inv) as u8;
                dst.0[2] = (color.0[2] as f32 * sa + dst.0[2] as f32 * inv) as u8;
                dst.0[3] = 255;
            });
        }
    }
}

/// Fixed-metric fake for layout and composition tests: every glyph advances
/// `advance` pixels and draws as a solid `advance`×`line_height` block.
#[cfg(test)]
pub(crate) struct FixedWidthFace {
    pub advance: f32,
    pub height: f32,
}

#[cfg(test)]
impl TypeFace for FixedWidthFace {
    fn line_height(&self) -> f32 {
        self.height
    }

    fn line_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }

    fn draw_line(&self, canvas: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
        let width = self.line_width(text).round() as i32;
        let height = self.height.round() as i32;
        for py in y..y + height {
            for px in x..x + width {
                if px < 0 || py < 0 || px as u32 >= canvas.width() || py as u32 >= canvas.height() {
                    continue;
                }
                canvas.put_pixel(px as u32, py as u32, color);
            }
        }
    }
}

// Text layout — canonical canvas sizing, wrapping, measurement, centering.
// Deterministic given a TypeFace; no I/O anywhere in this module tree.

pub mod typeface;
pub mod wrap;

use typeface::TypeFace;

/// Fixed working width every canvas is resized to before composition.
pub const CANONICAL_WIDTH: u32 = 1920;
/// Fixed text box width, leaving symmetric 60px margins at canonical width.
pub const TEXT_BOX_WIDTH: u32 = 1800;

/// Top-left position and size of the text block on the canonical canvas.
///
/// Coordinates are signed: the fixed box dimensions are chosen so they stay
/// non-negative for the supported photo sizes, but an over-tall block is
/// not clamped or shrunk here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The measured, display-ready text block: one entry per rendered line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: u32,
    pub height: u32,
}

/// Scales `(width, height)` so width becomes `CANONICAL_WIDTH`, preserving
/// aspect ratio. No cropping, no distortion.
pub fn canonical_size(width: u32, height: u32) -> (u32, u32) {
    let scaled = f64::from(height) * f64::from(CANONICAL_WIDTH) / f64::from(width);
    (CANONICAL_WIDTH, scaled.round() as u32)
}

/// Centers a `block_w` × `block_h` box inside a `canvas_w` × `canvas_h`
/// canvas.
pub fn centered_placement(canvas_w: u32, canvas_h: u32, block_w: u32, block_h: u32) -> Placement {
    Placement {
        x: (canvas_w as i32 - block_w as i32) / 2,
        y: (canvas_h as i32 - block_h as i32) / 2,
        width: block_w,
        height: block_h,
    }
}

/// Builds the display line list for a quote at `max_width` pixels.
///
/// Two passes: `wrap::wrap` bounds each line at 15 words, then each of those
/// lines is greedy-wrapped at the pixel budget using the face metrics. Block
/// height is the line count times the face line height.
pub fn layout_block(text: &str, face: &dyn TypeFace, max_width: u32) -> TextBlock {
    let wrapped = wrap::wrap(text);
    let mut lines = Vec::new();
    for line in wrapped.lines() {
        lines.extend(wrap_line_to_width(line, face, max_width as f32));
    }
    let height = (lines.len() as f32 * face.line_height()).ceil() as u32;
    TextBlock {
        lines,
        width: max_width,
        height,
    }
}

/// Lays out `quote` in the fixed text box and centers it on the canvas.
pub fn place_block(
    quote: &str,
    face: &dyn TypeFace,
    canvas_w: u32,
    canvas_h: u32,
) -> (TextBlock, Placement) {
    let block = layout_block(quote, face, TEXT_BOX_WIDTH);
    let placement = centered_placement(canvas_w, canvas_h, block.width, block.height);
    (block, placement)
}

/// Greedy word-wrap of a single line against a pixel budget. A word wider
/// than the budget gets a line of its own rather than being split.
fn wrap_line_to_width(line: &str, face: &dyn TypeFace, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
            continue;
        }
        let candidate = format!("{current} {word}");
        if face.line_width(&candidate) > max_width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

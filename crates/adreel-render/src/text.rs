//! Text rendering module.
//! Uses fontdue for CPU-based font rasterization. Fonts come from the host;
//! without one, captions are skipped rather than drawn in a substitute face.

use std::collections::HashMap;
use std::path::Path;

use adreel_core::{AdreelError, AdreelResult, Color, FrameBuffer};
use fontdue::{Font, FontSettings};

/// Text horizontal alignment options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font registry keyed by family name.
#[derive(Default)]
pub struct TextRenderer {
    font_cache: HashMap<String, Font>,
    /// Family used when a requested one is absent. First loaded wins.
    default_family: Option<String>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a font from a file path.
    pub fn load_font(&mut self, name: &str, path: &Path) -> AdreelResult<()> {
        let data = std::fs::read(path).map_err(|e| {
            AdreelError::asset(
                format!("failed to read font file: {e}"),
                path.display().to_string(),
            )
        })?;
        self.load_font_bytes(name, data)
    }

    pub fn load_font_bytes(&mut self, name: &str, data: Vec<u8>) -> AdreelResult<()> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| AdreelError::asset(format!("failed to parse font: {e}"), name))?;
        self.font_cache.insert(name.to_string(), font);
        if self.default_family.is_none() {
            self.default_family = Some(name.to_string());
        }
        Ok(())
    }

    /// Get a font by family name, falling back to the default family.
    pub fn get_font(&self, family: Option<&str>) -> Option<&Font> {
        family
            .and_then(|f| self.font_cache.get(f))
            .or_else(|| {
                self.default_family
                    .as_ref()
                    .and_then(|d| self.font_cache.get(d))
            })
    }

    pub fn len(&self) -> usize {
        self.font_cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.font_cache.is_empty()
    }
}

/// Measurements for a single line of text.
#[derive(Debug, Clone)]
struct LineMeasure {
    /// Total advance width.
    width: i32,
    /// Max ascent (above baseline).
    ascent: i32,
    /// Max descent (below baseline).
    descent: i32,
}

/// Advance width of `text` on one line, in pixels.
pub fn measure_width(font: &Font, text: &str, font_size: f32) -> f32 {
    text.chars()
        .map(|ch| font.metrics(ch, font_size).advance_width)
        .sum()
}

/// Greedy word wrap so no line exceeds `max_width` pixels. Explicit
/// newlines are kept; a single word wider than the limit gets its own line.
pub fn wrap_text(font: &Font, text: &str, font_size: f32, max_width: f32) -> String {
    let mut out: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && measure_width(font, &candidate, font_size) > max_width {
                out.push(std::mem::take(&mut line));
                line = word.to_string();
            } else {
                line = candidate;
            }
        }
        out.push(line);
    }
    out.join("\n")
}

fn measure_line(font: &Font, text: &str, font_size: f32) -> LineMeasure {
    let mut total_width: i32 = 0;
    let mut max_ascent: i32 = 0;
    let mut max_descent: i32 = 0;

    // empty lines still take a line's height
    let measured = if text.is_empty() { " " } else { text };
    for ch in measured.chars() {
        let metrics = font.metrics(ch, font_size);
        max_ascent = max_ascent.max(metrics.height as i32 + metrics.ymin);
        max_descent = max_descent.max(-metrics.ymin);
        if !text.is_empty() {
            total_width += metrics.advance_width.round() as i32;
        }
    }

    LineMeasure {
        width: total_width,
        ascent: max_ascent,
        descent: max_descent,
    }
}

/// Render text with alignment into a FrameBuffer sized to fit it.
///
/// Supports multi-line text (splits on `\n`).
pub fn render_text_aligned(
    font: &Font,
    text: &str,
    font_size: f32,
    color: &Color,
    align: TextAlign,
) -> FrameBuffer {
    if text.is_empty() || !(font_size > 0.0) {
        return FrameBuffer::new(1, 1);
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let measures: Vec<LineMeasure> = lines
        .iter()
        .map(|l| measure_line(font, l, font_size))
        .collect();
    let max_width = measures.iter().map(|m| m.width).max().unwrap_or(0);
    let line_spacing = (font_size * 1.3).round() as i32;
    let last = measures.last().map_or(0, |m| m.ascent + m.descent);
    let total_height = line_spacing * (lines.len() as i32 - 1) + last;

    let mut fb = FrameBuffer::new(max_width.max(1) as u32, total_height.max(1) as u32);
    let rgba = color.to_rgba8();

    let mut y_offset = 0;
    for (line, measure) in lines.iter().zip(&measures) {
        let x_offset = match align {
            TextAlign::Left => 0,
            TextAlign::Center => (max_width - measure.width) / 2,
            TextAlign::Right => max_width - measure.width,
        };
        render_line_into(&mut fb, font, line, font_size, rgba, x_offset, y_offset, measure.ascent);
        y_offset += line_spacing;
    }
    fb
}

#[allow(clippy::too_many_arguments)]
fn render_line_into(
    fb: &mut FrameBuffer,
    font: &Font,
    text: &str,
    font_size: f32,
    rgba: [u8; 4],
    x_offset: i32,
    y_offset: i32,
    line_ascent: i32,
) {
    let [r, g, b, a] = rgba;
    let mut cursor_x = x_offset;

    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, font_size);
        let glyph_x = cursor_x + metrics.xmin;
        let glyph_y = y_offset + line_ascent - (metrics.height as i32 + metrics.ymin);

        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let coverage = bitmap[gy * metrics.width + gx];
                if coverage == 0 {
                    continue;
                }
                let px = glyph_x + gx as i32;
                let py = glyph_y + gy as i32;
                if px < 0 || py < 0 {
                    continue;
                }
                let alpha = (coverage as u32 * a as u32 + 127) / 255;
                fb.blend_pixel(px as u32, py as u32, [r, g, b, alpha as u8], 1.0);
            }
        }

        cursor_x += metrics.advance_width.round() as i32;
    }
}

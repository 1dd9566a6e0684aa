//! Bitmap font text layout.
//!
//! Fonts are grid atlases: glyphs of `glyph_w` x `glyph_h` pixels laid out
//! row-major in the order given by the font's character list. Layout is
//! monospace; each line advances by one glyph height.

use std::collections::HashMap;

use glam::Vec2;

use crate::math::{Color, Origin, Quad};
use crate::renderer::TexId;

/// A loaded bitmap font.
#[derive(Debug, Clone)]
pub struct FontData {
    pub tex: TexId,
    /// Texture size in pixels.
    pub tex_size: Vec2,
    pub glyph_w: f32,
    pub glyph_h: f32,
    /// Glyph quad per character.
    pub map: HashMap<char, Quad>,
}

impl FontData {
    /// Slice a grid atlas. Characters that do not fit in the texture are
    /// left unmapped.
    pub fn from_grid(tex: TexId, tex_size: Vec2, glyph_w: f32, glyph_h: f32, chars: &str) -> Self {
        let cols = (tex_size.x / glyph_w).floor().max(1.0) as usize;
        let rows = (tex_size.y / glyph_h).floor().max(1.0) as usize;
        let qw = glyph_w / tex_size.x;
        let qh = glyph_h / tex_size.y;
        let map = chars
            .chars()
            .enumerate()
            .filter_map(|(i, ch)| {
                let (col, row) = char_to_grid(i, cols, rows)?;
                Some((ch, Quad::new(col as f32 * qw, row as f32 * qh, qw, qh)))
            })
            .collect();
        Self {
            tex,
            tex_size,
            glyph_w,
            glyph_h,
            map,
        }
    }
}

/// Grid cell (col, row) of the glyph at `index`, or `None` past the atlas.
pub fn char_to_grid(index: usize, cols: usize, rows: usize) -> Option<(usize, usize)> {
    if index >= cols * rows {
        return None;
    }
    Some((index % cols, index / cols))
}

/// Layout options.
#[derive(Debug, Clone, Copy)]
pub struct TextOpts {
    pub pos: Vec2,
    /// Glyph height in game units; defaults to the font's own glyph height.
    pub size: Option<f32>,
    pub scale: Vec2,
    pub angle: f32,
    pub origin: Origin,
    pub color: Color,
    /// Wrap lines wider than this.
    pub width: Option<f32>,
}

impl Default for TextOpts {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: None,
            scale: Vec2::ONE,
            angle: 0.0,
            origin: Origin::TopLeft,
            color: Color::WHITE,
            width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormattedChar {
    pub tex: TexId,
    pub tex_size: Vec2,
    pub quad: Quad,
    /// Top-left of the glyph.
    pub pos: Vec2,
    pub scale: Vec2,
    pub angle: f32,
    pub color: Color,
}

/// Laid-out text, ready to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormattedText {
    pub width: f32,
    pub height: f32,
    pub chars: Vec<FormattedChar>,
}

/// Lay out `text` with `font`.
///
/// Lines break on `\n` and, when `opts.width` is set, before the glyph that
/// would overflow it. Unmapped characters still take up a cell.
pub fn format_text(text: &str, font: &FontData, opts: &TextOpts) -> FormattedText {
    let size_scale = opts.size.map(|s| s / font.glyph_h).unwrap_or(1.0);
    let scale = opts.scale * size_scale;
    let cell = Vec2::new(font.glyph_w, font.glyph_h) * scale;

    let max_cols = opts
        .width
        .filter(|w| *w > 0.0 && cell.x > 0.0)
        .map(|w| ((w / cell.x).floor() as usize).max(1));

    let mut lines: Vec<Vec<char>> = Vec::new();
    for raw in text.split('\n') {
        let mut line = Vec::new();
        for ch in raw.chars() {
            if let Some(max) = max_cols {
                if line.len() >= max {
                    lines.push(std::mem::take(&mut line));
                }
            }
            line.push(ch);
        }
        lines.push(line);
    }

    let longest = lines.iter().map(Vec::len).max().unwrap_or(0);
    let width = longest as f32 * cell.x;
    let height = lines.len() as f32 * cell.y;
    let offset = opts.origin.offset(Vec2::new(width, height));

    let mut chars = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.iter().enumerate() {
            let Some(quad) = font.map.get(ch) else {
                continue;
            };
            chars.push(FormattedChar {
                tex: font.tex,
                tex_size: font.tex_size,
                quad: *quad,
                pos: opts.pos + offset + Vec2::new(col as f32 * cell.x, row as f32 * cell.y),
                scale,
                angle: opts.angle,
                color: opts.color,
            });
        }
    }

    FormattedText {
        width,
        height,
        chars,
    }
}

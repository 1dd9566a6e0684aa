//! Renderer trait the engine draws through.
//!
//! The engine never touches a GPU. It issues draw primitives against this
//! trait; a host supplies the backend (the web host records them into a
//! flat command buffer, see [`super::commands::DrawList`]).

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Vec2};

use crate::math::{Color, Origin, Quad};
use crate::systems::text::FormattedText;

/// Opaque texture handle issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TexId(pub u32);

/// Placement options for textured quads and rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOpts {
    pub pos: Vec2,
    pub scale: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    pub color: Color,
    pub origin: Origin,
    pub quad: Quad,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Explicit target size; overrides the texture-derived size.
    pub width: Option<f32>,
    pub height: Option<f32>,
}

impl Default for DrawOpts {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            scale: Vec2::ONE,
            angle: 0.0,
            color: Color::WHITE,
            origin: Origin::TopLeft,
            quad: Quad::FULL,
            flip_x: false,
            flip_y: false,
            width: None,
            height: None,
        }
    }
}

impl DrawOpts {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }
}

/// Draw backend.
///
/// Transforms form a stack: `push_transform` saves the current matrix,
/// `push_matrix` multiplies onto it, `pop_transform` restores. Every push
/// is matched by exactly one pop within a frame, and every frame is
/// bracketed by `frame_start`/`frame_end`.
pub trait Renderer {
    /// Logical canvas width in game units.
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    /// Pixels per game unit.
    fn scale(&self) -> f32 {
        1.0
    }

    fn frame_start(&mut self);
    fn frame_end(&mut self);

    fn push_transform(&mut self);
    fn pop_transform(&mut self);
    fn push_matrix(&mut self, m: &Mat4);

    /// Draw a sub-rect of a texture. `tex_size` is the texture's pixel size.
    fn draw_texture(&mut self, tex: TexId, tex_size: Vec2, opts: &DrawOpts);
    fn draw_rect(&mut self, pos: Vec2, w: f32, h: f32, opts: &DrawOpts);
    fn draw_rect_stroke(&mut self, pos: Vec2, w: f32, h: f32, line_width: f32, color: Color);

    /// Draw pre-laid-out text. Backends without a text path get one quad
    /// per glyph.
    fn draw_text(&mut self, text: &FormattedText) {
        for ch in &text.chars {
            let opts = DrawOpts {
                pos: ch.pos,
                scale: ch.scale,
                angle: ch.angle,
                color: ch.color,
                quad: ch.quad,
                ..Default::default()
            };
            self.draw_texture(ch.tex, ch.tex_size, &opts);
        }
    }
}

/// Shared renderers: the host keeps one handle to read results back, the
/// engine draws through the other.
impl<R: Renderer> Renderer for Rc<RefCell<R>> {
    fn width(&self) -> f32 {
        self.borrow().width()
    }

    fn height(&self) -> f32 {
        self.borrow().height()
    }

    fn scale(&self) -> f32 {
        self.borrow().scale()
    }

    fn frame_start(&mut self) {
        self.borrow_mut().frame_start()
    }

    fn frame_end(&mut self) {
        self.borrow_mut().frame_end()
    }

    fn push_transform(&mut self) {
        self.borrow_mut().push_transform()
    }

    fn pop_transform(&mut self) {
        self.borrow_mut().pop_transform()
    }

    fn push_matrix(&mut self, m: &Mat4) {
        self.borrow_mut().push_matrix(m)
    }

    fn draw_texture(&mut self, tex: TexId, tex_size: Vec2, opts: &DrawOpts) {
        self.borrow_mut().draw_texture(tex, tex_size, opts)
    }

    fn draw_rect(&mut self, pos: Vec2, w: f32, h: f32, opts: &DrawOpts) {
        self.borrow_mut().draw_rect(pos, w, h, opts)
    }

    fn draw_rect_stroke(&mut self, pos: Vec2, w: f32, h: f32, line_width: f32, color: Color) {
        self.borrow_mut().draw_rect_stroke(pos, w, h, line_width, color)
    }

    fn draw_text(&mut self, text: &FormattedText) {
        self.borrow_mut().draw_text(text)
    }
}

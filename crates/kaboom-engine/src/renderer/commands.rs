use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use super::traits::{DrawOpts, Renderer, TexId};
use crate::math::{Color, Origin, Quad};

/// Command kinds, stored as the first float of each [`DrawCmd`].
pub const CMD_TEXTURE: f32 = 1.0;
pub const CMD_RECT: f32 = 2.0;
pub const CMD_RECT_STROKE: f32 = 3.0;

/// One recorded draw primitive, read by the host straight out of wasm
/// memory. 24 floats = 96 bytes stride.
///
/// `w`/`h` are the final size in game units (negative when flipped);
/// `ox`/`oy` the origin anchor in `[-1, 1]`; `m` the 2D affine transform
/// `[a, b, c, d, tx, ty]` in effect when the command was issued.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawCmd {
    pub kind: f32,
    pub tex: f32,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub angle: f32,
    pub ox: f32,
    pub oy: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    pub qx: f32,
    pub qy: f32,
    pub qw: f32,
    pub qh: f32,
    pub line_width: f32,
    pub m: [f32; 6],
}

impl DrawCmd {
    pub const FLOATS: usize = 24;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn color(&self) -> Color {
        Color::rgba(self.r, self.g, self.b, self.a)
    }

    /// Where the command's position lands after its transform.
    pub fn transformed_pos(&self) -> Vec2 {
        let [a, b, c, d, tx, ty] = self.m;
        Vec2::new(a * self.x + c * self.y + tx, b * self.x + d * self.y + ty)
    }
}

fn affine(m: &Mat4) -> [f32; 6] {
    [m.x_axis.x, m.x_axis.y, m.y_axis.x, m.y_axis.y, m.w_axis.x, m.w_axis.y]
}

/// Recording renderer: collects a frame's draw primitives into a flat
/// buffer and keeps the transform stack on the CPU side.
pub struct DrawList {
    width: f32,
    height: f32,
    scale: f32,
    cur: Mat4,
    stack: Vec<Mat4>,
    cmds: Vec<DrawCmd>,
    frames: u64,
}

impl DrawList {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            cur: Mat4::IDENTITY,
            stack: Vec::with_capacity(16),
            cmds: Vec::with_capacity(512),
            frames: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn command_count(&self) -> u32 {
        self.cmds.len() as u32
    }

    /// Raw pointer to command data for direct memory reads by the host.
    pub fn commands_ptr(&self) -> *const f32 {
        self.cmds.as_ptr() as *const f32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.cmds)
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Current transform stack depth; 0 between balanced push/pop pairs.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn record(&mut self, kind: f32, tex: TexId, pos: Vec2, size: Vec2, opts: &DrawOpts) {
        let origin = opts.origin.pt();
        self.cmds.push(DrawCmd {
            kind,
            tex: tex.0 as f32,
            x: pos.x,
            y: pos.y,
            w: size.x,
            h: size.y,
            angle: opts.angle,
            ox: origin.x,
            oy: origin.y,
            r: opts.color.r,
            g: opts.color.g,
            b: opts.color.b,
            a: opts.color.a,
            qx: opts.quad.x,
            qy: opts.quad.y,
            qw: opts.quad.w,
            qh: opts.quad.h,
            line_width: 0.0,
            m: affine(&self.cur),
        });
    }
}

impl Renderer for DrawList {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn scale(&self) -> f32 {
        self.scale
    }

    fn frame_start(&mut self) {
        self.cmds.clear();
        self.stack.clear();
        self.cur = Mat4::IDENTITY;
    }

    fn frame_end(&mut self) {
        if !self.stack.is_empty() {
            log::warn!("frame ended with {} unpopped transforms", self.stack.len());
            self.stack.clear();
        }
        self.frames += 1;
    }

    fn push_transform(&mut self) {
        self.stack.push(self.cur);
    }

    fn pop_transform(&mut self) {
        self.cur = self.stack.pop().unwrap_or(Mat4::IDENTITY);
    }

    fn push_matrix(&mut self, m: &Mat4) {
        self.cur *= *m;
    }

    fn draw_texture(&mut self, tex: TexId, tex_size: Vec2, opts: &DrawOpts) {
        let w = opts.width.unwrap_or(tex_size.x * opts.quad.w);
        let h = opts.height.unwrap_or(tex_size.y * opts.quad.h);
        let flip = Vec2::new(
            if opts.flip_x { -1.0 } else { 1.0 },
            if opts.flip_y { -1.0 } else { 1.0 },
        );
        let size = Vec2::new(w, h) * opts.scale * flip;
        self.record(CMD_TEXTURE, tex, opts.pos, size, opts);
    }

    fn draw_rect(&mut self, pos: Vec2, w: f32, h: f32, opts: &DrawOpts) {
        let size = Vec2::new(w, h) * opts.scale;
        let opts = DrawOpts {
            quad: Quad::FULL,
            ..*opts
        };
        self.record(CMD_RECT, TexId::default(), pos, size, &opts);
    }

    fn draw_rect_stroke(&mut self, pos: Vec2, w: f32, h: f32, line_width: f32, color: Color) {
        let opts = DrawOpts::at(pos).with_color(color).with_origin(Origin::TopLeft);
        self.record(CMD_RECT_STROKE, TexId::default(), pos, Vec2::new(w, h), &opts);
        if let Some(cmd) = self.cmds.last_mut() {
            cmd.line_width = line_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_cmd_is_24_floats() {
        assert_eq!(std::mem::size_of::<DrawCmd>(), DrawCmd::STRIDE_BYTES);
        assert_eq!(DrawCmd::FLOATS, 24);
    }

    #[test]
    fn records_with_current_transform() {
        let mut list = DrawList::new(640.0, 480.0, 1.0);
        list.frame_start();
        list.push_transform();
        list.push_matrix(&Mat4::from_translation(glam::Vec3::new(10.0, 5.0, 0.0)));
        list.draw_rect(Vec2::new(1.0, 1.0), 4.0, 4.0, &DrawOpts::default());
        list.pop_transform();
        list.draw_rect(Vec2::new(1.0, 1.0), 4.0, 4.0, &DrawOpts::default());
        list.frame_end();

        let cmds = list.commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[0].transformed_pos(), Vec2::new(11.0, 6.0));
        assert_eq!(cmds[1].transformed_pos(), Vec2::new(1.0, 1.0));
        assert_eq!(list.depth(), 0);
        assert_eq!(list.as_floats().len(), 2 * DrawCmd::FLOATS);
    }

    #[test]
    fn texture_size_follows_quad_scale_and_flip() {
        let mut list = DrawList::new(640.0, 480.0, 1.0);
        let opts = DrawOpts {
            quad: Quad::new(0.0, 0.0, 0.5, 1.0),
            scale: Vec2::splat(2.0),
            flip_x: true,
            ..Default::default()
        };
        list.draw_texture(TexId(3), Vec2::new(32.0, 16.0), &opts);
        let cmd = list.commands()[0];
        assert_eq!(cmd.kind, CMD_TEXTURE);
        assert_eq!(cmd.tex, 3.0);
        assert_eq!(cmd.w, -32.0);
        assert_eq!(cmd.h, 32.0);
    }

    #[test]
    fn frame_start_clears_previous_frame() {
        let mut list = DrawList::new(640.0, 480.0, 1.0);
        list.frame_start();
        list.draw_rect_stroke(Vec2::ZERO, 2.0, 2.0, 1.5, Color::WHITE);
        list.frame_end();
        assert_eq!(list.commands()[0].line_width, 1.5);
        list.frame_start();
        assert_eq!(list.command_count(), 0);
        assert_eq!(list.frames(), 1);
    }
}

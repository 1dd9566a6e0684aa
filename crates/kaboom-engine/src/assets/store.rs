//! Loaded assets and load-progress tracking.
//!
//! Every asynchronous load is a loader: [`AssetStore::load_sprite`] and
//! friends hand out a [`LoadTicket`] the host resolves once the file has
//! been fetched and decoded, possibly on another thread. Completions travel
//! over a channel and are folded in by [`AssetStore::drain`] at the top of
//! each tick. A loader counts as settled whether it succeeded or failed.

use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender};
use glam::Vec2;

use super::manifest::{AnimRange, AssetManifest};
use crate::error::{KaboomError, Result};
use crate::math::Quad;
use crate::renderer::TexId;
use crate::systems::text::FontData;

/// Name of the font used when none is given.
pub const DEF_FONT: &str = "unscii";

/// A sprite sheet sliced into frames.
#[derive(Debug, Clone)]
pub struct SpriteData {
    pub tex: TexId,
    pub tex_size: Vec2,
    pub frames: Vec<Quad>,
    pub anims: HashMap<String, AnimRange>,
}

impl SpriteData {
    /// Slice the texture into `slice_x` x `slice_y` frames, row-major.
    pub fn from_slices(
        tex: TexId,
        tex_size: Vec2,
        slice_x: u32,
        slice_y: u32,
        anims: HashMap<String, AnimRange>,
    ) -> Self {
        let sx = slice_x.max(1);
        let sy = slice_y.max(1);
        let qw = 1.0 / sx as f32;
        let qh = 1.0 / sy as f32;
        let mut frames = Vec::with_capacity((sx * sy) as usize);
        for j in 0..sy {
            for i in 0..sx {
                frames.push(Quad::new(i as f32 * qw, j as f32 * qh, qw, qh));
            }
        }
        Self {
            tex,
            tex_size,
            frames,
            anims,
        }
    }

    /// Pixel size of one frame.
    pub fn frame_size(&self) -> Vec2 {
        let q = self.frames.first().copied().unwrap_or(Quad::FULL);
        Vec2::new(self.tex_size.x * q.w, self.tex_size.y * q.h)
    }
}

/// A decoded sound, identified by a host-side handle.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    pub handle: u32,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Sprite,
    Font,
    Sound,
}

#[derive(Debug, Clone)]
enum Pending {
    Sprite {
        slice_x: u32,
        slice_y: u32,
        anims: HashMap<String, AnimRange>,
    },
    Font {
        glyph_w: u32,
        glyph_h: u32,
        chars: String,
    },
    Sound,
}

enum Loaded {
    Sprite(SpriteData),
    Font(FontData),
    Sound(SoundData),
}

struct Completion {
    loader: u64,
    name: String,
    result: std::result::Result<Loaded, String>,
}

/// Handle to one outstanding load. `Send`, so decoding may finish on any
/// thread.
pub struct LoadTicket {
    loader: u64,
    name: String,
    path: String,
    pending: Pending,
    tx: Sender<Completion>,
}

impl LoadTicket {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path (root already applied).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> AssetKind {
        match self.pending {
            Pending::Sprite { .. } => AssetKind::Sprite,
            Pending::Font { .. } => AssetKind::Font,
            Pending::Sound => AssetKind::Sound,
        }
    }

    /// Complete a sprite or font load with its decoded texture.
    pub fn resolve_texture(self, tex: TexId, tex_size: Vec2) {
        let result = match &self.pending {
            Pending::Sprite {
                slice_x,
                slice_y,
                anims,
            } => Ok(Loaded::Sprite(SpriteData::from_slices(
                tex,
                tex_size,
                *slice_x,
                *slice_y,
                anims.clone(),
            ))),
            Pending::Font {
                glyph_w,
                glyph_h,
                chars,
            } => Ok(Loaded::Font(FontData::from_grid(
                tex,
                tex_size,
                *glyph_w as f32,
                *glyph_h as f32,
                chars,
            ))),
            Pending::Sound => Err("expected audio, got a texture".to_string()),
        };
        self.complete(result);
    }

    /// Complete a sound load with the host's playback handle.
    pub fn resolve_sound(self, handle: u32) {
        let result = match self.pending {
            Pending::Sound => Ok(Loaded::Sound(SoundData {
                handle,
                path: self.path.clone(),
            })),
            _ => Err("expected a texture, got audio".to_string()),
        };
        self.complete(result);
    }

    pub fn fail(self, reason: impl Into<String>) {
        let reason = reason.into();
        self.complete(Err(reason));
    }

    fn complete(self, result: std::result::Result<Loaded, String>) {
        let msg = Completion {
            loader: self.loader,
            name: self.name,
            result,
        };
        if self.tx.send(msg).is_err() {
            log::warn!("asset store dropped before load completed");
        }
    }
}

pub struct AssetStore {
    root: String,
    sprites: HashMap<String, SpriteData>,
    fonts: HashMap<String, FontData>,
    sounds: HashMap<String, SoundData>,
    /// loader id -> settled
    loaders: HashMap<u64, bool>,
    next_loader: u64,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl AssetStore {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            root: String::new(),
            sprites: HashMap::new(),
            fonts: HashMap::new(),
            sounds: HashMap::new(),
            loaders: HashMap::new(),
            next_loader: 0,
            tx,
            rx,
        }
    }

    /// Global path prefix for subsequent loads.
    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = root.into();
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    fn add_loader(&mut self, name: &str, path: &str, pending: Pending) -> LoadTicket {
        let loader = self.next_loader;
        self.next_loader += 1;
        self.loaders.insert(loader, false);
        let path = if path.starts_with("data:") {
            path.to_string()
        } else {
            format!("{}{}", self.root, path)
        };
        LoadTicket {
            loader,
            name: name.to_string(),
            path,
            pending,
            tx: self.tx.clone(),
        }
    }

    pub fn load_sprite(
        &mut self,
        name: &str,
        path: &str,
        slice_x: u32,
        slice_y: u32,
        anims: HashMap<String, AnimRange>,
    ) -> LoadTicket {
        self.add_loader(
            name,
            path,
            Pending::Sprite {
                slice_x,
                slice_y,
                anims,
            },
        )
    }

    pub fn load_font(&mut self, name: &str, path: &str, glyph_w: u32, glyph_h: u32, chars: &str) -> LoadTicket {
        self.add_loader(
            name,
            path,
            Pending::Font {
                glyph_w,
                glyph_h,
                chars: chars.to_string(),
            },
        )
    }

    pub fn load_sound(&mut self, name: &str, path: &str) -> LoadTicket {
        self.add_loader(name, path, Pending::Sound)
    }

    /// Queue every entry of a manifest. The manifest root replaces the
    /// current one when set.
    pub fn queue_manifest(&mut self, manifest: &AssetManifest) -> Vec<LoadTicket> {
        if !manifest.root.is_empty() {
            self.root = manifest.root.clone();
        }
        let mut tickets = Vec::new();
        for (name, s) in &manifest.sprites {
            tickets.push(self.load_sprite(name, &s.path, s.slice_x, s.slice_y, s.anims.clone()));
        }
        for (name, f) in &manifest.fonts {
            tickets.push(self.load_font(name, &f.path, f.glyph_width, f.glyph_height, &f.chars));
        }
        for (name, s) in &manifest.sounds {
            tickets.push(self.load_sound(name, &s.path));
        }
        tickets
    }

    /// Register an already-decoded sprite.
    pub fn add_sprite(&mut self, name: impl Into<String>, sprite: SpriteData) {
        self.sprites.insert(name.into(), sprite);
    }

    pub fn add_font(&mut self, name: impl Into<String>, font: FontData) {
        self.fonts.insert(name.into(), font);
    }

    pub fn add_sound(&mut self, name: impl Into<String>, sound: SoundData) {
        self.sounds.insert(name.into(), sound);
    }

    /// Fold in completed loads. Returns the failures.
    pub fn drain(&mut self) -> Vec<KaboomError> {
        let mut errors = Vec::new();
        while let Ok(done) = self.rx.try_recv() {
            self.loaders.insert(done.loader, true);
            match done.result {
                Ok(Loaded::Sprite(s)) => {
                    self.sprites.insert(done.name, s);
                }
                Ok(Loaded::Font(f)) => {
                    self.fonts.insert(done.name, f);
                }
                Ok(Loaded::Sound(s)) => {
                    self.sounds.insert(done.name, s);
                }
                Err(reason) => errors.push(KaboomError::AssetLoad {
                    name: done.name,
                    reason,
                }),
            }
        }
        errors
    }

    /// Fraction of loaders settled, in `[0, 1]`. No loaders means done.
    pub fn load_progress(&self) -> f32 {
        if self.loaders.is_empty() {
            return 1.0;
        }
        let done = self.loaders.values().filter(|d| **d).count();
        done as f32 / self.loaders.len() as f32
    }

    pub fn sprite(&self, name: &str) -> Result<&SpriteData> {
        self.sprites
            .get(name)
            .ok_or_else(|| KaboomError::SpriteNotFound(name.to_string()))
    }

    pub fn font(&self, name: &str) -> Result<&FontData> {
        self.fonts
            .get(name)
            .ok_or_else(|| KaboomError::FontNotFound(name.to_string()))
    }

    pub fn sound(&self, name: &str) -> Result<&SoundData> {
        self.sounds
            .get(name)
            .ok_or_else(|| KaboomError::SoundNotFound(name.to_string()))
    }

    pub fn def_font(&self) -> Option<&FontData> {
        self.fonts.get(DEF_FONT)
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

//! Per-tick input snapshot.
//!
//! Button states advance `Pressed -> Down` and `Released -> Up` at the end
//! of every tick, so "pressed" and "released" are visible for exactly one
//! tick.

use std::collections::HashMap;

use glam::Vec2;

use super::queue::{normalize_key, InputEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BtnState {
    #[default]
    Up,
    Pressed,
    /// Pressed by key auto-repeat.
    RPressed,
    Down,
    Released,
}

impl BtnState {
    fn settle(self) -> Self {
        match self {
            BtnState::Pressed | BtnState::RPressed => BtnState::Down,
            BtnState::Released => BtnState::Up,
            s => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: u32,
    pub phase: TouchPhase,
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct InputState {
    keys: HashMap<String, BtnState>,
    mouse: BtnState,
    mouse_pos: Vec2,
    mouse_delta: Vec2,
    mouse_moved: bool,
    chars: Vec<char>,
    touches: Vec<Touch>,
    /// Whether touches also drive the mouse state.
    pub touch_to_mouse: bool,
    /// Set once any touch has been seen.
    pub is_touch: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
            mouse: BtnState::Up,
            mouse_pos: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            mouse_moved: false,
            chars: Vec::new(),
            touches: Vec::new(),
            touch_to_mouse: true,
            is_touch: false,
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold raw host events into the snapshot. `scale` converts canvas
    /// pixels to game units.
    pub fn apply(&mut self, events: Vec<InputEvent>, scale: f32) {
        let inv = if scale > 0.0 { 1.0 / scale } else { 1.0 };
        for event in events {
            match event {
                InputEvent::PointerDown { x, y } => {
                    self.mouse_pos = Vec2::new(x, y) * inv;
                    self.mouse = BtnState::Pressed;
                }
                InputEvent::PointerUp { x, y } => {
                    self.mouse_pos = Vec2::new(x, y) * inv;
                    self.mouse = BtnState::Released;
                }
                InputEvent::PointerMove { x, y, dx, dy } => {
                    self.mouse_pos = Vec2::new(x, y) * inv;
                    self.mouse_delta = Vec2::new(dx, dy) * inv;
                    self.mouse_moved = true;
                }
                InputEvent::KeyDown { key, repeat } => {
                    let k = normalize_key(&key);
                    if k.chars().count() == 1 {
                        self.chars.extend(k.chars());
                    } else if k == "space" {
                        self.chars.push(' ');
                    }
                    let state = if repeat {
                        BtnState::RPressed
                    } else {
                        BtnState::Pressed
                    };
                    self.keys.insert(k, state);
                }
                InputEvent::KeyUp { key } => {
                    self.keys.insert(normalize_key(&key), BtnState::Released);
                }
                InputEvent::TouchStart { id, x, y } => {
                    self.touch(id, TouchPhase::Start, Vec2::new(x, y) * inv);
                }
                InputEvent::TouchMove { id, x, y } => {
                    self.touch(id, TouchPhase::Move, Vec2::new(x, y) * inv);
                }
                InputEvent::TouchEnd { id, x, y } => {
                    self.touch(id, TouchPhase::End, Vec2::new(x, y) * inv);
                }
            }
        }
    }

    fn touch(&mut self, id: u32, phase: TouchPhase, pos: Vec2) {
        self.is_touch = true;
        self.touches.push(Touch { id, phase, pos });
        if !self.touch_to_mouse {
            return;
        }
        match phase {
            TouchPhase::Start => {
                self.mouse_pos = pos;
                self.mouse = BtnState::Pressed;
            }
            TouchPhase::Move => {
                self.mouse_pos = pos;
                self.mouse_moved = true;
            }
            TouchPhase::End => self.mouse = BtnState::Released,
        }
    }

    /// Advance button states and drop per-tick data.
    pub fn end_frame(&mut self) {
        for state in self.keys.values_mut() {
            *state = state.settle();
        }
        self.mouse = self.mouse.settle();
        self.chars.clear();
        self.touches.clear();
        self.mouse_moved = false;
    }

    pub fn key_pressed(&self, k: &str) -> bool {
        self.keys.get(k) == Some(&BtnState::Pressed)
    }

    pub fn key_pressed_rep(&self, k: &str) -> bool {
        matches!(self.keys.get(k), Some(BtnState::Pressed | BtnState::RPressed))
    }

    pub fn key_down(&self, k: &str) -> bool {
        matches!(
            self.keys.get(k),
            Some(BtnState::Pressed | BtnState::RPressed | BtnState::Down)
        )
    }

    pub fn key_released(&self, k: &str) -> bool {
        self.keys.get(k) == Some(&BtnState::Released)
    }

    pub fn mouse_clicked(&self) -> bool {
        self.mouse == BtnState::Pressed
    }

    pub fn mouse_down(&self) -> bool {
        matches!(self.mouse, BtnState::Pressed | BtnState::Down)
    }

    pub fn mouse_released(&self) -> bool {
        self.mouse == BtnState::Released
    }

    pub fn mouse_moved(&self) -> bool {
        self.mouse_moved
    }

    /// Mouse position in screen space (game units).
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }
}

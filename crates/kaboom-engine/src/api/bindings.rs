//! Input bindings.
//!
//! Every binding is a listener on the global `input` event, which fires
//! once per running tick before the game frame. Key bindings accept one key
//! or a list; a list yields a single disposer covering every key.

use std::rc::Rc;

use glam::Vec2;

use crate::api::engine::Engine;
use crate::api::types::Cancel;
use crate::core::value::Value;
use crate::error::Result;
use crate::input::{InputState, TouchPhase};

/// One key name or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys(pub Vec<String>);

impl From<&str> for Keys {
    fn from(k: &str) -> Self {
        Keys(vec![k.to_string()])
    }
}

impl From<String> for Keys {
    fn from(k: String) -> Self {
        Keys(vec![k])
    }
}

impl From<&[&str]> for Keys {
    fn from(list: &[&str]) -> Self {
        Keys(list.iter().map(|k| k.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Keys {
    fn from(list: [&str; N]) -> Self {
        Keys(list.iter().map(|k| k.to_string()).collect())
    }
}

type KeyPred = fn(&InputState, &str) -> bool;

impl Engine {
    fn bind_keys<F>(&mut self, keys: Keys, pred: KeyPred, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        let f = Rc::new(f);
        let cancels = keys
            .0
            .into_iter()
            .map(|key| {
                let f = f.clone();
                self.on_event("input", move |k, _| {
                    if pred(&k.input, &key) {
                        f(k)
                    } else {
                        Ok(())
                    }
                })
            })
            .collect();
        Cancel::many(self.world.generation, cancels)
    }

    /// Every tick while any of `keys` is held.
    pub fn key_down<F>(&mut self, keys: impl Into<Keys>, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        self.bind_keys(keys.into(), InputState::key_down, f)
    }

    /// The tick a key goes down.
    pub fn key_press<F>(&mut self, keys: impl Into<Keys>, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        self.bind_keys(keys.into(), InputState::key_pressed, f)
    }

    /// Like [`Engine::key_press`], also firing on auto-repeat.
    pub fn key_press_rep<F>(&mut self, keys: impl Into<Keys>, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        self.bind_keys(keys.into(), InputState::key_pressed_rep, f)
    }

    pub fn key_release<F>(&mut self, keys: impl Into<Keys>, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        self.bind_keys(keys.into(), InputState::key_released, f)
    }

    fn bind_mouse<F>(&mut self, pred: fn(&InputState) -> bool, f: F) -> Cancel
    where
        F: Fn(&mut Engine, Vec2) -> Result<()> + 'static,
    {
        self.on_event("input", move |k, _| {
            if pred(&k.input) {
                let pos = k.mouse_pos(None);
                f(k, pos)
            } else {
                Ok(())
            }
        })
    }

    pub fn mouse_down<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, Vec2) -> Result<()> + 'static,
    {
        self.bind_mouse(InputState::mouse_down, f)
    }

    pub fn mouse_click<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, Vec2) -> Result<()> + 'static,
    {
        self.bind_mouse(InputState::mouse_clicked, f)
    }

    pub fn mouse_release<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, Vec2) -> Result<()> + 'static,
    {
        self.bind_mouse(InputState::mouse_released, f)
    }

    /// Receives the position and the delta since last tick.
    pub fn mouse_move<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, Vec2, Vec2) -> Result<()> + 'static,
    {
        self.on_event("input", move |k, _| {
            if k.input.mouse_moved() {
                let pos = k.mouse_pos(None);
                let delta = k.input.mouse_delta();
                f(k, pos, delta)
            } else {
                Ok(())
            }
        })
    }

    /// Once per typed character.
    pub fn char_input<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, char) -> Result<()> + 'static,
    {
        self.on_event("input", move |k, _| {
            let chars = k.input.chars().to_vec();
            for ch in chars {
                f(k, ch)?;
            }
            Ok(())
        })
    }

    fn bind_touch<F>(&mut self, event: &str, f: F) -> Cancel
    where
        F: Fn(&mut Engine, u32, Vec2) -> Result<()> + 'static,
    {
        self.on_event(event, move |k, args| {
            let id = args.first().and_then(Value::as_f32).unwrap_or(0.0) as u32;
            let pos = args.get(1).and_then(Value::as_vec2).unwrap_or(Vec2::ZERO);
            f(k, id, pos)
        })
    }

    pub fn touch_start<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, u32, Vec2) -> Result<()> + 'static,
    {
        self.bind_touch("touchStart", f)
    }

    pub fn touch_move<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, u32, Vec2) -> Result<()> + 'static,
    {
        self.bind_touch("touchMove", f)
    }

    pub fn touch_end<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine, u32, Vec2) -> Result<()> + 'static,
    {
        self.bind_touch("touchEnd", f)
    }

    /// Fire this tick's touch events.
    pub(crate) fn dispatch_touches(&mut self) -> Result<()> {
        let touches = self.input.touches().to_vec();
        for t in touches {
            let event = match t.phase {
                TouchPhase::Start => "touchStart",
                TouchPhase::Move => "touchMove",
                TouchPhase::End => "touchEnd",
            };
            self.trigger(event, &[Value::Num(t.id as f32), Value::Vec2(t.pos)])?;
        }
        Ok(())
    }

    /// Mouse position in the space of `layer`: camera-mapped on camera
    /// layers, raw screen position otherwise.
    pub fn mouse_pos(&self, layer: Option<&str>) -> Vec2 {
        if self.world.is_cam_layer(layer) {
            self.world.cam_mouse_pos
        } else {
            self.input.mouse_pos()
        }
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.input.key_down(key)
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.input.key_pressed(key)
    }

    pub fn is_key_released(&self, key: &str) -> bool {
        self.input.key_released(key)
    }

    pub fn is_mouse_down(&self) -> bool {
        self.input.mouse_down()
    }

    pub fn is_mouse_clicked(&self) -> bool {
        self.input.mouse_clicked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::input::InputEvent;
    use crate::renderer::DrawList;
    use std::cell::{Cell, RefCell};

    fn running() -> Engine {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        k.tick(0.0);
        k
    }

    fn key(k: &str) -> InputEvent {
        InputEvent::KeyDown {
            key: k.to_string(),
            repeat: false,
        }
    }

    #[test]
    fn cam_mouse_lags_one_frame_behind_camera() {
        let mut k = running();
        k.layers(&["game", "ui"], Some("game"));
        k.cam_ignore(&["ui"]);
        k.push_input(InputEvent::PointerMove {
            x: 100.0,
            y: 100.0,
            dx: 0.0,
            dy: 0.0,
        });
        k.tick(0.016);
        let at = |k: &Engine, layer| k.mouse_pos(layer) - Vec2::new(100.0, 100.0);
        assert!(at(&k, Some("game")).length() < 1e-3);

        k.set_cam_pos(k.cam_pos() + Vec2::new(50.0, 0.0));
        k.tick(0.016);
        // still mapped through the camera of the frame before the move
        assert!(at(&k, Some("game")).length() < 1e-3);
        k.tick(0.016);
        assert!((at(&k, Some("game")) - Vec2::new(50.0, 0.0)).length() < 1e-3);
        assert!((at(&k, None) - Vec2::new(50.0, 0.0)).length() < 1e-3);

        // camera-exempt layers see the raw position
        assert_eq!(k.mouse_pos(Some("ui")), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn key_press_fires_once_key_down_every_tick() {
        let mut k = running();
        let presses = Rc::new(Cell::new(0));
        let downs = Rc::new(Cell::new(0));
        let p = presses.clone();
        let d = downs.clone();
        k.key_press("space", move |_| {
            p.set(p.get() + 1);
            Ok(())
        });
        k.key_down("space", move |_| {
            d.set(d.get() + 1);
            Ok(())
        });
        k.push_input(key(" "));
        k.tick(0.016);
        k.tick(0.016);
        k.tick(0.016);
        assert_eq!(presses.get(), 1);
        assert_eq!(downs.get(), 3);
    }

    #[test]
    fn key_list_cancels_together() {
        let mut k = running();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let c = k.key_press(["left", "a"], move |_| {
            h.set(h.get() + 1);
            Ok(())
        });
        k.push_input(key("ArrowLeft"));
        k.tick(0.016);
        k.push_input(key("a"));
        k.tick(0.016);
        assert_eq!(hits.get(), 2);
        c.cancel(&mut k);
        k.push_input(InputEvent::KeyUp { key: "a".into() });
        k.tick(0.016);
        k.push_input(key("a"));
        k.tick(0.016);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn char_input_sees_typed_chars() {
        let mut k = running();
        let typed = Rc::new(RefCell::new(String::new()));
        let t = typed.clone();
        k.char_input(move |_, ch| {
            t.borrow_mut().push(ch);
            Ok(())
        });
        k.push_input(key("h"));
        k.push_input(key("i"));
        k.push_input(key("Shift"));
        k.tick(0.016);
        assert_eq!(typed.borrow().as_str(), "hi");
    }

    #[test]
    fn mouse_click_reports_position() {
        let mut k = running();
        let at = Rc::new(Cell::new(Vec2::ZERO));
        let a = at.clone();
        k.mouse_click(move |_, pos| {
            a.set(pos);
            Ok(())
        });
        k.push_input(InputEvent::PointerDown { x: 30.0, y: 40.0 });
        k.tick(0.016);
        assert_eq!(at.get(), Vec2::new(30.0, 40.0));
    }

    #[test]
    fn touch_events_carry_id_and_pos() {
        let mut k = running();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        k.touch_start(move |_, id, pos| {
            s.borrow_mut().push((id, pos));
            Ok(())
        });
        k.push_input(InputEvent::TouchStart {
            id: 3,
            x: 5.0,
            y: 6.0,
        });
        k.tick(0.016);
        assert_eq!(*seen.borrow(), vec![(3, Vec2::new(5.0, 6.0))]);
        // touch also drives the mouse
        assert!(k.is_mouse_down() || k.input().mouse_clicked());
    }
}

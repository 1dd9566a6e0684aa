/// Raw input events as delivered by the host.
///
/// Positions are in canvas pixels; the engine divides by the render scale
/// when folding them into [`super::state::InputState`].
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A mouse button (or a touch, when touches drive the mouse) went down.
    PointerDown { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// The cursor moved to (x, y) by (dx, dy).
    PointerMove { x: f32, y: f32, dx: f32, dy: f32 },
    /// A key went down. `key` is the host's key name; `repeat` marks
    /// auto-repeat.
    KeyDown { key: String, repeat: bool },
    KeyUp { key: String },
    TouchStart { id: u32, x: f32, y: f32 },
    TouchMove { id: u32, x: f32, y: f32 },
    TouchEnd { id: u32, x: f32, y: f32 },
}

/// Map a host key name to the engine's symbolic name: arrows become
/// `left`/`right`/`up`/`down`, the space bar `space`, everything else is
/// lower-cased.
pub fn normalize_key(raw: &str) -> String {
    match raw {
        "ArrowLeft" => "left".to_string(),
        "ArrowRight" => "right".to_string(),
        "ArrowUp" => "up".to_string(),
        "ArrowDown" => "down".to_string(),
        " " => "space".to_string(),
        other => other.to_lowercase(),
    }
}

/// Events waiting for the next tick, in arrival order.
#[derive(Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Take everything queued so far.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_keeps_arrival_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::KeyDown {
            key: "ArrowUp".into(),
            repeat: true,
        });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert!(q.is_empty());
        assert_eq!(
            events[1],
            InputEvent::KeyDown {
                key: "ArrowUp".into(),
                repeat: true
            }
        );
    }

    #[test]
    fn key_names_are_normalized() {
        assert_eq!(normalize_key("ArrowLeft"), "left");
        assert_eq!(normalize_key(" "), "space");
        assert_eq!(normalize_key("F1"), "f1");
        assert_eq!(normalize_key("Shift"), "shift");
    }
}

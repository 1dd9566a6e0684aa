use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;
use kaboom_engine::assets::SoundData;
use kaboom_engine::bridge::{AudioSink, PlayConf, Storage, Transport};
use kaboom_engine::{
    start, DrawList, Engine, FrameState, Game, InputEvent, KaboomError, LoadTicket, Renderer,
    TexId,
};

/// Sounds played this tick, 4 floats each: `[handle, volume, speed, loop]`.
#[derive(Clone)]
pub struct HostAudio {
    events: Rc<RefCell<Vec<f32>>>,
    volume: Rc<Cell<f32>>,
}

impl Default for HostAudio {
    fn default() -> Self {
        Self {
            events: Rc::default(),
            volume: Rc::new(Cell::new(1.0)),
        }
    }
}

impl AudioSink for HostAudio {
    fn play(&mut self, sound: &SoundData, conf: &PlayConf) {
        let mut ev = self.events.borrow_mut();
        ev.push(sound.handle as f32);
        ev.push(conf.volume * self.volume.get());
        ev.push(conf.speed);
        ev.push(if conf.looping { 1.0 } else { 0.0 });
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume.set(volume);
    }
}

/// Relay transport backed by the page's websocket. The page delivers
/// inbound frames and drains the outbox; nothing here touches the socket.
#[derive(Clone, Default)]
pub struct HostTransport {
    open: Rc<Cell<bool>>,
    requested: Rc<Cell<bool>>,
    inbox: Rc<RefCell<Vec<String>>>,
    outbox: Rc<RefCell<Vec<String>>>,
}

impl Transport for HostTransport {
    fn connect(&mut self) -> kaboom_engine::Result<()> {
        self.requested.set(true);
        Ok(())
    }

    fn close(&mut self) {
        self.requested.set(false);
        self.open.set(false);
    }

    fn connected(&self) -> bool {
        self.open.get()
    }

    fn send(&mut self, frame: String) -> kaboom_engine::Result<()> {
        self.outbox.borrow_mut().push(frame);
        Ok(())
    }

    fn poll(&mut self) -> Vec<String> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }
}

/// `localStorage`, falling back to nothing when the page has none.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl Storage for LocalStorage {
    fn get_raw(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set_raw(&mut self, key: &str, value: String) -> kaboom_engine::Result<()> {
        let storage = Self::storage().ok_or_else(|| {
            KaboomError::Io(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "localStorage unavailable",
            ))
        })?;
        storage.set_item(key, &value).map_err(|_| {
            KaboomError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("could not store \"{}\"", key),
            ))
        })
    }
}

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    engine: Option<Engine>,
    gfx: Rc<RefCell<DrawList>>,
    audio: HostAudio,
    net: HostTransport,
    tickets: HashMap<String, LoadTicket>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let conf = game.config();
        Self {
            game,
            engine: None,
            gfx: Rc::new(RefCell::new(DrawList::new(conf.width, conf.height, conf.scale))),
            audio: HostAudio::default(),
            net: HostTransport::default(),
            tickets: HashMap::new(),
        }
    }

    /// Build the engine and run the game's `init`. Call once after
    /// construction.
    pub fn init(&mut self) {
        let conf = self.game.config();
        let gfx = Box::new(self.gfx.clone());
        match start(&mut self.game, gfx) {
            Ok((engine, tickets)) => {
                let mut engine = engine
                    .with_audio(Box::new(self.audio.clone()))
                    .with_storage(Box::new(LocalStorage));
                if conf.connect.is_some() {
                    engine = engine.with_net(Box::new(self.net.clone()));
                }
                self.tickets = tickets
                    .into_iter()
                    .map(|t| (t.name().to_string(), t))
                    .collect();
                self.engine = Some(engine);
            }
            Err(e) => log::error!("init failed: {}", e),
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        if let Some(k) = self.engine.as_mut() {
            k.push_input(event);
        }
    }

    /// Run one frame with the host's frame delta in seconds.
    pub fn tick(&mut self, dt: f32) {
        self.audio.events.borrow_mut().clear();
        if let Some(k) = self.engine.as_mut() {
            k.tick(dt);
        }
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.engine.as_mut()
    }

    // ---- Asset loading ----

    /// Outstanding loads as JSON: `[{"name", "path", "kind"}]`.
    pub fn pending_assets_json(&self) -> String {
        let list: Vec<serde_json::Value> = self
            .tickets
            .values()
            .map(|t| {
                serde_json::json!({
                    "name": t.name(),
                    "path": t.path(),
                    "kind": format!("{:?}", t.kind()).to_lowercase(),
                })
            })
            .collect();
        serde_json::Value::Array(list).to_string()
    }

    pub fn resolve_texture(&mut self, name: &str, tex: u32, w: f32, h: f32) {
        if let Some(t) = self.tickets.remove(name) {
            t.resolve_texture(TexId(tex), Vec2::new(w, h));
        }
    }

    pub fn resolve_sound(&mut self, name: &str, handle: u32) {
        if let Some(t) = self.tickets.remove(name) {
            t.resolve_sound(handle);
        }
    }

    pub fn fail_asset(&mut self, name: &str, reason: &str) {
        if let Some(t) = self.tickets.remove(name) {
            t.fail(reason);
        }
    }

    // ---- Relay ----

    /// Whether the engine asked for the relay socket to be opened.
    pub fn net_requested(&self) -> bool {
        self.net.requested.get()
    }

    pub fn net_opened(&mut self, open: bool) {
        self.net.open.set(open);
    }

    pub fn net_deliver(&mut self, frame: String) {
        self.net.inbox.borrow_mut().push(frame);
    }

    /// Frames to send, as a JSON array of strings.
    pub fn net_take_outbox(&mut self) -> String {
        let frames = std::mem::take(&mut *self.net.outbox.borrow_mut());
        serde_json::Value::from(frames).to_string()
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn commands_ptr(&self) -> *const f32 {
        self.gfx.borrow().commands_ptr()
    }

    pub fn command_count(&self) -> u32 {
        self.gfx.borrow().command_count()
    }

    pub fn sound_events_ptr(&self) -> *const f32 {
        self.audio.events.borrow().as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.audio.events.borrow().len() as u32
    }

    pub fn width(&self) -> f32 {
        self.gfx.borrow().width()
    }

    pub fn height(&self) -> f32 {
        self.gfx.borrow().height()
    }

    /// 0 loading, 1 running, 2 halted.
    pub fn state(&self) -> u32 {
        match self.engine.as_ref().map(Engine::state) {
            Some(FrameState::Loading) | None => 0,
            Some(FrameState::Running) => 1,
            Some(FrameState::Halted) => 2,
        }
    }

    pub fn load_progress(&self) -> f32 {
        self.engine.as_ref().map(Engine::load_progress).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaboom_engine::components::transform::pos;
    use kaboom_engine::components::rect::rect;
    use kaboom_engine::{comps, AssetManifest, EngineConfig};

    struct Boxes;

    impl Game for Boxes {
        fn config(&self) -> EngineConfig {
            EngineConfig::default().with_size(320.0, 240.0)
        }

        fn manifest(&self) -> Option<AssetManifest> {
            AssetManifest::from_json(r#"{"sounds": {"boop": {"path": "boop.ogg"}}}"#).ok()
        }

        fn init(&mut self, k: &mut Engine) -> kaboom_engine::Result<()> {
            k.scene("main", |k, _| {
                k.add(comps![pos(10.0, 10.0), rect(4.0, 4.0)])?;
                k.play("boop", PlayConf::default())
            });
            k.go("main", Vec::new())
        }
    }

    #[test]
    fn runs_after_assets_resolve() {
        let mut runner = GameRunner::new(Boxes);
        runner.init();
        assert_eq!(runner.width(), 320.0);
        assert!(runner.pending_assets_json().contains("boop.ogg"));

        runner.tick(0.016);
        assert_eq!(runner.state(), 0);
        runner.resolve_sound("boop", 9);
        runner.tick(0.016);
        assert_eq!(runner.state(), 1);
        runner.tick(0.016);
        assert_eq!(runner.command_count(), 1);
        assert_eq!(runner.sound_events_len(), 4);
    }

    #[test]
    fn transport_round_trip() {
        let mut t = HostTransport::default();
        t.connect().unwrap();
        assert!(!t.connected());
        t.send("a".into()).unwrap();
        t.inbox.borrow_mut().push("b".into());
        assert_eq!(t.poll(), vec!["b".to_string()]);
        assert_eq!(t.outbox.borrow().len(), 1);
    }
}

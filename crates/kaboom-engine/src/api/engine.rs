//! The engine: owner of the live world and every collaborator.
//!
//! All game code runs as callbacks receiving `&mut Engine`. Objects are
//! addressed by [`ObjId`]; listener lists are snapshotted before dispatch so
//! callbacks may subscribe, cancel, add and destroy freely.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::config::EngineConfig;
use crate::api::types::{Cancel, CancelTarget, ObjId, TagListener, Timer};
use crate::assets::AssetStore;
use crate::bridge::{AudioSink, MemoryStorage, Net, PlayConf, SilentAudio, Storage, Transport};
use crate::components::desc::CompDesc;
use crate::core::comp::CompSpec;
use crate::core::object::GameObject;
use crate::core::registry::IdList;
use crate::core::scene::SceneRegistry;
use crate::core::tags::TagMatch;
use crate::core::time::Clock;
use crate::core::value::Value;
use crate::core::world::World;
use crate::error::{KaboomError, Result};
use crate::input::{InputEvent, InputQueue, InputState};
use crate::math::{Color, Rng};
use crate::renderer::{DrawOpts, Renderer};
use crate::systems::log::DebugLog;
use crate::systems::{debug, frame, mirror};

/// Top-level scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Waiting for outstanding asset loads.
    Loading,
    Running,
    /// A frame failed; no further ticks run.
    Halted,
}

/// Debug switches, flipped by the debug keybindings or directly by game code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugState {
    pub paused: bool,
    pub inspect: bool,
    /// Multiplier applied to every frame delta, `[0, 2]`.
    pub time_scale: f32,
    pub show_log: bool,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            paused: false,
            inspect: false,
            time_scale: 1.0,
            show_log: true,
        }
    }
}

pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) world: World,
    pub(crate) scenes: SceneRegistry,
    pub(crate) state: FrameState,
    pub debug: DebugState,
    pub(crate) clock: Clock,
    pub(crate) input: InputState,
    pub(crate) input_queue: InputQueue,
    pub(crate) gfx: Box<dyn Renderer>,
    pub(crate) assets: AssetStore,
    pub(crate) log: DebugLog,
    pub(crate) rng: Rng,
    pub(crate) net: Option<Net>,
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) audio: Box<dyn AudioSink>,
}

impl Engine {
    pub fn new(config: EngineConfig, gfx: Box<dyn Renderer>) -> Self {
        let screen = Vec2::new(gfx.width(), gfx.height());
        let mut input = InputState::new();
        input.touch_to_mouse = config.touch_to_mouse;
        let mut engine = Self {
            world: World::new(0, 0, screen, Vec2::ZERO),
            scenes: SceneRegistry::new(),
            state: FrameState::Loading,
            debug: DebugState::default(),
            clock: Clock::new(),
            input,
            input_queue: InputQueue::new(),
            gfx,
            assets: AssetStore::new(),
            log: DebugLog::new(config.log_max),
            rng: Rng::new(config.rng_seed),
            net: None,
            storage: Box::new(MemoryStorage::new()),
            audio: Box::new(SilentAudio::default()),
            config,
        };
        if engine.config.debug {
            engine.reg_debug_input();
        }
        engine
    }

    pub fn with_storage(mut self, storage: Box<dyn Storage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    /// Attach a relay transport and install the object-mirroring handlers.
    pub fn with_net(mut self, transport: Box<dyn Transport>) -> Self {
        self.net = Some(Net::new(transport));
        mirror::install(&mut self);
        self
    }

    // -- Accessors --

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn obj(&self, id: ObjId) -> Option<&GameObject> {
        self.world.obj(id)
    }

    pub fn obj_mut(&mut self, id: ObjId) -> Option<&mut GameObject> {
        self.world.obj_mut(id)
    }

    /// Whether `id` is live in the current world.
    pub fn exists(&self, id: ObjId) -> bool {
        self.world.exists(id)
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.state != FrameState::Loading
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Queue a raw host event; folded in at the start of the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input_queue.push(event);
    }

    pub fn gfx_mut(&mut self) -> &mut dyn Renderer {
        self.gfx.as_mut()
    }

    pub fn debug_log(&mut self) -> &mut DebugLog {
        &mut self.log
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Scaled delta time of the current frame.
    pub fn dt(&self) -> f32 {
        self.clock.dt() * self.debug.time_scale
    }

    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps()
    }

    /// Ignore the next frame delta (host resumed after being hidden).
    pub fn skip_time(&mut self) {
        self.clock.skip_next();
    }

    pub fn width(&self) -> f32 {
        self.gfx.width()
    }

    pub fn height(&self) -> f32 {
        self.gfx.height()
    }

    pub(crate) fn screen_size(&self) -> Vec2 {
        Vec2::new(self.gfx.width(), self.gfx.height())
    }

    pub fn obj_count(&self) -> usize {
        self.world.obj_count()
    }

    pub fn load_progress(&self) -> f32 {
        self.assets.load_progress()
    }

    pub(crate) fn cancel_for(&self, target: CancelTarget) -> Cancel {
        Cancel::new(self.world.generation, target)
    }

    // -- Frame loop --

    /// Run one host tick with the raw frame delta in seconds.
    pub fn tick(&mut self, frame_dt: f32) {
        if self.state == FrameState::Halted {
            return;
        }
        self.clock.advance(frame_dt);
        let events = self.input_queue.drain();
        let scale = self.gfx.scale();
        self.input.apply(events, scale);
        for err in self.assets.drain() {
            self.log.error(err.to_string());
        }

        self.gfx.frame_start();
        match self.state {
            FrameState::Loading => {
                if let Err(e) = self.tick_loading() {
                    self.halt(e);
                }
            }
            FrameState::Running => {
                if let Err(e) = self.run_frame() {
                    self.halt(e);
                }
                if self.debug.show_log {
                    self.draw_log();
                }
            }
            FrameState::Halted => {}
        }
        self.input.end_frame();
        self.gfx.frame_end();
    }

    fn tick_loading(&mut self) -> Result<()> {
        let progress = self.assets.load_progress();
        if progress >= 1.0 {
            self.state = FrameState::Running;
            log::info!("assets loaded");
            if let Some(list) = self.world.events.remove("load") {
                for cb in list.snapshot() {
                    cb(self, &[])?;
                }
            }
            if let Some(net) = self.net.as_mut() {
                if let Err(e) = net.connect() {
                    self.log.error(e.to_string());
                }
            }
            return Ok(());
        }

        let (w, h) = (self.gfx.width(), self.gfx.height());
        let bar_w = w / 2.0;
        let bar_h = 24.0 / self.gfx.scale();
        let pos = Vec2::new(w / 2.0, h / 2.0) - Vec2::new(bar_w / 2.0, bar_h / 2.0);
        self.gfx
            .draw_rect(Vec2::ZERO, w, h, &DrawOpts::default().with_color(Color::BLACK));
        self.gfx
            .draw_rect_stroke(pos, bar_w, bar_h, 4.0 / self.gfx.scale(), Color::WHITE);
        self.gfx.draw_rect(pos, bar_w * progress, bar_h, &DrawOpts::default());
        Ok(())
    }

    fn run_frame(&mut self) -> Result<()> {
        // Mapped through last frame's camera; the current one is computed
        // later in the frame.
        let mouse = self.input.mouse_pos();
        self.world.cam_mouse_pos = crate::renderer::screen_to_world(&self.world.cam_matrix, mouse);
        self.poll_net();
        self.trigger("input", &[])?;
        self.dispatch_touches()?;
        frame::game_frame(self, false)?;
        if self.debug.inspect {
            debug::draw_inspect(self)?;
        }
        Ok(())
    }

    fn draw_log(&mut self) {
        if self.log.entries().is_empty() {
            return;
        }
        if let Some(font) = self.assets.def_font() {
            self.log.draw(self.gfx.as_mut(), font);
        }
    }

    /// Stop the frame loop after a fatal error. The last frame stays on
    /// screen.
    fn halt(&mut self, err: KaboomError) {
        self.log.error(err.to_string());
        self.state = FrameState::Halted;
    }

    /// Stop the frame loop.
    pub fn quit(&mut self) {
        log::info!("quit");
        self.state = FrameState::Halted;
    }

    /// Run one game frame ignoring pause.
    pub fn step_frame(&mut self) -> Result<()> {
        frame::game_frame(self, true)
    }

    // -- Events --

    /// Subscribe to a global event.
    pub fn on_event<F>(&mut self, event: &str, f: F) -> Cancel
    where
        F: Fn(&mut Engine, &[Value]) -> Result<()> + 'static,
    {
        let id = self
            .world
            .events
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(f));
        self.cancel_for(CancelTarget::Event {
            event: event.to_string(),
            id,
        })
    }

    /// Fire a global event.
    pub fn trigger(&mut self, event: &str, args: &[Value]) -> Result<()> {
        let listeners = self
            .world
            .events
            .get(event)
            .map(IdList::snapshot)
            .unwrap_or_default();
        for cb in listeners {
            cb(self, args)?;
        }
        Ok(())
    }

    /// Subscribe to `event` on every object matching `tag`, now or later.
    pub fn on<F>(&mut self, event: &str, tag: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId, &[Value]) -> Result<()> + 'static,
    {
        let listener = TagListener {
            tag: tag.into(),
            cb: Rc::new(f),
        };
        let id = self
            .world
            .obj_events
            .entry(event.to_string())
            .or_default()
            .push(listener);
        self.cancel_for(CancelTarget::TagEvent {
            event: event.to_string(),
            id,
        })
    }

    /// Subscribe to `event` on one object.
    pub fn obj_on<F>(&mut self, id: ObjId, event: &str, f: F) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId, &[Value]) -> Result<()> + 'static,
    {
        let obj = self.world.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
        let handle = obj.events.on(event, Rc::new(f));
        let key = obj.key;
        Ok(self.cancel_for(CancelTarget::ObjEvent {
            obj: key,
            event: event.to_string(),
            id: handle,
        }))
    }

    /// Per-frame callback on one object.
    pub fn obj_action<F>(&mut self, id: ObjId, f: F) -> Result<Cancel>
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.obj_on(id, "update", move |k, id, _| f(k, id))
    }

    /// Fire `event` on an object: its own listeners first, then tag
    /// listeners whose tag it matches at dispatch time.
    pub fn trigger_obj(&mut self, id: ObjId, event: &str, args: &[Value]) -> Result<()> {
        let own = match self.world.obj(id) {
            Some(obj) => obj.events.listeners(event),
            None => return Ok(()),
        };
        for cb in own {
            cb(self, id, args)?;
        }
        let tagged = self
            .world
            .obj_events
            .get(event)
            .map(IdList::snapshot)
            .unwrap_or_default();
        for l in tagged {
            let hit = self.world.obj(id).map(|o| o.matches(&l.tag)).unwrap_or(false);
            if hit {
                (l.cb)(self, id, args)?;
            }
        }
        Ok(())
    }

    /// Global per-frame callback, skipped while paused.
    pub fn action<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        let id = self.world.actions.push(Rc::new(f));
        self.cancel_for(CancelTarget::Action(id))
    }

    /// Per-frame callback for every object matching `tag`.
    pub fn action_tag<F>(&mut self, tag: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("update", tag, move |k, id, _| f(k, id))
    }

    /// Global draw callback, run after every object has drawn.
    pub fn render<F>(&mut self, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        let id = self.world.renders.push(Rc::new(f));
        self.cancel_for(CancelTarget::Render(id))
    }

    /// Draw callback for every object matching `tag`.
    pub fn render_tag<F>(&mut self, tag: impl Into<TagMatch>, f: F) -> Cancel
    where
        F: Fn(&mut Engine, ObjId) -> Result<()> + 'static,
    {
        self.on("draw", tag, move |k, id, _| f(k, id))
    }

    /// Run `f` once assets have loaded; immediately if they already have.
    pub fn ready<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        if self.is_loaded() {
            return f(self);
        }
        self.on_event("load", move |k, _| f(k));
        Ok(())
    }

    // -- Timers --

    /// Run `f` once after `t` seconds of scaled game time.
    pub fn wait<F>(&mut self, t: f32, f: F) -> Cancel
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        let id = self.world.timers.push(Timer {
            time: t,
            cb: Rc::new(f),
        });
        self.cancel_for(CancelTarget::Timer(id))
    }

    /// Run `f` now and then every `t` seconds until cancelled.
    pub fn loop_every<F>(&mut self, t: f32, f: F) -> Result<Cancel>
    where
        F: Fn(&mut Engine) -> Result<()> + 'static,
    {
        let stopped = Rc::new(Cell::new(false));
        let f: crate::api::types::Action = Rc::new(f);
        schedule_loop(self, t, f, stopped.clone())?;
        Ok(self.cancel_for(CancelTarget::Flag(stopped)))
    }

    // -- Objects --

    /// Build an object from tags and components and insert it.
    ///
    /// Dependencies are checked before insertion, so a failed `add` leaves
    /// no trace in the world. `add` hooks run synchronously; `load` hooks
    /// run once assets are ready.
    pub fn add(&mut self, specs: Vec<CompSpec>) -> Result<ObjId> {
        let mut obj = GameObject::build(specs)?;
        let id = ObjId(self.world.objs.last_id());
        obj.id = Some(id);
        obj.key = id.0;
        self.world.objs.push(obj);
        self.trigger_obj(id, "add", &[])?;
        // by key, in case the object is readded before assets are ready
        self.ready(move |k| match k.world.resolve(id.0) {
            Some(cur) => k.trigger_obj(cur, "load", &[]),
            None => Ok(()),
        })?;
        Ok(id)
    }

    /// Attach another tag or component to a live object. Dependencies are
    /// not re-checked and no `add` hook fires.
    pub fn use_comp(&mut self, id: ObjId, spec: impl Into<CompSpec>) -> Result<()> {
        let obj = self.world.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
        obj.use_spec(spec.into())
    }

    /// Fire `destroy` on the object, then remove it. Destroying a dead
    /// object does nothing.
    pub fn destroy(&mut self, id: ObjId) -> Result<()> {
        if !self.world.exists(id) {
            return Ok(());
        }
        self.trigger_obj(id, "destroy", &[])?;
        let Some(mut obj) = self.world.objs.delete(id.0) else {
            return Ok(());
        };
        obj.id = None;
        self.world.rehomed.remove(&obj.key);
        self.world.named.retain(|_, v| *v != id);
        mirror::on_destroy(self, id, obj.key);
        Ok(())
    }

    pub fn destroy_all(&mut self, tag: impl Into<TagMatch>) -> Result<()> {
        for id in self.world.get(tag) {
            self.destroy(id)?;
        }
        Ok(())
    }

    /// Move an object to the end of the update/draw order under a fresh
    /// handle. Returns the new handle.
    ///
    /// Disposers and collision state follow the object's stable key; the
    /// handle tables (named objects, travelers, visitors) are rewritten.
    pub fn readd(&mut self, id: ObjId) -> Option<ObjId> {
        let mut obj = self.world.objs.delete(id.0)?;
        let new_id = ObjId(self.world.objs.last_id());
        obj.id = Some(new_id);
        let key = obj.key;
        self.world.objs.push(obj);
        self.world.rehomed.insert(key, new_id);

        let w = &mut self.world;
        let moved = |v: &mut ObjId| {
            if *v == id {
                *v = new_id;
            }
        };
        w.named.values_mut().for_each(moved);
        w.travelers.iter_mut().for_each(moved);
        w.visitors
            .values_mut()
            .flat_map(|objs| objs.values_mut())
            .for_each(moved);
        Some(new_id)
    }

    /// Live objects matching `tag`, layer-sorted.
    pub fn get(&self, tag: impl Into<TagMatch>) -> Vec<ObjId> {
        self.world.get(tag)
    }

    /// Every live object, layer-sorted.
    pub fn get_all(&self) -> Vec<ObjId> {
        self.world.sorted_ids()
    }

    /// Apply `f` to every object matching `tag`, in layer order.
    pub fn every<F>(&mut self, tag: impl Into<TagMatch>, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Engine, ObjId) -> Result<()>,
    {
        for id in self.world.get(tag) {
            if self.world.exists(id) {
                f(self, id)?;
            }
        }
        Ok(())
    }

    /// Like [`Engine::every`], in reverse layer order.
    pub fn revery<F>(&mut self, tag: impl Into<TagMatch>, mut f: F) -> Result<()>
    where
        F: FnMut(&mut Engine, ObjId) -> Result<()>,
    {
        for id in self.world.get(tag).into_iter().rev() {
            if self.world.exists(id) {
                f(self, id)?;
            }
        }
        Ok(())
    }

    /// Call a method a component installed on the object.
    pub fn call(&mut self, id: ObjId, method: &str, args: &[Value]) -> Result<Value> {
        let obj = self.world.obj(id).ok_or(KaboomError::ObjectNotFound(id))?;
        let f = obj.method(method).ok_or_else(|| KaboomError::MethodNotFound {
            obj: id,
            method: method.to_string(),
        })?;
        f(self, id, args)
    }

    // -- Named objects --

    /// Add an object and record it under `name`.
    pub fn register_named(&mut self, name: &str, specs: Vec<CompSpec>) -> Result<ObjId> {
        let id = self.add(specs)?;
        self.world.named.insert(name.to_string(), id);
        Ok(id)
    }

    /// Like [`Engine::register_named`], from declarative descriptions.
    pub fn register_named_desc(&mut self, name: &str, descs: &[CompDesc]) -> Result<ObjId> {
        let specs = descs.iter().map(CompDesc::to_spec).collect();
        self.register_named(name, specs)
    }

    /// Live object recorded under `name`.
    pub fn named(&self, name: &str) -> Option<ObjId> {
        self.world.named(name).filter(|id| self.world.exists(*id))
    }

    // -- Scenes --

    pub fn scene<F>(&mut self, id: &str, f: F)
    where
        F: Fn(&mut Engine, &[Value]) -> Result<()> + 'static,
    {
        self.scenes.register(id, f);
    }

    /// Switch to scene `id` at the start of the next frame.
    pub fn go(&mut self, id: &str, args: Vec<Value>) -> Result<()> {
        let scene = self.scenes.get(id)?;
        let name = id.to_string();
        let args = Rc::new(args);
        self.on_event("nextFrame", move |k, _| {
            log::debug!("entering scene \"{}\"", name);
            k.swap_world();
            scene(k, &args)?;
            if k.config.debug {
                k.reg_debug_input();
            }
            Ok(())
        });
        Ok(())
    }

    /// Replace the world. Handles keep counting so ids from the old world
    /// never alias new objects; the data bag carries over.
    fn swap_world(&mut self) {
        let next = World::new(
            self.world.generation + 1,
            self.world.next_obj_id(),
            self.screen_size(),
            self.input.mouse_pos(),
        );
        let old = std::mem::replace(&mut self.world, next);
        self.world.data = old.data;
    }

    // -- World settings --

    /// Declare layers back-to-front and the default layer.
    pub fn layers(&mut self, names: &[&str], default: Option<&str>) {
        self.world.layers.define(names, default);
    }

    /// Draw the named layers in screen space.
    pub fn cam_ignore(&mut self, names: &[&str]) {
        self.world.layers.ignore_cam(names);
    }

    pub fn cam_pos(&self) -> Vec2 {
        self.world.cam.pos
    }

    pub fn set_cam_pos(&mut self, pos: Vec2) {
        self.world.cam.pos = pos;
    }

    pub fn cam_scale(&self) -> Vec2 {
        self.world.cam.scale
    }

    pub fn set_cam_scale(&mut self, scale: Vec2) {
        self.world.cam.scale = scale;
    }

    pub fn cam_rot(&self) -> f32 {
        self.world.cam.angle
    }

    pub fn set_cam_rot(&mut self, angle: f32) {
        self.world.cam.angle = angle;
    }

    pub fn cam_shake(&mut self, intensity: f32) {
        self.world.cam.set_shake(intensity);
    }

    pub fn gravity(&self) -> f32 {
        self.world.gravity
    }

    pub fn set_gravity(&mut self, g: f32) {
        self.world.gravity = g;
    }

    // -- Storage --

    /// Read a persisted value. Missing or unparsable entries fall back to
    /// `default`, which is then stored.
    pub fn get_data<T>(&mut self, key: &str, default: Option<T>) -> Option<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(v) = self
            .storage
            .get_raw(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
        {
            return Some(v);
        }
        let def = default?;
        if let Err(e) = self.set_data(key, &def) {
            log::warn!("set_data(\"{}\") failed: {}", key, e);
        }
        Some(def)
    }

    pub fn set_data<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set_raw(key, raw)
    }

    // -- Audio --

    /// Play a loaded sound; deferred until assets are ready.
    pub fn play(&mut self, name: &str, conf: PlayConf) -> Result<()> {
        let name = name.to_string();
        self.ready(move |k| {
            let sound = k.assets.sound(&name)?.clone();
            k.audio.play(&sound, &conf);
            Ok(())
        })
    }

    pub fn volume(&mut self, v: f32) {
        self.audio.set_volume(v.clamp(0.0, 1.0));
    }

    // -- Net --

    fn poll_net(&mut self) {
        let batch = match self.net.as_mut() {
            Some(net) => net.poll(),
            None => return,
        };
        for (handler, peer, data) in batch {
            if let Err(e) = handler(self, &peer, &data) {
                self.log.error(e.to_string());
            }
        }
    }

    pub(crate) fn net_mut(&mut self) -> Result<&mut Net> {
        self.net.as_mut().ok_or(KaboomError::NotConnected)
    }

    pub fn send(&mut self, ty: &str, data: serde_json::Value) -> Result<()> {
        self.net_mut()?.send(ty, data)
    }

    /// Handle relay messages of type `ty`. Handler errors are logged, not
    /// fatal.
    pub fn recv<F>(&mut self, ty: &str, f: F) -> Result<()>
    where
        F: Fn(&mut Engine, &str, &serde_json::Value) -> Result<()> + 'static,
    {
        self.net_mut()?.recv(ty, Rc::new(f));
        Ok(())
    }

    /// Mirror an object to the other peers.
    pub fn sync(&mut self, id: ObjId) -> Result<()> {
        mirror::sync(self, id)
    }
}

fn schedule_loop(
    k: &mut Engine,
    t: f32,
    f: crate::api::types::Action,
    stopped: Rc<Cell<bool>>,
) -> Result<()> {
    if stopped.get() {
        return Ok(());
    }
    f(k)?;
    k.wait(t, move |k| schedule_loop(k, t, f.clone(), stopped.clone()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comps;
    use crate::core::comp::Comp;
    use crate::renderer::DrawList;
    use std::cell::RefCell;

    fn engine() -> Engine {
        Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        )
    }

    fn running() -> Engine {
        let mut k = engine();
        k.tick(0.0);
        assert_eq!(k.state(), FrameState::Running);
        k
    }

    #[test]
    fn starts_loading_then_runs() {
        let mut k = engine();
        assert_eq!(k.state(), FrameState::Loading);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        k.ready(move |_| {
            h.set(h.get() + 1);
            Ok(())
        })
        .unwrap();
        assert_eq!(hits.get(), 0);
        k.tick(0.016);
        assert_eq!(hits.get(), 1);
        k.tick(0.016);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn load_hook_fires_once_after_barrier() {
        let mut k = engine();
        let loads = Rc::new(Cell::new(0));
        let l = loads.clone();
        let comp = Comp::new("probe").on_load(move |_, _| {
            l.set(l.get() + 1);
            Ok(())
        });
        k.add(comps![comp]).unwrap();
        assert_eq!(loads.get(), 0);
        k.tick(0.016);
        k.tick(0.016);
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn add_fires_add_synchronously() {
        let mut k = running();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        k.on("add", "enemy", move |_, id, _| {
            s.borrow_mut().push(id);
            Ok(())
        });
        let id = k.add(comps!["enemy"]).unwrap();
        let _other = k.add(comps!["hero"]).unwrap();
        assert_eq!(*seen.borrow(), vec![id]);
    }

    #[test]
    fn failed_add_leaves_no_object() {
        let mut k = running();
        let err = k.add(comps![Comp::new("body").require(&["area"])]);
        assert!(matches!(err, Err(KaboomError::MissingDependency { .. })));
        assert_eq!(k.obj_count(), 0);
    }

    #[test]
    fn destroy_fires_then_removes() {
        let mut k = running();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let comp = Comp::new("x").on_destroy(move |k, id| {
            assert!(k.exists(id));
            f.set(true);
            Ok(())
        });
        let id = k.add(comps![comp]).unwrap();
        k.destroy(id).unwrap();
        assert!(fired.get());
        assert!(!k.exists(id));
        // second destroy is a no-op
        k.destroy(id).unwrap();
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut k = running();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let c = k.on_event("ping", move |_, _| {
            h.set(h.get() + 1);
            Ok(())
        });
        k.trigger("ping", &[]).unwrap();
        c.cancel(&mut k);
        c.cancel(&mut k);
        k.trigger("ping", &[]).unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn call_reaches_methods() {
        let mut k = running();
        let comp = Comp::new("greeter").func("greet", |_, _, args| {
            Ok(Value::Str(format!("hi {}", args[0])))
        });
        let id = k.add(comps![comp]).unwrap();
        let out = k.call(id, "greet", &[Value::from("bob")]).unwrap();
        assert_eq!(out, Value::Str("hi bob".into()));
        assert!(matches!(
            k.call(id, "nope", &[]),
            Err(KaboomError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn readd_moves_to_end() {
        let mut k = running();
        let a = k.add(comps!["a"]).unwrap();
        let b = k.add(comps!["b"]).unwrap();
        let a2 = k.readd(a).unwrap();
        assert!(!k.exists(a));
        assert_eq!(k.get_all(), vec![b, a2]);
    }

    #[test]
    fn disposers_follow_a_readded_object() {
        let mut k = running();
        let id = k.add(comps!["a"]).unwrap();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let c = k
            .obj_action(id, move |_, _| {
                h.set(h.get() + 1);
                Ok(())
            })
            .unwrap();
        let moved = k.readd(id).unwrap();
        k.tick(1.0 / 60.0);
        assert_eq!(hits.get(), 1);

        c.cancel(&mut k);
        k.tick(1.0 / 60.0);
        assert_eq!(hits.get(), 1);
        assert!(k.exists(moved));
    }

    #[test]
    fn readd_updates_named_table() {
        let mut k = running();
        let id = k.register_named("hero", comps!["hero"]).unwrap();
        let moved = k.readd(id).unwrap();
        assert_eq!(k.named("hero"), Some(moved));
        k.destroy(moved).unwrap();
        assert_eq!(k.named("hero"), None);
        assert!(k.world.rehomed.is_empty());
    }

    #[test]
    fn named_objects_resolve_until_destroyed() {
        let mut k = running();
        let id = k.register_named("hero", comps!["hero"]).unwrap();
        assert_eq!(k.named("hero"), Some(id));
        k.destroy(id).unwrap();
        assert_eq!(k.named("hero"), None);
    }

    #[test]
    fn data_falls_back_to_default_and_persists() {
        let mut k = running();
        assert_eq!(k.get_data::<u32>("score", None), None);
        assert_eq!(k.get_data("score", Some(7u32)), Some(7));
        k.set_data("score", &9u32).unwrap();
        assert_eq!(k.get_data("score", Some(0u32)), Some(9));
    }

    #[test]
    fn net_calls_without_transport_fail() {
        let mut k = running();
        assert!(matches!(
            k.send("X", serde_json::Value::Null),
            Err(KaboomError::NotConnected)
        ));
        let id = k.add(comps![]).unwrap();
        assert!(matches!(k.sync(id), Err(KaboomError::NotConnected)));
    }

    #[test]
    fn go_to_unknown_scene_errors() {
        let mut k = running();
        assert!(matches!(
            k.go("nowhere", vec![]),
            Err(KaboomError::SceneNotFound(_))
        ));
    }

    #[test]
    fn frame_error_halts() {
        let mut k = running();
        k.action(|_| Err(KaboomError::InvalidComp("boom".into())));
        k.tick(0.016);
        assert_eq!(k.state(), FrameState::Halted);
        assert_eq!(k.debug_log().entries().len(), 1);
        let time = k.time();
        k.tick(0.016);
        assert_eq!(k.time(), time);
    }

    #[test]
    fn loop_every_fires_now_then_periodically() {
        let mut k = running();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let stop = k
            .loop_every(0.5, move |_| {
                h.set(h.get() + 1);
                Ok(())
            })
            .unwrap();
        assert_eq!(hits.get(), 1);
        k.tick(0.5);
        assert_eq!(hits.get(), 2);
        k.tick(0.5);
        assert_eq!(hits.get(), 3);
        stop.cancel(&mut k);
        k.tick(0.5);
        k.tick(0.5);
        assert_eq!(hits.get(), 3);
    }
}

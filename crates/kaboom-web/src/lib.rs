pub mod runner;

pub use runner::{GameRunner, HostAudio, HostTransport, LocalStorage};

// Used by `export_game!` expansions.
#[doc(hidden)]
pub use console_error_panic_hook;
#[doc(hidden)]
pub use console_log;
#[doc(hidden)]
pub use js_sys;
pub use kaboom_engine;
#[doc(hidden)]
pub use log;
pub use wasm_bindgen;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input, assets, relay, draw buffer)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod game;
/// use game::MyGame;
///
/// kaboom_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: a type implementing `kaboom_engine::Game` and `Default`
/// - `$game_name`: a string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;
        use $crate::kaboom_engine::InputEvent;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        /// Run `f` against the runner; does nothing before `game_init`.
        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    $crate::log::warn!("game not initialized, call game_init() first");
                    R::default()
                }
            })
        }

        #[wasm_bindgen]
        pub fn game_init() {
            $crate::console_error_panic_hook::set_once();
            let _ = $crate::console_log::init_with_level($crate::log::Level::Info);

            let game = <$game_type>::default();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            with_runner(|r| r.init());
            $crate::log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        // ---- Input ----

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32, dx: f32, dy: f32) {
            with_runner(|r| r.push_input(InputEvent::PointerMove { x, y, dx, dy }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key: &str, repeat: bool) {
            let key = key.to_string();
            with_runner(|r| r.push_input(InputEvent::KeyDown { key, repeat }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key: &str) {
            let key = key.to_string();
            with_runner(|r| r.push_input(InputEvent::KeyUp { key }));
        }

        #[wasm_bindgen]
        pub fn game_touch_start(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::TouchStart { id, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_touch_move(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::TouchMove { id, x, y }));
        }

        #[wasm_bindgen]
        pub fn game_touch_end(id: u32, x: f32, y: f32) {
            with_runner(|r| r.push_input(InputEvent::TouchEnd { id, x, y }));
        }

        // ---- Assets ----

        #[wasm_bindgen]
        pub fn game_pending_assets() -> String {
            with_runner(|r| r.pending_assets_json())
        }

        #[wasm_bindgen]
        pub fn game_resolve_texture(name: &str, tex: u32, w: f32, h: f32) {
            with_runner(|r| r.resolve_texture(name, tex, w, h));
        }

        #[wasm_bindgen]
        pub fn game_resolve_sound(name: &str, handle: u32) {
            with_runner(|r| r.resolve_sound(name, handle));
        }

        #[wasm_bindgen]
        pub fn game_fail_asset(name: &str, reason: &str) {
            with_runner(|r| r.fail_asset(name, reason));
        }

        // ---- Relay ----

        #[wasm_bindgen]
        pub fn game_net_requested() -> bool {
            with_runner(|r| r.net_requested())
        }

        #[wasm_bindgen]
        pub fn game_net_opened(open: bool) {
            with_runner(|r| r.net_opened(open));
        }

        #[wasm_bindgen]
        pub fn game_net_deliver(frame: String) {
            with_runner(|r| r.net_deliver(frame));
        }

        #[wasm_bindgen]
        pub fn game_net_outbox() -> $crate::js_sys::JsString {
            let json = with_runner(|r| r.net_take_outbox());
            $crate::js_sys::JsString::from(json)
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_commands_ptr() -> *const f32 {
            with_runner(|r| Some(r.commands_ptr())).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_command_count() -> u32 {
            with_runner(|r| r.command_count())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const f32 {
            with_runner(|r| Some(r.sound_events_ptr())).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            with_runner(|r| r.width())
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            with_runner(|r| r.height())
        }

        #[wasm_bindgen]
        pub fn get_state() -> u32 {
            with_runner(|r| r.state())
        }

        #[wasm_bindgen]
        pub fn get_load_progress() -> f32 {
            with_runner(|r| r.load_progress())
        }
    };
}

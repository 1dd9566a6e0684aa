use crate::api::config::EngineConfig;
use crate::api::engine::Engine;
use crate::assets::{AssetManifest, LoadTicket};
use crate::error::Result;
use crate::renderer::Renderer;

/// The contract a game fulfills toward a host.
///
/// Everything after `init` is driven by the callbacks the game registers:
/// scenes, actions, input bindings, collision handlers.
pub trait Game {
    /// Engine configuration. Called once before `init`.
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
    }

    /// Assets to fetch before the first running frame.
    fn manifest(&self) -> Option<AssetManifest> {
        None
    }

    /// Declare scenes and enter the first one.
    fn init(&mut self, k: &mut Engine) -> Result<()>;
}

/// Build an engine for `game`, queue its manifest and run `init`.
///
/// The returned tickets belong to the host, which resolves them as files
/// arrive.
pub fn start<G: Game>(game: &mut G, gfx: Box<dyn Renderer>) -> Result<(Engine, Vec<LoadTicket>)> {
    let mut k = Engine::new(game.config(), gfx);
    let tickets = match game.manifest() {
        Some(manifest) => k.assets_mut().queue_manifest(&manifest),
        None => Vec::new(),
    };
    game.init(&mut k)?;
    log::info!("game started, {} assets queued", tickets.len());
    Ok((k, tickets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::engine::FrameState;
    use crate::comps;
    use crate::components::transform::pos;
    use crate::renderer::DrawList;

    struct Demo;

    impl Game for Demo {
        fn manifest(&self) -> Option<AssetManifest> {
            AssetManifest::from_json(
                r#"{"sprites": {"hero": {"path": "hero.png", "slice_x": 2}}}"#,
            )
            .ok()
        }

        fn init(&mut self, k: &mut Engine) -> Result<()> {
            k.scene("main", |k, _| {
                k.add(comps![pos(0.0, 0.0), "hero"])?;
                Ok(())
            });
            k.go("main", Vec::new())
        }
    }

    #[test]
    fn start_waits_for_manifest() {
        let (mut k, mut tickets) =
            start(&mut Demo, Box::new(DrawList::new(640.0, 480.0, 1.0))).unwrap();
        assert_eq!(tickets.len(), 1);
        k.tick(0.016);
        assert_eq!(k.state(), FrameState::Loading);

        tickets
            .remove(0)
            .resolve_texture(crate::renderer::TexId(3), glam::Vec2::new(32.0, 16.0));
        k.tick(0.016);
        assert_eq!(k.state(), FrameState::Running);
        k.tick(0.016);
        assert_eq!(k.get("hero").len(), 1);
        assert!(k.assets().sprite("hero").is_ok());
    }
}

//! The per-frame schedule.
//!
//! Order within one game frame:
//! 1. drain `nextFrame` listeners (scene swaps land here)
//! 2. advance timers
//! 3. `update` on every unpaused object, newest first
//! 4. global actions
//! 5. camera matrix (with shake) for this frame
//! 6. `draw` on every visible object, layer-sorted
//! 7. global renders
//!
//! Steps 2 to 4 are skipped while the debug pause is on, unless the frame
//! is being stepped by hand.

use crate::api::engine::Engine;
use crate::error::Result;

pub(crate) fn game_frame(k: &mut Engine, ignore_pause: bool) -> Result<()> {
    if let Some(list) = k.world.events.remove("nextFrame") {
        for cb in list.snapshot() {
            cb(k, &[])?;
        }
    }

    let do_update = ignore_pause || !k.debug.paused;
    let dt = k.dt();

    if do_update {
        run_timers(k, dt)?;

        for id in k.world.ids().into_iter().rev() {
            let paused = match k.world.obj(id) {
                Some(obj) => obj.paused,
                None => continue,
            };
            if !paused {
                k.trigger_obj(id, "update", &[])?;
            }
        }

        for action in k.world.actions.snapshot() {
            action(k)?;
        }
    }

    update_camera(k, dt);
    draw_objects(k)?;

    for render in k.world.renders.snapshot() {
        render(k)?;
    }
    Ok(())
}

/// Count every timer down; fired timers are removed before their callback
/// runs, so a callback may schedule a new one freely.
fn run_timers(k: &mut Engine, dt: f32) -> Result<()> {
    for handle in k.world.timers.handles() {
        let due = match k.world.timers.get_mut(handle) {
            Some(timer) => {
                timer.time -= dt;
                timer.time <= 0.0
            }
            None => continue,
        };
        if due {
            if let Some(timer) = k.world.timers.delete(handle) {
                (timer.cb)(k)?;
            }
        }
    }
    Ok(())
}

fn update_camera(k: &mut Engine, dt: f32) {
    let screen = k.screen_size();
    let angle = k.rng.gen_range(0.0, std::f32::consts::TAU);
    let shake = k.world.cam.shake_offset(angle);
    k.world.cam.decay_shake(dt);
    k.world.cam_matrix = k.world.cam.matrix(screen, shake);
}

fn draw_objects(k: &mut Engine) -> Result<()> {
    for id in k.world.sorted_ids() {
        let cam = match k.world.obj(id) {
            Some(obj) if !obj.hidden => k.world.is_cam_layer(obj.str("layer")),
            _ => continue,
        };
        k.gfx.push_transform();
        if cam {
            let m = k.world.cam_matrix;
            k.gfx.push_matrix(&m);
        }
        let res = k.trigger_obj(id, "draw", &[]);
        k.gfx.pop_transform();
        res?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::api::config::EngineConfig;
    use crate::api::engine::Engine;
    use crate::comps;
    use crate::core::comp::Comp;
    use crate::renderer::DrawList;

    fn running() -> Engine {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        k.tick(0.0);
        k
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>, name: &str) -> Comp {
        let (u, d) = (log.clone(), log.clone());
        let (nu, nd) = (name.to_string(), name.to_string());
        Comp::new("rec")
            .on_update(move |_, _| {
                u.borrow_mut().push(format!("update {}", nu));
                Ok(())
            })
            .on_draw(move |_, _| {
                d.borrow_mut().push(format!("draw {}", nd));
                Ok(())
            })
    }

    #[test]
    fn updates_newest_first_draws_oldest_first() {
        let mut k = running();
        let log = Rc::new(RefCell::new(Vec::new()));
        k.add(comps![recorder(&log, "a")]).unwrap();
        k.add(comps![recorder(&log, "b")]).unwrap();
        k.tick(0.016);
        assert_eq!(
            *log.borrow(),
            vec!["update b", "update a", "draw a", "draw b"]
        );
    }

    #[test]
    fn paused_skips_updates_and_timers_but_draws() {
        let mut k = running();
        let log = Rc::new(RefCell::new(Vec::new()));
        k.add(comps![recorder(&log, "a")]).unwrap();
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        k.wait(0.01, move |_| {
            f.set(true);
            Ok(())
        });
        k.debug.paused = true;
        k.tick(0.016);
        assert_eq!(*log.borrow(), vec!["draw a"]);
        assert!(!fired.get());

        k.step_frame().unwrap();
        assert!(fired.get());
    }

    #[test]
    fn hidden_objects_skip_draw() {
        let mut k = running();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = k.add(comps![recorder(&log, "a")]).unwrap();
        k.obj_mut(id).unwrap().hidden = true;
        k.tick(0.016);
        assert_eq!(*log.borrow(), vec!["update a"]);
    }

    #[test]
    fn wait_fires_once_after_enough_time() {
        let mut k = running();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        k.wait(1.0, move |_| {
            h.set(h.get() + 1);
            Ok(())
        });
        for _ in 0..3 {
            k.tick(0.25);
        }
        assert_eq!(hits.get(), 0);
        k.tick(0.25);
        assert_eq!(hits.get(), 1);
        k.tick(0.25);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn time_scale_stretches_timers() {
        let mut k = running();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        k.wait(1.0, move |_| {
            h.set(h.get() + 1);
            Ok(())
        });
        k.debug.time_scale = 0.5;
        k.tick(1.0);
        assert_eq!(hits.get(), 0);
        k.tick(1.0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn object_added_during_update_waits_a_frame() {
        let mut k = running();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        let spawned = Rc::new(Cell::new(false));
        let s = spawned.clone();
        let spawner = Comp::new("spawner").on_update(move |k, _| {
            if !s.get() {
                s.set(true);
                k.add(comps![recorder(&l, "child")])?;
            }
            Ok(())
        });
        k.add(comps![spawner]).unwrap();
        k.tick(0.016);
        // the child was not in this frame's update snapshot, but it is drawn
        assert_eq!(*log.borrow(), vec!["draw child"]);
    }

    #[test]
    fn draw_balances_transforms() {
        let gfx = Rc::new(RefCell::new(DrawList::new(640.0, 480.0, 1.0)));
        let mut k = Engine::new(EngineConfig::default(), Box::new(gfx.clone()));
        k.tick(0.0);
        k.add(comps!["a"]).unwrap();
        k.add(comps!["b"]).unwrap();
        k.tick(0.016);
        assert_eq!(gfx.borrow().depth(), 0);
    }
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;
use kaboom_engine::components::{area, pos, solid};
use kaboom_engine::core::registry::IdList;
use kaboom_engine::{comps, Comp, DrawList, Engine, EngineConfig, FrameState, KaboomError, Side, Value};

fn running() -> Engine {
    let mut k = Engine::new(
        EngineConfig::default(),
        Box::new(DrawList::new(640.0, 480.0, 1.0)),
    );
    k.tick(0.0);
    k
}

fn boxed(k: &mut Engine, x: f32, y: f32, tag: &str) -> kaboom_engine::ObjId {
    k.add(comps![
        pos(x, y),
        area(Vec2::ZERO, Vec2::new(10.0, 10.0)),
        solid(),
        tag
    ])
    .unwrap()
}

#[test]
fn push_out_takes_the_shallow_axis() {
    let mut k = running();
    let player = boxed(&mut k, 0.0, 0.0, "player");
    let wall = boxed(&mut k, 5.0, 0.0, "wall");

    let contact = k.push_out(player, wall).unwrap();
    assert_eq!(contact.side, Side::Right);
    assert_eq!(k.obj(player).unwrap().vec2("pos"), Some(Vec2::new(-5.0, 0.0)));
    assert!(!k.is_overlapped(player, wall));
    assert!(k.push_out(player, wall).map_or(true, |c| c.dis == 0.0));
}

#[test]
fn wait_fires_once_after_exact_time() {
    let mut k = running();
    let fired = Rc::new(Cell::new(0));
    let f = fired.clone();
    k.wait(1.0, move |_| {
        f.set(f.get() + 1);
        Ok(())
    });
    for _ in 0..3 {
        k.tick(0.25);
    }
    assert_eq!(fired.get(), 0);
    k.tick(0.25);
    assert_eq!(fired.get(), 1);
    for _ in 0..8 {
        k.tick(0.25);
    }
    assert_eq!(fired.get(), 1);
}

#[test]
fn missing_dependency_names_the_component() {
    let mut k = running();
    let needy = Comp::new("hitbox").require(&["area"]);
    match k.add(comps![pos(0.0, 0.0), needy]) {
        Err(KaboomError::MissingDependency { comp, dep }) => {
            assert_eq!(comp, "hitbox");
            assert_eq!(dep, "area");
        }
        _ => panic!("expected a dependency error"),
    }
    assert_eq!(k.obj_count(), 0);
}

#[test]
fn overlap_fires_once_per_contact_episode() {
    let mut k = running();
    let hits = Rc::new(Cell::new(0));
    let h = hits.clone();
    k.overlaps("player", "coin", move |_, _, _| {
        h.set(h.get() + 1);
        Ok(())
    });
    let player = k
        .add(comps![pos(0.0, 0.0), area(Vec2::ZERO, Vec2::new(10.0, 10.0)), "player"])
        .unwrap();
    k.add(comps![pos(4.0, 4.0), area(Vec2::ZERO, Vec2::new(10.0, 10.0)), "coin"])
        .unwrap();
    for _ in 0..10 {
        k.tick(1.0 / 60.0);
    }
    assert_eq!(hits.get(), 1);

    k.obj_mut(player).unwrap().set("pos", Vec2::new(100.0, 0.0));
    k.tick(1.0 / 60.0);
    k.obj_mut(player).unwrap().set("pos", Vec2::ZERO);
    k.tick(1.0 / 60.0);
    assert_eq!(hits.get(), 2);
}

#[test]
fn scene_switch_waits_for_frame_boundary() {
    let mut k = running();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));

    let l = log.clone();
    k.scene("a", move |k, _| {
        let l = l.clone();
        let id = k.add(comps![pos(0.0, 0.0), "a"])?;
        k.obj_action(id, move |k, _| {
            l.borrow_mut().push("a".into());
            if l.borrow().len() == 2 {
                k.go("b", vec![Value::Num(7.0)])?;
            }
            Ok(())
        })?;
        Ok(())
    });
    let l = log.clone();
    k.scene("b", move |k, args| {
        l.borrow_mut().push(format!("b {}", args[0]));
        k.add(comps![pos(0.0, 0.0), "b"])?;
        Ok(())
    });

    k.go("a", Vec::new()).unwrap();
    for _ in 0..4 {
        k.tick(1.0 / 60.0);
    }
    assert_eq!(*log.borrow(), vec!["a", "a", "b 7"]);
    assert!(k.get("a").is_empty());
    assert_eq!(k.get("b").len(), 1);
}

#[test]
fn exists_tracks_add_and_destroy() {
    let mut k = running();
    let id = k.add(comps![pos(0.0, 0.0)]).unwrap();
    assert!(k.exists(id));
    assert!(k.obj(id).unwrap().exists());
    k.destroy(id).unwrap();
    assert!(!k.exists(id));
    assert!(!k.get_all().contains(&id));
    k.destroy(id).unwrap();
}

#[test]
fn registry_keeps_insertion_order_and_never_reuses() {
    let mut list = IdList::new();
    let a = list.push("a");
    let b = list.push("b");
    let c = list.push("c");
    list.delete(b);
    let d = list.push("d");
    assert!(d > c && d != b && a < c);
    let order: Vec<&str> = list.values().copied().collect();
    assert_eq!(order, vec!["a", "c", "d"]);
}

#[test]
fn frame_error_halts_engine() {
    let mut k = running();
    let ticks = Rc::new(Cell::new(0));
    let t = ticks.clone();
    k.action(move |_| {
        t.set(t.get() + 1);
        Err(KaboomError::InvalidComp("boom".into()))
    });
    k.tick(1.0 / 60.0);
    k.tick(1.0 / 60.0);
    assert_eq!(k.state(), FrameState::Halted);
    assert_eq!(ticks.get(), 1);
    assert!(k.debug_log().entries().iter().any(|e| e.msg.contains("boom")));
}

#[test]
fn camera_shake_decays_to_zero() {
    let mut k = running();
    k.cam_shake(12.0);
    let mut last = k.world().cam.shake;
    for _ in 0..240 {
        k.tick(1.0 / 60.0);
        let now = k.world().cam.shake;
        assert!(now >= 0.0 && now <= last);
        last = now;
    }
    assert!(last < 0.01);
}

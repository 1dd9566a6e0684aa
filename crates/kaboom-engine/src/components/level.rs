//! Grid levels built from ASCII maps.

use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec2;

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::components::transform::{arg_vec2, pos};
use crate::core::comp::{Comp, CompSpec};
use crate::core::value::Value;
use crate::error::{KaboomError, Result};

pub type SymbolFn = Rc<dyn Fn() -> Vec<CompSpec>>;
pub type AnyFn = Rc<dyn Fn(char) -> Vec<CompSpec>>;

/// Cell size, origin and symbol table of a level.
#[derive(Clone)]
pub struct LevelConf {
    pub width: f32,
    pub height: f32,
    pub pos: Vec2,
    symbols: HashMap<char, SymbolFn>,
    any: Option<AnyFn>,
}

impl LevelConf {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            pos: Vec2::ZERO,
            symbols: HashMap::new(),
            any: None,
        }
    }

    pub fn pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn symbol<F>(mut self, sym: char, f: F) -> Self
    where
        F: Fn() -> Vec<CompSpec> + 'static,
    {
        self.symbols.insert(sym, Rc::new(f));
        self
    }

    /// Fallback for characters without a symbol entry.
    pub fn any<F>(mut self, f: F) -> Self
    where
        F: Fn(char) -> Vec<CompSpec> + 'static,
    {
        self.any = Some(Rc::new(f));
        self
    }

    fn comps_for(&self, sym: char) -> Option<Vec<CompSpec>> {
        match self.symbols.get(&sym) {
            Some(f) => Some(f()),
            None => self.any.as_ref().map(|f| f(sym)),
        }
    }
}

/// A spawned level. Objects it created are tracked for [`Level::destroy`].
pub struct Level {
    conf: LevelConf,
    rows: usize,
    long_row: usize,
    objs: Vec<ObjId>,
}

impl Level {
    pub fn offset(&self) -> Vec2 {
        self.conf.pos
    }

    pub fn grid_width(&self) -> f32 {
        self.conf.width
    }

    pub fn grid_height(&self) -> f32 {
        self.conf.height
    }

    /// World position of grid cell `p`.
    pub fn get_pos(&self, p: Vec2) -> Vec2 {
        cell_pos(self.conf.pos, self.cell(), p)
    }

    fn cell(&self) -> Vec2 {
        Vec2::new(self.conf.width, self.conf.height)
    }

    /// Add the object for `sym` at grid cell `p`. Symbols with no entry and
    /// no `any` fallback spawn nothing.
    pub fn spawn(&mut self, k: &mut Engine, sym: char, p: Vec2) -> Result<Option<ObjId>> {
        let Some(comps) = self.conf.comps_for(sym) else {
            return Ok(None);
        };
        self.spawn_comps(k, comps, p).map(Some)
    }

    /// Add an object built from `comps` at grid cell `p`. A `pos` component
    /// in the list offsets the object within its cell.
    pub fn spawn_comps(&mut self, k: &mut Engine, mut comps: Vec<CompSpec>, p: Vec2) -> Result<ObjId> {
        let mut at = self.get_pos(p);
        let local = comps.iter().find_map(|c| match c {
            CompSpec::Comp(c) if c.id() == Some("pos") => c.data("pos").and_then(Value::as_vec2),
            _ => None,
        });
        if let Some(local) = local {
            at += local;
        }
        comps.push(pos(at.x, at.y).into());
        comps.push(gridder(self.conf.pos, self.cell(), p).into());
        let id = k.add(comps)?;
        self.objs.push(id);
        Ok(id)
    }

    /// Width of the longest row, in world units.
    pub fn width(&self) -> f32 {
        self.long_row as f32 * self.conf.width
    }

    pub fn height(&self) -> f32 {
        self.rows as f32 * self.conf.height
    }

    pub fn objs(&self) -> &[ObjId] {
        &self.objs
    }

    pub fn destroy(&self, k: &mut Engine) -> Result<()> {
        for id in &self.objs {
            k.destroy(*id)?;
        }
        Ok(())
    }
}

fn cell_pos(offset: Vec2, cell: Vec2, p: Vec2) -> Vec2 {
    offset + p * cell
}

/// Spawn one object per mapped character of `map`.
pub fn add_level(k: &mut Engine, map: &[&str], conf: LevelConf) -> Result<Level> {
    let mut level = Level {
        conf,
        rows: map.len(),
        long_row: 0,
        objs: Vec::new(),
    };
    for (i, row) in map.iter().enumerate() {
        let syms: Vec<char> = row.chars().collect();
        level.long_row = level.long_row.max(syms.len());
        for (j, sym) in syms.into_iter().enumerate() {
            level.spawn(k, sym, Vec2::new(j as f32, i as f32))?;
        }
    }
    log::debug!(
        "level {}x{} spawned {} objects",
        level.long_row,
        level.rows,
        level.objs.len()
    );
    Ok(level)
}

/// `gridder(offset, cell, grid_pos)`: keeps `pos` snapped to a level grid.
pub fn gridder(offset: Vec2, cell: Vec2, grid_pos: Vec2) -> Comp {
    let step = move |k: &mut Engine, id: ObjId, d: Vec2| -> Result<Value> {
        let cur = k
            .obj(id)
            .and_then(|o| o.vec2("gridPos"))
            .ok_or(KaboomError::ObjectNotFound(id))?;
        set_grid_pos(k, id, offset, cell, cur + d)?;
        Ok(Value::Null)
    };
    Comp::new("gridder")
        .require(&["pos"])
        .field("gridPos", grid_pos)
        .func("setGridPos", move |k, id, args| {
            let p = arg_vec2(args)
                .ok_or_else(|| KaboomError::InvalidComp("setGridPos expects a vec2".into()))?;
            set_grid_pos(k, id, offset, cell, p)?;
            Ok(Value::Null)
        })
        .func("moveLeft", move |k, id, _| step(k, id, Vec2::NEG_X))
        .func("moveRight", move |k, id, _| step(k, id, Vec2::X))
        .func("moveUp", move |k, id, _| step(k, id, Vec2::NEG_Y))
        .func("moveDown", move |k, id, _| step(k, id, Vec2::Y))
}

fn set_grid_pos(k: &mut Engine, id: ObjId, offset: Vec2, cell: Vec2, p: Vec2) -> Result<()> {
    let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
    obj.set("gridPos", p);
    obj.set("pos", cell_pos(offset, cell, p));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::comps;
    use crate::renderer::DrawList;

    fn engine() -> Engine {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        k.tick(0.0);
        k
    }

    fn conf() -> LevelConf {
        LevelConf::new(10.0, 20.0)
            .pos(Vec2::new(100.0, 0.0))
            .symbol('=', || comps!["wall"])
            .symbol('$', || comps!["coin", pos(2.0, 3.0)])
    }

    #[test]
    fn spawns_mapped_cells() {
        let mut k = engine();
        let level = add_level(&mut k, &["=  =", "$=="], conf()).unwrap();
        assert_eq!(k.get("wall").len(), 4);
        assert_eq!(level.objs().len(), 5);
        assert_eq!(level.width(), 40.0);
        assert_eq!(level.height(), 40.0);

        let coin = k.get("coin")[0];
        assert_eq!(k.obj(coin).unwrap().vec2("pos"), Some(Vec2::new(102.0, 23.0)));
    }

    #[test]
    fn any_fallback_gets_the_char() {
        let mut k = engine();
        let conf = LevelConf::new(8.0, 8.0).any(|c| match c {
            '1'..='9' => comps![format!("n{}", c)],
            _ => Vec::new(),
        });
        add_level(&mut k, &["1 2"], conf).unwrap();
        assert_eq!(k.get("n2").len(), 1);
        assert_eq!(k.get_all().len(), 3);
    }

    #[test]
    fn gridder_moves_by_cells() {
        let mut k = engine();
        let level = add_level(&mut k, &["  $"], conf()).unwrap();
        let coin = level.objs()[0];
        k.call(coin, "moveDown", &[]).unwrap();
        k.call(coin, "moveLeft", &[]).unwrap();
        let obj = k.obj(coin).unwrap();
        assert_eq!(obj.vec2("gridPos"), Some(Vec2::new(1.0, 1.0)));
        assert_eq!(obj.vec2("pos"), Some(level.get_pos(Vec2::new(1.0, 1.0))));
    }

    #[test]
    fn destroy_removes_everything() {
        let mut k = engine();
        let level = add_level(&mut k, &["=$="], conf()).unwrap();
        level.destroy(&mut k).unwrap();
        assert_eq!(k.obj_count(), 0);
    }
}

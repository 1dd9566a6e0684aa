//! Bitmap text component.

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::assets::DEF_FONT;
use crate::components::area::area_from_size;
use crate::components::transform::{draw_opts, obj_origin};
use crate::core::comp::Comp;
use crate::core::value::Value;
use crate::error::{KaboomError, Result};
use crate::systems::text::{format_text, FormattedText, TextOpts};

pub const DEF_TEXT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextConf {
    /// Font name; the built-in font when `None`.
    pub font: Option<String>,
    /// Wrap width.
    pub width: Option<f32>,
    pub no_area: bool,
}

/// `text(t, size, conf)`. `width`/`height` are refreshed every draw.
pub fn text(t: &str, size: Option<f32>, conf: TextConf) -> Comp {
    let no_area = conf.no_area;
    Comp::new("text")
        .field("text", t)
        .field("textSize", size.unwrap_or(DEF_TEXT_SIZE))
        .field("font", conf.font)
        .field("wrap_width", conf.width)
        .field("width", 0.0)
        .field("height", 0.0)
        .on_load(move |k, id| {
            let obj = k.obj(id).ok_or(KaboomError::ObjectNotFound(id))?;
            if no_area || obj.has("area") {
                return Ok(());
            }
            let ftext = layout(k, id)?;
            let origin = obj_origin(obj);
            let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
            obj.set("width", ftext.width);
            obj.set("height", ftext.height);
            k.use_comp(id, area_from_size(ftext.width, ftext.height, origin))
        })
        .on_draw(|k, id| {
            let ftext = layout(k, id)?;
            if let Some(obj) = k.obj_mut(id) {
                obj.set("width", ftext.width);
                obj.set("height", ftext.height);
            }
            k.gfx_mut().draw_text(&ftext);
            Ok(())
        })
        .func("setText", |k, id, args| {
            let t = args.first().map(Value::to_string).unwrap_or_default();
            let obj = k.obj_mut(id).ok_or(KaboomError::ObjectNotFound(id))?;
            obj.set("text", t);
            Ok(Value::Null)
        })
}

/// Lay out the object's current text at its transform.
pub fn layout(k: &Engine, id: ObjId) -> Result<FormattedText> {
    let obj = k.obj(id).ok_or(KaboomError::ObjectNotFound(id))?;
    let font_name = obj.str("font").unwrap_or(DEF_FONT);
    let font = k.assets().font(font_name)?;
    let d = draw_opts(obj);
    let opts = TextOpts {
        pos: d.pos,
        size: obj.num("textSize"),
        scale: d.scale,
        angle: d.angle,
        origin: d.origin,
        color: d.color,
        width: obj.num("wrap_width"),
    };
    Ok(format_text(obj.str("text").unwrap_or(""), font, &opts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::assets::ASCII_CHARS;
    use crate::comps;
    use crate::components::transform::pos;
    use crate::renderer::{DrawList, TexId};
    use crate::systems::text::FontData;
    use glam::Vec2;

    fn engine() -> Engine {
        let mut k = Engine::new(
            EngineConfig::default(),
            Box::new(DrawList::new(640.0, 480.0, 1.0)),
        );
        k.assets_mut().add_font(
            DEF_FONT,
            FontData::from_grid(TexId(1), Vec2::new(128.0, 48.0), 8.0, 8.0, ASCII_CHARS),
        );
        k.tick(0.0);
        k
    }

    #[test]
    fn sized_on_load_and_redraw() {
        let mut k = engine();
        let id = k.add(comps![pos(0.0, 0.0), text("hi", Some(16.0), TextConf::default())]).unwrap();
        let obj = k.obj(id).unwrap();
        assert_eq!(obj.num("width"), Some(32.0));
        assert_eq!(obj.num("height"), Some(16.0));
        assert!(obj.has("area"));

        k.call(id, "setText", &[Value::from("hello")]).unwrap();
        k.tick(0.016);
        assert_eq!(k.obj(id).unwrap().num("width"), Some(80.0));
    }

    #[test]
    fn unknown_font_errors() {
        let mut k = engine();
        let conf = TextConf {
            font: Some("comic".into()),
            ..Default::default()
        };
        let err = k.add(comps![pos(0.0, 0.0), text("x", None, conf)]);
        assert!(matches!(err, Err(KaboomError::FontNotFound(_))));
    }
}

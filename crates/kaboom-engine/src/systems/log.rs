//! On-screen debug log.
//!
//! Most recent entry first; drawn bottom-up from the lower-left corner with
//! older entries fading out.

use glam::Vec2;

use crate::math::{map, Color, Origin};
use crate::renderer::{DrawOpts, Renderer};
use crate::systems::text::{format_text, FontData, TextOpts};

/// Glyph height of log lines, in pixels.
pub const LOG_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub kind: LogKind,
    pub msg: String,
}

pub struct DebugLog {
    entries: Vec<LogEntry>,
    max: usize,
}

impl DebugLog {
    pub fn new(max: usize) -> Self {
        Self {
            entries: Vec::new(),
            max: max.max(1),
        }
    }

    pub fn info(&mut self, msg: impl Into<String>) {
        self.push(LogKind::Info, msg.into());
    }

    /// Also forwarded to the `log` facade.
    pub fn error(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::error!("{}", msg);
        self.push(LogKind::Error, msg);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    fn push(&mut self, kind: LogKind, msg: String) {
        self.entries.insert(0, LogEntry { kind, msg });
        self.entries.truncate(self.max);
    }

    pub fn draw(&self, gfx: &mut dyn Renderer, font: &FontData) {
        let mut pos = Vec2::new(0.0, gfx.height());
        let max = self.max as f32;
        for (i, entry) in self.entries.iter().enumerate() {
            let txt_alpha = map(i as f32, 0.0, max, 1.0, 0.5);
            let bg_alpha = map(i as f32, 0.0, max, 0.8, 0.2);
            let color = match entry.kind {
                LogKind::Info => Color::rgba(1.0, 1.0, 1.0, txt_alpha),
                LogKind::Error => Color::rgba(1.0, 0.0, 0.5, txt_alpha),
            };
            let ftext = format_text(
                &entry.msg,
                font,
                &TextOpts {
                    pos,
                    origin: Origin::BotLeft,
                    color,
                    size: Some(LOG_SIZE / gfx.scale()),
                    width: Some(gfx.width()),
                    ..Default::default()
                },
            );
            let bg = DrawOpts::at(pos)
                .with_origin(Origin::BotLeft)
                .with_color(Color::rgba(0.0, 0.0, 0.0, bg_alpha));
            gfx.draw_rect(pos, ftext.width, ftext.height, &bg);
            gfx.draw_text(&ftext);
            pos.y -= ftext.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_and_bounded() {
        let mut log = DebugLog::new(2);
        log.info("a");
        log.error("b");
        log.info("c");
        let msgs: Vec<&str> = log.entries().iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(msgs, vec!["c", "b"]);
        assert_eq!(log.entries()[1].kind, LogKind::Error);
    }

    #[test]
    fn clear_empties() {
        let mut log = DebugLog::new(8);
        log.info("x");
        log.clear();
        assert!(log.entries().is_empty());
    }
}

//! Multiplayer relay plumbing.
//!
//! Messages are JSON frames `{type, id, data}`, one per transport frame;
//! `id` is the sending peer as stamped by the relay. Frames sent before the
//! transport connects are queued and flushed on connect.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::api::engine::Engine;
use crate::error::Result;

pub const MSG_ADD_OBJ: &str = "ADD_OBJ";
pub const MSG_UPDATE_OBJ: &str = "UPDATE_OBJ";
pub const MSG_DESTROY_OBJ: &str = "DESTROY_OBJ";
pub const MSG_DISCONNECT: &str = "DISCONNECT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetMessage {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl NetMessage {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(frame: &str) -> Result<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// A message-oriented connection (a websocket in the browser).
pub trait Transport {
    fn connect(&mut self) -> Result<()>;
    fn close(&mut self);
    fn connected(&self) -> bool;
    fn send(&mut self, frame: String) -> Result<()>;
    /// Frames received since the last poll.
    fn poll(&mut self) -> Vec<String>;
}

/// Handler for one message type: `(engine, peer id, data)`.
pub type NetHandler = Rc<dyn Fn(&mut Engine, &str, &serde_json::Value) -> Result<()>>;

pub struct Net {
    transport: Box<dyn Transport>,
    queue: Vec<String>,
    handlers: HashMap<String, Vec<NetHandler>>,
}

impl Net {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            queue: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        self.transport.connect()?;
        self.flush()
    }

    pub fn connected(&self) -> bool {
        self.transport.connected()
    }

    pub fn close(&mut self) {
        self.transport.close();
    }

    pub fn send(&mut self, ty: &str, data: serde_json::Value) -> Result<()> {
        let frame = NetMessage {
            ty: ty.to_string(),
            id: String::new(),
            data,
        }
        .encode()?;
        if self.transport.connected() {
            self.transport.send(frame)
        } else {
            self.queue.push(frame);
            Ok(())
        }
    }

    pub fn recv(&mut self, ty: &str, handler: NetHandler) {
        self.handlers.entry(ty.to_string()).or_default().push(handler);
    }

    /// Number of frames waiting for a connection.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Pull received frames and pair each with its handlers. Undecodable
    /// frames are dropped with a warning.
    pub fn poll(&mut self) -> Vec<(NetHandler, String, serde_json::Value)> {
        if self.transport.connected() && !self.queue.is_empty() {
            if let Err(e) = self.flush() {
                log::warn!("net: flush failed: {}", e);
            }
        }
        let mut out = Vec::new();
        for frame in self.transport.poll() {
            let msg = match NetMessage::decode(&frame) {
                Ok(msg) => msg,
                Err(e) => {
                    log::warn!("net: dropping bad frame: {}", e);
                    continue;
                }
            };
            if let Some(handlers) = self.handlers.get(&msg.ty) {
                for h in handlers {
                    out.push((h.clone(), msg.id.clone(), msg.data.clone()));
                }
            }
        }
        out
    }

    fn flush(&mut self) -> Result<()> {
        for frame in std::mem::take(&mut self.queue) {
            self.transport.send(frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory transport: `inbox` feeds `poll`, `sent` records `send`.
    #[derive(Default)]
    pub struct LoopTransport {
        pub up: bool,
        pub inbox: Rc<RefCell<Vec<String>>>,
        pub sent: Rc<RefCell<Vec<String>>>,
    }

    impl Transport for LoopTransport {
        fn connect(&mut self) -> Result<()> {
            self.up = true;
            Ok(())
        }

        fn close(&mut self) {
            self.up = false;
        }

        fn connected(&self) -> bool {
            self.up
        }

        fn send(&mut self, frame: String) -> Result<()> {
            self.sent.borrow_mut().push(frame);
            Ok(())
        }

        fn poll(&mut self) -> Vec<String> {
            std::mem::take(&mut *self.inbox.borrow_mut())
        }
    }

    #[test]
    fn message_framing() {
        let msg = NetMessage::decode(r#"{"type":"ADD_OBJ","id":"p1","data":{"x":1}}"#).unwrap();
        assert_eq!(msg.ty, MSG_ADD_OBJ);
        assert_eq!(msg.id, "p1");
        assert_eq!(msg.data["x"], 1);
        let back = NetMessage::decode(&msg.encode().unwrap()).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn sends_queue_until_connected() {
        let transport = LoopTransport::default();
        let sent = transport.sent.clone();
        let mut net = Net::new(Box::new(transport));
        net.send("HELLO", serde_json::json!(1)).unwrap();
        assert_eq!(net.queued(), 1);
        assert!(sent.borrow().is_empty());
        net.connect().unwrap();
        assert_eq!(net.queued(), 0);
        assert_eq!(sent.borrow().len(), 1);
    }

    #[test]
    fn poll_pairs_frames_with_handlers() {
        let transport = LoopTransport::default();
        let inbox = transport.inbox.clone();
        let mut net = Net::new(Box::new(transport));
        net.recv("PING", Rc::new(|_, _, _| Ok(())));
        inbox.borrow_mut().push(r#"{"type":"PING","id":"a","data":null}"#.into());
        inbox.borrow_mut().push("not json".into());
        inbox.borrow_mut().push(r#"{"type":"OTHER"}"#.into());
        let batch = net.poll();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].1, "a");
    }
}

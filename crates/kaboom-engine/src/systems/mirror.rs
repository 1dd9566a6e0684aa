//! Object mirroring over the relay.
//!
//! `sync` marks a local object as a traveler and broadcasts its snapshot.
//! Snapshots from other peers become visitors: plain objects carrying the
//! same tags and fields, tracked per peer so they can be torn down when the
//! peer destroys them or disconnects.

use serde::Deserialize;

use crate::api::engine::Engine;
use crate::api::types::ObjId;
use crate::bridge::net::{MSG_ADD_OBJ, MSG_DESTROY_OBJ, MSG_DISCONNECT};
use crate::core::comp::{Comp, CompSpec};
use crate::core::object::ObjSnapshot;
use crate::error::{KaboomError, Result};

#[derive(Debug, Deserialize)]
struct DestroyMsg {
    id: ObjId,
}

/// Register the relay handlers. Called once a transport is attached.
pub(crate) fn install(k: &mut Engine) {
    let res = k
        .recv(MSG_ADD_OBJ, on_add_obj)
        .and_then(|_| k.recv(MSG_DESTROY_OBJ, on_destroy_obj))
        .and_then(|_| k.recv(MSG_DISCONNECT, on_disconnect));
    if let Err(e) = res {
        log::warn!("net: mirroring unavailable: {}", e);
    }
}

/// Broadcast `id` to the other peers.
pub(crate) fn sync(k: &mut Engine, id: ObjId) -> Result<()> {
    if k.net.is_none() {
        return Err(KaboomError::NotConnected);
    }
    let snap = k.obj(id).ok_or(KaboomError::ObjectNotFound(id))?.snapshot();
    let data = serde_json::to_value(&snap)?;
    if !k.world.travelers.contains(&id) {
        k.world.travelers.push(id);
    }
    k.send(MSG_ADD_OBJ, data)
}

/// Tell the peers a traveler is gone. Peers know it by its stable key.
/// Failures are logged.
pub(crate) fn on_destroy(k: &mut Engine, id: ObjId, key: u64) {
    let Some(idx) = k.world.travelers.iter().position(|t| *t == id) else {
        return;
    };
    k.world.travelers.remove(idx);
    if k.net.is_none() {
        return;
    }
    if let Err(e) = k.send(MSG_DESTROY_OBJ, serde_json::json!({ "id": key })) {
        k.debug_log().error(e.to_string());
    }
}

fn on_add_obj(k: &mut Engine, peer: &str, data: &serde_json::Value) -> Result<()> {
    let snap = ObjSnapshot::deserialize(data)?;
    let Some(remote) = snap.id else {
        return Err(KaboomError::InvalidComp("mirrored object has no id".into()));
    };
    let mut fields = Comp::anon();
    for (name, value) in snap.fields {
        fields = fields.field(name, value);
    }
    let mut specs: Vec<CompSpec> = snap.tags.into_iter().map(CompSpec::from).collect();
    specs.push(fields.into());

    let local = k.add(specs)?;
    log::debug!("net: peer {} mirrored {:?} as {:?}", peer, remote, local);
    let prev = k
        .world
        .visitors
        .entry(peer.to_string())
        .or_default()
        .insert(remote.0, local);
    if let Some(prev) = prev {
        k.destroy(prev)?;
    }
    Ok(())
}

fn on_destroy_obj(k: &mut Engine, peer: &str, data: &serde_json::Value) -> Result<()> {
    let msg = DestroyMsg::deserialize(data)?;
    let local = k
        .world
        .visitors
        .get_mut(peer)
        .and_then(|objs| objs.remove(&msg.id.0));
    match local {
        Some(local) => k.destroy(local),
        None => Ok(()),
    }
}

fn on_disconnect(k: &mut Engine, peer: &str, _: &serde_json::Value) -> Result<()> {
    let Some(objs) = k.world.visitors.remove(peer) else {
        return Ok(());
    };
    log::info!("net: peer {} left, dropping {} objects", peer, objs.len());
    for local in objs.into_values() {
        k.destroy(local)?;
    }
    Ok(())
}

/// Visitor objects mirrored from `peer`.
pub fn visitors_of(k: &Engine, peer: &str) -> Vec<ObjId> {
    let mut ids: Vec<ObjId> = k
        .world
        .visitors
        .get(peer)
        .map(|objs| objs.values().copied().collect())
        .unwrap_or_default();
    ids.sort();
    ids
}

//! Command handlers.
//!
//! Handlers apply a command to the [`Hub`] and return the replies it
//! produces. They never fail: bad input becomes a reply to the sender.

use crate::hub::{Hub, HubError};
use crate::message::{InboundMessage, Outbound};
use crate::replies::{self, CannedReplies};
use crate::room::{RoomId, RoomSpec};
use tracing::debug;

fn reply(msg: &InboundMessage, text: impl Into<String>) -> Vec<Outbound> {
    vec![Outbound::new(msg.session, text)]
}

/// Parse a room capacity. Only positive integers are accepted.
fn parse_capacity(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|&capacity| capacity > 0)
}

/// Parse an explicit visibility flag; `Some(true)` means private.
fn parse_visibility(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "private" | "true" | "yes" | "on" | "1" => Some(true),
        "public" | "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// `/start`: greet the sender.
pub fn start(msg: &InboundMessage) -> Vec<Outbound> {
    reply(msg, replies::welcome(&msg.sender_name))
}

/// `/help`: static command summary.
pub fn help(msg: &InboundMessage) -> Vec<Outbound> {
    reply(msg, replies::HELP)
}

/// `/create [name] [capacity] [private]`.
///
/// Giving a capacity inverts the default visibility. A recognised flag in
/// the third argument position sets visibility explicitly. An invalid capacity
/// is reported but the room is still created with the default one.
pub fn create(hub: &mut Hub, msg: &InboundMessage) -> Vec<Outbound> {
    let args = msg.args();
    let mut out = Vec::new();
    let mut spec = RoomSpec::new();

    if let Some(name) = args.first() {
        spec = spec.with_name(*name);
    }

    if let Some(arg) = args.get(1) {
        match parse_capacity(arg) {
            Some(capacity) => spec = spec.with_capacity(capacity),
            None => out.push(Outbound::new(msg.session, replies::invalid_capacity(arg))),
        }
        spec = spec.with_private(!hub.rooms().defaults().private);
    }

    if let Some(private) = args.get(2).and_then(|arg| parse_visibility(arg)) {
        spec = spec.with_private(private);
    }

    let text = match hub.create_room(msg.session, spec) {
        Ok(room) => replies::room_created(room),
        Err(HubError::AlreadyInRoom { room, .. }) => replies::already_in_room(room),
        Err(e) => {
            debug!(session = msg.session, error = %e, "Create rejected");
            e.to_string()
        }
    };
    out.push(Outbound::new(msg.session, text));
    out
}

/// `/join <room id>`.
pub fn join(hub: &mut Hub, msg: &InboundMessage) -> Vec<Outbound> {
    let args = msg.args();
    let Some(arg) = args.first() else {
        return reply(msg, replies::missing_room_id());
    };
    let Ok(raw) = arg.parse::<i64>() else {
        return reply(msg, replies::invalid_room_id(arg));
    };
    // Negative ids are valid integers that can never name a room.
    let Ok(id) = RoomId::try_from(raw) else {
        return reply(msg, replies::room_not_found(arg));
    };

    let text = match hub.join(msg.session, id) {
        Ok(room) => replies::joined(room),
        Err(HubError::RoomNotFound(_)) => replies::room_not_found(arg),
        Err(HubError::RoomFull { .. }) => match hub.rooms().get(id) {
            Some(room) => replies::room_full(room),
            None => replies::room_not_found(arg),
        },
        Err(HubError::AlreadyInRoom { room, .. }) => replies::already_in_room(room),
    };
    reply(msg, text)
}

/// `/list`: public rooms and their count.
pub fn list(hub: &Hub, msg: &InboundMessage) -> Vec<Outbound> {
    reply(msg, replies::listing(hub.rooms().list_public()))
}

/// Lobby fallback: a canned line.
pub fn chatter(canned: &mut CannedReplies, msg: &InboundMessage) -> Vec<Outbound> {
    reply(msg, canned.pick())
}

/// `/info` inside a room.
pub fn info(hub: &Hub, room: RoomId, msg: &InboundMessage) -> Vec<Outbound> {
    match hub.rooms().get(room) {
        Some(room) => reply(msg, replies::info(room)),
        None => reply(msg, replies::not_in_room()),
    }
}

/// `/quit` inside a room.
pub fn quit(hub: &mut Hub, msg: &InboundMessage) -> Vec<Outbound> {
    match hub.quit(msg.session) {
        Some(room) => reply(msg, replies::left(&room)),
        None => reply(msg, replies::not_in_room()),
    }
}

/// Room fallback: relay the text to every other member.
pub fn broadcast(hub: &Hub, room: RoomId, msg: &InboundMessage) -> Vec<Outbound> {
    let Some(room) = hub.rooms().get(room) else {
        return Vec::new();
    };
    let line = replies::chat_line(&msg.sender_name, &msg.text);
    room.members()
        .iter()
        .filter(|&&member| member != msg.session)
        .map(|&member| Outbound::new(member, line.clone()))
        .collect()
}

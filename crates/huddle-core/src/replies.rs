//! Reply texts.

use crate::room::{Room, RoomId, RoomSummary};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Static command summary.
pub const HELP: &str = "Here is what I can do:\n\
/help - show this menu\n\
/join <room id> - join a room\n\
/create <name | optional> <limit | optional> <private | optional, default yes> - create a room\n\
/info - show the room you are in\n\
/list - list public rooms\n\
/quit - leave the room";

/// Lines used to answer anything the lobby does not understand.
pub const CANNED_LINES: &[&str] = &[
    "I really am trying to understand you. Maybe try /help?",
    "Oh good, someone is actually out there!",
    "That sounded important. I have no idea what it meant.",
    "Let me write that down. Hmm. No pen. Never mind.",
    "Bold move. I respect it. Still no idea, though.",
    "If you are looking for company, /list shows the open rooms.",
    "I only speak fluent slash-command, I am afraid.",
    "Ah yes. Quite. Exactly what I was thinking. Possibly.",
    "Nobody here but me. Start a room with /create and invite friends!",
    "You could say that again, but I still would not follow.",
];

/// Greeting for `/start`, naming the sender.
pub fn welcome(sender_name: &str) -> String {
    format!("Hello {sender_name}!\nSend /help to see what I can do")
}

/// Confirmation sent to the founder of a new room.
pub fn room_created(room: &Room) -> String {
    format!(
        "You created room: {}\nRoom ID: {}\nRoom limit: {}",
        room.name(),
        room.id(),
        room.capacity()
    )
}

/// Warning for a capacity argument that is not a positive integer.
pub fn invalid_capacity(arg: &str) -> String {
    format!("Invalid room limit: {arg}. Using the default instead")
}

/// Refusal for a session that must `/quit` first.
pub fn already_in_room(room: RoomId) -> String {
    format!("You are already in room {room}. Send /quit to leave it first")
}

/// `/join` without an argument.
pub fn missing_room_id() -> String {
    "Please enter a room ID".to_string()
}

/// `/join` with a non-numeric argument.
pub fn invalid_room_id(arg: &str) -> String {
    format!("Invalid room ID: {arg}")
}

/// `/join` naming no live room.
pub fn room_not_found(arg: &str) -> String {
    format!("Room with ID {arg} not found")
}

/// `/join` on a room at capacity.
pub fn room_full(room: &Room) -> String {
    format!("Room {} is full", room.name())
}

/// Confirmation sent to a session that joined a room.
pub fn joined(room: &Room) -> String {
    format!("You joined room {}", room.name())
}

/// One line per public room followed by the count.
pub fn listing<'a>(rooms: impl IntoIterator<Item = &'a Room>) -> String {
    let lines: Vec<String> = rooms
        .into_iter()
        .map(|room| {
            format!(
                "\n{}, {}, {}/{}",
                room.name(),
                room.id(),
                room.member_count(),
                room.capacity()
            )
        })
        .collect();
    format!("{}\nPublic rooms: {}", lines.concat(), lines.len())
}

/// Room details for `/info`.
pub fn info(room: &Room) -> String {
    format!(
        "You are in room: {}, id: {}\nMembers: {}\nMember limit: {}",
        room.name(),
        room.id(),
        room.member_count(),
        room.capacity()
    )
}

/// Confirmation for `/quit`.
pub fn left(room: &RoomSummary) -> String {
    format!("You left room: {}", room.name)
}

/// `/quit` from the lobby.
pub fn not_in_room() -> String {
    "You are not in a room".to_string()
}

/// A relayed room message as other members see it.
pub fn chat_line(sender_name: &str, text: &str) -> String {
    format!("{sender_name}: {text}")
}

/// Picks canned lines uniformly at random.
#[derive(Debug, Clone)]
pub struct CannedReplies {
    lines: Vec<String>,
    rng: StdRng,
}

impl CannedReplies {
    /// Use the built-in lines with an entropy-seeded generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Use the built-in lines with a fixed seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Use the built-in lines with the given generator.
    #[must_use]
    pub fn with_rng(rng: StdRng) -> Self {
        Self::with_lines(CANNED_LINES.iter().map(|l| (*l).to_string()), rng)
    }

    /// Use custom lines. An empty set falls back to the built-in lines.
    #[must_use]
    pub fn with_lines(lines: impl IntoIterator<Item = String>, rng: StdRng) -> Self {
        let mut lines: Vec<String> = lines.into_iter().collect();
        if lines.is_empty() {
            lines = CANNED_LINES.iter().map(|l| (*l).to_string()).collect();
        }
        Self { lines, rng }
    }

    /// Get the candidate lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Pick one line.
    pub fn pick(&mut self) -> &str {
        let index = self.rng.gen_range(0..self.lines.len());
        &self.lines[index]
    }
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self::new()
    }
}

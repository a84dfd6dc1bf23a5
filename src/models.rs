// src/models.rs

use crate::error::DecodeError;
use rand::{Rng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use uuid::Uuid;

const ADJECTIVES: &[&str] = &[
    "Autumn", "Hidden", "Bitter", "Misty", "Silent", "Empty", "Dry", "Dark", "Summer", "Icy",
    "Delicate", "Quiet", "White", "Cool", "Spring", "Winter", "Patient", "Twilight", "Dawn",
    "Crimson", "Wispy", "Weathered", "Blue", "Billowing", "Broken", "Cold", "Damp", "Falling",
    "Frosty", "Green", "Long", "Late", "Lingering", "Bold", "Little", "Morning", "Muddy", "Old",
    "Red", "Rough", "Still", "Small", "Sparkling", "Shy", "Wandering", "Withered", "Wild",
    "Black", "Young", "Holy", "Solitary", "Fragrant", "Aged", "Snowy", "Proud", "Floral",
    "Restless", "Divine", "Polished", "Ancient", "Purple", "Lively", "Nameless",
];

const NOUNS: &[&str] = &[
    "Waterfall", "River", "Breeze", "Moon", "Rain", "Wind", "Sea", "Morning", "Snow", "Lake",
    "Sunset", "Pine", "Shadow", "Leaf", "Dawn", "Glitter", "Forest", "Hill", "Cloud", "Meadow",
    "Sun", "Glade", "Bird", "Brook", "Butterfly", "Bush", "Dew", "Dust", "Field", "Fire",
    "Flower", "Firefly", "Feather", "Grass", "Haze", "Mountain", "Night", "Pond", "Darkness",
    "Snowflake", "Silence", "Sound", "Sky", "Shape", "Surf", "Thunder", "Violet", "Water",
    "Wildflower", "Wave", "Resonance", "Wood", "Dream", "Cherry", "Tree", "Fog", "Frost",
    "Voice", "Paper", "Frog", "Smoke", "Star",
];

/// An RGB display color, carried on the wire as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A random color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.random(), rng.random(), rng.random())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = DecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DecodeError::InvalidColor(value));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| DecodeError::InvalidColor(value.clone()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// A chat participant. The name is the identity key within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub color: Color,
}

impl Member {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self { name: name.into(), color }
    }

    /// Generates a session identity such as "MistyRiver" with a random color.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Nameless");
        let noun = NOUNS.choose(rng).copied().unwrap_or("Member");
        Self::new(format!("{adjective}{noun}"), Color::random(rng))
    }

    /// Decodes a member from the client data attached to a channel connection.
    ///
    /// Extra fields are ignored; a missing `name` or `color` is an error.
    pub fn from_client_data(data: Option<&Value>) -> Result<Self, DecodeError> {
        let data = data.ok_or(DecodeError::MissingClientData)?;
        Ok(Member::deserialize(data)?)
    }

    /// The client data sent with `connect`.
    pub fn to_client_data(&self) -> Value {
        json!({ "name": self.name, "color": self.color.to_string() })
    }
}

/// A received chat message. The id is generated locally on receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub sender: Member,
    pub text: String,
}

impl Message {
    pub fn received(sender: Member, text: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), sender, text: text.into() }
    }
}

/// A payload published on the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPayload {
    Text(String),
    Typing(bool),
}

impl OutboundPayload {
    pub fn to_value(&self) -> Value {
        match self {
            OutboundPayload::Text(text) => Value::String(text.clone()),
            OutboundPayload::Typing(typing) => json!({ "typing": typing }),
        }
    }
}

/// A payload received from the room, classified by its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    Typing(bool),
    Text(String),
}

impl InboundPayload {
    /// An object of booleans containing `typing` is a typing flag and a
    /// string is chat text. Any other shape yields `None`.
    pub fn classify(payload: &Value) -> Option<Self> {
        match payload {
            Value::Object(map) if map.values().all(Value::is_boolean) => {
                map.get("typing").and_then(Value::as_bool).map(InboundPayload::Typing)
            }
            Value::String(text) => Some(InboundPayload::Text(text.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn member_round_trips_through_client_data() {
        let member = Member::new("Alice", Color::new(0x12, 0xab, 0xff));
        let data = member.to_client_data();
        assert_eq!(data, json!({ "name": "Alice", "color": "#12abff" }));
        assert_eq!(Member::from_client_data(Some(&data)).unwrap(), member);
    }

    #[test]
    fn member_decode_ignores_extra_fields() {
        let data = json!({ "name": "Bob", "color": "00ff00", "avatar": 3 });
        let member = Member::from_client_data(Some(&data)).unwrap();
        assert_eq!(member, Member::new("Bob", Color::new(0, 255, 0)));
    }

    #[test]
    fn member_decode_requires_name_and_color() {
        assert!(matches!(Member::from_client_data(None), Err(DecodeError::MissingClientData)));
        for data in [
            json!({ "color": "#000000" }),
            json!({ "name": "Alice" }),
            json!({ "name": 7, "color": "#000000" }),
            json!({ "name": "Alice", "color": "blue" }),
            json!("Alice"),
        ] {
            assert!(Member::from_client_data(Some(&data)).is_err(), "{data} decoded");
        }
    }

    #[test]
    fn color_rejects_malformed_hex() {
        assert!(Color::try_from("#12345".to_string()).is_err());
        assert!(Color::try_from("#gggggg".to_string()).is_err());
        assert!(Color::try_from("#ééé".to_string()).is_err());
        assert_eq!(Color::try_from("#FFFFFF".to_string()).unwrap(), Color::new(255, 255, 255));
    }

    #[test]
    fn random_member_is_adjective_noun() {
        let mut rng = StdRng::seed_from_u64(7);
        let member = Member::random(&mut rng);
        assert!(ADJECTIVES.iter().any(|a| member.name.starts_with(a)));
        assert!(NOUNS.iter().any(|n| member.name.ends_with(n)));
    }

    #[test]
    fn received_messages_get_distinct_ids() {
        let alice = Member::new("Alice", Color::new(1, 2, 3));
        let first = Message::received(alice.clone(), "hi");
        let second = Message::received(alice, "hi");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn outbound_payload_shapes() {
        assert_eq!(OutboundPayload::Text("hello".into()).to_value(), json!("hello"));
        assert_eq!(OutboundPayload::Typing(true).to_value(), json!({ "typing": true }));
        assert_eq!(OutboundPayload::Typing(false).to_value(), json!({ "typing": false }));
    }

    #[test]
    fn inbound_payload_classification() {
        assert_eq!(
            InboundPayload::classify(&json!({ "typing": true })),
            Some(InboundPayload::Typing(true))
        );
        assert_eq!(
            InboundPayload::classify(&json!({ "typing": false, "other": true })),
            Some(InboundPayload::Typing(false))
        );
        assert_eq!(
            InboundPayload::classify(&json!("hello")),
            Some(InboundPayload::Text("hello".to_string()))
        );
        assert_eq!(InboundPayload::classify(&json!({ "typing": "yes" })), None);
        assert_eq!(InboundPayload::classify(&json!({ "typing": true, "text": "x" })), None);
        assert_eq!(InboundPayload::classify(&json!({ "other": true })), None);
        assert_eq!(InboundPayload::classify(&json!(42)), None);
        assert_eq!(InboundPayload::classify(&json!(["hello"])), None);
    }
}

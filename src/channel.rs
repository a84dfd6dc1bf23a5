// src/channel.rs

use crate::error::ChannelError;
use serde_json::Value;

/// A member as reported by the channel's presence layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteMember {
    /// Connection id assigned by the channel.
    pub id: String,
    /// Whatever the member passed to `connect`, if anything.
    pub client_data: Option<Value>,
}

/// Notifications delivered by a realtime channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Connected(Result<(), ChannelError>),
    Error(ChannelError),
    Disconnected(Option<ChannelError>),
    RoomConnected { room: String, result: Result<(), ChannelError> },
    Message { room: String, payload: Value, member: Option<RemoteMember> },
    MembersSnapshot { room: String, members: Vec<RemoteMember> },
    MemberJoined { room: String, member: RemoteMember },
    MemberLeft { room: String, member: RemoteMember },
}

/// The capability the chat adapter needs from a hosted pub/sub service.
///
/// Calls never block. Their outcome arrives later as `ChannelEvent`s.
pub trait RealtimeChannel {
    type Room: ChannelRoom;

    /// Starts the connection, attaching `client_data` as this member's metadata.
    fn connect(&mut self, client_data: Value);

    /// Joins a room and returns the handle used to publish into it.
    fn subscribe(&mut self, room_name: &str) -> Self::Room;
}

/// A subscribed room.
pub trait ChannelRoom {
    fn publish(&self, payload: Value) -> Result<(), ChannelError>;
}

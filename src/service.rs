// src/service.rs

use crate::{
    channel::{ChannelEvent, ChannelRoom, RealtimeChannel, RemoteMember},
    models::{InboundPayload, Member, Message, OutboundPayload},
    state::{Roster, RosterBroadcast, SubscriptionId},
};
use serde_json::Value;

/// The outbound half of the adapter, as seen by the conversation view.
pub trait ChatActions {
    fn send_message(&self, text: &str);
    fn start_typing(&self);
    fn stop_typing(&self);
}

type MessageCallback = Box<dyn FnMut(Message)>;
type TypingCallback = Box<dyn FnMut(&Member, bool)>;

/// Bridges one realtime channel to the app.
///
/// Owns the room handle and the roster, turns inbound channel events into
/// the message and typing callbacks, and notifies roster observers on every
/// roster change. Everything runs on the caller's execution context; feed it
/// channel events from a single queue.
pub struct ChatService<C: RealtimeChannel> {
    channel: C,
    member: Member,
    room_name: String,
    room: Option<C::Room>,
    roster: Roster,
    observers: RosterBroadcast,
    on_message: MessageCallback,
    on_typing: TypingCallback,
}

impl<C: RealtimeChannel> ChatService<C> {
    pub fn new(
        channel: C,
        member: Member,
        room_name: impl Into<String>,
        on_message: impl FnMut(Message) + 'static,
        on_typing: impl FnMut(&Member, bool) + 'static,
    ) -> Self {
        Self {
            channel,
            member,
            room_name: room_name.into(),
            room: None,
            roster: Roster::default(),
            observers: RosterBroadcast::default(),
            on_message: Box::new(on_message),
            on_typing: Box::new(on_typing),
        }
    }

    /// The local member.
    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn members(&self) -> &[Member] {
        self.roster.members()
    }

    /// True once the room subscription exists and publishing is possible.
    pub fn is_connected(&self) -> bool {
        self.room.is_some()
    }

    pub fn connect(&mut self) {
        tracing::info!("Connecting as '{}'", self.member.name);
        self.channel.connect(self.member.to_client_data());
    }

    pub fn subscribe_roster(
        &mut self,
        observer: impl FnMut(&[Member]) + 'static,
    ) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe_roster(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Processes one notification from the channel.
    pub fn handle_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Connected(Ok(())) => {
                tracing::info!("Connected to channel");
                self.room = Some(self.channel.subscribe(&self.room_name));
            }
            ChannelEvent::Connected(Err(e)) => tracing::error!("Channel connection failed: {}", e),
            ChannelEvent::Error(e) => tracing::warn!("Channel error: {}", e),
            ChannelEvent::Disconnected(reason) => match reason {
                Some(e) => tracing::warn!("Channel disconnected: {}", e),
                None => tracing::info!("Channel disconnected"),
            },
            ChannelEvent::RoomConnected { room, result } => match result {
                Ok(()) => tracing::info!("Connected to room '{}'", room),
                Err(e) => tracing::warn!("Could not connect to room '{}': {}", room, e),
            },
            ChannelEvent::Message { room, payload, member } => {
                if self.is_our_room(&room) {
                    self.handle_message(&payload, member.as_ref());
                }
            }
            ChannelEvent::MembersSnapshot { room, members } => {
                if self.is_our_room(&room) {
                    self.handle_snapshot(&members);
                }
            }
            ChannelEvent::MemberJoined { room, member } => {
                if self.is_our_room(&room) {
                    self.handle_member_joined(&member);
                }
            }
            ChannelEvent::MemberLeft { room, member } => {
                if self.is_our_room(&room) {
                    self.handle_member_left(&member);
                }
            }
        }
    }

    fn is_our_room(&self, room: &str) -> bool {
        if room != self.room_name {
            tracing::debug!("Ignoring event for room '{}'", room);
            return false;
        }
        true
    }

    fn handle_message(&mut self, payload: &Value, sender: Option<&RemoteMember>) {
        let Some(member) = decode_member(sender) else {
            tracing::debug!("Could not parse sender data, dropping message");
            return;
        };

        match InboundPayload::classify(payload) {
            Some(InboundPayload::Typing(is_typing)) => (self.on_typing)(&member, is_typing),
            Some(InboundPayload::Text(text)) => (self.on_message)(Message::received(member, text)),
            None => tracing::debug!("Dropping payload of unknown shape from '{}'", member.name),
        }
    }

    fn handle_snapshot(&mut self, members: &[RemoteMember]) {
        let decoded = members.iter().filter_map(|m| decode_member(Some(m))).collect();
        self.roster.replace(decoded);
        self.broadcast_roster();
    }

    fn handle_member_joined(&mut self, member: &RemoteMember) {
        let Some(member) = decode_member(Some(member)) else {
            return;
        };
        tracing::debug!("'{}' joined", member.name);
        self.roster.join(member);
        self.broadcast_roster();
    }

    fn handle_member_left(&mut self, member: &RemoteMember) {
        let Some(member) = decode_member(Some(member)) else {
            return;
        };
        if self.roster.leave(&member.name) {
            tracing::debug!("'{}' left", member.name);
            self.broadcast_roster();
        }
    }

    fn broadcast_roster(&mut self) {
        self.observers.notify(self.roster.members());
    }

    fn publish(&self, payload: OutboundPayload) {
        let Some(room) = &self.room else {
            return;
        };
        if let Err(e) = room.publish(payload.to_value()) {
            tracing::warn!("Failed to publish to '{}': {}", self.room_name, e);
        }
    }
}

impl<C: RealtimeChannel> ChatActions for ChatService<C> {
    fn send_message(&self, text: &str) {
        self.publish(OutboundPayload::Text(text.to_string()));
    }

    fn start_typing(&self) {
        self.publish(OutboundPayload::Typing(true));
    }

    fn stop_typing(&self) {
        self.publish(OutboundPayload::Typing(false));
    }
}

fn decode_member(member: Option<&RemoteMember>) -> Option<Member> {
    let data = member.and_then(|m| m.client_data.as_ref());
    Member::from_client_data(data).ok()
}

// src/bot.rs

use crate::{
    channel::{ChannelEvent, ChannelRoom, RealtimeChannel, RemoteMember},
    hub::{EventReceiver, LocalChannel, LocalHub, LocalRoom},
    models::{InboundPayload, Member, OutboundPayload},
};
use rand::Rng;
use serde_json::Value;
use std::time::Duration;

const BOT_SUFFIX: &str = " (bot)";

/// A simulated participant that answers every human message in the room.
///
/// It types for `reply_delay` before answering so the typing indicator of the
/// other clients has something to show. Messages from other bots are ignored.
pub struct EchoBot {
    channel: LocalChannel,
    events: EventReceiver,
    member: Member,
    room_name: String,
    reply_delay: Duration,
}

impl EchoBot {
    pub fn new(hub: &LocalHub, member: Member, room_name: &str, reply_delay: Duration) -> Self {
        let (channel, events) = hub.channel();
        Self { channel, events, member, room_name: room_name.to_string(), reply_delay }
    }

    /// A random identity marked as a bot.
    pub fn random_member<R: Rng + ?Sized>(rng: &mut R) -> Member {
        let member = Member::random(rng);
        Member::new(format!("{}{BOT_SUFFIX}", member.name), member.color)
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Connects and serves the room until the channel disconnects.
    pub async fn run(self) {
        let EchoBot { mut channel, mut events, member, room_name, reply_delay } = self;
        channel.connect(member.to_client_data());

        let mut room: Option<LocalRoom> = None;
        while let Some(event) = events.recv().await {
            match event {
                ChannelEvent::Connected(Ok(())) => room = Some(channel.subscribe(&room_name)),
                ChannelEvent::Connected(Err(e)) => {
                    tracing::warn!("Bot '{}' could not connect: {}", member.name, e);
                    return;
                }
                ChannelEvent::Disconnected(_) => break,
                ChannelEvent::Message { payload, member: sender, .. } => {
                    if let Some(room) = &room {
                        reply(room, &member, reply_delay, &payload, sender.as_ref()).await;
                    }
                }
                _ => {}
            }
        }
        tracing::debug!("Bot '{}' stopped", member.name);
    }
}

pub fn reply_text(sender: &Member, text: &str) -> String {
    format!("{}, you said: {}", sender.name, text)
}

async fn reply(
    room: &LocalRoom,
    me: &Member,
    delay: Duration,
    payload: &Value,
    sender: Option<&RemoteMember>,
) {
    let Ok(sender) = Member::from_client_data(sender.and_then(|m| m.client_data.as_ref())) else {
        return;
    };
    if sender.name == me.name || sender.name.ends_with(BOT_SUFFIX) {
        return;
    }
    let Some(InboundPayload::Text(text)) = InboundPayload::classify(payload) else {
        return;
    };

    let replies = [
        OutboundPayload::Typing(true),
        OutboundPayload::Text(reply_text(&sender, &text)),
        OutboundPayload::Typing(false),
    ];
    for (i, payload) in replies.iter().enumerate() {
        if i == 1 {
            tokio::time::sleep(delay).await;
        }
        if let Err(e) = room.publish(payload.to_value()) {
            tracing::debug!("Bot '{}' could not publish: {}", me.name, e);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;
    use serde_json::json;

    const ROOM: &str = "observable-room";

    async fn next_payload_from(events: &mut EventReceiver, name: &str) -> Value {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
                .await
                .expect("timed out")
                .expect("channel closed");
            if let ChannelEvent::Message { payload, member: Some(member), .. } = event {
                let sender = Member::from_client_data(member.client_data.as_ref()).unwrap();
                if sender.name == name {
                    return payload;
                }
            }
        }
    }

    #[tokio::test]
    async fn bot_types_then_replies_then_stops_typing() {
        let hub = LocalHub::new("test");
        let bot_member = Member::new("Echo (bot)", Color::new(0, 0, 0));
        let bot = EchoBot::new(&hub, bot_member, ROOM, Duration::ZERO);
        let handle = tokio::spawn(bot.run());

        let alice = Member::new("Alice", Color::new(9, 9, 9));
        let (mut channel, mut events) = hub.channel();
        channel.connect(alice.to_client_data());
        let room = channel.subscribe(ROOM);

        while hub.room_members(ROOM).len() < 2 {
            tokio::task::yield_now().await;
        }
        room.publish(json!("hello")).unwrap();

        assert_eq!(next_payload_from(&mut events, "Echo (bot)").await, json!({ "typing": true }));
        assert_eq!(
            next_payload_from(&mut events, "Echo (bot)").await,
            json!("Alice, you said: hello")
        );
        assert_eq!(next_payload_from(&mut events, "Echo (bot)").await, json!({ "typing": false }));

        hub.shutdown();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn bots_ignore_each_other() {
        let bot = Member::new("Echo (bot)", Color::new(0, 0, 0));
        let other = Member::new("Other (bot)", Color::new(0, 0, 0));
        let hub = LocalHub::new("test");
        let (mut channel, mut events) = hub.channel();
        channel.connect(json!({}));
        let room = channel.subscribe(ROOM);

        let sender = RemoteMember { id: "x".into(), client_data: Some(other.to_client_data()) };
        reply(&room, &bot, Duration::ZERO, &json!("hi"), Some(&sender)).await;

        while let Ok(event) = events.try_recv() {
            assert!(!matches!(event, ChannelEvent::Message { .. }), "bot replied to a bot");
        }
    }

    #[test]
    fn random_bot_members_are_marked() {
        let member = EchoBot::random_member(&mut rand::rng());
        assert!(member.name.ends_with(BOT_SUFFIX));
    }
}

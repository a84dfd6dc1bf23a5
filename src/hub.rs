// src/hub.rs

//! An in-process realtime channel.
//!
//! `LocalHub` plays the part of the hosted pub/sub service for demos and
//! tests: it keeps rooms of connected clients, echoes every publish to the
//! whole room (sender included) and reports presence as a member snapshot for
//! a new subscriber plus join/leave events for everyone else.

use crate::{
    channel::{ChannelEvent, ChannelRoom, RealtimeChannel, RemoteMember},
    error::ChannelError,
};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::mpsc;

pub type EventReceiver = mpsc::UnboundedReceiver<ChannelEvent>;

/// A connected (or connecting) client of the hub.
struct Client {
    sender: mpsc::UnboundedSender<ChannelEvent>,
    client_data: Option<Value>,
    connected: bool,
}

#[derive(Default)]
struct HubState {
    closed: bool,
    next_client_id: u64,
    clients: HashMap<String, Client>,
    /// Room name to client ids, in subscription order.
    rooms: HashMap<String, Vec<String>>,
}

impl HubState {
    fn send(&self, client_id: &str, event: ChannelEvent) {
        if let Some(client) = self.clients.get(client_id) {
            if client.sender.send(event).is_err() {
                tracing::debug!("Client {} no longer receives events", client_id);
            }
        }
    }

    fn broadcast(&self, room_name: &str, event: &ChannelEvent, exclude: Option<&str>) {
        let Some(room) = self.rooms.get(room_name) else {
            return;
        };
        for id in room {
            if exclude.is_some_and(|exclude_id| exclude_id == id.as_str()) {
                continue;
            }
            self.send(id, event.clone());
        }
    }

    fn remote(&self, client_id: &str) -> RemoteMember {
        RemoteMember {
            id: client_id.to_string(),
            client_data: self.clients.get(client_id).and_then(|c| c.client_data.clone()),
        }
    }

    /// Removes a client from every room, announcing its departure and
    /// dropping rooms that become empty.
    fn leave_all_rooms(&mut self, client_id: &str) {
        let member = self.remote(client_id);
        let joined: Vec<String> = self
            .rooms
            .iter()
            .filter(|(_, ids)| ids.iter().any(|id| id == client_id))
            .map(|(name, _)| name.clone())
            .collect();

        for room_name in joined {
            if let Some(ids) = self.rooms.get_mut(&room_name) {
                ids.retain(|id| id != client_id);
                if ids.is_empty() {
                    tracing::debug!("Room '{}' is empty, removing it", room_name);
                    self.rooms.remove(&room_name);
                    continue;
                }
            }
            let left = ChannelEvent::MemberLeft { room: room_name.clone(), member: member.clone() };
            self.broadcast(&room_name, &left, None);
        }
    }
}

/// The shared hub. Cloning yields another handle to the same rooms.
#[derive(Clone)]
pub struct LocalHub {
    channel_id: Arc<str>,
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new(channel_id: &str) -> Self {
        Self { channel_id: Arc::from(channel_id), state: Arc::default() }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// Registers a new client and returns its channel plus the queue its
    /// events arrive on.
    pub fn channel(&self) -> (LocalChannel, EventReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.lock();
        let id = format!("client-{}", state.next_client_id);
        state.next_client_id += 1;
        state.clients.insert(id.clone(), Client { sender, client_data: None, connected: false });

        (LocalChannel { hub: self.clone(), id }, receiver)
    }

    /// Client data of everyone in a room, in subscription order.
    pub fn room_members(&self, room_name: &str) -> Vec<RemoteMember> {
        let state = self.lock();
        state
            .rooms
            .get(room_name)
            .map(|ids| ids.iter().map(|id| state.remote(id)).collect())
            .unwrap_or_default()
    }

    /// Disconnects every client and refuses new connections.
    pub fn shutdown(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.rooms.clear();

        let reason = ChannelError::ConnectionLost(format!("channel '{}' shut down", self.channel_id));
        for client in state.clients.values_mut().filter(|c| c.connected) {
            client.connected = false;
            let _ = client.sender.send(ChannelEvent::Disconnected(Some(reason.clone())));
        }
        tracing::info!("Channel '{}' shut down", self.channel_id);
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One client's connection to a `LocalHub`. Dropping it disconnects.
pub struct LocalChannel {
    hub: LocalHub,
    id: String,
}

impl LocalChannel {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Leaves every room and closes the connection. The client can connect again.
    pub fn disconnect(&mut self) {
        let mut state = self.hub.lock();
        let was_connected = state.clients.get(&self.id).is_some_and(|c| c.connected);
        if !was_connected {
            return;
        }

        state.leave_all_rooms(&self.id);
        if let Some(client) = state.clients.get_mut(&self.id) {
            client.connected = false;
        }
        state.send(&self.id, ChannelEvent::Disconnected(None));
    }
}

impl Drop for LocalChannel {
    fn drop(&mut self) {
        self.disconnect();
        self.hub.lock().clients.remove(&self.id);
    }
}

impl RealtimeChannel for LocalChannel {
    type Room = LocalRoom;

    fn connect(&mut self, client_data: Value) {
        let mut state = self.hub.lock();
        let result = if state.closed {
            Err(ChannelError::HubClosed(self.hub.channel_id.to_string()))
        } else {
            match state.clients.get_mut(&self.id) {
                Some(client) if client.connected => Err(ChannelError::AlreadyConnected),
                Some(client) => {
                    client.client_data = Some(client_data);
                    client.connected = true;
                    Ok(())
                }
                None => Err(ChannelError::NotConnected),
            }
        };
        state.send(&self.id, ChannelEvent::Connected(result));
    }

    fn subscribe(&mut self, room_name: &str) -> LocalRoom {
        let room = LocalRoom { hub: self.hub.clone(), client_id: self.id.clone(), room: room_name.to_string() };

        let mut state = self.hub.lock();
        let connected = state.clients.get(&self.id).is_some_and(|c| c.connected);
        if !connected {
            let result = Err(ChannelError::NotConnected);
            state.send(&self.id, ChannelEvent::RoomConnected { room: room_name.to_string(), result });
            return room;
        }

        let ids = state.rooms.entry(room_name.to_string()).or_default();
        if ids.contains(&self.id) {
            return room;
        }
        ids.push(self.id.clone());

        let members = state.rooms[room_name].iter().map(|id| state.remote(id)).collect();
        state.send(&self.id, ChannelEvent::RoomConnected { room: room_name.to_string(), result: Ok(()) });
        state.send(&self.id, ChannelEvent::MembersSnapshot { room: room_name.to_string(), members });

        let joined = ChannelEvent::MemberJoined { room: room_name.to_string(), member: state.remote(&self.id) };
        state.broadcast(room_name, &joined, Some(&self.id));
        room
    }
}

/// A client's subscription to one room of the hub.
#[derive(Clone)]
pub struct LocalRoom {
    hub: LocalHub,
    client_id: String,
    room: String,
}

impl LocalRoom {
    pub fn name(&self) -> &str {
        &self.room
    }
}

impl ChannelRoom for LocalRoom {
    fn publish(&self, payload: Value) -> Result<(), ChannelError> {
        let state = self.hub.lock();
        let subscribed = state.rooms.get(&self.room).is_some_and(|ids| ids.contains(&self.client_id));
        if !subscribed {
            return Err(ChannelError::NotSubscribed(self.room.clone()));
        }

        let message = ChannelEvent::Message {
            room: self.room.clone(),
            payload,
            member: Some(state.remote(&self.client_id)),
        };
        state.broadcast(&self.room, &message, None);
        Ok(())
    }
}

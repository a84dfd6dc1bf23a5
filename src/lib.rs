// src/lib.rs

//! A chat client over a hosted realtime channel.
//!
//! `ChatService` adapts a `RealtimeChannel` into message and typing callbacks
//! plus a roster broadcast; `ConversationView` and `RosterView` render what it
//! reports. `LocalHub` is an in-process channel for demos and tests.

pub mod app;
pub mod bot;
pub mod channel;
pub mod config;
pub mod conversation;
pub mod error;
pub mod hub;
pub mod models;
pub mod roster_view;
pub mod service;
pub mod state;
pub mod terminal;

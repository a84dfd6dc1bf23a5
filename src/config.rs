// src/config.rs

use std::time::Duration;

pub const DEFAULT_CHANNEL_ID: &str = "local-channel";
pub const DEFAULT_ROOM_NAME: &str = "observable-room";
pub const TYPING_TRANSITION: Duration = Duration::from_millis(300);
pub const VISIBLE_ROWS: usize = 20;
pub const BOT_REPLY_DELAY: Duration = Duration::from_millis(1200);

/// Settings for one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub channel_id: String,
    pub room_name: String,
    /// Duration of the typing label show/hide transition.
    pub typing_transition: Duration,
    /// How many conversation lines the terminal keeps on screen.
    pub visible_rows: usize,
    /// Simulated participants to add to the room.
    pub bots: usize,
    pub bot_reply_delay: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            room_name: DEFAULT_ROOM_NAME.to_string(),
            typing_transition: TYPING_TRANSITION,
            visible_rows: VISIBLE_ROWS,
            bots: 1,
            bot_reply_delay: BOT_REPLY_DELAY,
        }
    }
}

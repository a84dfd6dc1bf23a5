// src/main.rs

use chat_client::{
    app::{ChatApp, Command},
    bot::EchoBot,
    config::{BOT_REPLY_DELAY, ChatConfig, DEFAULT_CHANNEL_ID, DEFAULT_ROOM_NAME, TYPING_TRANSITION, VISIBLE_ROWS},
    hub::LocalHub,
    models::{Color, Member},
    terminal::{RosterPanel, TerminalSurface},
};
use clap::Parser;
use std::{io, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Terminal chat client
#[derive(Parser, Debug)]
#[command(name = "chat_client")]
#[command(about = "Chat with simulated members over an in-process realtime channel")]
#[command(version)]
struct Args {
    /// Channel to connect to
    #[arg(long, env = "CHAT_CHANNEL_ID", default_value = DEFAULT_CHANNEL_ID)]
    channel_id: String,

    /// Room to join
    #[arg(long, env = "CHAT_ROOM", default_value = DEFAULT_ROOM_NAME)]
    room: String,

    /// Display name (random if omitted)
    #[arg(long, env = "CHAT_NAME")]
    name: Option<String>,

    /// Number of simulated members that answer your messages
    #[arg(long, env = "CHAT_BOTS", default_value_t = 1)]
    bots: usize,

    /// How long a simulated member types before answering, in milliseconds
    #[arg(long, default_value_t = BOT_REPLY_DELAY.as_millis() as u64)]
    bot_delay_ms: u64,

    /// Conversation lines kept on screen
    #[arg(long, default_value_t = VISIBLE_ROWS)]
    rows: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    fn config(&self) -> ChatConfig {
        ChatConfig {
            channel_id: self.channel_id.clone(),
            room_name: self.room.clone(),
            typing_transition: TYPING_TRANSITION,
            visible_rows: self.rows,
            bots: self.bots,
            bot_reply_delay: Duration::from_millis(self.bot_delay_ms),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config = args.config();
    let mut rng = rand::rng();
    let me = match &args.name {
        Some(name) => Member::new(name.clone(), Color::random(&mut rng)),
        None => Member::random(&mut rng),
    };
    tracing::info!("Starting as '{}' in room '{}'", me.name, config.room_name);

    let hub = LocalHub::new(&config.channel_id);
    for _ in 0..config.bots {
        let bot = EchoBot::new(&hub, EchoBot::random_member(&mut rng), &config.room_name, config.bot_reply_delay);
        tokio::spawn(bot.run());
    }

    let (channel, mut events) = hub.channel();
    let surface = TerminalSurface::new(io::stdout(), config.visible_rows);
    let mut app = ChatApp::new(channel, me, surface, || RosterPanel::new(io::stdout()), &config);
    app.connect();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events.recv() => app.handle_event(event),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !app.handle_command(Command::parse(&line)) {
                    break;
                }
            }
        }
    }

    drop(app);
    hub.shutdown();
    Ok(())
}

use chat_client::{
    app::{ChatApp, Command},
    config::ChatConfig,
    conversation::ConversationSurface,
    hub::{EventReceiver, LocalChannel, LocalHub},
    models::{Color, Member, Message},
    roster_view::RosterSurface,
};
use std::time::Duration;

#[derive(Default)]
struct Screen {
    messages: Vec<String>,
    typing: Option<String>,
    member_count: usize,
}

impl ConversationSurface for Screen {
    fn reload(&mut self, messages: &[Message], _me: &Member) {
        self.messages = messages.iter().map(|m| format!("{}: {}", m.sender.name, m.text)).collect();
    }

    fn scroll_to_bottom(&mut self) {}

    fn show_typing(&mut self, text: &str, _transition: Duration) {
        self.typing = Some(text.to_string());
    }

    fn hide_typing(&mut self, _transition: Duration) {
        self.typing = None;
    }

    fn set_member_count(&mut self, count: usize) {
        self.member_count = count;
    }

    fn clear_composer(&mut self) {}
}

#[derive(Default)]
struct Rows(Vec<String>);

impl RosterSurface for Rows {
    fn reload_rows(&mut self, rows: &[&str]) {
        self.0 = rows.iter().map(|r| r.to_string()).collect();
    }
}

type App = ChatApp<LocalChannel, Screen, Rows>;

struct Client {
    app: App,
    events: EventReceiver,
}

impl Client {
    fn new(hub: &LocalHub, name: &str) -> Self {
        let (channel, events) = hub.channel();
        let me = Member::new(name, Color::new(0x33, 0x66, 0x99));
        let app = ChatApp::new(channel, me, Screen::default(), Rows::default, &ChatConfig::default());
        Self { app, events }
    }

    fn pump(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.app.handle_event(event);
        }
    }

    fn messages(&self) -> Vec<String> {
        self.app.conversation().surface().messages.clone()
    }

    fn typing(&self) -> Option<String> {
        self.app.conversation().surface().typing.clone()
    }

    fn member_count(&self) -> usize {
        self.app.conversation().surface().member_count
    }
}

fn pump_all(clients: &mut [&mut Client]) {
    // Two rounds: replies published while handling one round land in the next.
    for _ in 0..2 {
        for client in clients.iter_mut() {
            client.pump();
        }
    }
}

#[test]
fn two_clients_chat_through_the_hub() {
    let hub = LocalHub::new("integration");
    let mut alice = Client::new(&hub, "Alice");
    let mut bob = Client::new(&hub, "Bob");

    alice.app.handle_command(Command::parse("too early"));
    alice.app.connect();
    bob.app.connect();
    pump_all(&mut [&mut alice, &mut bob]);

    assert!(alice.app.service().is_connected());
    assert_eq!(alice.member_count(), 2);
    assert_eq!(bob.member_count(), 2);

    bob.app.handle_command(Command::parse("/typing hel"));
    pump_all(&mut [&mut alice, &mut bob]);
    assert_eq!(alice.typing(), Some("Bob is typing".to_string()));
    assert_eq!(bob.typing(), None);

    bob.app.handle_command(Command::parse("hello alice"));
    pump_all(&mut [&mut alice, &mut bob]);
    assert_eq!(alice.typing(), None);
    assert_eq!(alice.messages(), vec!["Bob: hello alice"]);
    assert_eq!(bob.messages(), vec!["Bob: hello alice"]);

    let ids: Vec<_> = [&alice, &bob]
        .iter()
        .map(|c| c.app.conversation().messages()[0].id)
        .collect();
    assert_ne!(ids[0], ids[1], "each client assigns its own message id");
}

#[test]
fn roster_view_follows_joins_and_leaves() {
    let hub = LocalHub::new("integration");
    let mut alice = Client::new(&hub, "Alice");
    alice.app.connect();
    alice.pump();

    alice.app.handle_command(Command::Members);
    assert_eq!(alice.app.roster().map(|r| r.surface().0.clone()), Some(vec!["Alice".to_string()]));

    let mut bob = Client::new(&hub, "Bob");
    bob.app.connect();
    pump_all(&mut [&mut alice, &mut bob]);
    assert_eq!(
        alice.app.roster().map(|r| r.surface().0.clone()),
        Some(vec!["Alice".to_string(), "Bob".to_string()])
    );

    bob.app.handle_command(Command::parse("/typing x"));
    pump_all(&mut [&mut alice, &mut bob]);
    assert_eq!(alice.typing(), Some("Bob is typing".to_string()));

    drop(bob);
    alice.pump();
    assert_eq!(alice.app.roster().map(|r| r.row_count()), Some(1));
    assert_eq!(alice.member_count(), 1);
    assert_eq!(alice.typing(), None);

    alice.app.handle_command(Command::Close);
    assert!(alice.app.roster().is_none());
    assert!(alice.app.handle_command(Command::Empty));
    assert!(!alice.app.handle_command(Command::Quit));
}

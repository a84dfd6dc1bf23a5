// src/app.rs

use crate::{
    channel::{ChannelEvent, RealtimeChannel},
    config::ChatConfig,
    conversation::{ConversationSurface, ConversationView},
    models::Member,
    roster_view::{RosterSurface, RosterView},
    service::ChatService,
    state::SubscriptionId,
};
use std::{
    cell::{Ref, RefCell},
    rc::Rc,
};

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Composer changed to this text and send was pressed.
    Send(String),
    /// Composer changed to this text, nothing sent.
    Typing(String),
    Members,
    Close,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        match line {
            "" => Command::Empty,
            "/quit" => Command::Quit,
            "/members" => Command::Members,
            "/close" => Command::Close,
            "/typing" => Command::Typing(String::new()),
            _ => match line.strip_prefix("/typing ") {
                Some(text) => Command::Typing(text.to_string()),
                None => Command::Send(line.to_string()),
            },
        }
    }
}

type OpenRoster<R> = (SubscriptionId, Rc<RefCell<RosterView<R>>>);

/// Wires one `ChatService` to its conversation view and, while open, a roster view.
///
/// The adapter callbacks hold weak references to the views, so dropping the
/// app tears everything down without cycles.
pub struct ChatApp<C, S, R>
where
    C: RealtimeChannel,
    S: ConversationSurface + 'static,
    R: RosterSurface + 'static,
{
    service: ChatService<C>,
    conversation: Rc<RefCell<ConversationView<S>>>,
    roster: Option<OpenRoster<R>>,
    roster_surface: Box<dyn Fn() -> R>,
}

impl<C, S, R> ChatApp<C, S, R>
where
    C: RealtimeChannel,
    S: ConversationSurface + 'static,
    R: RosterSurface + 'static,
{
    pub fn new(
        channel: C,
        me: Member,
        surface: S,
        roster_surface: impl Fn() -> R + 'static,
        config: &ChatConfig,
    ) -> Self {
        let conversation = Rc::new(RefCell::new(ConversationView::new(
            me.clone(),
            surface,
            config.typing_transition,
        )));

        let on_message = {
            let view = Rc::downgrade(&conversation);
            move |message| {
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().message_received(message);
                }
            }
        };
        let on_typing = {
            let view = Rc::downgrade(&conversation);
            move |member: &Member, is_typing| {
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().typing_changed(member, is_typing);
                }
            }
        };

        let mut service = ChatService::new(channel, me, &config.room_name, on_message, on_typing);
        {
            let view = Rc::downgrade(&conversation);
            service.subscribe_roster(move |members| {
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().members_changed(members);
                }
            });
        }

        Self { service, conversation, roster: None, roster_surface: Box::new(roster_surface) }
    }

    pub fn service(&self) -> &ChatService<C> {
        &self.service
    }

    pub fn conversation(&self) -> Ref<'_, ConversationView<S>> {
        self.conversation.borrow()
    }

    pub fn roster(&self) -> Option<Ref<'_, RosterView<R>>> {
        self.roster.as_ref().map(|(_, view)| view.borrow())
    }

    pub fn connect(&mut self) {
        self.service.connect();
    }

    pub fn handle_event(&mut self, event: ChannelEvent) {
        self.service.handle_event(event);
    }

    /// Applies a user command. Returns false when the user asked to quit.
    pub fn handle_command(&mut self, command: Command) -> bool {
        match command {
            Command::Send(text) => {
                let mut view = self.conversation.borrow_mut();
                view.composer_changed(&text, &self.service);
                view.send_pressed(&text, &self.service);
            }
            Command::Typing(text) => self.conversation.borrow().composer_changed(&text, &self.service),
            Command::Members => self.open_roster(),
            Command::Close => self.close_roster(),
            Command::Quit => return false,
            Command::Empty => {}
        }
        true
    }

    fn open_roster(&mut self) {
        if self.roster.is_some() {
            return;
        }
        let view = self.conversation.borrow().members_tapped((self.roster_surface)());
        let view = Rc::new(RefCell::new(view));
        let id = {
            let view = Rc::downgrade(&view);
            self.service.subscribe_roster(move |members| {
                if let Some(view) = view.upgrade() {
                    view.borrow_mut().members_changed(members);
                }
            })
        };
        self.roster = Some((id, view));
    }

    fn close_roster(&mut self) {
        if let Some((id, _)) = self.roster.take() {
            self.service.unsubscribe_roster(id);
        }
    }
}

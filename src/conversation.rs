// src/conversation.rs

use crate::{
    models::{Member, Message},
    roster_view::{RosterSurface, RosterView},
    service::ChatActions,
    state::{Roster, TypingIndicator, TypingSet},
};
use std::time::Duration;

/// Where a conversation gets drawn.
pub trait ConversationSurface {
    /// Redraws the whole message list. Each item is labelled with its sender.
    fn reload(&mut self, messages: &[Message], me: &Member);
    fn scroll_to_bottom(&mut self);
    fn show_typing(&mut self, text: &str, transition: Duration);
    fn hide_typing(&mut self, transition: Duration);
    fn set_member_count(&mut self, count: usize);
    fn clear_composer(&mut self);
}

/// The message list, typing label and composer of one chat session.
pub struct ConversationView<S: ConversationSurface> {
    me: Member,
    messages: Vec<Message>,
    typing: TypingSet,
    roster: Roster,
    surface: S,
    typing_transition: Duration,
}

impl<S: ConversationSurface> ConversationView<S> {
    pub fn new(me: Member, mut surface: S, typing_transition: Duration) -> Self {
        surface.set_member_count(0);
        Self {
            me,
            messages: Vec::new(),
            typing: TypingSet::default(),
            roster: Roster::default(),
            surface,
            typing_transition,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn typing_members(&self) -> &[Member] {
        self.typing.members()
    }

    pub fn members(&self) -> &[Member] {
        self.roster.members()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Appends, redraws, then scrolls so the newest message is visible.
    pub fn message_received(&mut self, message: Message) {
        self.messages.push(message);
        self.surface.reload(&self.messages, &self.me);
        self.surface.scroll_to_bottom();
    }

    pub fn typing_changed(&mut self, member: &Member, is_typing: bool) {
        if member.name == self.me.name {
            return;
        }
        if self.typing.set_typing(member, is_typing) {
            self.refresh_typing_indicator();
        }
    }

    pub fn members_changed(&mut self, members: &[Member]) {
        self.roster.replace(members.to_vec());
        self.surface.set_member_count(members.len());
        if self.typing.retain_present(&self.roster) {
            self.refresh_typing_indicator();
        }
    }

    pub fn composer_changed(&self, text: &str, chat: &impl ChatActions) {
        if text.is_empty() {
            chat.stop_typing();
        } else {
            chat.start_typing();
        }
    }

    pub fn send_pressed(&mut self, text: &str, chat: &impl ChatActions) {
        chat.send_message(text);
        self.surface.clear_composer();
        chat.stop_typing();
    }

    /// Opens a roster view seeded with the members known right now.
    pub fn members_tapped<R: RosterSurface>(&self, surface: R) -> RosterView<R> {
        RosterView::new(self.roster.members(), surface)
    }

    fn refresh_typing_indicator(&mut self) {
        match self.typing.indicator() {
            TypingIndicator::Hidden => self.surface.hide_typing(self.typing_transition),
            TypingIndicator::Shown(text) => self.surface.show_typing(&text, self.typing_transition),
        }
    }
}

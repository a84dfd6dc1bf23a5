// src/state.rs

use crate::models::Member;

/// The members currently present in the room, in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|m| m.name == name)
    }

    /// Replaces the whole roster with a snapshot from the channel.
    pub fn replace(&mut self, members: Vec<Member>) {
        self.members = members;
    }

    pub fn join(&mut self, member: Member) {
        self.members.push(member);
    }

    /// Removes the first member with the given name. Returns whether anything changed.
    pub fn leave(&mut self, name: &str) -> bool {
        match self.members.iter().position(|m| m.name == name) {
            Some(index) => {
                self.members.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Members currently flagged as typing, keyed by name, in the order they started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingSet {
    members: Vec<Member>,
}

impl TypingSet {
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Applies a typing flag. Returns whether the set changed.
    pub fn set_typing(&mut self, member: &Member, is_typing: bool) -> bool {
        let index = self.members.iter().position(|m| m.name == member.name);
        match (is_typing, index) {
            (true, None) => {
                self.members.push(member.clone());
                true
            }
            (false, Some(index)) => {
                self.members.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Drops everyone who is no longer in the roster. Returns whether the set changed.
    pub fn retain_present(&mut self, roster: &Roster) -> bool {
        let before = self.members.len();
        self.members.retain(|m| roster.contains(&m.name));
        self.members.len() != before
    }

    pub fn indicator(&self) -> TypingIndicator {
        match self.members.as_slice() {
            [] => TypingIndicator::Hidden,
            [only] => TypingIndicator::Shown(format!("{} is typing", only.name)),
            many => {
                let names: Vec<&str> = many.iter().map(|m| m.name.as_str()).collect();
                TypingIndicator::Shown(format!("{} are typing", names.join(", ")))
            }
        }
    }
}

/// What the typing label should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypingIndicator {
    Hidden,
    Shown(String),
}

/// Handle returned by `RosterBroadcast::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type RosterObserver = Box<dyn FnMut(&[Member])>;

/// Observers interested in roster changes. Every notification carries the
/// complete roster; there is no diffing.
#[derive(Default)]
pub struct RosterBroadcast {
    next_id: u64,
    observers: Vec<(SubscriptionId, RosterObserver)>,
}

impl RosterBroadcast {
    pub fn subscribe(&mut self, observer: impl FnMut(&[Member]) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&mut self, members: &[Member]) {
        for (_, observer) in &mut self.observers {
            observer(members);
        }
    }
}

// src/roster_view.rs

use crate::models::Member;

/// Where the member list gets drawn, one row per member.
pub trait RosterSurface {
    fn reload_rows(&mut self, rows: &[&str]);
}

/// Lists the current members by name, in the order the adapter delivered them.
pub struct RosterView<S: RosterSurface> {
    members: Vec<Member>,
    surface: S,
}

impl<S: RosterSurface> RosterView<S> {
    pub fn new(members: &[Member], surface: S) -> Self {
        let mut view = Self { members: Vec::new(), surface };
        view.members_changed(members);
        view
    }

    pub fn row_count(&self) -> usize {
        self.members.len()
    }

    pub fn row_title(&self, row: usize) -> Option<&str> {
        self.members.get(row).map(|m| m.name.as_str())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn members_changed(&mut self, members: &[Member]) {
        self.members = members.to_vec();
        let rows: Vec<&str> = self.members.iter().map(|m| m.name.as_str()).collect();
        self.surface.reload_rows(&rows);
    }
}

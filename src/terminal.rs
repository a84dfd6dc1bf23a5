// src/terminal.rs

use crate::{
    conversation::ConversationSurface,
    models::{Member, Message},
    roster_view::RosterSurface,
};
use colored::Colorize;
use std::{io::Write, time::Duration};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Draws the conversation into a terminal, keeping the newest lines visible.
pub struct TerminalSurface<W: Write> {
    out: W,
    lines: Vec<String>,
    typing: Option<String>,
    member_count: usize,
    visible_rows: usize,
    clear_screen: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, visible_rows: usize) -> Self {
        Self {
            out,
            lines: Vec::new(),
            typing: None,
            member_count: 0,
            visible_rows,
            clear_screen: true,
        }
    }

    /// Appends frames instead of clearing the screen between them.
    pub fn without_clearing(mut self) -> Self {
        self.clear_screen = false;
        self
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn draw(&mut self) {
        if let Err(e) = self.write_frame() {
            tracing::warn!("Failed to draw conversation: {}", e);
        }
    }

    fn write_frame(&mut self) -> std::io::Result<()> {
        if self.clear_screen {
            write!(self.out, "{CLEAR_SCREEN}")?;
        }
        let noun = if self.member_count == 1 { "member" } else { "members" };
        let header = format!("[{} {noun}]", self.member_count);
        writeln!(self.out, "{}", header.as_str().dimmed())?;

        let start = self.lines.len().saturating_sub(self.visible_rows);
        for line in &self.lines[start..] {
            writeln!(self.out, "{line}")?;
        }
        if let Some(typing) = &self.typing {
            writeln!(self.out, "{}", typing.italic().dimmed())?;
        }
        self.out.flush()
    }
}

/// One conversation line: the sender label in the sender's color, then the text.
pub fn format_line(message: &Message, me: &Member) -> String {
    let color = message.sender.color;
    let mut label = message.sender.name.truecolor(color.r, color.g, color.b).bold().to_string();
    if message.sender.name == me.name {
        label.push_str(" (you)");
    }
    format!("{label}: {}", message.text)
}

impl<W: Write> ConversationSurface for TerminalSurface<W> {
    fn reload(&mut self, messages: &[Message], me: &Member) {
        self.lines = messages.iter().map(|m| format_line(m, me)).collect();
    }

    fn scroll_to_bottom(&mut self) {
        self.draw();
    }

    // A terminal has no animation, so the transition is ignored.
    fn show_typing(&mut self, text: &str, _transition: Duration) {
        self.typing = Some(text.to_string());
        self.draw();
    }

    fn hide_typing(&mut self, _transition: Duration) {
        self.typing = None;
        self.draw();
    }

    fn set_member_count(&mut self, count: usize) {
        self.member_count = count;
        self.draw();
    }

    fn clear_composer(&mut self) {
        // stdin already consumed the line
    }
}

/// Prints the member list below the conversation.
pub struct RosterPanel<W: Write> {
    out: W,
}

impl<W: Write> RosterPanel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_rows(&mut self, rows: &[&str]) -> std::io::Result<()> {
        writeln!(self.out, "{}", "Members:".bold())?;
        for row in rows {
            writeln!(self.out, "  {row}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> RosterSurface for RosterPanel<W> {
    fn reload_rows(&mut self, rows: &[&str]) {
        if let Err(e) = self.write_rows(rows) {
            tracing::warn!("Failed to draw members: {}", e);
        }
    }
}

use chat_common::markdown;

pub const GREETING: &str =
    "👋 Ask me about courses, prices, categories, or how to use the platform.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// What the user typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Reset,
    History,
    Quit,
    Message(&'a str),
}

pub fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Empty,
        "/reset" => Input::Reset,
        "/history" => Input::History,
        "/quit" | "/exit" => Input::Quit,
        text => Input::Message(text),
    }
}

/// Messages shown in the current session. Display only; nothing is sent back to the server.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<(Sender, String)>,
}

impl Transcript {
    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.entries.push((sender, text.into()));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Terminal rendering of every entry, oldest first.
    pub fn render_all(&self) -> String {
        self.entries
            .iter()
            .map(|(sender, text)| render_entry(*sender, text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Terminal rendering of the latest entry.
    pub fn render_last(&self) -> Option<String> {
        self.entries.last().map(|(sender, text)| render_entry(*sender, text))
    }
}

fn render_entry(sender: Sender, text: &str) -> String {
    let body = markdown::to_ansi(&markdown::render(text));
    match sender {
        Sender::User => format!("you> {body}"),
        Sender::Bot => format!("assistant>\n{body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(parse_input("/reset"), Input::Reset);
        assert_eq!(parse_input(" /quit "), Input::Quit);
        assert_eq!(parse_input("/history"), Input::History);
        assert_eq!(parse_input("/exit"), Input::Quit);
        assert_eq!(parse_input("  what is rust? "), Input::Message("what is rust?"));
    }

    #[test]
    fn test_bot_reply_is_rendered() {
        let mut transcript = Transcript::default();
        transcript.push(Sender::Bot, "**\"Top picks\"**\n* **Rust** course");
        assert_eq!(
            transcript.render_last().unwrap(),
            "assistant>\n\"\x1b[1mTop picks\x1b[0m\"\n  • \x1b[1mRust\x1b[0m course"
        );
    }

    #[test]
    fn test_history_renders_both_sides() {
        let mut transcript = Transcript::default();
        transcript.push(Sender::User, "any **Rust** courses?");
        transcript.push(Sender::Bot, "* Rust Basics");
        assert_eq!(
            transcript.render_all(),
            "you> any \x1b[1mRust\x1b[0m courses?\n\nassistant>\n  • Rust Basics"
        );
    }

    #[test]
    fn test_reset_clears_entries() {
        let mut transcript = Transcript::default();
        transcript.push(Sender::User, "hi");
        transcript.push(Sender::Bot, "hello");
        assert_eq!(transcript.len(), 2);
        transcript.clear();
        assert!(transcript.is_empty());
        assert_eq!(transcript.render_last(), None);
        assert_eq!(transcript.render_all(), "");
    }
}

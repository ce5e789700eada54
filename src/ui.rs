use crate::news::EntryList;
use crate::util::sanitize::{sanitize_for_terminal, strip_controls};
use console::style;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub const PROMPT: &str = "Enter an article number to view it, n/p for next/previous";

/// What a token typed at the listing prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Open(u64),
    Ignore,
}

impl Command {
    pub fn parse(token: &str) -> Command {
        match token {
            "n" => Command::Next,
            "p" => Command::Previous,
            other => other.parse().map(Command::Open).unwrap_or(Command::Ignore),
        }
    }
}

pub fn render_entries<W: Write>(out: &mut W, list: &EntryList) -> io::Result<()> {
    for entry in &list.entries {
        let title = sanitize_for_terminal(&entry.title);
        let site = sanitize_for_terminal(&entry.site);
        let site = if site.is_empty() {
            String::new()
        } else {
            format!(" {}", style(format!("({})", site)).green())
        };
        writeln!(
            out,
            "{} {}{}",
            style(format!("[{}]", entry.id)).yellow(),
            style(title).white().bold(),
            site
        )?;
        writeln!(out, "   {}", style(strip_controls(&entry.link)).white())?;
    }
    writeln!(out, "{}", PROMPT)?;
    out.flush()
}

/// Splits input into whitespace-separated tokens, a line at a time.
pub struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Tokens {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// `None` once the input is exhausted. Bytes that are not UTF-8 come
    /// through as replacement characters rather than an error.
    pub fn next_token(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            let mut line = Vec::new();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(String::from_utf8_lossy(&line).split_whitespace().map(String::from));
        }
    }
}

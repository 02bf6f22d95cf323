//! Interactive prompting.
//!
//! Command logic decides what to ask (choice lists, free text, consent)
//! and this layer does the asking, so the decision code stays prompt-free
//! and testable with a scripted implementation.

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Prompt primitives the command layer depends on.
pub trait Prompter {
    /// Pick one item from a list; `None` means the user declined.
    fn choose(&mut self, title: &str, items: &[String]) -> Result<Option<usize>>;

    /// Free-text input; `None` on empty input.
    fn input(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Yes/no confirmation, defaulting to no.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Prompter reading stdin and writing stdout.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn choose(&mut self, title: &str, items: &[String]) -> Result<Option<usize>> {
        println!("{}", title);
        for (i, item) in items.iter().enumerate() {
            println!("  {}) {}", i + 1, item);
        }

        let line = read_line(&format!("Select [1-{}]: ", items.len()))?;
        Ok(parse_choice(&line, items.len()))
    }

    fn input(&mut self, prompt: &str) -> Result<Option<String>> {
        let line = read_line(&format!("{}: ", prompt))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let line = read_line(&format!("{} [y/N]: ", question))?;
        Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
    }
}

/// Parse a 1-based selection against a list length; anything else declines.
fn parse_choice(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= len => Some(n - 1),
        _ => None,
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}

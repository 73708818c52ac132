//! Conversational commands
//!
//! The terminal is one more transport: each input line is an utterance and
//! each reply is printed with its choice set rendered as `[option]` hints.
//! Typing an option's label sends that option's utterance.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use moneylytics_core::{Assistant, Choice, OutboundMessage, Utterance};

/// Render a reply for the terminal
pub fn render_reply(reply: &OutboundMessage) -> String {
    let mut out = reply.text.clone();
    if let Some(choices) = reply.choices {
        let hints: Vec<String> = choices
            .options()
            .iter()
            .map(|c| format!("[{}]", c.label))
            .collect();
        out.push('\n');
        out.push_str(&hints.join(" "));
    }
    out
}

/// Map a typed line to the utterance to send
///
/// A line matching one of the offered labels sends that option's utterance.
fn resolve_input(line: &str, offered: &[Choice]) -> String {
    let line = line.trim();
    offered
        .iter()
        .find(|c| c.label == line)
        .map(|c| c.utterance.clone())
        .unwrap_or_else(|| line.to_string())
}

/// Run a chat session over arbitrary input and output streams
pub fn run_chat<R: BufRead, W: Write>(
    assistant: &Assistant,
    user_id: i64,
    name: &str,
    username: Option<&str>,
    input: R,
    mut output: W,
) -> Result<usize> {
    let mut offered: Vec<Choice> = Vec::new();
    let mut handled = 0;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let utterance = Utterance {
            user_id,
            text: resolve_input(&line, &offered),
            display_name: name.to_string(),
            username: username.map(str::to_string),
        };
        let reply = assistant.handle_utterance(&utterance);
        handled += 1;

        writeln!(output, "{}", render_reply(&reply))?;
        writeln!(output)?;
        output.flush()?;

        offered = reply.choices.map(|c| c.options()).unwrap_or_default();
    }

    Ok(handled)
}

pub fn cmd_chat(
    assistant: &Assistant,
    user_id: i64,
    name: &str,
    username: Option<&str>,
) -> Result<()> {
    println!("💬 Chatting as {} (user {}). Ctrl+D to leave.", name, user_id);
    println!();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let handled = run_chat(
        assistant,
        user_id,
        name,
        username,
        stdin.lock(),
        stdout.lock(),
    )?;

    tracing::debug!(user_id, handled, "Chat session ended");
    Ok(())
}

pub fn cmd_say(assistant: &Assistant, user_id: i64, name: &str, text: &str) -> Result<()> {
    let reply = assistant.handle_utterance(&Utterance::new(user_id, name, text));
    println!("{}", render_reply(&reply));
    Ok(())
}

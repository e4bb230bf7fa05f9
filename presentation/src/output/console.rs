//! Console output formatter for the conversation

use colored::Colorize;
use docqa_domain::util::preview;
use docqa_domain::{Message, Role, SessionSnapshot};

/// Longest query echoed in status lines
const STATUS_PREVIEW_BYTES: usize = 60;

/// Formats transcript entries and session snapshots for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one transcript entry
    pub fn format_message(message: &Message) -> String {
        match message.role() {
            Role::User => format!("{} {}", "You:".cyan().bold(), message.text()),
            Role::Assistant => {
                let mut output = format!("{} {}", "Answer:".green().bold(), message.text());
                if let Some(source) = message.source_ref() {
                    output.push_str(&format!("\n\n{}\n", "Source:".dimmed().bold()));
                    for line in source.lines() {
                        output.push_str(&format!("  {}\n", line.dimmed()));
                    }
                    // Drop the final newline so every message ends the same way
                    output.pop();
                }
                output
            }
            Role::System => format!("{} {}", "*".yellow().bold(), message.text().yellow()),
            Role::Error => format!("{} {}", "!".red().bold(), message.text().red()),
        }
    }

    /// Format the whole transcript, oldest first
    pub fn format_transcript(transcript: &[Message]) -> String {
        if transcript.is_empty() {
            return format!("{}", "(no messages yet)".dimmed());
        }

        transcript
            .iter()
            .map(Self::format_message)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format a short status block
    pub fn format_status(snapshot: &SessionSnapshot) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "State:".cyan().bold(),
            snapshot.state
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Document:".cyan().bold(),
            snapshot.document_name.as_deref().unwrap_or("(none)")
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Messages:".cyan().bold(),
            snapshot.transcript.len()
        ));

        if let Some(last) = snapshot
            .transcript
            .iter()
            .rev()
            .find(|m| m.role() == Role::User)
        {
            output.push_str(&format!(
                "{} {}\n",
                "Last question:".cyan().bold(),
                preview(last.text(), STATUS_PREVIEW_BYTES)
            ));
        }

        if snapshot.busy {
            output.push_str(&format!("{}\n", "A request is in progress".yellow()));
        }

        output
    }

    /// Format the snapshot as JSON
    pub fn format_json(snapshot: &SessionSnapshot) -> String {
        serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format an error that never reaches the transcript
    pub fn format_error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    /// Format the banner shown when chat mode starts
    pub fn welcome(base_url: &str) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str("╭─────────────────────────────────────────────╮\n");
        output.push_str("│            docqa - Document Chat            │\n");
        output.push_str("╰─────────────────────────────────────────────╯\n");
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Service:".cyan().bold(), base_url));
        output.push('\n');
        output.push_str(&Self::help());
        output
    }

    /// Format the command list
    pub fn help() -> String {
        let mut output = String::new();
        output.push_str("Commands:\n");
        output.push_str("  /upload <path>   - Upload a PDF document\n");
        output.push_str("  /reset           - Clear the document and conversation\n");
        output.push_str("  /status          - Show session status\n");
        output.push_str("  /history         - Show the conversation so far\n");
        output.push_str("  /help, /h, /?    - Show this help\n");
        output.push_str("  /quit, /exit, /q - Exit chat\n");
        output.push('\n');
        output.push_str("Anything else is sent as a question. Ctrl-C cancels a running request.\n");
        output
    }
}

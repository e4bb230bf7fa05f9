//! Parsing of REPL input lines

use std::path::PathBuf;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// `/upload <path>`
    Upload(PathBuf),
    /// `/upload` without a path
    UploadMissingPath,
    Reset,
    Status,
    History,
    Help,
    Quit,
    /// Any other `/word`
    Unknown(String),
    /// Everything that is not a command is a question
    Query(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        if !line.starts_with('/') {
            return ReplCommand::Query(line.to_string());
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name {
            "/upload" | "/u" if rest.is_empty() => ReplCommand::UploadMissingPath,
            "/upload" | "/u" => ReplCommand::Upload(PathBuf::from(unquote(rest))),
            "/reset" => ReplCommand::Reset,
            "/status" => ReplCommand::Status,
            "/history" => ReplCommand::History,
            "/help" | "/h" | "/?" => ReplCommand::Help,
            "/quit" | "/exit" | "/q" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(name.to_string()),
        }
    }
}

/// Strip one pair of matching quotes (paths pasted from a file manager)
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = s
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    s
}

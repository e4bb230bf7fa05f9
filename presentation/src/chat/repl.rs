//! REPL (Read-Eval-Print Loop) for interactive chat

use super::cancel_on_ctrl_c;
use super::command::ReplCommand;
use crate::ConsoleFormatter;
use docqa_application::SessionController;
use docqa_domain::DocumentFile;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Reads a local file into a [`DocumentFile`]; the error is shown as is
pub type FileLoader = Arc<dyn Fn(&Path) -> Result<DocumentFile, String> + Send + Sync>;

/// Interactive chat REPL
pub struct ChatRepl {
    controller: Arc<SessionController>,
    loader: FileLoader,
    service_label: String,
    history_file: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(controller: Arc<SessionController>, loader: FileLoader) -> Self {
        Self {
            controller,
            loader,
            service_label: String::new(),
            history_file: None,
        }
    }

    /// Set the service URL shown in the banner
    pub fn with_service_label(mut self, label: impl Into<String>) -> Self {
        self.service_label = label.into();
        self
    }

    /// Set where readline history is kept
    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!("{}", ConsoleFormatter::welcome(&self.service_label));

        loop {
            let readline = rl.readline(&self.prompt());

            match readline {
                Ok(line) => {
                    let command = ReplCommand::parse(&line);
                    if command == ReplCommand::Empty {
                        continue;
                    }

                    let _ = rl.add_history_entry(line.trim());

                    if self.handle(command).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_file {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn prompt(&self) -> String {
        match self.controller.snapshot().document_name {
            Some(name) => format!("{}> ", name),
            None => "docqa> ".to_string(),
        }
    }

    /// Execute one parsed line. Returns true if the REPL should exit.
    pub async fn handle(&self, command: ReplCommand) -> bool {
        debug!("REPL command: {:?}", command);

        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                println!();
                println!("{}", ConsoleFormatter::help());
            }
            ReplCommand::Upload(path) => self.upload(&path).await,
            ReplCommand::UploadMissingPath => {
                eprintln!("{}", ConsoleFormatter::format_error("Usage: /upload <path>"));
            }
            ReplCommand::Reset => match self.controller.reset() {
                Ok(()) => println!("Session cleared. Upload a document to start again."),
                Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e.to_string())),
            },
            ReplCommand::Status => {
                println!("{}", ConsoleFormatter::format_status(&self.controller.snapshot()));
            }
            ReplCommand::History => {
                println!();
                println!(
                    "{}",
                    ConsoleFormatter::format_transcript(&self.controller.snapshot().transcript)
                );
                println!();
            }
            ReplCommand::Unknown(name) => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
            }
            ReplCommand::Query(text) => self.ask(&text).await,
            ReplCommand::Empty => {}
        }
        false
    }

    /// Load `path` and upload it, printing the outcome
    pub async fn upload(&self, path: &Path) {
        let file = match (self.loader)(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{}", ConsoleFormatter::format_error(&e));
                return;
            }
        };

        let result = cancel_on_ctrl_c(&self.controller, self.controller.submit_file(file)).await;
        match result {
            Ok(_) => {
                if let Some(message) = self.controller.snapshot().last_message() {
                    println!("{}", ConsoleFormatter::format_message(message));
                }
            }
            // Upload failures are notifications, not transcript entries
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
    }

    async fn ask(&self, text: &str) {
        println!();
        let result = cancel_on_ctrl_c(&self.controller, self.controller.submit_query(text)).await;
        match result {
            Ok(message) => println!("{}", ConsoleFormatter::format_message(&message)),
            Err(e) => eprintln!("{}", ConsoleFormatter::format_error(&e.to_string())),
        }
        println!();
    }
}

//! Progress reporting while a request is outstanding

use colored::Colorize;
use docqa_application::RequestProgress;
use docqa_domain::RequestKind;
use docqa_domain::util::preview;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Longest label shown next to the spinner
const LABEL_PREVIEW_BYTES: usize = 50;

fn start_message(kind: RequestKind, label: &str) -> String {
    match kind {
        RequestKind::Upload => format!("Uploading {}...", label),
        RequestKind::Query => format!("Asking \"{}\"...", preview(label, LABEL_PREVIEW_BYTES)),
    }
}

/// Reports progress with a spinner on stderr
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestProgress for ProgressReporter {
    fn on_request_start(&self, kind: RequestKind, label: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message(start_message(kind, label));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let mut slot = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = slot.replace(spinner) {
            previous.finish_and_clear();
        }
    }

    fn on_request_end(&self, _kind: RequestKind, _success: bool) {
        let mut slot = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(spinner) = slot.take() {
            // The outcome itself is printed by the caller
            spinner.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl RequestProgress for SimpleProgress {
    fn on_request_start(&self, kind: RequestKind, label: &str) {
        eprintln!("{} {}", "->".cyan(), start_message(kind, label).bold());
    }

    fn on_request_end(&self, kind: RequestKind, success: bool) {
        if success {
            eprintln!("  {} {} done", "v".green(), kind);
        } else {
            eprintln!("  {} {} failed", "x".red(), kind);
        }
    }
}

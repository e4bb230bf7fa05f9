//! CLI entrypoint for docqa
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use docqa_application::{
    ConversationLogger, NoConversationLogger, NoProgress, RequestProgress, SessionController,
};
use docqa_domain::Role;
use docqa_infrastructure::{
    ConfigLoader, FileConfig, HttpDocumentService, JsonlConversationLogger, LocalDocumentLoader,
};
use docqa_presentation::{
    ChatRepl, Cli, ConsoleFormatter, FileLoader, OutputConfig, OutputFormat, ProgressReporter,
    ReplConfig, SimpleProgress, cancel_on_ctrl_c,
};
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration (files and environment), then command line flags
    let loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let mut config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    let _log_guard = init_tracing(cli.verbose, config.logging.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("{}", config.to_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting docqa against {}", config.api.base_url);

    let output_config = OutputConfig {
        color: config.output.color && !cli.no_color,
    };
    output_config.apply();

    let repl_config = ReplConfig {
        show_progress: config.repl.show_progress && !cli.quiet,
        history_file: config.repl.history_file.clone(),
    };

    // === Dependency Injection ===
    let service = Arc::new(
        HttpDocumentService::new(&config.api.base_url, config.api.timeout())
            .context("Failed to create HTTP client")?,
    );

    // Spinners only make sense on a terminal; plain lines otherwise
    let progress: Arc<dyn RequestProgress> = if !repl_config.show_progress {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let conversation_logger: Arc<dyn ConversationLogger> =
        match config.logging.transcript_file.as_deref() {
            Some(path) => match JsonlConversationLogger::new(path) {
                Some(logger) => {
                    info!("Writing transcript to {}", logger.path().display());
                    Arc::new(logger)
                }
                None => {
                    warn!("Transcript disabled; could not open {}", path);
                    Arc::new(NoConversationLogger)
                }
            },
            None => Arc::new(NoConversationLogger),
        };

    let client_config = config.api.client_config();
    let max_upload_bytes = client_config.max_upload_bytes;
    let controller = Arc::new(
        SessionController::new(service)
            .with_config(client_config)
            .with_progress(progress)
            .with_conversation_logger(conversation_logger),
    );

    // Chat mode
    if cli.chat {
        let loader: FileLoader = Arc::new(move |path: &Path| {
            LocalDocumentLoader::new()
                .with_max_bytes(max_upload_bytes)
                .load(path)
                .map_err(|e| e.to_string())
        });
        let repl = ChatRepl::new(controller, loader)
            .with_service_label(config.api.base_url.clone())
            .with_history_file(repl_config.history_path());

        if let Some(path) = &cli.file {
            repl.upload(path).await;
        }

        repl.run().await?;
        return Ok(ExitCode::SUCCESS);
    }

    // One-shot mode - file and question are required
    let Some(question) = cli.question.as_deref() else {
        bail!("Question is required. Use --chat for interactive mode.");
    };
    let Some(path) = cli.file.as_deref() else {
        bail!("A document is required. Use --file <path> to choose one.");
    };

    let file = LocalDocumentLoader::new()
        .with_max_bytes(max_upload_bytes)
        .load(path)?;
    cancel_on_ctrl_c(&controller, controller.submit_file(file)).await?;

    let message = cancel_on_ctrl_c(&controller, controller.submit_query(question)).await?;

    match cli.output {
        OutputFormat::Text => {
            println!("{}", ConsoleFormatter::format_message(&message));
        }
        OutputFormat::Json => {
            println!("{}", ConsoleFormatter::format_json(&controller.snapshot()));
        }
    }

    if message.role() == Role::Error {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Command line flags take priority over every configuration source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = timeout;
    }
    if let Some(path) = &cli.transcript {
        config.logging.transcript_file = Some(path.display().to_string());
    }
}

/// Initialize logging based on verbosity level
///
/// Logs go to stderr, or to `log_file` when one is configured.
fn init_tracing(verbose: u8, log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(log_file) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let path = Path::new(log_file);
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Invalid log file path: {}", log_file))?;
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();

    Ok(Some(guard))
}

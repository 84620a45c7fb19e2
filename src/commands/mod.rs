/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`    — Interactive tutoring session
- `extract` — One-shot PDF text extraction

These handlers are intentionally small and use the library components:
the completion services, the extractor, and the session.
*/

use crate::config::Config;
use crate::error::Result;
use crate::extract::{DocumentExtractor, PdfExtractor};
use crate::prompts::resolve_system_prompt;
use crate::providers::create_service;
use crate::session::{ContextWindow, Session};
use std::path::{Path, PathBuf};

/// User input recorded alongside the scripted welcome message
const GREETING_INPUT: &str = "Hello";

/// Marker recorded when a document is ingested
const DOCUMENT_MARKER: &str = "PDF UPLOADED";

/// Inputs that end the session with the farewell message
const FAREWELL_WORDS: &[&str] = &["bye", "exit", "quit", "khuda hafiz"];

/// Special commands recognized by the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
enum SpecialCommand {
    /// Show available commands
    Help,
    /// Show context window occupancy
    Context,
    /// Ingest a PDF from the given path
    Upload(PathBuf),
    /// Not a special command
    None,
}

fn parse_special_command(input: &str) -> SpecialCommand {
    if input == "/help" {
        return SpecialCommand::Help;
    }
    if input == "/context" {
        return SpecialCommand::Context;
    }
    if let Some(path) = input.strip_prefix("/upload ") {
        let path = path.trim();
        if !path.is_empty() {
            return SpecialCommand::Upload(PathBuf::from(path));
        }
    }
    SpecialCommand::None
}

fn is_farewell(input: &str) -> bool {
    let lowered = input.to_lowercase();
    FAREWELL_WORDS.contains(&lowered.as_str())
}

// Chat command handler
pub mod chat {
    //! Interactive tutoring session handler.
    //!
    //! Instantiates the completion service, seeds the session with the
    //! greeting exchange, and runs a readline-based loop that submits user
    //! input and streams replies back as they arrive.

    use super::*;
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::io::Write;

    /// Start an interactive tutoring session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `provider_override` - Optional override for the configured provider
    /// * `window_pairs_override` - Optional override for the window capacity
    /// * `prompt_file_override` - Optional replacement instruction file
    pub async fn run_chat(
        mut config: Config,
        provider_override: Option<String>,
        window_pairs_override: Option<usize>,
        prompt_file_override: Option<PathBuf>,
    ) -> Result<()> {
        tracing::info!("Starting interactive tutoring session");

        if let Some(pairs) = window_pairs_override {
            config.session.window_pairs = pairs;
        }
        if let Some(path) = prompt_file_override {
            config.tutor.system_prompt = None;
            config.tutor.system_prompt_file = Some(path);
        }

        let provider_type = provider_override
            .as_deref()
            .unwrap_or(&config.provider.provider_type);

        let service = create_service(provider_type, &config.provider)?;
        let instruction = resolve_system_prompt(&config.tutor)?;

        let window = ContextWindow::new(config.session.window_pairs)?;
        let mut session = Session::new(window, instruction);
        let extractor = PdfExtractor::new();

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config.session.welcome_message);
        session.record_exchange(GREETING_INPUT, &config.session.welcome_message);

        loop {
            match rl.readline("tutora >> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    if is_farewell(trimmed) {
                        println!("\n{}\n", config.session.farewell_message);
                        session.record_exchange(trimmed, &config.session.farewell_message);
                        break;
                    }

                    match parse_special_command(trimmed) {
                        SpecialCommand::Help => {
                            print_help();
                            continue;
                        }
                        SpecialCommand::Context => {
                            print_context_status(&session);
                            continue;
                        }
                        SpecialCommand::Upload(path) => {
                            handle_upload(&mut session, &extractor, &path);
                            continue;
                        }
                        SpecialCommand::None => {}
                    }

                    let outcome = if service.supports_streaming() {
                        let result = session
                            .exchange_streaming(service.as_ref(), trimmed, |fragment| {
                                print!("{}", fragment);
                                let _ = std::io::stdout().flush();
                            })
                            .await;
                        if result.is_ok() {
                            println!("\n");
                        }
                        result.map(|_| ())
                    } else {
                        session
                            .exchange(service.as_ref(), trimmed)
                            .await
                            .map(|reply| println!("\n{}\n", reply))
                    };

                    if let Err(e) = outcome {
                        eprintln!("\nError: {}\n", e);
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of a session
    fn print_welcome_banner(welcome_message: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Tutora - Welcome!                         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("{}\n", welcome_message);
        println!("Type '/help' for available commands, 'bye' to quit\n");
    }

    fn print_help() {
        println!("\nAvailable commands:");
        println!("  /upload <path>  Ingest a PDF so the tutor can quiz you on it");
        println!("  /context        Show context window occupancy");
        println!("  /help           Show this help");
        println!("  bye | exit | quit   End the session\n");
    }

    /// Display context window occupancy and the active document
    fn print_context_status(session: &Session) {
        let window = session.window();
        println!(
            "\nContext window: {} of {} pairs used",
            window.len(),
            window.capacity()
        );
        match session.document() {
            Some(document) => println!(
                "Active document: {} ({} characters)\n",
                document.label(),
                document.text().chars().count()
            ),
            None => println!("Active document: none\n"),
        }
    }

    /// Read, extract, and ingest a document into the session
    ///
    /// Extraction failures are surfaced to the user; nothing is recorded.
    pub(super) fn handle_upload(
        session: &mut Session,
        extractor: &dyn DocumentExtractor,
        path: &Path,
    ) {
        println!("{}", format!("Loading {}", path.display()).cyan());

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Error: failed to read {}: {}", path.display(), e).red()
                );
                return;
            }
        };

        match extractor.extract(&bytes) {
            Ok(text) => {
                let chars = text.chars().count();
                session.ingest_document(DOCUMENT_MARKER, text);
                println!(
                    "{}",
                    format!(
                        "Document ingested ({} characters). Ask for MCQs or an explanation!",
                        chars
                    )
                    .green()
                );
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {}", e).red());
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::error::TutoraError;

        /// Unknown provider should return an error quickly during service creation
        #[tokio::test]
        async fn test_run_chat_unknown_provider() {
            let mut config = Config::default();
            config.provider.provider_type = "invalid_provider".to_string();

            let res = run_chat(config, None, None, None).await;
            assert!(res.is_err());
        }

        struct FixedExtractor;

        impl DocumentExtractor for FixedExtractor {
            fn extract(&self, _bytes: &[u8]) -> Result<String> {
                Ok("extracted text".to_string())
            }
        }

        struct BrokenExtractor;

        impl DocumentExtractor for BrokenExtractor {
            fn extract(&self, _bytes: &[u8]) -> Result<String> {
                Err(TutoraError::Extraction("bad document".to_string()).into())
            }
        }

        fn empty_session() -> Session {
            Session::new(ContextWindow::new(3).unwrap(), "instruction")
        }

        #[test]
        fn test_handle_upload_ingests_document() {
            use std::io::Write;

            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "raw bytes").unwrap();

            let mut session = empty_session();
            handle_upload(&mut session, &FixedExtractor, file.path());

            assert_eq!(session.document().unwrap().text(), "extracted text");
            assert_eq!(session.window().len(), 1);
        }

        #[test]
        fn test_handle_upload_extraction_failure_records_nothing() {
            use std::io::Write;

            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "raw bytes").unwrap();

            let mut session = empty_session();
            handle_upload(&mut session, &BrokenExtractor, file.path());

            assert!(session.document().is_none());
            assert!(session.window().is_empty());
        }

        #[test]
        fn test_handle_upload_missing_file_records_nothing() {
            let mut session = empty_session();
            handle_upload(&mut session, &FixedExtractor, Path::new("/nonexistent.pdf"));

            assert!(session.document().is_none());
            assert!(session.window().is_empty());
        }
    }
}

/// Extract command handler
///
/// One-shot PDF extraction, useful for inspecting what the tutor will see
/// after an `/upload`.
pub mod extract {
    use super::*;

    /// Extract the plain text of a PDF and print it to stdout
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the PDF file
    pub fn run_extract(path: &Path) -> Result<()> {
        tracing::info!(path = %path.display(), "Extracting PDF text");

        let bytes = std::fs::read(path)?;
        let extractor = PdfExtractor::new();
        let text = extractor.extract(&bytes)?;

        println!("{}", text);
        Ok(())
    }

}

//! moodlift command-line client.
//!
//! # Environment Variables
//!
//! - `MOODLIFT_PROVIDER` — "gemini" (default) or "openai"
//! - `GOOGLE_API_KEY` / `GEMINI_API_KEY` / `OPENAI_API_KEY` — service credentials
//! - `MOODLIFT_RESPONSE_FORMAT` — "text" (default) or "json" for advice replies
//! - `MOODLIFT_CATALOG` — YAML file replacing the built-in personas and shortcuts
//! - `RUST_LOG` — Tracing filter (default: "warn,moodlift=info")
//!
//! # Usage
//!
//! ```bash
//! moodlift advice --persona Coach --mood tired --feeling energized --json
//! moodlift chat --persona Friend --mood stressed
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use moodlift::catalog::{DesiredFeeling, Mood, PersonaCatalog};
use moodlift::config::EngineConfig;
use moodlift::export::{DocumentExporter, TextFileExporter};
use moodlift::history::ConversationHistory;
use moodlift::llms::build_generator;
use moodlift::pipeline::{ResponsePipeline, SuggestionRequest};
use moodlift::prompt::ResponseFormat;
use moodlift::response::GenerationResult;
use moodlift::utilities::printer::{Printer, PrinterColor};

#[derive(Parser)]
#[command(name = "moodlift", version)]
#[command(about = "Persona-driven mood support in your terminal")]
struct Cli {
    /// YAML catalog file replacing the built-in personas and shortcuts
    #[arg(long, global = true, env = "MOODLIFT_CATALOG")]
    catalog: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List personas and their tones
    Personas,
    /// List mood and desired-feeling labels
    Moods,
    /// Get a one-shot suggestion for your mood
    Advice(AdviceArgs),
    /// Talk with a persona
    Chat(MoodArgs),
}

#[derive(Args)]
struct MoodArgs {
    /// Persona name (see `moodlift personas`)
    #[arg(long, short)]
    persona: String,

    /// How you feel right now
    #[arg(long, short, value_parser = parse_mood)]
    mood: Mood,

    /// How you would like to feel
    #[arg(long, short, value_parser = parse_feeling)]
    feeling: Option<DesiredFeeling>,
}

#[derive(Args)]
struct AdviceArgs {
    #[command(flatten)]
    mood: MoodArgs,

    /// Ask for a structured reply (suggestion, message, joke)
    #[arg(long)]
    json: bool,

    /// Save the advice as a Markdown file
    #[arg(long)]
    export: bool,

    /// Use built-in advice without calling the service
    #[arg(long)]
    offline: bool,
}

fn parse_mood(s: &str) -> std::result::Result<Mood, String> {
    Mood::resolve(s).map_err(|_| {
        let labels: Vec<&str> = Mood::ALL.iter().map(|m| m.label()).collect();
        format!("unknown mood '{}'; choose one of: {}", s, labels.join(", "))
    })
}

fn parse_feeling(s: &str) -> std::result::Result<DesiredFeeling, String> {
    DesiredFeeling::resolve(s).map_err(|_| {
        let labels: Vec<&str> = DesiredFeeling::ALL.iter().map(|f| f.label()).collect();
        format!("unknown feeling '{}'; choose one of: {}", s, labels.join(", "))
    })
}

/// Commands recognized inside the chat loop.
#[derive(Debug, PartialEq, Eq)]
enum ReplInput<'a> {
    History,
    Reset,
    Quit,
    Skip,
    Message(&'a str),
}

impl<'a> ReplInput<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "" => ReplInput::Skip,
            "/history" => ReplInput::History,
            "/reset" => ReplInput::Reset,
            "/quit" | "/exit" => ReplInput::Quit,
            message => ReplInput::Message(message),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,moodlift=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let printer = Printer::new(cli.plain);

    let mut config = EngineConfig::from_env().context("invalid configuration")?;
    if cli.catalog.is_some() {
        config.catalog_path = cli.catalog;
    }
    let (personas, shortcuts) = config.load_catalogs()?;

    match cli.command {
        Command::Personas => {
            for persona in personas.iter() {
                printer.turn(&persona.name, &persona.tone, PrinterColor::BoldMagenta);
            }
        }
        Command::Moods => {
            let moods: Vec<&str> = Mood::ALL.iter().map(|m| m.label()).collect();
            let feelings: Vec<&str> = DesiredFeeling::ALL.iter().map(|f| f.label()).collect();
            printer.section("Moods", &moods.join(", "));
            printer.section("Desired feelings", &feelings.join(", "));
        }
        Command::Advice(args) => {
            check_persona(&personas, &args.mood.persona)?;
            let result = if args.offline {
                GenerationResult::StructuredAdvice(args.mood.mood.local_advice())
            } else {
                let format = if args.json {
                    ResponseFormat::Json
                } else {
                    config.response_format
                };
                let pipeline = ResponsePipeline::new(build_generator(&config.generation))
                    .with_personas(personas)
                    .with_shortcuts(shortcuts)
                    .with_advice_format(format);
                let mut request = SuggestionRequest::advice(args.mood.persona, args.mood.mood);
                request.desired_feeling = args.mood.feeling;
                pipeline
                    .get_suggestion(&mut ConversationHistory::new(), &request)?
                    .result
            };

            print_result(&printer, &result);

            if args.export {
                if result.is_failure() {
                    printer.notice("Nothing to export.");
                } else {
                    let exporter = TextFileExporter::new(&config.export_dir);
                    let path = exporter.export(&result.display_text())?;
                    printer.notice(&format!("Saved to {}", path.display()));
                }
            }
        }
        Command::Chat(args) => {
            check_persona(&personas, &args.persona)?;
            let pipeline = ResponsePipeline::new(build_generator(&config.generation))
                .with_personas(personas)
                .with_shortcuts(shortcuts);
            run_chat(&printer, &pipeline, args)?;
        }
    }

    Ok(())
}

fn check_persona(personas: &PersonaCatalog, name: &str) -> Result<()> {
    personas.resolve(name).with_context(|| {
        format!(
            "available personas: {}",
            personas.names().collect::<Vec<_>>().join(", ")
        )
    })?;
    Ok(())
}

fn print_result(printer: &Printer, result: &GenerationResult) {
    match result {
        GenerationResult::StructuredAdvice(advice) => {
            printer.section("Your Suggestion", &advice.suggestion);
            printer.section("Motivational Message", &advice.motivational_message);
            if let Some(joke) = &advice.joke {
                printer.section("A Little Joke", joke);
            }
        }
        GenerationResult::PlainText { text } => printer.print(text, PrinterColor::Green),
        GenerationResult::Failure { .. } => printer.notice(&result.display_text()),
    }
}

fn run_chat(printer: &Printer, pipeline: &ResponsePipeline, args: MoodArgs) -> Result<()> {
    let mut history = ConversationHistory::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    printer.notice(&format!(
        "Chatting with {}. Commands: /history, /reset, /quit",
        args.persona
    ));

    loop {
        print!("{} ", printer.paint("You:", PrinterColor::BoldGreen));
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;

        match ReplInput::parse(&line) {
            ReplInput::Skip => continue,
            ReplInput::Quit => break,
            ReplInput::Reset => {
                history.clear();
                printer.notice("Conversation cleared.");
            }
            ReplInput::History => {
                if history.is_empty() {
                    printer.notice("(no messages yet)");
                }
                for turn in history.snapshot() {
                    let color = if turn.speaker.is_user() {
                        PrinterColor::BoldGreen
                    } else {
                        PrinterColor::BoldMagenta
                    };
                    printer.turn(&turn.speaker.to_string(), &turn.text, color);
                }
            }
            ReplInput::Message(message) => {
                let mut request = SuggestionRequest::chat(args.persona.as_str(), args.mood, message);
                request.desired_feeling = args.feeling;
                let suggestion = pipeline.get_suggestion(&mut history, &request)?;
                let speaker = history
                    .last()
                    .map(|turn| turn.speaker.to_string())
                    .unwrap_or_else(|| args.persona.clone());
                printer.turn(&speaker, &suggestion.text(), PrinterColor::BoldMagenta);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repl_input_parse() {
        assert_eq!(ReplInput::parse("  /history "), ReplInput::History);
        assert_eq!(ReplInput::parse("/reset"), ReplInput::Reset);
        assert_eq!(ReplInput::parse("/exit"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("   "), ReplInput::Skip);
        assert_eq!(ReplInput::parse(" hi there "), ReplInput::Message("hi there"));
    }

    #[test]
    fn test_cli_parses_advice() {
        let cli = Cli::try_parse_from([
            "moodlift", "advice", "--persona", "Coach", "--mood", "tired", "--feeling", "energized", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Advice(args) => {
                assert_eq!(args.mood.mood, Mood::Tired);
                assert_eq!(args.mood.feeling, Some(DesiredFeeling::Energized));
                assert!(args.json);
                assert!(!args.offline);
            }
            _ => panic!("expected advice"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mood() {
        let err = Cli::try_parse_from(["moodlift", "chat", "--persona", "Friend", "--mood", "hangry"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("choose one of"));
    }
}

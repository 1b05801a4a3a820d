//! # moodlift
//!
//! A persona-driven response engine for mood support. Given a persona, the
//! user's current mood, an optional desired feeling and (in chat mode) the
//! latest message, it either answers from a table of canned small-talk
//! replies or composes a prompt, makes one call to a generation service and
//! normalizes the reply into a [`GenerationResult`].
//!
//! ```ignore
//! use moodlift::{ConversationHistory, ResponsePipeline, SuggestionRequest};
//! use moodlift::catalog::Mood;
//!
//! let config = moodlift::config::EngineConfig::from_env()?;
//! let pipeline = ResponsePipeline::new(moodlift::llms::build_generator(&config.generation));
//! let mut history = ConversationHistory::new();
//! let suggestion = pipeline.get_suggestion(
//!     &mut history,
//!     &SuggestionRequest::chat("Friend", Mood::Stressed, "I had a rough day"),
//! )?;
//! println!("{}", suggestion.text());
//! ```

pub mod catalog;
pub mod config;
pub mod export;
pub mod history;
pub mod llms;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod shortcut;
pub mod types;
pub mod utilities;

pub use history::{ConversationHistory, ConversationTurn, Speaker};
pub use llms::base_llm::TextGenerator;
pub use pipeline::{PipelineState, ResponsePipeline, Suggestion, SuggestionRequest};
pub use response::{GenerationResult, StructuredAdvice};

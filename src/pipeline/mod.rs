//! Response pipeline.
//!
//! The single entry point into the engine. One invocation walks
//! `Idle -> ShortcutCheck -> {ShortcutHit, Composing} -> Generating ->
//! {Parsing, Failed} -> Done`, issuing at most one outbound generation call.
//!
//! Transport and parse failures never escape: they are folded into a
//! [`GenerationResult`] so callers only branch on the result variant. In chat
//! mode every invocation leaves the history with a user turn immediately
//! followed by the persona turn answering it, failures included.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{DesiredFeeling, Mood, PersonaCatalog};
use crate::history::{ConversationHistory, ConversationTurn};
use crate::llms::TextGenerator;
use crate::prompt::{PromptComposer, PromptMode, PromptRequest, ResponseFormat};
use crate::response::{interpret, normalize_text, FailureReason, GenerationResult};
use crate::shortcut::ShortcutTable;
use crate::types::usage_metrics::UsageMetrics;
use crate::utilities::errors::CatalogError;
use crate::utilities::string_utils::{non_blank, preview};

/// States visited by one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineState {
    Idle,
    ShortcutCheck,
    ShortcutHit,
    Composing,
    Generating,
    Parsing,
    Failed,
    Done,
}

/// Caller input for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRequest {
    /// Persona name, resolved against the pipeline's catalog.
    pub persona: String,
    pub mood: Mood,
    pub desired_feeling: Option<DesiredFeeling>,
    /// Latest user message. Present (and non-blank) selects chat mode.
    pub utterance: Option<String>,
}

impl SuggestionRequest {
    pub fn advice(persona: impl Into<String>, mood: Mood) -> Self {
        Self {
            persona: persona.into(),
            mood,
            desired_feeling: None,
            utterance: None,
        }
    }

    pub fn chat(persona: impl Into<String>, mood: Mood, utterance: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            mood,
            desired_feeling: None,
            utterance: Some(utterance.into()),
        }
    }

    pub fn with_feeling(mut self, feeling: DesiredFeeling) -> Self {
        self.desired_feeling = Some(feeling);
        self
    }

    /// The utterance, trimmed, if it selects chat mode.
    pub fn chat_utterance(&self) -> Option<&str> {
        self.utterance.as_deref().and_then(non_blank)
    }

    pub fn mode(&self) -> PromptMode {
        if self.chat_utterance().is_some() {
            PromptMode::Chat
        } else {
            PromptMode::Advice
        }
    }
}

/// Outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub result: GenerationResult,
    /// State transitions in the order visited.
    pub states: Vec<PipelineState>,
    /// Token usage of the generation call, when the provider reported it.
    pub usage: Option<UsageMetrics>,
}

impl Suggestion {
    /// True when a canned shortcut reply answered the request.
    pub fn is_shortcut(&self) -> bool {
        self.states.contains(&PipelineState::ShortcutHit)
    }

    /// User-facing text for the result.
    pub fn text(&self) -> String {
        self.result.display_text()
    }
}

/// Orchestrates shortcut lookup, composition, generation and normalization.
#[derive(Debug)]
pub struct ResponsePipeline {
    personas: PersonaCatalog,
    shortcuts: ShortcutTable,
    composer: PromptComposer,
    generator: Box<dyn TextGenerator>,
}

impl ResponsePipeline {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self {
            personas: PersonaCatalog::builtin(),
            shortcuts: ShortcutTable::builtin(),
            composer: PromptComposer::default(),
            generator,
        }
    }

    pub fn with_personas(mut self, personas: PersonaCatalog) -> Self {
        self.personas = personas;
        self
    }

    pub fn with_shortcuts(mut self, shortcuts: ShortcutTable) -> Self {
        self.shortcuts = shortcuts;
        self
    }

    /// Reply shape requested in advice mode.
    pub fn with_advice_format(mut self, format: ResponseFormat) -> Self {
        self.composer = PromptComposer::new(format);
        self
    }

    pub fn personas(&self) -> &PersonaCatalog {
        &self.personas
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Run one invocation.
    ///
    /// Chat mode reads and appends to `history`; advice mode leaves it
    /// untouched. Only an unknown persona is reported as an error, before
    /// any state changes.
    pub fn get_suggestion(
        &self,
        history: &mut ConversationHistory,
        request: &SuggestionRequest,
    ) -> Result<Suggestion, CatalogError> {
        let persona = self.personas.resolve(&request.persona)?;
        let mode = request.mode();
        info!(
            persona = %persona.name,
            mood = %request.mood,
            desired_feeling = ?request.desired_feeling,
            mode = ?mode,
            "handling suggestion request"
        );

        let mut states = vec![PipelineState::Idle];

        let prompt = match request.chat_utterance() {
            Some(utterance) => {
                debug!(utterance = %preview(utterance), turns = history.len(), "chat turn");
                states.push(PipelineState::ShortcutCheck);
                if let Some(reply) = self.shortcuts.match_utterance(utterance) {
                    debug!(persona = %persona.name, "shortcut hit, skipping generation");
                    states.push(PipelineState::ShortcutHit);
                    history.append(ConversationTurn::user(utterance));
                    history.append(ConversationTurn::persona(persona.name.clone(), reply));
                    states.push(PipelineState::Done);
                    return Ok(Suggestion {
                        result: GenerationResult::plain(reply),
                        states,
                        usage: None,
                    });
                }

                states.push(PipelineState::Composing);
                let prompt = self.composer.compose_chat(
                    &PromptRequest {
                        persona,
                        mood: request.mood,
                        desired_feeling: request.desired_feeling,
                        history: history.snapshot(),
                        utterance: Some(utterance),
                    },
                    utterance,
                );
                history.append(ConversationTurn::user(utterance));
                prompt
            }
            None => {
                states.push(PipelineState::Composing);
                self.composer.compose_advice(&PromptRequest {
                    persona,
                    mood: request.mood,
                    desired_feeling: request.desired_feeling,
                    history: &[],
                    utterance: None,
                })
            }
        };

        debug!(prompt_chars = prompt.chars().count(), "prompt composed");
        states.push(PipelineState::Generating);

        let structured = mode == PromptMode::Advice && self.composer.advice_format == ResponseFormat::Json;
        let mut usage = None;
        let generated = self.generator.generate(&prompt).and_then(|generation| {
            usage = generation.usage;
            normalize_text(&generation.text)
        });

        let result = match generated {
            Ok(text) => {
                states.push(PipelineState::Parsing);
                interpret(&text, structured)
            }
            Err(err) => {
                warn!(
                    provider = self.generator.provider(),
                    error = %err,
                    "generation failed, returning fallback message"
                );
                states.push(PipelineState::Failed);
                GenerationResult::failure(FailureReason::from(&err))
            }
        };

        if let Some(usage) = usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "generation usage"
            );
        }

        if mode == PromptMode::Chat {
            history.append(ConversationTurn::persona(
                persona.name.clone(),
                result.display_text(),
            ));
        }
        states.push(PipelineState::Done);

        Ok(Suggestion {
            result,
            states,
            usage,
        })
    }
}

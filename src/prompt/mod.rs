//! Prompt composer.
//!
//! Builds the single outbound instruction string sent to the generation
//! service. Two modes:
//!
//! - **Advice** (no running dialogue): persona tone, mood, desired feeling
//!   and a directive asking for either free text or a fixed-key JSON object.
//! - **Chat** (running dialogue): persona tone, mood context, the *entire*
//!   transcript so far, the latest utterance and a trailing reply cue.
//!
//! Composition is a pure function of its inputs and never touches history.
//! Chat prompts grow linearly with the conversation; no window is applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{DesiredFeeling, Mood, Persona};
use crate::history::{render_transcript, ConversationTurn};
use crate::response::{JOKE_KEY, MOTIVATIONAL_MESSAGE_KEY, SUGGESTION_KEY};

/// Shape requested for advice-mode replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// A JSON object with the fixed advice keys.
    Json,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Text => write!(f, "text"),
            ResponseFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "plain" => Ok(ResponseFormat::Text),
            "json" => Ok(ResponseFormat::Json),
            other => Err(format!("unknown response format '{}'", other)),
        }
    }
}

/// Which composition mode a request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    Advice,
    Chat,
}

/// Inputs for one composition. Built fresh per pipeline invocation.
#[derive(Debug, Clone, Copy)]
pub struct PromptRequest<'a> {
    pub persona: &'a Persona,
    pub mood: Mood,
    pub desired_feeling: Option<DesiredFeeling>,
    /// History snapshot, excluding the latest utterance.
    pub history: &'a [ConversationTurn],
    pub utterance: Option<&'a str>,
}

impl PromptRequest<'_> {
    /// Chat mode when an utterance is present, advice mode otherwise.
    pub fn mode(&self) -> PromptMode {
        if self.utterance.is_some() {
            PromptMode::Chat
        } else {
            PromptMode::Advice
        }
    }
}

/// Composes outbound instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer {
    /// Reply shape requested in advice mode. Chat mode is always text.
    pub advice_format: ResponseFormat,
}

impl PromptComposer {
    pub fn new(advice_format: ResponseFormat) -> Self {
        Self { advice_format }
    }

    pub fn compose(&self, request: &PromptRequest<'_>) -> String {
        match request.utterance {
            Some(utterance) => self.compose_chat(request, utterance),
            None => self.compose_advice(request),
        }
    }

    /// Advice mode: a one-shot suggestion for the current mood.
    pub fn compose_advice(&self, request: &PromptRequest<'_>) -> String {
        let mut prompt = String::new();
        prompt.push_str(&persona_preamble(request.persona));
        prompt.push_str(&mood_line(request.mood, request.desired_feeling));
        prompt.push('\n');

        let goal = match request.desired_feeling {
            Some(feeling) => format!("help them feel {}", feeling),
            None => "lift their mood".to_string(),
        };
        prompt.push_str(&format!(
            "Offer one short, practical suggestion that could {}, a brief motivational message, \
             and a light-hearted joke if it suits their mood.\n",
            goal
        ));

        match self.advice_format {
            ResponseFormat::Text => {
                prompt.push_str("Keep the whole reply warm, supportive and under 150 words.");
            }
            ResponseFormat::Json => {
                prompt.push_str(&format!(
                    "Respond ONLY with a JSON object using exactly these keys:\n\
                     {{\"{s}\": \"<one practical suggestion>\", \
                     \"{m}\": \"<a short motivational message>\", \
                     \"{j}\": \"<a light-hearted joke, or an empty string>\"}}\n\
                     Do not wrap the object in Markdown code fences and do not add any text outside it.",
                    s = SUGGESTION_KEY,
                    m = MOTIVATIONAL_MESSAGE_KEY,
                    j = JOKE_KEY,
                ));
            }
        }
        prompt
    }

    /// Chat mode: the full dialogue so far plus the latest utterance.
    pub fn compose_chat(&self, request: &PromptRequest<'_>, utterance: &str) -> String {
        let persona = request.persona;
        let transcript = if request.history.is_empty() {
            "(no previous messages)".to_string()
        } else {
            render_transcript(request.history)
        };

        format!(
            "{preamble}Stay in character and reply to the user's latest message with empathy \
             and practical support. Reply with your message only.\n\
             {mood}\n\
             Conversation so far:\n\
             {transcript}\n\n\
             User: {utterance}\n\
             {name}:",
            preamble = persona_preamble(persona),
            mood = mood_line(request.mood, request.desired_feeling),
            transcript = transcript,
            utterance = utterance,
            name = persona.name,
        )
    }
}

fn persona_preamble(persona: &Persona) -> String {
    format!("You are {}, {}.\n", persona.name, persona.tone)
}

fn mood_line(mood: Mood, desired: Option<DesiredFeeling>) -> String {
    match desired {
        Some(feeling) => format!(
            "The user is currently feeling {} and would like to feel {}.\n",
            mood, feeling
        ),
        None => format!("The user is currently feeling {}.\n", mood),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PersonaCatalog;

    fn friend() -> Persona {
        PersonaCatalog::builtin().resolve("Friend").unwrap().clone()
    }

    #[test]
    fn test_advice_text_prompt_contents() {
        let persona = friend();
        let request = PromptRequest {
            persona: &persona,
            mood: Mood::Stressed,
            desired_feeling: Some(DesiredFeeling::Relaxed),
            history: &[],
            utterance: None,
        };
        assert_eq!(request.mode(), PromptMode::Advice);
        let prompt = PromptComposer::default().compose(&request);
        assert!(prompt.contains(&persona.tone));
        assert!(prompt.contains("Stressed"));
        assert!(prompt.contains("Relaxed"));
        assert!(!prompt.contains(SUGGESTION_KEY));
    }

    #[test]
    fn test_advice_json_prompt_names_every_key() {
        let persona = friend();
        let request = PromptRequest {
            persona: &persona,
            mood: Mood::Sad,
            desired_feeling: None,
            history: &[],
            utterance: None,
        };
        let prompt = PromptComposer::new(ResponseFormat::Json).compose(&request);
        for key in ["\"suggestion\"", "\"motivational_message\"", "\"joke\""] {
            assert!(prompt.contains(key), "missing {} in prompt", key);
        }
        assert!(prompt.contains("lift their mood"));
        assert!(!prompt.contains("would like to feel"));
    }

    #[test]
    fn test_chat_prompt_includes_full_transcript_in_order() {
        let persona = friend();
        let history: Vec<ConversationTurn> = (0..30)
            .flat_map(|i| {
                vec![
                    ConversationTurn::user(format!("user message {}", i)),
                    ConversationTurn::persona("Friend", format!("friend reply {}", i)),
                ]
            })
            .collect();
        let request = PromptRequest {
            persona: &persona,
            mood: Mood::Lonely,
            desired_feeling: Some(DesiredFeeling::Loved),
            history: &history,
            utterance: Some("still there?"),
        };
        assert_eq!(request.mode(), PromptMode::Chat);
        let prompt = PromptComposer::default().compose(&request);

        let mut cursor = 0;
        for turn in &history {
            let line = turn.transcript_line();
            let pos = prompt[cursor..]
                .find(&line)
                .unwrap_or_else(|| panic!("missing or out of order: {}", line));
            cursor += pos + line.len();
        }
        assert!(prompt.contains("Lonely"));
        assert!(prompt.contains("Loved"));
        assert!(prompt.ends_with("User: still there?\nFriend:"));
    }

    #[test]
    fn test_chat_prompt_with_empty_history() {
        let persona = friend();
        let request = PromptRequest {
            persona: &persona,
            mood: Mood::Stressed,
            desired_feeling: Some(DesiredFeeling::Relaxed),
            history: &[],
            utterance: Some("I had a rough day"),
        };
        let prompt = PromptComposer::default().compose(&request);
        assert!(prompt.contains("(no previous messages)"));
        assert!(prompt.contains("I had a rough day"));
        assert!(prompt.contains("Stressed"));
        assert!(prompt.contains("Relaxed"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let persona = friend();
        let history = vec![ConversationTurn::user("hey"), ConversationTurn::persona("Friend", "yo")];
        let request = PromptRequest {
            persona: &persona,
            mood: Mood::Bored,
            desired_feeling: None,
            history: &history,
            utterance: Some("entertain me"),
        };
        let composer = PromptComposer::new(ResponseFormat::Json);
        assert_eq!(composer.compose(&request), composer.compose(&request));

        let advice = PromptRequest { utterance: None, ..request };
        assert_eq!(composer.compose(&advice), composer.compose(&advice));
    }

    #[test]
    fn test_response_format_parse() {
        assert_eq!("JSON".parse::<ResponseFormat>().unwrap(), ResponseFormat::Json);
        assert_eq!("plain".parse::<ResponseFormat>().unwrap(), ResponseFormat::Text);
        assert!("xml".parse::<ResponseFormat>().is_err());
    }
}

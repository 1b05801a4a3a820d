//! Text generation provider implementations.
//!
//! Each provider implements
//! [`TextGenerator`](crate::llms::base_llm::TextGenerator) and handles its own
//! authentication, request formatting and error mapping.
//!
//! | Provider | Module | Key variables |
//! |----------|--------|---------------|
//! | Google Gemini | [`gemini`] | `GOOGLE_API_KEY`, `GEMINI_API_KEY` |
//! | OpenAI | [`openai`] | `OPENAI_API_KEY` |

pub mod gemini;
pub mod openai;

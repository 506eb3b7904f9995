//! # Card Generation Client
//!
//! Turns a [`GenerationRequest`] into candidate cards by asking a [`Backend`].
//!
//! The backend is an opaque text-in, text-out function: it receives a
//! [`Prompt`] and returns whatever the model wrote. Everything around that call
//! is here:
//!
//! - building a deterministic prompt from the request ([`prompt`])
//! - calling the backend once, retrying a single time after a transient failure
//! - mapping the reply onto [`CandidateCard`]s ([`response`])
//!
//! ## Backends
//!
//! - [`openai::OpenAiBackend`]: OpenAI-compatible chat-completions endpoint.
//! - [`demo::DemoBackend`]: offline canned cards, for trying the tool without a
//!   key and for end-to-end tests.
//!
//! Tests in the rest of the crate use scripted backends that return fixed
//! replies, so nothing here needs network access to be exercised.

use crate::config::FlashgenConfig;
use crate::error::{FlashError, Result};
use crate::model::{Difficulty, Flashcard, GenerationRequest};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod demo;
pub mod openai;
pub mod prompt;
pub mod response;

pub use response::CandidateCard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    Flashcards,
    Enhance { front: String, back: String },
    Ping,
}

/// Everything a backend needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub system: String,
    pub user: String,
    pub subject: String,
    pub level: Option<Difficulty>,
    pub count: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Timeouts, connection resets, rate limits, 5xx responses.
    Transient,
    Auth,
    Quota,
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl BackendFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transient, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Fatal, message)
    }

    pub fn is_transient(&self) -> bool {
        self.kind == FailureKind::Transient
    }
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<BackendFailure> for FlashError {
    fn from(failure: BackendFailure) -> Self {
        FlashError::Backend(failure.message)
    }
}

/// The text-generation service, seen as a single blocking call.
pub trait Backend {
    /// Short name for logs and messages.
    fn name(&self) -> &str;

    fn complete(&self, prompt: &Prompt) -> std::result::Result<String, BackendFailure>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn complete(&self, prompt: &Prompt) -> std::result::Result<String, BackendFailure> {
        (**self).complete(prompt)
    }
}

/// Placeholder for a backend that could not be set up (e.g. a missing API
/// key). Commands that never call the backend still work; the rest fail with
/// the original reason.
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Backend for UnavailableBackend {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn complete(&self, _prompt: &Prompt) -> std::result::Result<String, BackendFailure> {
        Err(BackendFailure::new(FailureKind::Auth, self.reason.clone()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub retry_delay: Duration,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 3000,
            retry_delay: Duration::from_secs(2),
        }
    }
}

impl From<&FlashgenConfig> for GeneratorSettings {
    fn from(config: &FlashgenConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            ..Default::default()
        }
    }
}

pub struct CardGenerator<B: Backend> {
    backend: B,
    settings: GeneratorSettings,
}

impl<B: Backend> CardGenerator<B> {
    pub fn new(backend: B, settings: GeneratorSettings) -> Self {
        Self { backend, settings }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Asks the backend for cards and parses its reply.
    ///
    /// Fails with [`FlashError::Backend`] when the call fails (after at most one
    /// retry) and [`FlashError::Parse`] when the reply has no usable card list.
    pub fn generate(&self, request: &GenerationRequest) -> Result<Vec<CandidateCard>> {
        let prompt = prompt::flashcard_prompt(request, &self.settings);
        debug!(
            backend = self.backend.name(),
            prompt_chars = prompt.user.len(),
            count = request.count,
            "requesting flashcards"
        );

        let text = self.call(&prompt)?;
        let candidates = response::parse_candidates(&text)?;
        info!(candidates = candidates.len(), "backend returned candidates");
        Ok(candidates)
    }

    /// Asks the backend to rewrite one card. Fields the reply leaves out keep
    /// their current text.
    pub fn enhance(&self, card: &Flashcard) -> Result<(String, String)> {
        let prompt = prompt::enhance_prompt(card, &self.settings);
        let text = self.call(&prompt)?;
        let (front, back) = response::parse_enhancement(&text)?;
        Ok((
            front
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| card.front.clone()),
            back.filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| card.back.clone()),
        ))
    }

    /// Makes the smallest possible call to confirm the backend is reachable.
    pub fn check(&self) -> Result<()> {
        self.backend
            .complete(&prompt::ping_prompt())
            .map(|_| ())
            .map_err(FlashError::from)
    }

    fn call(&self, prompt: &Prompt) -> Result<String> {
        match self.backend.complete(prompt) {
            Ok(text) => Ok(text),
            Err(failure) if failure.is_transient() => {
                warn!(
                    backend = self.backend.name(),
                    error = %failure,
                    "transient backend failure, retrying once"
                );
                std::thread::sleep(self.settings.retry_delay);
                self.backend.complete(prompt).map_err(FlashError::from)
            }
            Err(failure) => Err(failure.into()),
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub mod testing {
    //! Backend doubles with scripted replies.

    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays queued results in order and records every prompt it sees.
    #[derive(Default)]
    pub struct ScriptedBackend {
        replies: RefCell<VecDeque<std::result::Result<String, BackendFailure>>>,
        prompts: RefCell<Vec<Prompt>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: impl Into<String>) -> Self {
            self.replies.borrow_mut().push_back(Ok(text.into()));
            self
        }

        pub fn fail(self, failure: BackendFailure) -> Self {
            self.replies.borrow_mut().push_back(Err(failure));
            self
        }

        pub fn calls(&self) -> usize {
            self.prompts.borrow().len()
        }

        pub fn prompts(&self) -> Vec<Prompt> {
            self.prompts.borrow().clone()
        }
    }

    impl Backend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete(&self, prompt: &Prompt) -> std::result::Result<String, BackendFailure> {
            self.prompts.borrow_mut().push(prompt.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(BackendFailure::fatal("no scripted reply left")))
        }
    }

    /// JSON reply with `n` distinct, valid cards.
    pub fn cards_json(n: usize) -> String {
        let cards: Vec<serde_json::Value> = (1..=n)
            .map(|i| {
                serde_json::json!({
                    "question": format!("What is concept number {}?", i),
                    "answer": format!("Concept number {} is explained here.", i),
                    "difficulty": "medium",
                    "topic": "Concepts",
                })
            })
            .collect();
        serde_json::json!({ "flashcards": cards }).to_string()
    }

    pub fn instant_settings() -> GeneratorSettings {
        GeneratorSettings {
            retry_delay: Duration::ZERO,
            ..Default::default()
        }
    }
}

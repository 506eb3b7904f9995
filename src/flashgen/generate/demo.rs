//! Offline backend that answers from canned cards.
//!
//! The content of the request is ignored; cards are picked by subject and
//! cycled, with a variation marker so repeated templates stay distinct.

use super::{Backend, BackendFailure, Prompt, PromptKind};
use serde_json::json;

struct Template {
    question: &'static str,
    answer: &'static str,
    difficulty: &'static str,
    topic: &'static str,
}

const BIOLOGY: &[Template] = &[
    Template {
        question: "What is photosynthesis?",
        answer: "The process by which plants use chlorophyll to turn light energy into chemical energy.",
        difficulty: "easy",
        topic: "Plant Biology",
    },
    Template {
        question: "What is the function of mitochondria?",
        answer: "Mitochondria produce ATP through cellular respiration, powering the cell.",
        difficulty: "medium",
        topic: "Cell Biology",
    },
    Template {
        question: "What is DNA?",
        answer: "Deoxyribonucleic acid, the hereditary molecule carrying genetic instructions.",
        difficulty: "medium",
        topic: "Genetics",
    },
];

const CHEMISTRY: &[Template] = &[
    Template {
        question: "What is the periodic table?",
        answer: "A table of chemical elements ordered by atomic number and electron configuration.",
        difficulty: "easy",
        topic: "Elements",
    },
    Template {
        question: "What is a covalent bond?",
        answer: "A chemical bond formed when two atoms share a pair of electrons.",
        difficulty: "medium",
        topic: "Chemical Bonding",
    },
    Template {
        question: "What does pH measure?",
        answer: "How acidic or alkaline a solution is, on a scale from 0 to 14.",
        difficulty: "medium",
        topic: "Acids and Bases",
    },
];

const PHYSICS: &[Template] = &[
    Template {
        question: "What is Newton's first law?",
        answer: "A body stays at rest or in uniform motion unless an external force acts on it.",
        difficulty: "medium",
        topic: "Classical Mechanics",
    },
    Template {
        question: "What is the speed of light in a vacuum?",
        answer: "About 299,792,458 metres per second.",
        difficulty: "easy",
        topic: "Optics",
    },
    Template {
        question: "What is energy?",
        answer: "The capacity to do work, found in kinetic, potential, thermal and other forms.",
        difficulty: "easy",
        topic: "Energy",
    },
];

const GENERAL: &[Template] = &[
    Template {
        question: "What is the main topic of this material?",
        answer: "The material covers the fundamental concepts of its subject area.",
        difficulty: "easy",
        topic: "Overview",
    },
    Template {
        question: "Which key concepts does the material introduce?",
        answer: "It introduces the core principles and definitions needed to follow the subject.",
        difficulty: "medium",
        topic: "Key Concepts",
    },
    Template {
        question: "How can this knowledge be applied?",
        answer: "The concepts are a foundation for further study and for practical work in the field.",
        difficulty: "medium",
        topic: "Application",
    },
];

fn templates_for(subject: &str) -> &'static [Template] {
    match subject.trim().to_lowercase().as_str() {
        "biology" => BIOLOGY,
        "chemistry" => CHEMISTRY,
        "physics" => PHYSICS,
        _ => GENERAL,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DemoBackend;

impl DemoBackend {
    pub fn new() -> Self {
        Self
    }

    fn flashcards(&self, prompt: &Prompt) -> String {
        let templates = templates_for(&prompt.subject);
        let cards: Vec<serde_json::Value> = (0..prompt.count)
            .map(|i| {
                let template = &templates[i % templates.len()];
                let round = i / templates.len();
                let (question, answer) = if round == 0 {
                    (template.question.to_string(), template.answer.to_string())
                } else {
                    (
                        format!("[Variation {}] {}", round + 1, template.question),
                        format!("{} (variation {})", template.answer, round + 1),
                    )
                };
                let difficulty = prompt
                    .level
                    .map(|d| d.as_str())
                    .unwrap_or(template.difficulty);
                json!({
                    "question": question,
                    "answer": answer,
                    "difficulty": difficulty,
                    "topic": template.topic,
                })
            })
            .collect();
        json!({ "flashcards": cards }).to_string()
    }
}

impl Backend for DemoBackend {
    fn name(&self) -> &str {
        "demo"
    }

    fn complete(&self, prompt: &Prompt) -> Result<String, BackendFailure> {
        let reply = match &prompt.kind {
            PromptKind::Flashcards => self.flashcards(prompt),
            PromptKind::Enhance { front, back } => json!({
                "enhanced_question": front,
                "enhanced_answer": back,
            })
            .to_string(),
            PromptKind::Ping => "ok".to_string(),
        };
        Ok(reply)
    }
}

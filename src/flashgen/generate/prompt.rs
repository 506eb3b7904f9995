use super::{GeneratorSettings, Prompt, PromptKind};
use crate::model::{level_label, Difficulty, Flashcard, GenerationRequest};

const FLASHCARD_SYSTEM: &str = "You are an expert educational content creator who writes \
high-quality flashcards for learning and long-term retention.";

const EDITOR_SYSTEM: &str =
    "You are an expert educational content editor who improves learning materials.";

fn difficulty_instructions(level: Option<Difficulty>) -> &'static str {
    match level {
        Some(Difficulty::Easy) => {
            "Focus on basic concepts, definitions, and simple recall questions."
        }
        Some(Difficulty::Medium) => {
            "Include application-based questions and concepts of moderate complexity."
        }
        Some(Difficulty::Hard) => {
            "Write analytical, synthesis, and evaluation questions that need deep understanding."
        }
        None => "Mix difficulty levels, from basic recall up to analytical thinking.",
    }
}

fn subject_guidance(subject: &str) -> &'static str {
    match subject.trim().to_lowercase().as_str() {
        "biology" => "Focus on biological processes, organisms, anatomy, and scientific principles.",
        "chemistry" => "Emphasize reactions, formulas, the periodic table, and laboratory concepts.",
        "physics" => "Concentrate on laws, formulas, phenomena, and problem-solving concepts.",
        "history" => "Include dates, events, causes and effects, and historical significance.",
        "literature" => "Focus on themes, characters, literary devices, and analysis.",
        "mathematics" | "math" => {
            "Include formulas, theorems, problem-solving steps, and mathematical concepts."
        }
        "computer science" => {
            "Emphasize algorithms, data structures, programming concepts, and technical definitions."
        }
        "psychology" => "Focus on theories, terminology, research methods, and phenomena.",
        "economics" => "Include economic principles, theories, market concepts, and terminology.",
        _ => "Write well-rounded questions covering the key concepts and important facts.",
    }
}

/// Builds the generation prompt for a request.
///
/// The output depends only on the request fields and settings, so the same
/// request always produces the same prompt text.
pub fn flashcard_prompt(request: &GenerationRequest, settings: &GeneratorSettings) -> Prompt {
    let count = request.count;
    let user = format!(
        "Create {count} high-quality educational flashcards from the content below.

SUBJECT: {subject}
DIFFICULTY LEVEL: {level}
INSTRUCTIONS: {instructions}
SUBJECT GUIDANCE: {guidance}

CONTENT:
{content}

REQUIREMENTS:
1. Generate exactly {count} flashcards.
2. Each card has one clear, specific question and a complete answer.
3. Questions test understanding, not only memorization.
4. Answers are self-contained and never refer to \"the text above\".
5. Cover the most important concepts and keep every fact accurate.
6. Vary the question types (definition, application, analysis, comparison).
7. Spread the questions across the different sections of the content.

RESPONSE FORMAT:
Reply with a JSON object holding a \"flashcards\" array. Every element has:
- \"question\": the question text
- \"answer\": the answer text
- \"difficulty\": one of \"easy\", \"medium\", \"hard\"
- \"topic\": the concept the card covers
- \"source_excerpt\": a short quote from the content that supports the answer",
        subject = request.subject,
        level = level_label(request.difficulty),
        instructions = difficulty_instructions(request.difficulty),
        guidance = subject_guidance(&request.subject),
        content = request.source_text,
    );

    Prompt {
        kind: PromptKind::Flashcards,
        system: FLASHCARD_SYSTEM.to_string(),
        user,
        subject: request.subject.clone(),
        level: request.difficulty,
        count,
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    }
}

/// Builds the prompt asking the backend to improve one existing card.
pub fn enhance_prompt(card: &Flashcard, settings: &GeneratorSettings) -> Prompt {
    let user = format!(
        "Improve the following flashcard for the subject '{subject}'.

Question: {front}
Answer: {back}

Make the question more specific and clear, give the answer better structure
and completeness, and keep it accurate.

Reply with a JSON object:
{{\"enhanced_question\": \"...\", \"enhanced_answer\": \"...\"}}",
        subject = card.subject,
        front = card.front,
        back = card.back,
    );

    Prompt {
        kind: PromptKind::Enhance {
            front: card.front.clone(),
            back: card.back.clone(),
        },
        system: EDITOR_SYSTEM.to_string(),
        user,
        subject: card.subject.clone(),
        level: Some(card.difficulty),
        count: 1,
        temperature: 0.5,
        max_tokens: 500.min(settings.max_tokens),
    }
}

/// Smallest possible request, used to verify credentials and connectivity.
pub fn ping_prompt() -> Prompt {
    Prompt {
        kind: PromptKind::Ping,
        system: String::new(),
        user: "Hello".to_string(),
        subject: String::new(),
        level: None,
        count: 0,
        temperature: 0.0,
        max_tokens: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest::new(
            "Photosynthesis turns light into chemical energy.",
            "Biology",
            Some(Difficulty::Medium),
            12,
        )
    }

    #[test]
    fn prompt_is_deterministic() {
        let settings = GeneratorSettings::default();
        let a = flashcard_prompt(&request(), &settings);
        let b = flashcard_prompt(&request(), &settings);
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_carries_request_fields() {
        let prompt = flashcard_prompt(&request(), &GeneratorSettings::default());
        assert_eq!(prompt.count, 12);
        assert!(prompt.user.contains("Create 12 high-quality"));
        assert!(prompt.user.contains("SUBJECT: Biology"));
        assert!(prompt.user.contains("DIFFICULTY LEVEL: medium"));
        assert!(prompt.user.contains("biological processes"));
        assert!(prompt.user.contains("Photosynthesis turns light"));
    }

    #[test]
    fn unknown_subject_gets_general_guidance() {
        let req = GenerationRequest::new("text", "Astrology", None, 10);
        let prompt = flashcard_prompt(&req, &GeneratorSettings::default());
        assert!(prompt.user.contains("well-rounded questions"));
        assert!(prompt.user.contains("DIFFICULTY LEVEL: mixed"));
    }

    #[test]
    fn enhance_prompt_quotes_card() {
        let card = Flashcard::new(
            "What is ATP?".into(),
            "Energy currency".into(),
            "Biology".into(),
            Difficulty::Easy,
        );
        let prompt = enhance_prompt(&card, &GeneratorSettings::default());
        assert!(prompt.user.contains("Question: What is ATP?"));
        assert!(matches!(prompt.kind, PromptKind::Enhance { .. }));
    }
}

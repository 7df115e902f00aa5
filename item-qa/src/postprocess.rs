//! Answer guards and normalization.
//!
//! Applied to every raw model output, in this order:
//! 1. confidence threshold (only when the model reports a score),
//! 2. trim, drop the prompt preamble, trim again,
//! 3. minimum length and question-echo checks,
//! 4. sentence casing and a terminal period for generative answers.

use ai_model_service::ModelOutput;
use serde::Deserialize;

/// Per-variant guard settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRules {
    pub min_confidence: Option<f32>,
    /// Minimum answer length in characters after cleanup.
    pub min_answer_chars: usize,
    /// Reject answers that repeat the question.
    pub echo_guard: bool,
    /// Phrase the prompt ends with; models tend to repeat it.
    pub preamble: Option<String>,
    /// Uppercase the first letter and terminate with a period.
    pub sentence_case: bool,
}

/// Canned responses returned instead of a raw answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardMessages {
    pub low_confidence: String,
    pub uncertain: String,
    pub prompt_too_long: String,
}

/// Partial override of [`GuardMessages`], read from the catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageOverrides {
    pub low_confidence: Option<String>,
    pub uncertain: Option<String>,
    pub prompt_too_long: Option<String>,
}

impl GuardMessages {
    const PROMPT_TOO_LONG: &'static str = "Error: Input too long for processing";

    pub fn extractive() -> Self {
        Self {
            low_confidence: "I don't have enough information to answer this question.".into(),
            uncertain: "I'm not sure about the answer to this question.".into(),
            prompt_too_long: Self::PROMPT_TOO_LONG.into(),
        }
    }

    pub fn summarization() -> Self {
        Self {
            uncertain: "Based on the description, I cannot answer this question.".into(),
            ..Self::extractive()
        }
    }

    pub fn text2text() -> Self {
        Self {
            uncertain: "I don't know.".into(),
            ..Self::extractive()
        }
    }

    pub fn with_overrides(mut self, o: MessageOverrides) -> Self {
        if let Some(m) = o.low_confidence {
            self.low_confidence = m;
        }
        if let Some(m) = o.uncertain {
            self.uncertain = m;
        }
        if let Some(m) = o.prompt_too_long {
            self.prompt_too_long = m;
        }
        self
    }
}

/// Guard that replaced the model output, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    LowConfidence,
    TooShort,
    EchoesQuestion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Processed {
    pub text: String,
    pub guard: Option<Guard>,
}

/// Turns a raw model output into the user-facing answer.
pub fn process_answer(
    rules: &AnswerRules,
    messages: &GuardMessages,
    question: &str,
    output: ModelOutput,
) -> Processed {
    if let (Some(threshold), Some(score)) = (rules.min_confidence, output.score) {
        if score < threshold {
            return guarded(&messages.low_confidence, Guard::LowConfidence);
        }
    }

    let answer = match &rules.preamble {
        Some(p) => strip_preamble(&output.text, p),
        None => output.text.trim().to_string(),
    };

    if answer.chars().count() < rules.min_answer_chars {
        return guarded(&messages.uncertain, Guard::TooShort);
    }
    if rules.echo_guard && echoes(&answer, question) {
        return guarded(&messages.uncertain, Guard::EchoesQuestion);
    }

    let text = if rules.sentence_case {
        ensure_terminal_period(&capitalize_first(&answer))
    } else {
        answer
    };
    Processed { text, guard: None }
}

/// Cleans a refinement output. Empty output becomes the uncertain message.
pub fn process_refinement(messages: &GuardMessages, output: ModelOutput) -> String {
    let refined = output.text.trim();
    if refined.is_empty() {
        return messages.uncertain.clone();
    }
    ensure_terminal_period(refined)
}

fn guarded(message: &str, guard: Guard) -> Processed {
    Processed {
        text: message.to_string(),
        guard: Some(guard),
    }
}

fn echoes(answer: &str, question: &str) -> bool {
    let q = question.trim().to_lowercase();
    !q.is_empty() && answer.to_lowercase().contains(&q)
}

/// Removes every occurrence of `preamble` and trims.
pub fn strip_preamble(text: &str, preamble: &str) -> String {
    let text = text.trim();
    if preamble.is_empty() {
        return text.to_string();
    }
    text.replace(preamble, "").trim().to_string()
}

/// Uppercases the first character; the rest is left as is.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Appends one `.` unless the text already ends with one.
pub fn ensure_terminal_period(text: &str) -> String {
    if text.is_empty() || text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

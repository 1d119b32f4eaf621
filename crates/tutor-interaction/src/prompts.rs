//! Prompt templates.
//!
//! Every model invocation is stateless: the full necessary text is embedded
//! in the prompt, and no conversation context is reused between calls.

/// Leading tag the model is instructed to emit for Math questions.
pub const MATH_TAG: &str = "Type: Math";

/// Leading tag the model is instructed to emit for Theory questions.
pub const THEORY_TAG: &str = "Type: Theory";

const HINT_INSTRUCTION: &str = "You are a helpful, funny, kind hearted, polite and friendly AI tutor. \
First, classify the student's question strictly as 'Math' or 'Theory' \
(start your answer with: Type: Math or Type: Theory). \
If it's Math: ONLY provide 2-3 helpful hints, do NOT give the solution yet. \
If it's Theory: explain the concept simply for a 12-year-old.";

/// Instruction for transcribing an uploaded problem image verbatim,
/// keeping operators and line structure so a solution derived from the
/// transcription matches one derived from the same question typed by hand.
pub const EXTRACTION_PROMPT: &str = "Extract the problem statement from this image as it is. \
Also keep all operators such that if it is written in a line then solution should be same.";

/// Builds the hint-pass prompt: classification plus hints or explanation.
pub fn hint_prompt(question: &str) -> String {
    format!("{HINT_INSTRUCTION}\n\nStudent: {question}\nTutor:")
}

/// Builds the solution-pass prompt. Assumes hints were already given.
pub fn solution_prompt(question: &str) -> String {
    format!(
        "You are a helpful AI tutor. The student already received hints. \
Now provide a clear, step-by-step solution for this problem only:\n\n{question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_prompt_embeds_question_and_tag_instruction() {
        let prompt = hint_prompt("What is 5 + 3?");
        assert!(prompt.contains("Student: What is 5 + 3?"));
        assert!(prompt.contains("Type: Math or Type: Theory"));
        assert!(prompt.ends_with("Tutor:"));
    }

    #[test]
    fn solution_prompt_ends_with_question() {
        let prompt = solution_prompt("2x + 1 = 5");
        assert!(prompt.ends_with("2x + 1 = 5"));
        assert!(prompt.contains("step-by-step"));
    }
}

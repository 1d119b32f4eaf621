//! Tutor policy: prompt construction and response-type classification.

use std::sync::Arc;

use tracing::debug;

use tutor_core::error::Result;
use tutor_core::session::QuestionType;

use crate::gateway::ModelGateway;
use crate::prompts;

/// Builds prompts, invokes the gateway, and classifies replies.
///
/// Classification relies on the model prefixing its reply with a literal
/// type tag. That is a best-effort heuristic — the model may not comply —
/// so an unrecognized reply falls back to `Theory` instead of failing.
pub struct TutorPolicy {
    gateway: Arc<dyn ModelGateway>,
}

impl TutorPolicy {
    /// Creates a policy over the given gateway.
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    /// Runs the hint pass.
    ///
    /// Classifies the question and returns 2-3 hints (Math, final answer
    /// withheld) or a simplified explanation (Theory), together with the
    /// parsed question type.
    ///
    /// # Errors
    ///
    /// A gateway failure propagates as `ModelUnavailable`; no retry.
    pub async fn classify_and_hint(&self, question: &str) -> Result<(String, QuestionType)> {
        let reply = self
            .gateway
            .generate_text(&prompts::hint_prompt(question))
            .await?;

        let (question_type, answer) = split_type_tag(&reply);
        debug!("[TutorPolicy] hint pass classified question as {}", question_type);
        Ok((answer, question_type))
    }

    /// Runs the solution pass: a fresh, stateless invocation asking for the
    /// complete step-by-step derivation of `question`.
    ///
    /// # Errors
    ///
    /// A gateway failure propagates as `ModelUnavailable`; no retry.
    pub async fn solve(&self, question: &str) -> Result<String> {
        self.gateway
            .generate_text(&prompts::solution_prompt(question))
            .await
    }
}

/// Splits the leading type tag off a hint-pass reply.
///
/// The match is case-insensitive on the reply's leading text. On a match,
/// exactly the tag token and its adjoining whitespace are removed, leaving
/// the rest of the reply byte-identical to the model output. With no
/// recognized tag the whole reply is returned unmodified and the type
/// defaults to `Theory`.
fn split_type_tag(reply: &str) -> (QuestionType, String) {
    let trimmed = reply.trim_start();

    for (tag, question_type) in [
        (prompts::MATH_TAG, QuestionType::Math),
        (prompts::THEORY_TAG, QuestionType::Theory),
    ] {
        // get() rather than slicing: the reply may not have a char
        // boundary at the tag length.
        if let Some(head) = trimmed.get(..tag.len()) {
            if head.eq_ignore_ascii_case(tag) {
                let rest = trimmed[tag.len()..].trim_start();
                return (question_type, rest.to_string());
            }
        }
    }

    (QuestionType::Theory, reply.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tutor_core::error::TutorError;

    use crate::gateway::ImageData;

    /// Test double that records prompts and replays scripted replies.
    struct RecordingGateway {
        prompts: Mutex<Vec<String>>,
        reply: Result<String>,
    }

    impl RecordingGateway {
        fn replying(reply: &str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(err: TutorError) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: Err(err),
            }
        }

        fn last_prompt(&self) -> String {
            self.prompts.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl ModelGateway for RecordingGateway {
        async fn generate_text(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }

        async fn generate_from_image(&self, prompt: &str, _image: &ImageData) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    #[test]
    fn strips_math_tag_and_leading_whitespace() {
        let (qtype, answer) = split_type_tag("Type: Math\nTry breaking 8 into...");
        assert_eq!(qtype, QuestionType::Math);
        assert_eq!(answer, "Try breaking 8 into...");
    }

    #[test]
    fn strips_theory_tag() {
        let (qtype, answer) = split_type_tag("Type: Theory\nPlants use sunlight...");
        assert_eq!(qtype, QuestionType::Theory);
        assert_eq!(answer, "Plants use sunlight...");
    }

    #[test]
    fn tag_match_is_case_insensitive() {
        let (qtype, answer) = split_type_tag("TYPE: MATH  start with the parentheses");
        assert_eq!(qtype, QuestionType::Math);
        assert_eq!(answer, "start with the parentheses");

        let (qtype, _) = split_type_tag("  type: theory gravity pulls things down");
        assert_eq!(qtype, QuestionType::Theory);
    }

    #[test]
    fn rest_of_reply_is_byte_identical() {
        // Trailing whitespace and inner formatting survive untouched.
        let (_, answer) = split_type_tag("Type: Math\n\n1. hint one\n2. hint two\n");
        assert_eq!(answer, "1. hint one\n2. hint two\n");
    }

    #[test]
    fn untagged_reply_defaults_to_theory_unmodified() {
        let reply = "  Sure! Here is how to think about it.";
        let (qtype, answer) = split_type_tag(reply);
        assert_eq!(qtype, QuestionType::Theory);
        assert_eq!(answer, reply);
    }

    #[test]
    fn non_ascii_reply_defaults_to_theory() {
        let reply = "π ≈ 3.14159, приблизно";
        let (qtype, answer) = split_type_tag(reply);
        assert_eq!(qtype, QuestionType::Theory);
        assert_eq!(answer, reply);
    }

    #[tokio::test]
    async fn hint_pass_classifies_and_embeds_question() {
        let gateway = Arc::new(RecordingGateway::replying("Type: Math\nhint text"));
        let policy = TutorPolicy::new(gateway.clone());

        let (answer, qtype) = policy.classify_and_hint("What is 5 + 3?").await.unwrap();
        assert_eq!(qtype, QuestionType::Math);
        assert_eq!(answer, "hint text");
        assert!(gateway.last_prompt().contains("Student: What is 5 + 3?"));
    }

    #[tokio::test]
    async fn solve_embeds_question_in_fresh_prompt() {
        let gateway = Arc::new(RecordingGateway::replying("Step 1: subtract 1"));
        let policy = TutorPolicy::new(gateway.clone());

        let answer = policy.solve("2x + 1 = 5").await.unwrap();
        assert_eq!(answer, "Step 1: subtract 1");

        let prompt = gateway.last_prompt();
        assert!(prompt.contains("already received hints"));
        assert!(prompt.ends_with("2x + 1 = 5"));
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let gateway = Arc::new(RecordingGateway::failing(TutorError::model_unavailable(
            "connection refused",
        )));
        let policy = TutorPolicy::new(gateway);

        let err = policy.classify_and_hint("anything").await.unwrap_err();
        assert!(err.is_model_unavailable());
    }
}

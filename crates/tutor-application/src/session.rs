//! The per-session tutoring state machine.
//!
//! One [`TutorSession`] exists per user session. Each user action runs one
//! sequential call chain to completion: at most one in-flight gateway call,
//! no background work, and every failure leaves the state record exactly as
//! it was (no partial appends).

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use tutor_core::error::{Result, TutorError};
use tutor_core::session::{ConversationEntry, QuestionType, SessionState};
use tutor_interaction::extraction::extract_text;
use tutor_interaction::{ImageData, ModelGateway, TutorPolicy};

/// What a session action produced, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionReply {
    /// A hint pass completed.
    Exchange {
        /// The student entry as it appears in the transcript (image
        /// questions carry a marker around the transcription).
        student: ConversationEntry,
        /// The tutor's hints or explanation.
        tutor: ConversationEntry,
        /// How the question was classified.
        question_type: QuestionType,
        /// A full solution can now be requested.
        solution_available: bool,
        /// The previous exchange was purged before this one started.
        restarted: bool,
    },
    /// A solution pass completed. Terminal for this question.
    Solution(ConversationEntry),
}

/// Explicit per-session context object.
///
/// Owns the session's state record and drives the tutor policy. The
/// hosting layer creates one per user session and passes it into every
/// handler; nothing here is shared across sessions.
pub struct TutorSession {
    id: String,
    state: SessionState,
    gateway: Arc<dyn ModelGateway>,
    policy: TutorPolicy,
}

impl TutorSession {
    /// Creates a fresh session over the given gateway.
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        let id = Uuid::new_v4().to_string();
        info!("[TutorSession] created session {}", id);
        Self {
            id,
            state: SessionState::new(),
            policy: TutorPolicy::new(gateway.clone()),
            gateway,
        }
    }

    /// Returns the session ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The current transcript.
    pub fn history(&self) -> &[ConversationEntry] {
        &self.state.history
    }

    /// Read access to the full state record.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a solution pass may be requested right now.
    pub fn solution_available(&self) -> bool {
        self.state.solution_available()
    }

    /// Submits a typed question and runs the hint pass.
    ///
    /// If a terminal answer was already shown, the transcript is purged
    /// before the new exchange is recorded, so the history afterwards
    /// contains exactly the entries of this call.
    ///
    /// # Errors
    ///
    /// `InvalidState` for an empty question, `ModelUnavailable` when the
    /// hint pass fails. On error the state record is untouched.
    pub async fn submit_question(&mut self, text: &str) -> Result<SessionReply> {
        let question = text.trim();
        if question.is_empty() {
            return Err(TutorError::invalid_state("question must not be empty"));
        }

        info!(
            "[TutorSession] {}: hint pass for typed question ({} chars)",
            self.id,
            question.len()
        );
        let (answer, question_type) = self.policy.classify_and_hint(question).await?;

        Ok(self.finish_exchange(question.to_string(), question.to_string(), answer, question_type))
    }

    /// Submits an uploaded image: transcribe, then run the hint pass on
    /// the transcription.
    ///
    /// The transcript shows the student entry with an image marker, while
    /// the raw transcription is what a later solution pass is run on.
    ///
    /// # Errors
    ///
    /// `Extraction` when the bytes are not a usable image or the
    /// transcription call fails — the hint pass is never invoked in that
    /// case. On error the state record is untouched.
    pub async fn submit_image(&mut self, bytes: Vec<u8>) -> Result<SessionReply> {
        let image = ImageData::from_bytes(bytes)?;
        let transcription = extract_text(self.gateway.as_ref(), &image).await?;
        if transcription.is_empty() {
            return Err(TutorError::extraction("the image produced an empty transcription"));
        }

        info!(
            "[TutorSession] {}: hint pass for image question ({} chars transcribed)",
            self.id,
            transcription.len()
        );
        let shown = format!("Image question: {transcription}");
        let (answer, question_type) = self.policy.classify_and_hint(&transcription).await?;

        Ok(self.finish_exchange(transcription, shown, answer, question_type))
    }

    /// Reveals the full step-by-step solution for the pending Math question.
    ///
    /// # Errors
    ///
    /// `InvalidState` when no solution is pending (checked before any
    /// gateway call), `ModelUnavailable` when the solve pass fails. On
    /// error the state record — including the pending flag — is untouched.
    pub async fn request_solution(&mut self) -> Result<SessionReply> {
        let question = self.state.pending_question()?.to_string();

        info!("[TutorSession] {}: solution pass", self.id);
        let answer = self.policy.solve(&question).await?;

        let entry = self.state.record_solution(answer)?.clone();
        Ok(SessionReply::Solution(entry))
    }

    /// Records a completed hint pass.
    ///
    /// The reset-after-terminal-answer rule runs here, after the model
    /// call succeeded, so a failed pass never clears the old transcript.
    fn finish_exchange(
        &mut self,
        question: String,
        shown_question: String,
        answer: String,
        question_type: QuestionType,
    ) -> SessionReply {
        let restarted = self.state.begin_question();
        if restarted {
            info!("[TutorSession] {}: transcript purged for a fresh question", self.id);
        }

        self.state
            .record_exchange(question, shown_question, answer, question_type);

        let len = self.state.history.len();
        SessionReply::Exchange {
            student: self.state.history[len - 2].clone(),
            tutor: self.state.history[len - 1].clone(),
            question_type,
            solution_available: self.state.solution_available(),
            restarted,
        }
    }
}

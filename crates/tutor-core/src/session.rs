//! Session domain model.
//!
//! This module contains the conversation transcript and the per-session
//! state record that the tutoring state machine operates on. It is
//! independent of any model backend or presentation surface.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorError};

/// The author of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryRole {
    /// The student's question.
    Student,
    /// The tutor's hint or explanation reply.
    Tutor,
    /// The tutor's full step-by-step solution.
    TutorSolution,
}

impl fmt::Display for EntryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "Student"),
            Self::Tutor => write!(f, "Tutor"),
            Self::TutorSolution => write!(f, "Tutor (Solution)"),
        }
    }
}

/// Classification of a student question, derived from the model's reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    /// A problem to be solved; answered with hints first.
    Math,
    /// A concept to be explained; answered in one pass.
    Theory,
}

impl QuestionType {
    /// Whether this question type offers a follow-up solution pass.
    pub fn is_math(&self) -> bool {
        matches!(self, Self::Math)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Math => write!(f, "Math"),
            Self::Theory => write!(f, "Theory"),
        }
    }
}

/// A single entry in the session transcript.
///
/// Entries are immutable once appended and only removed wholesale when the
/// session resets for a new question after a solution was shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Who authored this entry.
    pub role: EntryRole,
    /// The entry text.
    pub text: String,
    /// Timestamp when the entry was created (ISO 8601 format).
    pub timestamp: String,
}

impl ConversationEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(role: EntryRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// The mutable per-session state record.
///
/// One instance exists per user session, owned by the presentation layer and
/// mutated only through the methods below. The invariant maintained here:
/// `awaiting_solution` is true only while `last_question_type` is `Math` and
/// no solution entry has been appended for `last_question`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Ordered, append-only transcript.
    pub history: Vec<ConversationEntry>,
    /// A Math question's hints were shown and the solution is still pending.
    pub awaiting_solution: bool,
    /// The question text used for a later solution pass.
    pub last_question: Option<String>,
    /// Classification of the last question.
    pub last_question_type: Option<QuestionType>,
    /// A terminal answer (solution or theory explanation) has been shown;
    /// the next submitted question resets the session first.
    pub solution_displayed: bool,
}

impl SessionState {
    /// Creates an empty session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the transcript and all flags.
    pub fn reset(&mut self) {
        self.history.clear();
        self.awaiting_solution = false;
        self.last_question = None;
        self.last_question_type = None;
        self.solution_displayed = false;
    }

    /// Prepares the state for a newly submitted question.
    ///
    /// If a terminal answer was already shown, the previous exchange is
    /// purged so the new question starts a fresh transcript. Returns whether
    /// a reset happened, so callers can tell the presentation to re-render.
    pub fn begin_question(&mut self) -> bool {
        if self.solution_displayed {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Records a completed hint pass.
    ///
    /// Appends the Student entry (as displayed) and the Tutor reply, and
    /// arms the pending-solution flag for Math questions. Theory answers are
    /// terminal, so they mark the solution as displayed immediately.
    ///
    /// `question` is the text a later solve pass will be run on; for image
    /// questions it is the raw transcription while `shown_question` carries
    /// the image marker.
    pub fn record_exchange(
        &mut self,
        question: String,
        shown_question: String,
        answer: String,
        question_type: QuestionType,
    ) {
        self.history
            .push(ConversationEntry::new(EntryRole::Student, shown_question));
        self.history
            .push(ConversationEntry::new(EntryRole::Tutor, answer));
        self.awaiting_solution = question_type.is_math();
        self.solution_displayed = !question_type.is_math();
        self.last_question = Some(question);
        self.last_question_type = Some(question_type);
    }

    /// Whether a solution pass may be requested right now.
    pub fn solution_available(&self) -> bool {
        self.awaiting_solution && self.last_question_type == Some(QuestionType::Math)
    }

    /// Returns the question a solution pass would be run on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when no Math question is awaiting a solution.
    /// Checked before the model is invoked so an invalid request never costs
    /// a gateway call.
    pub fn pending_question(&self) -> Result<&str> {
        if !self.solution_available() {
            return Err(TutorError::invalid_state(
                "no question is awaiting a solution",
            ));
        }
        self.last_question
            .as_deref()
            .ok_or_else(|| TutorError::invalid_state("no question is awaiting a solution"))
    }

    /// Records a completed solution pass.
    ///
    /// Appends the solution entry and moves the session into its terminal
    /// per-question state.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` (leaving `history` untouched) when no solution
    /// was pending.
    pub fn record_solution(&mut self, answer: String) -> Result<&ConversationEntry> {
        if !self.solution_available() {
            return Err(TutorError::invalid_state(
                "no question is awaiting a solution",
            ));
        }
        self.history
            .push(ConversationEntry::new(EntryRole::TutorSolution, answer));
        self.awaiting_solution = false;
        self.solution_displayed = true;
        // Safe to unwrap because we just pushed an element
        Ok(self.history.last().unwrap())
    }
}

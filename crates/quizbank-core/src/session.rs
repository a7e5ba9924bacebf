//! Quiz session engine.
//!
//! A [`QuizSession`] owns one run through a randomly selected subset of a
//! question bank: the cursor, the answers given so far, and the per-question
//! answer locks. It is an ordinary value owned by the caller; nothing here
//! is global.
//!
//! Every operation is safe to call in any state. Without an active session
//! they return neutral values (`None`, `false`, a zero score) so the
//! presentation layer can treat "no session" as an ordinary state.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AnswerError;
use crate::model::{Question, QuizConfig, Selection, UserAnswer};
use crate::scoring::Score;

/// Lifecycle of a [`QuizSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    InProgress,
    Finished,
}

/// Everything a running or finished session holds.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    /// Fresh per `start`.
    pub id: Uuid,
    /// Parameters the session was started with.
    pub config: QuizConfig,
    /// The selected questions, in presentation order. Fixed for the session.
    pub questions: Vec<Question>,
    /// Position in `questions`; always a valid index when non-empty.
    pub current_index: usize,
    /// Recorded answers keyed by question id. At most one per question.
    pub answers: HashMap<String, UserAnswer>,
    pub started_at: DateTime<Utc>,
    /// Set by `finish`.
    pub finished_at: Option<DateTime<Utc>>,
}

/// The quiz state machine: `Idle` → `InProgress` → `Finished`.
#[derive(Debug, Default)]
pub struct QuizSession {
    state: Option<SessionState>,
    locked: HashSet<String>,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh session, discarding any previous one.
    pub fn start(&mut self, config: QuizConfig, bank: &[Question]) {
        self.start_with_rng(config, bank, &mut rand::rng());
    }

    /// Like [`start`](Self::start), drawing the question order from `rng`.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        config: QuizConfig,
        bank: &[Question],
        rng: &mut R,
    ) {
        let mut pool: Vec<Question> = bank
            .iter()
            .filter(|q| config.block.matches(q))
            .cloned()
            .collect();
        let pool_size = pool.len();

        pool.shuffle(rng);
        pool.truncate(config.number_of_questions.min(pool_size));

        let id = Uuid::new_v4();
        tracing::info!(
            session = %id,
            block = %config.block,
            pool = pool_size,
            selected = pool.len(),
            "quiz session started"
        );

        self.locked.clear();
        self.state = Some(SessionState {
            id,
            config,
            questions: pool,
            current_index: 0,
            answers: HashMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        });
    }

    pub fn status(&self) -> SessionStatus {
        match &self.state {
            None => SessionStatus::Idle,
            Some(state) if state.finished_at.is_some() => SessionStatus::Finished,
            Some(_) => SessionStatus::InProgress,
        }
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn config(&self) -> Option<&QuizConfig> {
        self.state.as_ref().map(|s| &s.config)
    }

    pub fn questions(&self) -> &[Question] {
        self.state.as_ref().map_or(&[], |s| s.questions.as_slice())
    }

    pub fn len(&self) -> usize {
        self.questions().len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions().is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.current_index)
    }

    pub fn current_question(&self) -> Option<&Question> {
        let state = self.state.as_ref()?;
        state.questions.get(state.current_index)
    }

    /// Record `selection` for the current question.
    ///
    /// Returns the answer now on record, or `None` if the selection was
    /// ignored. See [`try_answer`](Self::try_answer) for the reasons.
    pub fn answer(&mut self, selection: Selection) -> Option<&UserAnswer> {
        self.try_answer(selection).ok()
    }

    /// Record `selection` for the current question, reporting why it was
    /// ignored if it was.
    ///
    /// A question is locked once answered: later calls return the first
    /// answer unchanged, even after navigating away and back.
    pub fn try_answer(&mut self, selection: Selection) -> Result<&UserAnswer, AnswerError> {
        let finished = self.status() == SessionStatus::Finished;
        let state = self.state.as_mut().ok_or(AnswerError::NoActiveSession)?;
        if finished {
            return Err(AnswerError::SessionFinished);
        }
        let question = state
            .questions
            .get(state.current_index)
            .ok_or(AnswerError::NoCurrentQuestion)?;
        let question_id = question.id.clone();

        if self.locked.contains(&question_id) && state.answers.contains_key(&question_id) {
            return Ok(&state.answers[&question_id]);
        }

        validate_selection(question, &selection)?;

        let is_correct = question.is_correct(&selection);
        self.locked.insert(question_id.clone());
        let answer = UserAnswer {
            question_id: question_id.clone(),
            selection,
            is_correct,
        };
        tracing::debug!(question = %question_id, correct = is_correct, "answer recorded");

        state.answers.insert(question_id.clone(), answer);
        Ok(&state.answers[&question_id])
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&UserAnswer> {
        self.state.as_ref()?.answers.get(question_id)
    }

    pub fn is_locked(&self, question_id: &str) -> bool {
        self.locked.contains(question_id)
    }

    /// Move to the next question. Returns `false` at the last question.
    pub fn next(&mut self) -> bool {
        self.step(|index, len| (index + 1 < len).then_some(index + 1))
    }

    /// Move to the previous question. Returns `false` at the first question.
    pub fn prev(&mut self) -> bool {
        self.step(|index, _| index.checked_sub(1))
    }

    fn step(&mut self, target: impl FnOnce(usize, usize) -> Option<usize>) -> bool {
        if self.status() != SessionStatus::InProgress {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        match target(state.current_index, state.questions.len()) {
            Some(index) => {
                state.current_index = index;
                true
            }
            None => false,
        }
    }

    /// Stamp the finish time. Answers and score are untouched; repeated calls
    /// only move the timestamp.
    pub fn finish(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let score = Score::of(state);
        state.finished_at = Some(Utc::now());
        tracing::info!(
            session = %state.id,
            correct = score.correct,
            total = score.total,
            "quiz session finished"
        );
    }

    pub fn score(&self) -> Score {
        self.state.as_ref().map(Score::of).unwrap_or_default()
    }
}

fn validate_selection(question: &Question, selection: &Selection) -> Result<(), AnswerError> {
    if question.is_multi_select() != selection.is_multiple() {
        return Err(AnswerError::ModeMismatch {
            question_id: question.id.clone(),
            expected_multi: question.is_multi_select(),
        });
    }
    let ids = selection.ids();
    if ids.is_empty() {
        return Err(AnswerError::EmptySelection);
    }
    if let Some(unknown) = ids.into_iter().find(|id| !question.has_option(id)) {
        return Err(AnswerError::UnknownOption {
            question_id: question.id.clone(),
            option_id: unknown.to_string(),
        });
    }
    Ok(())
}

//! Session scoring and answer review.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Question, UserAnswer};
use crate::session::{QuizSession, SessionState};

/// Correct answers out of questions asked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    /// Score a session state. Unanswered questions count toward `total` only.
    pub fn of(state: &SessionState) -> Self {
        let correct = state
            .questions
            .iter()
            .filter_map(|q| state.answers.get(&q.id))
            .filter(|a| a.is_correct)
            .count();
        Self {
            correct,
            total: state.questions.len(),
        }
    }

    /// `correct / total * 100`, rounded to one decimal. Zero when there were
    /// no questions.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let pct = self.correct as f64 / self.total as f64 * 100.0;
        (pct * 10.0).round() / 10.0
    }

    fn record(&mut self, answer: Option<&UserAnswer>) {
        self.total += 1;
        if answer.is_some_and(|a| a.is_correct) {
            self.correct += 1;
        }
    }
}

/// How a reviewed question went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
    Unanswered,
}

/// One question of a finished (or running) session, with what the user did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// 1-based position in the session.
    pub position: usize,
    pub question: Question,
    pub answer: Option<UserAnswer>,
    pub outcome: ReviewOutcome,
}

/// Review data for every session question, in session order.
pub fn review(session: &QuizSession) -> Vec<ReviewItem> {
    session
        .questions()
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let answer = session.answer_for(&question.id).cloned();
            let outcome = match &answer {
                Some(a) if a.is_correct => ReviewOutcome::Correct,
                Some(_) => ReviewOutcome::Incorrect,
                None => ReviewOutcome::Unanswered,
            };
            ReviewItem {
                position: idx + 1,
                question: question.clone(),
                answer,
                outcome,
            }
        })
        .collect()
}

/// Per-block scores over the session's questions.
pub fn block_breakdown(session: &QuizSession) -> BTreeMap<u32, Score> {
    let mut blocks: BTreeMap<u32, Score> = BTreeMap::new();
    for question in session.questions() {
        blocks
            .entry(question.block_id)
            .or_default()
            .record(session.answer_for(&question.id));
    }
    blocks
}

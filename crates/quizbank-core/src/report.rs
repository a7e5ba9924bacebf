//! Results summary of a quiz session, for display or export.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::QuizConfig;
use crate::scoring::{block_breakdown, review, ReviewItem, ReviewOutcome, Score};
use crate::session::QuizSession;

/// A self-contained summary of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub config: QuizConfig,
    pub score: Score,
    pub percentage: f64,
    /// Scores keyed by block id.
    pub blocks: BTreeMap<u32, Score>,
    pub review: Vec<ReviewItem>,
}

impl SessionReport {
    /// Summarize `session`, or `None` if it was never started.
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let state = session.state()?;
        let score = session.score();
        Some(Self {
            session_id: state.id,
            started_at: state.started_at,
            finished_at: state.finished_at,
            config: state.config.clone(),
            score,
            percentage: score.percentage(),
            blocks: block_breakdown(session),
            review: review(session),
        })
    }

    /// Seconds between start and finish, if the session finished.
    pub fn duration_secs(&self) -> Option<i64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_seconds())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as a Markdown summary with a per-question review.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("# Quiz Results\n\n");
        md.push_str(&format!(
            "**Score:** {} / {} ({:.1}%)\n\n",
            self.score.correct, self.score.total, self.percentage
        ));
        if let Some(secs) = self.duration_secs() {
            md.push_str(&format!("**Duration:** {}m {:02}s\n\n", secs / 60, secs % 60));
        }

        if !self.blocks.is_empty() {
            md.push_str("| Block | Correct | Total | % |\n");
            md.push_str("|-------|---------|-------|---|\n");
            for (block, score) in &self.blocks {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.1} |\n",
                    block,
                    score.correct,
                    score.total,
                    score.percentage()
                ));
            }
            md.push('\n');
        }

        for item in &self.review {
            let mark = match item.outcome {
                ReviewOutcome::Correct => "correct",
                ReviewOutcome::Incorrect => "incorrect",
                ReviewOutcome::Unanswered => "unanswered",
            };
            md.push_str(&format!(
                "## {}. {} ({mark})\n\n",
                item.position, item.question.text
            ));
            for option in &item.question.options {
                let mut tags = Vec::new();
                if item.question.is_correct_option(&option.id) {
                    tags.push("correct");
                }
                if item
                    .answer
                    .as_ref()
                    .is_some_and(|a| a.selection.contains(&option.id))
                {
                    tags.push("your answer");
                }
                let suffix = if tags.is_empty() {
                    String::new()
                } else {
                    format!(" _({})_", tags.join(", "))
                };
                md.push_str(&format!("- **{})** {}{suffix}\n", option.id, option.text));
            }
            if let Some(explanation) = &item.question.explanation {
                md.push_str(&format!("\n> {explanation}\n"));
            }
            md.push('\n');
        }

        md
    }
}

//! Plain-text question bank parser.
//!
//! The format is line oriented:
//!
//! ```text
//! // comments start with two slashes
//! #BLOCK 2
//! Q: Which command lists files?
//! <image>assets/shell.png</image>
//! A) cd
//! B) *ls
//! C) pwd
//!
//! Q: Pick the prime numbers.
//! A) *2
//! B) 4
//! C) *5
//! ```
//!
//! Blank lines end a question. A `*` before an option label marks it
//! correct; more than one marked option makes the question multi-select.
//! Malformed blocks are dropped rather than reported as errors, so a
//! partially broken file still yields every valid question it contains.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{AnswerOption, BlockFilter, CorrectAnswer, Question};

static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#BLOCK\s+(\d+)").expect("valid block regex"));

static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q:\s*").expect("valid question regex"));

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<image>(.+?)</image>$").expect("valid image regex"));

static OPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z])[).]\s*(\*?)(.+)$").expect("valid option regex"));

/// Why a block of lines did not become a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Options or images without a `Q:` line, or an empty `Q:`.
    MissingText,
    /// Fewer than two options; carries the count found.
    TooFewOptions(usize),
    /// No option was marked with `*`.
    NoCorrectOption,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::MissingText => write!(f, "missing question text"),
            RejectReason::TooFewOptions(n) => {
                write!(f, "needs at least 2 options, found {n}")
            }
            RejectReason::NoCorrectOption => write!(f, "no option marked correct with '*'"),
        }
    }
}

/// A dropped question block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBlock {
    /// 1-based line on which the block started.
    pub line: usize,
    /// The question text, if one was given.
    pub text: Option<String>,
    pub reason: RejectReason,
}

/// Result of [`parse_with_diagnostics`].
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub questions: Vec<Question>,
    pub rejected: Vec<RejectedBlock>,
}

/// Parse a question bank. Never fails; invalid blocks are skipped.
pub fn parse(raw: &str) -> Vec<Question> {
    parse_with_diagnostics(raw).questions
}

/// Parse a question bank, also returning the blocks that were dropped.
pub fn parse_with_diagnostics(raw: &str) -> ParseOutcome {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut builder = BankBuilder::default();

    for (idx, raw_line) in split_lines(raw).enumerate() {
        builder.feed(idx + 1, raw_line.trim());
    }
    builder.flush();

    ParseOutcome {
        questions: builder.questions,
        rejected: builder.rejected,
    }
}

/// Number of questions per block id.
pub fn block_counts(bank: &[Question]) -> BTreeMap<u32, usize> {
    let mut counts = BTreeMap::new();
    for q in bank {
        *counts.entry(q.block_id).or_insert(0) += 1;
    }
    counts
}

/// How many questions of `bank` a session with `filter` could draw from.
pub fn pool_size(bank: &[Question], filter: BlockFilter) -> usize {
    bank.iter().filter(|q| filter.matches(q)).count()
}

/// Split on `\n`, `\r\n`, or a lone `\r`.
fn split_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

#[derive(Debug, Default)]
struct PendingQuestion {
    start_line: usize,
    block_id: u32,
    text: Option<String>,
    options: Vec<AnswerOption>,
    correct: BTreeSet<String>,
    image_urls: Vec<String>,
}

impl PendingQuestion {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.options.is_empty() && self.image_urls.is_empty()
    }

    fn touch(&mut self, line: usize) {
        if self.is_empty() {
            self.start_line = line;
        }
    }

    fn has_open_text(&self) -> bool {
        self.text.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Add an option, replacing any earlier option with the same id in place.
    fn add_option(&mut self, id: &str, text: &str, correct: bool) {
        let option = AnswerOption {
            id: id.to_string(),
            text: text.to_string(),
        };
        match self.options.iter_mut().find(|o| o.id == id) {
            Some(existing) => *existing = option,
            None => self.options.push(option),
        }
        if correct {
            self.correct.insert(id.to_string());
        } else {
            self.correct.remove(id);
        }
    }

    fn into_question(self, ordinal: usize) -> Result<Question, RejectedBlock> {
        let text = self.text.map(|t| t.trim().to_string());
        let reject = |reason| RejectedBlock {
            line: self.start_line,
            text: text.clone().filter(|t| !t.is_empty()),
            reason,
        };

        let Some(question_text) = text.clone().filter(|t| !t.is_empty()) else {
            return Err(reject(RejectReason::MissingText));
        };
        if self.options.len() < 2 {
            return Err(reject(RejectReason::TooFewOptions(self.options.len())));
        }
        let correct = match self.correct.len() {
            0 => return Err(reject(RejectReason::NoCorrectOption)),
            1 => match self.correct.into_iter().next() {
                Some(id) => CorrectAnswer::Single(id),
                None => return Err(reject(RejectReason::NoCorrectOption)),
            },
            _ => CorrectAnswer::Multiple(self.correct),
        };

        Ok(Question {
            id: ordinal.to_string(),
            text: question_text,
            options: self.options,
            correct,
            block_id: self.block_id,
            explanation: None,
            image_urls: self.image_urls,
        })
    }
}

#[derive(Debug, Default)]
struct BankBuilder {
    current_block: u32,
    pending: PendingQuestion,
    questions: Vec<Question>,
    rejected: Vec<RejectedBlock>,
}

impl BankBuilder {
    fn feed(&mut self, line_no: usize, line: &str) {
        if line.is_empty() {
            self.flush();
            return;
        }
        if line.starts_with("//") {
            return;
        }

        if let Some(caps) = BLOCK_RE.captures(line) {
            self.flush();
            match caps[1].parse::<u32>() {
                Ok(block) => self.current_block = block,
                Err(_) => tracing::debug!(line = line_no, "ignoring out-of-range #BLOCK"),
            }
            return;
        }

        if let Some(m) = QUESTION_RE.find(line) {
            self.flush();
            self.pending.touch(line_no);
            self.pending.block_id = self.current_block;
            self.pending.text = Some(line[m.end()..].to_string());
            return;
        }

        if let Some(caps) = IMAGE_RE.captures(line) {
            let path = caps[1].trim();
            if !path.is_empty() {
                self.pending.touch(line_no);
                self.pending.image_urls.push(path.to_string());
            }
            return;
        }

        if let Some(caps) = OPTION_RE.captures(line) {
            self.pending.touch(line_no);
            self.pending
                .add_option(&caps[1], caps[3].trim(), !caps[2].is_empty());
            return;
        }

        if self.pending.has_open_text() {
            if let Some(text) = self.pending.text.as_mut() {
                text.push(' ');
                text.push_str(line);
            }
        }
    }

    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if pending.is_empty() {
            return;
        }
        match pending.into_question(self.questions.len() + 1) {
            Ok(question) => self.questions.push(question),
            Err(rejected) => {
                tracing::debug!(
                    line = rejected.line,
                    reason = %rejected.reason,
                    "dropping question block"
                );
                self.rejected.push(rejected);
            }
        }
    }
}

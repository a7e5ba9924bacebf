//! Core data model types for quizbank.
//!
//! Questions, answers, and the configuration a caller hands to a session.
//! Everything here is plain data; the logic lives in `parser` and `session`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Single-letter identifier, unique within its question (e.g. "A").
    pub id: String,
    /// Label shown to the user.
    pub text: String,
}

/// Which option(s) of a question are correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectAnswer {
    Single(String),
    Multiple(BTreeSet<String>),
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within a bank, assigned sequentially at parse time.
    pub id: String,
    /// Question statement.
    pub text: String,
    /// Options in authoring order. Always at least two.
    pub options: Vec<AnswerOption>,
    /// The correct option id(s). Every id is present in `options`.
    pub correct: CorrectAnswer,
    /// Block (domain/category) tag; 0 means unassigned.
    #[serde(default)]
    pub block_id: u32,
    /// Shown after the question is answered. The text format has no
    /// directive for it, so parsed questions leave it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// Reference images shown alongside the question.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

impl Question {
    pub fn is_multi_select(&self) -> bool {
        matches!(self.correct, CorrectAnswer::Multiple(_))
    }

    pub fn option(&self, id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn has_option(&self, id: &str) -> bool {
        self.option(id).is_some()
    }

    /// The correct option ids, in sorted order.
    pub fn correct_ids(&self) -> Vec<&str> {
        match &self.correct {
            CorrectAnswer::Single(id) => vec![id.as_str()],
            CorrectAnswer::Multiple(ids) => ids.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_correct_option(&self, id: &str) -> bool {
        match &self.correct {
            CorrectAnswer::Single(correct) => correct == id,
            CorrectAnswer::Multiple(correct) => correct.contains(id),
        }
    }

    /// Whether `selection` is exactly right.
    ///
    /// Multi-select answers must name the same set of ids as the key: no
    /// extra ids, none missing. A selection of the wrong shape is never
    /// correct.
    pub fn is_correct(&self, selection: &Selection) -> bool {
        match (&self.correct, selection) {
            (CorrectAnswer::Single(correct), Selection::Single(chosen)) => correct == chosen,
            (CorrectAnswer::Multiple(correct), Selection::Multiple(chosen)) => correct == chosen,
            _ => false,
        }
    }
}

/// What the user picked for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl Selection {
    pub fn single(id: impl Into<String>) -> Self {
        Selection::Single(id.into())
    }

    pub fn multiple<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Multiple(ids.into_iter().map(Into::into).collect())
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Selection::Multiple(_))
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Selection::Single(id) => vec![id.as_str()],
            Selection::Multiple(ids) => ids.iter().map(String::as_str).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        match self {
            Selection::Single(chosen) => chosen == id,
            Selection::Multiple(chosen) => chosen.contains(id),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ids().join(", "))
    }
}

/// The recorded answer for one question of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    /// The ids the user picked.
    pub selection: Selection,
    /// Evaluated once, when the answer is recorded.
    pub is_correct: bool,
}

/// Which questions of the bank a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawBlockFilter", into = "RawBlockFilter")]
pub enum BlockFilter {
    #[default]
    All,
    Block(u32),
}

impl BlockFilter {
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            BlockFilter::All => true,
            BlockFilter::Block(id) => question.block_id == *id,
        }
    }
}

impl fmt::Display for BlockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockFilter::All => write!(f, "all"),
            BlockFilter::Block(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for BlockFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(BlockFilter::All);
        }
        s.parse::<u32>()
            .map(BlockFilter::Block)
            .map_err(|_| ConfigError::InvalidBlock(s.to_string()))
    }
}

/// Wire shape of [`BlockFilter`]: `"all"` or a block number (bare or quoted).
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawBlockFilter {
    Number(u32),
    Text(String),
}

impl TryFrom<RawBlockFilter> for BlockFilter {
    type Error = ConfigError;

    fn try_from(raw: RawBlockFilter) -> Result<Self, Self::Error> {
        match raw {
            RawBlockFilter::Number(id) => Ok(BlockFilter::Block(id)),
            RawBlockFilter::Text(s) => s.parse(),
        }
    }
}

impl From<BlockFilter> for RawBlockFilter {
    fn from(filter: BlockFilter) -> Self {
        match filter {
            BlockFilter::All => RawBlockFilter::Text("all".into()),
            BlockFilter::Block(id) => RawBlockFilter::Number(id),
        }
    }
}

/// When correctness is revealed to the user. Enforced by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackMode {
    #[default]
    Immediate,
    End,
}

impl fmt::Display for FeedbackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedbackMode::Immediate => write!(f, "immediate"),
            FeedbackMode::End => write!(f, "end"),
        }
    }
}

impl FromStr for FeedbackMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "immediate" => Ok(FeedbackMode::Immediate),
            "end" => Ok(FeedbackMode::End),
            other => Err(ConfigError::UnknownFeedbackMode(other.to_string())),
        }
    }
}

/// Session parameters. Fixed once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Certification the bank belongs to, if the caller tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification_id: Option<String>,
    /// Which block the questions are drawn from.
    pub block: BlockFilter,
    /// Requested session length. Never zero; capped by the pool at start.
    pub number_of_questions: usize,
    /// When correctness is revealed.
    #[serde(default)]
    pub feedback_mode: FeedbackMode,
}

impl QuizConfig {
    pub fn new(
        block: BlockFilter,
        number_of_questions: usize,
        feedback_mode: FeedbackMode,
    ) -> Result<Self, ConfigError> {
        if number_of_questions == 0 {
            return Err(ConfigError::ZeroQuestions);
        }
        Ok(Self {
            certification_id: None,
            block,
            number_of_questions,
            feedback_mode,
        })
    }

    pub fn with_certification(mut self, id: impl Into<String>) -> Self {
        self.certification_id = Some(id.into());
        self
    }
}

/// A named block of a certification syllabus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Matches the `#BLOCK` number in question banks.
    pub id: u32,
    /// Display name, e.g. "Architecture Content".
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Rough number of exam questions drawn from this block.
    #[serde(default)]
    pub question_count_hint: Option<u32>,
}

/// A certification and the blocks its question banks are tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certification {
    /// Short identifier, e.g. "togaf10".
    pub id: String,
    /// Human-readable exam name.
    pub title: String,
    /// Syllabus blocks, in display order.
    #[serde(default)]
    pub blocks: Vec<BlockInfo>,
}

impl Certification {
    pub fn block(&self, id: u32) -> Option<&BlockInfo> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_name(&self, id: u32) -> Option<&str> {
        self.block(id).map(|b| b.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: CorrectAnswer) -> Question {
        Question {
            id: "1".into(),
            text: "Pick".into(),
            options: ["A", "B", "C"]
                .iter()
                .map(|id| AnswerOption {
                    id: (*id).into(),
                    text: format!("option {id}"),
                })
                .collect(),
            correct,
            block_id: 0,
            explanation: None,
            image_urls: vec![],
        }
    }

    #[test]
    fn feedback_mode_display_and_parse() {
        assert_eq!(FeedbackMode::Immediate.to_string(), "immediate");
        assert_eq!("END".parse::<FeedbackMode>().unwrap(), FeedbackMode::End);
        assert_eq!(
            "later".parse::<FeedbackMode>(),
            Err(ConfigError::UnknownFeedbackMode("later".into()))
        );
    }

    #[test]
    fn block_filter_parse() {
        assert_eq!("all".parse::<BlockFilter>().unwrap(), BlockFilter::All);
        assert_eq!("All".parse::<BlockFilter>().unwrap(), BlockFilter::All);
        assert_eq!(" 4 ".parse::<BlockFilter>().unwrap(), BlockFilter::Block(4));
        assert!("four".parse::<BlockFilter>().is_err());
        assert!("-1".parse::<BlockFilter>().is_err());
    }

    #[test]
    fn block_filter_serde_accepts_number_or_text() {
        let all: BlockFilter = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, BlockFilter::All);
        let three: BlockFilter = serde_json::from_str("3").unwrap();
        assert_eq!(three, BlockFilter::Block(3));
        let quoted: BlockFilter = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(quoted, BlockFilter::Block(7));
        assert!(serde_json::from_str::<BlockFilter>("\"nope\"").is_err());
        assert_eq!(serde_json::to_string(&BlockFilter::All).unwrap(), "\"all\"");
        assert_eq!(serde_json::to_string(&BlockFilter::Block(2)).unwrap(), "2");
    }

    #[test]
    fn single_select_correctness() {
        let q = question(CorrectAnswer::Single("B".into()));
        assert!(!q.is_multi_select());
        assert!(q.is_correct(&Selection::single("B")));
        assert!(!q.is_correct(&Selection::single("A")));
        assert!(!q.is_correct(&Selection::multiple(["B"])));
        assert_eq!(q.correct_ids(), vec!["B"]);
    }

    #[test]
    fn multi_select_requires_exact_set() {
        let q = question(CorrectAnswer::Multiple(
            ["A", "C"].iter().map(|s| s.to_string()).collect(),
        ));
        assert!(q.is_multi_select());
        assert!(q.is_correct(&Selection::multiple(["C", "A"])));
        assert!(!q.is_correct(&Selection::multiple(["A"])));
        assert!(!q.is_correct(&Selection::multiple(["A", "B", "C"])));
        assert!(q.is_correct_option("C"));
        assert!(!q.is_correct_option("B"));
    }

    #[test]
    fn quiz_config_rejects_zero_questions() {
        assert_eq!(
            QuizConfig::new(BlockFilter::All, 0, FeedbackMode::End),
            Err(ConfigError::ZeroQuestions)
        );
        let config = QuizConfig::new(BlockFilter::Block(2), 5, FeedbackMode::End)
            .unwrap()
            .with_certification("gh300");
        assert_eq!(config.certification_id.as_deref(), Some("gh300"));
    }

    #[test]
    fn selection_display() {
        assert_eq!(Selection::single("A").to_string(), "A");
        assert_eq!(Selection::multiple(["C", "A"]).to_string(), "A, C");
    }

    #[test]
    fn certification_block_lookup() {
        let cert = Certification {
            id: "togaf10".into(),
            title: "TOGAF 10 - Foundation".into(),
            blocks: vec![BlockInfo {
                id: 1,
                name: "Concepts".into(),
                description: None,
                question_count_hint: None,
            }],
        };
        assert_eq!(cert.block_name(1), Some("Concepts"));
        assert_eq!(cert.block_name(9), None);
    }
}

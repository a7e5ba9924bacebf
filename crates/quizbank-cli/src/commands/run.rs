//! The `quizbank run` command.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizbank_core::model::{
    BlockFilter, Certification, FeedbackMode, Question, QuizConfig, Selection,
};
use quizbank_core::parser;
use quizbank_core::report::SessionReport;
use quizbank_core::scoring::{block_breakdown, review, ReviewOutcome};
use quizbank_core::session::QuizSession;

use crate::bank::{load_bank, resolve_bank_path};
use crate::config::load_config_from;

const HELP: &str = "\
Answer with the option letter(s): `B`, or `A,C` for select-all-that-apply.
  n  next question      p  previous question
  f  finish the exam    ?  this help
When the question has an option with one of these letters, the letter picks
that option; type next, prev or finish instead.";

/// One line of user input, interpreted.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Answer(BTreeSet<String>),
    Next,
    Prev,
    Finish,
    Help,
    Unknown,
}

/// Interpret `line` while `question` is on screen. A lone letter naming one
/// of its options is always an answer, never a shortcut.
fn parse_command(line: &str, question: &Question) -> Command {
    let line = line.trim();
    let is_option = line.len() == 1 && question.has_option(&line.to_ascii_uppercase());
    if !is_option {
        match line.to_ascii_lowercase().as_str() {
            "n" | "next" => return Command::Next,
            "p" | "prev" | "previous" => return Command::Prev,
            "f" | "finish" | "q" | "quit" => return Command::Finish,
            "?" | "h" | "help" => return Command::Help,
            _ => {}
        }
    }

    let ids: Option<BTreeSet<String>> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .flat_map(|token| token.chars())
        .map(|c| c.is_ascii_alphabetic().then(|| c.to_ascii_uppercase().to_string()))
        .collect();

    match ids {
        Some(ids) if !ids.is_empty() => Command::Answer(ids),
        _ => Command::Unknown,
    }
}

/// Shape the typed ids into the selection kind `question` expects.
fn to_selection(question: &Question, ids: BTreeSet<String>) -> Option<Selection> {
    if question.is_multi_select() {
        return Some(Selection::Multiple(ids));
    }
    let mut iter = ids.into_iter();
    match (iter.next(), iter.next()) {
        (Some(id), None) => Some(Selection::Single(id)),
        _ => None,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    bank_path: Option<PathBuf>,
    block: Option<BlockFilter>,
    count: Option<usize>,
    feedback: Option<FeedbackMode>,
    seed: Option<u64>,
    show_review: bool,
    json: bool,
    markdown: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank_path = resolve_bank_path(bank_path, &config)?;
    let bank = load_bank(&bank_path)?.questions;
    anyhow::ensure!(
        !bank.is_empty(),
        "no valid questions found in {}",
        bank_path.display()
    );

    let block = block.unwrap_or(config.default_block);
    let feedback = feedback.unwrap_or(config.default_feedback);
    let requested = count.unwrap_or(config.default_count);

    let pool = parser::pool_size(&bank, block);
    anyhow::ensure!(pool > 0, "no questions in block {block}");
    let number_of_questions = requested.clamp(1, pool);
    if number_of_questions != requested {
        tracing::warn!(
            "{requested} questions requested, using {number_of_questions} (block {block} has {pool})"
        );
    }

    let mut quiz_config = QuizConfig::new(block, number_of_questions, feedback)?;
    let certification = config
        .default_certification
        .as_deref()
        .and_then(|id| config.certification(id));
    if let Some(cert) = certification {
        quiz_config = quiz_config.with_certification(cert.id.clone());
    }

    let mut session = QuizSession::new();
    match seed {
        Some(seed) => {
            session.start_with_rng(quiz_config, &bank, &mut StdRng::seed_from_u64(seed))
        }
        None => session.start(quiz_config, &bank),
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(
        out,
        "Starting quiz: {} questions (block {block}, feedback {feedback})",
        session.len()
    )?;
    writeln!(out, "Type ? for help.\n")?;

    run_interactive(&mut session, stdin.lock(), &mut out, feedback)?;
    session.finish();

    print_results(&mut out, &session, certification)?;
    if show_review {
        print_review(&mut out, &session)?;
    }
    if let Some(report) = SessionReport::from_session(&session) {
        if json {
            writeln!(out, "{}", report.to_json()?)?;
        } else if markdown {
            write!(out, "{}", report.to_markdown())?;
        }
    }

    Ok(())
}

/// Drive `session` from `input` until the user finishes or input runs out.
fn run_interactive<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    out: &mut W,
    feedback: FeedbackMode,
) -> Result<()> {
    let total = session.len();
    let mut line = String::new();

    loop {
        let Some(question) = session.current_question().cloned() else {
            break;
        };
        print_question(out, session, &question, total)?;
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_command(&line, &question) {
            Command::Next => {
                if !session.next() {
                    writeln!(out, "This is the last question. Type f to finish.")?;
                }
            }
            Command::Prev => {
                if !session.prev() {
                    writeln!(out, "This is the first question.")?;
                }
            }
            Command::Finish => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Unknown => writeln!(out, "Unrecognized input. Type ? for help.")?,
            Command::Answer(ids) => {
                let Some(selection) = to_selection(&question, ids) else {
                    writeln!(out, "This question takes a single answer.")?;
                    continue;
                };
                let was_locked = session.is_locked(&question.id);
                match session.try_answer(selection) {
                    Ok(answer) if was_locked => {
                        writeln!(out, "Already answered: {}", answer.selection)?;
                    }
                    Ok(answer) => match feedback {
                        FeedbackMode::Immediate if answer.is_correct => {
                            writeln!(out, "Correct!")?;
                            print_explanation(out, &question)?;
                        }
                        FeedbackMode::Immediate => {
                            writeln!(
                                out,
                                "Incorrect. Correct answer: {}",
                                question.correct_ids().join(", ")
                            )?;
                            print_explanation(out, &question)?;
                        }
                        FeedbackMode::End => writeln!(out, "Answer recorded.")?,
                    },
                    Err(e) => {
                        writeln!(out, "Ignored: {e}")?;
                        continue;
                    }
                }
                if !session.next() {
                    writeln!(
                        out,
                        "That was the last question. Type f to finish or p to go back."
                    )?;
                }
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

fn print_question<W: Write>(
    out: &mut W,
    session: &QuizSession,
    question: &Question,
    total: usize,
) -> io::Result<()> {
    let block = if question.block_id == 0 {
        String::new()
    } else {
        format!(" [block {}]", question.block_id)
    };
    writeln!(
        out,
        "Question {}/{}{block}",
        session.current_index() + 1,
        total
    )?;
    writeln!(out, "{}", question.text)?;
    for url in &question.image_urls {
        writeln!(out, "  (image: {url})")?;
    }
    if question.is_multi_select() {
        writeln!(out, "  (select all that apply)")?;
    }
    for option in &question.options {
        writeln!(out, "  {}) {}", option.id, option.text)?;
    }
    if let Some(answer) = session.answer_for(&question.id) {
        writeln!(out, "  You answered: {}", answer.selection)?;
    }
    Ok(())
}

fn print_explanation<W: Write>(out: &mut W, question: &Question) -> io::Result<()> {
    if let Some(explanation) = &question.explanation {
        writeln!(out, "  {explanation}")?;
    }
    Ok(())
}

fn print_results<W: Write>(
    out: &mut W,
    session: &QuizSession,
    certification: Option<&Certification>,
) -> Result<()> {
    let score = session.score();
    writeln!(
        out,
        "Score: {} / {} ({:.1}%)",
        score.correct,
        score.total,
        score.percentage()
    )?;

    let blocks = block_breakdown(session);
    if blocks.len() > 1 || certification.is_some() {
        let mut table = Table::new();
        table.set_header(vec!["Block", "Name", "Correct", "Total", "%"]);
        for (block, block_score) in &blocks {
            let name = certification
                .and_then(|c| c.block_name(*block))
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(block),
                Cell::new(name),
                Cell::new(block_score.correct),
                Cell::new(block_score.total),
                Cell::new(format!("{:.1}%", block_score.percentage())),
            ]);
        }
        writeln!(out, "{table}")?;
    }
    Ok(())
}

fn print_review<W: Write>(out: &mut W, session: &QuizSession) -> Result<()> {
    for item in review(session) {
        let mark = match item.outcome {
            ReviewOutcome::Correct => "correct",
            ReviewOutcome::Incorrect => "incorrect",
            ReviewOutcome::Unanswered => "unanswered",
        };
        writeln!(out, "\n{}. {} [{mark}]", item.position, item.question.text)?;
        for option in &item.question.options {
            let correct = item.question.is_correct_option(&option.id);
            let chosen = item
                .answer
                .as_ref()
                .is_some_and(|a| a.selection.contains(&option.id));
            let tag = match (correct, chosen) {
                (true, true) => "  <- correct, your answer",
                (true, false) => "  <- correct",
                (false, true) => "  <- your answer",
                (false, false) => "",
            };
            writeln!(out, "  {}) {}{tag}", option.id, option.text)?;
        }
        print_explanation(out, &item.question)?;
    }
    Ok(())
}

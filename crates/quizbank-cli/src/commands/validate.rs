//! The `quizbank validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizbank_core::parser;

use crate::bank::load_bank;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let outcome = load_bank(&bank_path)?;

    println!(
        "Question bank: {} ({} questions)",
        bank_path.display(),
        outcome.questions.len()
    );

    let counts = parser::block_counts(&outcome.questions);
    if !counts.is_empty() {
        let multi = outcome
            .questions
            .iter()
            .filter(|q| q.is_multi_select())
            .count();
        let mut table = Table::new();
        table.set_header(vec!["Block", "Questions"]);
        for (block, count) in &counts {
            let label = if *block == 0 {
                "0 (unassigned)".to_string()
            } else {
                block.to_string()
            };
            table.add_row(vec![label, count.to_string()]);
        }
        println!("{table}");
        if multi > 0 {
            println!("{multi} multi-select question(s)");
        }
    }

    for rejected in &outcome.rejected {
        let text = rejected
            .text
            .as_deref()
            .map(|t| format!(" \"{}\"", truncate(t, 60)))
            .unwrap_or_default();
        println!(
            "  [line {}] WARNING:{text} {}",
            rejected.line, rejected.reason
        );
    }

    if outcome.questions.is_empty() {
        anyhow::bail!("no valid questions found in {}", bank_path.display());
    }

    if outcome.rejected.is_empty() {
        println!("All question blocks valid.");
    } else {
        println!("\n{} block(s) skipped.", outcome.rejected.len());
    }

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

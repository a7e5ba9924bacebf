//! Reading question banks from disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizbank_core::parser::{self, ParseOutcome};

use crate::config::QuizbankConfig;

/// Read and parse a question bank file, keeping the parser diagnostics.
pub fn load_bank(path: &Path) -> Result<ParseOutcome> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;
    let outcome = parser::parse_with_diagnostics(&raw);

    tracing::debug!(
        "loaded {} questions from {} ({} blocks dropped)",
        outcome.questions.len(),
        path.display(),
        outcome.rejected.len()
    );
    if !outcome.rejected.is_empty() {
        tracing::warn!(
            "{}: skipped {} malformed question block(s); run `quizbank validate` for details",
            path.display(),
            outcome.rejected.len()
        );
    }
    Ok(outcome)
}

/// Pick the bank path from the command line or the config.
pub fn resolve_bank_path(arg: Option<PathBuf>, config: &QuizbankConfig) -> Result<PathBuf> {
    arg.or_else(|| config.default_bank.clone()).context(
        "no question bank given; pass --bank or set default_bank in quizbank.toml",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_bank_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.txt");
        std::fs::write(&path, "Q: one?\nA) *yes\nB) no\n\nQ: broken\nA) *x\n").unwrap();

        let outcome = load_bank(&path).unwrap();
        assert_eq!(outcome.questions.len(), 1);
        assert_eq!(outcome.rejected.len(), 1);
    }

    #[test]
    fn missing_file_has_context() {
        let err = load_bank(Path::new("no-such-bank.txt")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read question bank"));
    }

    #[test]
    fn bank_path_prefers_argument() {
        let config = QuizbankConfig {
            default_bank: Some(PathBuf::from("from-config.txt")),
            ..Default::default()
        };
        assert_eq!(
            resolve_bank_path(Some(PathBuf::from("arg.txt")), &config).unwrap(),
            PathBuf::from("arg.txt")
        );
        assert_eq!(
            resolve_bank_path(None, &config).unwrap(),
            PathBuf::from("from-config.txt")
        );
        assert!(resolve_bank_path(None, &QuizbankConfig::default()).is_err());
    }
}

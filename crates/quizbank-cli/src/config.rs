//! quizbank configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizbank_core::model::{BlockFilter, BlockInfo, Certification, FeedbackMode};

/// Top-level quizbank configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizbankConfig {
    /// Question bank used when `--bank` is not given.
    #[serde(default)]
    pub default_bank: Option<PathBuf>,
    /// Certification whose block names are shown.
    #[serde(default)]
    pub default_certification: Option<String>,
    /// Block drawn from when `--block` is not given.
    #[serde(default)]
    pub default_block: BlockFilter,
    /// Questions per session when `--count` is not given.
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default)]
    pub default_feedback: FeedbackMode,
    /// Known certifications and their block names.
    #[serde(default = "builtin_certifications")]
    pub certifications: Vec<Certification>,
}

fn default_count() -> usize {
    10
}

impl Default for QuizbankConfig {
    fn default() -> Self {
        Self {
            default_bank: None,
            default_certification: None,
            default_block: BlockFilter::All,
            default_count: default_count(),
            default_feedback: FeedbackMode::Immediate,
            certifications: builtin_certifications(),
        }
    }
}

impl QuizbankConfig {
    pub fn certification(&self, id: &str) -> Option<&Certification> {
        self.certifications
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(id))
    }
}

fn block(id: u32, name: &str) -> BlockInfo {
    BlockInfo {
        id,
        name: name.to_string(),
        description: None,
        question_count_hint: None,
    }
}

fn builtin_certifications() -> Vec<Certification> {
    vec![
        Certification {
            id: "gh300".into(),
            title: "GH-300 - GitHub Copilot".into(),
            blocks: vec![
                block(1, "Responsible AI (7%)"),
                block(2, "GitHub Copilot plans and features (31%)"),
                block(3, "How GitHub Copilot works and handles data (15%)"),
                block(4, "Prompt Crafting and Prompt Engineering (9%)"),
                block(5, "Developer use cases for AI (14%)"),
                block(6, "Testing with GitHub Copilot (9%)"),
                block(7, "Privacy fundamentals and context exclusions (15%)"),
            ],
        },
        Certification {
            id: "togaf10".into(),
            title: "TOGAF 10 - Foundation".into(),
            blocks: vec![
                block(1, "Concepts"),
                block(2, "Introduction to the ADM"),
                block(3, "Introduction to ADM Techniques"),
                block(4, "Introduction to Applying the ADM"),
                block(5, "Introduction to Architecture Governance"),
                block(6, "Architecture Content"),
            ],
        },
    ]
}

/// Expand `${VAR}` references in a bank path. Unset variables expand to
/// nothing; expanded values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut expanded = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find("${") {
        let Some(close) = rest[open + 2..].find('}') else {
            break;
        };
        let name = &rest[open + 2..open + 2 + close];
        expanded.push_str(&rest[..open]);
        expanded.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[open + 3 + close..];
    }
    expanded.push_str(rest);
    expanded
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizbank.toml` in the current directory
/// 2. `~/.config/quizbank/config.toml`
///
/// `QUIZBANK_BANK` overrides `default_bank`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizbankConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizbank.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizbankConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizbankConfig::default(),
    };

    if let Ok(bank) = std::env::var("QUIZBANK_BANK") {
        if !bank.is_empty() {
            config.default_bank = Some(PathBuf::from(bank));
        }
    }

    config.default_bank = config
        .default_bank
        .map(|p| PathBuf::from(resolve_env_vars(&p.to_string_lossy())));

    if config.default_count == 0 {
        tracing::warn!("default_count must be at least 1, using {}", default_count());
        config.default_count = default_count();
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizbank"))
}

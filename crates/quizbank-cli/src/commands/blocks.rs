//! The `quizbank blocks` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use quizbank_core::parser;

use crate::bank::{load_bank, resolve_bank_path};
use crate::config::load_config_from;

pub fn execute(
    bank_path: Option<PathBuf>,
    certification: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let cert_id = certification.or_else(|| config.default_certification.clone());
    let cert = match cert_id.as_deref() {
        Some(id) => Some(config.certification(id).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown certification '{id}'. Available: {:?}",
                config
                    .certifications
                    .iter()
                    .map(|c| c.id.as_str())
                    .collect::<Vec<_>>()
            )
        })?),
        None => None,
    };

    let bank_path = resolve_bank_path(bank_path, &config).ok();
    let counts = match &bank_path {
        Some(path) => Some(parser::block_counts(&load_bank(path)?.questions)),
        None => None,
    };

    if cert.is_none() && counts.is_none() {
        anyhow::bail!("nothing to list; pass --bank and/or --certification");
    }

    if let Some(cert) = cert {
        println!("{} ({})", cert.title, cert.id);
    }

    let mut ids: Vec<u32> = cert
        .map(|c| c.blocks.iter().map(|b| b.id).collect())
        .unwrap_or_default();
    if let Some(counts) = &counts {
        ids.extend(counts.keys().copied());
    }
    ids.sort_unstable();
    ids.dedup();

    let mut table = Table::new();
    let mut header = vec!["Block", "Name"];
    if counts.is_some() {
        header.push("Questions");
    }
    table.set_header(header);

    for id in ids {
        let name = cert
            .and_then(|c| c.block_name(id))
            .unwrap_or(if id == 0 { "Unassigned" } else { "" })
            .to_string();
        let mut row = vec![id.to_string(), name];
        if let Some(counts) = &counts {
            row.push(counts.get(&id).copied().unwrap_or(0).to_string());
        }
        table.add_row(row);
    }

    println!("{table}");
    Ok(())
}

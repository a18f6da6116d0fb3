//! `markov convert`: rewrite a model at the current or legacy format.

use std::path::Path;

use anyhow::{Context, Result};
use markov_pgmx::PgmxWriter;

use super::load_model;

pub fn run(model: &Path, output: &Path, legacy: bool) -> Result<()> {
    let loaded = load_model(model, None)?;
    let writer = if legacy {
        PgmxWriter::legacy()
    } else {
        PgmxWriter::new()
    };
    writer
        .save(output, &loaded.network, &loaded.evidence)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Converted {} ({}) to {} ({})",
        model.display(),
        loaded.format_version,
        output.display(),
        writer.version()
    );
    Ok(())
}

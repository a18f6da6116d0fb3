//! `markov invert-link`: reverse one link and write the model back.

use std::path::Path;

use anyhow::{Context, Result};
use markov_edit::{InvertLinkEdit, NetworkEditor};
use markov_pgmx::PgmxWriter;
use tracing::info;

use super::load_model;

/// Invert `parent -> child` in the model at `model` and save the result to
/// `output`, or over the model itself.
pub fn run(model: &Path, parent: &str, child: &str, output: Option<&Path>) -> Result<()> {
    let loaded = load_model(model, None)?;
    let mut editor = NetworkEditor::new(loaded.network);
    editor.apply(InvertLinkEdit::new(parent, child, true))?;
    let target = output.unwrap_or(model);
    PgmxWriter::new()
        .save(target, editor.network(), &loaded.evidence)
        .with_context(|| format!("writing {}", target.display()))?;
    info!(parent, child, output = %target.display(), "link inverted");
    println!("Inverted {parent} -> {child}; wrote {}", target.display());
    Ok(())
}

//! Reading lines from disk, as stored JSON or as script notation.

use anyhow::{anyhow, bail, Context, Result};
use epistle_config::Document;
use epistle_core::EpistleLine;
use std::path::Path;

/// Reads `path` into a [`Document`]. `.json` files hold one line or an array of lines and get
/// default settings; anything else is parsed as a script.
pub fn read(path: &Path) -> Result<Document> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document = if is_json {
        from_json(&source).with_context(|| format!("invalid line JSON in {}", path.display()))?
    } else {
        epistle_config::load(&source).map_err(|err| {
            anyhow!("{}\n{}", err, err.report(&source))
                .context(format!("failed to load {}", path.display()))
        })?
    };

    tracing::debug!(path = %path.display(), lines = document.lines.len(), "read document");
    Ok(document)
}

fn from_json(source: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(source)?;
    let lines = if value.is_array() {
        serde_json::from_value::<Vec<EpistleLine>>(value)?
    } else {
        vec![serde_json::from_value::<EpistleLine>(value)?]
    };
    Ok(Document {
        lines,
        ..Document::default()
    })
}

/// The line named `id`, or the document's default line.
pub fn select_line<'a>(document: &'a Document, id: Option<&str>) -> Result<&'a EpistleLine> {
    match id {
        Some(id) => document.line(id).ok_or_else(|| {
            let known: Vec<&str> = document.lines.iter().map(|l| l.line_id.as_str()).collect();
            anyhow!("no line named '{id}' (lines: {})", known.join(", "))
        }),
        None => match document.default_line() {
            Some(line) => Ok(line),
            None => bail!("document has no lines"),
        },
    }
}

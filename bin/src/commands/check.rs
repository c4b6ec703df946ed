use crate::{cli::CheckArgs, loader};
use anyhow::{bail, Result};
use epistle_config::Document;
use epistle_core::compile;

pub fn run(args: CheckArgs) -> Result<()> {
    let document = loader::read(&args.file)?;
    let problems = problems(&document);
    for problem in &problems {
        eprintln!("{}: {problem}", args.file.display());
    }
    if !problems.is_empty() {
        bail!("{} line(s) can't be played", problems.len());
    }

    println!("{}: {} line(s) ok", args.file.display(), document.lines.len());
    Ok(())
}

/// Lines that won't compile. Scripts are validated on load; stored JSON is not.
pub fn problems(document: &Document) -> Vec<String> {
    document
        .lines
        .iter()
        .filter_map(|line| {
            compile(&line.line)
                .err()
                .map(|err| format!("line '{}': {err}", line.line_id))
        })
        .collect()
}

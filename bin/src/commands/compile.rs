use crate::{cli::CompileArgs, loader};
use anyhow::{Context, Result};
use epistle_core::{compile, ExecutionQueue};
use std::io::{self, Write};

pub fn run(args: CompileArgs) -> Result<()> {
    let document = loader::read(&args.file)?;
    let line = loader::select_line(&document, args.line.as_deref())?;
    let queue = compile(&line.line)
        .with_context(|| format!("line '{}' doesn't compile", line.line_id))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        write_json(&mut out, &queue)
    } else {
        write_table(&mut out, &queue)
    }
}

pub fn write_json<W: Write>(out: &mut W, queue: &ExecutionQueue) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, queue)?;
    writeln!(out)?;
    Ok(())
}

/// One row per operation, then the total time the line takes to reveal.
pub fn write_table<W: Write>(out: &mut W, queue: &ExecutionQueue) -> Result<()> {
    writeln!(out, "{:>4}  {:<6} {:>8}  {:<10} body", "#", "key", "timeout", "effect")?;
    for (index, op) in queue.iter().enumerate() {
        writeln!(
            out,
            "{:>4}  {:<6} {:>6}ms  {:<10} {:?}",
            index,
            op.key.to_string(),
            op.timeout.as_millis(),
            op.effect.as_str(),
            op.body.as_str()
        )?;
    }

    let revealed_after = queue.total_duration()
        - queue
            .get(queue.len().saturating_sub(1))
            .map(|last| last.timeout)
            .unwrap_or_default();
    writeln!(
        out,
        "{} operations, fully revealed after {}ms",
        queue.len(),
        revealed_after.as_millis()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use epistle_core::test::fixtures;

    #[test]
    fn table_has_a_row_per_operation() {
        let queue = compile(&fixtures::hi_a()).unwrap();
        let mut out = Vec::new();
        write_table(&mut out, &queue).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), queue.len() + 2);
        assert!(lines[1].contains("0.0") && lines[1].contains("\"Hi\""), "{}", lines[1]);
        assert!(lines[2].contains("\" \""), "{}", lines[2]);
        assert!(lines[3].contains("125ms"), "{}", lines[3]);
        assert_eq!(lines[4], "3 operations, fully revealed after 500ms");
    }

    #[test]
    fn empty_queue_table() {
        let mut out = Vec::new();
        write_table(&mut out, &ExecutionQueue::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("0 operations, fully revealed after 0ms\n"));
    }

    #[test]
    fn json_lists_operations() {
        let queue = compile(&fixtures::hi_a()).unwrap();
        let mut out = Vec::new();
        write_json(&mut out, &queue).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let ops = value.as_array().unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0]["body"], "Hi");
        assert_eq!(ops[0]["timeoutMs"], 250);
        assert_eq!(ops[1]["effect"], "NONE");
        assert_eq!(ops[2]["key"]["atom"], 1);
    }
}

//! Schedule writers: the contractual CSV writer (§6) and the auxiliary
//! JSON writer supplementing the original's empty `to_json` stub (§6.2).

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::SimError;
use crate::event::Event;

/// One retired row, shared by both writers.
#[derive(Serialize)]
struct Row {
    index: usize,
    instr: String,
    issue: u64,
    start: u64,
    complete: u64,
    writeback: u64,
    result: String,
}

fn row(event: &Event) -> Row {
    Row {
        index: event.index,
        instr: event.instr.risc_string(),
        issue: event.issue,
        start: event.start,
        complete: event.complete,
        writeback: event.writeback,
        result: format!("{:.6}", event.result),
    }
}

/// Writes the contractual no-header CSV: `index,instr,issue,start,complete,writeback,result`.
pub fn write_csv(path: &Path, retired: &[Event]) -> Result<(), SimError> {
    let mut file =
        std::fs::File::create(path).map_err(|e| SimError::OutputWrite(e.to_string()))?;
    for event in retired {
        let r = row(event);
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            r.index, r.instr, r.issue, r.start, r.complete, r.writeback, r.result
        )
        .map_err(|e| SimError::OutputWrite(e.to_string()))?;
    }
    Ok(())
}

/// Writes the same retired rows as a JSON array of objects, supplementing
/// the original implementation's unfinished `to_json` (§6.2). Auxiliary:
/// gated behind `--json`, not part of the CSV contract.
pub fn write_json(path: &Path, retired: &[Event]) -> Result<(), SimError> {
    let rows: Vec<Row> = retired.iter().map(row).collect();
    let file = std::fs::File::create(path).map_err(|e| SimError::OutputWrite(e.to_string()))?;
    serde_json::to_writer_pretty(file, &rows).map_err(|e| SimError::OutputWrite(e.to_string()))
}

//! PGN output and input: the tag/movetext formatter, a parser for the
//! files this tool emits, and the database-to-file exporter.

pub mod exporter;
pub mod parser;
pub mod writer;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;

use writer::PgnWriter;

pub use exporter::{ExportStats, PgnExporter};

/// Concatenates PGN inputs into `writer`. Directories are walked
/// recursively for `.pgn` files; unreadable entries are skipped with a
/// warning. Returns the number of games written.
pub fn merge_files<W: Write>(inputs: &[PathBuf], writer: &mut PgnWriter<W>) -> Result<usize> {
    let mut paths = Vec::new();
    for input in inputs {
        collect_pgn_paths(input, &mut paths);
    }

    let mut merged = 0;
    for path in paths {
        match parser::parse_file(&path) {
            Ok(games) => {
                writer.write_many(&games)?;
                merged += games.len();
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable input");
            }
        }
    }
    Ok(merged)
}

fn collect_pgn_paths(input: &Path, out: &mut Vec<PathBuf>) {
    if input.is_dir() {
        let entries = match fs::read_dir(input) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %input.display(), error = %err, "skipping unreadable directory");
                return;
            }
        };
        for entry in entries.flatten() {
            collect_pgn_paths(&entry.path(), out);
        }
        return;
    }

    if input.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pgn")) {
        out.push(input.to_path_buf());
    } else {
        tracing::debug!(path = %input.display(), "skipping non-pgn file");
    }
}

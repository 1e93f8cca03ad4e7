use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::chessbase::{ChessBaseDatabase, ErrorClass};

use super::writer::PgnWriter;

/// Streams games out of a ChessBase database into a PGN file, skipping
/// what cannot be decoded and counting why.
pub struct PgnExporter {
    max_games: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportStats {
    /// Games written to the output.
    pub exported: usize,
    /// Records outside the supported subset (non-games, deleted, encoded).
    pub skipped: usize,
    /// Records that failed structurally or semantically.
    pub errors: usize,
}

impl PgnExporter {
    pub fn new() -> Self {
        PgnExporter { max_games: 0 }
    }

    /// Caps the number of exported games; 0 means all.
    pub fn with_max_games(mut self, max_games: usize) -> Self {
        self.max_games = max_games;
        self
    }

    pub fn export(&self, db: &ChessBaseDatabase, output: &Path) -> Result<ExportStats> {
        let file = File::create(output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        let mut writer = PgnWriter::new(BufWriter::new(file));

        let mut stats = ExportStats::default();

        for index in 0..db.num_records() {
            if self.max_games > 0 && stats.exported >= self.max_games {
                break;
            }

            match db.extract_game(index) {
                Ok(game) => {
                    writer
                        .write_one(&game)
                        .with_context(|| format!("failed to write game {index}"))?;
                    stats.exported += 1;
                }
                Err(err) => match err.class() {
                    ErrorClass::Fatal => {
                        return Err(anyhow::Error::new(err)
                            .context(format!("record {index} is unrecoverable")));
                    }
                    ErrorClass::Unsupported => {
                        debug!(index, error = %err, "skipping record");
                        stats.skipped += 1;
                    }
                    ErrorClass::Structural | ErrorClass::Semantic => {
                        warn!(index, error = %err, "failed to decode record");
                        stats.errors += 1;
                    }
                },
            }
        }

        writer.flush()?;
        info!(
            exported = stats.exported,
            skipped = stats.skipped,
            errors = stats.errors,
            "export finished"
        );
        Ok(stats)
    }
}

impl Default for PgnExporter {
    fn default() -> Self {
        Self::new()
    }
}

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cbtopgn::chessbase::ChessBaseDatabase;
use cbtopgn::pgn::writer::PgnWriter;
use cbtopgn::pgn::{self, PgnExporter};
use cbtopgn::query::Query;

#[derive(Parser)]
#[command(name = "cbtopgn")]
#[command(about = "Convert ChessBase databases to PGN and query PGN collections")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a ChessBase database (.cbh/.cbp/.cbt/.cbg) to a PGN file
    Convert {
        /// Path to the database: any of the four files, or their shared basename
        database: PathBuf,

        /// Output PGN file (defaults to the database name with .pgn)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,

        /// Maximum number of games to export (0 = all games)
        #[arg(long, default_value_t = 0)]
        max_games: usize,
    },
    /// Filter a PGN file by metadata conditions into a new file
    Query {
        /// PGN file to filter
        input: PathBuf,

        /// Conditions such as "player=carlsen,elo>2700"
        query: String,

        /// Output PGN file (defaults to the input name with .match.pgn)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Concatenate PGN files (or directories of them) into one file
    Merge {
        /// PGN files or directories to merge
        inputs: Vec<PathBuf>,

        /// Output PGN file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Command::Convert {
            database,
            output,
            force,
            max_games,
        } => convert(database, output, force, max_games),
        Command::Query {
            input,
            query,
            output,
        } => run_query(input, &query, output),
        Command::Merge { inputs, output } => merge(&inputs, output),
    }
}

fn convert(
    database: PathBuf,
    output: Option<PathBuf>,
    force: bool,
    max_games: usize,
) -> Result<()> {
    let output = output.unwrap_or_else(|| database.with_extension("pgn"));
    if output.exists() && !force {
        bail!(
            "output file {} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let start = Instant::now();
    let db = ChessBaseDatabase::load(&database)
        .with_context(|| format!("failed to load database {}", database.display()))?;
    info!(
        signature = db.signature().describe(),
        records = db.num_records(),
        "loaded database"
    );

    let stats = PgnExporter::new()
        .with_max_games(max_games)
        .export(&db, &output)?;

    info!(
        games = stats.exported,
        output = %output.display(),
        elapsed = ?start.elapsed(),
        "conversion finished"
    );
    Ok(())
}

fn run_query(input: PathBuf, query: &str, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| input.with_extension("match.pgn"));
    let query = Query::parse(query)?;

    let start = Instant::now();
    let games = pgn::parser::parse_file(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let file = File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = PgnWriter::new(BufWriter::new(file));

    let mut matched = 0;
    for game in &games {
        match query.matches(game) {
            Ok(true) => {
                writer.write_one(game)?;
                matched += 1;
            }
            Ok(false) => {}
            Err(err) => tracing::warn!(error = %err, "failed to evaluate game"),
        }
    }
    writer.flush()?;

    info!(
        matched,
        total = games.len(),
        output = %output.display(),
        elapsed = ?start.elapsed(),
        "query finished"
    );
    Ok(())
}

fn merge(inputs: &[PathBuf], output: PathBuf) -> Result<()> {
    if inputs.is_empty() {
        bail!("nothing to merge: pass at least one PGN file or directory");
    }

    let start = Instant::now();
    let file = File::create(&output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    let mut writer = PgnWriter::new(BufWriter::new(file));

    let merged = pgn::merge_files(inputs, &mut writer)?;
    writer.flush()?;

    info!(
        merged,
        output = %output.display(),
        elapsed = ?start.elapsed(),
        "merge finished"
    );
    Ok(())
}

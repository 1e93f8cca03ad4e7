use std::fs;
use std::io;
use std::path::Path;

use crate::game::Game;

/// Reads a PGN file into games, splitting on `[Event "` boundaries.
pub fn parse_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<Game>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_games(&content))
}

pub fn parse_games(content: &str) -> Vec<Game> {
    content
        .split("[Event \"")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| game_from_text(&format!("[Event \"{chunk}")))
        .collect()
}

/// Reads one game's tag pairs and move lines. Unknown tags are ignored;
/// unparsable Elo values become `-1`.
pub fn game_from_text(text: &str) -> Game {
    let mut game = Game::default();
    let mut moves = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let inner = &line[1..line.len() - 1];
            let Some((key, raw)) = inner.split_once(' ') else {
                continue;
            };
            let value = raw.trim().trim_start_matches('"').trim_end_matches('"');

            match key {
                "Event" => game.event = value.to_string(),
                "Site" => game.site = value.to_string(),
                "Date" => game.date = value.to_string(),
                "Round" => game.round = value.to_string(),
                "White" => game.white = value.to_string(),
                "Black" => game.black = value.to_string(),
                "Result" => game.result = value.to_string(),
                "WhiteElo" => game.white_elo = value.parse().unwrap_or(-1),
                "BlackElo" => game.black_elo = value.parse().unwrap_or(-1),
                "ECO" => game.eco = value.to_string(),
                "EventDate" => game.event_date = value.to_string(),
                "Source" => game.source = value.to_string(),
                "FEN" => game.fen = value.to_string(),
                _ => {}
            }
        } else {
            moves.push(line);
        }
    }

    game.moves = moves.join(" ");
    game
}

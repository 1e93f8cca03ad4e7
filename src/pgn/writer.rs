use std::io::{self, Write};

use crate::game::Game;

/// Formats `Game` values as PGN onto any writer.
///
/// The seven standard tags are always present; ratings, EventDate, ECO,
/// Source and FEN appear only when set, and a FEN tag brings `[SetUp "1"]`
/// with it.
pub struct PgnWriter<W: Write> {
    out: W,
}

impl<W: Write> PgnWriter<W> {
    pub fn new(out: W) -> Self {
        PgnWriter { out }
    }

    pub fn write_one(&mut self, game: &Game) -> io::Result<()> {
        self.out.write_all(format_game(game).as_bytes())
    }

    pub fn write_many(&mut self, games: &[Game]) -> io::Result<()> {
        for game in games {
            self.write_one(game)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn format_game(game: &Game) -> String {
    let mut text = String::new();

    tag(&mut text, "Event", &game.event);
    tag(&mut text, "Site", &game.site);
    tag(&mut text, "Date", &game.date);
    tag(&mut text, "Round", &game.round);
    tag(&mut text, "White", &game.white);
    tag(&mut text, "Black", &game.black);
    tag(&mut text, "Result", &game.result);

    if game.white_elo > 0 {
        tag(&mut text, "WhiteElo", &game.white_elo.to_string());
    }
    if game.black_elo > 0 {
        tag(&mut text, "BlackElo", &game.black_elo.to_string());
    }
    if !game.event_date.is_empty() {
        tag(&mut text, "EventDate", &game.event_date);
    }
    if !game.eco.is_empty() {
        tag(&mut text, "ECO", &game.eco);
    }
    if !game.fen.is_empty() {
        tag(&mut text, "SetUp", "1");
        tag(&mut text, "FEN", &game.fen);
    }
    if !game.source.is_empty() {
        tag(&mut text, "Source", &game.source);
    }

    text.push('\n');
    text.push_str(&game.moves);
    text.push_str("\n\n");
    text
}

fn tag(out: &mut String, name: &str, value: &str) {
    out.push('[');
    out.push_str(name);
    out.push_str(" \"");
    out.push_str(value);
    out.push_str("\"]\n");
}

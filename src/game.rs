/// A single chess game: the PGN tag values plus the SAN move text.
///
/// `fen` is set only for games that start from a non-initial position.
/// `moves` holds the whitespace-separated move text, terminated with the
/// result token. Elo fields are `0` when the rating is unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Game {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,
    pub white_elo: i32,
    pub black_elo: i32,
    pub eco: String,
    pub event_date: String,
    pub source: String,
    pub fen: String,
    pub moves: String,
}

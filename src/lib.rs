//! ChessBase to PGN converter library.
//!
//! Reads the proprietary four-file ChessBase database format
//! (`.cbh`/`.cbp`/`.cbt`/`.cbg`), reconstructs each game's move text from
//! the binary encoding, and exports PGN. Also provides a PGN parser and a
//! metadata query engine over PGN collections.

pub mod chessbase;
pub mod game;
pub mod pgn;
pub mod query;

pub use chessbase::ChessBaseDatabase;
pub use game::Game;

//! FEN synthesis for decoded start positions, plus the two field readers
//! the move decoder needs.

use super::board::{file_char, Chessboard};
use super::error::DecodeError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_short: bool,
    pub white_long: bool,
    pub black_short: bool,
    pub black_long: bool,
}

impl CastlingRights {
    fn any(self) -> bool {
        self.white_short || self.white_long || self.black_short || self.black_long
    }
}

/// Renders the six FEN fields for a reconstructed position.
///
/// `ep_file` is 1-based, 0 meaning none; the en-passant rank follows from
/// the side to move (a double step by white leaves a rank-3 target and it
/// is black's turn). The halfmove clock is not recoverable from the setup
/// block and is always written as 0.
pub fn position_to_fen(
    board: &Chessboard,
    ep_file: u8,
    black_to_move: bool,
    castling: CastlingRights,
    next_move_no: u32,
) -> Result<String, DecodeError> {
    let mut fen = String::new();

    for rank in (0..8).rev() {
        let mut empty_run = 0;
        for file in 0..8 {
            match board.piece_at(file, rank) {
                None => empty_run += 1,
                Some(piece) => {
                    if empty_run > 0 {
                        fen.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    fen.push(piece.kind.fen_char());
                }
            }
        }
        if empty_run > 0 {
            fen.push_str(&empty_run.to_string());
        }
        if rank > 0 {
            fen.push('/');
        }
    }

    fen.push_str(if black_to_move { " b " } else { " w " });

    if castling.any() {
        if castling.white_short {
            fen.push('K');
        }
        if castling.white_long {
            fen.push('Q');
        }
        if castling.black_short {
            fen.push('k');
        }
        if castling.black_long {
            fen.push('q');
        }
    } else {
        fen.push('-');
    }

    match ep_file {
        0 => fen.push_str(" -"),
        1..=8 => {
            fen.push(' ');
            fen.push(file_char(ep_file as usize - 1));
            fen.push(if black_to_move { '3' } else { '6' });
        }
        other => return Err(DecodeError::UnknownEpFile(other)),
    }

    fen.push_str(&format!(" 0 {next_move_no}"));
    Ok(fen)
}

/// Reads the side-to-move field of a FEN string.
pub fn is_white_turn(fen: &str) -> Result<bool, DecodeError> {
    match fen.split_whitespace().nth(1) {
        Some("w") => Ok(true),
        Some("b") => Ok(false),
        other => Err(DecodeError::BadFen(format!(
            "side to move is {:?}",
            other.unwrap_or("")
        ))),
    }
}

/// Reads the fullmove-number field (the last one) of a FEN string.
pub fn move_number(fen: &str) -> Result<u32, DecodeError> {
    let last = fen
        .split_whitespace()
        .last()
        .ok_or_else(|| DecodeError::BadFen("empty".to_string()))?;
    last.parse()
        .map_err(|_| DecodeError::BadFen(format!("move number is {last:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_round_trips() {
        let board = Chessboard::initial();
        let castling = CastlingRights {
            white_short: true,
            white_long: true,
            black_short: true,
            black_long: true,
        };
        let fen = position_to_fen(&board, 0, false, castling, 1).unwrap();
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn en_passant_rank_follows_side_to_move() {
        let board = Chessboard::initial();
        let fen = position_to_fen(&board, 5, true, CastlingRights::default(), 3).unwrap();
        assert!(fen.ends_with(" b - e3 0 3"), "{fen}");

        let fen = position_to_fen(&board, 1, false, CastlingRights::default(), 9).unwrap();
        assert!(fen.ends_with(" w - a6 0 9"), "{fen}");
    }

    #[test]
    fn ep_file_out_of_range_errors() {
        let board = Chessboard::initial();
        assert!(matches!(
            position_to_fen(&board, 9, false, CastlingRights::default(), 1),
            Err(DecodeError::UnknownEpFile(9))
        ));
    }

    #[test]
    fn reads_turn_and_move_number() {
        let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(is_white_turn(fen).unwrap());
        assert_eq!(move_number(fen).unwrap(), 1);

        let fen = "4k3/8/8/8/8/8/8/4K3 b - - 0 41";
        assert!(!is_white_turn(fen).unwrap());
        assert_eq!(move_number(fen).unwrap(), 41);
    }

    #[test]
    fn malformed_fen_errors() {
        assert!(is_white_turn("nonsense").is_err());
        assert!(move_number("").is_err());
    }
}

//! The move-stream decoder.
//!
//! Every stream byte is deobfuscated by subtracting a counter of the moves
//! decoded so far (mod 256), then dispatched: the special codes handle
//! skips, null moves, two-byte moves, variations and termination, and
//! everything else indexes the per-slot opcode tables. Each decoded move
//! mutates the board simulation and appends its SAN rendering.
//!
//! The SAN output carries no check/mate suffixes and no disambiguation
//! prefixes; the opcode tables already identify the mover uniquely, and
//! en-passant captures are written as plain captures.

use super::board::{file_char, square_name, Chessboard, Coord, Piece, PieceKind};
use super::error::DecodeError;
use super::fen;
use super::tables::{self, Delta};

/// Decodes the move region of a game blob against `board`, returning the
/// SAN move text (with a trailing space per move, result not included).
///
/// An empty `fen` means the standard initial state: white to move, move 1.
pub fn decode_moves(
    bytes: &[u8],
    board: &mut Chessboard,
    fen: &str,
) -> Result<String, DecodeError> {
    let (mut white_to_move, mut move_no) = if fen.is_empty() {
        (true, 1)
    } else {
        (fen::is_white_turn(fen)?, fen::move_number(fen)?)
    };

    let mut processed: u8 = 0;
    let mut idx = 0;
    let mut out = String::new();

    while idx < bytes.len() {
        let token = bytes[idx].wrapping_sub(processed);
        match token {
            tables::SKIP => idx += 1,
            tables::NULL_MOVE => {
                push_san(&mut out, "--", &mut white_to_move, &mut move_no);
                idx += 1;
            }
            tables::TWO_BYTE => {
                if bytes.len() < idx + 3 {
                    return Err(DecodeError::UnexpectedEnd(bytes.len()));
                }
                let hi = tables::SECOND_BYTE_KEY[bytes[idx + 1].wrapping_sub(processed) as usize];
                let lo = tables::SECOND_BYTE_KEY[bytes[idx + 2].wrapping_sub(processed) as usize];
                let word = u16::from_be_bytes([hi, lo]);

                let src = square_coord(word & 0x3F);
                let dst = square_coord((word >> 6) & 0x3F);
                let promotion = (word >> 12) & 0x0F;

                let san = board.apply_two_byte(src, dst, promotion)?;
                push_san(&mut out, &san, &mut white_to_move, &mut move_no);
                processed = processed.wrapping_add(1);
                idx += 3;
            }
            tables::BEGIN_VARIATION => return Err(DecodeError::VariationsUnsupported),
            tables::END_OF_GAME => {
                if idx + 1 == bytes.len() {
                    break;
                }
                // A mid-stream end marker would pop a variation, but 0xDC
                // already rejected the stream before one could open.
                idx += 1;
            }
            _ => {
                if let Some((piece, delta, flip)) = tables::find(token, white_to_move) {
                    let san = board.apply_single(piece, delta, token, flip)?;
                    push_san(&mut out, &san, &mut white_to_move, &mut move_no);
                    processed = processed.wrapping_add(1);
                }
                // unrecognized bytes are skipped without touching the
                // counter, keeping the stream in sync
                idx += 1;
            }
        }
    }

    Ok(out)
}

fn push_san(out: &mut String, san: &str, white_to_move: &mut bool, move_no: &mut u32) {
    if *white_to_move {
        out.push_str(&move_no.to_string());
        out.push_str(". ");
    } else {
        *move_no += 1;
    }
    out.push_str(san);
    out.push(' ');
    *white_to_move = !*white_to_move;
}

/// Absolute square index `8 * file + rank` to `(file, rank)`.
fn square_coord(index: u16) -> Coord {
    ((index / 8) as usize, (index % 8) as usize)
}

impl Chessboard {
    /// Applies a single-byte move: relocate the addressed slot by `delta`
    /// (negated for black pawns), wrapping mod 8.
    fn apply_single(
        &mut self,
        piece: Piece,
        delta: Delta,
        token: u8,
        flip: bool,
    ) -> Result<String, DecodeError> {
        let (file, rank) = self
            .location(piece.kind, piece.slot)
            .ok_or(DecodeError::PieceOutOfBounds {
                kind: piece.kind,
                slot: piece.slot,
            })?;

        let (mut dx, mut dy) = (delta.0 as i32, delta.1 as i32);
        if flip {
            dx = -dx;
            dy = -dy;
        }
        let to_file = (file as i32 + dx).rem_euclid(8) as usize;
        let to_rank = (rank as i32 + dy).rem_euclid(8) as usize;

        self.clear(file, rank);
        let target = self.piece_at(to_file, to_rank);

        let dst = square_name(to_file, to_rank);
        let mut san = match target {
            Some(_) if piece.kind.is_pawn() => format!("{}x{dst}", file_char(file)),
            Some(_) => format!("{}x{dst}", piece.kind.letter()),
            None => format!("{}{dst}", piece.kind.letter()),
        };

        if let Some(captured) = target {
            // kings and pawns keep their slot numbering; everything else
            // stays left-packed
            if captured.kind.is_king() || captured.kind.is_pawn() {
                self.retire_slot(captured.kind, captured.slot);
            } else {
                self.compact(captured.kind, captured.slot);
            }
        }

        self.put(to_file, to_rank, piece);

        if piece.kind.is_king()
            && (token == tables::CASTLE_SHORT || token == tables::CASTLE_LONG)
        {
            san = self.castle_rook(piece.kind, token);
        }

        Ok(san)
    }

    /// Moves the castling rook after the king has been relocated and
    /// returns the castle notation.
    fn castle_rook(&mut self, king: PieceKind, token: u8) -> String {
        let home_rank = if king == PieceKind::WhiteKing { 0 } else { 7 };
        let rook_kind = if king == PieceKind::WhiteKing {
            PieceKind::WhiteRook
        } else {
            PieceKind::BlackRook
        };
        let (from_file, to_file, san) = if token == tables::CASTLE_SHORT {
            (7, 5, "O-O")
        } else {
            (0, 3, "O-O-O")
        };

        self.clear(from_file, home_rank);
        for slot in 0..8 {
            if self.location(rook_kind, slot) == Some((from_file, home_rank)) {
                self.put(
                    to_file,
                    home_rank,
                    Piece {
                        kind: rook_kind,
                        slot,
                    },
                );
                break;
            }
        }

        san.to_string()
    }

    /// Applies a two-byte move: an absolute relocation used for promotions
    /// and for slots past the third of a kind.
    fn apply_two_byte(
        &mut self,
        src: Coord,
        dst: Coord,
        promotion: u16,
    ) -> Result<String, DecodeError> {
        let piece = self
            .piece_at(src.0, src.1)
            .ok_or(DecodeError::EmptySourceSquare)?;

        self.clear(src.0, src.1);
        let target = self.piece_at(dst.0, dst.1);
        if let Some(captured) = target {
            if captured.kind.is_king() || captured.kind.is_pawn() {
                self.retire_slot(captured.kind, captured.slot);
            } else {
                self.compact(captured.kind, captured.slot);
            }
        }

        let dst_name = square_name(dst.0, dst.1);

        if !piece.kind.is_pawn() {
            self.put(dst.0, dst.1, piece);
            return Ok(match target {
                Some(_) => format!("{}x{dst_name}", piece.kind.letter()),
                None => format!("{}{dst_name}", piece.kind.letter()),
            });
        }

        let promotes = (piece.kind == PieceKind::WhitePawn && dst.1 == 7)
            || (piece.kind == PieceKind::BlackPawn && dst.1 == 0);
        if !promotes {
            self.put(dst.0, dst.1, piece);
            return Ok(match target {
                Some(_) => format!("{}x{dst_name}", file_char(src.0)),
                None => dst_name,
            });
        }

        let promoted = promotion_kind(piece.kind, promotion)
            .ok_or(DecodeError::UnknownPromotion(promotion))?;
        self.retire_slot(piece.kind, piece.slot);
        let slot = self
            .free_slot(promoted)
            .ok_or(DecodeError::NoFreeSlot(promoted))?;
        self.put(dst.0, dst.1, Piece { kind: promoted, slot });

        Ok(match target {
            Some(_) => format!("{}x{dst_name}={}", file_char(src.0), promoted.letter()),
            None => format!("{dst_name}={}", promoted.letter()),
        })
    }
}

fn promotion_kind(pawn: PieceKind, code: u16) -> Option<PieceKind> {
    let white = pawn == PieceKind::WhitePawn;
    match code {
        0 => Some(if white {
            PieceKind::WhiteQueen
        } else {
            PieceKind::BlackQueen
        }),
        1 => Some(if white {
            PieceKind::WhiteRook
        } else {
            PieceKind::BlackRook
        }),
        2 => Some(if white {
            PieceKind::WhiteBishop
        } else {
            PieceKind::BlackBishop
        }),
        3 => Some(if white {
            PieceKind::WhiteKnight
        } else {
            PieceKind::BlackKnight
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chessbase::setup::decode_piece_placement;
    use crate::chessbase::tables::{
        BEGIN_VARIATION, END_OF_GAME, KING, NULL_MOVE, PAWN_C, PAWN_E, SECOND_BYTE_KEY, SKIP,
        TWO_BYTE,
    };

    /// First token of `table` mapping to `delta`.
    fn token_for(table: &[Option<Delta>; 256], delta: Delta) -> u8 {
        table
            .iter()
            .position(|entry| *entry == Some(delta))
            .expect("delta present in table") as u8
    }

    /// Raw byte that deobfuscates to `value` through the second-byte key.
    fn key_source(value: u8) -> u8 {
        SECOND_BYTE_KEY
            .iter()
            .position(|&v| v == value)
            .expect("key is a permutation") as u8
    }

    /// Incrementally builds an obfuscated stream the way the encoder would.
    struct StreamBuilder {
        bytes: Vec<u8>,
        processed: u8,
    }

    impl StreamBuilder {
        fn new() -> Self {
            StreamBuilder {
                bytes: Vec::new(),
                processed: 0,
            }
        }

        fn single(mut self, token: u8) -> Self {
            self.bytes.push(token.wrapping_add(self.processed));
            self.processed = self.processed.wrapping_add(1);
            self
        }

        fn special(mut self, token: u8) -> Self {
            self.bytes.push(token.wrapping_add(self.processed));
            self
        }

        fn two_byte(mut self, src: usize, dst: usize, promotion: u16) -> Self {
            let word = (promotion << 12) | ((dst as u16) << 6) | src as u16;
            let [hi, lo] = word.to_be_bytes();
            self.bytes.push(TWO_BYTE.wrapping_add(self.processed));
            self.bytes.push(key_source(hi).wrapping_add(self.processed));
            self.bytes.push(key_source(lo).wrapping_add(self.processed));
            self.processed = self.processed.wrapping_add(1);
            self
        }

        fn finish(mut self) -> Vec<u8> {
            self.bytes.push(END_OF_GAME.wrapping_add(self.processed));
            self.bytes
        }
    }

    fn sq(file: usize, rank: usize) -> usize {
        8 * file + rank
    }

    /// Kings plus extras, via the setup bitmap decoder.
    fn sparse_board(extra: &[(usize, u8)]) -> Chessboard {
        let mut bits: Vec<u8> = Vec::new();
        let mut pieces = vec![(sq(4, 0), 0b0001u8), (sq(4, 7), 0b1001u8)];
        pieces.extend_from_slice(extra);
        for square in 0..64 {
            match pieces.iter().find(|(s, _)| *s == square) {
                Some((_, code)) => {
                    bits.push(1);
                    for shift in (0..4).rev() {
                        bits.push((code >> shift) & 1);
                    }
                }
                None => bits.push(0),
            }
        }
        let mut bytes = [0u8; 24];
        for (i, bit) in bits.iter().enumerate() {
            bytes[i / 8] |= bit << (7 - i % 8);
        }
        decode_piece_placement(&bytes).unwrap()
    }

    #[test]
    fn opening_moves_from_the_initial_position() {
        let stream = StreamBuilder::new()
            .single(token_for(&PAWN_E, (0, 2)))
            .single(token_for(&PAWN_C, (0, 2)))
            .finish();

        let mut board = Chessboard::initial();
        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. e4 c5 ");
        assert_eq!(board.location(PieceKind::WhitePawn, 4), Some((4, 3)));
        assert_eq!(board.location(PieceKind::BlackPawn, 2), Some((2, 4)));
        board.validate().unwrap();
    }

    #[test]
    fn pawn_capture_names_the_source_file() {
        // 1. e4 d5 2. exd5
        let stream = StreamBuilder::new()
            .single(token_for(&PAWN_E, (0, 2)))
            .single(token_for(&crate::chessbase::tables::PAWN_D, (0, 2)))
            .single(token_for(&PAWN_E, (7, 1)))
            .finish();

        let mut board = Chessboard::initial();
        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. e4 d5 2. exd5 ");
        assert_eq!(board.location(PieceKind::WhitePawn, 4), Some((3, 4)));
        assert_eq!(board.location(PieceKind::BlackPawn, 3), None);
        board.validate().unwrap();
    }

    #[test]
    fn castle_short_relocates_king_and_rook() {
        let mut board = sparse_board(&[(sq(7, 0), 0b0101)]);
        let stream = StreamBuilder::new()
            .single(crate::chessbase::tables::CASTLE_SHORT)
            .finish();

        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. O-O ");
        assert_eq!(board.location(PieceKind::WhiteKing, 0), Some((6, 0)));
        assert_eq!(board.location(PieceKind::WhiteRook, 0), Some((5, 0)));
        assert_eq!(board.piece_at(4, 0), None);
        assert_eq!(board.piece_at(7, 0), None);
        board.validate().unwrap();
    }

    #[test]
    fn castle_long_for_black() {
        let mut board = sparse_board(&[(sq(0, 7), 0b1101)]);
        let stream = StreamBuilder::new()
            .special(NULL_MOVE)
            .single(crate::chessbase::tables::CASTLE_LONG)
            .finish();

        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. -- O-O-O ");
        assert_eq!(board.location(PieceKind::BlackKing, 0), Some((2, 7)));
        assert_eq!(board.location(PieceKind::BlackRook, 0), Some((3, 7)));
        board.validate().unwrap();
    }

    #[test]
    fn promotion_with_capture_takes_the_lowest_free_queen_slot() {
        // white pawn b7, black rook a8
        let mut board = sparse_board(&[(sq(1, 6), 0b0110), (sq(0, 7), 0b1101)]);
        let stream = StreamBuilder::new()
            .two_byte(sq(1, 6), sq(0, 7), 0)
            .single(token_for(&KING, (7, 0)))
            .finish();

        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. bxa8=Q Kd8 ");
        assert_eq!(board.location(PieceKind::WhiteQueen, 0), Some((0, 7)));
        assert_eq!(board.location(PieceKind::WhitePawn, 0), None);
        assert_eq!(board.location(PieceKind::BlackRook, 0), None);
        board.validate().unwrap();
    }

    #[test]
    fn two_byte_move_relocates_non_pawns() {
        // white knight b1 to d2 via the absolute encoding
        let mut board = sparse_board(&[(sq(1, 0), 0b0011)]);
        let stream = StreamBuilder::new().two_byte(sq(1, 0), sq(3, 1), 0).finish();

        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. Nd2 ");
        assert_eq!(board.location(PieceKind::WhiteKnight, 0), Some((3, 1)));
        board.validate().unwrap();
    }

    #[test]
    fn skip_and_unknown_tokens_leave_the_counter_alone() {
        let unknown = (0u8..=255)
            .find(|&b| {
                !matches!(b, SKIP | TWO_BYTE | END_OF_GAME | BEGIN_VARIATION | NULL_MOVE)
                    && crate::chessbase::tables::find(b, true).is_none()
            })
            .expect("unused byte exists");

        let mut stream = StreamBuilder::new().special(SKIP).special(unknown);
        stream = stream.single(token_for(&PAWN_E, (0, 2)));
        let stream = stream.finish();

        let mut board = Chessboard::initial();
        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. e4 ");
    }

    #[test]
    fn null_moves_toggle_the_side_without_counting() {
        let stream = StreamBuilder::new()
            .special(NULL_MOVE)
            .single(token_for(&PAWN_C, (0, 2)))
            .finish();

        let mut board = Chessboard::initial();
        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. -- c5 ");
    }

    #[test]
    fn begin_variation_is_rejected() {
        let stream = vec![BEGIN_VARIATION];
        let mut board = Chessboard::initial();
        assert!(matches!(
            decode_moves(&stream, &mut board, ""),
            Err(DecodeError::VariationsUnsupported)
        ));
    }

    #[test]
    fn end_marker_mid_stream_is_ignored() {
        let stream = StreamBuilder::new()
            .special(END_OF_GAME)
            .single(token_for(&PAWN_E, (0, 2)))
            .finish();

        let mut board = Chessboard::initial();
        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. e4 ");
    }

    #[test]
    fn truncated_two_byte_move_errors() {
        let stream = vec![TWO_BYTE];
        let mut board = Chessboard::initial();
        assert!(matches!(
            decode_moves(&stream, &mut board, ""),
            Err(DecodeError::UnexpectedEnd(1))
        ));
    }

    #[test]
    fn fen_sets_side_and_move_number() {
        // a lone pawn takes slot 0 in setup scan order, so the a-file
        // table addresses it regardless of its actual file
        let mut board = sparse_board(&[(sq(2, 6), 0b1110)]);
        let fen = "4k3/2p5/8/8/8/8/8/4K3 b - - 0 11";
        let stream = StreamBuilder::new()
            .single(token_for(&crate::chessbase::tables::PAWN_A, (0, 1)))
            .finish();

        let text = decode_moves(&stream, &mut board, fen).unwrap();
        assert_eq!(text, "c6 ");
        board.validate().unwrap();
    }

    #[test]
    fn capturing_a_knight_compacts_its_list() {
        // white queen d4 takes the b4 knight; the g4 knight must renumber
        let mut board = sparse_board(&[
            (sq(3, 3), 0b0010),
            (sq(1, 3), 0b1011),
            (sq(6, 3), 0b1011),
        ]);
        let stream = StreamBuilder::new()
            .single(token_for(&crate::chessbase::tables::QUEEN_1, (6, 0)))
            .finish();

        let text = decode_moves(&stream, &mut board, "").unwrap();
        assert_eq!(text, "1. Qxb4 ");
        assert_eq!(board.location(PieceKind::BlackKnight, 0), Some((6, 3)));
        assert_eq!(board.location(PieceKind::BlackKnight, 1), None);
        board.validate().unwrap();
    }
}

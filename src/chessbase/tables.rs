//! The fixed move-encoding tables of the `.cbg` format.
//!
//! Each byte of the move stream, once the rolling counter has been
//! subtracted, selects a piece slot and a relative displacement out of one
//! of the 21 per-slot tables below: the king, the first three queens,
//! rooks, bishops and knights of a side, and the eight pawns by starting
//! file. Displacements are stored as unsigned residues mod 8; applying one
//! wraps around the board, which is how the format expresses negative
//! deltas. Non-pawn tables serve both colors as-is, pawn tables are negated
//! for black.
//!
//! The byte assignments carry no structure; they exist only as lookup keys
//! and must match the files bit for bit.

use super::board::{Piece, PieceKind};

pub type Delta = (i8, i8);

/// Stream codes with non-move meanings. None of these advance the
/// deobfuscation counter.
pub const SKIP: u8 = 0x9F;
pub const TWO_BYTE: u8 = 0x29;
pub const END_OF_GAME: u8 = 0x0C;
pub const BEGIN_VARIATION: u8 = 0xDC;
pub const NULL_MOVE: u8 = 0xAA;

/// King opcodes that additionally relocate the matching rook.
pub const CASTLE_SHORT: u8 = 0x76;
pub const CASTLE_LONG: u8 = 0xB5;

const KING_ENTRIES: &[(u8, Delta)] = &[
    (0x28, (7, 7)), (0x35, (0, 7)), (0x4A, (7, 0)), (0x5F, (1, 1)),
    (0x73, (1, 0)), (0x76, (2, 0)), (0x7E, (1, 7)), (0xB5, (6, 0)),
    (0xCB, (0, 1)), (0xF7, (7, 1)),
];

const QUEEN_1_ENTRIES: &[(u8, Delta)] = &[
    (0x0B, (2, 6)), (0x13, (5, 0)), (0x15, (2, 0)), (0x16, (0, 4)),
    (0x1A, (3, 3)), (0x1C, (7, 0)), (0x2F, (3, 0)), (0x30, (1, 0)),
    (0x3E, (6, 2)), (0x3F, (2, 2)), (0x48, (0, 7)), (0x51, (0, 3)),
    (0x59, (4, 4)), (0x89, (6, 6)), (0x8A, (0, 1)), (0x96, (1, 7)),
    (0xAB, (7, 1)), (0xAD, (0, 6)), (0xB0, (4, 0)), (0xC0, (1, 1)),
    (0xC4, (6, 0)), (0xD3, (3, 5)), (0xD8, (0, 5)), (0xE1, (0, 2)),
    (0xE5, (7, 7)), (0xF0, (5, 3)), (0xF2, (5, 5)), (0xF4, (4, 4)),
];

const QUEEN_2_ENTRIES: &[(u8, Delta)] = &[
    (0x01, (3, 3)), (0x0F, (2, 0)), (0x11, (1, 7)), (0x23, (6, 0)),
    (0x38, (2, 6)), (0x39, (5, 5)), (0x3B, (2, 2)), (0x45, (0, 2)),
    (0x4E, (6, 6)), (0x57, (1, 1)), (0x5A, (4, 4)), (0x60, (0, 6)),
    (0x62, (3, 0)), (0x65, (0, 1)), (0x68, (0, 5)), (0x72, (7, 0)),
    (0x7A, (0, 3)), (0x7D, (0, 4)), (0x86, (6, 2)), (0xA4, (4, 0)),
    (0xA5, (5, 0)), (0xB8, (5, 3)), (0xB9, (4, 4)), (0xBF, (7, 7)),
    (0xC1, (7, 1)), (0xC6, (0, 7)), (0xE6, (1, 0)), (0xED, (3, 5)),
];

const QUEEN_3_ENTRIES: &[(u8, Delta)] = &[
    (0x09, (0, 5)), (0x0E, (3, 0)), (0x10, (5, 3)), (0x12, (7, 0)),
    (0x1D, (0, 7)), (0x2B, (3, 5)), (0x4D, (5, 0)), (0x50, (1, 7)),
    (0x63, (7, 1)), (0x71, (6, 6)), (0x88, (0, 3)), (0x8F, (2, 2)),
    (0x90, (6, 2)), (0x93, (0, 1)), (0x95, (4, 4)), (0x97, (4, 0)),
    (0x9B, (0, 2)), (0xA2, (0, 6)), (0xA6, (3, 3)), (0xA7, (4, 4)),
    (0xBB, (1, 1)), (0xBC, (2, 0)), (0xC5, (7, 7)), (0xCA, (0, 4)),
    (0xDA, (6, 0)), (0xE3, (5, 5)), (0xF9, (1, 0)), (0xFB, (2, 6)),
];

const ROOK_1_ENTRIES: &[(u8, Delta)] = &[
    (0x05, (4, 0)), (0x14, (0, 7)), (0x18, (0, 2)), (0x21, (3, 0)),
    (0x25, (2, 0)), (0x49, (6, 0)), (0x4B, (0, 1)), (0x56, (0, 6)),
    (0x67, (0, 3)), (0x8D, (7, 0)), (0xB1, (0, 4)), (0xBE, (1, 0)),
    (0xF1, (5, 0)), (0xF8, (0, 5)),
];

const ROOK_2_ENTRIES: &[(u8, Delta)] = &[
    (0x41, (0, 6)), (0x52, (0, 1)), (0x58, (5, 0)), (0x6A, (0, 5)),
    (0x6F, (0, 4)), (0x92, (2, 0)), (0xA8, (6, 0)), (0xAE, (0, 7)),
    (0xAF, (1, 0)), (0xB6, (0, 3)), (0xCC, (0, 2)), (0xE8, (3, 0)),
    (0xE9, (7, 0)), (0xF6, (4, 0)),
];

const ROOK_3_ENTRIES: &[(u8, Delta)] = &[
    (0x2C, (0, 5)), (0x34, (1, 0)), (0x3D, (6, 0)), (0x64, (2, 0)),
    (0x6E, (3, 0)), (0x75, (0, 6)), (0xB7, (0, 7)), (0xC8, (0, 4)),
    (0xC9, (5, 0)), (0xCF, (0, 2)), (0xD0, (0, 3)), (0xD5, (4, 0)),
    (0xDF, (0, 1)), (0xE4, (7, 0)),
];

const BISHOP_1_ENTRIES: &[(u8, Delta)] = &[
    (0x0A, (1, 7)), (0x22, (7, 1)), (0x2E, (4, 4)), (0x33, (2, 6)),
    (0x40, (2, 2)), (0x6C, (7, 7)), (0x85, (4, 4)), (0x8B, (6, 6)),
    (0x8E, (5, 5)), (0xA3, (3, 3)), (0xA9, (3, 5)), (0xC7, (6, 2)),
    (0xFA, (1, 1)), (0xFC, (5, 3)),
];

const BISHOP_2_ENTRIES: &[(u8, Delta)] = &[
    (0x00, (7, 7)), (0x06, (6, 2)), (0x08, (7, 1)), (0x24, (4, 4)),
    (0x36, (2, 2)), (0x4C, (1, 1)), (0x4F, (3, 5)), (0x5C, (6, 6)),
    (0x70, (5, 3)), (0x83, (5, 5)), (0x87, (3, 3)), (0xA1, (1, 7)),
    (0xD2, (4, 4)), (0xF5, (2, 6)),
];

const BISHOP_3_ENTRIES: &[(u8, Delta)] = &[
    (0x03, (2, 2)), (0x04, (6, 2)), (0x07, (1, 1)), (0x1B, (6, 6)),
    (0x27, (5, 5)), (0x42, (7, 7)), (0x69, (3, 5)), (0x81, (3, 3)),
    (0x98, (4, 4)), (0x9E, (7, 1)), (0xBA, (4, 4)), (0xCE, (1, 7)),
    (0xD7, (2, 6)), (0xDE, (5, 3)),
];

const KNIGHT_1_ENTRIES: &[(u8, Delta)] = &[
    (0x19, (7, 2)), (0x79, (1, 6)), (0x84, (1, 2)), (0x9A, (2, 1)),
    (0x9D, (6, 7)), (0xB3, (7, 6)), (0xE7, (6, 1)), (0xFF, (2, 7)),
];

const KNIGHT_2_ENTRIES: &[(u8, Delta)] = &[
    (0x55, (6, 1)), (0x74, (7, 2)), (0xB4, (1, 2)), (0xCD, (2, 7)),
    (0xD9, (7, 6)), (0xEA, (2, 1)), (0xEC, (1, 6)), (0xEE, (6, 7)),
];

const KNIGHT_3_ENTRIES: &[(u8, Delta)] = &[
    (0x1E, (7, 6)), (0x1F, (1, 6)), (0x26, (6, 1)), (0x31, (2, 7)),
    (0x80, (6, 7)), (0xC3, (7, 2)), (0xD4, (2, 1)), (0xD6, (1, 2)),
];

const PAWN_A_ENTRIES: &[(u8, Delta)] = &[
    (0x54, (0, 2)), (0x7B, (0, 1)), (0xB2, (7, 1)), (0xDB, (1, 1)),
];

const PAWN_B_ENTRIES: &[(u8, Delta)] = &[
    (0x2D, (0, 1)), (0x43, (7, 1)), (0x7C, (0, 2)), (0x94, (1, 1)),
];

const PAWN_C_ENTRIES: &[(u8, Delta)] = &[
    (0x02, (0, 1)), (0x82, (7, 1)), (0xEF, (1, 1)), (0xFE, (0, 2)),
];

const PAWN_D_ENTRIES: &[(u8, Delta)] = &[
    (0x44, (7, 1)), (0x47, (1, 1)), (0x7F, (0, 2)), (0xE0, (0, 1)),
];

const PAWN_E_ENTRIES: &[(u8, Delta)] = &[
    (0x0D, (7, 1)), (0x2A, (1, 1)), (0x53, (0, 1)), (0x6B, (0, 2)),
];

const PAWN_F_ENTRIES: &[(u8, Delta)] = &[
    (0x17, (0, 1)), (0x77, (0, 2)), (0xA0, (7, 1)), (0xE2, (1, 1)),
];

const PAWN_G_ENTRIES: &[(u8, Delta)] = &[
    (0x8C, (0, 1)), (0x9C, (1, 1)), (0xAC, (7, 1)), (0xEB, (0, 2)),
];

const PAWN_H_ENTRIES: &[(u8, Delta)] = &[
    (0x3C, (7, 1)), (0x5B, (0, 1)), (0x6D, (0, 2)), (0x91, (1, 1)),
];

const fn build(entries: &[(u8, Delta)]) -> [Option<Delta>; 256] {
    let mut table = [None; 256];
    let mut i = 0;
    while i < entries.len() {
        table[entries[i].0 as usize] = Some(entries[i].1);
        i += 1;
    }
    table
}

pub static KING: [Option<Delta>; 256] = build(KING_ENTRIES);
pub static QUEEN_1: [Option<Delta>; 256] = build(QUEEN_1_ENTRIES);
pub static QUEEN_2: [Option<Delta>; 256] = build(QUEEN_2_ENTRIES);
pub static QUEEN_3: [Option<Delta>; 256] = build(QUEEN_3_ENTRIES);
pub static ROOK_1: [Option<Delta>; 256] = build(ROOK_1_ENTRIES);
pub static ROOK_2: [Option<Delta>; 256] = build(ROOK_2_ENTRIES);
pub static ROOK_3: [Option<Delta>; 256] = build(ROOK_3_ENTRIES);
pub static BISHOP_1: [Option<Delta>; 256] = build(BISHOP_1_ENTRIES);
pub static BISHOP_2: [Option<Delta>; 256] = build(BISHOP_2_ENTRIES);
pub static BISHOP_3: [Option<Delta>; 256] = build(BISHOP_3_ENTRIES);
pub static KNIGHT_1: [Option<Delta>; 256] = build(KNIGHT_1_ENTRIES);
pub static KNIGHT_2: [Option<Delta>; 256] = build(KNIGHT_2_ENTRIES);
pub static KNIGHT_3: [Option<Delta>; 256] = build(KNIGHT_3_ENTRIES);
pub static PAWN_A: [Option<Delta>; 256] = build(PAWN_A_ENTRIES);
pub static PAWN_B: [Option<Delta>; 256] = build(PAWN_B_ENTRIES);
pub static PAWN_C: [Option<Delta>; 256] = build(PAWN_C_ENTRIES);
pub static PAWN_D: [Option<Delta>; 256] = build(PAWN_D_ENTRIES);
pub static PAWN_E: [Option<Delta>; 256] = build(PAWN_E_ENTRIES);
pub static PAWN_F: [Option<Delta>; 256] = build(PAWN_F_ENTRIES);
pub static PAWN_G: [Option<Delta>; 256] = build(PAWN_G_ENTRIES);
pub static PAWN_H: [Option<Delta>; 256] = build(PAWN_H_ENTRIES);

/// Deobfuscation table for the two payload bytes of a two-byte move. Each
/// raw byte has the counter subtracted and is then passed through this
/// permutation before the 16-bit move word is assembled.
pub static SECOND_BYTE_KEY: [u8; 256] = [
    0xB9, 0x1D, 0x92, 0x41, 0x7F, 0x22, 0xC0, 0x6A, 0x30, 0xEB, 0xE0, 0x63,
    0xC7, 0x87, 0xA1, 0x72, 0xF2, 0xE8, 0x9C, 0x29, 0x55, 0xFA, 0x33, 0xFD,
    0x4B, 0x00, 0x93, 0x44, 0x31, 0xED, 0x12, 0xA2, 0x70, 0x51, 0xD6, 0xF4,
    0xF7, 0xBF, 0x3C, 0xDF, 0x5A, 0x64, 0x1C, 0x80, 0xBB, 0xE4, 0x5F, 0x6B,
    0x2E, 0xAB, 0xB2, 0x03, 0x0B, 0x76, 0xD2, 0x04, 0x0C, 0xA9, 0x57, 0xFC,
    0x77, 0x36, 0x45, 0x49, 0x11, 0xA7, 0x15, 0x25, 0xB4, 0xB5, 0xD9, 0x17,
    0x4C, 0x99, 0x8C, 0xE6, 0x78, 0x4F, 0xAE, 0x95, 0x28, 0xAC, 0x19, 0x47,
    0x34, 0x39, 0x13, 0x4E, 0xDA, 0xC3, 0xC1, 0x07, 0xEC, 0xF1, 0xC2, 0xEE,
    0xE7, 0xEA, 0xA3, 0x5E, 0x62, 0x75, 0x8A, 0x97, 0x60, 0x8B, 0xB3, 0xB1,
    0xF6, 0xD7, 0x3D, 0x1F, 0x42, 0x83, 0x4D, 0x79, 0xBC, 0x86, 0x9E, 0x88,
    0xAF, 0x0D, 0x3E, 0x26, 0x89, 0x16, 0x18, 0x46, 0x90, 0x3F, 0xA4, 0xA8,
    0x27, 0x98, 0x59, 0x8E, 0xD0, 0x67, 0x6C, 0x81, 0x7A, 0x0A, 0x71, 0xB0,
    0x61, 0xBA, 0xBD, 0xE2, 0xD1, 0xC9, 0x2D, 0xF0, 0x8D, 0x23, 0xFE, 0xFB,
    0x08, 0x7B, 0xE3, 0x9B, 0x2F, 0xC8, 0xF3, 0x5B, 0x37, 0x43, 0x50, 0x10,
    0x1E, 0xAD, 0x20, 0xD3, 0xCC, 0x21, 0xB7, 0xE5, 0xB6, 0xD4, 0xD8, 0x66,
    0x6F, 0x69, 0x91, 0x68, 0xAA, 0x2B, 0xCB, 0x7C, 0xCE, 0xC6, 0x48, 0x85,
    0xF9, 0x58, 0x73, 0x84, 0x2C, 0x24, 0xDC, 0x9A, 0xD5, 0xF5, 0x9D, 0xDE,
    0x6D, 0xE9, 0xA5, 0xBE, 0x65, 0x6E, 0x06, 0x3A, 0x32, 0x52, 0x1B, 0xFF,
    0xC4, 0xCA, 0x0E, 0x7D, 0x8F, 0x54, 0x2A, 0xDD, 0xCD, 0x53, 0x96, 0x74,
    0x9F, 0x01, 0xCF, 0x1A, 0x82, 0x40, 0x56, 0x02, 0x3B, 0x5C, 0x05, 0xA6,
    0xE1, 0xDB, 0x38, 0x5D, 0x94, 0xA0, 0xC5, 0x4A, 0xF8, 0x14, 0x09, 0x7E,
    0x35, 0x0F, 0xB8, 0xEF,
];

/// One dispatch row: the slot a table addresses for each color, the table
/// itself, and whether displacements flip sign for black.
pub struct SlotTable {
    pub white: Piece,
    pub black: Piece,
    pub deltas: &'static [Option<Delta>; 256],
    pub pawn: bool,
}

const fn slot(kind: PieceKind, slot: usize) -> Piece {
    Piece { kind, slot }
}

/// All 21 tables. Token sets are pairwise disjoint, so dispatch order does
/// not matter.
pub static DISPATCH: [SlotTable; 21] = [
    SlotTable { white: slot(PieceKind::WhiteKing, 0), black: slot(PieceKind::BlackKing, 0), deltas: &KING, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteQueen, 0), black: slot(PieceKind::BlackQueen, 0), deltas: &QUEEN_1, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteQueen, 1), black: slot(PieceKind::BlackQueen, 1), deltas: &QUEEN_2, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteQueen, 2), black: slot(PieceKind::BlackQueen, 2), deltas: &QUEEN_3, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteRook, 0), black: slot(PieceKind::BlackRook, 0), deltas: &ROOK_1, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteRook, 1), black: slot(PieceKind::BlackRook, 1), deltas: &ROOK_2, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteRook, 2), black: slot(PieceKind::BlackRook, 2), deltas: &ROOK_3, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteBishop, 0), black: slot(PieceKind::BlackBishop, 0), deltas: &BISHOP_1, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteBishop, 1), black: slot(PieceKind::BlackBishop, 1), deltas: &BISHOP_2, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteBishop, 2), black: slot(PieceKind::BlackBishop, 2), deltas: &BISHOP_3, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteKnight, 0), black: slot(PieceKind::BlackKnight, 0), deltas: &KNIGHT_1, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteKnight, 1), black: slot(PieceKind::BlackKnight, 1), deltas: &KNIGHT_2, pawn: false },
    SlotTable { white: slot(PieceKind::WhiteKnight, 2), black: slot(PieceKind::BlackKnight, 2), deltas: &KNIGHT_3, pawn: false },
    SlotTable { white: slot(PieceKind::WhitePawn, 0), black: slot(PieceKind::BlackPawn, 0), deltas: &PAWN_A, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 1), black: slot(PieceKind::BlackPawn, 1), deltas: &PAWN_B, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 2), black: slot(PieceKind::BlackPawn, 2), deltas: &PAWN_C, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 3), black: slot(PieceKind::BlackPawn, 3), deltas: &PAWN_D, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 4), black: slot(PieceKind::BlackPawn, 4), deltas: &PAWN_E, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 5), black: slot(PieceKind::BlackPawn, 5), deltas: &PAWN_F, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 6), black: slot(PieceKind::BlackPawn, 6), deltas: &PAWN_G, pawn: true },
    SlotTable { white: slot(PieceKind::WhitePawn, 7), black: slot(PieceKind::BlackPawn, 7), deltas: &PAWN_H, pawn: true },
];

/// Resolves a deobfuscated token for the side to move: the piece it
/// addresses, the displacement, and whether to negate it (black pawns).
pub fn find(token: u8, white_to_move: bool) -> Option<(Piece, Delta, bool)> {
    for table in &DISPATCH {
        if let Some(delta) = table.deltas[token as usize] {
            let piece = if white_to_move { table.white } else { table.black };
            return Some((piece, delta, table.pawn && !white_to_move));
        }
    }
    None
}

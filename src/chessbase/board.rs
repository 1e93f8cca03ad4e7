//! The board simulation the move decoder drives.
//!
//! Two projections are kept in lockstep: an 8x8 array of `(kind, slot)`
//! occupants indexed `[file][rank]`, and a per-kind piece list giving the
//! coordinates of each live slot. The opcode tables address pieces by slot
//! (queen #2 has a different table than queen #1), so the slot assignment is
//! load-bearing and survives for the life of a game.

/// Piece kinds, in piece-list row order. The discriminants index the
/// 13-row list array; row 0 is the empty sentinel and stays unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum PieceKind {
    WhiteQueen = 1,
    WhiteKnight = 2,
    WhiteBishop = 3,
    WhiteRook = 4,
    BlackQueen = 5,
    BlackKnight = 6,
    BlackBishop = 7,
    BlackRook = 8,
    WhiteKing = 9,
    BlackKing = 10,
    WhitePawn = 11,
    BlackPawn = 12,
}

pub const KIND_ROWS: usize = 13;

impl PieceKind {
    pub const ALL: [PieceKind; 12] = [
        PieceKind::WhiteQueen,
        PieceKind::WhiteKnight,
        PieceKind::WhiteBishop,
        PieceKind::WhiteRook,
        PieceKind::BlackQueen,
        PieceKind::BlackKnight,
        PieceKind::BlackBishop,
        PieceKind::BlackRook,
        PieceKind::WhiteKing,
        PieceKind::BlackKing,
        PieceKind::WhitePawn,
        PieceKind::BlackPawn,
    ];

    pub fn row(self) -> usize {
        self as usize
    }

    /// SAN letter; empty for pawns.
    pub fn letter(self) -> &'static str {
        match self {
            PieceKind::WhiteKing | PieceKind::BlackKing => "K",
            PieceKind::WhiteQueen | PieceKind::BlackQueen => "Q",
            PieceKind::WhiteRook | PieceKind::BlackRook => "R",
            PieceKind::WhiteBishop | PieceKind::BlackBishop => "B",
            PieceKind::WhiteKnight | PieceKind::BlackKnight => "N",
            PieceKind::WhitePawn | PieceKind::BlackPawn => "",
        }
    }

    pub fn fen_char(self) -> char {
        match self {
            PieceKind::WhiteKing => 'K',
            PieceKind::WhiteQueen => 'Q',
            PieceKind::WhiteRook => 'R',
            PieceKind::WhiteBishop => 'B',
            PieceKind::WhiteKnight => 'N',
            PieceKind::WhitePawn => 'P',
            PieceKind::BlackKing => 'k',
            PieceKind::BlackQueen => 'q',
            PieceKind::BlackRook => 'r',
            PieceKind::BlackBishop => 'b',
            PieceKind::BlackKnight => 'n',
            PieceKind::BlackPawn => 'p',
        }
    }

    pub fn is_pawn(self) -> bool {
        matches!(self, PieceKind::WhitePawn | PieceKind::BlackPawn)
    }

    pub fn is_king(self) -> bool {
        matches!(self, PieceKind::WhiteKing | PieceKind::BlackKing)
    }
}

/// A board occupant: which kind, and which slot of that kind's piece list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub slot: usize,
}

/// `(file, rank)`, both `0..8`; file 0 is the a-file, rank 0 is rank 1.
pub type Coord = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chessboard {
    position: [[Option<Piece>; 8]; 8],
    piece_list: [[Option<Coord>; 8]; KIND_ROWS],
}

impl Chessboard {
    /// The standard starting position. Slot assignments follow board scan
    /// order: queenside piece first, pawns a-file through h-file.
    pub fn initial() -> Self {
        let piece_list: [[Option<Coord>; 8]; KIND_ROWS] = [
            [None; 8],
            [Some((3, 0)), None, None, None, None, None, None, None],
            [Some((1, 0)), Some((6, 0)), None, None, None, None, None, None],
            [Some((2, 0)), Some((5, 0)), None, None, None, None, None, None],
            [Some((0, 0)), Some((7, 0)), None, None, None, None, None, None],
            [Some((3, 7)), None, None, None, None, None, None, None],
            [Some((1, 7)), Some((6, 7)), None, None, None, None, None, None],
            [Some((2, 7)), Some((5, 7)), None, None, None, None, None, None],
            [Some((0, 7)), Some((7, 7)), None, None, None, None, None, None],
            [Some((4, 0)), None, None, None, None, None, None, None],
            [Some((4, 7)), None, None, None, None, None, None, None],
            [
                Some((0, 1)),
                Some((1, 1)),
                Some((2, 1)),
                Some((3, 1)),
                Some((4, 1)),
                Some((5, 1)),
                Some((6, 1)),
                Some((7, 1)),
            ],
            [
                Some((0, 6)),
                Some((1, 6)),
                Some((2, 6)),
                Some((3, 6)),
                Some((4, 6)),
                Some((5, 6)),
                Some((6, 6)),
                Some((7, 6)),
            ],
        ];

        let mut board = Chessboard {
            position: [[None; 8]; 8],
            piece_list,
        };
        for kind in PieceKind::ALL {
            for slot in 0..8 {
                if let Some((file, rank)) = board.piece_list[kind.row()][slot] {
                    board.position[file][rank] = Some(Piece { kind, slot });
                }
            }
        }
        board
    }

    pub fn empty() -> Self {
        Chessboard {
            position: [[None; 8]; 8],
            piece_list: [[None; 8]; KIND_ROWS],
        }
    }

    pub fn piece_at(&self, file: usize, rank: usize) -> Option<Piece> {
        self.position[file][rank]
    }

    pub fn location(&self, kind: PieceKind, slot: usize) -> Option<Coord> {
        self.piece_list[kind.row()][slot]
    }

    /// Writes both projections for a piece entering `(file, rank)`.
    pub(crate) fn put(&mut self, file: usize, rank: usize, piece: Piece) {
        self.position[file][rank] = Some(piece);
        self.piece_list[piece.kind.row()][piece.slot] = Some((file, rank));
    }

    pub(crate) fn clear(&mut self, file: usize, rank: usize) {
        self.position[file][rank] = None;
    }

    pub(crate) fn retire_slot(&mut self, kind: PieceKind, slot: usize) {
        self.piece_list[kind.row()][slot] = None;
    }

    /// Lowest free slot of a kind's list, for promoted pieces.
    pub(crate) fn free_slot(&self, kind: PieceKind) -> Option<usize> {
        (0..8).find(|&slot| self.piece_list[kind.row()][slot].is_none())
    }

    /// Removes slot `n` of kind `k` from the list by shifting the slots
    /// above it down one, then renumbers the affected board occupants.
    /// Keeps non-king, non-pawn lists left-packed after a capture.
    pub(crate) fn compact(&mut self, kind: PieceKind, slot: usize) {
        let row = kind.row();
        for n in slot..7 {
            self.piece_list[row][n] = self.piece_list[row][n + 1];
        }
        self.piece_list[row][7] = None;

        for file in 0..8 {
            for rank in 0..8 {
                if let Some(p) = self.position[file][rank] {
                    if p.kind == kind && p.slot > slot {
                        self.position[file][rank] = Some(Piece {
                            kind,
                            slot: p.slot - 1,
                        });
                    }
                }
            }
        }
    }

    /// Cross-checks the two projections; returns a description of the first
    /// mismatch. Used by tests after every decoded move.
    pub fn validate(&self) -> Result<(), String> {
        let mut occupied = 0;
        for file in 0..8 {
            for rank in 0..8 {
                if let Some(p) = self.position[file][rank] {
                    occupied += 1;
                    if self.piece_list[p.kind.row()][p.slot] != Some((file, rank)) {
                        return Err(format!(
                            "square ({file},{rank}) holds {:?} slot {} but the list disagrees",
                            p.kind, p.slot
                        ));
                    }
                }
            }
        }

        let mut listed = 0;
        for kind in PieceKind::ALL {
            let row = &self.piece_list[kind.row()];
            for (slot, entry) in row.iter().enumerate() {
                if let Some((file, rank)) = *entry {
                    listed += 1;
                    if self.position[file][rank] != Some(Piece { kind, slot }) {
                        return Err(format!(
                            "{kind:?} slot {slot} points at ({file},{rank}) but the square disagrees"
                        ));
                    }
                }
            }
            // kings keep slot 0 and pawns their original file slots; all
            // other lists must be left-packed
            if !kind.is_king() && !kind.is_pawn() {
                let mut seen_gap = false;
                for entry in row.iter() {
                    match entry {
                        Some(_) if seen_gap => {
                            return Err(format!("{kind:?} list is not left-packed"));
                        }
                        Some(_) => {}
                        None => seen_gap = true,
                    }
                }
            }
        }

        if occupied != listed {
            return Err(format!(
                "{occupied} occupied squares but {listed} listed pieces"
            ));
        }
        Ok(())
    }
}

/// `"e4"`-style square name.
pub fn square_name(file: usize, rank: usize) -> String {
    format!("{}{}", file_char(file), rank + 1)
}

pub fn file_char(file: usize) -> char {
    (b'a' + file as u8) as char
}

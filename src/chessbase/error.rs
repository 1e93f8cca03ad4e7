use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::board::PieceKind;

/// How the conversion driver should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed data in one record; skip it and continue.
    Structural,
    /// The record lies outside this tool's contract; skip it quietly.
    Unsupported,
    /// The move stream contradicted the board simulation; skip with a warning.
    Semantic,
    /// The database as a whole cannot be processed.
    Fatal,
}

/// Errors raised while reading the four database files.
#[derive(Debug, Error)]
pub enum CbError {
    #[error("failed to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("record too short: need {need} bytes, got {got}")]
    RecordTooShort { need: usize, got: usize },
    #[error("record is not a game")]
    NotAGame,
    #[error("record is marked deleted")]
    MarkedDeleted,
    #[error("unknown name-file version {0}")]
    UnknownVersion(u8),
    #[error("game blob is encoded")]
    Encoded,
    #[error("game blob uses a special encoding")]
    SpecialEncoded,
    #[error("Chess960 games are not supported")]
    Chess960,
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),
}

impl CbError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CbError::Open { .. } | CbError::UnknownVersion(_) => ErrorClass::Fatal,
            CbError::RecordTooShort { .. } => ErrorClass::Structural,
            CbError::NotAGame
            | CbError::MarkedDeleted
            | CbError::Encoded
            | CbError::SpecialEncoded
            | CbError::Chess960 => ErrorClass::Unsupported,
            CbError::Decode(e) => e.class(),
        }
    }
}

/// Errors raised by the start-position and move-stream decoders.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("variations are not supported")]
    VariationsUnsupported,
    #[error("move stream ended unexpectedly at byte {0}")]
    UnexpectedEnd(usize),
    #[error("piece list has no entry for {kind:?} slot {slot}")]
    PieceOutOfBounds { kind: PieceKind, slot: usize },
    #[error("no piece on the source square of a two-byte move")]
    EmptySourceSquare,
    #[error("unknown promotion code {0}")]
    UnknownPromotion(u16),
    #[error("unknown en passant file {0}")]
    UnknownEpFile(u8),
    #[error("invalid piece code {0:#07b} in setup bitmap")]
    InvalidSetupCode(u8),
    #[error("setup bitmap ended before 64 squares were described")]
    SetupTooShort,
    #[error("setup places more than eight {0:?}")]
    TooManyPieces(PieceKind),
    #[error("setup must place exactly one king per side")]
    BadKingCount,
    #[error("no free piece-list slot for promoted {0:?}")]
    NoFreeSlot(PieceKind),
    #[error("malformed FEN field: {0}")]
    BadFen(String),
}

impl DecodeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            DecodeError::VariationsUnsupported => ErrorClass::Unsupported,
            _ => ErrorClass::Semantic,
        }
    }
}

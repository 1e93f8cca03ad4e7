use std::path::{Path, PathBuf};

use crate::game::Game;

use super::board::Chessboard;
use super::decoder;
use super::error::CbError;
use super::gameinfo::GameInfo;
use super::header::{self, HeaderRecord};
use super::mmap::FileView;
use super::player;
use super::setup;
use super::tournament;

/// The 6-byte format signature at the start of `.cbh`. Advisory only;
/// conversion proceeds for unknown signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    Cb9,
    CbLight,
    Unknown,
}

impl Signature {
    pub fn describe(self) -> &'static str {
        match self {
            Signature::Cb9 => "CB9+",
            Signature::CbLight => "Chess Program X / CB Light",
            Signature::Unknown => "unknown",
        }
    }
}

/// A ChessBase database: the four memory-mapped files sharing a basename.
///
/// All four views are read-only and independent; records cross-reference
/// them only through the offsets embedded in each `.cbh` record. Extraction
/// is a pure function of the views plus a record index, so callers may
/// shard the index space across workers freely.
#[derive(Debug)]
pub struct ChessBaseDatabase {
    cbh: FileView,
    cbp: FileView,
    cbt: FileView,
    cbg: FileView,
    base_path: PathBuf,
}

impl ChessBaseDatabase {
    /// Opens `base.cbh`, `base.cbp`, `base.cbt` and `base.cbg`; `base` may
    /// carry any of those extensions or none.
    pub fn load<P: AsRef<Path>>(base: P) -> Result<Self, CbError> {
        let base_path = base.as_ref().to_path_buf();
        Ok(ChessBaseDatabase {
            cbh: FileView::open(base_path.with_extension("cbh"))?,
            cbp: FileView::open(base_path.with_extension("cbp"))?,
            cbt: FileView::open(base_path.with_extension("cbt"))?,
            cbg: FileView::open(base_path.with_extension("cbg"))?,
            base_path,
        })
    }

    pub fn signature(&self) -> Signature {
        match self.cbh.bytes().get(..6) {
            Some(b"\x00\x00\x2C\x00\x2E\x01") => Signature::Cb9,
            Some(b"\x00\x00\x24\x00\x2E\x01") => Signature::CbLight,
            _ => Signature::Unknown,
        }
    }

    /// Number of 46-byte records, the leading file header included.
    pub fn num_records(&self) -> usize {
        self.cbh.len() / header::RECORD_SIZE
    }

    pub fn record(&self, index: usize) -> Option<&[u8]> {
        let start = index * header::RECORD_SIZE;
        self.cbh.bytes().get(start..start + header::RECORD_SIZE)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Decodes record `index` into a full `Game`.
    ///
    /// Fails without reading the blob when the record is not a game, is
    /// deleted, or carries an unsupported encoding flag.
    pub fn extract_game(&self, index: usize) -> Result<Game, CbError> {
        let record = self.record(index).ok_or(CbError::RecordTooShort {
            need: (index + 1) * header::RECORD_SIZE,
            got: self.cbh.len(),
        })?;
        let record = HeaderRecord::new(record);

        if !record.is_game()? {
            return Err(CbError::NotAGame);
        }
        if record.is_marked_deleted()? {
            return Err(CbError::MarkedDeleted);
        }

        let white = player::read_player(self.cbp.bytes(), record.white_offset()?)?;
        let black = player::read_player(self.cbp.bytes(), record.black_offset()?)?;
        let (event, site) = tournament::read_tournament(self.cbt.bytes(), record.tournament_offset()?)?;
        let date = record.date()?;
        let result = record.result()?;
        let round = record.round()?;
        let (white_elo, black_elo) = record.ratings()?;

        let blob_offset = record.game_offset()?;
        let info = GameInfo::parse(self.cbg.bytes(), blob_offset)?;
        info.reject_unsupported()?;

        let (fen, mut board) = if info.atypical_start {
            let start = setup::decode_start_position(self.cbg.bytes(), blob_offset)?;
            (start.fen, start.board)
        } else {
            (String::new(), Chessboard::initial())
        };

        let end = blob_offset + info.game_length;
        let move_bytes = self
            .cbg
            .bytes()
            .get(blob_offset + info.move_offset()..end)
            .ok_or(CbError::RecordTooShort {
                need: end,
                got: self.cbg.len(),
            })?;

        let mut moves = decoder::decode_moves(move_bytes, &mut board, &fen)?;
        moves.push_str(result);

        Ok(Game {
            event,
            site,
            date,
            round,
            white,
            black,
            result: result.to_string(),
            white_elo: white_elo as i32,
            black_elo: black_elo as i32,
            eco: String::new(),
            event_date: String::new(),
            source: String::new(),
            fen,
            moves,
        })
    }
}

use super::error::CbError;

/// The game-info word: the first four bytes of a game blob, big-endian.
///
/// | Bit(s) | Meaning |
/// |--------|---------|
/// | 31     | blob is encoded |
/// | 30     | non-initial starting position follows |
/// | 26     | special encoding (compressed or alternate cipher) |
/// | 18     | Chess960 game |
/// | 0..24  | total blob length in bytes, including this word |
const MASK_IS_ENCODED: u32 = 0x8000_0000;
const MASK_ATYPICAL_START: u32 = 0x4000_0000;
const MASK_SPECIAL_ENCODING: u32 = 0x0400_0000;
const MASK_IS_960: u32 = 0x0004_0000;
const MASK_GAME_LEN: u32 = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy)]
pub struct GameInfo {
    pub game_length: usize,
    pub atypical_start: bool,
    pub is_encoded: bool,
    pub is_special_encoded: bool,
    pub is_960: bool,
}

impl GameInfo {
    pub fn parse(cbg: &[u8], offset: usize) -> Result<Self, CbError> {
        let need = offset + 4;
        let bytes = cbg.get(offset..need).ok_or(CbError::RecordTooShort {
            need,
            got: cbg.len(),
        })?;
        let word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);

        Ok(GameInfo {
            game_length: (word & MASK_GAME_LEN) as usize,
            atypical_start: word & MASK_ATYPICAL_START != 0,
            is_encoded: word & MASK_IS_ENCODED != 0,
            is_special_encoded: word & MASK_SPECIAL_ENCODING != 0,
            is_960: word & MASK_IS_960 != 0,
        })
    }

    /// Rejects blobs outside the supported subset before anything past the
    /// info word is read.
    pub fn reject_unsupported(&self) -> Result<(), CbError> {
        if self.is_encoded {
            return Err(CbError::Encoded);
        }
        if self.is_special_encoded {
            return Err(CbError::SpecialEncoded);
        }
        if self.is_960 {
            return Err(CbError::Chess960);
        }
        Ok(())
    }

    /// Offset of the first move byte relative to the blob start: past the
    /// 28-byte setup block when one is present, otherwise right after the
    /// info word.
    pub fn move_offset(&self) -> usize {
        if self.atypical_start {
            32
        } else {
            4
        }
    }
}

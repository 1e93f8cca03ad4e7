use super::error::CbError;

/// `.cbp` player records.
///
/// The file-scoped version byte at offset `0x18` selects where the record
/// array begins: 32 for version 4, 28 for version 0. Records are 67 bytes;
/// the last name occupies 30 bytes at record+9 and the first name 20 bytes
/// at record+39, both padded with `0x00`/`0xFE`.
const RECORD_STRIDE: usize = 67;

const LAST_NAME_AT: usize = 9;
const LAST_NAME_LEN: usize = 30;
const FIRST_NAME_AT: usize = 39;
const FIRST_NAME_LEN: usize = 20;

/// Resolves a player offset to `"LastName, FirstName"`.
pub fn read_player(cbp: &[u8], player_no: usize) -> Result<String, CbError> {
    let start = record_base(cbp)? + player_no * RECORD_STRIDE;
    let need = start + FIRST_NAME_AT + FIRST_NAME_LEN;
    if cbp.len() < need {
        return Err(CbError::RecordTooShort {
            need,
            got: cbp.len(),
        });
    }

    let last = strip_name_padding(&cbp[start + LAST_NAME_AT..start + LAST_NAME_AT + LAST_NAME_LEN]);
    let first =
        strip_name_padding(&cbp[start + FIRST_NAME_AT..start + FIRST_NAME_AT + FIRST_NAME_LEN]);

    Ok(format!("{last}, {first}"))
}

/// Base of the record array per the version byte at `0x18`. There is no
/// fallback for other versions.
pub(super) fn record_base(file: &[u8]) -> Result<usize, CbError> {
    let version = *file.get(0x18).ok_or(CbError::RecordTooShort {
        need: 0x19,
        got: file.len(),
    })?;
    match version {
        4 => Ok(32),
        0 => Ok(28),
        v => Err(CbError::UnknownVersion(v)),
    }
}

/// Name fields pad to the right with `0x00` and `0xFE`, in any mix.
pub(super) fn strip_name_padding(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0x00 && b != 0xFE)
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cbp(version: u8, last: &str, first: &str) -> Vec<u8> {
        let base = if version == 4 { 32 } else { 28 };
        let mut file = vec![0u8; base + RECORD_STRIDE];
        file[0x18] = version;
        file[base + LAST_NAME_AT..base + LAST_NAME_AT + last.len()]
            .copy_from_slice(last.as_bytes());
        file[base + FIRST_NAME_AT..base + FIRST_NAME_AT + first.len()]
            .copy_from_slice(first.as_bytes());
        file
    }

    #[test]
    fn formats_last_comma_first() {
        let file = cbp(4, "Andreikin", "Dmitry");
        assert_eq!(read_player(&file, 0).unwrap(), "Andreikin, Dmitry");
    }

    #[test]
    fn version_zero_uses_smaller_base() {
        let file = cbp(0, "Vavulin", "Maksim");
        assert_eq!(read_player(&file, 0).unwrap(), "Vavulin, Maksim");
    }

    #[test]
    fn strips_fe_and_nul_padding() {
        let mut file = cbp(4, "Tal", "Mikhail");
        // pad byte mix directly after the last name
        file[32 + LAST_NAME_AT + 3] = 0xFE;
        file[32 + LAST_NAME_AT + 4] = 0x00;
        file[32 + LAST_NAME_AT + 5] = 0xFE;
        assert_eq!(read_player(&file, 0).unwrap(), "Tal, Mikhail");
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut file = cbp(4, "X", "Y");
        file[0x18] = 9;
        assert!(matches!(read_player(&file, 0), Err(CbError::UnknownVersion(9))));
    }

    #[test]
    fn out_of_range_offset_errors() {
        let file = cbp(4, "X", "Y");
        assert!(matches!(
            read_player(&file, 5),
            Err(CbError::RecordTooShort { .. })
        ));
    }
}

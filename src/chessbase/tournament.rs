use super::error::CbError;
use super::player::{record_base, strip_name_padding};

/// `.cbt` tournament records: same version-selected base as `.cbp`, stride
/// 99 bytes. The title (event) occupies 40 bytes at record+9 and the site
/// 30 bytes at record+49.
const RECORD_STRIDE: usize = 99;

const TITLE_AT: usize = 9;
const TITLE_LEN: usize = 40;
const SITE_AT: usize = 49;
const SITE_LEN: usize = 30;

/// Resolves a tournament offset to `(event, site)`.
pub fn read_tournament(cbt: &[u8], tournament_no: usize) -> Result<(String, String), CbError> {
    let start = record_base(cbt)? + tournament_no * RECORD_STRIDE;
    let need = start + RECORD_STRIDE;
    if cbt.len() < need {
        return Err(CbError::RecordTooShort {
            need,
            got: cbt.len(),
        });
    }

    let record = &cbt[start..start + RECORD_STRIDE];
    let title = strip_name_padding(&record[TITLE_AT..TITLE_AT + TITLE_LEN]);
    let site = strip_name_padding(&record[SITE_AT..SITE_AT + SITE_LEN]);

    Ok((title, site))
}

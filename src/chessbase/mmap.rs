use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use super::error::CbError;

/// Read-only memory map of one database file.
///
/// The mapping stays valid for the lifetime of the view; dropping the view
/// releases it. Record readers index into `bytes()` with explicit offsets.
#[derive(Debug)]
pub struct FileView {
    map: Mmap,
}

impl FileView {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CbError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        // SAFETY: the file is opened read-only; the database is not expected
        // to be modified while a conversion runs.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| CbError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(FileView { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.map
    }
}

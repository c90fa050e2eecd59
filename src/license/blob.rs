//! Logo TMD handling (sectors 5 to 15).
//!
//! The BIOS draws the PlayStation logo at boot from a TMD stored in the user data of the
//! sectors following the license string. The TMD is treated as an opaque byte blob here.
//!
//! Pressed discs only use sectors 5 to 11 (0xff-filled past the end of the TMD), the BIOS is
//! assumed not to read any further. Sectors 12 to 15 are zero-filled but can technically hold
//! the end of an oversized blob.

use super::{LicenseArea, BLOB_FIRST_SECTOR, LICENSE_SECTORS};
use crate::sector::DATA_SIZE;
use crate::{LicenseError, LicenseResult};

/// First sector after the part of the blob area read by the BIOS
const ZERO_FILL_FIRST_SECTOR: usize = 12;

/// Number of bytes the BIOS is assumed to read (sectors 5 to 11)
pub const ASSUMED_BLOB_LIMIT: usize = (ZERO_FILL_FIRST_SECTOR - BLOB_FIRST_SECTOR) * DATA_SIZE;

/// Physical capacity of the blob area (sectors 5 to 15)
pub const ABSOLUTE_BLOB_LIMIT: usize = (LICENSE_SECTORS - BLOB_FIRST_SECTOR) * DATA_SIZE;

/// How the blob is extracted from the license area
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BlobExtraction {
    /// The user data of all the blob sectors, concatenated as-is
    Raw,
    /// Skip the sectors that contain only zeroes and strip the trailing 0xff padding. This is
    /// what should be exported as a TMD file.
    Logical,
}

/// Result of `validate_blob_size`
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct BlobCheck {
    /// True if the blob fits in the license area
    pub writable: bool,
    /// If `writable` this is the number of bytes past `ASSUMED_BLOB_LIMIT` (negative if the
    /// blob is smaller), otherwise the number of bytes past `ABSOLUTE_BLOB_LIMIT`.
    pub over_by: isize,
}

/// Check whether `blob` can be written to the license area and by how much it exceeds the size
/// the BIOS is assumed to read. A blob that's `writable` but with a positive `over_by` may or
/// may not be displayed properly.
pub fn validate_blob_size(blob: &[u8]) -> BlobCheck {
    let size = blob.len() as isize;

    let writable = blob.len() <= ABSOLUTE_BLOB_LIMIT;

    let over_by = if writable {
        size - ASSUMED_BLOB_LIMIT as isize
    } else {
        size - ABSOLUTE_BLOB_LIMIT as isize
    };

    BlobCheck { writable, over_by }
}

impl LicenseArea {
    /// Extract the blob from sectors 5 to 15
    pub fn blob(&self, extraction: BlobExtraction) -> Vec<u8> {
        let sectors = &self.sectors[BLOB_FIRST_SECTOR..];

        let mut blob = Vec::with_capacity(ABSOLUTE_BLOB_LIMIT);

        for sector in sectors {
            let data = &sector.data[..];

            if extraction == BlobExtraction::Logical && data.iter().all(|&b| b == 0) {
                continue;
            }

            blob.extend_from_slice(data);
        }

        if extraction == BlobExtraction::Logical {
            let len = blob.iter().rposition(|&b| b != 0xff).map_or(0, |p| p + 1);

            blob.truncate(len);
        }

        blob
    }

    /// Replace the blob. Sectors 5 to 11 are 0xff-filled and sectors 12 to 15 are zero-filled
    /// before `blob` is copied over them.
    ///
    /// Returns `LicenseError::BlobTooLarge` without modifying anything if `blob` doesn't fit,
    /// `validate_blob_size` should be used beforehand to avoid that.
    pub fn set_blob(&mut self, blob: &[u8]) -> LicenseResult<()> {
        if blob.len() > ABSOLUTE_BLOB_LIMIT {
            return Err(LicenseError::BlobTooLarge {
                len: blob.len(),
                max: ABSOLUTE_BLOB_LIMIT,
            });
        }

        for (i, sector) in self.sectors.iter_mut().enumerate().skip(BLOB_FIRST_SECTOR) {
            let fill = if i < ZERO_FILL_FIRST_SECTOR { 0xff } else { 0x00 };

            sector.data.fill(fill);
        }

        for (i, chunk) in blob.chunks(DATA_SIZE).enumerate() {
            let sector = &mut self.sectors[BLOB_FIRST_SECTOR + i];

            sector.data[..chunk.len()].copy_from_slice(chunk);
        }

        log::debug!("Patched license TMD ({} bytes)", blob.len());

        Ok(())
    }
}

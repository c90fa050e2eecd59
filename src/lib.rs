//! Read and rewrite the license area of PlayStation disc images.
//!
//! The first 16 sectors of a PlayStation disc are reserved by the console for the license
//! string and the descriptor ("TMD") of the logo the BIOS displays at boot. They are stored as
//! raw CD-ROM XA Mode 2 Form 1 sectors, see
//! <https://psx-spx.consoledev.net/cdromformat/#system-area-prior-to-volume-descriptors>.
//!
//! The EDC/ECC fields of those sectors are wrong on most pressed discs (early mastering tools
//! didn't understand CD-XA) so the BIOS only looks at the 2048 bytes of user data of each
//! sector. This crate never recomputes them: they are carried through verbatim.

#![warn(missing_docs)]

#[macro_use]
extern crate arrayref;
extern crate thiserror;

pub use license::blob::{validate_blob_size, BlobCheck, BlobExtraction};
pub use license::text::Region;
pub use license::{LicenseArea, LicensePatch, PatchReport};
pub use msf::Msf;
pub use sector::XaForm1Sector;

use std::io;
use thiserror::Error;

pub mod license;
pub mod msf;
pub mod sector;

#[cfg(test)]
mod tests;

/// Error type for license area operations.
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum LicenseError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Could not parse the disc sector (wrong length: expected 2352 bytes, got {0})")]
    MalformedSector(usize),
    #[error(
        "Reached end of image too early while reading sector {sector}, \
         check the path is actually a disc BIN image"
    )]
    TruncatedSource { sector: usize },
    #[error("Wrote too few bytes for sector {sector}")]
    ShortWrite { sector: usize },
    #[error("Descriptor blob is {len} bytes long but the license area only holds {max} bytes")]
    BlobTooLarge { len: usize, max: usize },
    #[error("Unknown region `{0}`, expected one of JP, EUR or US")]
    BadRegion(String),
}

/// Convenience type alias for a `Result<R, LicenseError>`
pub type LicenseResult<R> = std::result::Result<R, LicenseError>;

#[test]
fn license_error_display() {
    // Make sure that LicenseError implements Display. This should be true if we set an
    // `#[error("...")]` for every variant
    println!("{}", LicenseError::TruncatedSource { sector: 3 });
    println!("{}", LicenseError::MalformedSector(12));
}

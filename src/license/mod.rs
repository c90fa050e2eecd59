//! The PlayStation license area.
//!
//! It's made of the first 16 raw sectors of the disc image:
//!
//!   Sector 0..3   - Zero-filled (Mode 2 Form 1)
//!   Sector 4      - License string
//!   Sector 5..11  - PlayStation logo TMD (remaining bytes 0xff-filled)
//!   Sector 12..15 - Zero-filled (Mode 2 Form 2)
//!
//! The whole area is loaded in RAM, patched and then written back in one go. Nothing is written
//! to the image until `LicenseArea::write_to` is called.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::msf::Msf;
use crate::sector::{XaForm1Sector, SECTOR_SIZE, SYNC_PATTERN};
use crate::{LicenseError, LicenseResult};

use self::blob::{validate_blob_size, BlobCheck};
use self::text::{Region, TEXT_LENGTH};

pub mod blob;
pub mod text;

/// Number of sectors in the license area
pub const LICENSE_SECTORS: usize = 16;

/// Size of the license area in the raw disc image
pub const LICENSE_AREA_SIZE: usize = LICENSE_SECTORS * SECTOR_SIZE;

/// Index of the sector containing the license string
pub const TEXT_SECTOR: usize = 4;

/// Index of the first sector of the logo TMD
pub const BLOB_FIRST_SECTOR: usize = 5;

/// Index of the first sector advertised as Mode 2 Form 2 on pressed discs
const FORM2_FIRST_SECTOR: usize = 12;

/// Sub-header of the Form 1 sectors (data bit set)
const FORM1_SUBHEADER: [u8; 8] = [0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x08, 0x00];

/// Sub-header of the Form 2 sectors (form 2 bit set)
const FORM2_SUBHEADER: [u8; 8] = [0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x20, 0x00];

/// The 16 sectors of a license area. Sectors are never added, removed or reordered, only their
/// payload is modified.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct LicenseArea {
    /// Always `LICENSE_SECTORS` long
    sectors: Vec<XaForm1Sector>,
}

impl LicenseArea {
    /// Build a license area made of 16 sectors containing only zeroes
    pub fn zeroed() -> LicenseArea {
        LicenseArea {
            sectors: vec![XaForm1Sector::empty(); LICENSE_SECTORS],
        }
    }

    /// Build a license area with valid headers and empty payloads. The first sector is assumed
    /// to be at 00:02:00, just like track 01 of a BIN image.
    pub fn blank() -> LicenseArea {
        let mut area = LicenseArea::zeroed();

        for (i, sector) in area.sectors.iter_mut().enumerate() {
            sector.sync = SYNC_PATTERN;
            // 150 is always a valid sector index
            sector.address = Msf::from_sector_index(150 + i as u32)
                .unwrap_or(Msf::ZERO)
                .into_bcd();
            sector.mode = 2;
            sector.subheader = if i < FORM2_FIRST_SECTOR {
                FORM1_SUBHEADER
            } else {
                FORM2_SUBHEADER
            };
        }

        area
    }

    /// Parse a license area from the first `LICENSE_AREA_SIZE` bytes of `image`. Returns
    /// `LicenseError::TruncatedSource` if `image` is too short.
    pub fn from_bytes(image: &[u8]) -> LicenseResult<LicenseArea> {
        let mut sectors = Vec::with_capacity(LICENSE_SECTORS);

        for i in 0..LICENSE_SECTORS {
            let offset = i * SECTOR_SIZE;

            let raw = match image.get(offset..offset + SECTOR_SIZE) {
                Some(r) => r,
                None => return Err(LicenseError::TruncatedSource { sector: i }),
            };

            sectors.push(XaForm1Sector::from_bytes(raw)?);
        }

        Ok(LicenseArea { sectors })
    }

    /// Read the license area from the start of a disc image. Each sector is read from its fixed
    /// offset `SECTOR_SIZE * index`.
    pub fn read_from<R: Read + Seek>(image: &mut R) -> LicenseResult<LicenseArea> {
        let mut sectors = Vec::with_capacity(LICENSE_SECTORS);
        let mut raw = [0; SECTOR_SIZE];

        for i in 0..LICENSE_SECTORS {
            let offset = (SECTOR_SIZE * i) as u64;

            image.seek(SeekFrom::Start(offset))?;

            if let Err(e) = image.read_exact(&mut raw) {
                return Err(match e.kind() {
                    io::ErrorKind::UnexpectedEof => LicenseError::TruncatedSource { sector: i },
                    _ => LicenseError::IoError(e),
                });
            }

            log::trace!("Read license sector {} at offset {}", i, offset);

            sectors.push(XaForm1Sector::from_bytes(&raw)?);
        }

        log::debug!("Loaded {} license sectors", sectors.len());

        Ok(LicenseArea { sectors })
    }

    /// Write the license area back to a disc image, at the same offsets it was read from.
    ///
    /// There's no rollback: if the write fails partway through the image may contain a mix of
    /// old and new sectors.
    pub fn write_to<W: Write + Seek>(&self, image: &mut W) -> LicenseResult<()> {
        for (i, sector) in self.sectors.iter().enumerate() {
            let offset = (SECTOR_SIZE * i) as u64;

            image.seek(SeekFrom::Start(offset))?;

            if let Err(e) = image.write_all(&sector.to_bytes()) {
                return Err(match e.kind() {
                    io::ErrorKind::WriteZero => LicenseError::ShortWrite { sector: i },
                    _ => LicenseError::IoError(e),
                });
            }

            log::trace!("Wrote license sector {} at offset {}", i, offset);
        }

        image.flush()?;

        log::debug!("Wrote {} license sectors", self.sectors.len());

        Ok(())
    }

    /// Serialize the whole area into a `LICENSE_AREA_SIZE` buffer
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut image = Vec::with_capacity(LICENSE_AREA_SIZE);

        for sector in &self.sectors {
            image.extend_from_slice(&sector.to_bytes());
        }

        image
    }

    /// Return a reference to the sector at `index` or `None` if it's out of bounds
    pub fn sector(&self, index: usize) -> Option<&XaForm1Sector> {
        self.sectors.get(index)
    }

    /// Return the full sector list
    pub fn sectors(&self) -> &[XaForm1Sector] {
        &self.sectors
    }
}

/// A set of modifications to apply to a license area, as selected by the user.
#[derive(Clone, Debug, Default)]
pub struct LicensePatch {
    /// Region of the disc. If no custom `text` is provided the region's default license string
    /// is used. The Japanese region also selects the Japanese sector padding.
    pub region: Option<Region>,
    /// Custom license text, overrides the region's default string
    pub text: Option<Vec<u8>>,
    /// Logo TMD to embed
    pub blob: Option<Vec<u8>>,
}

/// Non-fatal issues found while applying a `LicensePatch`
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PatchReport {
    /// The custom text was longer than `TEXT_LENGTH` and has been truncated
    pub text_truncated: bool,
    /// The TMD is bigger than what the BIOS is assumed to read, by this many bytes
    pub blob_over_assumed_limit: Option<usize>,
}

impl LicensePatch {
    /// Apply the patch to `area`. The TMD size is validated before anything is modified so if
    /// an error is returned `area` is left untouched.
    pub fn apply(&self, area: &mut LicenseArea) -> LicenseResult<PatchReport> {
        let mut report = PatchReport::default();

        let blob_check = match &self.blob {
            Some(blob) => match validate_blob_size(blob) {
                BlobCheck {
                    writable: false, ..
                } => {
                    return Err(LicenseError::BlobTooLarge {
                        len: blob.len(),
                        max: blob::ABSOLUTE_BLOB_LIMIT,
                    })
                }
                check => Some(check),
            },
            None => None,
        };

        let japanese = self.region.map(Region::is_japanese).unwrap_or(false);

        match (&self.text, self.region) {
            (Some(text), _) => {
                report.text_truncated = text.len() > TEXT_LENGTH;
                area.set_text(text, japanese);
            }
            (None, Some(region)) => area.set_text(region.default_text(), japanese),
            (None, None) => (),
        }

        if let Some(blob) = &self.blob {
            area.set_blob(blob)?;
        }

        if let Some(check) = blob_check {
            if check.over_by > 0 {
                report.blob_over_assumed_limit = Some(check.over_by as usize);
            }
        }

        Ok(report)
    }
}

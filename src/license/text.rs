//! License string handling (sector 4).
//!
//! The string itself is 70 bytes of space-padded ASCII at the start of the sector's payload.
//! EU and US discs zero-fill the rest of the payload, Japanese discs fill it with a repeating
//! 64 byte pattern that runs one byte past the end of the user data.

use std::fmt;
use std::str::FromStr;

use super::{LicenseArea, TEXT_SECTOR};
use crate::sector::DATA_SIZE;
use crate::LicenseError;

/// Length of the license string in the text sector
pub const TEXT_LENGTH: usize = 70;

/// Length of the Japanese string. The last 5 bytes of the text are covered by the padding
/// pattern.
pub const JAPANESE_TEXT_LENGTH: usize = 65;

/// Period of the Japanese padding pattern
const JAPANESE_PATTERN_LENGTH: usize = 64;

/// License string of European discs
pub const EUROPE_TEXT: &[u8; TEXT_LENGTH] =
    b"          Licensed  by          Sony Computer Entertainment Euro pe   ";

/// License string of American discs
pub const US_TEXT: &[u8; TEXT_LENGTH] =
    b"          Licensed  by          Sony Computer Entertainment Amer  ica ";

/// License string of Japanese discs
pub const JAPAN_TEXT: &[u8; JAPANESE_TEXT_LENGTH] =
    b"          Licensed  by          Sony Computer Entertainment Inc.\n";

/// Disc region, selects the default license string and the padding of the text sector
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// NTSC-J
    Japan,
    /// PAL
    Europe,
    /// NTSC-U/C
    Us,
}

impl Region {
    /// Return the canonical license string for this region
    pub fn default_text(self) -> &'static [u8] {
        match self {
            Region::Japan => JAPAN_TEXT,
            Region::Europe => EUROPE_TEXT,
            Region::Us => US_TEXT,
        }
    }

    /// True if the text sector uses the Japanese padding pattern
    pub fn is_japanese(self) -> bool {
        self == Region::Japan
    }

    /// Number of meaningful bytes in the license string for this region
    pub fn text_length(self) -> usize {
        self.default_text().len()
    }
}

impl FromStr for Region {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JP" => Ok(Region::Japan),
            "EUR" => Ok(Region::Europe),
            "US" => Ok(Region::Us),
            _ => Err(LicenseError::BadRegion(s.to_string())),
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Region::Japan => "JP",
            Region::Europe => "EUR",
            Region::Us => "US",
        };

        f.write_str(s)
    }
}

/// Value of the Japanese padding at `offset` bytes past the end of the string: 62 * 0x30, then
/// 0x0a, then 0x30
fn japanese_padding(offset: usize) -> u8 {
    match offset % JAPANESE_PATTERN_LENGTH {
        62 => 0x0a,
        _ => 0x30,
    }
}

impl LicenseArea {
    /// Return the raw 70 bytes of the license string, without any trimming
    pub fn text(&self) -> [u8; TEXT_LENGTH] {
        *array_ref![self.sectors[TEXT_SECTOR].data, 0, TEXT_LENGTH]
    }

    /// Replace the license string. `text` is padded with spaces to `TEXT_LENGTH` bytes, or
    /// silently truncated if it's longer.
    ///
    /// The rest of the payload is zeroed, or filled with the Japanese padding if `japanese` is
    /// true. Since the original mastering tool let that padding overrun the user data, the first
    /// byte of the EDC is also set to 0x30 in that case.
    pub fn set_text(&mut self, text: &[u8], japanese: bool) {
        let sector = &mut self.sectors[TEXT_SECTOR];

        sector.data = [0; DATA_SIZE];

        let (line, padding) = sector.data.split_at_mut(TEXT_LENGTH);

        let len = text.len().min(TEXT_LENGTH);

        line[..len].copy_from_slice(&text[..len]);
        line[len..].fill(b' ');

        if japanese {
            for (offset, b) in padding.iter_mut().enumerate() {
                *b = japanese_padding(offset);
            }

            // The pattern would continue with 0x30 past the user data
            sector.edc[0] = japanese_padding(padding.len());
        }

        log::debug!(
            "Patched license text ({} bytes, japanese padding: {})",
            text.len(),
            japanese
        );
    }

    /// Identify the region by comparing the license string with the canonical ones. Japanese
    /// discs only match on the first `JAPANESE_TEXT_LENGTH` bytes.
    pub fn region(&self) -> Option<Region> {
        let text = self.text();

        if &text == EUROPE_TEXT {
            Some(Region::Europe)
        } else if &text == US_TEXT {
            Some(Region::Us)
        } else if text.starts_with(JAPAN_TEXT) {
            Some(Region::Japan)
        } else {
            None
        }
    }

    /// Return the license string as it should be exported: the full 70 bytes, or only the
    /// first `JAPANESE_TEXT_LENGTH` bytes for Japanese discs.
    pub fn text_export(&self) -> Vec<u8> {
        let len = match self.region() {
            Some(r) => r.text_length(),
            None => TEXT_LENGTH,
        };

        self.text()[..len].to_vec()
    }
}

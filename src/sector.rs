//! Raw CD-ROM XA Mode 2 Form 1 sector codec.
//!
//! A raw sector is 2352 bytes long:
//!
//!   bytes    0..12:   sync pattern (0x00, 0xff * 10, 0x00)
//!   bytes   12..15:   BCD address (MSF)
//!   byte        15:   mode (2 for CD-ROM XA)
//!   bytes   16..24:   XA sub-header
//!   bytes   24..2072: user data
//!   bytes 2072..2076: error detection code
//!   bytes 2076..2352: error correction code
//!
//! None of the fields are validated when parsing: license sectors are frequently "wrong" in
//! every possible way besides the user data.

use crate::msf::Msf;
use crate::{LicenseError, LicenseResult};

/// Size of a raw sector in bytes
pub const SECTOR_SIZE: usize = 2352;

/// Size of the user data in a Form 1 sector
pub const DATA_SIZE: usize = 2048;

/// Sync pattern found at the start of every CD-ROM sector
pub const SYNC_PATTERN: [u8; 12] = [
    0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00,
];

/// A single raw Mode 2 Form 1 sector split into its fields. `XaForm1Sector::to_bytes` is the
/// exact inverse of `XaForm1Sector::from_bytes`.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XaForm1Sector {
    /// Sync pattern, normally `SYNC_PATTERN`
    pub sync: [u8; 12],
    /// BCD sector address
    pub address: [u8; 3],
    /// CD-ROM mode, normally 2
    pub mode: u8,
    /// XA sub-header. The 4 bytes are repeated twice.
    pub subheader: [u8; 8],
    /// User data
    #[cfg_attr(feature = "serde", serde(with = "serde_big_array::BigArray"))]
    pub data: [u8; DATA_SIZE],
    /// Error detection code, never checked
    pub edc: [u8; 4],
    /// Error correction code, never checked
    #[cfg_attr(feature = "serde", serde(with = "serde_big_array::BigArray"))]
    pub ecc: [u8; 276],
}

impl XaForm1Sector {
    /// Create a sector containing only zeroes
    pub fn empty() -> XaForm1Sector {
        XaForm1Sector {
            sync: [0; 12],
            address: [0; 3],
            mode: 0,
            subheader: [0; 8],
            data: [0; DATA_SIZE],
            edc: [0; 4],
            ecc: [0; 276],
        }
    }

    /// Split a raw sector into its fields. `raw` must be exactly `SECTOR_SIZE` bytes long,
    /// otherwise `LicenseError::MalformedSector` is returned. This is the only check performed.
    pub fn from_bytes(raw: &[u8]) -> LicenseResult<XaForm1Sector> {
        if raw.len() != SECTOR_SIZE {
            return Err(LicenseError::MalformedSector(raw.len()));
        }

        let raw = array_ref![raw, 0, SECTOR_SIZE];

        let (sync, address, mode, subheader, data, edc, ecc) =
            array_refs![raw, 12, 3, 1, 8, 2048, 4, 276];

        Ok(XaForm1Sector {
            sync: *sync,
            address: *address,
            mode: mode[0],
            subheader: *subheader,
            data: *data,
            edc: *edc,
            ecc: *ecc,
        })
    }

    /// Serialize the sector back into its raw 2352 byte representation
    pub fn to_bytes(&self) -> [u8; SECTOR_SIZE] {
        let mut raw = [0; SECTOR_SIZE];

        {
            let (sync, address, mode, subheader, data, edc, ecc) =
                mut_array_refs![&mut raw, 12, 3, 1, 8, 2048, 4, 276];

            *sync = self.sync;
            *address = self.address;
            mode[0] = self.mode;
            *subheader = self.subheader;
            *data = self.data;
            *edc = self.edc;
            *ecc = self.ecc;
        }

        raw
    }

    /// Returns true if the sector starts with the standard CD-ROM sync pattern
    pub fn has_sync_pattern(&self) -> bool {
        self.sync == SYNC_PATTERN
    }

    /// Decode the sector address from the header. Returns `None` if it's not valid BCD.
    pub fn msf(&self) -> Option<Msf> {
        let [m, s, f] = self.address;

        Msf::from_bcd(m, s, f)
    }

    /// Return the XA form advertised in the first copy of the sub-header's submode byte. This
    /// is informational only, the sector is always split using the Form 1 layout.
    pub fn form(&self) -> XaForm {
        let submode = self.subheader[2];

        if submode & (1 << 5) != 0 {
            XaForm::Form2
        } else {
            XaForm::Form1
        }
    }
}

impl Default for XaForm1Sector {
    fn default() -> XaForm1Sector {
        XaForm1Sector::empty()
    }
}

/// CD-ROM XA Mode 2 sectors have two possible forms (advertised in the subheader)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum XaForm {
    /// Mode 2 Form 1: 2048 bytes of data, 4 bytes of error detection and 276 bytes of error
    /// correction
    Form1 = 0,
    /// Mode 2 Form 2: 2324 bytes of data, 4 bytes of "quality control".
    Form2 = 1,
}

#[cfg(test)]
mod test {
    use super::*;

    /// A sector where every byte is different from its neighbours so that misplaced fields
    /// are caught
    fn patterned() -> Vec<u8> {
        (0..SECTOR_SIZE).map(|i| (i * 7 + i / 256) as u8).collect()
    }

    #[test]
    fn field_offsets() {
        let raw = patterned();
        let sector = XaForm1Sector::from_bytes(&raw).unwrap();

        assert_eq!(&sector.sync[..], &raw[0..12]);
        assert_eq!(&sector.address[..], &raw[12..15]);
        assert_eq!(sector.mode, raw[15]);
        assert_eq!(&sector.subheader[..], &raw[16..24]);
        assert_eq!(&sector.data[..], &raw[24..2072]);
        assert_eq!(&sector.edc[..], &raw[2072..2076]);
        assert_eq!(&sector.ecc[..], &raw[2076..2352]);
    }

    #[test]
    fn serialize_inverts_parse() {
        let raw = patterned();
        let sector = XaForm1Sector::from_bytes(&raw).unwrap();
        let out = sector.to_bytes();

        assert_eq!(&out[..], &raw[..]);
        assert_eq!(XaForm1Sector::from_bytes(&out).unwrap(), sector);
    }

    #[test]
    fn wrong_length() {
        for &len in &[0, 1, 2048, SECTOR_SIZE - 1, SECTOR_SIZE + 1, 2448] {
            let raw = vec![0u8; len];

            match XaForm1Sector::from_bytes(&raw) {
                Err(LicenseError::MalformedSector(l)) => assert_eq!(l, len),
                r => panic!("Unexpected result for length {}: {:?}", len, r),
            }
        }
    }

    #[test]
    fn empty_sector() {
        let sector = XaForm1Sector::empty();

        assert_eq!(sector.to_bytes(), [0; SECTOR_SIZE]);
        assert!(!sector.has_sync_pattern());
        assert_eq!(sector.msf(), Some(crate::Msf::ZERO));
    }

    #[test]
    fn header_helpers() {
        let mut raw = vec![0u8; SECTOR_SIZE];

        raw[0..12].copy_from_slice(&SYNC_PATTERN);
        raw[12..15].copy_from_slice(&[0x00, 0x02, 0x04]);
        raw[15] = 2;
        raw[16..24].copy_from_slice(&[0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0x20, 0x00]);

        let sector = XaForm1Sector::from_bytes(&raw).unwrap();

        assert!(sector.has_sync_pattern());
        assert_eq!(sector.msf().unwrap().sector_index(), 154);
        assert_eq!(sector.form(), XaForm::Form2);
    }
}

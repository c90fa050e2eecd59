//! Sector addresses in the CD-ROM header are stored in "minute:second:frame" format, where frame
//! means sector. There are 75 frames in a second and 60 seconds in a minute, all three
//! components are BCD-encoded.

use std::fmt;

/// CD "minute:second:frame" timestamp, stored as a triplet of *BCD* encoded bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Msf(u8, u8, u8);

impl Msf {
    /// MSF for 00:00:00
    pub const ZERO: Msf = Msf(0, 0, 0);

    /// Build an MSF from a BCD triplet. Returns `None` if one of the values is not valid BCD or
    /// if `s` is greater than 0x59 or `f` greater than 0x74.
    pub const fn from_bcd(m: u8, s: u8, f: u8) -> Option<Msf> {
        if !is_bcd(m) || !is_bcd(s) || !is_bcd(f) {
            return None;
        }

        // Only 75 frames per second and 60 seconds per minute
        if s < 0x60 && f < 0x75 {
            Some(Msf(m, s, f))
        } else {
            None
        }
    }

    /// Build an MSF from a sector index. Returns None if the index is out of range.
    pub const fn from_sector_index(si: u32) -> Option<Msf> {
        let m = si / (60 * 75);

        if m > 99 {
            return None;
        }

        let si = si % (60 * 75);

        let s = si / 75;
        let f = si % 75;

        Some(Msf(to_bcd(m as u8), to_bcd(s as u8), to_bcd(f as u8)))
    }

    /// Convert an MSF into a sector index. In this convention sector index 0 is MSF 00:00:00
    pub const fn sector_index(self) -> u32 {
        let Msf(m, s, f) = self;

        let m = from_bcd(m) as u32;
        let s = from_bcd(s) as u32;
        let f = from_bcd(f) as u32;

        (60 * 75 * m) + (75 * s) + f
    }

    /// Return the raw BCD bytes, in the order they're stored in a sector header
    pub const fn into_bcd(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Msf(m, s, fr) = *self;

        write!(f, "{:02x}:{:02x}:{:02x}", m, s, fr)
    }
}

const fn is_bcd(b: u8) -> bool {
    b <= 0x99 && (b & 0xf) <= 0x9
}

const fn to_bcd(b: u8) -> u8 {
    ((b / 10) << 4) | (b % 10)
}

const fn from_bcd(b: u8) -> u8 {
    (b >> 4) * 10 + (b & 0xf)
}

use core::fmt;

/// Longest UID a PN532 reports (triple size ISO14443A)
pub const MAX_UID_LENGTH: usize = 10;
pub const BLOCK_LENGTH: usize = 16;
pub const PAGE_LENGTH: usize = 4;
pub const KEY_LENGTH: usize = 6;

/// Mifare Classic data block
pub type Block = [u8; BLOCK_LENGTH];
/// Mifare Ultralight page
pub type Page = [u8; PAGE_LENGTH];

/// Unique identifier of a card seen during anti-collision.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct Uid {
    bytes: [u8; MAX_UID_LENGTH],
    len: u8,
}

impl Uid {
    /// Returns `None` for an empty or oversized identifier
    pub fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() || bytes.len() > MAX_UID_LENGTH {
            return None;
        }
        let mut buffer = [0u8; MAX_UID_LENGTH];
        buffer[..bytes.len()].copy_from_slice(bytes);
        Some(Uid {
            bytes: buffer,
            len: bytes.len() as u8,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Always false, a `Uid` holds at least one byte
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Card family guessed from the UID length
    pub fn family(&self) -> CardFamily {
        match self.len {
            4 => CardFamily::MifareClassic,
            7 => CardFamily::MifareUltralight,
            _ => CardFamily::Unknown,
        }
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Hex(self.as_bytes()), f)
    }
}

impl fmt::Debug for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uid({})", self)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CardFamily {
    /// 4 byte UID, sector based memory behind key authentication
    MifareClassic,
    /// 7 byte UID, open 4 byte pages
    MifareUltralight,
    Unknown,
}

/// Which of the two sector keys to authenticate with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KeyType {
    A,
    B,
}

/// Mifare Classic sector key
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Key(pub [u8; KEY_LENGTH]);

impl Key {
    /// Factory default transport key
    pub const DEFAULT: Key = Key([0xFF; KEY_LENGTH]);
}

impl Default for Key {
    fn default() -> Self {
        Key::DEFAULT
    }
}

/// Sector of a Mifare Classic block with its first and last block.
///
/// The first 32 sectors hold 4 blocks, the upper sectors of a 4K card hold 16.
pub fn classic_sector(block: u8) -> (u8, u8, u8) {
    if block < 128 {
        let sector = block / 4;
        (sector, sector * 4, sector * 4 + 3)
    } else {
        let offset = (block - 128) / 16;
        let first = 128 + offset * 16;
        (32 + offset, first, first + 15)
    }
}

/// Modulation and baud rate requested from the reader when listing targets.
/// Discriminants are the PN532 `BrTy` codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Technology {
    Iso14443A = 0x00,
    Felica212 = 0x01,
    Felica424 = 0x02,
    Iso14443B = 0x03,
    Jewel = 0x04,
}

impl Technology {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Default for Technology {
    fn default() -> Self {
        Technology::Iso14443A
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Technology::Iso14443A => "ISO14443A",
            Technology::Felica212 => "FeliCa 212",
            Technology::Felica424 => "FeliCa 424",
            Technology::Iso14443B => "ISO14443B",
            Technology::Jewel => "Jewel",
        })
    }
}

/// Version word returned by the reader's firmware query.
///
/// Layout, most significant byte first: IC, version, revision, support.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FirmwareVersion(pub u32);

impl FirmwareVersion {
    /// A zero word means the chip did not answer
    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }

    pub fn ic(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn version(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn revision(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn support(&self) -> u8 {
        self.0 as u8
    }
}

impl From<[u8; 4]> for FirmwareVersion {
    fn from(bytes: [u8; 4]) -> Self {
        FirmwareVersion(u32::from_be_bytes(bytes))
    }
}

/// Uppercase hex, two digits per byte, no separators.
pub struct Hex<'a>(pub &'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Prefixed hex listing: ` 0x04 0xA1 0x3B`
pub struct HexList<'a>(pub &'a [u8]);

impl fmt::Display for HexList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, " 0x{:02X}", byte)?;
        }
        Ok(())
    }
}

/// Hex bytes followed by their printable characters, `.` for the rest
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{:02X} ", byte)?;
        }
        f.write_str(" ")?;
        for &byte in self.0 {
            let c = if (0x20..=0x7E).contains(&byte) {
                byte as char
            } else {
                '.'
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

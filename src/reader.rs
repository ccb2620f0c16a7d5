use core::fmt::Debug;

use crate::card::{Block, FirmwareVersion, Key, KeyType, Page, Technology, Uid};

/// Command set of a PN532 class reader driver.
///
/// The poll loop only sequences these calls; framing, bus timing,
/// anti-collision and Crypto1 stay inside the implementation.
pub trait Reader {
    type Error: Debug;

    /// Bring up the bus and wake the chip
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Query the firmware word. Zero or an error means the chip did not answer yet.
    fn firmware_version(&mut self) -> Result<FirmwareVersion, Self::Error>;

    /// Select the card detection operating mode (SAM configuration)
    fn configure(&mut self) -> Result<(), Self::Error>;

    /// List one passive target.
    /// Returns `WouldBlock` if no card answered within the driver's timeout.
    fn detect_passive_target(&mut self, technology: Technology) -> nb::Result<Uid, Self::Error>;

    fn authenticate_block(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &Key,
    ) -> Result<(), Self::Error>;

    fn read_block(&mut self, block: u8) -> Result<Block, Self::Error>;

    fn write_block(&mut self, block: u8, data: &Block) -> Result<(), Self::Error>;

    fn read_page(&mut self, page: u8) -> Result<Page, Self::Error>;
}

impl<R: Reader + ?Sized> Reader for &mut R {
    type Error = R::Error;

    fn begin(&mut self) -> Result<(), Self::Error> {
        (**self).begin()
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, Self::Error> {
        (**self).firmware_version()
    }

    fn configure(&mut self) -> Result<(), Self::Error> {
        (**self).configure()
    }

    fn detect_passive_target(&mut self, technology: Technology) -> nb::Result<Uid, Self::Error> {
        (**self).detect_passive_target(technology)
    }

    fn authenticate_block(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &Key,
    ) -> Result<(), Self::Error> {
        (**self).authenticate_block(uid, block, key_type, key)
    }

    fn read_block(&mut self, block: u8) -> Result<Block, Self::Error> {
        (**self).read_block(block)
    }

    fn write_block(&mut self, block: u8, data: &Block) -> Result<(), Self::Error> {
        (**self).write_block(block, data)
    }

    fn read_page(&mut self, page: u8) -> Result<Page, Self::Error> {
        (**self).read_page(page)
    }
}

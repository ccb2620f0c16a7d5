//! Card poll loop for PN532 class NFC readers.
//!
//! The [`Poller`] owns a [`Reader`] driver, a status pin, a delay and a
//! [`Console`]. After [`Poller::init`] waited for the chip's firmware answer,
//! every [`Poller::poll`] lists one passive target and reports what it found:
//!
//! - [`Mode::Inspect`] authenticates Mifare Classic cards (4 byte UID) with
//!   the default key and dumps a block, or dumps a page of Mifare Ultralight
//!   tags (7 byte UID).
//! - [`Mode::Presence`] only prints the UID.
//!
//! In both modes the status pin is high while a card is in the field.
#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod console;
mod card;
mod config;
mod poller;
mod reader;

#[cfg(test)]
mod mock;

pub use crate::card::{
    classic_sector, Block, CardFamily, FirmwareVersion, Hex, HexDump, HexList, Key, KeyType,
    Page, Technology, Uid, BLOCK_LENGTH, KEY_LENGTH, MAX_UID_LENGTH, PAGE_LENGTH,
};
pub use crate::config::{Config, Mode};
pub use crate::console::{Category, Console, SerialConsole};
pub use crate::poller::{NoPin, PollOutcome, Poller};
pub use crate::reader::Reader;

#[derive(Debug, Eq, PartialEq)]
pub enum Error<E> {
    /// The reader driver failed while setting up the chip
    Reader(E),
    /// The chip never answered the firmware query
    HandshakeExhausted { attempts: u32 },
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Error::Reader(err)
    }
}

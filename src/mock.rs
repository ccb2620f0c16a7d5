//! Scripted reader, recording console and delay for the poll loop tests.

use core::fmt::{self, Arguments};
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embedded_hal::blocking::delay::DelayMs;

use crate::{
    Block, Category, Console, FirmwareVersion, Key, KeyType, Page, Reader, Technology, Uid,
};

#[derive(Debug, Eq, PartialEq)]
pub struct MockError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Call {
    Begin,
    FirmwareVersion,
    Configure,
    Detect(Technology),
    Authenticate {
        uid: Uid,
        block: u8,
        key_type: KeyType,
        key: Key,
    },
    ReadBlock(u8),
    WriteBlock(u8, Block),
    ReadPage(u8),
}

/// Answers from queues, falling back to "chip present, no card" once drained.
#[derive(Default)]
pub struct MockReader {
    pub firmware: VecDeque<Result<u32, MockError>>,
    pub targets: VecDeque<nb::Result<Uid, MockError>>,
    pub fail_begin: bool,
    pub fail_configure: bool,
    pub fail_auth: bool,
    pub fail_write: bool,
    pub fail_read: bool,
    pub block: Block,
    pub page: Page,
    pub calls: Vec<Call>,
}

pub const PN532_FIRMWARE: u32 = 0x3201_0607;

impl MockReader {
    pub fn with_target(uid: &[u8]) -> Self {
        let mut reader = MockReader::default();
        reader.targets.push_back(Ok(Uid::new(uid).unwrap()));
        reader
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

fn fail_if<T>(fail: bool, value: T) -> Result<T, MockError> {
    if fail {
        Err(MockError)
    } else {
        Ok(value)
    }
}

impl Reader for MockReader {
    type Error = MockError;

    fn begin(&mut self) -> Result<(), MockError> {
        self.calls.push(Call::Begin);
        fail_if(self.fail_begin, ())
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, MockError> {
        self.calls.push(Call::FirmwareVersion);
        self.firmware
            .pop_front()
            .unwrap_or(Ok(PN532_FIRMWARE))
            .map(FirmwareVersion)
    }

    fn configure(&mut self) -> Result<(), MockError> {
        self.calls.push(Call::Configure);
        fail_if(self.fail_configure, ())
    }

    fn detect_passive_target(&mut self, technology: Technology) -> nb::Result<Uid, MockError> {
        self.calls.push(Call::Detect(technology));
        self.targets
            .pop_front()
            .unwrap_or(Err(nb::Error::WouldBlock))
    }

    fn authenticate_block(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &Key,
    ) -> Result<(), MockError> {
        self.calls.push(Call::Authenticate {
            uid: *uid,
            block,
            key_type,
            key: *key,
        });
        fail_if(self.fail_auth, ())
    }

    fn read_block(&mut self, block: u8) -> Result<Block, MockError> {
        self.calls.push(Call::ReadBlock(block));
        fail_if(self.fail_read, self.block)
    }

    fn write_block(&mut self, block: u8, data: &Block) -> Result<(), MockError> {
        self.calls.push(Call::WriteBlock(block, *data));
        fail_if(self.fail_write, ())
    }

    fn read_page(&mut self, page: u8) -> Result<Page, MockError> {
        self.calls.push(Call::ReadPage(page));
        fail_if(self.fail_read, self.page)
    }
}

#[derive(Default)]
pub struct RecordingConsole {
    pub lines: Vec<(Category, String)>,
    pending: String,
}

impl RecordingConsole {
    pub fn count(&self, category: Category) -> usize {
        self.lines.iter().filter(|(c, _)| *c == category).count()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|(_, line)| line.contains(text))
    }

    /// Progress text not yet terminated by a line
    pub fn pending(&self) -> &str {
        &self.pending
    }
}

impl Console for RecordingConsole {
    fn print(&mut self, args: Arguments) {
        let _ = fmt::write(&mut self.pending, args);
    }

    fn line(&mut self, category: Category, args: Arguments) {
        let mut text = core::mem::take(&mut self.pending);
        let _ = fmt::write(&mut text, args);
        self.lines.push((category, text));
    }
}

/// Delay that only remembers how long it was asked to wait
#[derive(Default)]
pub struct RecordingDelay {
    pub waits: Vec<u32>,
}

impl DelayMs<u32> for RecordingDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.waits.push(ms);
    }
}

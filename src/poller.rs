use core::convert::Infallible;
use core::fmt::Debug;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;

use crate::card::{classic_sector, Block, CardFamily, FirmwareVersion, HexDump, HexList, Page, Uid};
use crate::config::{Config, Mode};
use crate::console::{Category, Console};
use crate::reader::Reader;
use crate::Error;

/// Stand-in for a board without a status pin
pub struct NoPin;

impl OutputPin for NoPin {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Infallible> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Result of a single poll
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PollOutcome {
    /// Nothing answered, or the driver failed while listing targets
    NoCard,
    /// A card was seen and nothing else was attempted
    Detected(Uid),
    BlockRead(Uid, Block),
    PageRead(Uid, Page),
    AuthFailed(Uid),
    WriteFailed(Uid),
    ReadFailed(Uid),
}

impl PollOutcome {
    pub fn uid(&self) -> Option<&Uid> {
        match self {
            PollOutcome::NoCard => None,
            PollOutcome::Detected(uid)
            | PollOutcome::BlockRead(uid, _)
            | PollOutcome::PageRead(uid, _)
            | PollOutcome::AuthFailed(uid)
            | PollOutcome::WriteFailed(uid)
            | PollOutcome::ReadFailed(uid) => Some(uid),
        }
    }

    pub fn card_present(&self) -> bool {
        self.uid().is_some()
    }
}

/// The poll loop and everything it owns.
pub struct Poller<R, P, D, C> {
    reader: R,
    status: P,
    delay: D,
    console: C,
    config: Config,
}

impl<R, P, D, C> Poller<R, P, D, C>
where
    R: Reader,
    P: OutputPin,
    P::Error: Debug,
    D: DelayMs<u32>,
    C: Console,
{
    pub fn new(reader: R, status: P, delay: D, console: C, config: Config) -> Self {
        Poller {
            reader,
            status,
            delay,
            console,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn release(self) -> (R, P, D, C) {
        (self.reader, self.status, self.delay, self.console)
    }

    /// Bring up the reader and wait for its firmware answer.
    ///
    /// Blocks until the chip answers unless `max_handshake_attempts` is set.
    /// The status pin is held high meanwhile.
    pub fn init(&mut self) -> Result<FirmwareVersion, Error<R::Error>> {
        self.set_status(true);
        console_line!(self.console, Category::Info, "PN532 NFC tag reader");
        console_line!(self.console, Category::Info, "Initializing please wait...");
        self.delay.delay_ms(self.config.startup_delay_ms);

        self.reader.begin()?;
        let firmware = self.handshake()?;
        log::info!(
            "PN5{:02X} firmware {}.{} answered",
            firmware.ic(),
            firmware.version(),
            firmware.revision()
        );
        console_line!(self.console, Category::Info, "Found chip PN5{:02X}", firmware.ic());
        console_line!(
            self.console,
            Category::Info,
            "Firmware version {}.{}",
            firmware.version(),
            firmware.revision()
        );

        self.reader.configure()?;
        console_line!(
            self.console,
            Category::Info,
            "Waiting for an {} card ...",
            self.config.technology
        );
        self.set_status(false);
        Ok(firmware)
    }

    fn handshake(&mut self) -> Result<FirmwareVersion, Error<R::Error>> {
        let width = self.config.progress_line_width;
        let mut attempts: u32 = 0;
        loop {
            match self.reader.firmware_version() {
                Ok(firmware) if firmware.is_valid() => {
                    self.end_progress_line(attempts);
                    return Ok(firmware);
                }
                Ok(_) => log::debug!("empty firmware word"),
                Err(err) => log::debug!("firmware query failed: {:?}", err),
            }

            attempts = attempts.saturating_add(1);
            self.console.print(format_args!("."));
            if width != 0 && attempts % width == 0 {
                console_line!(self.console, Category::Info, "");
            }
            if let Some(max) = self.config.max_handshake_attempts {
                if attempts >= max {
                    self.end_progress_line(attempts);
                    return Err(Error::HandshakeExhausted { attempts });
                }
            }
            self.delay.delay_ms(self.config.handshake_retry_ms);
        }
    }

    // Terminate a progress line that was not already broken at `progress_line_width`
    fn end_progress_line(&mut self, attempts: u32) {
        let width = self.config.progress_line_width;
        if attempts > 0 && (width == 0 || attempts % width != 0) {
            console_line!(self.console, Category::Info, "");
        }
    }

    /// List one passive target and report on it.
    ///
    /// Failures past detection are printed once and returned as outcome, never retried.
    pub fn poll(&mut self) -> PollOutcome {
        let uid = match self.reader.detect_passive_target(self.config.technology) {
            Ok(uid) => uid,
            Err(nb::Error::WouldBlock) => {
                self.set_status(false);
                return PollOutcome::NoCard;
            }
            Err(nb::Error::Other(err)) => {
                log::debug!("target detection failed: {:?}", err);
                self.set_status(false);
                return PollOutcome::NoCard;
            }
        };
        self.set_status(true);

        let outcome = match self.config.mode {
            Mode::Presence => {
                console_line!(self.console, Category::Detected, "UID: {}", uid);
                PollOutcome::Detected(uid)
            }
            Mode::Inspect => self.inspect(uid),
        };
        log::debug!("poll outcome: {:?}", outcome);
        outcome
    }

    /// Initialize, then poll forever. Only returns if initialization fails.
    pub fn run(&mut self) -> Result<Infallible, Error<R::Error>> {
        self.init()?;
        loop {
            self.poll();
        }
    }

    fn inspect(&mut self, uid: Uid) -> PollOutcome {
        console_line!(
            self.console,
            Category::Detected,
            "{} card detected",
            self.config.technology
        );
        console_line!(self.console, Category::Info, "UID length: {} bytes", uid.len());
        console_line!(
            self.console,
            Category::Info,
            "UID value:{}",
            HexList(uid.as_bytes())
        );

        match uid.family() {
            CardFamily::MifareClassic => self.read_classic(uid),
            CardFamily::MifareUltralight => self.read_ultralight(uid),
            CardFamily::Unknown => PollOutcome::Detected(uid),
        }
    }

    fn read_classic(&mut self, uid: Uid) -> PollOutcome {
        let block = self.config.auth_block;
        console_line!(self.console, Category::Info, "Mifare Classic card (4 byte UID)");
        console_line!(self.console, Category::Info, "Authenticating block {}", block);

        if let Err(err) = self.reader.authenticate_block(
            &uid,
            block,
            self.config.key_type,
            &self.config.key,
        ) {
            log::debug!("authentication of block {} failed: {:?}", block, err);
            console_line!(
                self.console,
                Category::AuthError,
                "Authentication failed, please try again"
            );
            return PollOutcome::AuthFailed(uid);
        }
        let (sector, first, last) = classic_sector(block);
        console_line!(
            self.console,
            Category::Info,
            "Sector {} (blocks {}..{}) authenticated",
            sector,
            first,
            last
        );

        if let Some(data) = self.config.write_data {
            console_line!(self.console, Category::Info, "Writing block {}", block);
            if let Err(err) = self.reader.write_block(block, &data) {
                log::debug!("write of block {} failed: {:?}", block, err);
                console_line!(
                    self.console,
                    Category::WriteError,
                    "Unable to write requested block"
                );
                return PollOutcome::WriteFailed(uid);
            }
        }

        match self.reader.read_block(block) {
            Ok(data) => {
                console_line!(self.console, Category::Info, "Reading block {}:", block);
                console_line!(self.console, Category::Info, "{}", HexDump(&data));
                self.delay.delay_ms(self.config.read_hold_ms);
                PollOutcome::BlockRead(uid, data)
            }
            Err(err) => {
                log::debug!("read of block {} failed: {:?}", block, err);
                console_line!(
                    self.console,
                    Category::ReadError,
                    "Unable to read requested block"
                );
                PollOutcome::ReadFailed(uid)
            }
        }
    }

    fn read_ultralight(&mut self, uid: Uid) -> PollOutcome {
        let page = self.config.page;
        console_line!(self.console, Category::Info, "Mifare Ultralight tag (7 byte UID)");
        console_line!(self.console, Category::Info, "Reading page {}", page);

        match self.reader.read_page(page) {
            Ok(data) => {
                console_line!(self.console, Category::Info, "{}", HexDump(&data));
                self.delay.delay_ms(self.config.read_hold_ms);
                PollOutcome::PageRead(uid, data)
            }
            Err(err) => {
                log::debug!("read of page {} failed: {:?}", page, err);
                console_line!(
                    self.console,
                    Category::ReadError,
                    "Unable to read requested page"
                );
                PollOutcome::ReadFailed(uid)
            }
        }
    }

    // The pin is an indicator only, a failed write must not stop polling
    fn set_status(&mut self, high: bool) {
        let result = if high {
            self.status.set_high()
        } else {
            self.status.set_low()
        };
        if let Err(err) = result {
            log::warn!("status pin update failed: {:?}", err);
        }
    }
}

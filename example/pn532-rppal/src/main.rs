use std::error::Error;
use std::fmt;
use std::time::Duration;

use pn532::i2c::I2CInterface;
use pn532::requests::SAMMode;
use pn532::serialport::SysTimer;
use pn532::{Command, Pn532, Request};
use pn532_poll::{
    Block, Config, FirmwareVersion, Key, KeyType, Page, Poller, Reader, SerialConsole,
    Technology, Uid,
};
use rppal::gpio::Gpio;
use rppal::hal::Delay;
use rppal::i2c::I2c;

const STATUS_PIN: u8 = 17;
const TIMEOUT: Duration = Duration::from_millis(100);
const DETECT_TIMEOUT: Duration = Duration::from_millis(1000);

const MIFARE_AUTH_A: u8 = 0x60;
const MIFARE_AUTH_B: u8 = 0x61;
const MIFARE_READ: u8 = 0x30;
const MIFARE_WRITE: u8 = 0xA0;

#[derive(Debug)]
enum DriverError {
    Pn532(pn532::Error<rppal::i2c::Error>),
    /// The card answered with a non-zero status byte
    Status(u8),
    BadResponse,
}

impl From<pn532::Error<rppal::i2c::Error>> for DriverError {
    fn from(err: pn532::Error<rppal::i2c::Error>) -> Self {
        DriverError::Pn532(err)
    }
}

struct Pn532Reader {
    pn532: Pn532<I2CInterface<I2c>, SysTimer>,
}

impl Pn532Reader {
    fn exchange<const N: usize>(&mut self, data: [u8; N], response_len: usize) -> Result<&[u8], DriverError> {
        let response = self
            .pn532
            .process(&Request::new(Command::InDataExchange, data), response_len, TIMEOUT)?;
        match response.first() {
            Some(0) => Ok(&response[1..]),
            Some(&status) => Err(DriverError::Status(status)),
            None => Err(DriverError::BadResponse),
        }
    }
}

impl Reader for Pn532Reader {
    type Error = DriverError;

    fn begin(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    fn firmware_version(&mut self) -> Result<FirmwareVersion, DriverError> {
        let response = self.pn532.process(&Request::GET_FIRMWARE_VERSION, 4, TIMEOUT)?;
        let word: [u8; 4] = response.try_into().map_err(|_| DriverError::BadResponse)?;
        Ok(FirmwareVersion::from(word))
    }

    fn configure(&mut self) -> Result<(), DriverError> {
        self.pn532
            .process(&Request::sam_configuration(SAMMode::Normal, false), 0, TIMEOUT)?;
        Ok(())
    }

    fn detect_passive_target(&mut self, technology: Technology) -> nb::Result<Uid, DriverError> {
        let request = Request::new(Command::InListPassiveTarget, [0x01, technology.code()]);
        let response = match self.pn532.process(&request, 17, DETECT_TIMEOUT) {
            Ok(response) => response,
            Err(pn532::Error::TimeoutResponse) => return Err(nb::Error::WouldBlock),
            Err(err) => return Err(nb::Error::Other(err.into())),
        };
        // NbTg, Tg, SENS_RES (2), SEL_RES, NFCID length, NFCID
        match response {
            [0, ..] => Err(nb::Error::WouldBlock),
            [_, _, _, _, _, len, uid @ ..] if uid.len() >= *len as usize => {
                Uid::new(&uid[..*len as usize]).ok_or(nb::Error::Other(DriverError::BadResponse))
            }
            _ => Err(nb::Error::Other(DriverError::BadResponse)),
        }
    }

    fn authenticate_block(
        &mut self,
        uid: &Uid,
        block: u8,
        key_type: KeyType,
        key: &Key,
    ) -> Result<(), DriverError> {
        let command = match key_type {
            KeyType::A => MIFARE_AUTH_A,
            KeyType::B => MIFARE_AUTH_B,
        };
        let mut data = [0u8; 13];
        data[0] = 0x01;
        data[1] = command;
        data[2] = block;
        data[3..9].copy_from_slice(&key.0);
        // Crypto1 uses the last four UID bytes
        let uid = uid.as_bytes();
        data[9..13].copy_from_slice(&uid[uid.len().saturating_sub(4)..]);
        self.exchange(data, 1)?;
        Ok(())
    }

    fn read_block(&mut self, block: u8) -> Result<Block, DriverError> {
        let response = self.exchange([0x01, MIFARE_READ, block], 17)?;
        response
            .get(..16)
            .and_then(|data| data.try_into().ok())
            .ok_or(DriverError::BadResponse)
    }

    fn write_block(&mut self, block: u8, data: &Block) -> Result<(), DriverError> {
        let mut request = [0u8; 19];
        request[0] = 0x01;
        request[1] = MIFARE_WRITE;
        request[2] = block;
        request[3..].copy_from_slice(data);
        self.exchange(request, 1)?;
        Ok(())
    }

    // The card answers a read with four consecutive pages
    fn read_page(&mut self, page: u8) -> Result<Page, DriverError> {
        let response = self.exchange([0x01, MIFARE_READ, page], 17)?;
        response
            .get(..4)
            .and_then(|data| data.try_into().ok())
            .ok_or(DriverError::BadResponse)
    }
}

struct Stdout;

impl fmt::Write for Stdout {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        print!("{}", s);
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let i2c = I2c::new()?;
    let reader = Pn532Reader {
        pn532: Pn532::new(I2CInterface { i2c }, SysTimer::new()),
    };
    let status = Gpio::new()?.get(STATUS_PIN)?.into_output();

    let mut poller = Poller::new(
        reader,
        status,
        Delay::new(),
        SerialConsole::new(Stdout),
        Config::default(),
    );

    match poller.run() {
        Ok(never) => match never {},
        Err(err) => Err(format!("reader setup failed: {:?}", err).into()),
    }
}

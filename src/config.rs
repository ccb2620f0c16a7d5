use crate::card::{Block, Key, KeyType, Technology};

pub const DEFAULT_AUTH_BLOCK: u8 = 4;
/// First user page of an Ultralight tag
pub const DEFAULT_PAGE: u8 = 4;
pub const DEFAULT_STARTUP_DELAY_MS: u32 = 3000;
pub const DEFAULT_HANDSHAKE_RETRY_MS: u32 = 100;
pub const DEFAULT_PROGRESS_LINE_WIDTH: u32 = 80;
pub const DEFAULT_READ_HOLD_MS: u32 = 1000;

/// What the poll loop does with a detected card
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Classify by UID length, authenticate and read Classic blocks, read Ultralight pages
    Inspect,
    /// Only report the UID
    Presence,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub mode: Mode,
    pub technology: Technology,
    /// Classic block that is authenticated and read
    pub auth_block: u8,
    pub key_type: KeyType,
    pub key: Key,
    /// Ultralight page that is read
    pub page: u8,
    /// Written to `auth_block` after authentication, before reading it back
    pub write_data: Option<Block>,
    pub startup_delay_ms: u32,
    pub handshake_retry_ms: u32,
    /// `None` waits for the chip forever
    pub max_handshake_attempts: Option<u32>,
    /// Progress marks per line while waiting for the chip
    pub progress_line_width: u32,
    /// Pause after a successful read so the card can be removed
    pub read_hold_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: Mode::Inspect,
            technology: Technology::Iso14443A,
            auth_block: DEFAULT_AUTH_BLOCK,
            key_type: KeyType::A,
            key: Key::DEFAULT,
            page: DEFAULT_PAGE,
            write_data: None,
            startup_delay_ms: DEFAULT_STARTUP_DELAY_MS,
            handshake_retry_ms: DEFAULT_HANDSHAKE_RETRY_MS,
            max_handshake_attempts: None,
            progress_line_width: DEFAULT_PROGRESS_LINE_WIDTH,
            read_hold_ms: DEFAULT_READ_HOLD_MS,
        }
    }
}

impl Config {
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_technology(mut self, technology: Technology) -> Self {
        self.technology = technology;
        self
    }

    pub fn with_key(mut self, key_type: KeyType, key: Key) -> Self {
        self.key_type = key_type;
        self.key = key;
        self
    }

    pub fn with_auth_block(mut self, block: u8) -> Self {
        self.auth_block = block;
        self
    }

    pub fn with_page(mut self, page: u8) -> Self {
        self.page = page;
        self
    }

    pub fn with_write_data(mut self, data: Block) -> Self {
        self.write_data = Some(data);
        self
    }

    pub fn with_startup_delay_ms(mut self, ms: u32) -> Self {
        self.startup_delay_ms = ms;
        self
    }

    pub fn with_handshake_retry_ms(mut self, ms: u32) -> Self {
        self.handshake_retry_ms = ms;
        self
    }

    pub fn with_max_handshake_attempts(mut self, attempts: u32) -> Self {
        self.max_handshake_attempts = Some(attempts);
        self
    }

    pub fn with_progress_line_width(mut self, width: u32) -> Self {
        self.progress_line_width = width;
        self
    }

    pub fn with_read_hold_ms(mut self, ms: u32) -> Self {
        self.read_hold_ms = ms;
        self
    }
}
